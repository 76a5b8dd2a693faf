#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for the ECDSA/P-384 operation family.

mod common;

use common::{digest, ecdsa_keypair};
use socle_ecc_core::{
    BlindedKey, CryptoError, HardwareHandle, HashAlgo, KeyConfig, KeyMode, MessageDigest,
    P384Driver, Signature, SoftEngine, UnblindedKey, P384_DIGEST_LEN,
};

fn driver() -> P384Driver<SoftEngine> {
    P384Driver::new(SoftEngine::new())
}

/// Full keygen → sign → verify roundtrip.
#[test]
fn keygen_sign_verify_roundtrip() {
    let mut driver = driver();
    let (private_key, public_key) = ecdsa_keypair(&mut driver);

    let digest = digest(0x5C);
    let signature = driver
        .ecdsa_sign(&private_key, &digest)
        .expect("sign should succeed");
    let verdict = driver
        .ecdsa_verify(&public_key, &digest, &signature)
        .expect("verify should complete");
    assert!(verdict.passed());
}

/// The roundtrip holds for digests under either hash mode tag.
#[test]
fn roundtrip_for_both_hash_modes() {
    let mut driver = driver();
    let (private_key, public_key) = ecdsa_keypair(&mut driver);

    for algo in [HashAlgo::Sha2_384, HashAlgo::Sha3_384] {
        let digest = MessageDigest::new(algo, vec![0x1F; P384_DIGEST_LEN]);
        let signature = driver
            .ecdsa_sign(&private_key, &digest)
            .expect("sign should succeed");
        let verdict = driver
            .ecdsa_verify(&public_key, &digest, &signature)
            .expect("verify should complete");
        assert!(verdict.passed());
    }
}

/// A signature never verifies under a different key pair.
#[test]
fn signature_does_not_verify_under_other_key() {
    let mut driver = driver();
    let (private_a, _) = ecdsa_keypair(&mut driver);
    let (_, public_b) = ecdsa_keypair(&mut driver);

    let digest = digest(0x2A);
    let signature = driver
        .ecdsa_sign(&private_a, &digest)
        .expect("sign should succeed");
    let verdict = driver
        .ecdsa_verify(&public_b, &digest, &signature)
        .expect("verify should complete");
    assert!(verdict.failed());
}

/// Status stays `Ok` for an invalid signature; only the verdict flips.
#[test]
fn invalid_signature_is_ok_status_fail_verdict() {
    let mut driver = driver();
    let (private_key, public_key) = ecdsa_keypair(&mut driver);
    let digest = digest(0x3B);

    let mut signature = driver
        .ecdsa_sign(&private_key, &digest)
        .expect("sign should succeed");
    signature.r[0] ^= 0x01;

    let verdict = driver
        .ecdsa_verify(&public_key, &digest, &signature)
        .expect("an invalid signature must not be an operation error");
    assert!(verdict.failed());
    assert!(!verdict.fault_detected());
}

/// An all-zero signature is rejected as invalid, not as a fault.
#[test]
fn zero_signature_fails_cleanly() {
    let mut driver = driver();
    let (_, public_key) = ecdsa_keypair(&mut driver);

    let signature = Signature {
        r: [0u8; 48],
        s: [0u8; 48],
    };
    let verdict = driver
        .ecdsa_verify(&public_key, &digest(0x10), &signature)
        .expect("verify should complete");
    assert!(verdict.failed());
}

/// Wrong digest lengths are `BadArgs` from both sign and verify.
#[test]
fn wrong_digest_length_is_bad_args() {
    let mut driver = driver();
    let (private_key, public_key) = ecdsa_keypair(&mut driver);
    let signature = driver
        .ecdsa_sign(&private_key, &digest(0x44))
        .expect("sign should succeed");

    for len in [0usize, 32, 47, 49, 64] {
        let wrong = MessageDigest::new(HashAlgo::Sha2_384, vec![0xAB; len]);

        let sign_result = driver.ecdsa_sign(&private_key, &wrong);
        assert!(
            matches!(sign_result, Err(CryptoError::BadArgs(_))),
            "sign with {len}-byte digest should be BadArgs"
        );

        let verify_result = driver.ecdsa_verify(&public_key, &wrong, &signature);
        assert!(
            matches!(verify_result, Err(CryptoError::BadArgs(_))),
            "verify with {len}-byte digest should be BadArgs"
        );
        assert!(driver.is_idle());
    }
}

/// Sync sign equals the explicit start/finalize composition bit-for-bit.
#[test]
fn sync_and_async_sign_agree() {
    let mut driver = driver();
    let (private_key, public_key) = ecdsa_keypair(&mut driver);
    let digest = digest(0x61);

    let sync_sig = driver
        .ecdsa_sign(&private_key, &digest)
        .expect("sync sign should succeed");

    driver
        .ecdsa_sign_start(&private_key, &digest)
        .expect("async start should succeed");
    // The caller may do unrelated work here while the accelerator runs.
    let async_sig = driver
        .ecdsa_sign_finalize()
        .expect("async finalize should succeed");

    assert_eq!(sync_sig, async_sig);

    let verdict = driver
        .ecdsa_verify(&public_key, &digest, &async_sig)
        .expect("verify should complete");
    assert!(verdict.passed());
}

/// Async verify composition matches the sync entry point.
#[test]
fn sync_and_async_verify_agree() {
    let mut driver = driver();
    let (private_key, public_key) = ecdsa_keypair(&mut driver);
    let digest = digest(0x62);
    let signature = driver
        .ecdsa_sign(&private_key, &digest)
        .expect("sign should succeed");

    let sync_verdict = driver
        .ecdsa_verify(&public_key, &digest, &signature)
        .expect("sync verify should complete");

    driver
        .ecdsa_verify_start(&public_key, &digest, &signature)
        .expect("async start should succeed");
    let async_verdict = driver
        .ecdsa_verify_finalize()
        .expect("async finalize should complete");

    assert_eq!(sync_verdict, async_verdict);
    assert!(async_verdict.passed());
}

/// A hardware-backed private key signs without its scalar ever leaving the
/// engine; the keyblob stays an opaque handle.
#[test]
fn hardware_backed_key_roundtrip() {
    let mut driver = driver();
    let mut private_key =
        BlindedKey::new_hardware(KeyConfig::new(KeyMode::EcdsaP384), HardwareHandle(42));
    let mut public_key = UnblindedKey::new_for(KeyMode::EcdsaP384);
    driver
        .ecdsa_keygen(&mut private_key, &mut public_key)
        .expect("hardware keygen should succeed");
    assert!(private_key.keyblob.is_hardware());

    let digest = digest(0x70);
    let signature = driver
        .ecdsa_sign(&private_key, &digest)
        .expect("hardware sign should succeed");
    let verdict = driver
        .ecdsa_verify(&public_key, &digest, &signature)
        .expect("verify should complete");
    assert!(verdict.passed());
}

/// Two independent drivers (each with its own engine) do not interfere.
#[test]
fn independent_drivers_are_isolated() {
    let mut driver_a = driver();
    let mut driver_b = driver();
    let (private_a, public_a) = ecdsa_keypair(&mut driver_a);

    let digest = digest(0x55);
    driver_a
        .ecdsa_sign_start(&private_a, &digest)
        .expect("start on driver A should succeed");

    // Driver B is idle and fully usable while A has a pending operation.
    assert!(driver_b.is_idle());
    let (private_b, public_b) = ecdsa_keypair(&mut driver_b);
    let sig_b = driver_b
        .ecdsa_sign(&private_b, &digest)
        .expect("sign on driver B should succeed");
    assert!(driver_b
        .ecdsa_verify(&public_b, &digest, &sig_b)
        .expect("verify on driver B should complete")
        .passed());

    let sig_a = driver_a
        .ecdsa_sign_finalize()
        .expect("finalize on driver A should succeed");
    assert!(driver_a
        .ecdsa_verify(&public_a, &digest, &sig_a)
        .expect("verify on driver A should complete")
        .passed());
}
