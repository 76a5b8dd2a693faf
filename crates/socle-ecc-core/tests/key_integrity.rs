#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for key integrity checking: checksum corruption,
//! share corruption, and the BadArgs/KeyIntegrity error split.

mod common;

use common::{digest, ecdh_keypair, ecdsa_keypair, shared_secret_container};
use socle_ecc_core::{
    BlindedKey, CryptoError, KeyConfig, KeyMode, MaskedShares, P384Driver, SecretBytes,
    SoftEngine, UnblindedKey,
};

fn driver() -> P384Driver<SoftEngine> {
    P384Driver::new(SoftEngine::new())
}

/// A corrupted private-key checksum yields `KeyIntegrity` from sign, never
/// `ComputeFault` and never a signature.
#[test]
fn corrupted_checksum_is_key_integrity_for_sign() {
    let mut driver = driver();
    let (mut private_key, _) = ecdsa_keypair(&mut driver);

    for bit in [0u32, 7, 19, 31] {
        let mut key_checksum = private_key.checksum;
        key_checksum ^= 1 << bit;
        private_key.checksum = key_checksum;

        let result = driver.ecdsa_sign(&private_key, &digest(0x50));
        assert!(
            matches!(result, Err(CryptoError::KeyIntegrity(_))),
            "bit {bit} corruption must be KeyIntegrity"
        );
        assert!(driver.is_idle());

        // Restore for the next round.
        private_key.checksum ^= 1 << bit;
    }
}

/// A corrupted public-key checksum yields `KeyIntegrity` from verify.
#[test]
fn corrupted_checksum_is_key_integrity_for_verify() {
    let mut driver = driver();
    let (private_key, mut public_key) = ecdsa_keypair(&mut driver);
    let signature = driver
        .ecdsa_sign(&private_key, &digest(0x51))
        .expect("sign should succeed");

    public_key.checksum = public_key.checksum.wrapping_add(1);
    let result = driver.ecdsa_verify(&public_key, &digest(0x51), &signature);
    assert!(matches!(result, Err(CryptoError::KeyIntegrity(_))));
}

/// Flipping a share byte without restamping is caught by the checksum.
#[test]
fn share_corruption_under_stale_checksum_is_key_integrity() {
    let mut driver = driver();
    let mut key = BlindedKey::new_masked(KeyConfig::exportable(KeyMode::EcdsaP384));
    let mut public_key = UnblindedKey::new_for(KeyMode::EcdsaP384);
    driver
        .ecdsa_keygen(&mut key, &mut public_key)
        .expect("keygen should succeed");

    // Rebuild the keyblob with one flipped scalar byte, keeping the old
    // checksum: the stamp no longer matches the contents.
    let (share0, share1) = key.export_shares().expect("export should succeed");
    let mut corrupted = *share1.expose();
    corrupted[3] ^= 0x20;
    key.keyblob = socle_ecc_core::Keyblob::Masked(MaskedShares::from_shares(
        share0,
        SecretBytes::new(corrupted),
    ));

    let result = driver.ecdsa_sign(&key, &digest(0x52));
    assert!(matches!(result, Err(CryptoError::KeyIntegrity(_))));
}

/// Filler corruption survives a checksum restamp but is caught by the
/// codec's share consistency check at decode time.
#[test]
fn filler_corruption_survives_restamp_but_not_decode() {
    let mut driver = driver();
    let mut key = BlindedKey::new_masked(KeyConfig::exportable(KeyMode::EcdsaP384));
    let mut public_key = UnblindedKey::new_for(KeyMode::EcdsaP384);
    driver
        .ecdsa_keygen(&mut key, &mut public_key)
        .expect("keygen should succeed");

    let (share0, share1) = key.export_shares().expect("export should succeed");
    let mut corrupted = *share1.expose();
    corrupted[50] ^= 0xFF; // inside the filler region
    key.keyblob = socle_ecc_core::Keyblob::Masked(MaskedShares::from_shares(
        share0,
        SecretBytes::new(corrupted),
    ));
    key.stamp_checksum(); // attacker restamps over the corrupted blob

    let result = driver.ecdsa_sign(&key, &digest(0x53));
    assert!(matches!(result, Err(CryptoError::KeyIntegrity(_))));
}

/// Mode confusion between the families is `BadArgs`, not `KeyIntegrity`:
/// the checksum is valid, the configuration is wrong.
#[test]
fn mode_mismatch_is_bad_args_not_key_integrity() {
    let mut driver = driver();
    let (ecdh_private, _) = ecdh_keypair(&mut driver);

    let result = driver.ecdsa_sign(&ecdh_private, &digest(0x54));
    assert!(matches!(result, Err(CryptoError::BadArgs(_))));
}

/// An unstamped, freshly allocated container is refused before use.
#[test]
fn unstamped_key_is_refused() {
    let mut driver = driver();
    let key = BlindedKey::new_masked(KeyConfig::new(KeyMode::EcdsaP384));

    let result = driver.ecdsa_sign(&key, &digest(0x55));
    assert!(matches!(result, Err(CryptoError::KeyIntegrity(_))));
}

/// The shared-secret output of an exchange validates like any blinded key,
/// and corrupting it afterwards is detected.
#[test]
fn shared_secret_corruption_is_detected() {
    let mut driver = driver();
    let (private_a, _) = ecdh_keypair(&mut driver);
    let (_, public_b) = ecdh_keypair(&mut driver);

    let mut secret = shared_secret_container();
    driver
        .ecdh_exchange(&private_a, &public_b, &mut secret)
        .expect("exchange should succeed");
    secret
        .verify_integrity()
        .expect("fresh shared secret should validate");

    secret.checksum ^= 0x8000_0000;
    assert!(matches!(
        secret.verify_integrity(),
        Err(CryptoError::KeyIntegrity(_))
    ));
}

/// Serde-roundtripped public keys keep a valid checksum; a tampered
/// serialized point is rejected after deserialization.
#[test]
fn serde_roundtrip_preserves_integrity() {
    let mut driver = driver();
    let (_, public_key) = ecdsa_keypair(&mut driver);

    let json = serde_json::to_string(&public_key).expect("serialize should succeed");
    let restored: UnblindedKey = serde_json::from_str(&json).expect("deserialize should succeed");
    restored
        .verify_integrity()
        .expect("restored key should validate");

    let mut tampered: UnblindedKey =
        serde_json::from_str(&json).expect("deserialize should succeed");
    tampered.point[40] ^= 0x01;
    assert!(matches!(
        tampered.verify_integrity(),
        Err(CryptoError::KeyIntegrity(_))
    ));
}
