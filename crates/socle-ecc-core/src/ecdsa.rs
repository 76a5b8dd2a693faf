//! ECDSA/P-384 operations: keygen, sign, verify.
//!
//! # Verification Contract
//!
//! `ecdsa_verify` returning `Ok` means the *operation* completed, not that
//! the signature is valid: an invalid signature against well-formed inputs
//! yields `Ok(VerificationResult::FAIL)`. Callers MUST branch on the
//! returned [`VerificationResult`], never on the status alone. Only
//! malformed inputs or a compute fault produce an `Err`.

use crate::driver::{
    finish_keygen, keygen_request, point_operand, private_operand, validate_blinded,
    validate_keygen_destination, validate_unblinded, P384Driver,
};
use crate::engine::{EccEngine, EngineReply, EngineRequest};
use crate::error::CryptoError;
use crate::hardened::VerificationResult;
use crate::key::{BlindedKey, KeyMode, MessageDigest, Signature, UnblindedKey};
use crate::sequencer::OpKind;

impl<E: EccEngine> P384Driver<E> {
    // -----------------------------------------------------------------------
    // Keygen
    // -----------------------------------------------------------------------

    /// Generate a fresh ECDSA/P-384 key pair.
    ///
    /// The caller allocates and partially populates both structs: the
    /// private key's mode must indicate ECDSA/P-384 and its keyblob must be
    /// a masked container or a hardware handle. The checksum fields are
    /// stamped here.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] on configuration mismatch,
    /// [`CryptoError::Busy`] if an operation is pending,
    /// [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdsa_keygen(
        &mut self,
        private_key: &mut BlindedKey,
        public_key: &mut UnblindedKey,
    ) -> Result<(), CryptoError> {
        self.ecdsa_keygen_start(private_key)?;
        self.ecdsa_keygen_finalize(private_key, public_key)
    }

    /// Start asynchronous ECDSA/P-384 key generation.
    ///
    /// See [`Self::ecdsa_keygen`] for requirements on input values.
    ///
    /// # Errors
    ///
    /// As [`Self::ecdsa_keygen`], minus finalize-stage errors.
    pub fn ecdsa_keygen_start(&mut self, private_key: &BlindedKey) -> Result<(), CryptoError> {
        validate_keygen_destination(private_key, KeyMode::EcdsaP384)?;
        self.sequencer
            .begin(OpKind::EcdsaKeygen, keygen_request(private_key))
    }

    /// Finalize asynchronous ECDSA/P-384 key generation.
    ///
    /// May block until the engine completes. The private key passed here
    /// must be the struct whose configuration was passed to the `_start`
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if no matching start is pending or
    /// the destination does not match the started request,
    /// [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdsa_keygen_finalize(
        &mut self,
        private_key: &mut BlindedKey,
        public_key: &mut UnblindedKey,
    ) -> Result<(), CryptoError> {
        let reply = self.sequencer.complete(OpKind::EcdsaKeygen)?;
        validate_keygen_destination(private_key, KeyMode::EcdsaP384)?;
        finish_keygen(reply, private_key, public_key, KeyMode::EcdsaP384)
    }

    // -----------------------------------------------------------------------
    // Sign
    // -----------------------------------------------------------------------

    /// Generate an ECDSA/P-384 signature over a pre-hashed digest.
    ///
    /// The digest must be exactly 384 bits (48 bytes) long, but may carry
    /// any hash mode tag; the caller is responsible for choosing a hash
    /// whose security strength is at least the curve's.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] for a wrong digest length or key
    /// mode, [`CryptoError::KeyIntegrity`] if the key checksum does not
    /// validate, [`CryptoError::Busy`] if an operation is pending,
    /// [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdsa_sign(
        &mut self,
        private_key: &BlindedKey,
        digest: &MessageDigest,
    ) -> Result<Signature, CryptoError> {
        self.ecdsa_sign_start(private_key, digest)?;
        self.ecdsa_sign_finalize()
    }

    /// Start asynchronous ECDSA/P-384 signature generation.
    ///
    /// See [`Self::ecdsa_sign`] for requirements on input values. The
    /// private scalar is reconstructed here and handed to the engine; it is
    /// not retained.
    ///
    /// # Errors
    ///
    /// As [`Self::ecdsa_sign`], minus finalize-stage errors.
    pub fn ecdsa_sign_start(
        &mut self,
        private_key: &BlindedKey,
        digest: &MessageDigest,
    ) -> Result<(), CryptoError> {
        validate_blinded(private_key, KeyMode::EcdsaP384)?;
        let digest = digest.as_array()?;
        let key = private_operand(private_key)?;
        self.sequencer
            .begin(OpKind::EcdsaSign, EngineRequest::Sign { key, digest })
    }

    /// Finalize asynchronous ECDSA/P-384 signature generation.
    ///
    /// May block until the engine completes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if no matching start is pending,
    /// [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdsa_sign_finalize(&mut self) -> Result<Signature, CryptoError> {
        match self.sequencer.complete(OpKind::EcdsaSign)? {
            EngineReply::Signature { r, s } => Ok(Signature { r, s }),
            _ => Err(CryptoError::ComputeFault(
                "engine returned a mismatched reply".into(),
            )),
        }
    }

    // -----------------------------------------------------------------------
    // Verify
    // -----------------------------------------------------------------------

    /// Verify an ECDSA/P-384 signature over a pre-hashed digest.
    ///
    /// See the module documentation for the two-channel contract: check the
    /// returned [`VerificationResult`], not just `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] for a wrong digest length, point
    /// shape, or key mode, [`CryptoError::KeyIntegrity`] if the public key
    /// checksum does not validate, [`CryptoError::Busy`] if an operation is
    /// pending, [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdsa_verify(
        &mut self,
        public_key: &UnblindedKey,
        digest: &MessageDigest,
        signature: &Signature,
    ) -> Result<VerificationResult, CryptoError> {
        self.ecdsa_verify_start(public_key, digest, signature)?;
        self.ecdsa_verify_finalize()
    }

    /// Start asynchronous ECDSA/P-384 signature verification.
    ///
    /// See [`Self::ecdsa_verify`] for requirements on input values.
    ///
    /// # Errors
    ///
    /// As [`Self::ecdsa_verify`], minus finalize-stage errors.
    pub fn ecdsa_verify_start(
        &mut self,
        public_key: &UnblindedKey,
        digest: &MessageDigest,
        signature: &Signature,
    ) -> Result<(), CryptoError> {
        validate_unblinded(public_key, KeyMode::EcdsaP384)?;
        let digest = digest.as_array()?;
        let point = point_operand(public_key)?;
        self.sequencer.begin(
            OpKind::EcdsaVerify,
            EngineRequest::Verify {
                point,
                digest,
                r: signature.r,
                s: signature.s,
            },
        )
    }

    /// Finalize asynchronous ECDSA/P-384 signature verification.
    ///
    /// May block until the engine completes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if no matching start is pending,
    /// [`CryptoError::ComputeFault`] on engine failure. An invalid
    /// signature is NOT an error: it is `Ok(VerificationResult::FAIL)`.
    pub fn ecdsa_verify_finalize(&mut self) -> Result<VerificationResult, CryptoError> {
        match self.sequencer.complete(OpKind::EcdsaVerify)? {
            EngineReply::Verdict(verdict) => Ok(verdict),
            _ => Err(CryptoError::ComputeFault(
                "engine returned a mismatched reply".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
