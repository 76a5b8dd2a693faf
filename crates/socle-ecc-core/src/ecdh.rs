//! ECDH/P-384 operations: keygen and shared-secret derivation.
//!
//! A derived shared secret is secret material and gets the same treatment
//! as a private key: the caller supplies a masked [`BlindedKey`] container
//! and the exchange re-masks the raw shared value into it, stamping a fresh
//! checksum. The unmasked shared value never leaves the exchange path.

use crate::driver::{
    finish_keygen, keygen_request, point_operand, private_operand, validate_blinded,
    validate_keygen_destination, validate_unblinded, P384Driver,
};
use crate::engine::{EccEngine, EngineReply, EngineRequest};
use crate::error::CryptoError;
use crate::key::{BlindedKey, KeyMode, Keyblob, UnblindedKey};
use crate::keyblob::MaskedShares;
use crate::sequencer::OpKind;

impl<E: EccEngine> P384Driver<E> {
    // -----------------------------------------------------------------------
    // Keygen
    // -----------------------------------------------------------------------

    /// Generate a fresh ECDH/P-384 key pair.
    ///
    /// Symmetric to ECDSA keygen: the caller allocates both structs, the
    /// private key's mode must indicate ECDH/P-384 (masked container or
    /// hardware handle), and the checksums are stamped here.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] on configuration mismatch,
    /// [`CryptoError::Busy`] if an operation is pending,
    /// [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdh_keygen(
        &mut self,
        private_key: &mut BlindedKey,
        public_key: &mut UnblindedKey,
    ) -> Result<(), CryptoError> {
        self.ecdh_keygen_start(private_key)?;
        self.ecdh_keygen_finalize(private_key, public_key)
    }

    /// Start asynchronous ECDH/P-384 key generation.
    ///
    /// See [`Self::ecdh_keygen`] for requirements on input values.
    ///
    /// # Errors
    ///
    /// As [`Self::ecdh_keygen`], minus finalize-stage errors.
    pub fn ecdh_keygen_start(&mut self, private_key: &BlindedKey) -> Result<(), CryptoError> {
        validate_keygen_destination(private_key, KeyMode::EcdhP384)?;
        self.sequencer
            .begin(OpKind::EcdhKeygen, keygen_request(private_key))
    }

    /// Finalize asynchronous ECDH/P-384 key generation.
    ///
    /// May block until the engine completes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if no matching start is pending or
    /// the destination does not match the started request,
    /// [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdh_keygen_finalize(
        &mut self,
        private_key: &mut BlindedKey,
        public_key: &mut UnblindedKey,
    ) -> Result<(), CryptoError> {
        let reply = self.sequencer.complete(OpKind::EcdhKeygen)?;
        validate_keygen_destination(private_key, KeyMode::EcdhP384)?;
        finish_keygen(reply, private_key, public_key, KeyMode::EcdhP384)
    }

    // -----------------------------------------------------------------------
    // Exchange
    // -----------------------------------------------------------------------

    /// Derive an ECDH/P-384 shared secret from a local private key and a
    /// peer public key.
    ///
    /// `shared_secret` must be a caller-allocated masked container with
    /// ECDH/P-384 mode; its checksum is stamped on success.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] on configuration mismatch,
    /// [`CryptoError::KeyIntegrity`] if either input key's checksum does
    /// not validate, [`CryptoError::Busy`] if an operation is pending,
    /// [`CryptoError::ComputeFault`] on engine failure (including a peer
    /// point the engine rejects as not on the curve).
    pub fn ecdh_exchange(
        &mut self,
        private_key: &BlindedKey,
        peer_key: &UnblindedKey,
        shared_secret: &mut BlindedKey,
    ) -> Result<(), CryptoError> {
        self.ecdh_exchange_start(private_key, peer_key)?;
        self.ecdh_exchange_finalize(shared_secret)
    }

    /// Start asynchronous ECDH/P-384 shared-secret derivation.
    ///
    /// See [`Self::ecdh_exchange`] for requirements on input values.
    ///
    /// # Errors
    ///
    /// As [`Self::ecdh_exchange`], minus finalize-stage errors.
    pub fn ecdh_exchange_start(
        &mut self,
        private_key: &BlindedKey,
        peer_key: &UnblindedKey,
    ) -> Result<(), CryptoError> {
        validate_blinded(private_key, KeyMode::EcdhP384)?;
        validate_unblinded(peer_key, KeyMode::EcdhP384)?;
        let key = private_operand(private_key)?;
        let point = point_operand(peer_key)?;
        self.sequencer
            .begin(OpKind::EcdhExchange, EngineRequest::Agree { key, point })
    }

    /// Finalize asynchronous ECDH/P-384 shared-secret derivation.
    ///
    /// May block until the engine completes. The shared value is re-masked
    /// into the caller's container and the checksum stamped.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if no matching start is pending or
    /// the destination is not a masked ECDH container,
    /// [`CryptoError::ComputeFault`] on engine failure.
    pub fn ecdh_exchange_finalize(
        &mut self,
        shared_secret: &mut BlindedKey,
    ) -> Result<(), CryptoError> {
        let reply = self.sequencer.complete(OpKind::EcdhExchange)?;

        if shared_secret.config.mode != KeyMode::EcdhP384 {
            return Err(CryptoError::BadArgs(format!(
                "shared secret container mode is {}, expected {}",
                shared_secret.config.mode.as_str(),
                KeyMode::EcdhP384.as_str()
            )));
        }
        let Keyblob::Masked(container) = &mut shared_secret.keyblob else {
            return Err(CryptoError::BadArgs(
                "shared secret container must be software-masked".into(),
            ));
        };
        let EngineReply::SharedSecret(value) = reply else {
            return Err(CryptoError::ComputeFault(
                "engine returned a mismatched reply".into(),
            ));
        };

        *container = MaskedShares::mask(&value)?;
        shared_secret.stamp_checksum();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
