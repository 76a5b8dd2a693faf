//! Two-share masked keyblob codec.
//!
//! This module provides:
//! - [`MaskedShares::mask`] — split a freshly generated scalar into two
//!   shares before it is written back into the caller's key struct
//! - [`MaskedShares::unmask`] (crate-internal) — reconstruct the scalar
//!   immediately before it crosses into the compute engine boundary
//! - [`MaskedShares::export`] — copy the shares out for exportable keys
//!
//! # Blob Layout
//!
//! ```text
//! share0 (56 B) | share1 (56 B)          = 112 B keyblob
//! ```
//!
//! `share0` is fresh CSPRNG output. The first 48 bytes of `share1` are the
//! scalar XOR `share0`; the trailing 8 filler bytes of `share1` repeat the
//! filler of `share0`, so the XOR of the two fillers is zero. The filler
//! equality is re-checked on every decode, which catches a share buffer
//! that was swapped or partially overwritten even when the checksum was
//! restamped over the corrupted blob.
//!
//! # Security Property
//!
//! Neither share alone reveals anything about the scalar. The reconstructed
//! scalar exists only as a [`SecretBytes`] value handed straight to the
//! compute engine, and is zeroized when the engine request is dropped; no
//! code path, including error paths, retains or returns an unmasked copy.

use crate::error::CryptoError;
use crate::key::P384_SCALAR_LEN;
use crate::memory::SecretBytes;
use zeroize::Zeroize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of one masking share in bytes.
pub const P384_SHARE_LEN: usize = 56;

/// Total keyblob length for a software-masked P-384 private key.
pub const P384_KEYBLOB_LEN: usize = 112;

// ---------------------------------------------------------------------------
// MaskedShares
// ---------------------------------------------------------------------------

/// A software-blinded P-384 scalar: two XOR shares of [`P384_SHARE_LEN`]
/// bytes each.
///
/// Shares are held in [`SecretBytes`] (mlocked best-effort, zeroized on
/// drop) and masked in `Debug` output.
#[derive(Debug)]
pub struct MaskedShares {
    share0: SecretBytes<P384_SHARE_LEN>,
    share1: SecretBytes<P384_SHARE_LEN>,
}

impl MaskedShares {
    /// A zero-filled share container, as allocated by a caller ahead of key
    /// generation. Not a valid key until a generation operation fills it.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            share0: SecretBytes::new([0; P384_SHARE_LEN]),
            share1: SecretBytes::new([0; P384_SHARE_LEN]),
        }
    }

    /// Rebuild a share container from stored blob halves.
    ///
    /// Used when a key is reloaded from caller-managed storage; the blob is
    /// trusted only after the owning key's checksum validates and the
    /// filler consistency check in [`Self::unmask`] passes.
    #[must_use]
    pub const fn from_shares(
        share0: SecretBytes<P384_SHARE_LEN>,
        share1: SecretBytes<P384_SHARE_LEN>,
    ) -> Self {
        Self { share0, share1 }
    }

    /// Mask a scalar into two fresh shares.
    ///
    /// `share0` is drawn from the CSPRNG; `share1` is derived so the shares
    /// XOR back to the scalar. The input scalar remains owned by the caller,
    /// which is expected to drop (and thereby zeroize) it promptly.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ComputeFault`] if the CSPRNG fails.
    pub fn mask(scalar: &SecretBytes<P384_SCALAR_LEN>) -> Result<Self, CryptoError> {
        let share0 = SecretBytes::<P384_SHARE_LEN>::random()?;

        let mut derived = [0u8; P384_SHARE_LEN];
        for ((out, mask), secret) in derived
            .iter_mut()
            .zip(share0.expose().iter())
            .zip(scalar.expose().iter())
        {
            *out = mask ^ secret;
        }
        // Trailing filler repeats share0 so the fillers XOR to zero.
        derived[P384_SCALAR_LEN..].copy_from_slice(&share0.expose()[P384_SCALAR_LEN..]);

        let share1 = SecretBytes::new(derived);
        derived.zeroize();

        Ok(Self { share0, share1 })
    }

    /// Reconstruct the scalar from the two shares.
    ///
    /// This is the only decode path in the crate, and it is crate-internal:
    /// the result feeds directly into an engine request.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyIntegrity`] if the filler consistency
    /// check fails.
    pub(crate) fn unmask(&self) -> Result<SecretBytes<P384_SCALAR_LEN>, CryptoError> {
        let filler0 = &self.share0.expose()[P384_SCALAR_LEN..];
        let filler1 = &self.share1.expose()[P384_SCALAR_LEN..];
        if filler0 != filler1 {
            return Err(CryptoError::KeyIntegrity(
                "keyblob share filler mismatch".into(),
            ));
        }

        let mut scalar = [0u8; P384_SCALAR_LEN];
        for ((out, a), b) in scalar
            .iter_mut()
            .zip(self.share0.expose().iter())
            .zip(self.share1.expose().iter())
        {
            *out = a ^ b;
        }
        let secret = SecretBytes::new(scalar);
        scalar.zeroize();
        Ok(secret)
    }

    /// Copies of both shares, still masked.
    #[must_use]
    pub fn export(&self) -> (SecretBytes<P384_SHARE_LEN>, SecretBytes<P384_SHARE_LEN>) {
        (
            SecretBytes::new(*self.share0.expose()),
            SecretBytes::new(*self.share1.expose()),
        )
    }

    /// Raw share bytes for checksum stamping.
    pub(crate) fn raw_shares(&self) -> (&[u8; P384_SHARE_LEN], &[u8; P384_SHARE_LEN]) {
        (self.share0.expose(), self.share1.expose())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
