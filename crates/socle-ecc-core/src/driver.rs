//! Operation façade: the P-384 driver context.
//!
//! [`P384Driver`] owns the sequencer (and through it the compute engine)
//! and exposes the public operation surface: for each of ECDSA keygen /
//! sign / verify and ECDH keygen / exchange there is a synchronous entry
//! point plus a `_start` / `_finalize` pair. A synchronous call is exactly
//! start followed by finalize with nothing in between; callers that want to
//! overlap work with the accelerator use the pair directly.
//!
//! The ECDSA operations live in the `ecdsa` module and the ECDH operations
//! in the `ecdh` module; this module carries the context type and the
//! validation helpers they share.

use crate::engine::{EccEngine, EngineReply, EngineRequest, PrivateOperand, PublicPoint};
use crate::error::CryptoError;
use crate::key::{BlindedKey, KeyMode, Keyblob, UnblindedKey};
use crate::keyblob::MaskedShares;
use crate::sequencer::{OpKind, Sequencer};

// ---------------------------------------------------------------------------
// P384Driver
// ---------------------------------------------------------------------------

/// Driver context for P-384 operations over one compute engine.
///
/// The engine is an explicit constructor argument rather than ambient
/// state: each driver instance serializes its own engine, and independent
/// instances are fully isolated.
pub struct P384Driver<E: EccEngine> {
    pub(crate) sequencer: Sequencer<E>,
}

impl<E: EccEngine> P384Driver<E> {
    /// Wrap an engine in a fresh, idle driver.
    pub const fn new(engine: E) -> Self {
        Self {
            sequencer: Sequencer::new(engine),
        }
    }

    /// `true` when no operation is outstanding.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.sequencer.pending().is_none()
    }

    /// The kind of the outstanding operation, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<OpKind> {
        self.sequencer.pending()
    }
}

// ---------------------------------------------------------------------------
// Shared validation helpers
// ---------------------------------------------------------------------------

/// Validate a private key for a consuming operation (sign, exchange):
/// configuration first, then integrity.
pub(crate) fn validate_blinded(key: &BlindedKey, mode: KeyMode) -> Result<(), CryptoError> {
    if key.config.mode != mode {
        return Err(CryptoError::BadArgs(format!(
            "private key mode is {}, operation requires {}",
            key.config.mode.as_str(),
            mode.as_str()
        )));
    }
    key.verify_integrity()
}

/// Validate a public key for a consuming operation (verify, exchange).
pub(crate) fn validate_unblinded(key: &UnblindedKey, mode: KeyMode) -> Result<(), CryptoError> {
    if key.mode != mode {
        return Err(CryptoError::BadArgs(format!(
            "public key mode is {}, operation requires {}",
            key.mode.as_str(),
            mode.as_str()
        )));
    }
    key.verify_integrity()
}

/// Validate a keygen destination: configuration only, since the checksum is
/// stamped by the generation itself.
pub(crate) fn validate_keygen_destination(
    key: &BlindedKey,
    mode: KeyMode,
) -> Result<(), CryptoError> {
    if key.config.mode != mode {
        return Err(CryptoError::BadArgs(format!(
            "private key mode is {}, keygen requires {}",
            key.config.mode.as_str(),
            mode.as_str()
        )));
    }
    Ok(())
}

/// Build the private operand for an engine request. For a masked key this
/// is the single place a scalar is reconstructed; the result moves into the
/// request and is zeroized inside the engine boundary.
pub(crate) fn private_operand(key: &BlindedKey) -> Result<PrivateOperand, CryptoError> {
    match &key.keyblob {
        Keyblob::Masked(shares) => Ok(PrivateOperand::Scalar(shares.unmask()?)),
        Keyblob::Hardware(handle) => Ok(PrivateOperand::Handle(*handle)),
    }
}

/// Build the point operand for an engine request.
pub(crate) fn point_operand(key: &UnblindedKey) -> Result<PublicPoint, CryptoError> {
    let (x, y) = key.coordinates()?;
    Ok(PublicPoint { x, y })
}

/// The keygen request matching a destination keyblob.
pub(crate) fn keygen_request(key: &BlindedKey) -> EngineRequest {
    match &key.keyblob {
        Keyblob::Masked(_) => EngineRequest::GenerateKey { destination: None },
        Keyblob::Hardware(handle) => EngineRequest::GenerateKey {
            destination: Some(*handle),
        },
    }
}

/// Package a keygen reply into the caller's key structs: re-mask a fresh
/// scalar into the private container (or confirm the hardware destination),
/// write the public point, and stamp both checksums.
pub(crate) fn finish_keygen(
    reply: EngineReply,
    private_key: &mut BlindedKey,
    public_key: &mut UnblindedKey,
    mode: KeyMode,
) -> Result<(), CryptoError> {
    let EngineReply::KeyPair { private, point } = reply else {
        return Err(CryptoError::ComputeFault(
            "engine returned a mismatched reply".into(),
        ));
    };

    match (&mut private_key.keyblob, private) {
        (Keyblob::Masked(container), Some(scalar)) => {
            *container = MaskedShares::mask(&scalar)?;
        }
        (Keyblob::Hardware(_), None) => {}
        _ => {
            return Err(CryptoError::BadArgs(
                "private key container does not match the started request".into(),
            ));
        }
    }
    private_key.stamp_checksum();

    public_key.mode = mode;
    public_key.point = [point.x, point.y].concat();
    public_key.stamp_checksum();
    Ok(())
}
