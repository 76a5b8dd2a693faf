//! Compute engine boundary.
//!
//! The curve arithmetic itself is out of scope for this crate: it is
//! performed by an external compute engine (a hardware accelerator in
//! production, [`SoftEngine`] in tests and host builds) consumed through
//! the [`EccEngine`] trait.
//!
//! The request/reply types defined here are the only place in the crate
//! where an unmasked private scalar may transiently exist: a scalar enters
//! a request as a [`SecretBytes`] value and is zeroized when the request is
//! dropped inside the engine.
//!
//! [`SoftEngine`]: crate::soft::SoftEngine

use crate::hardened::VerificationResult;
use crate::key::{HardwareHandle, P384_DIGEST_LEN, P384_SCALAR_LEN};
use crate::memory::SecretBytes;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Faults
// ---------------------------------------------------------------------------

/// Faults reported by a compute engine.
///
/// All variants surface to callers as [`CryptoError::ComputeFault`];
/// structural validation of caller input happens before a request is built,
/// so an engine fault always means the accelerator (or its operands, as the
/// accelerator sees them) misbehaved.
///
/// [`CryptoError::ComputeFault`]: crate::error::CryptoError::ComputeFault
#[derive(Debug, Error)]
pub enum EngineFault {
    /// The engine rejected an operand (e.g. a scalar out of range or a
    /// point not on the curve).
    #[error("engine rejected operand: {0}")]
    Rejected(String),

    /// No key is resident at the referenced hardware slot.
    #[error("no engine key at slot {0}")]
    UnknownHandle(u32),

    /// `collect` was called with no request in flight.
    #[error("no request in flight")]
    NothingPending,

    /// The engine failed internally.
    #[error("engine internal fault: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Operands
// ---------------------------------------------------------------------------

/// An uncompressed public curve point, big-endian coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicPoint {
    /// The x coordinate.
    pub x: [u8; P384_SCALAR_LEN],
    /// The y coordinate.
    pub y: [u8; P384_SCALAR_LEN],
}

/// A private scalar operand: either the reconstructed scalar itself
/// (zeroized on drop) or a reference to an engine-resident key.
#[derive(Debug)]
pub enum PrivateOperand {
    /// Unmasked scalar, alive only for the duration of the engine call.
    Scalar(SecretBytes<P384_SCALAR_LEN>),
    /// Opaque engine slot reference; the scalar never leaves the engine.
    Handle(HardwareHandle),
}

// ---------------------------------------------------------------------------
// Requests and replies
// ---------------------------------------------------------------------------

/// A request issued to the compute engine at operation start.
#[derive(Debug)]
pub enum EngineRequest {
    /// Generate a fresh key pair. With a destination handle the private
    /// scalar stays resident in the engine; without one it is returned in
    /// the reply for immediate re-masking.
    GenerateKey {
        /// Engine slot to generate into, for hardware-backed keys.
        destination: Option<HardwareHandle>,
    },
    /// Produce an ECDSA signature over a digest.
    Sign {
        /// Private scalar or handle.
        key: PrivateOperand,
        /// Message digest, big-endian.
        digest: [u8; P384_DIGEST_LEN],
    },
    /// Check an ECDSA signature against a digest and public point.
    Verify {
        /// Public point to verify against.
        point: PublicPoint,
        /// Message digest, big-endian.
        digest: [u8; P384_DIGEST_LEN],
        /// Signature `r` scalar.
        r: [u8; P384_SCALAR_LEN],
        /// Signature `s` scalar.
        s: [u8; P384_SCALAR_LEN],
    },
    /// Diffie-Hellman: multiply a peer point by the private scalar.
    Agree {
        /// Private scalar or handle.
        key: PrivateOperand,
        /// Peer public point.
        point: PublicPoint,
    },
}

/// The result collected from the compute engine at operation finalize.
#[derive(Debug)]
pub enum EngineReply {
    /// A generated key pair. `private` is `None` when the scalar was
    /// generated into an engine slot.
    KeyPair {
        /// Fresh private scalar, absent for hardware-resident keys.
        private: Option<SecretBytes<P384_SCALAR_LEN>>,
        /// Matching public point.
        point: PublicPoint,
    },
    /// A signature.
    Signature {
        /// The `r` scalar.
        r: [u8; P384_SCALAR_LEN],
        /// The `s` scalar.
        s: [u8; P384_SCALAR_LEN],
    },
    /// A hardened verification verdict.
    Verdict(VerificationResult),
    /// The x coordinate of the Diffie-Hellman shared point.
    SharedSecret(SecretBytes<P384_SCALAR_LEN>),
}

// ---------------------------------------------------------------------------
// EccEngine
// ---------------------------------------------------------------------------

/// The compute service consumed by this crate.
///
/// An engine accepts one request at a time: `submit` issues it, `collect`
/// blocks until the result is available and consumes it. Serialization of
/// requests is enforced above this trait by the operation sequencer; an
/// engine may additionally fault on overlapping submits.
pub trait EccEngine {
    /// Issue a request. Returns once the engine has accepted it; the
    /// computation itself may still be running.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineFault`] if the request cannot be accepted.
    fn submit(&mut self, request: EngineRequest) -> Result<(), EngineFault>;

    /// Block until the in-flight request completes and return its result.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineFault`] if no request is in flight or the
    /// computation faulted.
    fn collect(&mut self) -> Result<EngineReply, EngineFault>;
}
