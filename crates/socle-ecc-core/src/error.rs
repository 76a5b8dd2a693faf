//! Error types for `socle-ecc-core`.

use thiserror::Error;

/// Errors produced by P-384 operations.
///
/// The set is deliberately closed: every public operation in this crate
/// resolves to `Ok` or to exactly one of these variants, so callers that
/// audit security events can branch on the kind without string matching.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed caller input (wrong digest length, wrong key mode or
    /// keyblob shape, start/finalize called out of order). Recoverable by
    /// correcting the input.
    #[error("bad argument: {0}")]
    BadArgs(String),

    /// Key checksum did not validate. Surfaced distinctly from [`BadArgs`]
    /// because it may indicate corruption or tampering with key material,
    /// and must never be silently retried.
    ///
    /// [`BadArgs`]: CryptoError::BadArgs
    #[error("key integrity check failed: {0}")]
    KeyIntegrity(String),

    /// An operation is already pending on the accelerator. Recoverable by
    /// finalizing (or waiting for) the outstanding operation.
    #[error("accelerator busy: {0}")]
    Busy(String),

    /// The compute engine reported a fault. Propagated as-is; retry policy
    /// belongs to a layer that understands the fault's security implications.
    #[error("compute fault: {0}")]
    ComputeFault(String),
}
