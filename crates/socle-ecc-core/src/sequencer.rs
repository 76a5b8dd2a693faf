//! Asynchronous operation sequencer.
//!
//! The compute engine is a single exclusive resource: it cannot run two
//! operations at once, and its completion must be collected by the matching
//! finalize call. The sequencer serializes access with an explicit
//! `Idle`/`Pending(kind)` state held in the owning driver instance, not in
//! global state, so independent drivers (each with their own engine) can
//! coexist in tests.
//!
//! Transitions:
//! - `begin` is valid only when idle; a second `begin` fails with `Busy`
//!   rather than queuing.
//! - `complete` is valid only for the pending kind; a mismatched kind fails
//!   with `BadArgs` and leaves the pending operation finalizable.
//! - Once a matching `complete` starts, the sequencer returns to idle even
//!   when the engine faults, so a fault can never leave the resource stuck.
//!
//! There is no cancellation and no timeout: after a successful `begin`, the
//! matching `complete` must eventually be called.

use crate::engine::{EccEngine, EngineReply, EngineRequest};
use crate::error::CryptoError;

// ---------------------------------------------------------------------------
// OpKind
// ---------------------------------------------------------------------------

/// The kind of operation outstanding on the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    /// ECDSA key generation.
    EcdsaKeygen,
    /// ECDSA signature generation.
    EcdsaSign,
    /// ECDSA signature verification.
    EcdsaVerify,
    /// ECDH key generation.
    EcdhKeygen,
    /// ECDH shared-secret derivation.
    EcdhExchange,
}

impl OpKind {
    /// Human-readable name for error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EcdsaKeygen => "ECDSA keygen",
            Self::EcdsaSign => "ECDSA sign",
            Self::EcdsaVerify => "ECDSA verify",
            Self::EcdhKeygen => "ECDH keygen",
            Self::EcdhExchange => "ECDH exchange",
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// The `Idle`/`Pending(kind)` state machine guarding one engine.
pub(crate) struct Sequencer<E: EccEngine> {
    engine: E,
    pending: Option<OpKind>,
}

impl<E: EccEngine> Sequencer<E> {
    pub(crate) const fn new(engine: E) -> Self {
        Self {
            engine,
            pending: None,
        }
    }

    /// The kind of the outstanding operation, if any.
    pub(crate) const fn pending(&self) -> Option<OpKind> {
        self.pending
    }

    /// Issue a request and transition to `Pending(kind)`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Busy`] if an operation is already pending,
    /// [`CryptoError::ComputeFault`] if the engine refuses the request (the
    /// sequencer stays idle in that case).
    pub(crate) fn begin(
        &mut self,
        kind: OpKind,
        request: EngineRequest,
    ) -> Result<(), CryptoError> {
        if let Some(active) = self.pending {
            return Err(CryptoError::Busy(format!(
                "{} operation pending",
                active.as_str()
            )));
        }
        self.engine
            .submit(request)
            .map_err(|fault| CryptoError::ComputeFault(fault.to_string()))?;
        self.pending = Some(kind);
        Ok(())
    }

    /// Collect the result of the pending operation and return to idle.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if nothing is pending or the pending
    /// kind does not match (the pending operation is left untouched), and
    /// [`CryptoError::ComputeFault`] if the engine faulted. The pending
    /// marker is cleared before collecting, so a fault still returns the
    /// sequencer to idle.
    pub(crate) fn complete(&mut self, expected: OpKind) -> Result<EngineReply, CryptoError> {
        match self.pending {
            None => Err(CryptoError::BadArgs(
                "no operation pending to finalize".into(),
            )),
            Some(active) if active != expected => Err(CryptoError::BadArgs(format!(
                "pending operation is {}, not {}",
                active.as_str(),
                expected.as_str()
            ))),
            Some(_) => {
                self.pending = None;
                self.engine
                    .collect()
                    .map_err(|fault| CryptoError::ComputeFault(fault.to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
