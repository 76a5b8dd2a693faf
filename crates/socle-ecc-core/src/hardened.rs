//! Fault-hardened verification verdicts.
//!
//! A signature verification outcome is never a plain `bool`: a single
//! flipped bit must not be able to turn "rejected" into "accepted". This
//! module encodes the verdict as a 32-bit pattern where the accept and
//! reject values are bitwise complements of each other (Hamming distance
//! 32), and every other pattern classifies as a detected fault.
//!
//! Callers MUST branch on [`VerificationResult::passed`], which matches the
//! accept pattern exactly. The operation status returned alongside a verdict
//! only says whether the operation ran to completion; it says nothing about
//! signature validity.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Raw pattern for a passed verification.
const RAW_PASS: u32 = 0x5AA5_C33C;

/// Raw pattern for a failed verification. Bitwise complement of [`RAW_PASS`],
/// so no single-bit fault maps one onto the other.
const RAW_FAIL: u32 = !RAW_PASS;

// ---------------------------------------------------------------------------
// VerificationResult
// ---------------------------------------------------------------------------

/// Redundantly encoded tri-state verification outcome.
///
/// The three observable states are pass, fail, and fault-detected. Only the
/// exact [`Self::PASS`] pattern reports `true` from [`Self::passed`]; a
/// corrupted pattern reports both `!passed()` and `fault_detected()`.
#[must_use = "a verification verdict must be checked"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationResult(u32);

impl VerificationResult {
    /// The signature passed verification.
    pub const PASS: Self = Self(RAW_PASS);

    /// The signature failed verification.
    pub const FAIL: Self = Self(RAW_FAIL);

    /// Reconstruct a verdict from its raw wire pattern.
    ///
    /// No validation happens here: an unrecognized pattern is preserved and
    /// will classify as fault-detected.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw wire pattern of this verdict.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// `true` only for the exact accept pattern.
    #[must_use]
    pub const fn passed(self) -> bool {
        self.0 == RAW_PASS
    }

    /// `true` only for the exact reject pattern.
    #[must_use]
    pub const fn failed(self) -> bool {
        self.0 == RAW_FAIL
    }

    /// `true` for any pattern that is neither the accept nor the reject
    /// value: the verdict word was corrupted in flight.
    #[must_use]
    pub const fn fault_detected(self) -> bool {
        !self.passed() && !self.failed()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
