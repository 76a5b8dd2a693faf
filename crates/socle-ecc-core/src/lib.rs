//! `socle-ecc-core` — P-384 cryptographic core for SOCLE.
//!
//! This crate is the audit target of the SOCLE root-of-trust stack: zero
//! network, zero async runtime, zero host-service dependencies. It provides
//! ECDSA and ECDH over curve P-384 behind a blinded-key abstraction and a
//! two-phase start/finalize protocol that overlaps caller work with a slow
//! compute engine.
//!
//! Curve arithmetic is not implemented here: it is consumed through the
//! [`EccEngine`] trait (hardware accelerator in production, [`SoftEngine`]
//! on a host). Private scalars exist unmasked only inside that boundary.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod driver;
pub mod engine;
pub mod error;
pub mod hardened;
pub mod key;
pub mod keyblob;
pub mod memory;
pub mod sequencer;
pub mod soft;

mod ecdh;
mod ecdsa;

pub use driver::P384Driver;
pub use engine::{
    EccEngine, EngineFault, EngineReply, EngineRequest, PrivateOperand, PublicPoint,
};
pub use error::CryptoError;
pub use hardened::VerificationResult;
pub use key::{
    BlindedKey, HardwareHandle, HashAlgo, KeyConfig, KeyMode, Keyblob, MessageDigest, Signature,
    UnblindedKey, P384_DIGEST_LEN, P384_POINT_LEN, P384_SCALAR_LEN, P384_SIGNATURE_LEN,
};
pub use keyblob::{MaskedShares, P384_KEYBLOB_LEN, P384_SHARE_LEN};
pub use memory::{LockedRegion, SecretBytes};
pub use sequencer::OpKind;
pub use soft::SoftEngine;
