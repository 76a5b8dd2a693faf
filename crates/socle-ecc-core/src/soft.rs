//! Software reference engine backed by the RustCrypto `p384` crate.
//!
//! [`SoftEngine`] stands in for the hardware accelerator: it computes each
//! request eagerly at `submit` time and buffers the reply until `collect`.
//! Computing at submit keeps the protocol contract that all per-operation
//! randomness (fresh key scalars) is drawn when an operation starts, never
//! when it is finalized.
//!
//! A small slot table keeps engine-resident scalars for hardware-backed
//! keys, so the handle code paths are exercised end-to-end on a host build.

use crate::engine::{EccEngine, EngineFault, EngineReply, EngineRequest, PrivateOperand, PublicPoint};
use crate::hardened::VerificationResult;
use crate::key::P384_SCALAR_LEN;
use crate::memory::SecretBytes;
use p384::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p384::ecdsa::{Signature as RawSignature, SigningKey, VerifyingKey};
use p384::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p384::{EncodedPoint, FieldBytes, PublicKey, SecretKey};
use rand::rngs::OsRng;
use std::collections::HashMap;
use zeroize::Zeroize;

// ---------------------------------------------------------------------------
// SoftEngine
// ---------------------------------------------------------------------------

/// Pure-software compute engine.
///
/// ECDSA signing is deterministic (RFC 6979), so repeated requests over
/// identical inputs produce identical signatures.
pub struct SoftEngine {
    /// Result computed at submit, handed out at collect.
    pending: Option<Result<EngineReply, EngineFault>>,
    /// Engine-resident keys for hardware-backed operation.
    slots: HashMap<u32, SecretKey>,
}

impl SoftEngine {
    /// A fresh engine with no resident keys.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: None,
            slots: HashMap::new(),
        }
    }

    /// Resolve a private operand to a secret key.
    fn resolve(&self, key: &PrivateOperand) -> Result<SecretKey, EngineFault> {
        match key {
            PrivateOperand::Scalar(scalar) => {
                SecretKey::from_bytes(FieldBytes::from_slice(scalar.expose()))
                    .map_err(|_| EngineFault::Rejected("scalar out of range".into()))
            }
            PrivateOperand::Handle(handle) => self
                .slots
                .get(&handle.0)
                .cloned()
                .ok_or(EngineFault::UnknownHandle(handle.0)),
        }
    }

    /// Decode an uncompressed point operand.
    fn decode_point(point: &PublicPoint) -> Result<PublicKey, EngineFault> {
        let encoded = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(&point.x),
            FieldBytes::from_slice(&point.y),
            false,
        );
        Option::from(PublicKey::from_encoded_point(&encoded))
            .ok_or_else(|| EngineFault::Rejected("point not on curve".into()))
    }

    /// Encode a public key as raw coordinates.
    fn encode_point(key: &PublicKey) -> Result<PublicPoint, EngineFault> {
        let encoded = key.to_encoded_point(false);
        let (Some(x), Some(y)) = (encoded.x(), encoded.y()) else {
            return Err(EngineFault::Internal("degenerate public point".into()));
        };
        let mut out = PublicPoint {
            x: [0u8; P384_SCALAR_LEN],
            y: [0u8; P384_SCALAR_LEN],
        };
        out.x.copy_from_slice(x);
        out.y.copy_from_slice(y);
        Ok(out)
    }

    /// Run one request to completion.
    fn run(&mut self, request: EngineRequest) -> Result<EngineReply, EngineFault> {
        match request {
            EngineRequest::GenerateKey { destination } => {
                let secret = SecretKey::random(&mut OsRng);
                let point = Self::encode_point(&secret.public_key())?;
                let private = match destination {
                    Some(handle) => {
                        self.slots.insert(handle.0, secret);
                        None
                    }
                    None => {
                        let mut scalar = [0u8; P384_SCALAR_LEN];
                        scalar.copy_from_slice(&secret.to_bytes());
                        let wrapped = SecretBytes::new(scalar);
                        scalar.zeroize();
                        Some(wrapped)
                    }
                };
                Ok(EngineReply::KeyPair { private, point })
            }

            EngineRequest::Sign { key, digest } => {
                let secret = self.resolve(&key)?;
                let signer = SigningKey::from(&secret);
                let signature: RawSignature = signer
                    .sign_prehash(&digest)
                    .map_err(|e| EngineFault::Internal(format!("signing failed: {e}")))?;
                let (r_bytes, s_bytes) = signature.split_bytes();
                let mut r = [0u8; P384_SCALAR_LEN];
                let mut s = [0u8; P384_SCALAR_LEN];
                r.copy_from_slice(&r_bytes);
                s.copy_from_slice(&s_bytes);
                Ok(EngineReply::Signature { r, s })
            }

            EngineRequest::Verify {
                point,
                digest,
                r,
                s,
            } => {
                let public = Self::decode_point(&point)?;
                let verifier = VerifyingKey::from(public);
                // A signature whose scalars do not decode (zero or >= the
                // group order) is an invalid signature, not an engine fault.
                let Ok(signature) = RawSignature::from_scalars(
                    *FieldBytes::from_slice(&r),
                    *FieldBytes::from_slice(&s),
                ) else {
                    return Ok(EngineReply::Verdict(VerificationResult::FAIL));
                };
                let verdict = match verifier.verify_prehash(&digest, &signature) {
                    Ok(()) => VerificationResult::PASS,
                    Err(_) => VerificationResult::FAIL,
                };
                Ok(EngineReply::Verdict(verdict))
            }

            EngineRequest::Agree { key, point } => {
                let secret = self.resolve(&key)?;
                let peer = Self::decode_point(&point)?;
                let shared =
                    p384::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
                let mut bytes = [0u8; P384_SCALAR_LEN];
                bytes.copy_from_slice(shared.raw_secret_bytes());
                let wrapped = SecretBytes::new(bytes);
                bytes.zeroize();
                Ok(EngineReply::SharedSecret(wrapped))
            }
        }
    }
}

impl Default for SoftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EccEngine for SoftEngine {
    fn submit(&mut self, request: EngineRequest) -> Result<(), EngineFault> {
        if self.pending.is_some() {
            return Err(EngineFault::Internal("request already in flight".into()));
        }
        // Faults are reported at collect time, matching hardware behavior
        // where completion status arrives with the result.
        let outcome = self.run(request);
        self.pending = Some(outcome);
        Ok(())
    }

    fn collect(&mut self) -> Result<EngineReply, EngineFault> {
        self.pending.take().ok_or(EngineFault::NothingPending)?
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
