//! Key material model: blinded and unblinded P-384 keys.
//!
//! This module provides:
//! - [`BlindedKey`] — a private scalar held as a masked two-share keyblob or
//!   a hardware-bound handle, never in the clear
//! - [`UnblindedKey`] — a public curve point with corruption detection
//! - [`MessageDigest`], [`Signature`] — the operation input/output artifacts
//!
//! # Integrity Checksums
//!
//! Both key structs carry a CRC-32 checksum over their visible fields. A key
//! whose checksum does not validate is refused by every operation with
//! [`CryptoError::KeyIntegrity`], distinct from the [`CryptoError::BadArgs`]
//! returned for configuration mismatches: the former may indicate tampering
//! and is expected to be audited separately by callers.
//!
//! # Ownership
//!
//! Keys are caller-owned. The caller allocates and partially populates a key
//! struct (mode plus a reserved keyblob container), a generation operation
//! stamps the checksum, and sign/verify/exchange borrow the struct read-only
//! for the duration of a call.

use crate::error::CryptoError;
use crate::keyblob::{MaskedShares, P384_SHARE_LEN};
use crate::memory::SecretBytes;
use crc::{Crc, CRC_32_ISCSI};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// P-384 scalar length in bytes (384 bits).
pub const P384_SCALAR_LEN: usize = 48;

/// P-384 uncompressed public point length in bytes (x || y coordinates).
pub const P384_POINT_LEN: usize = 96;

/// Required message digest length in bytes (384 bits).
pub const P384_DIGEST_LEN: usize = 48;

/// Packed signature length in bytes (r || s).
pub const P384_SIGNATURE_LEN: usize = 96;

/// Checksum algorithm for key integrity stamping.
const KEY_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// Domain tags fed into the checksum so that a blinded key, an unblinded
/// key, and the two keyblob variants can never validate as one another.
const TAG_BLINDED: u8 = 0xB1;
const TAG_UNBLINDED: u8 = 0xB2;
const TAG_MASKED: u8 = 0x4D;
const TAG_HARDWARE: u8 = 0x48;

// ---------------------------------------------------------------------------
// Key configuration
// ---------------------------------------------------------------------------

/// Algorithm/usage tag for a P-384 key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMode {
    /// ECDSA signing/verification key.
    EcdsaP384,
    /// ECDH key-agreement key (also tags derived shared secrets).
    EcdhP384,
}

impl KeyMode {
    /// Checksum feed byte for this mode.
    const fn tag(self) -> u8 {
        match self {
            Self::EcdsaP384 => 0x01,
            Self::EcdhP384 => 0x02,
        }
    }

    /// Human-readable name for error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EcdsaP384 => "ECDSA/P-384",
            Self::EcdhP384 => "ECDH/P-384",
        }
    }
}

/// Caller-populated key configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyConfig {
    /// Algorithm/usage tag.
    pub mode: KeyMode,
    /// Whether the masked shares may be exported to the caller.
    pub exportable: bool,
}

impl KeyConfig {
    /// A non-exportable configuration for the given mode.
    #[must_use]
    pub const fn new(mode: KeyMode) -> Self {
        Self {
            mode,
            exportable: false,
        }
    }

    /// An exportable configuration for the given mode.
    #[must_use]
    pub const fn exportable(mode: KeyMode) -> Self {
        Self {
            mode,
            exportable: true,
        }
    }
}

/// Opaque reference to a key slot inside the compute engine.
///
/// The referenced scalar never leaves the engine; this handle is forwarded
/// verbatim and is never decoded by the keyblob codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HardwareHandle(pub u32);

// ---------------------------------------------------------------------------
// Keyblob
// ---------------------------------------------------------------------------

/// The two ways a private scalar can be supplied to a compute operation
/// without being exposed.
#[derive(Debug)]
pub enum Keyblob {
    /// Software-masked two-share encoding; see [`MaskedShares`].
    Masked(MaskedShares),
    /// Engine-resident key referenced by an opaque handle.
    Hardware(HardwareHandle),
}

impl Keyblob {
    /// `true` for engine-resident keys.
    #[must_use]
    pub const fn is_hardware(&self) -> bool {
        matches!(self, Self::Hardware(_))
    }

    fn feed_checksum(&self, digest: &mut crc::Digest<'_, u32>) {
        match self {
            Self::Masked(shares) => {
                digest.update(&[TAG_MASKED]);
                let (share0, share1) = shares.raw_shares();
                digest.update(share0);
                digest.update(share1);
            }
            Self::Hardware(handle) => {
                digest.update(&[TAG_HARDWARE]);
                digest.update(&handle.0.to_le_bytes());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// BlindedKey
// ---------------------------------------------------------------------------

/// A private P-384 scalar that is never materialized unmasked outside the
/// compute engine boundary.
///
/// The caller allocates the struct with the intended mode and keyblob
/// container; a keygen (or exchange) operation fills the container and
/// stamps [`Self::checksum`]. Every consuming operation validates the
/// checksum before use.
#[must_use = "a blinded key must be stored or destroyed by its owner"]
#[derive(Debug)]
pub struct BlindedKey {
    /// Caller-populated configuration.
    pub config: KeyConfig,
    /// Masked shares or hardware handle.
    pub keyblob: Keyblob,
    /// Integrity checksum over the visible fields; stamped by generation.
    pub checksum: u32,
}

impl BlindedKey {
    /// Allocate a software-masked key container for the given configuration.
    ///
    /// The keyblob is zero-filled and the checksum unstamped: the key is not
    /// usable until a generation operation populates it.
    pub fn new_masked(config: KeyConfig) -> Self {
        Self {
            config,
            keyblob: Keyblob::Masked(MaskedShares::zeroed()),
            checksum: 0,
        }
    }

    /// Allocate a hardware-backed key referencing an engine slot.
    pub const fn new_hardware(config: KeyConfig, handle: HardwareHandle) -> Self {
        Self {
            config,
            keyblob: Keyblob::Hardware(handle),
            checksum: 0,
        }
    }

    /// Compute the checksum of the visible fields.
    #[must_use]
    pub fn compute_checksum(&self) -> u32 {
        let mut digest = KEY_CRC.digest();
        digest.update(&[TAG_BLINDED, self.config.mode.tag(), u8::from(self.config.exportable)]);
        self.keyblob.feed_checksum(&mut digest);
        digest.finalize()
    }

    /// Stamp the checksum field from the current contents.
    pub fn stamp_checksum(&mut self) {
        self.checksum = self.compute_checksum();
    }

    /// Validate the stored checksum against the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyIntegrity`] on mismatch.
    pub fn verify_integrity(&self) -> Result<(), CryptoError> {
        if self.checksum != self.compute_checksum() {
            return Err(CryptoError::KeyIntegrity(
                "blinded key checksum mismatch".into(),
            ));
        }
        Ok(())
    }

    /// Export copies of the two masked shares.
    ///
    /// The caller owns the key material; exporting the shares keeps the
    /// masking intact, so the core still never emits an unmasked scalar.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if the key is not exportable or is
    /// hardware-backed, [`CryptoError::KeyIntegrity`] if the checksum does
    /// not validate.
    pub fn export_shares(
        &self,
    ) -> Result<(SecretBytes<P384_SHARE_LEN>, SecretBytes<P384_SHARE_LEN>), CryptoError> {
        if !self.config.exportable {
            return Err(CryptoError::BadArgs("key is not exportable".into()));
        }
        self.verify_integrity()?;
        match &self.keyblob {
            Keyblob::Masked(shares) => Ok(shares.export()),
            Keyblob::Hardware(_) => Err(CryptoError::BadArgs(
                "hardware-backed keys cannot be exported".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// UnblindedKey
// ---------------------------------------------------------------------------

/// A public P-384 curve point.
///
/// No confidentiality requirement, but the checksum still detects
/// corruption between generation and use.
#[must_use = "a public key must be stored or published"]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnblindedKey {
    /// Algorithm/usage tag.
    pub mode: KeyMode,
    /// Uncompressed point, big-endian `x || y`, [`P384_POINT_LEN`] bytes.
    pub point: Vec<u8>,
    /// Integrity checksum; stamped by generation.
    pub checksum: u32,
}

impl UnblindedKey {
    /// Allocate a zero-filled public key container for the given mode.
    pub fn new_for(mode: KeyMode) -> Self {
        Self {
            mode,
            point: vec![0; P384_POINT_LEN],
            checksum: 0,
        }
    }

    /// Build a stamped public key from raw coordinates.
    pub fn from_coordinates(
        mode: KeyMode,
        x: [u8; P384_SCALAR_LEN],
        y: [u8; P384_SCALAR_LEN],
    ) -> Self {
        let mut key = Self {
            mode,
            point: [x, y].concat(),
            checksum: 0,
        };
        key.stamp_checksum();
        key
    }

    /// Compute the checksum of the visible fields.
    #[must_use]
    pub fn compute_checksum(&self) -> u32 {
        let mut digest = KEY_CRC.digest();
        digest.update(&[TAG_UNBLINDED, self.mode.tag()]);
        digest.update(&self.point);
        digest.finalize()
    }

    /// Stamp the checksum field from the current contents.
    pub fn stamp_checksum(&mut self) {
        self.checksum = self.compute_checksum();
    }

    /// Validate the stored checksum against the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyIntegrity`] on mismatch.
    pub fn verify_integrity(&self) -> Result<(), CryptoError> {
        if self.checksum != self.compute_checksum() {
            return Err(CryptoError::KeyIntegrity(
                "public key checksum mismatch".into(),
            ));
        }
        Ok(())
    }

    /// Split the point buffer into its coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if the buffer is not exactly
    /// [`P384_POINT_LEN`] bytes.
    pub fn coordinates(
        &self,
    ) -> Result<([u8; P384_SCALAR_LEN], [u8; P384_SCALAR_LEN]), CryptoError> {
        if self.point.len() != P384_POINT_LEN {
            return Err(CryptoError::BadArgs(format!(
                "invalid public point length: {} bytes (expected {P384_POINT_LEN})",
                self.point.len()
            )));
        }
        let mut x = [0u8; P384_SCALAR_LEN];
        let mut y = [0u8; P384_SCALAR_LEN];
        x.copy_from_slice(&self.point[..P384_SCALAR_LEN]);
        y.copy_from_slice(&self.point[P384_SCALAR_LEN..]);
        Ok((x, y))
    }
}

// ---------------------------------------------------------------------------
// MessageDigest
// ---------------------------------------------------------------------------

/// Hash algorithm tag carried alongside a digest.
///
/// The tag is accepted untouched: this core treats digests as raw bytes and
/// the caller bears responsibility that the hash's security strength is not
/// less than the curve's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlgo {
    /// SHA-384.
    Sha2_384,
    /// SHA3-384.
    Sha3_384,
}

/// A pre-computed message digest, caller-owned and read-only.
///
/// Operations require exactly [`P384_DIGEST_LEN`] bytes; the length is
/// checked at operation start, not at construction, so transport layers can
/// pass digests through without validating them.
#[derive(Clone, Debug)]
pub struct MessageDigest {
    /// Hash algorithm tag.
    pub algo: HashAlgo,
    /// Raw digest bytes.
    pub bytes: Vec<u8>,
}

impl MessageDigest {
    /// Wrap raw digest bytes with their algorithm tag.
    #[must_use]
    pub const fn new(algo: HashAlgo, bytes: Vec<u8>) -> Self {
        Self { algo, bytes }
    }

    /// The digest as a fixed-width array.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if the digest is not exactly
    /// [`P384_DIGEST_LEN`] bytes.
    pub fn as_array(&self) -> Result<[u8; P384_DIGEST_LEN], CryptoError> {
        if self.bytes.len() != P384_DIGEST_LEN {
            return Err(CryptoError::BadArgs(format!(
                "invalid digest length: {} bytes (expected {P384_DIGEST_LEN})",
                self.bytes.len()
            )));
        }
        let mut out = [0u8; P384_DIGEST_LEN];
        out.copy_from_slice(&self.bytes);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// An ECDSA/P-384 signature: the `(r, s)` scalar pair.
#[must_use = "a signature must be stored or transmitted"]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The `r` scalar, big-endian.
    pub r: [u8; P384_SCALAR_LEN],
    /// The `s` scalar, big-endian.
    pub s: [u8; P384_SCALAR_LEN],
}

impl Signature {
    /// Unpack a signature from its `r || s` wire encoding.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::BadArgs`] if the buffer is not exactly
    /// [`P384_SIGNATURE_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != P384_SIGNATURE_LEN {
            return Err(CryptoError::BadArgs(format!(
                "invalid signature length: {} bytes (expected {P384_SIGNATURE_LEN})",
                bytes.len()
            )));
        }
        let mut r = [0u8; P384_SCALAR_LEN];
        let mut s = [0u8; P384_SCALAR_LEN];
        r.copy_from_slice(&bytes[..P384_SCALAR_LEN]);
        s.copy_from_slice(&bytes[P384_SCALAR_LEN..]);
        Ok(Self { r, s })
    }

    /// Pack the signature into its `r || s` wire encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; P384_SIGNATURE_LEN] {
        let mut out = [0u8; P384_SIGNATURE_LEN];
        out[..P384_SCALAR_LEN].copy_from_slice(&self.r);
        out[P384_SCALAR_LEN..].copy_from_slice(&self.s);
        out
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
