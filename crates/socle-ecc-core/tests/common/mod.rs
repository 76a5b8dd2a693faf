//! Shared test support: a fault-injecting engine wrapper and key helpers.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use socle_ecc_core::{
    BlindedKey, EccEngine, EngineFault, EngineReply, EngineRequest, HashAlgo, KeyConfig, KeyMode,
    MessageDigest, P384Driver, SoftEngine, UnblindedKey, P384_DIGEST_LEN, P384_SCALAR_LEN,
};

/// Arms faults on a [`FaultyEngine`] after it has moved into a driver.
#[derive(Clone)]
pub struct FaultSwitch {
    flag: Rc<Cell<bool>>,
}

impl FaultSwitch {
    /// Arm a fault: the engine's next collect discards the real result and
    /// reports an internal engine fault instead.
    pub fn arm(&self) {
        self.flag.set(true);
    }
}

/// Engine wrapper that can be scripted to fault on the next collect,
/// standing in for a glitching accelerator.
pub struct FaultyEngine {
    inner: SoftEngine,
    fail_next_collect: Rc<Cell<bool>>,
}

impl FaultyEngine {
    pub fn new() -> (Self, FaultSwitch) {
        let flag = Rc::new(Cell::new(false));
        let engine = Self {
            inner: SoftEngine::new(),
            fail_next_collect: Rc::clone(&flag),
        };
        (engine, FaultSwitch { flag })
    }
}

impl EccEngine for FaultyEngine {
    fn submit(&mut self, request: EngineRequest) -> Result<(), EngineFault> {
        self.inner.submit(request)
    }

    fn collect(&mut self) -> Result<EngineReply, EngineFault> {
        if self.fail_next_collect.replace(false) {
            // Drain the real result so the inner engine is reusable.
            let _ = self.inner.collect();
            return Err(EngineFault::Internal("injected accelerator fault".into()));
        }
        self.inner.collect()
    }
}

/// A generated ECDSA key pair on the given driver.
pub fn ecdsa_keypair<E: EccEngine>(driver: &mut P384Driver<E>) -> (BlindedKey, UnblindedKey) {
    let mut private_key = BlindedKey::new_masked(KeyConfig::new(KeyMode::EcdsaP384));
    let mut public_key = UnblindedKey::new_for(KeyMode::EcdsaP384);
    driver
        .ecdsa_keygen(&mut private_key, &mut public_key)
        .expect("ECDSA keygen should succeed");
    (private_key, public_key)
}

/// A generated ECDH key pair on the given driver.
pub fn ecdh_keypair<E: EccEngine>(driver: &mut P384Driver<E>) -> (BlindedKey, UnblindedKey) {
    let mut private_key = BlindedKey::new_masked(KeyConfig::new(KeyMode::EcdhP384));
    let mut public_key = UnblindedKey::new_for(KeyMode::EcdhP384);
    driver
        .ecdh_keygen(&mut private_key, &mut public_key)
        .expect("ECDH keygen should succeed");
    (private_key, public_key)
}

/// An exportable masked ECDH container for shared-secret output.
pub fn shared_secret_container() -> BlindedKey {
    BlindedKey::new_masked(KeyConfig::exportable(KeyMode::EcdhP384))
}

/// A 48-byte digest filled with one byte value.
pub fn digest(fill: u8) -> MessageDigest {
    MessageDigest::new(HashAlgo::Sha2_384, vec![fill; P384_DIGEST_LEN])
}

/// XOR an exportable blinded key's shares back together.
pub fn unmask_exported(key: &BlindedKey) -> [u8; P384_SCALAR_LEN] {
    let (share0, share1) = key.export_shares().expect("export should succeed");
    let mut value = [0u8; P384_SCALAR_LEN];
    for ((out, a), b) in value
        .iter_mut()
        .zip(share0.expose().iter())
        .zip(share1.expose().iter())
    {
        *out = a ^ b;
    }
    value
}
