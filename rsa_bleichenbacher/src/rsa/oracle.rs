use crate::attacks::bleichenbacher::PaddingOracle;
use crate::rsa::pkcs1;
use crate::rsa::rsa::RsaService;
use num_bigint::BigUint;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which plaintexts the oracle accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleMode {
    /// Full PKCS#1 v1.5 block type 2 check.
    Strict,
    /// Only the leading `00 02`.
    PrefixOnly,
}

/// Padding oracle backed by the private key: decrypts and reports whether
/// the block is conforming, nothing else.
pub struct DecryptionOracle {
    service: RsaService,
    mode: OracleMode,
    calls: AtomicU64,
}

impl DecryptionOracle {
    pub fn new(service: RsaService, mode: OracleMode) -> Self {
        Self {
            service,
            mode,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PaddingOracle for DecryptionOracle {
    fn is_padding_valid(&self, ciphertext: &[u8]) -> bool {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let c = BigUint::from_bytes_be(ciphertext);
        if c >= self.service.keypair().n {
            return false;
        }
        let block = self.service.decrypt_block(&c);
        match self.mode {
            OracleMode::Strict => pkcs1::is_conforming(&block),
            OracleMode::PrefixOnly => pkcs1::has_conforming_prefix(&block),
        }
    }
}
