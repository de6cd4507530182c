use super::error::{AttackError, AttackResult};
use crate::rsa::pkcs1::to_fixed_bytes;
use num_bigint::BigUint;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Reveals whether a ciphertext decrypts to a PKCS#1 v1.5 conforming block.
///
/// Ciphertexts are passed as big-endian strings of the modulus length.
pub trait PaddingOracle: Sync {
    fn is_padding_valid(&self, ciphertext: &[u8]) -> bool;
}

impl<F> PaddingOracle for F
where
    F: Fn(&[u8]) -> bool + Sync,
{
    fn is_padding_valid(&self, ciphertext: &[u8]) -> bool {
        self(ciphertext)
    }
}

/// Wraps a [`PaddingOracle`] for the attack: blinds multipliers into the
/// target ciphertext, counts queries and enforces the budgets.
pub struct BlindingOracle<'o, O: PaddingOracle + ?Sized> {
    oracle: &'o O,
    n: BigUint,
    e: BigUint,
    c0: BigUint,
    k: usize,
    queries: AtomicU64,
    max_queries: Option<u64>,
    deadline: Option<(Instant, Duration)>,
}

impl<'o, O: PaddingOracle + ?Sized> BlindingOracle<'o, O> {
    pub fn new(oracle: &'o O, n: BigUint, e: BigUint, c0: BigUint) -> Self {
        let k = crate::number_theory::byte_length(&n);
        Self {
            oracle,
            n,
            e,
            c0,
            k,
            queries: AtomicU64::new(0),
            max_queries: None,
            deadline: None,
        }
    }

    pub fn with_max_queries(mut self, max_queries: Option<u64>) -> Self {
        self.max_queries = max_queries;
        self
    }

    /// Starts the clock now.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.deadline = limit.map(|limit| (Instant::now(), limit));
        self
    }

    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// One oracle query on `ciphertext`.
    pub fn is_padding_valid(&self, ciphertext: &BigUint) -> AttackResult<bool> {
        if let Some((started, limit)) = self.deadline {
            let elapsed = started.elapsed();
            if elapsed > limit {
                return Err(AttackError::TimeBudgetExceeded { elapsed });
            }
        }
        let query = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(max) = self.max_queries {
            if query > max {
                self.queries.fetch_sub(1, Ordering::Relaxed);
                return Err(AttackError::QueryBudgetExceeded { queries: max });
            }
        }
        if query % 10_000 == 0 {
            log::debug!("{query} oracle queries so far");
        }
        Ok(self.oracle.is_padding_valid(&to_fixed_bytes(ciphertext, self.k)))
    }

    /// Queries the oracle on `c0 * s^e mod n`, i.e. on the plaintext `m * s`.
    pub fn query_multiplier(&self, s: &BigUint) -> AttackResult<bool> {
        let blinded = (&self.c0 * s.modpow(&self.e, &self.n)) % &self.n;
        let valid = self.is_padding_valid(&blinded)?;
        if valid {
            log::trace!("s = {s:x} conforms");
        }
        Ok(valid)
    }
}
