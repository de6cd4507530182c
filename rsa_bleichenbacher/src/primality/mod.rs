pub(crate) mod miller_rabin;
pub use miller_rabin::MillerRabinTest;

use num_bigint::BigUint;
use rand::RngCore;

/// Probabilistic primality test.
/// The public entry point is fixed; implementors supply a single round.
pub trait PrimalityTest {
    /// True if `n` is prime with at least the given confidence.
    fn is_probably_prime(&self, n: &BigUint, confidence: f64, rng: &mut dyn RngCore) -> bool {
        let iterations = confidence_to_iterations(confidence);
        for _ in 0..iterations {
            if !self.run_iteration(n, rng) {
                return false;
            }
        }
        true
    }

    /// One round with a fresh random witness.
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RngCore) -> bool;
}

fn confidence_to_iterations(confidence: f64) -> u32 {
    // Each round errs with probability at most 1/2:
    // confidence = 1 - (1/2)^k  =>  k = log2(1 / (1 - confidence))
    let iterations = ((1.0 / (1.0 - confidence)).log2().ceil()) as u32;
    iterations.max(1)
}
