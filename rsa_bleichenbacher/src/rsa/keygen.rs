use crate::number_theory::{gcd, mod_inverse};
use crate::primality::{MillerRabinTest, PrimalityTest};
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{RngCore, thread_rng};

pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

/// RSA public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

impl RsaPublicKey {
    pub fn new(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    /// Modulus length in bytes
    pub fn modulus_len(&self) -> usize {
        crate::number_theory::byte_length(&self.n)
    }
}

/// RSA public and private key
#[derive(Clone, Debug)]
pub struct RsaKeyPair {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    #[doc(hidden)]
    pub(crate) p: BigUint,
    #[doc(hidden)]
    pub(crate) q: BigUint,
}

impl RsaKeyPair {
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey::new(self.n.clone(), self.e.clone())
    }

    #[doc(hidden)]
    pub fn get_p(&self) -> &BigUint {
        &self.p
    }

    #[doc(hidden)]
    pub fn get_q(&self) -> &BigUint {
        &self.q
    }
}

/// RSA key generation service
pub struct RsaKeyGenerator {
    confidence: f64,
    bit_length: usize,
    public_exponent: BigUint,
}

impl RsaKeyGenerator {
    pub fn new(confidence: f64, bit_length: usize) -> Self {
        Self {
            confidence,
            bit_length,
            public_exponent: BigUint::from(DEFAULT_PUBLIC_EXPONENT),
        }
    }

    pub fn with_public_exponent(mut self, e: BigUint) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn generate_keypair(&self) -> RsaKeyPair {
        self.generate_keypair_with_rng(&mut thread_rng())
    }

    /// Generates a key pair from the given randomness source.
    /// Rejects keys with close primes (Fermat) and short private exponents (Wiener).
    pub fn generate_keypair_with_rng<R: RngCore>(&self, rng: &mut R) -> RsaKeyPair {
        let test = MillerRabinTest;
        let one = BigUint::one();
        let e = &self.public_exponent;
        let half_bits = (self.bit_length / 2).max(2) as u64;
        let min_diff = BigUint::one() << (self.bit_length / 4);

        loop {
            let p = loop {
                let candidate = self.prime_candidate(rng, half_bits);
                if test.is_probably_prime(&candidate, self.confidence, &mut *rng) {
                    break candidate;
                }
            };

            let q = loop {
                let candidate = self.prime_candidate(rng, half_bits);
                let far_enough = if p > candidate {
                    &p - &candidate > min_diff
                } else {
                    &candidate - &p > min_diff
                };
                if far_enough && test.is_probably_prime(&candidate, self.confidence, &mut *rng) {
                    break candidate;
                }
            };

            let n = &p * &q;
            if n.bits() < self.bit_length as u64 {
                continue;
            }

            let phi = (&p - &one) * (&q - &one);
            if gcd(e, &phi) != one {
                continue;
            }

            let Some(d) = mod_inverse(e, &phi) else {
                continue;
            };
            if d.bits() < (self.bit_length / 4) as u64 {
                continue;
            }

            log::debug!("generated {}-bit RSA modulus", n.bits());
            return RsaKeyPair { n, e: e.clone(), d, p, q };
        }
    }

    fn prime_candidate<R: RngCore>(&self, rng: &mut R, bits: u64) -> BigUint {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        candidate
    }
}
