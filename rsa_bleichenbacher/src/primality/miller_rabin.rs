use crate::primality::PrimalityTest;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::RngCore;

/// Miller-Rabin strong probable prime test
pub struct MillerRabinTest;

impl PrimalityTest for MillerRabinTest {
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RngCore) -> bool {
        let one = BigUint::one();
        let two = BigUint::from(2u32);
        let three = BigUint::from(3u32);

        if *n == two || *n == three {
            return true;
        }
        if *n < two || (n % &two).is_zero() {
            return false;
        }

        let upper = n - &one;
        let mut d = upper.clone();
        let mut s = 0u32;
        while (&d % &two).is_zero() {
            d >>= 1;
            s += 1;
        }

        // witness a in [2, n - 2]
        let a = rng.gen_biguint_range(&two, &upper);
        let mut x = a.modpow(&d, n);

        if x == one || x == upper {
            return true;
        }

        for _ in 1..s {
            x = x.modpow(&two, n);

            if x == upper {
                return true;
            }
            if x == one {
                return false;
            }
        }

        false
    }
}
