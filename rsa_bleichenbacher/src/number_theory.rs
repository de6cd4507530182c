use num_bigint::{BigInt, BigUint, ToBigInt};
use num_traits::{One, Zero};

pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = a % &b;
        a = b;
        b = r;
    }
    a
}

/// Returns (g, x, y) such that ax + by = g = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let tmp_r = old_r - &q * &r;
        old_r = r;
        r = tmp_r;

        let tmp_s = old_s - &q * &s;
        old_s = s;
        s = tmp_s;

        let tmp_t = old_t - &q * &t;
        old_t = t;
        t = tmp_t;
    }

    (old_r, old_s, old_t)
}

/// Inverse of `a` modulo `m`, or `None` when gcd(a, m) != 1.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let modulus = m.to_bigint()?;
    let (g, x, _) = extended_gcd(&a.to_bigint()?, &modulus);
    if !g.is_one() {
        return None;
    }
    ((x % &modulus + &modulus) % &modulus).to_biguint()
}

/// Number of bytes needed to hold `n` (the `k` of PKCS#1).
pub fn byte_length(n: &BigUint) -> usize {
    n.bits().div_ceil(8) as usize
}
