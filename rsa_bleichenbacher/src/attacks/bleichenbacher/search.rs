//! Step 2: finding the next conforming multiplier `s`.

use super::error::AttackResult;
use super::interval::Interval;
use super::oracle::{BlindingOracle, PaddingOracle};
use super::rational::BigRational;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use rayon::prelude::*;

pub struct MultiplierSearch<'a, 'o, O: PaddingOracle + ?Sized> {
    oracle: &'a BlindingOracle<'o, O>,
    bound: &'a BigUint,
    batch_size: usize,
}

impl<'a, 'o, O: PaddingOracle + ?Sized> MultiplierSearch<'a, 'o, O> {
    /// `bound` is B = 2^(8(k-2)). With `batch_size > 1` consecutive
    /// candidates are tested in parallel and the lowest conforming one wins.
    pub fn new(oracle: &'a BlindingOracle<'o, O>, bound: &'a BigUint, batch_size: usize) -> Self {
        Self {
            oracle,
            bound,
            batch_size: batch_size.max(1),
        }
    }

    /// Step 2a: smallest conforming `s >= ceil(n / 3B)`.
    pub fn first(&self) -> AttackResult<BigUint> {
        let n = self.oracle.modulus();
        let start = BigRational::from_fraction(n, &(self.bound * 3u32)).ceil();
        log::debug!("step 2a: scanning from s = {start:x}");
        self.scan_from(non_negative(start))
    }

    /// Step 2b: smallest conforming `s > prev_s`.
    pub fn next_after(&self, prev_s: &BigUint) -> AttackResult<BigUint> {
        log::debug!("step 2b: scanning from s = {prev_s:x} + 1");
        self.scan_from(prev_s + 1u32)
    }

    /// Step 2c: with a single interval `[a, b]` left, walk `r` upwards from
    /// `ceil(2(b*prev_s - 2B) / n)` and scan `s` over
    /// `[ceil((2B + rn) / b), ceil((3B + rn) / a))` for each `r`.
    pub fn within(&self, interval: &Interval, prev_s: &BigUint) -> AttackResult<BigUint> {
        let n = self.oracle.modulus();
        let n_int = BigInt::from(n.clone());
        let n_q = BigRational::from(n);
        let two_b = BigRational::from(self.bound * 2u32);
        let three_b = BigRational::from(self.bound * 3u32);
        let (a, b) = (interval.min(), interval.max());

        let numer = BigRational::from(2u64) * (b * &BigRational::from(prev_s) - &two_b);
        let mut r = (numer / &n_q).ceil();
        log::debug!("step 2c: r starts at {r:x}");

        loop {
            let rn = BigRational::from(&r * &n_int);
            let lower = non_negative(((&two_b + &rn) / b).ceil());
            let upper = non_negative(((&three_b + &rn) / a).ceil());
            if let Some(s) = self.scan_window(lower, &upper)? {
                return Ok(s);
            }
            r += 1u32;
        }
    }

    /// Unbounded upward scan, one batch-sized window at a time.
    fn scan_from(&self, start: BigUint) -> AttackResult<BigUint> {
        let mut start = start;
        loop {
            let end = &start + self.batch_size;
            if let Some(s) = self.scan_window(start, &end)? {
                return Ok(s);
            }
            start = end;
        }
    }

    /// Lowest conforming `s` in `[start, end)`.
    fn scan_window(&self, start: BigUint, end: &BigUint) -> AttackResult<Option<BigUint>> {
        if self.batch_size == 1 {
            let mut s = start;
            while &s < end {
                if self.oracle.query_multiplier(&s)? {
                    return Ok(Some(s));
                }
                s += 1u32;
            }
            return Ok(None);
        }

        let mut s = start;
        while &s < end {
            let count = (end - &s)
                .to_usize()
                .map_or(self.batch_size, |left| left.min(self.batch_size));
            let hit = (0..count)
                .into_par_iter()
                .map(|i| {
                    let candidate = &s + i;
                    self.oracle.query_multiplier(&candidate).map(|valid| valid.then_some(candidate))
                })
                .find_first(|outcome| !matches!(outcome, Ok(None)));
            match hit {
                Some(outcome) => return outcome,
                None => s += count,
            }
        }
        Ok(None)
    }
}

fn non_negative(x: BigInt) -> BigUint {
    x.to_biguint().unwrap_or_default()
}
