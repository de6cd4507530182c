//! Step 3: narrowing the candidate set with a freshly found multiplier.

use super::interval::{CandidateSet, Interval};
use super::rational::BigRational;
use num_bigint::{BigInt, BigUint};

/// For every `[a, b]` in `candidates` and every integer `r` with
/// `ceil((a*s - 3B + 1) / n) <= r <= floor((b*s - 2B) / n)`, keeps
/// `[max(a, ceil((2B + rn) / s)), min(b, floor((3B - 1 + rn) / s))]`,
/// then merges the pieces into a disjoint set.
///
/// Pieces are clamped into their parent, so the covered range never grows.
/// Empty pieces are dropped; the result may be empty if the oracle lied.
pub fn narrow(candidates: &CandidateSet, s: &BigUint, bound: &BigUint, n: &BigUint) -> CandidateSet {
    let s_q = BigRational::from(s);
    let n_q = BigRational::from(n);
    let n_int = BigInt::from(n.clone());
    let two_b = BigRational::from(bound * 2u32);
    let three_b_minus_one = BigRational::from(bound * 3u32 - 1u32);

    let mut pieces = Vec::new();
    for interval in candidates.intervals() {
        let (a, b) = (interval.min(), interval.max());
        let r_lower = ((a * &s_q - &three_b_minus_one) / &n_q).ceil();
        let r_upper = ((b * &s_q - &two_b) / &n_q).floor();
        log::trace!("step 3: r in [{r_lower:x}, {r_upper:x}]");

        let mut r = r_lower;
        while r <= r_upper {
            let rn = BigRational::from(&r * &n_int);
            let lower = BigRational::from(((&two_b + &rn) / &s_q).ceil()).max(a.clone());
            let upper = BigRational::from(((&three_b_minus_one + &rn) / &s_q).floor()).min(b.clone());
            if let Some(piece) = Interval::new(lower, upper) {
                pieces.push(piece);
            }
            r += 1u32;
        }
    }

    log::trace!("step 3: {} pieces before merging", pieces.len());
    CandidateSet::from_intervals(pieces)
}
