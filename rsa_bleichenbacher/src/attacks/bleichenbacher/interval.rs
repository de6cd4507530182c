//! Closed intervals over the rationals and disjoint unions of them.

use super::rational::BigRational;
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use std::fmt;

/// Closed interval `[min, max]` with `min <= max`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    min: BigRational,
    max: BigRational,
}

impl Interval {
    /// `None` when `min > max`.
    pub fn new(min: BigRational, max: BigRational) -> Option<Self> {
        if min > max {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn from_integers(min: &BigUint, max: &BigUint) -> Option<Self> {
        Self::new(BigRational::from(min), BigRational::from(max))
    }

    pub fn min(&self) -> &BigRational {
        &self.min
    }

    pub fn max(&self) -> &BigRational {
        &self.max
    }

    /// Closed-interval overlap; touching endpoints count.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Smallest interval covering both, or `None` if they are disjoint.
    pub fn union(&self, other: &Interval) -> Option<Interval> {
        if !self.intersects(other) {
            return None;
        }
        Some(Interval {
            min: self.min.clone().min(other.min.clone()),
            max: self.max.clone().max(other.max.clone()),
        })
    }

    pub fn contains(&self, x: &BigRational) -> bool {
        &self.min <= x && x <= &self.max
    }

    /// Number of integers in `[ceil(min), floor(max)]`.
    pub fn length(&self) -> BigUint {
        let count = self.max.floor() - self.min.ceil() + BigInt::one();
        count.to_biguint().unwrap_or_default()
    }

    /// The only integer inside, if there is exactly one.
    pub fn single_integer(&self) -> Option<BigUint> {
        if self.length().is_one() {
            self.min.ceil().to_biguint()
        } else {
            None
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:x}, {:x}]", self.min.ceil(), self.max.floor())
    }
}

/// Merges `interval` into the first member of `set` it intersects,
/// or appends it when it intersects none.
pub fn add_to_set(mut set: Vec<Interval>, interval: Interval) -> Vec<Interval> {
    let mut merged = false;
    for existing in set.iter_mut() {
        if let Some(union) = existing.union(&interval) {
            *existing = union;
            merged = true;
            break;
        }
    }
    if !merged {
        set.push(interval);
    }
    set
}

/// Rewrites a union of intervals as a union of pairwise disjoint ones.
///
/// Folds every interval through [`add_to_set`] and repeats until a pass
/// merges nothing.
pub fn simplify(intervals: Vec<Interval>) -> Vec<Interval> {
    let mut current = intervals;
    loop {
        let before = current.len();
        current = current.into_iter().fold(Vec::with_capacity(before), add_to_set);
        if current.len() == before {
            return current;
        }
    }
}

/// Disjoint intervals the unblinded plaintext may still lie in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateSet {
    intervals: Vec<Interval>,
}

impl CandidateSet {
    /// `[2B, 3B - 1]`, every conforming plaintext.
    pub fn initial(b: &BigUint) -> Self {
        let min = BigRational::from(b * 2u32);
        let max = BigRational::from(b * 3u32 - 1u32);
        Self { intervals: vec![Interval { min, max }] }
    }

    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        Self { intervals: simplify(intervals) }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The interval when exactly one remains.
    pub fn single(&self) -> Option<&Interval> {
        match self.intervals.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Total count of integers covered.
    pub fn total_length(&self) -> BigUint {
        self.intervals.iter().map(Interval::length).sum()
    }

    pub fn contains(&self, x: &BigUint) -> bool {
        let x = BigRational::from(x);
        self.intervals.iter().any(|i| i.contains(&x))
    }

    /// The recovered value once a single one-integer interval remains.
    pub fn solution(&self) -> Option<BigUint> {
        self.single().and_then(Interval::single_integer)
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{interval}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(min: i64, max: i64) -> Interval {
        Interval::new(BigRational::from_integer(min.into()), BigRational::from_integer(max.into())).unwrap()
    }

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(Interval::new(q(2, 1), q(1, 1)).is_none());
        assert!(Interval::new(q(1, 1), q(1, 1)).is_some());
    }

    #[test]
    fn touching_intervals_intersect() {
        assert!(iv(1, 3).intersects(&iv(3, 5)));
        assert!(iv(3, 5).intersects(&iv(1, 3)));
        assert!(!iv(1, 2).intersects(&iv(3, 5)));
        assert!(iv(1, 10).intersects(&iv(4, 5)));
    }

    #[test]
    fn union_of_disjoint_is_none() {
        assert_eq!(iv(1, 2).union(&iv(3, 4)), None);
        assert_eq!(iv(1, 3).union(&iv(2, 6)), Some(iv(1, 6)));
        assert_eq!(iv(2, 6).union(&iv(3, 4)), Some(iv(2, 6)));
    }

    #[test]
    fn length_counts_integers() {
        assert_eq!(iv(3, 3).length(), BigUint::from(1u32));
        assert_eq!(iv(3, 7).length(), BigUint::from(5u32));
        let frac = Interval::new(q(1, 3), q(2, 3)).unwrap();
        assert_eq!(frac.length(), BigUint::from(0u32));
        let mixed = Interval::new(q(-5, 2), q(7, 3)).unwrap();
        assert_eq!(mixed.length(), BigUint::from(5u32));
    }

    #[test]
    fn single_integer() {
        assert_eq!(iv(9, 9).single_integer(), Some(BigUint::from(9u32)));
        assert_eq!(Interval::new(q(17, 2), q(19, 2)).unwrap().single_integer(), Some(BigUint::from(9u32)));
        assert_eq!(iv(9, 10).single_integer(), None);
    }

    #[test]
    fn add_to_set_merges_first_hit() {
        let set = vec![iv(0, 2), iv(10, 12)];
        let set = add_to_set(set, iv(11, 20));
        assert_eq!(set, vec![iv(0, 2), iv(10, 20)]);
        let set = add_to_set(set, iv(5, 6));
        assert_eq!(set, vec![iv(0, 2), iv(10, 20), iv(5, 6)]);
    }

    #[test]
    fn simplify_needs_several_passes() {
        // [0,2] and [4,6] only meet once [1,5] has absorbed one of them
        let merged = simplify(vec![iv(0, 2), iv(4, 6), iv(1, 5), iv(8, 9)]);
        assert_eq!(merged, vec![iv(0, 6), iv(8, 9)]);
    }

    #[test]
    fn candidate_set_solution() {
        let set = CandidateSet::from_intervals(vec![iv(5, 5)]);
        assert_eq!(set.solution(), Some(BigUint::from(5u32)));
        let set = CandidateSet::from_intervals(vec![iv(5, 5), iv(7, 7)]);
        assert_eq!(set.solution(), None);
        assert_eq!(set.total_length(), BigUint::from(2u32));
        assert!(set.contains(&BigUint::from(7u32)));
        assert!(!set.contains(&BigUint::from(6u32)));
    }

    #[test]
    fn initial_set_spans_conforming_range() {
        let b = BigUint::from(256u32);
        let set = CandidateSet::initial(&b);
        assert_eq!(set.len(), 1);
        assert_eq!(set.total_length(), b);
        assert!(set.contains(&BigUint::from(512u32)));
        assert!(set.contains(&BigUint::from(767u32)));
        assert!(!set.contains(&BigUint::from(768u32)));
    }
}
