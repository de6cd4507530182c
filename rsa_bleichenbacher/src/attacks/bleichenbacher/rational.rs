//! Exact rational arithmetic over arbitrary-precision integers.
//!
//! Values are kept in lowest terms with a strictly positive denominator.
//! All operations return new values; nothing is mutated in place.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

#[derive(Clone, Debug)]
pub struct BigRational {
    numer: BigInt,
    denom: BigInt,
}

impl BigRational {
    /// Builds `numer / denom`.
    ///
    /// # Panics
    /// If `denom` is zero, like integer division.
    pub fn new(numer: BigInt, denom: BigInt) -> Self {
        if denom.is_zero() {
            panic!("BigRational with zero denominator");
        }
        let (numer, denom) = if denom.is_negative() { (-numer, -denom) } else { (numer, denom) };
        let g = numer.gcd(&denom);
        if g.is_one() {
            Self { numer, denom }
        } else {
            Self { numer: numer / &g, denom: denom / &g }
        }
    }

    pub fn from_integer(n: BigInt) -> Self {
        Self { numer: n, denom: BigInt::one() }
    }

    /// `numer / denom` for unsigned operands.
    pub fn from_fraction(numer: &BigUint, denom: &BigUint) -> Self {
        Self::new(BigInt::from(numer.clone()), BigInt::from(denom.clone()))
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Largest integer `<= self`.
    pub fn floor(&self) -> BigInt {
        self.numer.div_floor(&self.denom)
    }

    /// Smallest integer `>= self`.
    pub fn ceil(&self) -> BigInt {
        let (q, r) = self.numer.div_mod_floor(&self.denom);
        if r.is_zero() { q } else { q + 1 }
    }
}

impl Zero for BigRational {
    fn zero() -> Self {
        Self::from_integer(BigInt::zero())
    }

    fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }
}

impl One for BigRational {
    fn one() -> Self {
        Self::from_integer(BigInt::one())
    }
}

impl From<BigInt> for BigRational {
    fn from(n: BigInt) -> Self {
        Self::from_integer(n)
    }
}

impl From<BigUint> for BigRational {
    fn from(n: BigUint) -> Self {
        Self::from_integer(BigInt::from(n))
    }
}

impl From<&BigUint> for BigRational {
    fn from(n: &BigUint) -> Self {
        Self::from_integer(BigInt::from(n.clone()))
    }
}

impl From<u64> for BigRational {
    fn from(n: u64) -> Self {
        Self::from_integer(BigInt::from(n))
    }
}

impl PartialEq for BigRational {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigRational {}

impl PartialOrd for BigRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigRational {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive, so cross-multiplying keeps the order
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl fmt::Display for BigRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl<'a, 'b> Add<&'b BigRational> for &'a BigRational {
    type Output = BigRational;

    fn add(self, rhs: &BigRational) -> BigRational {
        if self.denom == rhs.denom {
            return BigRational::new(&self.numer + &rhs.numer, self.denom.clone());
        }
        BigRational::new(
            &self.numer * &rhs.denom + &rhs.numer * &self.denom,
            &self.denom * &rhs.denom,
        )
    }
}

impl<'a, 'b> Sub<&'b BigRational> for &'a BigRational {
    type Output = BigRational;

    fn sub(self, rhs: &BigRational) -> BigRational {
        if self.denom == rhs.denom {
            return BigRational::new(&self.numer - &rhs.numer, self.denom.clone());
        }
        BigRational::new(
            &self.numer * &rhs.denom - &rhs.numer * &self.denom,
            &self.denom * &rhs.denom,
        )
    }
}

impl<'a, 'b> Mul<&'b BigRational> for &'a BigRational {
    type Output = BigRational;

    fn mul(self, rhs: &BigRational) -> BigRational {
        BigRational::new(&self.numer * &rhs.numer, &self.denom * &rhs.denom)
    }
}

impl<'a, 'b> Div<&'b BigRational> for &'a BigRational {
    type Output = BigRational;

    /// # Panics
    /// If `rhs` is zero.
    fn div(self, rhs: &BigRational) -> BigRational {
        BigRational::new(&self.numer * &rhs.denom, &self.denom * &rhs.numer)
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident :: $method:ident),*) => {$(
        impl $imp<BigRational> for BigRational {
            type Output = BigRational;

            fn $method(self, rhs: BigRational) -> BigRational {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a BigRational> for BigRational {
            type Output = BigRational;

            fn $method(self, rhs: &BigRational) -> BigRational {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<BigRational> for &'a BigRational {
            type Output = BigRational;

            fn $method(self, rhs: BigRational) -> BigRational {
                self.$method(&rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul, Div::div);
