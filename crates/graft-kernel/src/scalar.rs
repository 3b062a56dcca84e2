//! Exact scalars.
//!
//! Every map in the kernel is linear over a field K. Nothing is approximate:
//! equality of scalars is decidable and is what the agreement, functionality
//! and order checks ultimately reduce to.
//!
//! `Rational` is the field shipped with the kernel. It is arbitrary
//! precision, so elimination over large entries never overflows. Other
//! fields plug in by implementing [`Field`].

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::GraftError;

/// A commutative field with decidable equality.
///
/// The arithmetic operators come from `std::ops`; the trait adds the
/// distinguished elements and inversion.
pub trait Field:
    Clone
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Multiplicative inverse. `None` exactly for zero.
    fn inv(&self) -> Option<Self>;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// An exact rational number of unbounded size.
///
/// Always normalised (positive denominator, lowest terms), so derived
/// equality is numeric equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScalarRepr", into = "String")]
pub struct Rational(BigRational);

impl Rational {
    /// Build `num / den`. Returns `None` when `den` is zero.
    pub fn new(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Option<Self> {
        let den = den.into();
        if den.is_zero() {
            return None;
        }
        Some(Self(BigRational::new(num.into(), den)))
    }

    pub fn integer(n: impl Into<BigInt>) -> Self {
        Self(BigRational::from_integer(n.into()))
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::integer(n)
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Field for Rational {
    fn zero() -> Self {
        Self(BigRational::zero())
    }

    fn one() -> Self {
        Self(BigRational::one())
    }

    fn inv(&self) -> Option<Self> {
        if self.0.is_zero() {
            None
        } else {
            Some(Self(self.0.recip()))
        }
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl std::str::FromStr for Rational {
    type Err = GraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<BigInt>()
                .map_err(|e| GraftError::InvalidScalar(format!("{s:?}: {e}")))
        };
        match s.split_once('/') {
            Some((num, den)) => Self::new(parse(num)?, parse(den)?)
                .ok_or_else(|| GraftError::InvalidScalar(format!("zero denominator in {s:?}"))),
            None => Ok(Self::integer(parse(s)?)),
        }
    }
}

/// Wire form accepted for a scalar: a JSON integer or a `"p/q"` string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScalarRepr {
    Int(i64),
    Text(String),
}

impl TryFrom<ScalarRepr> for Rational {
    type Error = GraftError;

    fn try_from(repr: ScalarRepr) -> Result<Self, Self::Error> {
        match repr {
            ScalarRepr::Int(n) => Ok(Self::from(n)),
            ScalarRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Rational> for String {
    fn from(r: Rational) -> Self {
        r.to_string()
    }
}

/// Shorthand used throughout the tests.
pub fn q(n: i64) -> Rational {
    Rational::from(n)
}
