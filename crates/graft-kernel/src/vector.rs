//! Dense coordinate vectors in K^n.

use crate::scalar::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector of `K^n`, stored by coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector<K>(Vec<K>);

impl<K: Field> Vector<K> {
    pub fn new(coords: Vec<K>) -> Self {
        Self(coords)
    }

    pub fn zero(dim: usize) -> Self {
        Self(vec![K::zero(); dim])
    }

    /// The `i`-th standard basis vector of `K^dim`.
    pub fn unit(dim: usize, i: usize) -> Self {
        let mut v = Self::zero(dim);
        v.0[i] = K::one();
        v
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn coords(&self) -> &[K] {
        &self.0
    }

    pub fn get(&self, i: usize) -> &K {
        &self.0[i]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Field::is_zero)
    }

    /// Index of the first nonzero coordinate.
    pub fn leading(&self) -> Option<usize> {
        self.0.iter().position(|c| !c.is_zero())
    }

    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dim(), other.dim());
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| a.clone() + b.clone())
                .collect(),
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dim(), other.dim());
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| a.clone() - b.clone())
                .collect(),
        )
    }

    pub fn scale(&self, c: &K) -> Self {
        Self(self.0.iter().map(|a| c.clone() * a.clone()).collect())
    }

    /// `self + c * other`.
    pub fn axpy(&self, c: &K, other: &Self) -> Self {
        self.add(&other.scale(c))
    }

    /// The pair `(self, other)` as a vector of the product space.
    pub fn concat(&self, other: &Self) -> Self {
        let mut coords = self.0.clone();
        coords.extend(other.0.iter().cloned());
        Self(coords)
    }

    /// Split a product-space vector into its two components.
    pub fn split_at(&self, mid: usize) -> (Self, Self) {
        let (a, b) = self.0.split_at(mid);
        (Self(a.to_vec()), Self(b.to_vec()))
    }

    /// Linear combination `Σ cᵢ vᵢ` in `K^dim`.
    pub fn combination<'a, I>(dim: usize, terms: I) -> Self
    where
        I: IntoIterator<Item = (&'a K, &'a Self)>,
    {
        terms
            .into_iter()
            .fold(Self::zero(dim), |acc, (c, v)| acc.axpy(c, v))
    }
}

impl<K> From<Vec<K>> for Vector<K> {
    fn from(coords: Vec<K>) -> Self {
        Self(coords)
    }
}

impl<K: fmt::Display> fmt::Display for Vector<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

/// Build a rational vector from integer literals.
#[macro_export]
macro_rules! qvec {
    ($($x:expr),* $(,)?) => {
        $crate::vector::Vector::new(vec![$($crate::scalar::Rational::from($x as i64)),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::scalar::{Rational, q};

    #[test]
    fn product_space_round_trip() {
        let x = qvec![1, 2];
        let y = qvec![3];
        let pair = x.concat(&y);
        assert_eq!(pair, qvec![1, 2, 3]);
        assert_eq!(pair.split_at(2), (x, y));
    }

    #[test]
    fn combination_and_leading() {
        let e0 = qvec![1, 0, 0];
        let e2 = qvec![0, 0, 1];
        let v = super::Vector::combination(3, [(&q(2), &e0), (&q(-1), &e2)]);
        assert_eq!(v, qvec![2, 0, -1]);
        assert_eq!(v.leading(), Some(0));
        assert_eq!(super::Vector::<Rational>::zero(3).leading(), None);
    }

    #[test]
    fn display() {
        assert_eq!(qvec![1, -2].to_string(), "(1, -2)");
    }
}
