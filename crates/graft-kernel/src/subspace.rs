//! Subspaces of K^n in canonical form.
//!
//! A subspace is stored by its reduced row echelon basis. That basis is
//! unique, so two subspaces are equal exactly when their stored bases are
//! equal, and coordinates of a member vector can be read straight off its
//! pivot entries.

use crate::error::GraftError;
use crate::scalar::Field;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A linear subspace of `K^dim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "SubspaceRepr<K>",
    into = "SubspaceRepr<K>",
    bound(
        serialize = "K: Field + Serialize",
        deserialize = "K: Field + Deserialize<'de>"
    )
)]
pub struct Subspace<K> {
    dim: usize,
    basis: Vec<Vector<K>>,
    pivots: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubspaceRepr<K> {
    pub dim: usize,
    pub basis: Vec<Vector<K>>,
}

impl<K: Field> Subspace<K> {
    /// The zero subspace `{0}` of `K^dim`.
    pub fn zero(dim: usize) -> Self {
        Self {
            dim,
            basis: Vec::new(),
            pivots: Vec::new(),
        }
    }

    /// The whole space `K^dim`.
    pub fn full(dim: usize) -> Self {
        Self {
            dim,
            basis: (0..dim).map(|i| Vector::unit(dim, i)).collect(),
            pivots: (0..dim).collect(),
        }
    }

    /// The span of `vectors` inside `K^dim`.
    ///
    /// Fails if any vector lives in a different ambient dimension.
    pub fn span<I>(dim: usize, vectors: I) -> Result<Self, GraftError>
    where
        I: IntoIterator<Item = Vector<K>>,
    {
        let rows: Vec<Vector<K>> = vectors.into_iter().collect();
        if let Some(bad) = rows.iter().find(|v| v.dim() != dim) {
            return Err(GraftError::DimensionMismatch {
                expected: dim,
                actual: bad.dim(),
            });
        }
        let (basis, pivots) = row_reduce(rows, dim);
        Ok(Self { dim, basis, pivots })
    }

    /// Span of vectors already known to live in `K^dim`.
    pub(crate) fn span_unchecked(dim: usize, rows: Vec<Vector<K>>) -> Self {
        let (basis, pivots) = row_reduce(rows, dim);
        Self { dim, basis, pivots }
    }

    /// Ambient dimension n of `K^n`.
    pub fn ambient_dim(&self) -> usize {
        self.dim
    }

    /// Dimension of the subspace itself.
    pub fn dim(&self) -> usize {
        self.basis.len()
    }

    /// The canonical (reduced row echelon) basis.
    pub fn basis(&self) -> &[Vector<K>] {
        &self.basis
    }

    pub fn is_zero(&self) -> bool {
        self.basis.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.basis.len() == self.dim
    }

    /// Coefficients of `x` in the canonical basis, or `None` if `x` is
    /// not a member.
    pub fn coordinates(&self, x: &Vector<K>) -> Option<Vec<K>> {
        if x.dim() != self.dim {
            return None;
        }
        let coeffs: Vec<K> = self.pivots.iter().map(|&p| x.get(p).clone()).collect();
        let rebuilt = Vector::combination(self.dim, coeffs.iter().zip(&self.basis));
        (rebuilt == *x).then_some(coeffs)
    }

    pub fn contains(&self, x: &Vector<K>) -> bool {
        self.coordinates(x).is_some()
    }

    /// Inclusion order on subspaces.
    pub fn is_subspace_of(&self, other: &Self) -> bool {
        self.dim == other.dim && self.basis.iter().all(|b| other.contains(b))
    }

    /// Subspace sum `self + other`.
    pub fn sum(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dim, other.dim);
        let rows = self.basis.iter().chain(&other.basis).cloned().collect();
        Self::span_unchecked(self.dim, rows)
    }

    /// Subspace intersection `self ∩ other` (Zassenhaus).
    pub fn intersect(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dim, other.dim);
        let n = self.dim;
        let zero = Vector::zero(n);
        let rows = self
            .basis
            .iter()
            .map(|u| u.concat(u))
            .chain(other.basis.iter().map(|w| w.concat(&zero)))
            .collect();
        let (reduced, pivots) = row_reduce(rows, 2 * n);
        let common = reduced
            .into_iter()
            .zip(pivots)
            .filter(|(_, p)| *p >= n)
            .map(|(row, _)| row.split_at(n).1)
            .collect();
        Self::span_unchecked(n, common)
    }

    /// Image under the projection `K^dim → K^k` onto the first `k` coordinates.
    pub fn truncate(&self, k: usize) -> Self {
        let rows = self.basis.iter().map(|b| b.split_at(k).0).collect();
        Self::span_unchecked(k, rows)
    }

    /// Image under the projection `K^dim → K^(dim - k)` dropping the first
    /// `k` coordinates.
    pub fn drop_prefix(&self, k: usize) -> Self {
        let rows = self.basis.iter().map(|b| b.split_at(k).1).collect();
        Self::span_unchecked(self.dim - k, rows)
    }

    /// First standard basis vector outside this subspace.
    pub fn first_missing_unit(&self) -> Option<Vector<K>> {
        (0..self.dim)
            .map(|i| Vector::unit(self.dim, i))
            .find(|e| !self.contains(e))
    }
}

/// Express `target` as `Σ cⱼ gⱼ` over the ordered list `generators`.
///
/// Free coefficients are set to zero, so earlier generators absorb as much
/// of `target` as possible. Returns `None` when `target` is outside the span.
pub fn solve_in<K: Field>(generators: &[Vector<K>], target: &Vector<K>) -> Option<Vec<K>> {
    let n = target.dim();
    let m = generators.len();
    if generators.iter().any(|g| g.dim() != n) {
        return None;
    }
    let rows = (0..n)
        .map(|i| {
            let mut row: Vec<K> = generators.iter().map(|g| g.get(i).clone()).collect();
            row.push(target.get(i).clone());
            Vector::new(row)
        })
        .collect();
    let (reduced, pivots) = row_reduce(rows, m + 1);
    if pivots.last() == Some(&m) {
        return None;
    }
    let mut coeffs = vec![K::zero(); m];
    for (row, col) in reduced.iter().zip(&pivots) {
        coeffs[*col] = row.get(m).clone();
    }
    Some(coeffs)
}

/// Gauss-Jordan elimination. Returns the nonzero reduced rows and their
/// pivot columns.
fn row_reduce<K: Field>(mut rows: Vec<Vector<K>>, width: usize) -> (Vec<Vector<K>>, Vec<usize>) {
    let mut pivots = Vec::new();
    let mut r = 0;
    for col in 0..width {
        if r == rows.len() {
            break;
        }
        let Some(p) = (r..rows.len()).find(|&i| !rows[i].get(col).is_zero()) else {
            continue;
        };
        rows.swap(r, p);
        let Some(inv) = rows[r].get(col).inv() else {
            continue;
        };
        let pivot_row = rows[r].scale(&inv);
        for (i, row) in rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let c = row.get(col).clone();
            if !c.is_zero() {
                *row = row.axpy(&-c, &pivot_row);
            }
        }
        rows[r] = pivot_row;
        pivots.push(col);
        r += 1;
    }
    rows.truncate(r);
    (rows, pivots)
}

impl<K: Field> From<Subspace<K>> for SubspaceRepr<K> {
    fn from(s: Subspace<K>) -> Self {
        Self {
            dim: s.dim,
            basis: s.basis,
        }
    }
}

impl<K: Field> TryFrom<SubspaceRepr<K>> for Subspace<K> {
    type Error = GraftError;

    fn try_from(repr: SubspaceRepr<K>) -> Result<Self, Self::Error> {
        Self::span(repr.dim, repr.basis)
    }
}

impl<K: Field> fmt::Display for Subspace<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "span{{")?;
        for (i, b) in self.basis.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{b}")?;
        }
        write!(f, "}} ⊆ K^{}", self.dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qvec;
    use crate::scalar::{Rational, q};

    fn span(dim: usize, vs: Vec<Vector<Rational>>) -> Subspace<Rational> {
        Subspace::span(dim, vs).unwrap()
    }

    #[test]
    fn canonical_form_makes_equality_structural() {
        let a = span(3, vec![qvec![1, 1, 0], qvec![0, 1, 1]]);
        let b = span(3, vec![qvec![1, 2, 1], qvec![2, 1, -1]]);
        assert_eq!(a, b);
        assert_eq!(a.dim(), 2);
    }

    #[test]
    fn membership_and_coordinates() {
        let s = span(3, vec![qvec![1, 0, 2], qvec![0, 1, 3]]);
        assert!(s.contains(&qvec![2, 1, 7]));
        assert!(!s.contains(&qvec![0, 0, 1]));
        assert_eq!(s.coordinates(&qvec![2, 1, 7]), Some(vec![q(2), q(1)]));
        assert!(!s.contains(&qvec![1, 0]));
    }

    #[test]
    fn sum_and_intersection() {
        let xy = span(3, vec![qvec![1, 0, 0], qvec![0, 1, 0]]);
        let yz = span(3, vec![qvec![0, 1, 0], qvec![0, 0, 1]]);
        assert!(xy.sum(&yz).is_full());
        assert_eq!(xy.intersect(&yz), span(3, vec![qvec![0, 1, 0]]));

        let diag = span(3, vec![qvec![1, 1, 1]]);
        assert!(xy.intersect(&diag).is_zero());
    }

    #[test]
    fn intersection_of_skew_planes() {
        let p = span(3, vec![qvec![1, 0, 1], qvec![0, 1, 1]]);
        let r = span(3, vec![qvec![1, 1, 0], qvec![0, 0, 1]]);
        let meet = p.intersect(&r);
        assert_eq!(meet.dim(), 1);
        assert!(meet.contains(&qvec![1, 1, 2]));
    }

    #[test]
    fn inclusion_order() {
        let line = span(2, vec![qvec![1, 1]]);
        assert!(Subspace::zero(2).is_subspace_of(&line));
        assert!(line.is_subspace_of(&Subspace::full(2)));
        assert!(!Subspace::full(2).is_subspace_of(&line));
    }

    #[test]
    fn span_rejects_wrong_dimension() {
        let err = Subspace::span(2, vec![qvec![1, 0, 0]]).unwrap_err();
        assert!(matches!(err, GraftError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn solve_prefers_earlier_generators() {
        let gens = vec![qvec![1, 0], qvec![1, 0], qvec![0, 1]];
        assert_eq!(
            solve_in(&gens, &qvec![2, 3]),
            Some(vec![q(2), q(0), q(3)])
        );
        assert_eq!(solve_in(&gens[..2], &qvec![0, 1]), None);
    }

    #[test]
    fn projections() {
        let s = span(3, vec![qvec![1, 2, 3], qvec![0, 0, 1]]);
        assert_eq!(s.truncate(2), span(2, vec![qvec![1, 2]]));
        assert!(s.drop_prefix(1).is_full());
        assert_eq!(s.first_missing_unit(), Some(qvec![1, 0, 0]));
    }
}
