//! The extension order on partial maps.
//!
//! `f ≤ g` when `dom f ⊆ dom g` and `g` agrees with `f` on `dom f`. The
//! bottom element is the map on `{0}`. Meets always exist: the domain of
//! `f ∧ g` is the subspace of the common domain where `f` and `g` agree.

use crate::graph::Graph;
use crate::partial::{PartialMap, Shape};
use crate::scalar::Field;
use crate::subspace::Subspace;

/// Decide `f ≤ g`. Maps of different shapes are incomparable.
///
/// Checking agreement on the canonical basis of `dom f` suffices by
/// linearity.
pub fn le<K: Field>(f: &PartialMap<K>, g: &PartialMap<K>) -> bool {
    f.shape() == g.shape()
        && f.domain().is_subspace_of(g.domain())
        && f.pairs().all(|(x, y)| g.eval(x).is_ok_and(|gy| gy == *y))
}

/// The empty-domain map `{0} → F`.
pub fn bottom<K: Field>(shape: Shape) -> PartialMap<K> {
    PartialMap::from_parts(shape, Subspace::zero(shape.input), Vec::new())
}

/// Greatest common restriction of `f` and `g`.
///
/// Computed as the intersection of graphs, which is functional whenever
/// either operand is.
///
/// # Panics
///
/// If the shapes differ.
pub fn meet<K: Field>(f: &PartialMap<K>, g: &PartialMap<K>) -> PartialMap<K> {
    assert_eq!(
        f.shape(),
        g.shape(),
        "meet of partial maps with different shapes"
    );
    let common = Graph::encode(f).space().intersect(Graph::encode(g).space());
    let result = match Graph::from_space(f.shape(), common).decode() {
        Ok(m) => m,
        Err(e) => unreachable!("intersection of function graphs is functional: {e}"),
    };
    tracing::trace!(
        left_dim = f.domain().dim(),
        right_dim = g.domain().dim(),
        meet_dim = result.domain().dim(),
        "meet"
    );
    result
}
