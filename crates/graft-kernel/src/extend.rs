//! One-direction extensions.
//!
//! Extending `f` by a vector `x ∉ dom f` with a chosen image `y` is the
//! disjoint join of `f` with the line map `c·x ↦ c·y`. Repeating the step
//! along directions outside the current domain walks an ascending chain up
//! to a total map.

use crate::colimit::{Chain, Unfolding};
use crate::error::GraftError;
use crate::merge::join_disjoint;
use crate::partial::{PartialMap, Shape};
use crate::scalar::Field;
use crate::subspace::Subspace;
use crate::vector::Vector;

/// The partial map on `span{x}` sending `x ↦ y`.
///
/// # Panics
///
/// If `x` is zero or either vector has the wrong dimension for `shape`.
pub fn singleton<K: Field>(shape: Shape, x: Vector<K>, y: Vector<K>) -> PartialMap<K> {
    assert_eq!(x.dim(), shape.input, "input vector has the wrong dimension");
    assert_eq!(y.dim(), shape.output, "image vector has the wrong dimension");
    let Some(lead) = x.leading() else {
        panic!("singleton map needs a nonzero direction");
    };
    // Canonical basis of span{x} is x / x[lead]; scale the image to match.
    let inv = match x.get(lead).inv() {
        Some(inv) => inv,
        None => unreachable!("leading coordinate is nonzero"),
    };
    let domain = Subspace::span_unchecked(shape.input, vec![x]);
    PartialMap::from_parts(shape, domain, vec![y.scale(&inv)])
}

/// Extend `f` so that `x ↦ y`. The new domain is `dom f + span{x}`.
///
/// # Panics
///
/// If `x` already lies in the domain of `f`.
pub fn extend_by_vector<K: Field>(f: &PartialMap<K>, x: Vector<K>, y: Vector<K>) -> PartialMap<K> {
    assert!(
        !f.domain().contains(&x),
        "extend_by_vector requires a direction outside the domain, got {x}"
    );
    let line = singleton(f.shape(), x, y);
    let extended = join_disjoint(f, &line);
    tracing::trace!(dim = extended.domain().dim(), "extended by one direction");
    extended
}

/// Checked form of [`extend_by_vector`].
pub fn try_extend_by_vector<K: Field>(
    f: &PartialMap<K>,
    x: Vector<K>,
    y: Vector<K>,
) -> Result<PartialMap<K>, GraftError> {
    let shape = f.shape();
    if x.dim() != shape.input {
        return Err(GraftError::DimensionMismatch {
            expected: shape.input,
            actual: x.dim(),
        });
    }
    if y.dim() != shape.output {
        return Err(GraftError::DimensionMismatch {
            expected: shape.output,
            actual: y.dim(),
        });
    }
    if f.domain().contains(&x) {
        return Err(GraftError::AlreadyInDomain {
            point: x.to_string(),
        });
    }
    Ok(extend_by_vector(f, x, y))
}

/// Extend `f` to a total map one standard direction at a time.
///
/// `choose` picks the image of each direction added. The returned chain
/// starts at `f` and ends at a total map extending it.
pub fn maximal_extension<K, C>(f: &PartialMap<K>, mut choose: C) -> Chain<K>
where
    K: Field,
    C: FnMut(&Vector<K>) -> Vector<K>,
{
    let mut chain = Chain::starting_at(f.clone());
    while let Some(direction) = chain.last().domain().first_missing_unit() {
        let image = choose(&direction);
        let next = extend_by_vector(chain.last(), direction, image);
        if let Err(e) = chain.push(next) {
            unreachable!("an extension failed to extend: {e}");
        }
    }
    tracing::debug!(steps = chain.len(), "maximal extension reached a total map");
    chain
}

/// The zero-image extensions of `f` as a lazy chain: step `n` is `f`
/// extended by zero along its first `n` missing standard directions.
pub fn zero_extensions<K: Field>(
    f: &PartialMap<K>,
    probe_depth: usize,
) -> Unfolding<K, impl Fn(usize) -> PartialMap<K> + '_> {
    let output = f.shape().output;
    Unfolding::new(f.shape(), probe_depth, move |n| {
        let mut step = f.clone();
        for _ in 0..n {
            let Some(direction) = step.domain().first_missing_unit() else {
                break;
            };
            step = extend_by_vector(&step, direction, Vector::zero(output));
        }
        step
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colimit::{Colimit, Directed, directed_colimit};
    use crate::order::{bottom, le};
    use crate::qvec;
    use crate::scalar::Rational;

    fn shape() -> Shape {
        Shape::new(3, 1)
    }

    #[test]
    fn singleton_scales_to_canonical_basis() {
        let line = singleton::<Rational>(shape(), qvec![2, 4, 0], qvec![6]);
        assert_eq!(line.eval(&qvec![1, 2, 0]).unwrap(), qvec![3]);
        assert_eq!(line.eval(&qvec![-2, -4, 0]).unwrap(), qvec![-6]);
    }

    #[test]
    #[should_panic(expected = "nonzero direction")]
    fn singleton_rejects_zero() {
        singleton::<Rational>(shape(), qvec![0, 0, 0], qvec![0]);
    }

    #[test]
    fn extension_adds_one_dimension() {
        let f0 = bottom::<Rational>(shape());
        let f1 = extend_by_vector(&f0, qvec![1, 0, 0], qvec![1]);
        let f2 = extend_by_vector(&f1, qvec![1, 1, 0], qvec![3]);
        assert_eq!(f2.domain().dim(), 2);
        assert_eq!(f2.eval(&qvec![0, 1, 0]).unwrap(), qvec![2]);
        assert!(le(&f1, &f2));
    }

    #[test]
    #[should_panic(expected = "outside the domain")]
    fn extension_inside_domain_panics() {
        let f = singleton::<Rational>(shape(), qvec![1, 0, 0], qvec![1]);
        extend_by_vector(&f, qvec![3, 0, 0], qvec![0]);
    }

    #[test]
    fn checked_extension_reports_errors() {
        let f = singleton::<Rational>(shape(), qvec![1, 0, 0], qvec![1]);
        assert!(matches!(
            try_extend_by_vector(&f, qvec![3, 0, 0], qvec![0]),
            Err(GraftError::AlreadyInDomain { .. })
        ));
        assert!(matches!(
            try_extend_by_vector(&f, qvec![1, 0], qvec![0]),
            Err(GraftError::DimensionMismatch { .. })
        ));
        assert!(try_extend_by_vector(&f, qvec![0, 0, 1], qvec![4]).is_ok());
    }

    #[test]
    fn chain_of_three_extensions_has_colimit_at_the_top() {
        let f0 = singleton::<Rational>(shape(), qvec![1, 0, 0], qvec![1]);
        let f1 = extend_by_vector(&f0, qvec![0, 1, 0], qvec![2]);
        let f2 = extend_by_vector(&f1, qvec![0, 0, 1], qvec![3]);
        let family = Directed::new(vec![f0, f1, f2.clone()]).unwrap();
        let colimit = directed_colimit(&family);
        assert_eq!(colimit.domain(), f2.domain());
        assert_eq!(colimit, f2);
    }

    #[test]
    fn maximal_extension_reaches_total_map() {
        let f = singleton::<Rational>(shape(), qvec![1, 1, 0], qvec![5]);
        let chain = maximal_extension(&f, |_| qvec![0]);
        let total = chain.last();
        assert!(total.is_total());
        assert!(le(&f, total));
        assert_eq!(chain.len(), 3);
        assert_eq!(total.eval(&qvec![1, 1, 0]).unwrap(), qvec![5]);
        assert_eq!(total.eval(&qvec![1, 0, 0]).unwrap(), qvec![0]);
    }

    #[test]
    fn zero_extensions_evaluate_lazily() {
        let f = singleton::<Rational>(shape(), qvec![1, 1, 0], qvec![5]);
        let total = maximal_extension(&f, |_| qvec![0]).last().clone();
        let unfolding = zero_extensions(&f, 8);
        assert!(unfolding.check_prefix(4).is_ok());
        let colimit = Colimit::new(&unfolding);
        for x in [qvec![1, 0, 0], qvec![0, 1, 0], qvec![2, -1, 7]] {
            assert_eq!(colimit.eval(&x).unwrap(), total.eval(&x).unwrap());
        }
    }

    #[test]
    fn shallow_probe_misses_late_directions() {
        let f = bottom::<Rational>(shape());
        let unfolding = zero_extensions(&f, 1);
        assert!(!Colimit::new(&unfolding).contains(&qvec![1, 0, 0]));
    }
}
