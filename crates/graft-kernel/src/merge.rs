//! Joining partial maps that agree on their overlap.
//!
//! Given `f` and `g` satisfying the agreement condition
//! (`f(x) = g(x)` for every `x ∈ dom f ∩ dom g`), the join is defined on
//! `dom f + dom g` by
//!
//! ```text
//! (f ∨ g)(a + b) = f(a) + g(b)        a ∈ dom f, b ∈ dom g
//! ```
//!
//! A point of the sum usually splits as `a + b` in many ways. Which split
//! is used is a [`Decomposition`] strategy supplied by the caller; under the
//! agreement condition every strategy yields the same map. Splits are derived
//! per evaluated vector and never reused for another vector.

use crate::error::{GraftError, IncompatibleError};
use crate::partial::PartialMap;
use crate::scalar::Field;
use crate::subspace::{Subspace, solve_in};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Chooses a split `z = a + b` with `a ∈ left`, `b ∈ right`.
///
/// Returns `None` if `z ∉ left + right`.
pub trait Decomposition<K: Field> {
    fn decompose(
        &self,
        left: &Subspace<K>,
        right: &Subspace<K>,
        z: &Vector<K>,
    ) -> Option<(Vector<K>, Vector<K>)>;
}

impl<K, F> Decomposition<K> for F
where
    K: Field,
    F: Fn(&Subspace<K>, &Subspace<K>, &Vector<K>) -> Option<(Vector<K>, Vector<K>)>,
{
    fn decompose(
        &self,
        left: &Subspace<K>,
        right: &Subspace<K>,
        z: &Vector<K>,
    ) -> Option<(Vector<K>, Vector<K>)> {
        self(left, right, z)
    }
}

/// Attribute as much of `z` as possible to the left domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftFirst;

/// Attribute as much of `z` as possible to the right domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct RightFirst;

fn split_preferring<K: Field>(
    first: &Subspace<K>,
    second: &Subspace<K>,
    z: &Vector<K>,
) -> Option<(Vector<K>, Vector<K>)> {
    let generators: Vec<Vector<K>> = first.basis().iter().chain(second.basis()).cloned().collect();
    let coeffs = solve_in(&generators, z)?;
    let (ca, cb) = coeffs.split_at(first.dim());
    let a = Vector::combination(z.dim(), ca.iter().zip(first.basis()));
    let b = Vector::combination(z.dim(), cb.iter().zip(second.basis()));
    Some((a, b))
}

impl<K: Field> Decomposition<K> for LeftFirst {
    fn decompose(
        &self,
        left: &Subspace<K>,
        right: &Subspace<K>,
        z: &Vector<K>,
    ) -> Option<(Vector<K>, Vector<K>)> {
        split_preferring(left, right, z)
    }
}

impl<K: Field> Decomposition<K> for RightFirst {
    fn decompose(
        &self,
        left: &Subspace<K>,
        right: &Subspace<K>,
        z: &Vector<K>,
    ) -> Option<(Vector<K>, Vector<K>)> {
        split_preferring(right, left, z).map(|(b, a)| (a, b))
    }
}

/// Named built-in strategies, as selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    LeftFirst,
    RightFirst,
}

impl<K: Field> Decomposition<K> for Strategy {
    fn decompose(
        &self,
        left: &Subspace<K>,
        right: &Subspace<K>,
        z: &Vector<K>,
    ) -> Option<(Vector<K>, Vector<K>)> {
        match self {
            Strategy::LeftFirst => LeftFirst.decompose(left, right, z),
            Strategy::RightFirst => RightFirst.decompose(left, right, z),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftFirst => write!(f, "left_first"),
            Self::RightFirst => write!(f, "right_first"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "left_first" | "left-first" => Ok(Self::LeftFirst),
            "right" | "right_first" | "right-first" => Ok(Self::RightFirst),
            _ => Err(format!("unknown decomposition strategy: {s}")),
        }
    }
}

/// Check the agreement condition on a basis of `dom f ∩ dom g`.
///
/// Exact for finite-dimensional domains: agreement on a basis of the
/// overlap implies agreement everywhere on it.
pub fn check_agreement<K: Field>(
    f: &PartialMap<K>,
    g: &PartialMap<K>,
) -> Result<(), IncompatibleError> {
    if f.shape() != g.shape() {
        return Err(IncompatibleError::Shape {
            left: f.shape(),
            right: g.shape(),
        });
    }
    let overlap = f.domain().intersect(g.domain());
    for v in overlap.basis() {
        let (fv, gv) = match (f.eval(v), g.eval(v)) {
            (Ok(fv), Ok(gv)) => (fv, gv),
            _ => unreachable!("overlap basis vector outside one of the domains"),
        };
        if fv != gv {
            return Err(IncompatibleError::Disagreement {
                witness: v.to_string(),
                left: fv.to_string(),
                right: gv.to_string(),
            });
        }
    }
    Ok(())
}

/// Join of `f` and `g`, splitting points with [`LeftFirst`].
///
/// The result is the least common extension of `f` and `g`, defined on
/// `dom f + dom g`.
pub fn try_join<K: Field>(
    f: &PartialMap<K>,
    g: &PartialMap<K>,
) -> Result<PartialMap<K>, IncompatibleError> {
    check_agreement(f, g)?;
    match assemble(f, g, &LeftFirst) {
        Ok(joined) => Ok(joined),
        Err(e) => unreachable!("built-in decomposition failed on a compatible pair: {e}"),
    }
}

/// Join of `f` and `g` with a caller-supplied decomposition strategy.
///
/// Whatever the strategy returns is validated: `a ∈ dom f`, `b ∈ dom g`
/// and `a + b = z`.
pub fn try_join_with<K, D>(
    f: &PartialMap<K>,
    g: &PartialMap<K>,
    strategy: &D,
) -> Result<PartialMap<K>, GraftError>
where
    K: Field,
    D: Decomposition<K> + ?Sized,
{
    check_agreement(f, g)?;
    assemble(f, g, strategy)
}

/// Join of two maps whose domains meet only in `0`.
///
/// # Panics
///
/// If the shapes differ or the domains share a nonzero vector.
pub fn join_disjoint<K: Field>(f: &PartialMap<K>, g: &PartialMap<K>) -> PartialMap<K> {
    assert_eq!(
        f.shape(),
        g.shape(),
        "join_disjoint of partial maps with different shapes"
    );
    assert!(
        f.domain().intersect(g.domain()).is_zero(),
        "join_disjoint requires domains meeting only at zero: {} and {}",
        f.domain(),
        g.domain()
    );
    match assemble(f, g, &LeftFirst) {
        Ok(joined) => joined,
        Err(e) => unreachable!("disjoint join failed: {e}"),
    }
}

/// Fold [`try_join`] over a non-empty sequence of maps.
pub fn join_all<'a, K, I>(maps: I) -> Result<PartialMap<K>, GraftError>
where
    K: Field,
    I: IntoIterator<Item = &'a PartialMap<K>>,
{
    let mut iter = maps.into_iter();
    let first = iter.next().ok_or(GraftError::EmptyFamily)?.clone();
    iter.try_fold(first, |acc, next| {
        try_join(&acc, next).map_err(GraftError::from)
    })
}

/// Evaluate `f ∨ g` on the canonical basis of `dom f + dom g`.
fn assemble<K, D>(
    f: &PartialMap<K>,
    g: &PartialMap<K>,
    strategy: &D,
) -> Result<PartialMap<K>, GraftError>
where
    K: Field,
    D: Decomposition<K> + ?Sized,
{
    let domain = f.domain().sum(g.domain());
    let images = domain
        .basis()
        .iter()
        .map(|z| {
            let (a, b) = strategy
                .decompose(f.domain(), g.domain(), z)
                .ok_or_else(|| GraftError::Decomposition {
                    description: format!("no split returned for {z}"),
                })?;
            if a.add(&b) != *z {
                return Err(GraftError::Decomposition {
                    description: format!("{a} + {b} does not equal {z}"),
                });
            }
            Ok(f.eval(&a)?.add(&g.eval(&b)?))
        })
        .collect::<Result<Vec<_>, GraftError>>()?;
    tracing::debug!(
        left_dim = f.domain().dim(),
        right_dim = g.domain().dim(),
        joined_dim = domain.dim(),
        "joined partial maps"
    );
    Ok(PartialMap::from_parts(f.shape(), domain, images))
}
