//! Colimits of directed families of partial maps.
//!
//! A family is *directed* when any two members have a common extension
//! inside the family. Its colimit is defined on the union of the member
//! domains (a subspace, by directedness) and evaluates `x` through any member
//! whose domain contains `x`. Directedness makes the answer independent of
//! which member is picked.
//!
//! Picking that member is a choice. Every [`Family`] implements it as
//! [`Family::witness`], and [`Colimit`] evaluates lazily through it, so an
//! unbounded family is only explored as far as the queried points require.
//!
//! ```text
//! Family<K>             ← witness(x): a member whose domain holds x
//!     │
//!     ├── Directed<K>   ← finite, validated pairwise upper bounds
//!     ├── Chain<K>      ← ascending, binary search over nested domains
//!     └── Unfolding<K>  ← generated on demand, probed up to a depth
//!     │
//! Colimit<'_, K, D>     ← lazy view; materialize() for finite families
//! ```

use crate::error::{GraftError, NotInDomainError};
use crate::order::le;
use crate::partial::{PartialMap, Shape};
use crate::scalar::Field;
use crate::subspace::Subspace;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::marker::PhantomData;

/// A directed family of partial maps, queried through a choice of witness.
pub trait Family<K: Field> {
    /// Shape shared by all members.
    fn shape(&self) -> Shape;

    /// Some member whose domain contains `x`, or `None` if no member found
    /// by this family's search does.
    fn witness(&self, x: &Vector<K>) -> Option<Cow<'_, PartialMap<K>>>;
}

/// A family whose members can all be listed.
pub trait FiniteFamily<K: Field>: Family<K> {
    fn members(&self) -> &[PartialMap<K>];
}

fn common_shape<K: Field>(members: &[PartialMap<K>]) -> Result<Shape, GraftError> {
    let shape = members.first().ok_or(GraftError::EmptyFamily)?.shape();
    if let Some(bad) = members.iter().find(|m| m.shape() != shape) {
        return Err(GraftError::ShapeMismatch {
            expected: shape,
            actual: bad.shape(),
        });
    }
    Ok(shape)
}

/// The first pair of members `(i, j)`, `i < j`, with no upper bound among
/// `members`.
pub fn first_unbounded_pair<K: Field>(members: &[PartialMap<K>]) -> Option<(usize, usize)> {
    (0..members.len())
        .flat_map(|i| ((i + 1)..members.len()).map(move |j| (i, j)))
        .find(|&(i, j)| {
            !members
                .iter()
                .any(|h| le(&members[i], h) && le(&members[j], h))
        })
}

// ─── Directed ───────────────────────────────────────────────────────────────

/// A finite family checked to be non-empty and directed.
#[derive(Debug, Clone)]
pub struct Directed<K> {
    shape: Shape,
    members: Vec<PartialMap<K>>,
}

impl<K: Field> Directed<K> {
    /// Validate directedness: every pair of members has an upper bound
    /// among the members.
    pub fn new(members: Vec<PartialMap<K>>) -> Result<Self, GraftError> {
        let shape = common_shape(&members)?;
        if let Some((i, j)) = first_unbounded_pair(&members) {
            return Err(GraftError::NotDirected {
                description: format!("members {i} and {j} have no common extension in the family"),
            });
        }
        Ok(Self { shape, members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn into_members(self) -> Vec<PartialMap<K>> {
        self.members
    }
}

impl<K: Field> Family<K> for Directed<K> {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn witness(&self, x: &Vector<K>) -> Option<Cow<'_, PartialMap<K>>> {
        self.members
            .iter()
            .find(|m| m.domain().contains(x))
            .map(Cow::Borrowed)
    }
}

impl<K: Field> FiniteFamily<K> for Directed<K> {
    fn members(&self) -> &[PartialMap<K>] {
        &self.members
    }
}

// ─── Chain ──────────────────────────────────────────────────────────────────

/// How a [`Chain`] finds the first step covering a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Search {
    /// Domains of an ascending chain are nested, so membership is monotone
    /// along the chain.
    #[default]
    Binary,
    Linear,
}

impl std::str::FromStr for Search {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "linear" => Ok(Self::Linear),
            _ => Err(format!("unknown chain search: {s}")),
        }
    }
}

/// An ascending chain `f₀ ≤ f₁ ≤ …` of partial maps.
#[derive(Debug, Clone)]
pub struct Chain<K> {
    shape: Shape,
    steps: Vec<PartialMap<K>>,
    search: Search,
}

impl<K: Field> Chain<K> {
    pub fn new(steps: Vec<PartialMap<K>>) -> Result<Self, GraftError> {
        let shape = common_shape(&steps)?;
        if let Some(index) = (1..steps.len()).find(|&i| !le(&steps[i - 1], &steps[i])) {
            return Err(GraftError::NotAscending { index });
        }
        Ok(Self {
            shape,
            steps,
            search: Search::default(),
        })
    }

    /// A one-step chain.
    pub fn starting_at(first: PartialMap<K>) -> Self {
        Self {
            shape: first.shape(),
            steps: vec![first],
            search: Search::default(),
        }
    }

    pub fn with_search(mut self, search: Search) -> Self {
        self.search = search;
        self
    }

    /// Append a step, which must extend the current last step.
    pub fn push(&mut self, next: PartialMap<K>) -> Result<(), GraftError> {
        if !le(self.last(), &next) {
            return Err(GraftError::NotAscending {
                index: self.steps.len(),
            });
        }
        self.steps.push(next);
        Ok(())
    }

    pub fn steps(&self) -> &[PartialMap<K>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> &PartialMap<K> {
        // Never empty: every constructor installs at least one step.
        &self.steps[self.steps.len() - 1]
    }

    /// Index of the first step whose domain contains `x`.
    pub fn locate(&self, x: &Vector<K>) -> Option<usize> {
        let index = match self.search {
            Search::Binary => self
                .steps
                .partition_point(|step| !step.domain().contains(x)),
            Search::Linear => self
                .steps
                .iter()
                .position(|step| step.domain().contains(x))
                .unwrap_or(self.steps.len()),
        };
        (index < self.steps.len()).then_some(index)
    }
}

impl<K: Field> Family<K> for Chain<K> {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn witness(&self, x: &Vector<K>) -> Option<Cow<'_, PartialMap<K>>> {
        self.locate(x).map(|i| Cow::Borrowed(&self.steps[i]))
    }
}

impl<K: Field> FiniteFamily<K> for Chain<K> {
    fn members(&self) -> &[PartialMap<K>] {
        &self.steps
    }
}

// ─── Unfolding ──────────────────────────────────────────────────────────────

/// A chain produced on demand by `generate(0), generate(1), …`.
///
/// Nothing is materialised up front. Witness search probes at most
/// `probe_depth` steps, so answers are best-effort for chains that only
/// reach a point later than that.
pub struct Unfolding<K, F> {
    shape: Shape,
    probe_depth: usize,
    generate: F,
    _scalar: PhantomData<K>,
}

impl<K, F> Unfolding<K, F>
where
    K: Field,
    F: Fn(usize) -> PartialMap<K>,
{
    pub fn new(shape: Shape, probe_depth: usize, generate: F) -> Self {
        Self {
            shape,
            probe_depth,
            generate,
            _scalar: PhantomData,
        }
    }

    pub fn step(&self, n: usize) -> PartialMap<K> {
        (self.generate)(n)
    }

    /// Check the first `depth` steps have the right shape and ascend.
    pub fn check_prefix(&self, depth: usize) -> Result<(), GraftError> {
        let mut previous: Option<PartialMap<K>> = None;
        for n in 0..depth {
            let current = self.step(n);
            if current.shape() != self.shape {
                return Err(GraftError::ShapeMismatch {
                    expected: self.shape,
                    actual: current.shape(),
                });
            }
            if let Some(prev) = &previous {
                if !le(prev, &current) {
                    return Err(GraftError::NotAscending { index: n });
                }
            }
            previous = Some(current);
        }
        Ok(())
    }

    /// Materialise the first `depth` steps as a validated [`Chain`].
    pub fn prefix(&self, depth: usize) -> Result<Chain<K>, GraftError> {
        Chain::new((0..depth).map(|n| self.step(n)).collect())
    }
}

impl<K, F> Family<K> for Unfolding<K, F>
where
    K: Field,
    F: Fn(usize) -> PartialMap<K>,
{
    fn shape(&self) -> Shape {
        self.shape
    }

    fn witness(&self, x: &Vector<K>) -> Option<Cow<'_, PartialMap<K>>> {
        let found = (0..self.probe_depth)
            .map(|n| self.step(n))
            .find(|m| m.domain().contains(x));
        tracing::trace!(
            probe_depth = self.probe_depth,
            found = found.is_some(),
            "unfolding witness search"
        );
        found.map(Cow::Owned)
    }
}

// ─── Colimit ────────────────────────────────────────────────────────────────

/// The colimit of a family, evaluated point by point.
pub struct Colimit<'a, K, D: ?Sized> {
    family: &'a D,
    _scalar: PhantomData<K>,
}

impl<'a, K, D> Colimit<'a, K, D>
where
    K: Field,
    D: Family<K> + ?Sized,
{
    pub fn new(family: &'a D) -> Self {
        Self {
            family,
            _scalar: PhantomData,
        }
    }

    pub fn shape(&self) -> Shape {
        self.family.shape()
    }

    pub fn contains(&self, x: &Vector<K>) -> bool {
        self.family.witness(x).is_some()
    }

    /// Evaluate through whichever member the family picks for `x`.
    pub fn eval(&self, x: &Vector<K>) -> Result<Vector<K>, NotInDomainError> {
        let member = self.family.witness(x).ok_or_else(|| NotInDomainError {
            point: x.to_string(),
            domain: "the union of the family's domains".to_string(),
        })?;
        member.eval(x)
    }
}

impl<K, D> Colimit<'_, K, D>
where
    K: Field,
    D: FiniteFamily<K> + ?Sized,
{
    /// Build the colimit as a single partial map.
    ///
    /// Fails with `NotDirected` if some basis vector of the summed domains
    /// has no witness, which only happens for families that are not directed.
    pub fn materialize(&self) -> Result<PartialMap<K>, GraftError> {
        let shape = self.family.shape();
        let domain = self
            .family
            .members()
            .iter()
            .fold(Subspace::zero(shape.input), |acc, m| acc.sum(m.domain()));
        let images = domain
            .basis()
            .iter()
            .map(|z| {
                let member = self.family.witness(z).ok_or_else(|| GraftError::NotDirected {
                    description: format!("no single member covers {z}"),
                })?;
                Ok(member.eval(z)?)
            })
            .collect::<Result<Vec<_>, GraftError>>()?;
        tracing::debug!(
            members = self.family.members().len(),
            colimit_dim = domain.dim(),
            "materialized colimit"
        );
        Ok(PartialMap::from_parts(shape, domain, images))
    }
}

/// The colimit of a validated directed family.
pub fn directed_colimit<K: Field>(family: &Directed<K>) -> PartialMap<K> {
    match Colimit::new(family).materialize() {
        Ok(colimit) => colimit,
        Err(e) => unreachable!("validated directed family failed to glue: {e}"),
    }
}

/// The colimit of an ascending chain.
pub fn chain_colimit<K: Field>(chain: &Chain<K>) -> PartialMap<K> {
    match Colimit::new(chain).materialize() {
        Ok(colimit) => colimit,
        Err(e) => unreachable!("ascending chain failed to glue: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::try_join;
    use crate::order::bottom;
    use crate::qvec;
    use crate::scalar::Rational;

    type Map = PartialMap<Rational>;

    fn shape() -> Shape {
        Shape::new(3, 1)
    }

    fn map(pairs: Vec<(Vector<Rational>, Vector<Rational>)>) -> Map {
        PartialMap::from_pairs(shape(), pairs).unwrap()
    }

    fn diamond() -> Vec<Map> {
        let f = map(vec![(qvec![1, 0, 0], qvec![1])]);
        let g = map(vec![(qvec![0, 1, 0], qvec![2])]);
        let top = try_join(&f, &g).unwrap();
        vec![bottom(shape()), f, g, top]
    }

    #[test]
    fn directed_family_colimit_is_its_top() {
        let members = diamond();
        let top = members[3].clone();
        let family = Directed::new(members).unwrap();
        let colimit = directed_colimit(&family);
        assert_eq!(colimit, top);
        for m in family.members() {
            assert!(le(m, &colimit));
        }
    }

    #[test]
    fn non_directed_family_is_rejected() {
        let mut members = diamond();
        members.pop();
        let err = Directed::new(members).unwrap_err();
        assert!(matches!(err, GraftError::NotDirected { .. }));
    }

    #[test]
    fn empty_and_mixed_families_are_rejected() {
        assert!(matches!(
            Directed::<Rational>::new(vec![]),
            Err(GraftError::EmptyFamily)
        ));
        let mixed = vec![bottom::<Rational>(shape()), bottom(Shape::new(2, 1))];
        assert!(matches!(
            Directed::new(mixed),
            Err(GraftError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn chain_locates_first_covering_step() {
        let steps = vec![
            map(vec![(qvec![1, 0, 0], qvec![1])]),
            map(vec![(qvec![1, 0, 0], qvec![1]), (qvec![0, 1, 0], qvec![2])]),
            map(vec![
                (qvec![1, 0, 0], qvec![1]),
                (qvec![0, 1, 0], qvec![2]),
                (qvec![0, 0, 1], qvec![3]),
            ]),
        ];
        let chain = Chain::new(steps.clone()).unwrap();
        let linear = Chain::new(steps).unwrap().with_search(Search::Linear);
        for (x, expected) in [
            (qvec![2, 0, 0], Some(0)),
            (qvec![1, 1, 0], Some(1)),
            (qvec![0, 0, 1], Some(2)),
        ] {
            assert_eq!(chain.locate(&x), expected);
            assert_eq!(linear.locate(&x), expected);
        }
        let colimit = Colimit::new(&chain);
        assert_eq!(colimit.eval(&qvec![1, 1, 1]).unwrap(), qvec![6]);
        assert_eq!(chain_colimit(&chain), *chain.last());
    }

    #[test]
    fn chain_rejects_descending_step() {
        let big = map(vec![(qvec![1, 0, 0], qvec![1]), (qvec![0, 1, 0], qvec![2])]);
        let small = map(vec![(qvec![1, 0, 0], qvec![1])]);
        let err = Chain::new(vec![big.clone(), small.clone()]).unwrap_err();
        assert!(matches!(err, GraftError::NotAscending { index: 1 }));

        let mut chain = Chain::starting_at(small);
        chain.push(big).unwrap();
        assert!(chain.push(bottom(shape())).is_err());
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn unfolding_evaluates_lazily() {
        // Step n is the coordinate sum restricted to the first min(n, 3) axes.
        let total = map(vec![
            (qvec![1, 0, 0], qvec![1]),
            (qvec![0, 1, 0], qvec![1]),
            (qvec![0, 0, 1], qvec![1]),
        ]);
        let unfolding = Unfolding::new(shape(), 8, move |n: usize| {
            let axes = (0..n.min(3)).map(|i| Vector::unit(3, i));
            let domain = Subspace::span_unchecked(3, axes.collect());
            total.restrict(&domain).unwrap()
        });
        unfolding.check_prefix(6).unwrap();
        let colimit = Colimit::new(&unfolding);
        assert_eq!(colimit.eval(&qvec![1, 2, 3]).unwrap(), qvec![6]);
        assert!(colimit.contains(&qvec![0, 5, 0]));

        let shallow = Unfolding::new(shape(), 2, |n: usize| {
            let axes = (0..n.min(3)).map(|i| Vector::unit(3, i));
            let domain = Subspace::span_unchecked(3, axes.collect());
            Map::from_parts(shape(), domain.clone(), vec![qvec![0]; domain.dim()])
        });
        assert!(Colimit::new(&shallow).eval(&qvec![0, 0, 1]).is_err());
        assert_eq!(shallow.prefix(2).unwrap().len(), 2);
    }
}
