//! The graph codec.
//!
//! A partial map `f: E →ₚ F` is the same data as its graph
//! `{(x, f(x)) : x ∈ dom f} ⊆ E × F`. A subspace `G ⊆ E × F` is the graph of
//! some partial map iff it is *functional*: `(0, y) ∈ G ⇒ y = 0`.
//!
//! In the canonical basis of `G` (coordinates of `E` first) functionality is
//! visible directly: `G` is functional iff no basis row has its pivot in the
//! `F` block. When it is, the `E` parts of the rows are already the
//! canonical basis of the domain and the `F` parts are their images.
//!
//! The graph view turns the order into inclusion (`f ≤ g ⟺ Γf ⊆ Γg`), the
//! meet into intersection, and the join into sum.

use crate::error::{GraftError, NotFunctionalError};
use crate::partial::{PartialMap, Shape};
use crate::scalar::Field;
use crate::subspace::Subspace;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A subspace of `E × F`, tagged with the shape that splits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "GraphRepr<K>",
    into = "GraphRepr<K>",
    bound(
        serialize = "K: Field + Serialize",
        deserialize = "K: Field + Deserialize<'de>"
    )
)]
pub struct Graph<K> {
    shape: Shape,
    space: Subspace<K>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Field + Serialize",
    deserialize = "K: Field + Deserialize<'de>"
))]
pub struct GraphRepr<K> {
    pub shape: Shape,
    pub space: Subspace<K>,
}

impl<K> From<Graph<K>> for GraphRepr<K> {
    fn from(graph: Graph<K>) -> Self {
        Self {
            shape: graph.shape,
            space: graph.space,
        }
    }
}

impl<K: Field> TryFrom<GraphRepr<K>> for Graph<K> {
    type Error = GraftError;

    fn try_from(repr: GraphRepr<K>) -> Result<Self, Self::Error> {
        Self::new(repr.shape, repr.space)
    }
}

impl<K: Field> Graph<K> {
    /// Wrap a subspace of `K^(input + output)`. No functionality check.
    pub fn new(shape: Shape, space: Subspace<K>) -> Result<Self, GraftError> {
        if space.ambient_dim() != shape.product_dim() {
            return Err(GraftError::DimensionMismatch {
                expected: shape.product_dim(),
                actual: space.ambient_dim(),
            });
        }
        Ok(Self { shape, space })
    }

    pub(crate) fn from_space(shape: Shape, space: Subspace<K>) -> Self {
        debug_assert_eq!(space.ambient_dim(), shape.product_dim());
        Self { shape, space }
    }

    /// The span of the given `(x, y)` pairs.
    pub fn from_pairs<I>(shape: Shape, pairs: I) -> Result<Self, GraftError>
    where
        I: IntoIterator<Item = (Vector<K>, Vector<K>)>,
    {
        let mut rows = Vec::new();
        for (x, y) in pairs {
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
            rows.push(x.concat(&y));
        }
        Ok(Self {
            shape,
            space: Subspace::span_unchecked(shape.product_dim(), rows),
        })
    }

    /// The graph of `f`. Always functional.
    pub fn encode(f: &PartialMap<K>) -> Self {
        let shape = f.shape();
        let rows = f.pairs().map(|(x, y)| x.concat(y)).collect();
        Self {
            shape,
            space: Subspace::span_unchecked(shape.product_dim(), rows),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn space(&self) -> &Subspace<K> {
        &self.space
    }

    pub fn contains_pair(&self, x: &Vector<K>, y: &Vector<K>) -> bool {
        x.dim() == self.shape.input
            && y.dim() == self.shape.output
            && self.space.contains(&x.concat(y))
    }

    /// A basis row of the form `(0, y)`, `y ≠ 0`, if there is one.
    fn vertical_row(&self) -> Option<&Vector<K>> {
        self.space
            .basis()
            .iter()
            .find(|row| row.leading().is_some_and(|p| p >= self.shape.input))
    }

    pub fn is_functional(&self) -> bool {
        self.vertical_row().is_none()
    }

    /// Recover the partial map whose graph this is.
    pub fn decode(&self) -> Result<PartialMap<K>, NotFunctionalError> {
        if let Some(row) = self.vertical_row() {
            return Err(NotFunctionalError {
                offending: row.split_at(self.shape.input).1.to_string(),
            });
        }
        let (xs, ys): (Vec<_>, Vec<_>) = self
            .space
            .basis()
            .iter()
            .map(|row| row.split_at(self.shape.input))
            .unzip();
        let domain = Subspace::span_unchecked(self.shape.input, xs.clone());
        debug_assert_eq!(domain.basis(), xs.as_slice());
        Ok(PartialMap::from_parts(self.shape, domain, ys))
    }

    /// Projection of the graph onto `E`.
    pub fn domain(&self) -> Subspace<K> {
        self.space.truncate(self.shape.input)
    }

    /// Projection of the graph onto `F`.
    pub fn range(&self) -> Subspace<K> {
        self.space.drop_prefix(self.shape.input)
    }

    /// Inclusion of graphs.
    pub fn is_subgraph_of(&self, other: &Self) -> bool {
        self.shape == other.shape && self.space.is_subspace_of(&other.space)
    }

    pub fn intersect(&self, other: &Self) -> Result<Self, GraftError> {
        self.same_shape(other)?;
        Ok(Self {
            shape: self.shape,
            space: self.space.intersect(&other.space),
        })
    }

    pub fn sum(&self, other: &Self) -> Result<Self, GraftError> {
        self.same_shape(other)?;
        Ok(Self {
            shape: self.shape,
            space: self.space.sum(&other.space),
        })
    }

    /// The first projection `E × F →ₚ E`, defined on this graph.
    pub fn fst(&self) -> PartialMap<K> {
        self.projection(true)
    }

    /// The second projection `E × F →ₚ F`, defined on this graph.
    pub fn snd(&self) -> PartialMap<K> {
        self.projection(false)
    }

    fn projection(&self, first: bool) -> PartialMap<K> {
        let n = self.shape.input;
        let target = if first { n } else { self.shape.output };
        let images = self
            .space
            .basis()
            .iter()
            .map(|row| {
                let (x, y) = row.split_at(n);
                if first { x } else { y }
            })
            .collect();
        PartialMap::from_parts(
            Shape::new(self.shape.product_dim(), target),
            self.space.clone(),
            images,
        )
    }

    fn same_shape(&self, other: &Self) -> Result<(), GraftError> {
        if self.shape != other.shape {
            return Err(GraftError::ShapeMismatch {
                expected: self.shape,
                actual: other.shape,
            });
        }
        Ok(())
    }
}

impl<K: Field> fmt::Display for Graph<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph[{}] {}", self.shape, self.space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qvec;
    use crate::scalar::Rational;

    fn shape() -> Shape {
        Shape::new(2, 1)
    }

    #[test]
    fn round_trip() {
        let f = PartialMap::<Rational>::from_pairs(shape(), [(qvec![1, 1], qvec![4])]).unwrap();
        let g = Graph::encode(&f);
        assert!(g.is_functional());
        assert!(g.contains_pair(&qvec![2, 2], &qvec![8]));
        assert!(!g.contains_pair(&qvec![2, 2], &qvec![7]));
        assert_eq!(g.decode().unwrap(), f);
        assert_eq!(Graph::encode(&g.decode().unwrap()), g);
    }

    #[test]
    fn vertical_pair_is_rejected() {
        let g = Graph::<Rational>::from_pairs(shape(), [(qvec![1, 0], qvec![1]), (qvec![1, 0], qvec![2])])
            .unwrap();
        assert!(!g.is_functional());
        let err = g.decode().unwrap_err();
        assert_eq!(err.offending, "(1)");
    }

    #[test]
    fn zero_graph_decodes_to_bottom() {
        let g = Graph::<Rational>::new(shape(), Subspace::zero(3)).unwrap();
        let f = g.decode().unwrap();
        assert!(f.domain().is_zero());
        assert_eq!(f.shape(), shape());
    }

    #[test]
    fn new_checks_product_dimension() {
        assert!(Graph::<Rational>::new(shape(), Subspace::zero(2)).is_err());
    }

    #[test]
    fn deserialization_checks_product_dimension() {
        let bad = r#"{"shape":{"input":2,"output":1},"space":{"dim":2,"basis":[]}}"#;
        assert!(serde_json::from_str::<Graph<Rational>>(bad).is_err());
        let good = r#"{"shape":{"input":2,"output":1},"space":{"dim":3,"basis":[["1","0","2"]]}}"#;
        let graph: Graph<Rational> = serde_json::from_str(good).unwrap();
        assert!(graph.contains_pair(&qvec![1, 0], &qvec![2]));
    }

    #[test]
    fn projections_are_partial_maps_on_the_graph() {
        let f = PartialMap::<Rational>::from_pairs(shape(), [(qvec![1, 2], qvec![3])]).unwrap();
        let g = f.graph();
        let fst = g.fst();
        let snd = g.snd();
        let p = qvec![2, 4, 6];
        assert_eq!(fst.eval(&p).unwrap(), qvec![2, 4]);
        assert_eq!(snd.eval(&p).unwrap(), qvec![6]);
        assert_eq!(g.domain(), *f.domain());
        assert!(g.range().is_full());
    }

    #[test]
    fn order_is_graph_inclusion() {
        let small = PartialMap::<Rational>::from_pairs(shape(), [(qvec![1, 0], qvec![3])]).unwrap();
        let big = PartialMap::<Rational>::from_pairs(
            shape(),
            [(qvec![1, 0], qvec![3]), (qvec![0, 1], qvec![5])],
        )
        .unwrap();
        assert!(small.graph().is_subgraph_of(&big.graph()));
        assert!(!big.graph().is_subgraph_of(&small.graph()));
    }
}
