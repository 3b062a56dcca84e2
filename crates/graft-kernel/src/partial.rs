//! Partial linear maps `E →ₚ F`.
//!
//! A partial map is a subspace `D ⊆ E` together with a linear function
//! `D → F`. It is stored by the images of the canonical basis of `D`, which
//! makes the representation unique: two partial maps are structurally equal
//! exactly when they have the same domain and agree on it.
//!
//! Evaluation is checked at the boundary. `eval(x)` answers
//! `Err(NotInDomainError)` for `x ∉ D` instead of encoding membership in
//! the type of `x`.

use crate::error::{GraftError, NotInDomainError};
use crate::graph::Graph;
use crate::linear::LinearMap;
use crate::scalar::Field;
use crate::subspace::Subspace;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;

/// Ambient dimensions of a partial map: `E = K^input`, `F = K^output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub input: usize,
    pub output: usize,
}

impl Shape {
    pub fn new(input: usize, output: usize) -> Self {
        Self { input, output }
    }

    /// Dimension of the product space `E × F`.
    pub fn product_dim(&self) -> usize {
        self.input + self.output
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K^{} →ₚ K^{}", self.input, self.output)
    }
}

/// A linear map defined on a subspace of its nominal input space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "PartialMapRepr<K>",
    into = "PartialMapRepr<K>",
    bound(
        serialize = "K: Field + Serialize",
        deserialize = "K: Field + Deserialize<'de>"
    )
)]
pub struct PartialMap<K> {
    shape: Shape,
    domain: Subspace<K>,
    /// `images[i]` is the value at `domain.basis()[i]`.
    images: Vec<Vector<K>>,
}

impl<K: Field> PartialMap<K> {
    /// Build a partial map from its domain and the images of the domain's
    /// canonical basis, in basis order.
    pub fn new(
        shape: Shape,
        domain: Subspace<K>,
        images: Vec<Vector<K>>,
    ) -> Result<Self, GraftError> {
        if domain.ambient_dim() != shape.input {
            return Err(GraftError::DimensionMismatch {
                expected: shape.input,
                actual: domain.ambient_dim(),
            });
        }
        if images.len() != domain.dim() {
            return Err(GraftError::DimensionMismatch {
                expected: domain.dim(),
                actual: images.len(),
            });
        }
        if let Some(bad) = images.iter().find(|y| y.dim() != shape.output) {
            return Err(GraftError::DimensionMismatch {
                expected: shape.output,
                actual: bad.dim(),
            });
        }
        Ok(Self {
            shape,
            domain,
            images,
        })
    }

    /// Build the partial map generated by `x ↦ y` for every given pair.
    ///
    /// The domain is the span of the inputs. Fails with `NotFunctional`
    /// when the pairs force two different values on the same input.
    pub fn from_pairs<I>(shape: Shape, pairs: I) -> Result<Self, GraftError>
    where
        I: IntoIterator<Item = (Vector<K>, Vector<K>)>,
    {
        Ok(Graph::from_pairs(shape, pairs)?.decode()?)
    }

    pub(crate) fn from_parts(shape: Shape, domain: Subspace<K>, images: Vec<Vector<K>>) -> Self {
        debug_assert_eq!(domain.dim(), images.len());
        Self {
            shape,
            domain,
            images,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn domain(&self) -> &Subspace<K> {
        &self.domain
    }

    /// Images of the canonical domain basis.
    pub fn images(&self) -> &[Vector<K>] {
        &self.images
    }

    /// `(basis vector, image)` pairs determining this map.
    pub fn pairs(&self) -> impl Iterator<Item = (&Vector<K>, &Vector<K>)> {
        self.domain.basis().iter().zip(&self.images)
    }

    pub fn is_total(&self) -> bool {
        self.domain.is_full()
    }

    /// Evaluate at `x`, which must lie in the domain.
    pub fn eval(&self, x: &Vector<K>) -> Result<Vector<K>, NotInDomainError> {
        let coeffs = self
            .domain
            .coordinates(x)
            .ok_or_else(|| NotInDomainError {
                point: x.to_string(),
                domain: self.domain.to_string(),
            })?;
        Ok(Vector::combination(
            self.shape.output,
            coeffs.iter().zip(&self.images),
        ))
    }

    /// Restriction to a subspace of the domain.
    pub fn restrict(&self, sub: &Subspace<K>) -> Result<Self, GraftError> {
        if sub.ambient_dim() != self.shape.input {
            return Err(GraftError::DimensionMismatch {
                expected: self.shape.input,
                actual: sub.ambient_dim(),
            });
        }
        let images = sub
            .basis()
            .iter()
            .map(|b| self.eval(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_parts(self.shape, sub.clone(), images))
    }

    /// The underlying total map, if the domain is the whole input space.
    pub fn to_linear_map(&self) -> Option<LinearMap<K>> {
        if !self.is_total() {
            return None;
        }
        let columns = (0..self.shape.input)
            .map(|j| self.eval(&Vector::unit(self.shape.input, j)))
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        LinearMap::from_columns(self.shape, columns).ok()
    }

    /// The graph `{(x, f(x)) : x ∈ D} ⊆ E × F`.
    pub fn graph(&self) -> Graph<K> {
        Graph::encode(self)
    }

    /// Deterministic SHA-256 fingerprint of the canonical form.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut builder = Fingerprint::builder()
            .field("input", &self.shape.input.to_string())
            .field("output", &self.shape.output.to_string());
        for (x, y) in self.pairs() {
            builder = builder.field("x", &x.to_string()).field("y", &y.to_string());
        }
        builder.finish()
    }
}

impl<K: Field> PartialOrd for PartialMap<K> {
    /// The extension order: `f <= g` iff `g` extends `f`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (
            crate::order::le(self, other),
            crate::order::le(other, self),
        ) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<K: Field> fmt::Display for PartialMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on dim {}", self.shape, self.domain.dim())?;
        for (x, y) in self.pairs() {
            write!(f, "; {x} ↦ {y}")?;
        }
        Ok(())
    }
}

/// A content-addressed fingerprint of a partial map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn builder() -> FingerprintBuilder {
        FingerprintBuilder {
            hasher: Sha256::new(),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feeds fields in a stable order to produce a deterministic hash.
pub struct FingerprintBuilder {
    hasher: Sha256,
}

impl FingerprintBuilder {
    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.hasher.update(name.as_bytes());
        self.hasher.update(b":");
        self.hasher.update(value.as_bytes());
        self.hasher.update(b"\n");
        self
    }

    pub fn finish(self) -> Fingerprint {
        let hash = self.hasher.finalize();
        Fingerprint(format!("{hash:x}"))
    }
}

/// Wire form: the shape plus generating `(x, y)` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "K: Serialize", deserialize = "K: Deserialize<'de>"))]
pub struct PartialMapRepr<K> {
    pub input: usize,
    pub output: usize,
    #[serde(default)]
    pub pairs: Vec<PairRepr<K>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRepr<K> {
    pub x: Vector<K>,
    pub y: Vector<K>,
}

impl<K: Field> From<PartialMap<K>> for PartialMapRepr<K> {
    fn from(map: PartialMap<K>) -> Self {
        let pairs = map
            .domain
            .basis()
            .iter()
            .cloned()
            .zip(map.images)
            .map(|(x, y)| PairRepr { x, y })
            .collect();
        Self {
            input: map.shape.input,
            output: map.shape.output,
            pairs,
        }
    }
}

impl<K: Field> TryFrom<PartialMapRepr<K>> for PartialMap<K> {
    type Error = GraftError;

    fn try_from(repr: PartialMapRepr<K>) -> Result<Self, Self::Error> {
        let shape = Shape::new(repr.input, repr.output);
        Self::from_pairs(shape, repr.pairs.into_iter().map(|p| (p.x, p.y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qvec;
    use crate::scalar::Rational;

    fn line_map() -> PartialMap<Rational> {
        // span{(1, 2)} with (1, 2) ↦ (5)
        PartialMap::from_pairs(Shape::new(2, 1), [(qvec![1, 2], qvec![5])]).unwrap()
    }

    #[test]
    fn eval_on_domain() {
        let f = line_map();
        assert_eq!(f.eval(&qvec![2, 4]).unwrap(), qvec![10]);
        assert_eq!(f.eval(&qvec![0, 0]).unwrap(), qvec![0]);
    }

    #[test]
    fn eval_outside_domain_is_error() {
        let err = line_map().eval(&qvec![1, 0]).unwrap_err();
        assert_eq!(err.point, "(1, 0)");
    }

    #[test]
    fn from_pairs_spans_and_is_canonical() {
        let a = PartialMap::from_pairs(
            Shape::new(2, 1),
            [(qvec![1, 0], qvec![3]), (qvec![0, 1], qvec![5])],
        )
        .unwrap();
        let b = PartialMap::from_pairs(
            Shape::new(2, 1),
            [(qvec![1, 1], qvec![8]), (qvec![1, -1], qvec![-2])],
        )
        .unwrap();
        assert_eq!(a, b);
        assert!(a.is_total());
        assert_eq!(a.eval(&qvec![2, 3]).unwrap(), qvec![21]);
    }

    #[test]
    fn from_pairs_rejects_inconsistent_values() {
        let err = PartialMap::from_pairs(
            Shape::new(1, 1),
            [(qvec![1], qvec![1]), (qvec![2], qvec![3])],
        )
        .unwrap_err();
        assert!(matches!(err, GraftError::NotFunctional(_)));
    }

    #[test]
    fn new_checks_dimensions() {
        let domain = Subspace::span(2, vec![qvec![1, 0]]).unwrap();
        let err = PartialMap::new(Shape::new(2, 1), domain, vec![]).unwrap_err();
        assert!(matches!(
            err,
            GraftError::DimensionMismatch {
                expected: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn restrict_to_subspace() {
        let f = PartialMap::from_pairs(
            Shape::new(2, 1),
            [(qvec![1, 0], qvec![3]), (qvec![0, 1], qvec![5])],
        )
        .unwrap();
        let diag = Subspace::span(2, vec![qvec![1, 1]]).unwrap();
        let r = f.restrict(&diag).unwrap();
        assert_eq!(r.eval(&qvec![2, 2]).unwrap(), qvec![16]);
        assert!(r <= f);
        assert!(line_map().restrict(&diag).is_err());
    }

    #[test]
    fn total_map_converts_to_linear_map() {
        let f = PartialMap::from_pairs(
            Shape::new(2, 1),
            [(qvec![1, 0], qvec![3]), (qvec![0, 1], qvec![5])],
        )
        .unwrap();
        let m = f.to_linear_map().unwrap();
        assert_eq!(m.apply(&qvec![1, 1]), qvec![8]);
        assert!(line_map().to_linear_map().is_none());
    }

    #[test]
    fn fingerprint_is_representation_independent() {
        let a = PartialMap::from_pairs(Shape::new(2, 1), [(qvec![1, 2], qvec![5])]).unwrap();
        let b = PartialMap::from_pairs(Shape::new(2, 1), [(qvec![-2, -4], qvec![-10])]).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        let c = PartialMap::from_pairs(Shape::new(2, 1), [(qvec![1, 2], qvec![6])]).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn serialized_form() {
        let f = line_map();
        insta::assert_json_snapshot!(f, @r###"
        {
          "input": 2,
          "output": 1,
          "pairs": [
            {
              "x": [
                "1",
                "2"
              ],
              "y": [
                "5"
              ]
            }
          ]
        }
        "###);
        let back: PartialMap<Rational> =
            serde_json::from_value(serde_json::to_value(&f).unwrap()).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn deserialize_rejects_non_function() {
        let json = serde_json::json!({
            "input": 1,
            "output": 1,
            "pairs": [{"x": [0], "y": [1]}]
        });
        assert!(serde_json::from_value::<PartialMap<Rational>>(json).is_err());
    }

    #[test]
    fn deserialize_without_pairs_is_bottom() {
        let json = serde_json::json!({ "input": 2, "output": 1 });
        let f: PartialMap<Rational> = serde_json::from_value(json).unwrap();
        assert!(f.domain().is_zero());
        assert_eq!(f.shape(), Shape::new(2, 1));
    }

    #[test]
    fn large_entries_solve_exactly() {
        let f = PartialMap::from_pairs(
            Shape::new(3, 1),
            [
                (qvec![1000000007, 998244353, 1000000009], qvec![1]),
                (qvec![999999937, 1000000021, 999999929], qvec![2]),
                (qvec![1000000033, 999999893, 1000000087], qvec![3]),
            ],
        )
        .unwrap();
        assert!(f.is_total());
        let image = |x: Vector<Rational>| f.eval(&x).unwrap().to_string();
        assert_eq!(image(qvec![1, 0, 0]), "(-97557406698493/6047417249488542)");
        assert_eq!(image(qvec![0, 1, 0]), "(6000000296/9071125874232813)");
        assert_eq!(image(qvec![0, 0, 1]), "(292660258719667/18142251748465626)");
    }
}
