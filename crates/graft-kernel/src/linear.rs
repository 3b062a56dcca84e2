//! Total linear maps `K^n → K^m`.
//!
//! Only the capability set the partial-map layer consumes: evaluation,
//! addition, scaling, composition, and restriction to a subspace.

use crate::error::GraftError;
use crate::partial::{PartialMap, Shape};
use crate::scalar::Field;
use crate::subspace::Subspace;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// A linear map stored by the images of the standard basis vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearMap<K> {
    shape: Shape,
    /// `columns[j]` is the image of `e_j`.
    columns: Vec<Vector<K>>,
}

impl<K: Field> LinearMap<K> {
    pub fn from_columns(shape: Shape, columns: Vec<Vector<K>>) -> Result<Self, GraftError> {
        if columns.len() != shape.input {
            return Err(GraftError::DimensionMismatch {
                expected: shape.input,
                actual: columns.len(),
            });
        }
        if let Some(bad) = columns.iter().find(|c| c.dim() != shape.output) {
            return Err(GraftError::DimensionMismatch {
                expected: shape.output,
                actual: bad.dim(),
            });
        }
        Ok(Self { shape, columns })
    }

    /// Build from row-major matrix entries (`rows.len() == output`).
    pub fn from_rows(input: usize, rows: Vec<Vec<K>>) -> Result<Self, GraftError> {
        let output = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != input) {
            return Err(GraftError::DimensionMismatch {
                expected: input,
                actual: bad.len(),
            });
        }
        let columns = (0..input)
            .map(|j| Vector::new(rows.iter().map(|r| r[j].clone()).collect()))
            .collect();
        Ok(Self {
            shape: Shape::new(input, output),
            columns,
        })
    }

    pub fn zero(shape: Shape) -> Self {
        Self {
            shape,
            columns: vec![Vector::zero(shape.output); shape.input],
        }
    }

    pub fn identity(dim: usize) -> Self {
        Self {
            shape: Shape::new(dim, dim),
            columns: (0..dim).map(|j| Vector::unit(dim, j)).collect(),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn apply(&self, x: &Vector<K>) -> Vector<K> {
        debug_assert_eq!(x.dim(), self.shape.input);
        Vector::combination(self.shape.output, x.coords().iter().zip(&self.columns))
    }

    pub fn add(&self, other: &Self) -> Result<Self, GraftError> {
        if self.shape != other.shape {
            return Err(GraftError::ShapeMismatch {
                expected: self.shape,
                actual: other.shape,
            });
        }
        Ok(Self {
            shape: self.shape,
            columns: self
                .columns
                .iter()
                .zip(&other.columns)
                .map(|(a, b)| a.add(b))
                .collect(),
        })
    }

    pub fn scale(&self, c: &K) -> Self {
        Self {
            shape: self.shape,
            columns: self.columns.iter().map(|v| v.scale(c)).collect(),
        }
    }

    /// `self ∘ inner`: apply `inner` first.
    pub fn compose(&self, inner: &Self) -> Result<Self, GraftError> {
        if inner.shape.output != self.shape.input {
            return Err(GraftError::DimensionMismatch {
                expected: self.shape.input,
                actual: inner.shape.output,
            });
        }
        Ok(Self {
            shape: Shape::new(inner.shape.input, self.shape.output),
            columns: inner.columns.iter().map(|c| self.apply(c)).collect(),
        })
    }

    /// The partial map obtained by forgetting everything outside `domain`.
    pub fn restrict(&self, domain: &Subspace<K>) -> Result<PartialMap<K>, GraftError> {
        if domain.ambient_dim() != self.shape.input {
            return Err(GraftError::DimensionMismatch {
                expected: self.shape.input,
                actual: domain.ambient_dim(),
            });
        }
        let images = domain.basis().iter().map(|b| self.apply(b)).collect();
        Ok(PartialMap::from_parts(self.shape, domain.clone(), images))
    }

    /// The total partial map with the same values.
    pub fn to_partial(&self) -> PartialMap<K> {
        let domain = Subspace::full(self.shape.input);
        let images = self.columns.clone();
        PartialMap::from_parts(self.shape, domain, images)
    }
}
