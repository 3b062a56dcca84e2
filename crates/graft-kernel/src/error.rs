//! Error types for graft kernel operations.
//!
//! Recoverable failures are returned as values. Contract violations
//! (`join_disjoint` on overlapping domains, extending a map by a vector it
//! already covers) panic instead.

use crate::partial::Shape;

/// Two partial maps disagree somewhere on the overlap of their domains, or
/// live over different spaces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncompatibleError {
    /// The agreement condition fails at `witness`.
    #[error("maps disagree at {witness}: left gives {left}, right gives {right}")]
    Disagreement {
        witness: String,
        left: String,
        right: String,
    },

    #[error("shape mismatch: left is {left}, right is {right}")]
    Shape { left: Shape, right: Shape },
}

/// A candidate graph contains `(0, y)` with `y ≠ 0`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("subspace is not a function graph: it contains (0, {offending})")]
pub struct NotFunctionalError {
    pub offending: String,
}

/// Evaluation outside the domain of a partial map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{point} is not in the domain {domain}")]
pub struct NotInDomainError {
    pub point: String,
    pub domain: String,
}

/// Errors arising from graft kernel operations.
#[derive(Debug, thiserror::Error)]
pub enum GraftError {
    #[error(transparent)]
    Incompatible(#[from] IncompatibleError),

    #[error(transparent)]
    NotFunctional(#[from] NotFunctionalError),

    #[error(transparent)]
    NotInDomain(#[from] NotInDomainError),

    /// Operands live over different spaces.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    /// A vector or subspace has the wrong ambient dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A family has no common extension for some pair of members.
    #[error("family is not directed: {description}")]
    NotDirected { description: String },

    /// A chain step does not extend its predecessor.
    #[error("chain is not ascending at step {index}")]
    NotAscending { index: usize },

    #[error("family is empty")]
    EmptyFamily,

    /// The vector to extend by is already covered.
    #[error("{point} already lies in the domain")]
    AlreadyInDomain { point: String },

    /// A decomposition strategy returned no split or an invalid one.
    #[error("decomposition failed: {description}")]
    Decomposition { description: String },

    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    /// A law fixture could not be parsed.
    #[error("invalid fixture: {0}")]
    Fixture(String),
}

/// Which law a check exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Law {
    Reflexivity,
    Transitivity,
    Antisymmetry,
    Bottom,
    MeetLowerBound,
    MeetGreatest,
    Agreement,
    JoinUpperBound,
    JoinDomain,
    JoinLeast,
    StrategyIndependence,
    Directedness,
    ColimitUpperBound,
    ColimitDomain,
    GraphRoundTrip,
    GraphOrder,
}

impl Law {
    pub fn as_str(self) -> &'static str {
        match self {
            Law::Reflexivity => "reflexivity",
            Law::Transitivity => "transitivity",
            Law::Antisymmetry => "antisymmetry",
            Law::Bottom => "bottom",
            Law::MeetLowerBound => "meet_lower_bound",
            Law::MeetGreatest => "meet_greatest",
            Law::Agreement => "agreement",
            Law::JoinUpperBound => "join_upper_bound",
            Law::JoinDomain => "join_domain",
            Law::JoinLeast => "join_least",
            Law::StrategyIndependence => "strategy_independence",
            Law::Directedness => "directedness",
            Law::ColimitUpperBound => "colimit_upper_bound",
            Law::ColimitDomain => "colimit_domain",
            Law::GraphRoundTrip => "graph_round_trip",
            Law::GraphOrder => "graph_order",
        }
    }
}

/// A concrete violation of a law, located by member indices.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub law: Law,
    pub witness_id: String,
    pub members: Vec<usize>,
    pub description: String,
}
