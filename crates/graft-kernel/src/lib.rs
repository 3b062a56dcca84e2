//! # Graft Kernel
//!
//! Partial linear maps between finite-dimensional vector spaces, ordered by
//! extension. A partial map `f: E →ₚ F` is a linear map defined on a
//! subspace `dom f ⊆ E`; `f ≤ g` when `g` extends `f`.
//!
//! The order has a bottom (the map on `{0}`) and all meets. Joins exist
//! exactly for pairs that agree on their common domain, and directed
//! families have colimits. The graph codec identifies partial maps with the
//! functional subspaces of `E × F`, turning the order into inclusion.
//!
//! Every construction that needs a choice (how to split a point of
//! `dom f + dom g`, which member of a family to evaluate through) takes it
//! as an explicit strategy rather than assuming one.
//!
//! ## Architecture
//!
//! ```text
//! Field / Rational      ← exact scalars
//!     │
//! Vector / Subspace     ← canonical bases, sum, Zassenhaus intersection
//!     │
//! PartialMap<K>         ← shape, domain, images of the canonical basis
//!     │
//! ├── order             ← le, meet, bottom
//! ├── graph             ← encode / decode against E × F
//! ├── merge             ← try_join, join_disjoint (Decomposition strategy)
//! ├── colimit           ← directed families, chains, lazy unfoldings
//! └── extend            ← extend_by_vector, maximal extension
//!     │
//! law                   ← law checks with deterministic witness ids
//! ```

pub mod colimit;
pub mod error;
pub mod extend;
pub mod graph;
pub mod law;
pub mod linear;
pub mod merge;
pub mod order;
pub mod partial;
pub mod scalar;
pub mod subspace;
pub mod vector;

pub use colimit::{
    Chain, Colimit, Directed, Family, FiniteFamily, Search, Unfolding, chain_colimit,
    directed_colimit,
};
pub use error::{GraftError, IncompatibleError, Law, NotFunctionalError, NotInDomainError, Violation};
pub use extend::{
    extend_by_vector, maximal_extension, singleton, try_extend_by_vector, zero_extensions,
};
pub use graph::Graph;
pub use law::{LawCheck, LawResult, compute_witness_id, run_law_check};
pub use linear::LinearMap;
pub use merge::{
    Decomposition, LeftFirst, RightFirst, Strategy, check_agreement, join_all, join_disjoint,
    try_join, try_join_with,
};
pub use order::{bottom, le, meet};
pub use partial::{Fingerprint, PartialMap, Shape};
pub use scalar::{Field, Rational, q};
pub use subspace::{Subspace, solve_in};
pub use vector::Vector;
