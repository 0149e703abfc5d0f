//! State-space search with a planning-graph heuristic.
//!
//! [`Explorer`] runs graph search over any [`SearchState`](traits::SearchState) with one of
//! five [`Strategy`] orderings. The member crates supply the building blocks: literals, actions,
//! the frontier and node arena in `statesearch-core`, planning graphs and literal-set states in
//! [`graphplan`], and the air-cargo domain in [`cargo`].

mod explorer;
mod report;

pub use statesearch_core::*;
pub use statesearch_cargo as cargo;
pub use statesearch_graphplan as graphplan;

pub use crate::explorer::*;
pub use crate::report::*;
