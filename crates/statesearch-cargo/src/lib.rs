//! The air-cargo logistics domain.
//!
//! Planes fly between airports and carry cargo loaded and unloaded at the airport they are
//! parked at. Problems can be read from a small text format or generated from a seed, and are
//! turned into [`StripsState`](statesearch_graphplan::StripsState) search states.

mod domain;
mod error;
mod parse;
mod random;

pub use crate::domain::*;
pub use crate::error::*;
pub use crate::random::*;
