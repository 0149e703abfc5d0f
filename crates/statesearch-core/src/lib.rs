//! Core types for `statesearch`.
//!
//! This crate provides the vocabulary shared by the search engine and the planning graph:
//! literals, ground actions, the state interface, the node arena and the frontier.

mod action;
mod error;
mod frontier;
mod literal;
mod node;
pub mod trace;
pub mod traits;

pub use crate::action::*;
pub use crate::error::*;
pub use crate::frontier::*;
pub use crate::literal::*;
pub use crate::node::*;
