//! GraphPlan-style planning graphs and the set-level heuristic.
//!
//! [`PlanningGraph`] expands reachable propositions and actions layer by layer, tracking which
//! pairs exclude each other. [`StripsState`] is a ready-made search state over a catalog of
//! ground actions whose heuristic can be backed by the graph.

mod graph;
mod mutex;
mod strips;

pub use crate::graph::*;
pub use crate::mutex::*;
pub use crate::strips::*;
