use std::fmt::Display;
use std::hash::Hash;

/// Anything that carries a non-negative step cost.
pub trait Cost {
    fn cost(&self) -> f64;
}

/// A node of the state space, as seen by the search engine.
///
/// States are values: `resulting_state` must build a new state and leave the receiver untouched,
/// since the explored set and the frontier keep earlier states around. Equality and hashing must
/// be structural so that the same configuration reached along two paths is recognised.
pub trait SearchState: Clone + Eq + Hash {
    type Action: Cost + Clone + Display;

    fn executable_actions(&self) -> Vec<Self::Action>;

    fn resulting_state(&self, action: &Self::Action) -> Self;

    fn is_goal(&self) -> bool;

    /// Estimate of the remaining cost to a goal. `f64::INFINITY` reports the goal as unreachable
    /// from this state; the state remains expandable.
    fn heuristic_value(&self) -> f64 {
        0.0
    }
}
