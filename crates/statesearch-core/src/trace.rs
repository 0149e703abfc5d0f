use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::node::{NodeId, SearchNode};
use crate::traits::SearchState;

/// How much the default observer reports. Levels are cumulative.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    #[default]
    None,
    StatsOnly,
    Low,
    High,
}

impl FromStr for Verbosity {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "none" => Ok(Verbosity::None),
            "1" | "statsonly" | "stats" => Ok(Verbosity::StatsOnly),
            "2" | "low" => Ok(Verbosity::Low),
            "3" | "high" => Ok(Verbosity::High),
            _ => Err(ConfigurationError::UnknownVerbosity(s.to_owned())),
        }
    }
}

/// What happened to a generated child.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnqueueOutcome {
    Enqueued,
    /// An open node for the same state already has a path cost no greater.
    Dominated,
    AlreadyExplored,
}

/// Counters of one search run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub iterations: u64,
    pub max_frontier_size: usize,
    pub generated: u64,
    pub duration: Duration,
}

/// Hook driven by the engine once per dequeued node and once per enqueue decision.
pub trait SearchObserver<S: SearchState> {
    fn node_dequeued(&mut self, _id: NodeId, _node: &SearchNode<S>) {}

    fn child_considered(
        &mut self,
        _parent: &SearchNode<S>,
        _action: &S::Action,
        _child: &S,
        _outcome: EnqueueOutcome,
    ) {
    }

    fn depth_cutoff(&mut self, _node: &SearchNode<S>) {}

    /// Called periodically during the search and once when it ends.
    fn statistics(&mut self, _stats: &SearchStats) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl<S: SearchState> SearchObserver<S> for Silent {}

/// Reports search progress through `tracing`, indenting by node depth.
pub struct TracingObserver {
    verbosity: Verbosity,
    prefixes: Vec<String>,
}

impl TracingObserver {
    pub fn new(verbosity: Verbosity) -> Self {
        TracingObserver {
            verbosity,
            prefixes: vec![],
        }
    }

    fn prefix(&mut self, depth: u32) -> &str {
        let depth = depth as usize;
        while self.prefixes.len() <= depth {
            let next = "      ".repeat(self.prefixes.len());
            self.prefixes.push(next);
        }
        &self.prefixes[depth]
    }
}

impl<S: SearchState + Debug> SearchObserver<S> for TracingObserver {
    fn node_dequeued(&mut self, id: NodeId, node: &SearchNode<S>) {
        if self.verbosity >= Verbosity::High {
            let prefix = self.prefix(node.depth());
            tracing::trace!("{prefix}Current node:\n{}", node.display_with_prefix(id, prefix));
        } else if self.verbosity >= Verbosity::Low {
            let prefix = self.prefix(node.depth());
            tracing::debug!("{prefix} X");
        }
    }

    fn child_considered(
        &mut self,
        parent: &SearchNode<S>,
        action: &S::Action,
        child: &S,
        outcome: EnqueueOutcome,
    ) {
        if self.verbosity < Verbosity::High {
            return;
        }
        let prefix = self.prefix(parent.depth());
        let decision = match outcome {
            EnqueueOutcome::Enqueued => "enqueued",
            EnqueueOutcome::Dominated => "already in frontier with lower cost --> no action",
            EnqueueOutcome::AlreadyExplored => "already explored --> no action",
        };
        tracing::trace!("{prefix}Child via {action}: {child:?} --> {decision}");
    }

    fn depth_cutoff(&mut self, node: &SearchNode<S>) {
        if self.verbosity >= Verbosity::Low {
            let prefix = self.prefix(node.depth());
            tracing::debug!("{prefix}max depth reached, cutting tree");
        }
    }

    fn statistics(&mut self, stats: &SearchStats) {
        if self.verbosity >= Verbosity::StatsOnly {
            tracing::info!(
                iterations = stats.iterations,
                max_frontier_size = stats.max_frontier_size,
                generated = stats.generated,
                duration_sec = stats.duration.as_secs_f64(),
                "search statistics"
            );
        }
    }
}
