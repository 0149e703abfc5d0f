use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::time::{Duration, Instant};

use ahash::AHashSet;
use statesearch_core::trace::{
    EnqueueOutcome, SearchObserver, SearchStats, TracingObserver, Verbosity,
};
use statesearch_core::traits::SearchState;
use statesearch_core::{ConfigurationError, Frontier, NodeArena, NodeId, Order};

/// Statistics are reported to the observer every this many iterations.
const STATS_INTERVAL: u64 = 100;

/// The named search algorithms, each a frontier ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Breadth-first.
    Bfs,
    /// Depth-first.
    Dfs,
    /// Uniform cost.
    MinCost,
    /// Greedy best-first on the heuristic alone.
    BestFirstGreedy,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Bfs,
        Strategy::Dfs,
        Strategy::MinCost,
        Strategy::BestFirstGreedy,
        Strategy::AStar,
    ];

    pub fn order(self) -> Order {
        match self {
            Strategy::Bfs => Order::Fifo,
            Strategy::Dfs => Order::Lifo,
            Strategy::MinCost => Order::MinG,
            Strategy::BestFirstGreedy => Order::MinH,
            Strategy::AStar => Order::MinF,
        }
    }

    /// Whether the ordering reads heuristic values.
    pub fn is_informed(self) -> bool {
        matches!(self, Strategy::BestFirstGreedy | Strategy::AStar)
    }
}

impl FromStr for Strategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Strategy::Bfs),
            "dfs" => Ok(Strategy::Dfs),
            "mincost" => Ok(Strategy::MinCost),
            "bfg" => Ok(Strategy::BestFirstGreedy),
            "a*" | "astar" => Ok(Strategy::AStar),
            _ => Err(ConfigurationError::UnknownStrategy(s.to_owned())),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Strategy::Bfs => "BFS",
            Strategy::Dfs => "DFS",
            Strategy::MinCost => "MinCost",
            Strategy::BestFirstGreedy => "BFG",
            Strategy::AStar => "A*",
        })
    }
}

/// Settings of an [`Explorer`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Nodes at this depth are not expanded. Must be positive when set.
    pub max_depth: Option<i64>,
    /// Keep searching after the first goal, returning the cheapest one found.
    pub anytime: bool,
    pub verbosity: Verbosity,
}

impl SearchConfig {
    pub fn with_max_depth(mut self, max_depth: i64) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_anytime(mut self, anytime: bool) -> Self {
        self.anytime = anytime;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Graph search over [`SearchState`]s: a frontier ordered by the strategy, and an explored set
/// so that no state is expanded twice.
///
/// The explorer owns its node arena, frontier and explored set and clears them at the start of
/// every run, so one explorer can be reused for any number of runs.
pub struct Explorer<S: SearchState> {
    strategy: Strategy,
    config: SearchConfig,
    max_depth: Option<u32>,
    arena: NodeArena<S>,
    frontier: Frontier<S>,
    explored: AHashSet<S>,
    stats: SearchStats,
    solution_cost: Option<f64>,
}

impl<S: SearchState> Explorer<S> {
    pub fn new(strategy: Strategy, config: SearchConfig) -> Result<Self, ConfigurationError> {
        let max_depth = match config.max_depth {
            None => None,
            Some(d) if d <= 0 => return Err(ConfigurationError::NonPositiveDepth(d)),
            Some(d) => Some(u32::try_from(d).unwrap_or(u32::MAX)),
        };
        Ok(Explorer {
            strategy,
            config,
            max_depth,
            arena: NodeArena::new(),
            frontier: Frontier::new(strategy.order()),
            explored: AHashSet::new(),
            stats: SearchStats::default(),
            solution_cost: None,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches from `initial`, reporting progress to `observer`. Returns the actions leading to
    /// the goal found, or `None` if the frontier ran out first.
    pub fn run_observed(
        &mut self,
        initial: S,
        observer: &mut impl SearchObserver<S>,
    ) -> Option<Vec<S::Action>> {
        let _span = tracing::debug_span!("search", strategy = %self.strategy).entered();
        let start = Instant::now();

        self.arena.reset();
        self.frontier.clear();
        self.explored.clear();
        self.stats = SearchStats::default();
        self.solution_cost = None;

        let root = self.arena.root(initial);
        self.frontier.enqueue(&self.arena, root);
        let mut best: Option<NodeId> = None;

        while !self.frontier.is_empty() {
            self.stats.iterations += 1;
            self.stats.max_frontier_size = self.stats.max_frontier_size.max(self.frontier.len());
            if self.stats.iterations % STATS_INTERVAL == 0 {
                self.stats.duration = start.elapsed();
                observer.statistics(&self.stats);
            }

            let id = self.frontier.dequeue(&self.arena);
            let node = &self.arena[id];
            observer.node_dequeued(id, node);

            if node.state().is_goal() {
                if best.map_or(true, |b| node.g() < self.arena[b].g()) {
                    tracing::debug!(g = node.g(), depth = node.depth(), "goal found");
                    best = Some(id);
                }
                if self.config.anytime {
                    continue;
                }
                break;
            }

            self.explored.insert(node.state().clone());
            if self.max_depth.is_some_and(|d| node.depth() >= d) {
                observer.depth_cutoff(node);
                continue;
            }

            for action in node.state().executable_actions() {
                let parent = &self.arena[id];
                let child_state = parent.state().resulting_state(&action);
                if self.explored.contains(&child_state) {
                    observer.child_considered(
                        parent,
                        &action,
                        &child_state,
                        EnqueueOutcome::AlreadyExplored,
                    );
                    continue;
                }

                self.stats.generated += 1;
                let child = self.arena.child(id, action.clone(), child_state);
                let outcome = if self.frontier.enqueue(&self.arena, child) {
                    EnqueueOutcome::Enqueued
                } else {
                    EnqueueOutcome::Dominated
                };
                observer.child_considered(
                    &self.arena[id],
                    &action,
                    self.arena[child].state(),
                    outcome,
                );
                if outcome == EnqueueOutcome::Dominated {
                    self.arena.discard(child);
                }
            }
        }

        self.stats.duration = start.elapsed();
        observer.statistics(&self.stats);

        let best = best?;
        self.solution_cost = Some(self.arena[best].g());
        Some(self.arena.path_to(best))
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Nodes dequeued by the last run.
    pub fn iterations(&self) -> u64 {
        self.stats.iterations
    }

    pub fn max_frontier_size(&self) -> usize {
        self.stats.max_frontier_size
    }

    pub fn duration(&self) -> Duration {
        self.stats.duration
    }

    pub fn duration_msec(&self) -> u128 {
        self.stats.duration.as_millis()
    }

    /// Path cost of the plan returned by the last run.
    pub fn solution_cost(&self) -> Option<f64> {
        self.solution_cost
    }
}

impl<S: SearchState + Debug> Explorer<S> {
    /// Searches from `initial`, logging through `tracing` at the configured verbosity.
    pub fn run(&mut self, initial: S) -> Option<Vec<S::Action>> {
        let mut observer = TracingObserver::new(self.config.verbosity);
        self.run_observed(initial, &mut observer)
    }
}

impl<S: SearchState> Display for Explorer<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.strategy, f)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::{Display, Formatter};

    use statesearch_core::traits::Cost;

    use super::*;

    /// Walk along a number line from 0; the goal is `target`.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Line {
        at: i32,
        target: i32,
    }

    #[derive(Clone, Debug)]
    struct Step(i32, f64);

    impl Cost for Step {
        fn cost(&self) -> f64 {
            self.1
        }
    }

    impl Display for Step {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:+}", self.0)
        }
    }

    impl SearchState for Line {
        type Action = Step;

        fn executable_actions(&self) -> Vec<Step> {
            // a long hop that is dearer than two short ones
            vec![Step(1, 1.0), Step(-1, 1.0), Step(2, 3.0)]
        }

        fn resulting_state(&self, action: &Step) -> Self {
            Line {
                at: self.at + action.0,
                target: self.target,
            }
        }

        fn is_goal(&self) -> bool {
            self.at == self.target
        }

        fn heuristic_value(&self) -> f64 {
            (self.target - self.at).abs() as f64
        }
    }

    fn line(target: i32) -> Line {
        Line { at: 0, target }
    }

    fn moves(plan: &[Step]) -> Vec<i32> {
        plan.iter().map(|s| s.0).collect()
    }

    #[test]
    fn strategies_parse() {
        assert_eq!("BFS".parse(), Ok(Strategy::Bfs));
        assert_eq!("a*".parse(), Ok(Strategy::AStar));
        assert_eq!("astar".parse(), Ok(Strategy::AStar));
        assert_eq!("bfg".parse(), Ok(Strategy::BestFirstGreedy));
        assert_eq!(
            "ida".parse::<Strategy>(),
            Err(ConfigurationError::UnknownStrategy("ida".to_owned()))
        );
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
    }

    #[test]
    fn non_positive_depth_is_rejected() {
        for depth in [0, -3] {
            let result = Explorer::<Line>::new(Strategy::Bfs, SearchConfig::default().with_max_depth(depth));
            assert!(matches!(result, Err(ConfigurationError::NonPositiveDepth(d)) if d == depth));
        }
        assert!(Explorer::<Line>::new(Strategy::Bfs, SearchConfig::default().with_max_depth(1)).is_ok());
    }

    #[test]
    fn bfs_keeps_cheaper_duplicate_paths() {
        let mut explorer = Explorer::new(Strategy::Bfs, SearchConfig::default()).unwrap();
        let plan = explorer.run(line(4)).unwrap();
        // the hop to 2 is replaced in the frontier by the cheaper +1 +1
        assert_eq!(moves(&plan), [1, 1, 1, 1]);
        assert_eq!(explorer.solution_cost(), Some(4.0));
    }

    #[test]
    fn uniform_cost_and_astar_find_cheapest() {
        for strategy in [Strategy::MinCost, Strategy::AStar] {
            let mut explorer = Explorer::new(strategy, SearchConfig::default()).unwrap();
            let plan = explorer.run(line(4)).unwrap();
            assert_eq!(moves(&plan), [1, 1, 1, 1], "{strategy}");
            assert_eq!(explorer.solution_cost(), Some(4.0));
        }
    }

    #[test]
    fn astar_expands_less_than_uniform_cost() {
        let mut astar = Explorer::new(Strategy::AStar, SearchConfig::default()).unwrap();
        let mut ucs = Explorer::new(Strategy::MinCost, SearchConfig::default()).unwrap();
        astar.run(line(6)).unwrap();
        ucs.run(line(6)).unwrap();
        assert!(astar.iterations() < ucs.iterations());
    }

    #[test]
    fn anytime_keeps_searching_for_cheaper_goals() {
        let config = SearchConfig::default().with_max_depth(4);
        let mut explorer = Explorer::new(Strategy::Dfs, config).unwrap();
        let plan = explorer.run(line(4)).unwrap();
        assert_eq!(moves(&plan), [2, 2]);
        assert_eq!(explorer.solution_cost(), Some(6.0));
        assert_eq!(explorer.iterations(), 3);

        let mut explorer = Explorer::new(Strategy::Dfs, config.with_anytime(true)).unwrap();
        let plan = explorer.run(line(4)).unwrap();
        assert_eq!(moves(&plan), [2, 1, 1]);
        assert_eq!(explorer.solution_cost(), Some(5.0));
        assert_eq!(explorer.iterations(), 13);
    }

    #[test]
    fn depth_bound_cuts_search() {
        let config = SearchConfig::default().with_max_depth(1);
        let mut explorer = Explorer::new(Strategy::Bfs, config).unwrap();
        assert!(explorer.run(line(5)).is_none());
        assert_eq!(explorer.solution_cost(), None);
        // root plus its three children
        assert_eq!(explorer.iterations(), 4);
        assert_eq!(explorer.max_frontier_size(), 3);
    }

    #[test]
    fn start_can_be_goal() {
        let mut explorer = Explorer::new(Strategy::Dfs, SearchConfig::default()).unwrap();
        assert_eq!(explorer.run(line(0)).map(|p| p.len()), Some(0));
        assert_eq!(explorer.iterations(), 1);
    }

    #[derive(Default)]
    struct Counts {
        dequeued: usize,
        explored_children: usize,
        cutoffs: usize,
        reports: usize,
    }

    impl SearchObserver<Line> for Counts {
        fn node_dequeued(&mut self, _id: NodeId, _node: &statesearch_core::SearchNode<Line>) {
            self.dequeued += 1;
        }

        fn child_considered(
            &mut self,
            _parent: &statesearch_core::SearchNode<Line>,
            _action: &Step,
            _child: &Line,
            outcome: EnqueueOutcome,
        ) {
            if outcome == EnqueueOutcome::AlreadyExplored {
                self.explored_children += 1;
            }
        }

        fn depth_cutoff(&mut self, _node: &statesearch_core::SearchNode<Line>) {
            self.cutoffs += 1;
        }

        fn statistics(&mut self, _stats: &SearchStats) {
            self.reports += 1;
        }
    }

    #[test]
    fn observer_sees_every_decision() {
        let config = SearchConfig::default().with_max_depth(2);
        let mut explorer = Explorer::new(Strategy::Bfs, config).unwrap();
        let mut counts = Counts::default();
        assert!(explorer.run_observed(line(100), &mut counts).is_none());
        assert_eq!(counts.dequeued as u64, explorer.iterations());
        assert!(counts.explored_children > 0);
        assert!(counts.cutoffs > 0);
        assert_eq!(counts.reports, 1);
    }

    #[test]
    fn runs_are_independent() {
        let mut explorer = Explorer::new(Strategy::Bfs, SearchConfig::default()).unwrap();
        explorer.run(line(3)).unwrap();
        let first = explorer.iterations();
        explorer.run(line(3)).unwrap();
        assert_eq!(explorer.iterations(), first);
    }
}
