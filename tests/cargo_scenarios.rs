use statesearch::cargo::{generate, CargoProblem, Fact, InstanceSize};
use statesearch::graphplan::{GraphConfig, Heuristic, StripsState};
use statesearch::traits::SearchState;
use statesearch::{ConfigurationError, Explorer, GroundAction, SearchConfig, Strategy};

const ONE_CARGO: &str = "\
PLANES: P
AIRPORTS: A B
CARGOES: C
INITIAL_STATE: AT(C,A) AT(P,A)
GOAL_STATE: AT(C,B)
";

fn initial(heuristic: Heuristic) -> StripsState {
    let problem: CargoProblem = ONE_CARGO.parse().unwrap();
    problem.to_strips(heuristic, GraphConfig::default()).1
}

fn names(plan: &[GroundAction]) -> Vec<&str> {
    plan.iter().map(GroundAction::name).collect()
}

/// Replays `plan` from `state`, checking every step is applicable, and returns the final state.
fn replay(mut state: StripsState, plan: &[GroundAction]) -> StripsState {
    for action in plan {
        assert!(
            state.executable_actions().contains(action),
            "{action} is not applicable"
        );
        state = state.resulting_state(action);
    }
    state
}

fn solve(strategy: Strategy, heuristic: Heuristic, config: SearchConfig) -> (Explorer<StripsState>, Option<Vec<GroundAction>>) {
    let mut explorer = Explorer::new(strategy, config).unwrap();
    let plan = explorer.run(initial(heuristic));
    (explorer, plan)
}

#[test]
fn bfs_finds_the_three_step_plan() {
    let (explorer, plan) = solve(Strategy::Bfs, Heuristic::Blind, SearchConfig::default());
    let plan = plan.unwrap();
    assert_eq!(names(&plan), ["Load(C,P,A)", "Fly(P,A,B)", "Unload(C,P,B)"]);
    assert!(replay(initial(Heuristic::Blind), &plan).is_goal());
    assert!(explorer.iterations() > 0);
    assert!(explorer.max_frontier_size() > 0);
}

#[test]
fn min_cost_finds_the_same_plan_at_cost_three() {
    let (explorer, plan) = solve(Strategy::MinCost, Heuristic::Blind, SearchConfig::default());
    assert_eq!(
        names(&plan.unwrap()),
        ["Load(C,P,A)", "Fly(P,A,B)", "Unload(C,P,B)"]
    );
    assert_eq!(explorer.solution_cost(), Some(3.0));
}

#[test]
fn set_level_of_the_initial_state_is_three() {
    assert_eq!(initial(Heuristic::SetLevel).heuristic_value(), 3.0);
    assert_eq!(initial(Heuristic::UnmetGoals).heuristic_value(), 1.0);
    assert_eq!(initial(Heuristic::Blind).heuristic_value(), 0.0);
}

#[test]
fn astar_is_optimal_with_every_heuristic() {
    for heuristic in [Heuristic::Blind, Heuristic::UnmetGoals, Heuristic::SetLevel] {
        assert!(initial(heuristic).heuristic_value().is_finite(), "{heuristic:?}");
        let (explorer, plan) = solve(Strategy::AStar, heuristic, SearchConfig::default());
        assert_eq!(plan.map(|p| p.len()), Some(3), "{heuristic:?}");
        assert_eq!(explorer.solution_cost(), Some(3.0));
    }
}

#[test]
fn set_level_guides_astar_straight_to_the_goal() {
    let (blind, _) = solve(Strategy::AStar, Heuristic::Blind, SearchConfig::default());
    let (informed, _) = solve(Strategy::AStar, Heuristic::SetLevel, SearchConfig::default());
    assert!(informed.iterations() <= blind.iterations());
    // one dequeue per plan step plus the goal itself
    assert_eq!(informed.iterations(), 4);
}

#[test]
fn every_strategy_reaches_the_goal() {
    for strategy in Strategy::ALL {
        let (_, plan) = solve(strategy, Heuristic::SetLevel, SearchConfig::default());
        let plan = plan.unwrap_or_else(|| panic!("{strategy} found nothing"));
        assert!(replay(initial(Heuristic::Blind), &plan).is_goal(), "{strategy}");
    }
}

#[test]
fn depth_one_finds_nothing_quickly() {
    let config = SearchConfig::default().with_max_depth(1);
    let (explorer, plan) = solve(Strategy::Bfs, Heuristic::Blind, config);
    assert!(plan.is_none());
    assert_eq!(explorer.solution_cost(), None);
    // the root and its two children: Load(C,P,A) and Fly(P,A,B)
    assert_eq!(explorer.iterations(), 3);
}

#[test]
fn depth_bound_of_three_is_enough() {
    let config = SearchConfig::default().with_max_depth(3);
    let (_, plan) = solve(Strategy::Dfs, Heuristic::Blind, config);
    assert_eq!(plan.map(|p| p.len()), Some(3));
}

#[test]
fn non_positive_depth_fails_at_construction() {
    let result = Explorer::<StripsState>::new(Strategy::Bfs, SearchConfig::default().with_max_depth(0));
    assert!(matches!(result, Err(ConfigurationError::NonPositiveDepth(0))));
}

#[test]
fn anytime_mode_returns_the_cheapest_plan() {
    let config = SearchConfig::default().with_anytime(true).with_max_depth(6);
    for strategy in [Strategy::Dfs, Strategy::MinCost] {
        let (explorer, plan) = solve(strategy, Heuristic::Blind, config);
        assert_eq!(plan.map(|p| p.len()), Some(3), "{strategy}");
        assert_eq!(explorer.solution_cost(), Some(3.0));
    }
}

#[test]
fn planes_move_loaded_cargo_together() {
    let problem: CargoProblem = ONE_CARGO
        .replace("AT(C,A) AT(P,A)", "IN(C,P) AT(P,A)")
        .parse()
        .unwrap();
    assert!(problem.initial().contains(&Fact::inside("C", "P")));
    let (_, start) = problem.to_strips(Heuristic::SetLevel, GraphConfig::default());
    assert_eq!(start.heuristic_value(), 2.0);

    let mut explorer = Explorer::new(Strategy::AStar, SearchConfig::default()).unwrap();
    let plan = explorer.run(start).unwrap();
    assert_eq!(names(&plan), ["Fly(P,A,B)", "Unload(C,P,B)"]);
}

#[test]
fn loaded_plane_at_destination_has_set_level_one() {
    let problem: CargoProblem = ONE_CARGO
        .replace("AT(C,A) AT(P,A)", "IN(C,P) AT(P,B)")
        .parse()
        .unwrap();
    let (strips, start) = problem.to_strips(Heuristic::SetLevel, GraphConfig::default());
    assert_eq!(strips.planning_graph(&start).set_level(strips.goals()), Some(1));
    assert_eq!(start.heuristic_value(), 1.0);

    let mut explorer = Explorer::new(Strategy::AStar, SearchConfig::default()).unwrap();
    let plan = explorer.run(start).unwrap();
    assert_eq!(names(&plan), ["Unload(C,P,B)"]);
}

#[test]
fn random_instances_agree_on_optimal_cost() {
    let size = InstanceSize {
        planes: 2,
        airports: 3,
        cargoes: 2,
    };
    for seed in 0..3 {
        let problem = generate(size, seed).unwrap();
        let mut costs = vec![];
        for (strategy, heuristic) in [
            (Strategy::Bfs, Heuristic::Blind),
            (Strategy::MinCost, Heuristic::Blind),
            (Strategy::AStar, Heuristic::UnmetGoals),
            (Strategy::AStar, Heuristic::SetLevel),
        ] {
            let (_, start) = problem.to_strips(heuristic, GraphConfig::default());
            let mut explorer = Explorer::new(strategy, SearchConfig::default()).unwrap();
            let plan = explorer.run(start.clone()).unwrap();
            assert!(replay(start, &plan).is_goal());
            costs.push(explorer.solution_cost().unwrap());
        }
        assert!(costs.windows(2).all(|w| w[0] == w[1]), "seed {seed}: {costs:?}");
    }
}
