use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use ahash::AHashMap;
use fixedbitset::FixedBitSet;
use statesearch_core::traits::SearchState;
use statesearch_core::{ActionCatalog, ActionId, ConfigurationError, GroundAction, Literal};

use crate::graph::{GraphConfig, PlanningGraph};

/// Goal-distance estimate attached to a [`StripsProblem`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Always zero.
    #[default]
    Blind,
    /// Number of goal literals not yet satisfied.
    UnmetGoals,
    /// Set level of the goals in a planning graph grown from the state.
    SetLevel,
}

impl FromStr for Heuristic {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "blind" => Ok(Heuristic::Blind),
            "unmet-goals" | "unmet_goals" => Ok(Heuristic::UnmetGoals),
            "set-level" | "set_level" | "setlevel" => Ok(Heuristic::SetLevel),
            _ => Err(ConfigurationError::UnknownHeuristic(s.to_owned())),
        }
    }
}

/// A literal compiled to an atom index and a polarity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Condition {
    atom: usize,
    holds: bool,
}

struct CompiledAction {
    pre: Vec<Condition>,
    add: Vec<usize>,
    del: Vec<usize>,
}

/// A planning problem over propositional atoms: a catalog of ground actions, an initial
/// assignment and a conjunctive goal.
pub struct StripsProblem {
    catalog: ActionCatalog,
    atoms: Vec<Literal>,
    atom_ids: AHashMap<Literal, usize>,
    compiled: Vec<CompiledAction>,
    goals: Vec<Literal>,
    goal_conditions: Vec<Condition>,
    heuristic: Heuristic,
    graph_config: GraphConfig,
}

impl StripsProblem {
    /// Compiles the catalog against the atom universe. Atoms mentioned by actions or goals but
    /// missing from `atoms` are added; atoms absent from `initial` start false.
    pub fn new(
        catalog: ActionCatalog,
        atoms: impl IntoIterator<Item = Literal>,
        initial: impl IntoIterator<Item = Literal>,
        goals: impl IntoIterator<Item = Literal>,
        heuristic: Heuristic,
        graph_config: GraphConfig,
    ) -> (Arc<Self>, StripsState) {
        let mut universe = Universe::default();
        for atom in atoms {
            universe.id(&atom);
        }

        let mut compiled = Vec::with_capacity(catalog.len());
        for action in catalog.actions() {
            compiled.push(CompiledAction {
                pre: action
                    .preconditions()
                    .iter()
                    .map(|lit| universe.condition(lit))
                    .collect(),
                add: action.add_effects().iter().map(|l| universe.id(l)).collect(),
                del: action.delete_effects().iter().map(|l| universe.id(l)).collect(),
            });
        }

        let goals: Vec<Literal> = goals.into_iter().collect();
        let goal_conditions = goals.iter().map(|g| universe.condition(g)).collect();

        let mut true_atoms = FixedBitSet::with_capacity(universe.atoms.len());
        for lit in initial {
            let cond = universe.condition(&lit);
            true_atoms.grow(universe.atoms.len());
            true_atoms.set(cond.atom, cond.holds);
        }
        true_atoms.grow(universe.atoms.len());

        let problem = Arc::new(StripsProblem {
            catalog,
            atoms: universe.atoms,
            atom_ids: universe.ids,
            compiled,
            goals,
            goal_conditions,
            heuristic,
            graph_config,
        });
        let initial = StripsState {
            problem: problem.clone(),
            atoms: true_atoms,
        };
        (problem, initial)
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn atoms(&self) -> &[Literal] {
        &self.atoms
    }

    pub fn goals(&self) -> &[Literal] {
        &self.goals
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn graph_config(&self) -> GraphConfig {
        self.graph_config
    }

    /// Builds the planning graph rooted at `state`, using the problem's own actions.
    pub fn planning_graph(&self, state: &StripsState) -> PlanningGraph {
        PlanningGraph::build(state.literals(), self.catalog.actions(), self.graph_config)
    }

    fn atom_id(&self, atom: &Literal) -> Option<usize> {
        self.atom_ids.get(atom).copied()
    }
}

#[derive(Default)]
struct Universe {
    atoms: Vec<Literal>,
    ids: AHashMap<Literal, usize>,
}

impl Universe {
    fn id(&mut self, lit: &Literal) -> usize {
        let atom = lit.atom();
        if let Some(&id) = self.ids.get(&atom) {
            return id;
        }
        let id = self.atoms.len();
        self.atoms.push(atom.clone());
        self.ids.insert(atom, id);
        id
    }

    fn condition(&mut self, lit: &Literal) -> Condition {
        Condition {
            atom: self.id(lit),
            holds: lit.is_positive(),
        }
    }
}

/// An assignment of truth values to the atoms of one [`StripsProblem`].
#[derive(Clone)]
pub struct StripsState {
    problem: Arc<StripsProblem>,
    atoms: FixedBitSet,
}

impl StripsState {
    pub fn problem(&self) -> &Arc<StripsProblem> {
        &self.problem
    }

    fn satisfies(&self, cond: Condition) -> bool {
        self.atoms.contains(cond.atom) == cond.holds
    }

    pub fn holds(&self, lit: &Literal) -> bool {
        match self.problem.atom_id(&lit.atom()) {
            Some(atom) => self.satisfies(Condition {
                atom,
                holds: lit.is_positive(),
            }),
            None => lit.is_negative(),
        }
    }

    /// The atoms that are true, as positive literals.
    pub fn true_atoms(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.atoms.ones().map(|i| &self.problem.atoms[i])
    }

    /// Every atom of the problem with its polarity in this state.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.problem
            .atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| {
                if self.atoms.contains(i) {
                    atom.clone()
                } else {
                    atom.negate()
                }
            })
    }

    fn is_applicable(&self, id: ActionId) -> bool {
        self.problem.compiled[id.0]
            .pre
            .iter()
            .all(|&cond| self.satisfies(cond))
    }

    pub fn unmet_goals(&self) -> usize {
        self.problem
            .goal_conditions
            .iter()
            .filter(|&&cond| !self.satisfies(cond))
            .count()
    }
}

impl SearchState for StripsState {
    type Action = GroundAction;

    fn executable_actions(&self) -> Vec<GroundAction> {
        self.problem
            .catalog
            .iter()
            .filter(|&(id, _)| self.is_applicable(id))
            .map(|(_, action)| action.clone())
            .collect()
    }

    #[track_caller]
    fn resulting_state(&self, action: &GroundAction) -> Self {
        let id = self
            .problem
            .catalog
            .id_of(action.name())
            .filter(|&id| self.problem.catalog.get(id) == action);
        let Some(id) = id else {
            panic!("action {action} does not belong to this problem");
        };
        let compiled = &self.problem.compiled[id.0];
        let mut atoms = self.atoms.clone();
        for &atom in &compiled.del {
            atoms.set(atom, false);
        }
        for &atom in &compiled.add {
            atoms.insert(atom);
        }
        StripsState {
            problem: self.problem.clone(),
            atoms,
        }
    }

    fn is_goal(&self) -> bool {
        self.unmet_goals() == 0
    }

    fn heuristic_value(&self) -> f64 {
        match self.problem.heuristic {
            Heuristic::Blind => 0.0,
            Heuristic::UnmetGoals => self.unmet_goals() as f64,
            Heuristic::SetLevel => self
                .problem
                .planning_graph(self)
                .set_level(&self.problem.goals)
                .map_or(f64::INFINITY, |level| level as f64),
        }
    }
}

impl PartialEq for StripsState {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.problem, &other.problem) && self.atoms == other.atoms
    }
}

impl Eq for StripsState {}

impl Hash for StripsState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.atoms.hash(state);
    }
}

impl Debug for StripsState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.true_atoms()).finish()
    }
}
