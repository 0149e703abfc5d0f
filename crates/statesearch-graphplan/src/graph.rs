use std::fmt::{Display, Formatter};

use ahash::AHashMap;
use enumset::EnumSet;
use fixedbitset::FixedBitSet;
use statesearch_core::{GroundAction, Literal};

use crate::mutex::{MutexReason, MutexRelation};

/// Settings of the planning-graph builder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    /// Maximum number of action layers expanded before giving up on a fixpoint.
    pub max_layers: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig { max_layers: 50 }
    }
}

/// Compact literal handle. An atom gets two consecutive ids: even for the positive literal,
/// odd for its negation, so negating is flipping the lowest bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct LitId(u32);

impl LitId {
    fn negation(self) -> LitId {
        LitId(self.0 ^ 1)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

struct LayerAction {
    name: String,
    pre: Vec<LitId>,
    eff: Vec<LitId>,
}

/// Propositions reachable at one level, with the pairs that cannot co-hold there.
pub struct PropositionLayer {
    literals: FixedBitSet,
    mutex: MutexRelation,
}

/// Actions applicable at one level, with the pairs that cannot co-occur there.
pub struct ActionLayer {
    actions: Vec<usize>,
    mutex: MutexRelation,
}

impl PropositionLayer {
    pub fn len(&self) -> usize {
        self.literals.count_ones(..)
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_clear()
    }

    pub fn mutex(&self) -> &MutexRelation {
        &self.mutex
    }
}

impl ActionLayer {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn mutex(&self) -> &MutexRelation {
        &self.mutex
    }
}

/// Layered reachability structure used to estimate goal distance.
///
/// Proposition layer `k` holds what may be true after `k` steps; action layer `k` holds the
/// actions whose preconditions are jointly possible in proposition layer `k` and produces
/// proposition layer `k + 1`. Persistence actions for every known atom are added by the builder.
pub struct PlanningGraph {
    literals: Vec<Literal>,
    ids: AHashMap<Literal, LitId>,
    actions: Vec<LayerAction>,
    action_ids: AHashMap<String, usize>,
    proposition_layers: Vec<PropositionLayer>,
    action_layers: Vec<ActionLayer>,
    leveled_off: bool,
}

impl PlanningGraph {
    /// Expands the graph from `initial` until a proposition layer repeats both the literals and
    /// the mutexes of the one before it, or `config.max_layers` action layers have been built.
    pub fn build<'a>(
        initial: impl IntoIterator<Item = Literal>,
        actions: impl IntoIterator<Item = &'a GroundAction>,
        config: GraphConfig,
    ) -> Self {
        let mut graph = PlanningGraph {
            literals: vec![],
            ids: AHashMap::new(),
            actions: vec![],
            action_ids: AHashMap::new(),
            proposition_layers: vec![],
            action_layers: vec![],
            leveled_off: false,
        };

        let initial: Vec<LitId> = initial.into_iter().map(|lit| graph.intern(&lit)).collect();
        for action in actions {
            graph.add_action(action);
        }
        let atoms: Vec<Literal> = graph.literals.iter().step_by(2).cloned().collect();
        for atom in &atoms {
            for persist in GroundAction::persistence_pair(atom) {
                graph.add_action(&persist);
            }
        }

        let mut literals = FixedBitSet::with_capacity(graph.literals.len());
        for &lit in &initial {
            literals.insert(lit.index());
        }
        let mut mutex = MutexRelation::new();
        for lit in literals.ones().map(|i| LitId(i as u32)) {
            if lit.0 % 2 == 0 && literals.contains(lit.negation().index()) {
                mutex.insert(lit.0, lit.negation().0, MutexReason::Negation.into());
            }
        }
        graph
            .proposition_layers
            .push(PropositionLayer { literals, mutex });

        for _ in 0..config.max_layers {
            let (action_layer, next) = graph.expand(graph.proposition_layers.len() - 1);
            let last = graph.last_layer();
            let fixpoint = next.literals == last.literals && next.mutex == last.mutex;
            graph.action_layers.push(action_layer);
            graph.proposition_layers.push(next);
            if fixpoint {
                graph.leveled_off = true;
                break;
            }
        }

        tracing::trace!(
            layers = graph.proposition_layers.len(),
            leveled_off = graph.leveled_off,
            literals = graph.literals.len(),
            actions = graph.actions.len(),
            "planning graph built"
        );

        graph
    }

    fn intern(&mut self, lit: &Literal) -> LitId {
        if let Some(&id) = self.ids.get(lit) {
            return id;
        }
        let positive = lit.atom();
        let negative = positive.negate();
        let base = LitId(self.literals.len() as u32);
        self.ids.insert(positive.clone(), base);
        self.ids.insert(negative.clone(), base.negation());
        self.literals.push(positive);
        self.literals.push(negative);
        self.ids[lit]
    }

    fn add_action(&mut self, action: &GroundAction) {
        let pre = action
            .preconditions()
            .iter()
            .map(|lit| self.intern(lit))
            .collect();
        let eff = action.effects().map(|lit| self.intern(&lit)).collect();
        let index = self.actions.len();
        self.action_ids
            .entry(action.name().to_owned())
            .or_insert(index);
        self.actions.push(LayerAction {
            name: action.name().to_owned(),
            pre,
            eff,
        });
    }

    fn last_layer(&self) -> &PropositionLayer {
        &self.proposition_layers[self.proposition_layers.len() - 1]
    }

    fn expand(&self, level: usize) -> (ActionLayer, PropositionLayer) {
        let current = &self.proposition_layers[level];

        let enabled: Vec<usize> = (0..self.actions.len())
            .filter(|&a| {
                let pre = &self.actions[a].pre;
                pre.iter().all(|p| current.literals.contains(p.index()))
                    && pre.iter().enumerate().all(|(i, &p)| {
                        pre[i + 1..]
                            .iter()
                            .all(|&q| !current.mutex.contains(p.0, q.0))
                    })
            })
            .collect();

        let mut action_mutex = MutexRelation::new();
        for (i, &a) in enabled.iter().enumerate() {
            for &b in &enabled[i + 1..] {
                action_mutex.insert(a as u32, b as u32, self.action_mutex_reasons(a, b, current));
            }
        }

        let mut literals = current.literals.clone();
        let mut supporters: AHashMap<LitId, Vec<usize>> = AHashMap::new();
        for &a in &enabled {
            for &e in &self.actions[a].eff {
                literals.insert(e.index());
                supporters.entry(e).or_default().push(a);
            }
        }

        let present: Vec<LitId> = literals.ones().map(|i| LitId(i as u32)).collect();
        let mut mutex = MutexRelation::new();
        for (i, &p) in present.iter().enumerate() {
            for &q in &present[i + 1..] {
                if q == p.negation() {
                    mutex.insert(p.0, q.0, MutexReason::Negation.into());
                    continue;
                }
                // every present literal enables its own persistence action
                let (sp, sq) = (&supporters[&p], &supporters[&q]);
                let all_exclusive = sp
                    .iter()
                    .all(|&a| sq.iter().all(|&b| a != b && action_mutex.contains(a as u32, b as u32)));
                if all_exclusive {
                    mutex.insert(p.0, q.0, MutexReason::InconsistentSupport.into());
                }
            }
        }

        (
            ActionLayer {
                actions: enabled,
                mutex: action_mutex,
            },
            PropositionLayer { literals, mutex },
        )
    }

    fn action_mutex_reasons(
        &self,
        a: usize,
        b: usize,
        layer: &PropositionLayer,
    ) -> EnumSet<MutexReason> {
        let a = &self.actions[a];
        let b = &self.actions[b];
        let mut reasons = EnumSet::empty();

        if a.eff.iter().any(|e| b.eff.contains(&e.negation())) {
            reasons |= MutexReason::InconsistentEffects;
        }
        if a.eff.iter().any(|e| b.pre.contains(&e.negation()))
            || b.eff.iter().any(|e| a.pre.contains(&e.negation()))
        {
            reasons |= MutexReason::Interference;
        }
        let competing = a.pre.iter().any(|&p| {
            b.pre
                .iter()
                .any(|&q| q == p.negation() || layer.mutex.contains(p.0, q.0))
        });
        if competing {
            reasons |= MutexReason::CompetingNeeds;
        }
        reasons
    }

    /// Index of the first proposition layer containing every goal with no two goals mutex, or
    /// `None` if no layer built qualifies.
    pub fn set_level<'a>(&self, goals: impl IntoIterator<Item = &'a Literal>) -> Option<usize> {
        let goals: Option<Vec<LitId>> = goals.into_iter().map(|g| self.ids.get(g).copied()).collect();
        let goals = goals?;

        self.proposition_layers.iter().position(|layer| {
            goals.iter().all(|g| layer.literals.contains(g.index()))
                && goals.iter().enumerate().all(|(i, &p)| {
                    goals[i + 1..]
                        .iter()
                        .all(|&q| p == q || !layer.mutex.contains(p.0, q.0))
                })
        })
    }

    pub fn num_layers(&self) -> usize {
        self.proposition_layers.len()
    }

    /// Whether expansion stopped because two consecutive proposition layers were equal.
    pub fn leveled_off(&self) -> bool {
        self.leveled_off
    }

    pub fn proposition_layer(&self, level: usize) -> &PropositionLayer {
        &self.proposition_layers[level]
    }

    pub fn action_layer(&self, level: usize) -> &ActionLayer {
        &self.action_layers[level]
    }

    pub fn num_action_layers(&self) -> usize {
        self.action_layers.len()
    }

    pub fn propositions(&self, level: usize) -> impl Iterator<Item = &Literal> + '_ {
        self.proposition_layers[level]
            .literals
            .ones()
            .map(|i| &self.literals[i])
    }

    pub fn actions(&self, level: usize) -> impl Iterator<Item = &str> + '_ {
        self.action_layers[level]
            .actions
            .iter()
            .map(|&a| self.actions[a].name.as_str())
    }

    pub fn contains(&self, level: usize, lit: &Literal) -> bool {
        self.ids
            .get(lit)
            .is_some_and(|id| self.proposition_layers[level].literals.contains(id.index()))
    }

    pub fn propositions_mutex(&self, level: usize, a: &Literal, b: &Literal) -> bool {
        !self.proposition_mutex_reasons(level, a, b).is_empty()
    }

    pub fn proposition_mutex_reasons(
        &self,
        level: usize,
        a: &Literal,
        b: &Literal,
    ) -> EnumSet<MutexReason> {
        match (self.ids.get(a), self.ids.get(b)) {
            (Some(a), Some(b)) => self.proposition_layers[level].mutex.reasons(a.0, b.0),
            _ => EnumSet::empty(),
        }
    }

    pub fn actions_mutex(&self, level: usize, a: &str, b: &str) -> bool {
        !self.mutex_reasons(level, a, b).is_empty()
    }

    /// Reasons the two named actions are mutex in action layer `level`.
    pub fn mutex_reasons(&self, level: usize, a: &str, b: &str) -> EnumSet<MutexReason> {
        match (self.action_ids.get(a), self.action_ids.get(b)) {
            (Some(&a), Some(&b)) => self.action_layers[level].mutex.reasons(a as u32, b as u32),
            _ => EnumSet::empty(),
        }
    }

    /// All action pairs of layer `level` by name, with their reasons.
    pub fn action_mutexes(
        &self,
        level: usize,
    ) -> impl Iterator<Item = (&str, &str, EnumSet<MutexReason>)> + '_ {
        self.action_layers[level]
            .mutex
            .iter()
            .map(|((a, b), reasons)| {
                (
                    self.actions[a as usize].name.as_str(),
                    self.actions[b as usize].name.as_str(),
                    reasons,
                )
            })
    }

    /// All literal pairs of layer `level`, with their reasons.
    pub fn proposition_mutexes(
        &self,
        level: usize,
    ) -> impl Iterator<Item = (&Literal, &Literal, EnumSet<MutexReason>)> + '_ {
        self.proposition_layers[level]
            .mutex
            .iter()
            .map(|((a, b), reasons)| (&self.literals[a as usize], &self.literals[b as usize], reasons))
    }
}

impl Display for PlanningGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Planning Graph:")?;
        for level in 0..self.num_layers() {
            let mut props: Vec<_> = self.propositions(level).map(Literal::name).collect();
            props.sort_unstable();
            writeln!(f, "Layer {level} - Propositions: [{}]", props.join(", "))?;
            if level < self.action_layers.len() {
                let mut actions: Vec<_> = self.actions(level).collect();
                actions.sort_unstable();
                writeln!(f, "Layer {level} - Actions: [{}]", actions.join(", "))?;
            }
        }
        Ok(())
    }
}
