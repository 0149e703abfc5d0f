use std::fmt::{Display, Formatter};
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::CatalogError;
use crate::literal::Literal;
use crate::traits::Cost;

/// A fully instantiated action: preconditions, add and delete effects, and a cost.
///
/// Immutable once built; clones share the same storage.
#[derive(Clone, Debug)]
pub struct GroundAction {
    inner: Arc<ActionData>,
}

#[derive(Debug)]
struct ActionData {
    name: String,
    preconditions: Vec<Literal>,
    add_effects: Vec<Literal>,
    delete_effects: Vec<Literal>,
    cost: f64,
}

impl GroundAction {
    /// Builds an action. Literal lists are treated as sets (sorted, deduplicated).
    ///
    /// Delete effects name the literals made false by the action; `effects()` exposes them as
    /// their negations.
    #[track_caller]
    pub fn new(
        name: impl Into<String>,
        preconditions: impl IntoIterator<Item = Literal>,
        add_effects: impl IntoIterator<Item = Literal>,
        delete_effects: impl IntoIterator<Item = Literal>,
        cost: f64,
    ) -> Self {
        assert!(
            cost.is_finite() && cost >= 0.0,
            "action cost must be finite and non-negative, got {cost}"
        );
        GroundAction {
            inner: Arc::new(ActionData {
                name: name.into(),
                preconditions: as_set(preconditions),
                add_effects: as_set(add_effects),
                delete_effects: as_set(delete_effects),
                cost,
            }),
        }
    }

    /// The no-op carrying `literal` unchanged into the next planning-graph layer.
    pub fn persistence(literal: &Literal) -> Self {
        GroundAction::new(
            format!("persist {literal}"),
            [literal.clone()],
            [literal.clone()],
            [],
            0.0,
        )
    }

    /// Both persistence actions of an atom: "persist L" and "persist ¬L".
    pub fn persistence_pair(atom: &Literal) -> [Self; 2] {
        let positive = atom.atom();
        let negative = positive.negate();
        [
            GroundAction::persistence(&positive),
            GroundAction::persistence(&negative),
        ]
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn preconditions(&self) -> &[Literal] {
        &self.inner.preconditions
    }

    pub fn add_effects(&self) -> &[Literal] {
        &self.inner.add_effects
    }

    pub fn delete_effects(&self) -> &[Literal] {
        &self.inner.delete_effects
    }

    /// All effects as literals: add effects, then the negation of each delete effect.
    pub fn effects(&self) -> impl Iterator<Item = Literal> + '_ {
        self.inner
            .add_effects
            .iter()
            .cloned()
            .chain(self.inner.delete_effects.iter().map(Literal::negate))
    }

    pub fn ptr_eq(&self, other: &GroundAction) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

fn as_set(literals: impl IntoIterator<Item = Literal>) -> Vec<Literal> {
    let mut literals: Vec<_> = literals.into_iter().collect();
    literals.sort_unstable();
    literals.dedup();
    literals
}

impl Cost for GroundAction {
    fn cost(&self) -> f64 {
        self.inner.cost
    }
}

impl PartialEq for GroundAction {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.inner.name == other.inner.name
                && self.inner.preconditions == other.inner.preconditions
                && self.inner.add_effects == other.inner.add_effects
                && self.inner.delete_effects == other.inner.delete_effects
                && self.inner.cost == other.inner.cost)
    }
}

impl Eq for GroundAction {}

impl std::hash::Hash for GroundAction {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl Display for GroundAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner.name)
    }
}

/// Index of an action inside its [`ActionCatalog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub usize);

/// The ground actions of one problem instance, owned by the caller.
#[derive(Clone, Debug, Default)]
pub struct ActionCatalog {
    actions: Vec<GroundAction>,
    by_name: AHashMap<String, ActionId>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: GroundAction) -> Result<ActionId, CatalogError> {
        if self.by_name.contains_key(action.name()) {
            return Err(CatalogError::DuplicateAction(action.name().to_owned()));
        }
        let id = ActionId(self.actions.len());
        self.by_name.insert(action.name().to_owned(), id);
        self.actions.push(action);
        Ok(id)
    }

    pub fn get(&self, id: ActionId) -> &GroundAction {
        &self.actions[id.0]
    }

    pub fn id_of(&self, name: &str) -> Option<ActionId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&GroundAction> {
        self.id_of(name).map(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &GroundAction)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| (ActionId(i), action))
    }

    pub fn actions(&self) -> &[GroundAction] {
        &self.actions
    }
}

impl TryFrom<Vec<GroundAction>> for ActionCatalog {
    type Error = CatalogError;

    fn try_from(actions: Vec<GroundAction>) -> Result<Self, CatalogError> {
        let mut catalog = ActionCatalog::new();
        for action in actions {
            catalog.push(action)?;
        }
        Ok(catalog)
    }
}
