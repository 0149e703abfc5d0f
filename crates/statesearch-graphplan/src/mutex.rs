use ahash::AHashMap;
use enumset::{EnumSet, EnumSetType};

/// Why two actions, or two propositions, exclude each other within a layer.
#[derive(EnumSetType, Debug, Hash)]
pub enum MutexReason {
    /// One action asserts a literal the other negates.
    InconsistentEffects,
    /// One action negates a precondition of the other.
    Interference,
    /// The preconditions are opposite literals, or mutex in the layer the actions draw from.
    CompetingNeeds,
    /// The propositions are literal negations of each other.
    Negation,
    /// Every way of supporting one proposition is mutex with every way of supporting the other.
    InconsistentSupport,
}

/// Symmetric pairwise exclusion over the members of one layer.
///
/// Pairs are stored with their smaller member first, so `contains(a, b) == contains(b, a)`
/// holds by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutexRelation {
    pairs: AHashMap<(u32, u32), EnumSet<MutexReason>>,
}

impl MutexRelation {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: u32, b: u32) -> (u32, u32) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn insert(&mut self, a: u32, b: u32, reasons: EnumSet<MutexReason>) {
        if reasons.is_empty() {
            return;
        }
        *self.pairs.entry(Self::key(a, b)).or_default() |= reasons;
    }

    pub fn contains(&self, a: u32, b: u32) -> bool {
        self.pairs.contains_key(&Self::key(a, b))
    }

    pub fn reasons(&self, a: u32, b: u32) -> EnumSet<MutexReason> {
        self.pairs
            .get(&Self::key(a, b))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), EnumSet<MutexReason>)> + '_ {
        self.pairs.iter().map(|(&pair, &reasons)| (pair, reasons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_is_symmetric() {
        let mut mutex = MutexRelation::new();
        mutex.insert(5, 2, MutexReason::Interference.into());
        mutex.insert(2, 5, MutexReason::CompetingNeeds.into());
        assert!(mutex.contains(2, 5));
        assert!(mutex.contains(5, 2));
        assert_eq!(mutex.reasons(5, 2), mutex.reasons(2, 5));
        assert_eq!(
            mutex.reasons(2, 5),
            MutexReason::Interference | MutexReason::CompetingNeeds
        );
        assert_eq!(mutex.len(), 1);
    }

    #[test]
    fn empty_reasons_are_not_recorded() {
        let mut mutex = MutexRelation::new();
        mutex.insert(0, 1, EnumSet::empty());
        assert!(!mutex.contains(0, 1));
        assert!(mutex.is_empty());
    }
}
