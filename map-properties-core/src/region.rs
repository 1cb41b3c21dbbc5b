use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Region id 0 is the engine's "no region" value and never carries rules.
pub const NO_REGION: u32 = 0;

/// Set of positive region ids. Zero is rejected on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionIdSet(HashSet<u32>);

impl RegionIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region_id: u32) -> bool {
        region_id != NO_REGION && self.0.insert(region_id)
    }

    pub fn contains(&self, region_id: u32) -> bool {
        self.0.contains(&region_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids in ascending order, for display.
    pub fn sorted(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.0.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<u32> for RegionIdSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut set = RegionIdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Who is attempting a move. Decides which scoped region sets apply on top
/// of the global ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorScope {
    Player,
    Event,
    /// Player riding a vehicle: region rules are not consulted at all.
    Vehicle,
    /// Any other character; only the "all" sets apply.
    Neutral,
}

/// The six configured region sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRules {
    pub restrict_all: RegionIdSet,
    pub restrict_player: RegionIdSet,
    pub restrict_events: RegionIdSet,
    pub allow_all: RegionIdSet,
    pub allow_player: RegionIdSet,
    pub allow_events: RegionIdSet,
}

/// Outcome of checking a region against one restrict/allow pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionGate {
    Restricted,
    Allowed,
    Unaffected,
}

impl RegionGate {
    /// Applies the gate over a fallback verdict.
    pub fn over(self, fallback: bool) -> bool {
        match self {
            RegionGate::Restricted => false,
            RegionGate::Allowed => true,
            RegionGate::Unaffected => fallback,
        }
    }
}

impl RegionRules {
    pub fn is_empty(&self) -> bool {
        self.restrict_all.is_empty()
            && self.restrict_player.is_empty()
            && self.restrict_events.is_empty()
            && self.allow_all.is_empty()
            && self.allow_player.is_empty()
            && self.allow_events.is_empty()
    }

    /// Global gate: RestrictAll beats AllowAll.
    pub fn global_gate(&self, region_id: u32) -> RegionGate {
        if self.restrict_all.contains(region_id) {
            RegionGate::Restricted
        } else if self.allow_all.contains(region_id) {
            RegionGate::Allowed
        } else {
            RegionGate::Unaffected
        }
    }

    /// Scope-only gate, not including the "all" sets.
    pub fn scope_gate(&self, scope: ActorScope, region_id: u32) -> RegionGate {
        let (restrict, allow) = match self.scoped_sets(scope) {
            Some(sets) => sets,
            None => return RegionGate::Unaffected,
        };
        if restrict.contains(region_id) {
            RegionGate::Restricted
        } else if allow.contains(region_id) {
            RegionGate::Allowed
        } else {
            RegionGate::Unaffected
        }
    }

    /// Whether `scope` may walk onto `region_id` whatever the tiles say.
    pub fn passes_through(&self, scope: ActorScope, region_id: u32) -> bool {
        if scope == ActorScope::Vehicle {
            return false;
        }
        self.allow_all.contains(region_id)
            || self
                .scoped_sets(scope)
                .is_some_and(|(_, allow)| allow.contains(region_id))
    }

    /// Whether `scope` is kept out of `region_id` whatever the tiles say.
    pub fn is_blocked_by(&self, scope: ActorScope, region_id: u32) -> bool {
        if scope == ActorScope::Vehicle {
            return false;
        }
        self.restrict_all.contains(region_id)
            || self
                .scoped_sets(scope)
                .is_some_and(|(restrict, _)| restrict.contains(region_id))
    }

    fn scoped_sets(&self, scope: ActorScope) -> Option<(&RegionIdSet, &RegionIdSet)> {
        match scope {
            ActorScope::Player => Some((&self.restrict_player, &self.allow_player)),
            ActorScope::Event => Some((&self.restrict_events, &self.allow_events)),
            ActorScope::Vehicle | ActorScope::Neutral => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RegionRules {
        RegionRules {
            restrict_all: [1].into_iter().collect(),
            restrict_player: [2].into_iter().collect(),
            restrict_events: [3].into_iter().collect(),
            allow_all: [4, 1].into_iter().collect(),
            allow_player: [5, 1].into_iter().collect(),
            allow_events: [6].into_iter().collect(),
        }
    }

    #[test]
    fn any_populated_set_makes_rules_non_empty() {
        assert!(RegionRules::default().is_empty());
        let only_events = RegionRules {
            allow_events: [6].into_iter().collect(),
            ..Default::default()
        };
        assert!(!only_events.is_empty());
        assert!(!rules().is_empty());
    }

    #[test]
    fn zero_never_enters_a_set() {
        let set: RegionIdSet = [0, 7, 0].into_iter().collect();
        assert_eq!(set.sorted(), vec![7]);
        assert!(!set.contains(NO_REGION));
    }

    #[test]
    fn restrict_all_beats_allow_all() {
        let rules = rules();
        assert_eq!(rules.global_gate(1), RegionGate::Restricted);
        assert_eq!(rules.global_gate(4), RegionGate::Allowed);
        assert_eq!(rules.global_gate(9), RegionGate::Unaffected);
    }

    #[test]
    fn scope_gates_are_isolated() {
        let rules = rules();
        assert_eq!(rules.scope_gate(ActorScope::Player, 2), RegionGate::Restricted);
        assert_eq!(rules.scope_gate(ActorScope::Event, 2), RegionGate::Unaffected);
        assert_eq!(rules.scope_gate(ActorScope::Event, 6), RegionGate::Allowed);
        assert_eq!(rules.scope_gate(ActorScope::Neutral, 6), RegionGate::Unaffected);
    }

    #[test]
    fn pass_and_block_include_global_sets() {
        let rules = rules();
        assert!(rules.passes_through(ActorScope::Player, 4));
        assert!(rules.passes_through(ActorScope::Player, 5));
        assert!(!rules.passes_through(ActorScope::Event, 5));
        assert!(rules.is_blocked_by(ActorScope::Event, 1));
        assert!(rules.is_blocked_by(ActorScope::Event, 3));
        assert!(!rules.is_blocked_by(ActorScope::Player, 3));
        assert!(rules.is_blocked_by(ActorScope::Neutral, 1));
    }

    #[test]
    fn vehicles_ignore_regions() {
        let rules = rules();
        assert!(!rules.passes_through(ActorScope::Vehicle, 4));
        assert!(!rules.is_blocked_by(ActorScope::Vehicle, 1));
    }

    #[test]
    fn gate_over_fallback() {
        assert!(!RegionGate::Restricted.over(true));
        assert!(RegionGate::Allowed.over(false));
        assert!(RegionGate::Unaffected.over(true));
    }
}
