use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::host::SwitchLookup;

/// Which maps an override rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapScope {
    #[default]
    AllMaps,
    AllExceptSelected,
    OnlySelected,
}

impl MapScope {
    /// Parses the engine's select-box label. `None` for unrecognised labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "" | "All Maps" => Some(MapScope::AllMaps),
            "All Maps Except Selected Maps" => Some(MapScope::AllExceptSelected),
            "Only Selected Maps" => Some(MapScope::OnlySelected),
            _ => None,
        }
    }
}

/// A switch-conditioned replacement for a named asset (parallax image or BGM track).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub default_name: String,
    /// `None` when the configured switch id was missing or invalid; such a
    /// rule never triggers.
    pub switch_id: Option<u32>,
    pub alternative_name: String,
    pub map_scope: MapScope,
    pub selected_map_ids: HashSet<u32>,
}

impl OverrideRule {
    pub fn new(
        default_name: impl Into<String>,
        switch_id: u32,
        alternative_name: impl Into<String>,
    ) -> Self {
        Self {
            default_name: default_name.into(),
            switch_id: (switch_id > 0).then_some(switch_id),
            alternative_name: alternative_name.into(),
            map_scope: MapScope::AllMaps,
            selected_map_ids: HashSet::new(),
        }
    }

    pub fn with_maps<I>(mut self, scope: MapScope, map_ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.map_scope = scope;
        self.selected_map_ids = map_ids.into_iter().collect();
        self
    }

    pub fn applies_to_map(&self, map_id: u32) -> bool {
        match self.map_scope {
            MapScope::AllMaps => true,
            MapScope::OnlySelected => self.selected_map_ids.contains(&map_id),
            MapScope::AllExceptSelected => !self.selected_map_ids.contains(&map_id),
        }
    }

    fn triggers<S: SwitchLookup + ?Sized>(&self, map_id: u32, switches: &S) -> bool {
        if self.alternative_name.is_empty() || !self.applies_to_map(map_id) {
            return false;
        }
        match self.switch_id {
            Some(id) if id > 0 => switches.value(id),
            _ => false,
        }
    }
}

/// Picks the effective asset name for `default_name` on map `map_id`.
///
/// Every rule targeting `default_name` is visited in order; each one whose
/// map scope admits the map and whose switch is on replaces the result, so
/// the last such rule wins.
pub fn resolve_override<'a, S>(
    default_name: &'a str,
    rules: &'a [OverrideRule],
    map_id: u32,
    switches: &S,
) -> &'a str
where
    S: SwitchLookup + ?Sized,
{
    if default_name.is_empty() || rules.is_empty() {
        return default_name;
    }

    let mut effective = default_name;
    for rule in rules.iter().filter(|r| r.default_name == default_name) {
        if rule.triggers(map_id, switches) {
            log::debug!(
                "override {:?} -> {:?} on map {} (switch {:?})",
                default_name,
                rule.alternative_name,
                map_id,
                rule.switch_id
            );
            effective = &rule.alternative_name;
        }
    }
    effective
}
