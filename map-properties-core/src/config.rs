//! Plugin parameter parsing.
//!
//! The engine hands parameters over as a flat object of strings where list
//! and struct values are themselves JSON text. Everything here is lenient:
//! bad entries are logged and dropped, never reported as errors.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::overrides::{MapScope, OverrideRule};
use crate::region::{RegionIdSet, RegionRules};
use crate::{MapPropertiesError, Result};

pub const PARAM_PARALLAX_SWITCH: &str = "Parallax Switch";
pub const PARAM_BGM_SWITCH: &str = "Background Music Switch";
pub const PARAM_RESTRICT_ALL: &str = "Region Restrict All";
pub const PARAM_RESTRICT_PLAYER: &str = "Region Restrict Player";
pub const PARAM_RESTRICT_EVENTS: &str = "Region Restrict Events";
pub const PARAM_ALLOW_ALL: &str = "Region Allow All";
pub const PARAM_ALLOW_PLAYER: &str = "Region Allow Player";
pub const PARAM_ALLOW_EVENTS: &str = "Region Allow Events";

/// Name the plugin is registered under in the engine's plugin list.
pub const DEFAULT_PLUGIN_NAME: &str = "MapProperties";

/// Immutable, validated plugin configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapPropertiesConfig {
    pub parallax_rules: Vec<OverrideRule>,
    pub bgm_rules: Vec<OverrideRule>,
    pub regions: RegionRules,
}

/// One entry of the engine's plugin list.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl MapPropertiesConfig {
    pub fn from_parameters(params: &Map<String, Value>) -> Self {
        let regions = RegionRules {
            restrict_all: parse_region_param(params, PARAM_RESTRICT_ALL),
            restrict_player: parse_region_param(params, PARAM_RESTRICT_PLAYER),
            restrict_events: parse_region_param(params, PARAM_RESTRICT_EVENTS),
            allow_all: parse_region_param(params, PARAM_ALLOW_ALL),
            allow_player: parse_region_param(params, PARAM_ALLOW_PLAYER),
            allow_events: parse_region_param(params, PARAM_ALLOW_EVENTS),
        };

        Self {
            parallax_rules: parse_rule_param(params, PARAM_PARALLAX_SWITCH, "p"),
            bgm_rules: parse_rule_param(params, PARAM_BGM_SWITCH, "m"),
            regions,
        }
    }

    pub fn from_string_map(params: &HashMap<String, String>) -> Self {
        let map: Map<String, Value> = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Self::from_parameters(&map)
    }

    /// Accepts either a bare parameter object or a plugin list (JSON array
    /// or a `plugins.js` script), picking the entry named `plugin_name`.
    pub fn from_json_str(s: &str, plugin_name: &str) -> Result<Self> {
        let trimmed = s.trim_start();
        if trimmed.starts_with('{') {
            let params: Map<String, Value> = serde_json::from_str(trimmed)?;
            return Ok(Self::from_parameters(&params));
        }
        let entries = parse_plugin_list(trimmed)?;
        let entry = find_plugin(&entries, plugin_name).ok_or_else(|| {
            MapPropertiesError::Config(format!("plugin '{}' not found in plugin list", plugin_name))
        })?;
        if !entry.status {
            log::warn!("plugin '{}' is disabled in the plugin list", entry.name);
        }
        Ok(Self::from_parameters(&entry.parameters))
    }

    pub fn load(path: &Path, plugin_name: &str) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data, plugin_name)
    }
}

fn parse_plugin_list(s: &str) -> Result<Vec<PluginEntry>> {
    // plugins.js wraps the array in `var $plugins = [...];`
    let start = s.find('[');
    let end = s.rfind(']');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(serde_json::from_str(&s[start..=end])?),
        _ => Err(MapPropertiesError::Config(
            "parameters are neither an object nor a plugin list".to_string(),
        )),
    }
}

fn find_plugin<'a>(entries: &'a [PluginEntry], plugin_name: &str) -> Option<&'a PluginEntry> {
    let suffix = format!("_{}", plugin_name);
    entries
        .iter()
        .find(|e| e.name == plugin_name || e.name.ends_with(&suffix))
}

/// Decodes a value that may be JSON text wrapped in a string.
fn decode_nested(value: &Value, what: &str) -> Option<Value> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match serde_json::from_str(s) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Ignoring undecodable {}: {}", what, e);
                None
            }
        },
        Value::Null => None,
        other => Some(other.clone()),
    }
}

fn decode_list(value: Option<&Value>, what: &str) -> Vec<Value> {
    match value.and_then(|v| decode_nested(v, what)) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            log::warn!("Ignoring {}: expected a list, got {}", what, other);
            Vec::new()
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integer prefix of `s`, following the host's lenient number parsing:
/// leading whitespace, optional sign, optional `0x`, then digits. Anything
/// after the digits is ignored.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Whole-text numeric coercion as the host does it: surrounding whitespace
/// is ignored, `0x`/`0o`/`0b` prefixes and decimal or exponent forms are
/// accepted, and empty text is zero.
fn coerce_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        return u64::from_str_radix(&s[2..], radix).ok().map(|n| n as f64);
    }
    // Rust also accepts "inf"/"nan" spellings; they never make a valid id.
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Ids must coerce to a whole number from 1 to `u32::MAX`.
fn parse_positive_id(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => coerce_number(s),
        _ => None,
    }?;
    (n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

fn region_entry(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64().map(|f| f.trunc() as i64),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }?;
    u32::try_from(n).ok().filter(|&id| id > 0)
}

/// Parses one region-id list. Non-positive and non-numeric entries are
/// dropped with a warning.
pub fn parse_region_ids(value: Option<&Value>) -> RegionIdSet {
    let mut set = RegionIdSet::new();
    for item in decode_list(value, "region list") {
        match region_entry(&item) {
            Some(id) => {
                set.insert(id);
            }
            None => log::warn!("Ignoring invalid region number: {}", value_text(&item)),
        }
    }
    set
}

fn parse_region_param(params: &Map<String, Value>, name: &str) -> RegionIdSet {
    parse_region_ids(params.get(name))
}

fn parse_rule_param(params: &Map<String, Value>, name: &str, default_key: &str) -> Vec<OverrideRule> {
    decode_list(params.get(name), name)
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| parse_rule(entry, default_key, name, index))
        .collect()
}

fn parse_rule(entry: &Value, default_key: &str, param: &str, index: usize) -> Option<OverrideRule> {
    let fields = match decode_nested(entry, param) {
        Some(Value::Object(fields)) => fields,
        _ => {
            log::warn!("Ignoring {} entry {}: not a rule object", param, index);
            return None;
        }
    };

    let text = |key: &str| fields.get(key).map(value_text).unwrap_or_default();

    let default_name = text(default_key);
    if default_name.is_empty() {
        log::warn!("Ignoring {} entry {}: no default name", param, index);
        return None;
    }

    let switch_id = match fields.get("switch") {
        None => None,
        Some(v) => {
            let id = parse_positive_id(v);
            if id.is_none() && !value_text(v).trim().is_empty() {
                log::warn!(
                    "{} entry {}: switch {} is not a positive whole number, rule will never apply",
                    param,
                    index,
                    value_text(v)
                );
            }
            id
        }
    };

    let map_mode = text("map_mode");
    let map_scope = MapScope::from_label(&map_mode).unwrap_or_else(|| {
        log::warn!(
            "{} entry {}: unknown map mode '{}', applying to all maps",
            param,
            index,
            map_mode
        );
        MapScope::AllMaps
    });

    let selected_map_ids = decode_list(fields.get("map_id"), "map id list")
        .iter()
        .filter_map(|v| {
            let id = parse_positive_id(v);
            if id.is_none() {
                log::warn!("{} entry {}: ignoring invalid map id {}", param, index, value_text(v));
            }
            id
        })
        .collect();

    Some(OverrideRule {
        default_name,
        switch_id,
        alternative_name: text("alt"),
        map_scope,
        selected_map_ids,
    })
}
