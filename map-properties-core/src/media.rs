use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::host::SwitchLookup;
use crate::overrides::{resolve_override, OverrideRule};
use crate::Result;

/// Audio cue as stored in map data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCue {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_volume")]
    pub volume: u32,
    #[serde(default = "default_pitch")]
    pub pitch: u32,
    #[serde(default)]
    pub pan: i32,
}

fn default_volume() -> u32 {
    90
}

fn default_pitch() -> u32 {
    100
}

impl Default for AudioCue {
    fn default() -> Self {
        Self {
            name: String::new(),
            volume: default_volume(),
            pitch: default_pitch(),
            pan: 0,
        }
    }
}

/// The parts of an engine map file this plugin reads. Unknown keys in the
/// file are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapData {
    pub parallax_name: String,
    pub parallax_loop_x: bool,
    pub parallax_loop_y: bool,
    pub parallax_sx: i32,
    pub parallax_sy: i32,
    pub autoplay_bgm: bool,
    pub bgm: AudioCue,
    pub autoplay_bgs: bool,
    pub bgs: AudioCue,
}

impl MapData {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

/// Live parallax state of the current map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParallaxState {
    pub name: String,
    /// Names starting with `!` are drawn without parallax offset.
    pub zero: bool,
    pub loop_x: bool,
    pub loop_y: bool,
    pub sx: i32,
    pub sy: i32,
    pub x: f64,
    pub y: f64,
}

pub fn is_zero_parallax(name: &str) -> bool {
    name.starts_with('!')
}

/// Builds the parallax state for a freshly loaded map, with the image name
/// run through the parallax override rules. Scroll offsets start at zero.
pub fn setup_parallax<S>(
    map: &MapData,
    map_id: u32,
    rules: &[OverrideRule],
    switches: &S,
) -> ParallaxState
where
    S: SwitchLookup + ?Sized,
{
    let name = resolve_override(&map.parallax_name, rules, map_id, switches).to_string();
    ParallaxState {
        zero: is_zero_parallax(&name),
        name,
        loop_x: map.parallax_loop_x,
        loop_y: map.parallax_loop_y,
        sx: map.parallax_sx,
        sy: map.parallax_sy,
        x: 0.0,
        y: 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "cue", rename_all = "snake_case")]
pub enum BgmAction {
    /// Map does not autoplay music.
    Keep,
    /// Player is riding a vehicle; the host stores the map BGM as the
    /// walking BGM instead of playing it.
    SaveWalkingBgm,
    Play(AudioCue),
}

/// What the audio system should do when a map finishes loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoplayPlan {
    pub bgm: BgmAction,
    pub bgs: Option<AudioCue>,
}

/// Plans map autoplay. The BGM track name is run through the BGM override
/// rules; volume, pitch and pan are kept from the map.
pub fn autoplay<S>(
    map: &MapData,
    map_id: u32,
    in_vehicle: bool,
    rules: &[OverrideRule],
    switches: &S,
) -> AutoplayPlan
where
    S: SwitchLookup + ?Sized,
{
    let bgm = if !map.autoplay_bgm {
        BgmAction::Keep
    } else if in_vehicle {
        BgmAction::SaveWalkingBgm
    } else {
        let name = resolve_override(&map.bgm.name, rules, map_id, switches).to_string();
        BgmAction::Play(AudioCue {
            name,
            ..map.bgm.clone()
        })
    };

    AutoplayPlan {
        bgm,
        bgs: map.autoplay_bgs.then(|| map.bgs.clone()),
    }
}
