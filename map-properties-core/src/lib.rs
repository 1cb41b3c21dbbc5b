use thiserror::Error;

pub mod config;
pub mod grid;
pub mod host;
pub mod media;
pub mod overrides;
pub mod passability;
pub mod plugin;
pub mod region;
pub mod scroll;

pub use config::{MapPropertiesConfig, DEFAULT_PLUGIN_NAME};
pub use grid::GridMap;
pub use host::{Direction, GameSwitches, MapOracle, SwitchLookup};
pub use media::{AudioCue, AutoplayPlan, BgmAction, MapData, ParallaxState};
pub use overrides::{resolve_override, MapScope, OverrideRule};
pub use plugin::{MapProperties, PluginCommand};
pub use region::{ActorScope, RegionIdSet, RegionRules};
pub use scroll::{ScrollMemory, ScrollOffset};

#[derive(Debug, Error)]
pub enum MapPropertiesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MapPropertiesError>;
