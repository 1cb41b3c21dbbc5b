use std::str::FromStr;

use crate::config::MapPropertiesConfig;
use crate::host::{Direction, MapOracle, SwitchLookup};
use crate::media::{self, AutoplayPlan, MapData, ParallaxState};
use crate::overrides::resolve_override;
use crate::passability;
use crate::region::ActorScope;
use crate::scroll::ScrollMemory;
use crate::MapPropertiesError;

/// Commands the host can trigger by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginCommand {
    SavePosition,
    LoadPosition,
}

impl PluginCommand {
    pub fn name(self) -> &'static str {
        match self {
            PluginCommand::SavePosition => "save_parallax_position",
            PluginCommand::LoadPosition => "load_parallax_position",
        }
    }
}

impl FromStr for PluginCommand {
    type Err = MapPropertiesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save_parallax_position" => Ok(PluginCommand::SavePosition),
            "load_parallax_position" => Ok(PluginCommand::LoadPosition),
            other => Err(MapPropertiesError::Config(format!(
                "unknown plugin command '{}'",
                other
            ))),
        }
    }
}

/// Plugin context: the parsed configuration plus the scroll slot. The host
/// keeps one of these for the life of the process and calls into it from
/// its map-load, movement and command hooks.
#[derive(Debug)]
pub struct MapProperties {
    config: MapPropertiesConfig,
    scroll: ScrollMemory,
}

impl MapProperties {
    pub fn new(config: MapPropertiesConfig) -> Self {
        Self {
            config,
            scroll: ScrollMemory::new(),
        }
    }

    pub fn config(&self) -> &MapPropertiesConfig {
        &self.config
    }

    pub fn resolve_parallax<'a, S>(&'a self, name: &'a str, map_id: u32, switches: &S) -> &'a str
    where
        S: SwitchLookup + ?Sized,
    {
        resolve_override(name, &self.config.parallax_rules, map_id, switches)
    }

    pub fn resolve_bgm<'a, S>(&'a self, name: &'a str, map_id: u32, switches: &S) -> &'a str
    where
        S: SwitchLookup + ?Sized,
    {
        resolve_override(name, &self.config.bgm_rules, map_id, switches)
    }

    pub fn setup_parallax<S>(&self, map: &MapData, map_id: u32, switches: &S) -> ParallaxState
    where
        S: SwitchLookup + ?Sized,
    {
        media::setup_parallax(map, map_id, &self.config.parallax_rules, switches)
    }

    pub fn autoplay<S>(&self, map: &MapData, map_id: u32, in_vehicle: bool, switches: &S) -> AutoplayPlan
    where
        S: SwitchLookup + ?Sized,
    {
        media::autoplay(map, map_id, in_vehicle, &self.config.bgm_rules, switches)
    }

    /// Map-level passability with the global region gate.
    pub fn is_passable<M: MapOracle + ?Sized>(&self, map: &M, x: i32, y: i32, d: Direction) -> bool {
        passability::map_passable(&self.config.regions, map, x, y, d)
    }

    pub fn is_player_passable<M: MapOracle + ?Sized>(&self, map: &M, x: i32, y: i32, d: Direction) -> bool {
        passability::scoped_map_passable(&self.config.regions, map, ActorScope::Player, x, y, d)
    }

    pub fn is_event_passable<M: MapOracle + ?Sized>(&self, map: &M, x: i32, y: i32, d: Direction) -> bool {
        passability::scoped_map_passable(&self.config.regions, map, ActorScope::Event, x, y, d)
    }

    /// Region decision over a raw verdict the host already computed.
    pub fn region_passable<M: MapOracle + ?Sized>(
        &self,
        map: &M,
        scope: ActorScope,
        x: i32,
        y: i32,
        d: Direction,
        normally: bool,
    ) -> bool {
        passability::region_passable(&self.config.regions, map, scope, x, y, d, normally)
    }

    /// Full character step check: engine default verdict, then regions.
    pub fn is_map_passable<M: MapOracle + ?Sized>(
        &self,
        map: &M,
        scope: ActorScope,
        x: i32,
        y: i32,
        d: Direction,
    ) -> bool {
        let normally = passability::normally_passable(&self.config.regions, map, x, y, d);
        self.region_passable(map, scope, x, y, d, normally)
    }

    pub fn save_scroll_position(&mut self, live: &ParallaxState) {
        self.scroll.save(live);
    }

    pub fn load_scroll_position(&self, live: &mut ParallaxState) {
        self.scroll.load(live);
    }

    pub fn run_command(&mut self, command: PluginCommand, live: &mut ParallaxState) {
        match command {
            PluginCommand::SavePosition => self.save_scroll_position(live),
            PluginCommand::LoadPosition => self.load_scroll_position(live),
        }
    }
}
