//! Region overlays on top of the engine's tile passability.
//!
//! Three layers, each a restrict/allow pair where restrict wins:
//!
//! 1. the "all" sets gate every map-level query on the tile being checked;
//! 2. the player or event sets gate scoped map-level queries on top of (1);
//! 3. a character move re-checks the destination region against the actor's
//!    combined sets, and may open a move the tiles would block when both
//!    ends of the step are either pass-through regions or passable edges.

use crate::host::{Direction, MapOracle};
use crate::region::{ActorScope, RegionGate, RegionRules};

/// Map-level passability of the `d` edge of tile (x, y) with the global
/// region gate applied to that tile.
pub fn map_passable<M>(rules: &RegionRules, map: &M, x: i32, y: i32, d: Direction) -> bool
where
    M: MapOracle + ?Sized,
{
    match rules.global_gate(map.region_id(x, y)) {
        RegionGate::Unaffected => map.is_tile_passable(x, y, d),
        gate => gate.over(false),
    }
}

/// Map-level passability for a given scope. RestrictAll closes the tile
/// before the scope's own sets are consulted; otherwise falls back to
/// [`map_passable`].
pub fn scoped_map_passable<M>(
    rules: &RegionRules,
    map: &M,
    scope: ActorScope,
    x: i32,
    y: i32,
    d: Direction,
) -> bool
where
    M: MapOracle + ?Sized,
{
    let region = map.region_id(x, y);
    if rules.global_gate(region) == RegionGate::Restricted {
        return false;
    }
    match rules.scope_gate(scope, region) {
        RegionGate::Unaffected => map_passable(rules, map, x, y, d),
        gate => gate.over(false),
    }
}

/// The engine's default character check: leave (x, y) through `d` and enter
/// the neighbour through the opposite edge.
pub fn normally_passable<M>(rules: &RegionRules, map: &M, x: i32, y: i32, d: Direction) -> bool
where
    M: MapOracle + ?Sized,
{
    let x2 = map.round_x_with_direction(x, d);
    let y2 = map.round_y_with_direction(y, d);
    map_passable(rules, map, x, y, d) && map_passable(rules, map, x2, y2, d.reverse())
}

/// Final verdict for a single step from (x, y) toward `d`, given the raw
/// verdict the engine computed without actor-level region rules.
pub fn region_passable<M>(
    rules: &RegionRules,
    map: &M,
    scope: ActorScope,
    x: i32,
    y: i32,
    d: Direction,
    normally: bool,
) -> bool
where
    M: MapOracle + ?Sized,
{
    let x2 = map.round_x_with_direction(x, d);
    let y2 = map.round_y_with_direction(y, d);
    decide_move(rules, map, scope, (x, y), (x2, y2), d, normally)
}

/// Same as [`region_passable`] with the destination supplied by the caller.
pub fn decide_move<M>(
    rules: &RegionRules,
    map: &M,
    scope: ActorScope,
    from: (i32, i32),
    to: (i32, i32),
    d: Direction,
    normally: bool,
) -> bool
where
    M: MapOracle + ?Sized,
{
    if scope == ActorScope::Vehicle {
        return normally;
    }

    let next_region = map.region_id(to.0, to.1);
    if rules.is_blocked_by(scope, next_region) {
        return false;
    }
    if normally {
        return true;
    }

    let my_region = map.region_id(from.0, from.1);
    let my_tile_passes =
        rules.passes_through(scope, my_region) || map_passable(rules, map, from.0, from.1, d);
    let next_tile_passes = rules.passes_through(scope, next_region)
        || map_passable(rules, map, to.0, to.1, d.reverse());
    my_tile_passes && next_tile_passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridMap;

    fn set(ids: &[u32]) -> crate::region::RegionIdSet {
        ids.iter().copied().collect()
    }

    // Row 0: open, open, blocked, open. Regions 0, 0, 12, 9.
    fn corridor() -> GridMap {
        GridMap::from_rows(&["..#."], &[vec![0, 0, 12, 9]]).unwrap()
    }

    fn step(rules: &RegionRules, map: &GridMap, scope: ActorScope, x: i32, d: Direction) -> bool {
        let normally = normally_passable(rules, map, x, 0, d);
        region_passable(rules, map, scope, x, 0, d, normally)
    }

    #[test]
    fn allow_all_opens_blocked_tile_for_everyone() {
        let rules = RegionRules {
            allow_all: set(&[12]),
            ..Default::default()
        };
        let map = corridor();
        assert!(!map.is_tile_passable(2, 0, Direction::Left));
        for scope in [ActorScope::Player, ActorScope::Event, ActorScope::Neutral] {
            assert!(step(&rules, &map, scope, 1, Direction::Right));
            assert!(region_passable(&rules, &map, scope, 1, 0, Direction::Right, false));
        }
    }

    #[test]
    fn restrict_events_only_blocks_events() {
        let rules = RegionRules {
            restrict_events: set(&[9]),
            ..Default::default()
        };
        let map = GridMap::from_rows(&["...."], &[vec![0, 0, 0, 9]]).unwrap();
        assert!(!step(&rules, &map, ActorScope::Event, 2, Direction::Right));
        assert!(step(&rules, &map, ActorScope::Player, 2, Direction::Right));
    }

    #[test]
    fn restrict_all_beats_player_allowance() {
        let rules = RegionRules {
            restrict_all: set(&[12]),
            allow_player: set(&[12]),
            ..Default::default()
        };
        let map = corridor();
        assert!(!step(&rules, &map, ActorScope::Player, 1, Direction::Right));
        assert!(!region_passable(&rules, &map, ActorScope::Player, 1, 0, Direction::Right, true));
        assert!(!region_passable(&rules, &map, ActorScope::Player, 1, 0, Direction::Right, false));
    }

    #[test]
    fn restrict_all_turns_open_tile_into_wall() {
        let rules = RegionRules {
            restrict_all: set(&[5]),
            ..Default::default()
        };
        let map = GridMap::from_rows(&["..."], &[vec![0, 5, 0]]).unwrap();
        assert!(!map_passable(&rules, &map, 1, 0, Direction::Left));
        assert!(!step(&rules, &map, ActorScope::Neutral, 0, Direction::Right));
    }

    #[test]
    fn player_hidden_path_is_player_only() {
        let rules = RegionRules {
            allow_player: set(&[12]),
            ..Default::default()
        };
        let map = corridor();
        assert!(step(&rules, &map, ActorScope::Player, 1, Direction::Right));
        assert!(!step(&rules, &map, ActorScope::Event, 1, Direction::Right));
    }

    #[test]
    fn leaving_a_pass_through_region_needs_open_destination() {
        let rules = RegionRules {
            allow_player: set(&[12]),
            ..Default::default()
        };
        // Blocked tile with region 12 followed by another blocked tile.
        let map = GridMap::from_rows(&[".##"], &[vec![0, 12, 0]]).unwrap();
        assert!(!step(&rules, &map, ActorScope::Player, 1, Direction::Right));
        assert!(step(&rules, &map, ActorScope::Player, 1, Direction::Left));
    }

    #[test]
    fn vehicles_keep_the_raw_verdict() {
        let rules = RegionRules {
            restrict_all: set(&[9]),
            allow_all: set(&[12]),
            ..Default::default()
        };
        let map = corridor();
        assert!(region_passable(&rules, &map, ActorScope::Vehicle, 2, 0, Direction::Right, true));
        assert!(!region_passable(&rules, &map, ActorScope::Vehicle, 1, 0, Direction::Right, false));
    }

    #[test]
    fn scoped_map_gate_layers_over_global_gate() {
        let rules = RegionRules {
            restrict_all: set(&[9]),
            allow_player: set(&[12]),
            restrict_player: set(&[0]),
            ..Default::default()
        };
        let map = corridor();
        assert!(scoped_map_passable(&rules, &map, ActorScope::Player, 2, 0, Direction::Left));
        assert!(!scoped_map_passable(&rules, &map, ActorScope::Event, 2, 0, Direction::Left));
        assert!(!scoped_map_passable(&rules, &map, ActorScope::Player, 3, 0, Direction::Left));
        assert!(scoped_map_passable(&rules, &map, ActorScope::Player, 0, 0, Direction::Right));
    }

    #[test]
    fn scoped_map_gate_never_reopens_global_wall() {
        let rules = RegionRules {
            restrict_all: set(&[7]),
            allow_player: set(&[7]),
            allow_events: set(&[7]),
            ..Default::default()
        };
        let map = GridMap::from_rows(&["..."], &[vec![0, 7, 0]]).unwrap();
        for scope in [ActorScope::Player, ActorScope::Event] {
            assert!(!scoped_map_passable(&rules, &map, scope, 1, 0, Direction::Left));
            assert!(!step(&rules, &map, scope, 0, Direction::Right));
        }
    }
}
