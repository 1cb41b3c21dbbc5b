use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Boolean switch table owned by the host engine.
pub trait SwitchLookup {
    fn value(&self, switch_id: u32) -> bool;
}

impl<F> SwitchLookup for F
where
    F: Fn(u32) -> bool,
{
    fn value(&self, switch_id: u32) -> bool {
        self(switch_id)
    }
}

/// Switch table holding the ids that are on. Id 0 is reserved and always off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSwitches {
    on: HashSet<u32>,
}

impl GameSwitches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut switches = Self::new();
        for id in ids {
            switches.set_value(id, true);
        }
        switches
    }

    pub fn set_value(&mut self, switch_id: u32, value: bool) {
        if switch_id == 0 {
            return;
        }
        if value {
            self.on.insert(switch_id);
        } else {
            self.on.remove(&switch_id);
        }
    }
}

impl SwitchLookup for GameSwitches {
    fn value(&self, switch_id: u32) -> bool {
        self.on.contains(&switch_id)
    }
}

/// Movement direction, carrying the engine's numpad codes (2/4/6/8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    pub fn code(self) -> u8 {
        match self {
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
            Direction::Up => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Direction::Down),
            4 => Some(Direction::Left),
            6 => Some(Direction::Right),
            8 => Some(Direction::Up),
            _ => None,
        }
    }

    /// Opposite direction (`10 - d` in numpad terms).
    pub fn reverse(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
        }
    }

    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Down | Direction::Up => 0,
        }
    }

    pub fn dy(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            Direction::Left | Direction::Right => 0,
        }
    }
}

/// Read-only view of the live map that the region rules are layered over.
///
/// `is_tile_passable` is the engine's own verdict for crossing the `d` edge
/// of tile (x, y), before any region rule is applied. Coordinate rounding
/// must honour the map's looping flags the same way the engine does.
pub trait MapOracle {
    fn region_id(&self, x: i32, y: i32) -> u32;

    fn is_tile_passable(&self, x: i32, y: i32, d: Direction) -> bool;

    fn round_x_with_direction(&self, x: i32, d: Direction) -> i32 {
        x.saturating_add(d.dx())
    }

    fn round_y_with_direction(&self, y: i32, d: Direction) -> i32 {
        y.saturating_add(d.dy())
    }
}

impl<M: MapOracle + ?Sized> MapOracle for &M {
    fn region_id(&self, x: i32, y: i32) -> u32 {
        (**self).region_id(x, y)
    }

    fn is_tile_passable(&self, x: i32, y: i32, d: Direction) -> bool {
        (**self).is_tile_passable(x, y, d)
    }

    fn round_x_with_direction(&self, x: i32, d: Direction) -> i32 {
        (**self).round_x_with_direction(x, d)
    }

    fn round_y_with_direction(&self, y: i32, d: Direction) -> i32 {
        (**self).round_y_with_direction(y, d)
    }
}
