use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::host::{Direction, MapOracle};
use crate::region::NO_REGION;
use crate::{MapPropertiesError, Result};

/// On-disk grid description.
///
/// `tiles` holds one string per row: `.` is an open tile, `#` a blocked
/// one. `regions` is optional and holds one row of region ids per tile row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridMapFile {
    tiles: Vec<String>,
    #[serde(default)]
    regions: Vec<Vec<u32>>,
    #[serde(default)]
    loop_x: bool,
    #[serde(default)]
    loop_y: bool,
}

/// Minimal tile map: every open tile can be crossed on all four edges and
/// every blocked tile on none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: i32,
    height: i32,
    loop_x: bool,
    loop_y: bool,
    open: Vec<bool>,
    regions: Vec<u32>,
}

impl GridMap {
    pub fn from_rows<S: AsRef<str>>(tiles: &[S], regions: &[Vec<u32>]) -> Result<Self> {
        let height = tiles.len();
        if height == 0 {
            return Err(MapPropertiesError::Config("grid has no rows".to_string()));
        }
        let width = tiles[0].as_ref().chars().count();
        if width == 0 {
            return Err(MapPropertiesError::Config("grid rows are empty".to_string()));
        }

        let mut open = Vec::with_capacity(width * height);
        for (y, row) in tiles.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(MapPropertiesError::Config(format!(
                    "grid row {} has {} tiles, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for c in row.chars() {
                match c {
                    '.' => open.push(true),
                    '#' => open.push(false),
                    other => {
                        return Err(MapPropertiesError::Config(format!(
                            "grid row {} has unknown tile '{}'",
                            y, other
                        )))
                    }
                }
            }
        }

        let mut region_ids = vec![NO_REGION; width * height];
        if !regions.is_empty() {
            if regions.len() != height {
                return Err(MapPropertiesError::Config(format!(
                    "grid has {} region rows, expected {}",
                    regions.len(),
                    height
                )));
            }
            for (y, row) in regions.iter().enumerate() {
                if row.len() != width {
                    return Err(MapPropertiesError::Config(format!(
                        "region row {} has {} entries, expected {}",
                        y,
                        row.len(),
                        width
                    )));
                }
                region_ids[y * width..(y + 1) * width].copy_from_slice(row);
            }
        }

        Ok(Self {
            width: width as i32,
            height: height as i32,
            loop_x: false,
            loop_y: false,
            open,
            regions: region_ids,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: GridMapFile = serde_json::from_str(s)?;
        let grid = Self::from_rows(&file.tiles, &file.regions)?;
        Ok(grid.with_looping(file.loop_x, file.loop_y))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn with_looping(mut self, loop_x: bool, loop_y: bool) -> Self {
        self.loop_x = loop_x;
        self.loop_y = loop_y;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid(x, y).then(|| (y * self.width + x) as usize)
    }
}

impl MapOracle for GridMap {
    fn region_id(&self, x: i32, y: i32) -> u32 {
        self.index(x, y).map_or(NO_REGION, |i| self.regions[i])
    }

    fn is_tile_passable(&self, x: i32, y: i32, _d: Direction) -> bool {
        self.index(x, y).is_some_and(|i| self.open[i])
    }

    fn round_x_with_direction(&self, x: i32, d: Direction) -> i32 {
        let x = x.saturating_add(d.dx());
        if self.loop_x {
            x.rem_euclid(self.width)
        } else {
            x
        }
    }

    fn round_y_with_direction(&self, y: i32, d: Direction) -> i32 {
        let y = y.saturating_add(d.dy());
        if self.loop_y {
            y.rem_euclid(self.height)
        } else {
            y
        }
    }
}
