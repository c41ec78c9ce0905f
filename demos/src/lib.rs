//! Tower-defence field shared by the demo binaries.
//!
//! Demonstrates: a walled field with an entrance and an exit, random 2×2
//! tower placement that is refused whenever it would cut a creep (or the
//! entrance) off from the exit, and creeps advancing one cell per tick
//! through the cached next-step index.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::{Deserialize, Serialize};
use tdpath_core::{Coord, GridError, GridMap};
use tdpath_paths::{GridPath, Placement};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading a config or building a field.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

// ---------------------------------------------------------------------------
// FieldConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Field`]. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub rows: i32,
    pub cols: i32,
    /// First column of the entrance gap in the top wall.
    pub entrance_col: i32,
    /// First column of the exit gap in the bottom wall.
    pub exit_col: i32,
    /// Width of the entrance and exit gaps.
    pub gap_width: i32,
    /// Side of a square tower footprint.
    pub tower_size: i32,
    /// Random placements tried before the first creep spawns.
    pub initial_towers: usize,
    /// Try one random placement every this many ticks (0 disables).
    pub build_every: u32,
    pub creeps: usize,
    pub spawn_every: u32,
    pub max_ticks: u32,
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 30,
            entrance_col: 9,
            exit_col: 19,
            gap_width: 2,
            tower_size: 2,
            initial_towers: 40,
            build_every: 5,
            creeps: 6,
            spawn_every: 4,
            max_ticks: 1000,
            seed: 42,
        }
    }
}

impl FieldConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let text = std::fs::read_to_string(path)?;
        let config: FieldConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the field described is buildable.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.rows < 3 || self.cols < 3 {
            return Err(FieldError::Config(format!(
                "field must be at least 3x3, got {}x{}",
                self.rows, self.cols
            )));
        }
        let gap_fits = |col: i32| col >= 1 && col + self.gap_width <= self.cols - 1;
        if self.gap_width < 1 || !gap_fits(self.entrance_col) || !gap_fits(self.exit_col) {
            return Err(FieldError::Config(
                "entrance and exit gaps must lie inside the side walls".to_string(),
            ));
        }
        if self.tower_size < 1 || self.tower_size > self.rows - 2 || self.tower_size > self.cols - 2 {
            return Err(FieldError::Config(format!(
                "tower size {} does not fit the field",
                self.tower_size
            )));
        }
        if self.spawn_every == 0 {
            return Err(FieldError::Config("spawn_every must be positive".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Creep
// ---------------------------------------------------------------------------

/// A creep walking toward the exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Creep {
    pub id: usize,
    pub pos: Coord,
    pub steps: u32,
}

/// Outcome of [`Field::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u32,
    pub towers: usize,
    pub arrived: usize,
    /// Creeps still on the field when the run ended.
    pub remaining: usize,
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// A walled tower-defence field.
pub struct Field {
    config: FieldConfig,
    path: GridPath,
    entrance: Coord,
    rng: StdRng,
    towers: Vec<Vec<Coord>>,
    creeps: Vec<Creep>,
    spawned: usize,
    arrived: usize,
    tick: u32,
}

impl Field {
    /// Build the walls and the path index for `config`.
    pub fn new(config: FieldConfig) -> Result<Self, FieldError> {
        config.validate()?;
        let (rows, cols) = (config.rows, config.cols);
        let in_gap = |col: i32, start: i32| col >= start && col < start + config.gap_width;

        let mut map = GridMap::new(rows, cols)?;
        for col in 0..cols {
            if !in_gap(col, config.entrance_col) {
                map.set_blocked(Coord::new(0, col), true)?;
            }
            if !in_gap(col, config.exit_col) {
                map.set_blocked(Coord::new(rows - 1, col), true)?;
            }
        }
        for row in 0..rows {
            map.set_blocked(Coord::new(row, 0), true)?;
            map.set_blocked(Coord::new(row, cols - 1), true)?;
        }

        let entrance = Coord::new(0, config.entrance_col);
        let exit = Coord::new(rows - 1, config.exit_col);
        let path = GridPath::with_map(map, exit)?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            path,
            entrance,
            rng,
            towers: Vec::new(),
            creeps: Vec::new(),
            spawned: 0,
            arrived: 0,
            tick: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn path(&self) -> &GridPath {
        &self.path
    }

    #[inline]
    pub fn entrance(&self) -> Coord {
        self.entrance
    }

    #[inline]
    pub fn exit(&self) -> Coord {
        self.path.goal()
    }

    #[inline]
    pub fn creeps(&self) -> &[Creep] {
        &self.creeps
    }

    #[inline]
    pub fn towers(&self) -> &[Vec<Coord>] {
        &self.towers
    }

    /// The current route from the entrance to the exit.
    pub fn route(&mut self) -> Vec<Coord> {
        self.path.path_from(self.entrance)
    }

    /// Try to place a tower with its top-left corner at `corner`.
    ///
    /// Footprints covering a creep are refused as occupied.
    pub fn place_tower(&mut self, corner: Coord) -> Result<Placement, FieldError> {
        let size = self.config.tower_size;
        let footprint: Vec<Coord> = (0..size)
            .flat_map(|dr| (0..size).map(move |dc| corner.shift(dr, dc)))
            .collect();
        if let Some(creep) = self.creeps.iter().find(|c| footprint.contains(&c.pos)) {
            return Ok(Placement::Occupied(creep.pos));
        }

        let mut sources = Vec::with_capacity(self.creeps.len() + 1);
        sources.push(self.entrance);
        sources.extend(self.creeps.iter().map(|c| c.pos));

        let placement = self.path.try_place(&footprint, &sources)?;
        if placement.is_placed() {
            log::info!("tower {} placed at {corner}", self.towers.len());
            self.towers.push(footprint);
        }
        Ok(placement)
    }

    /// Try one tower at a random position inside the walls.
    pub fn place_random_tower(&mut self) -> Result<Placement, FieldError> {
        let size = self.config.tower_size;
        let row = self.rng.random_range(1..=self.config.rows - 1 - size);
        let col = self.rng.random_range(1..=self.config.cols - 1 - size);
        self.place_tower(Coord::new(row, col))
    }

    /// Try `attempts` random placements. Returns how many succeeded.
    pub fn place_random_towers(&mut self, attempts: usize) -> Result<usize, FieldError> {
        let mut placed = 0;
        for _ in 0..attempts {
            match self.place_random_tower()? {
                Placement::Placed => placed += 1,
                Placement::Occupied(c) => log::debug!("tower skipped: {c} occupied"),
                Placement::SealsPath(c) => log::debug!("tower skipped: would seal {c}"),
            }
        }
        Ok(placed)
    }

    /// Advance the field by one tick: maybe build, maybe spawn, then move
    /// every creep one cell.
    pub fn tick(&mut self) -> Result<(), FieldError> {
        self.tick += 1;

        if self.config.build_every > 0 && self.tick % self.config.build_every == 0 {
            self.place_random_tower()?;
        }

        if self.spawned < self.config.creeps && (self.tick - 1) % self.config.spawn_every == 0 {
            self.creeps.push(Creep {
                id: self.spawned,
                pos: self.entrance,
                steps: 0,
            });
            self.spawned += 1;
        }

        let goal = self.path.goal();
        let path = &mut self.path;
        let arrived = &mut self.arrived;
        self.creeps.retain_mut(|creep| {
            let Some(next) = path.get_next(creep.pos) else {
                log::warn!("creep {} is stuck at {}", creep.id, creep.pos);
                return true;
            };
            creep.pos = next;
            creep.steps += 1;
            if next == goal {
                log::info!("creep {} reached the exit in {} steps", creep.id, creep.steps);
                *arrived += 1;
                return false;
            }
            true
        });
        Ok(())
    }

    /// Whether every creep has spawned and left the field.
    pub fn is_done(&self) -> bool {
        self.spawned == self.config.creeps && self.creeps.is_empty()
    }

    /// Tick until done or `max_ticks` is reached.
    pub fn run(&mut self) -> Result<RunSummary, FieldError> {
        while !self.is_done() && self.tick < self.config.max_ticks {
            self.tick()?;
        }
        Ok(RunSummary {
            ticks: self.tick,
            towers: self.towers.len(),
            arrived: self.arrived,
            remaining: self.creeps.len(),
        })
    }

    /// ASCII view: the grid dump with `E` entrance, `X` exit and `c` creeps.
    pub fn render(&self) -> String {
        let mut rows: Vec<Vec<char>> = self
            .path
            .grid()
            .to_string()
            .lines()
            .map(|l| l.chars().collect())
            .collect();
        let mut mark = |c: Coord, ch: char| {
            if let Some(cell) = rows
                .get_mut(c.row as usize)
                .and_then(|r| r.get_mut(c.col as usize))
            {
                *cell = ch;
            }
        };
        mark(self.entrance, 'E');
        mark(self.exit(), 'X');
        for creep in &self.creeps {
            mark(creep.pos, 'c');
        }
        let mut out = String::new();
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}
