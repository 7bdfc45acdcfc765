//! [`EngineConfig`] – every arena and behavior tunable in one table.
//!
//! Nothing in the engine hardcodes the arena: grid extent, angular quantum,
//! probe distances, range bands, step budgets, and the delivery cell all
//! come from here.  Fields carry serde defaults so a partial TOML file (or
//! an empty one) yields a working configuration.

use serde::{Deserialize, Serialize};
use tilerover_types::{GridBounds, Position, RoverError};

/// Angular granularity of the heading grid.
///
/// `Quarter` is the 4-facing cardinal arena; `Eighth` adds the diagonals,
/// which widens the threat sweep to 8 stops and tightens heading correction
/// to 45° multiples.  One parameterized engine covers both arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingQuantum {
    #[default]
    Quarter,
    Eighth,
}

impl HeadingQuantum {
    /// Degrees between adjacent facings: 90 or 45.
    pub fn degrees(self) -> i32 {
        match self {
            HeadingQuantum::Quarter => 90,
            HeadingQuantum::Eighth => 45,
        }
    }

    /// Number of stops in one closed sweep: 4 or 8.
    pub fn stop_count(self) -> u32 {
        (360 / self.degrees()) as u32
    }
}

/// The full tunable table for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Inclusive per-axis arena bounds.
    #[serde(default)]
    pub bounds: GridBounds,

    /// Heading grid granularity (sweep width + correction quantum).
    #[serde(default)]
    pub quantum: HeadingQuantum,

    /// Centre-to-centre distance between adjacent tiles, in arena units.
    #[serde(default = "default_tile_units")]
    pub tile_units: i32,

    /// Forward probe distance for adjacent-tile color scans.  Must exceed
    /// half a tile so the sensor crosses onto the neighbor.
    #[serde(default = "default_probe_units")]
    pub probe_units: i32,

    /// Back-off distance of the stun maneuver.
    #[serde(default = "default_stun_units")]
    pub stun_units: i32,

    /// Range at or under which an echo is "near" (critical on cardinal
    /// facings, caution on diagonals).
    #[serde(default = "default_near_band_units")]
    pub near_band_units: i32,

    /// Range at or under which an echo is "far" (caution).
    #[serde(default = "default_far_band_units")]
    pub far_band_units: i32,

    /// Readings beyond this are sensor sentinels, treated as no detection.
    #[serde(default = "default_range_max_units")]
    pub range_max_units: i32,

    /// Moves per round while unladen.
    #[serde(default = "default_base_step_budget")]
    pub base_step_budget: u8,

    /// Moves per round while carrying ammunition.
    #[serde(default = "default_loaded_step_budget")]
    pub loaded_step_budget: u8,

    /// Per-step chance of running an unforced recognition sweep.
    #[serde(default = "default_recognition_probability")]
    pub recognition_probability: f64,

    /// Cells remembered by the backtrack-avoidance trail.
    #[serde(default = "default_trail_capacity")]
    pub trail_capacity: usize,

    /// Cap on 1° corrective turns before heading correction gives up.
    #[serde(default = "default_max_correction_iters")]
    pub max_correction_iters: u32,

    /// The beacon cell where items are delivered (also the win cell).
    #[serde(default = "default_delivery_cell")]
    pub delivery_cell: Position,

    /// Deliveries required to win.
    #[serde(default = "default_deliveries_to_win")]
    pub deliveries_to_win: u32,
}

fn default_tile_units() -> i32 {
    300
}
fn default_probe_units() -> i32 {
    200
}
fn default_stun_units() -> i32 {
    150
}
fn default_near_band_units() -> i32 {
    350
}
fn default_far_band_units() -> i32 {
    650
}
fn default_range_max_units() -> i32 {
    2500
}
fn default_base_step_budget() -> u8 {
    1
}
fn default_loaded_step_budget() -> u8 {
    2
}
fn default_recognition_probability() -> f64 {
    0.5
}
fn default_trail_capacity() -> usize {
    3
}
fn default_max_correction_iters() -> u32 {
    360
}
fn default_delivery_cell() -> Position {
    Position::new(6, 6)
}
fn default_deliveries_to_win() -> u32 {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: GridBounds::default(),
            quantum: HeadingQuantum::default(),
            tile_units: default_tile_units(),
            probe_units: default_probe_units(),
            stun_units: default_stun_units(),
            near_band_units: default_near_band_units(),
            far_band_units: default_far_band_units(),
            range_max_units: default_range_max_units(),
            base_step_budget: default_base_step_budget(),
            loaded_step_budget: default_loaded_step_budget(),
            recognition_probability: default_recognition_probability(),
            trail_capacity: default_trail_capacity(),
            max_correction_iters: default_max_correction_iters(),
            delivery_cell: default_delivery_cell(),
            deliveries_to_win: default_deliveries_to_win(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::Config`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), RoverError> {
        if self.bounds.min > self.bounds.max {
            return Err(RoverError::Config(format!(
                "grid bounds are inverted: {}..={}",
                self.bounds.min, self.bounds.max
            )));
        }
        if self.tile_units <= 0 {
            return Err(RoverError::Config("tile_units must be positive".into()));
        }
        if self.probe_units <= self.tile_units / 2 || self.probe_units >= self.tile_units {
            return Err(RoverError::Config(format!(
                "probe_units must cross onto the adjacent tile: expected ({}, {}) exclusive, got {}",
                self.tile_units / 2,
                self.tile_units,
                self.probe_units
            )));
        }
        if self.near_band_units <= 0 || self.near_band_units >= self.far_band_units {
            return Err(RoverError::Config(
                "range bands must satisfy 0 < near < far".into(),
            ));
        }
        if self.far_band_units > self.range_max_units {
            return Err(RoverError::Config(
                "far band must not exceed the sensor maximum".into(),
            ));
        }
        if self.base_step_budget == 0 || self.loaded_step_budget < self.base_step_budget {
            return Err(RoverError::Config(
                "step budgets must satisfy 1 <= base <= loaded".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.recognition_probability) {
            return Err(RoverError::Config(
                "recognition_probability must lie in [0, 1]".into(),
            ));
        }
        if self.trail_capacity == 0 {
            return Err(RoverError::Config("trail_capacity must be at least 1".into()));
        }
        if !self.delivery_cell.in_bounds(self.bounds) {
            return Err(RoverError::Config(format!(
                "delivery cell ({}, {}) lies outside the arena",
                self.delivery_cell.x, self.delivery_cell.y
            )));
        }
        Ok(())
    }
}
