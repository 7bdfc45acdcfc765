//! In-process simulated arena for CI testing without physical hardware.
//!
//! [`SimArena`] models the bounded grid at a configurable tile pitch: tile
//! markings, the robot's pose in arena units, the gyro accumulator (with an
//! injectable one-shot turn error for correction tests), and the state of
//! the claw, launcher, alarm, and start button.  Every device handle it
//! hands out implements the corresponding capability trait, so the full
//! decision stack runs headless.
//!
//! # Example
//!
//! ```rust
//! use tilerover_hal::sim::SimArena;
//! use tilerover_types::{GridBounds, Position, TileColor};
//!
//! let arena = SimArena::new(GridBounds::default(), 300)
//!     .with_color(3, 1, TileColor::Resource);
//! let mut chassis = arena.chassis();
//!
//! chassis.motion.drive_straight(300).expect("sim drive must succeed");
//! assert_eq!(arena.robot_tile(), Position::new(2, 1));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tilerover_types::{GridBounds, Heading, Position, RoverError, TileColor};
use tracing::debug;

use crate::chassis::Chassis;
use crate::effector::{ClawActuator, LauncherActuator};
use crate::motion::MotionActuator;
use crate::sensor::{ColorSensor, HeadingSensor, RangeSensor};
use crate::signal::{AlarmOutput, StartSignal};

/// Sentinel distance reported when no hazard echoes back.
pub const NO_ECHO_UNITS: i32 = 2550;

// ────────────────────────────────────────────────────────────────────────────
// World state
// ────────────────────────────────────────────────────────────────────────────

/// The full simulated world.  Tile `t` is centred at
/// `(t - bounds.min) * tile_units` on each axis; x grows east, y grows
/// south.
struct SimWorld {
    bounds: GridBounds,
    tile_units: i32,
    colors: HashMap<(i32, i32), TileColor>,
    x_units: i32,
    y_units: i32,
    /// Physical facing in `[0, 360)`.
    true_heading_deg: i32,
    /// Gyro accumulator; unbounded until reset.
    gyro_accum_deg: i32,
    /// One-shot error added to the next commanded turn.
    pending_turn_error_deg: i32,
    claw_closed: bool,
    held: Vec<TileColor>,
    alarm_active: bool,
    shots_fired: u32,
    start_pressed: bool,
}

impl SimWorld {
    fn tile_of(&self, units: i32) -> i32 {
        self.bounds.min + (units + self.tile_units / 2).div_euclid(self.tile_units)
    }

    fn robot_tile(&self) -> (i32, i32) {
        (self.tile_of(self.x_units), self.tile_of(self.y_units))
    }

    /// Physical facing snapped to the nearest 45° octant.
    fn snapped_heading(&self) -> Heading {
        let idx = ((self.true_heading_deg.rem_euclid(360) + 22) / 45) % 8;
        Heading::from_degrees(idx * 45).unwrap_or(Heading::East)
    }

    fn color_at(&self, x: i32, y: i32) -> TileColor {
        self.colors.get(&(x, y)).copied().unwrap_or(TileColor::Blank)
    }

    /// First hazard cell along the snapped facing, with its cell distance.
    fn hazard_along_facing(&self) -> Option<((i32, i32), i32)> {
        let (dx, dy) = self.snapped_heading().step();
        let (mut cx, mut cy) = self.robot_tile();
        for k in 1.. {
            cx += dx;
            cy += dy;
            if !self.bounds.contains_axis(cx) || !self.bounds.contains_axis(cy) {
                return None;
            }
            if self.color_at(cx, cy) == TileColor::Hazard {
                return Some(((cx, cy), k));
            }
        }
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Arena handle
// ────────────────────────────────────────────────────────────────────────────

/// Builder and inspection handle for the simulated arena.
///
/// Clone-free: the arena owns the world and hands out device handles that
/// share it.  Inspection methods exist so tests can assert on physical
/// outcomes (pose, fired shots, alarm state) instead of internal engine
/// state.
pub struct SimArena {
    world: Arc<Mutex<SimWorld>>,
}

fn lock(world: &Arc<Mutex<SimWorld>>) -> MutexGuard<'_, SimWorld> {
    world.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimArena {
    /// Create an empty arena with the robot at the minimum corner, facing
    /// east.
    pub fn new(bounds: GridBounds, tile_units: i32) -> Self {
        Self {
            world: Arc::new(Mutex::new(SimWorld {
                bounds,
                tile_units,
                colors: HashMap::new(),
                x_units: 0,
                y_units: 0,
                true_heading_deg: 0,
                gyro_accum_deg: 0,
                pending_turn_error_deg: 0,
                claw_closed: false,
                held: Vec::new(),
                alarm_active: false,
                shots_fired: 0,
                start_pressed: false,
            })),
        }
    }

    /// Mark tile `(x, y)` with `color`.
    pub fn with_color(self, x: i32, y: i32, color: TileColor) -> Self {
        lock(&self.world).colors.insert((x, y), color);
        self
    }

    /// Place the robot at tile `(x, y)` facing `heading`.
    pub fn with_robot_at(self, x: i32, y: i32, heading: Heading) -> Self {
        {
            let mut w = lock(&self.world);
            w.x_units = (x - w.bounds.min) * w.tile_units;
            w.y_units = (y - w.bounds.min) * w.tile_units;
            w.true_heading_deg = heading.degrees();
            w.gyro_accum_deg = 0;
        }
        self
    }

    /// Arrange for the next commanded turn to overshoot by `deg` degrees.
    /// The gyro observes the overshoot, so a correction pass can fix it.
    pub fn inject_turn_error(&self, deg: i32) {
        lock(&self.world).pending_turn_error_deg = deg;
    }

    /// Press or release the start button.
    pub fn set_start_pressed(&self, pressed: bool) {
        lock(&self.world).start_pressed = pressed;
    }

    // -----------------------------------------------------------------------
    // Device handles
    // -----------------------------------------------------------------------

    /// Build a complete engine-facing [`Chassis`] backed by this arena.
    pub fn chassis(&self) -> Chassis {
        Chassis {
            motion: Box::new(SimDrive {
                world: Arc::clone(&self.world),
            }),
            gyro: Box::new(SimGyro {
                world: Arc::clone(&self.world),
            }),
            color: Box::new(SimColor {
                world: Arc::clone(&self.world),
            }),
            range: Box::new(SimRange {
                world: Arc::clone(&self.world),
            }),
            claw: Box::new(SimClaw {
                world: Arc::clone(&self.world),
            }),
            launcher: Box::new(SimLauncher {
                world: Arc::clone(&self.world),
            }),
        }
    }

    /// The simulated alarm sounder.
    pub fn alarm_output(&self) -> SimAlarm {
        SimAlarm {
            world: Arc::clone(&self.world),
        }
    }

    /// The simulated start button.
    pub fn start_signal(&self) -> SimButton {
        SimButton {
            world: Arc::clone(&self.world),
        }
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// The tile the robot currently occupies.
    pub fn robot_tile(&self) -> Position {
        let (x, y) = lock(&self.world).robot_tile();
        Position::new(x, y)
    }

    /// Physical facing in `[0, 360)`.
    pub fn true_heading_deg(&self) -> i32 {
        lock(&self.world).true_heading_deg
    }

    /// Current gyro accumulator reading.
    pub fn gyro_angle_deg(&self) -> i32 {
        lock(&self.world).gyro_accum_deg
    }

    /// Marking currently on tile `(x, y)`.
    pub fn color_at(&self, x: i32, y: i32) -> TileColor {
        lock(&self.world).color_at(x, y)
    }

    pub fn alarm_active(&self) -> bool {
        lock(&self.world).alarm_active
    }

    pub fn shots_fired(&self) -> u32 {
        lock(&self.world).shots_fired
    }

    /// Markings captured by claw closes, in pickup order.
    pub fn held(&self) -> Vec<TileColor> {
        lock(&self.world).held.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Device handles
// ────────────────────────────────────────────────────────────────────────────

/// Simulated drive base.  Turns apply any pending injected error; straight
/// drives translate the pose along the snapped facing.
pub struct SimDrive {
    world: Arc<Mutex<SimWorld>>,
}

impl MotionActuator for SimDrive {
    fn turn(&mut self, delta_deg: i32) -> Result<(), RoverError> {
        let mut w = lock(&self.world);
        let physical = delta_deg + std::mem::take(&mut w.pending_turn_error_deg);
        w.true_heading_deg = (w.true_heading_deg + physical).rem_euclid(360);
        w.gyro_accum_deg += physical;
        Ok(())
    }

    fn drive_straight(&mut self, distance_units: i32) -> Result<(), RoverError> {
        let mut w = lock(&self.world);
        let (dx, dy) = w.snapped_heading().step();
        w.x_units += dx * distance_units;
        w.y_units += dy * distance_units;
        Ok(())
    }
}

/// Simulated gyro reading the shared accumulator.
pub struct SimGyro {
    world: Arc<Mutex<SimWorld>>,
}

impl HeadingSensor for SimGyro {
    fn current_angle(&mut self) -> i32 {
        lock(&self.world).gyro_accum_deg
    }

    fn reset_zero(&mut self) {
        lock(&self.world).gyro_accum_deg = 0;
    }
}

/// Simulated color sensor classifying the tile under the robot.
pub struct SimColor {
    world: Arc<Mutex<SimWorld>>,
}

impl ColorSensor for SimColor {
    fn sample(&mut self) -> TileColor {
        let w = lock(&self.world);
        let (x, y) = w.robot_tile();
        w.color_at(x, y)
    }
}

/// Simulated range sensor ray-casting along the snapped facing.
pub struct SimRange {
    world: Arc<Mutex<SimWorld>>,
}

impl RangeSensor for SimRange {
    fn sample(&mut self) -> i32 {
        let w = lock(&self.world);
        match w.hazard_along_facing() {
            Some((_, cells)) => cells * w.tile_units,
            None => NO_ECHO_UNITS,
        }
    }
}

/// Simulated claw.  Closing over a resource or item tile captures the
/// marking (the tile reads blank afterwards).
pub struct SimClaw {
    world: Arc<Mutex<SimWorld>>,
}

impl ClawActuator for SimClaw {
    fn open(&mut self) -> Result<(), RoverError> {
        lock(&self.world).claw_closed = false;
        Ok(())
    }

    fn close(&mut self) -> Result<(), RoverError> {
        let mut w = lock(&self.world);
        w.claw_closed = true;
        let cell = w.robot_tile();
        let color = w.color_at(cell.0, cell.1);
        if matches!(color, TileColor::Resource | TileColor::Item) {
            w.colors.remove(&cell);
            w.held.push(color);
            debug!(?cell, ?color, "simulated claw captured marking");
        }
        Ok(())
    }
}

/// Simulated launcher.  Firing destroys the first hazard along the snapped
/// facing; a miss still spends the shot.
pub struct SimLauncher {
    world: Arc<Mutex<SimWorld>>,
}

impl LauncherActuator for SimLauncher {
    fn fire(&mut self) -> Result<(), RoverError> {
        let mut w = lock(&self.world);
        w.shots_fired += 1;
        match w.hazard_along_facing() {
            Some((cell, _)) => {
                w.colors.remove(&cell);
                debug!(?cell, "simulated shot destroyed hazard");
            }
            None => debug!("simulated shot hit nothing"),
        }
        Ok(())
    }
}

/// Simulated alarm sounder.
pub struct SimAlarm {
    world: Arc<Mutex<SimWorld>>,
}

impl AlarmOutput for SimAlarm {
    fn set_active(&mut self, active: bool) -> Result<(), RoverError> {
        lock(&self.world).alarm_active = active;
        Ok(())
    }
}

/// Simulated start button.
pub struct SimButton {
    world: Arc<Mutex<SimWorld>>,
}

impl StartSignal for SimButton {
    fn pressed(&mut self) -> bool {
        lock(&self.world).start_pressed
    }
}
