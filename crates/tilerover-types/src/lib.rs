//! `tilerover-types` – shared domain vocabulary for the TileRover stack.
//!
//! Everything here is plain data: grid geometry ([`Position`], [`GridBounds`],
//! [`Heading`]), the objective model ([`Objective`], [`ObjectiveKind`]),
//! sensor alphabets ([`TileColor`], [`ThreatLevel`]), the carried-state
//! aggregate ([`Inventory`]), and the workspace-wide [`RoverError`].
//! The decision logic that manipulates these types lives in
//! `tilerover-engine`; hardware access lives in `tilerover-hal`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Grid geometry
// ────────────────────────────────────────────────────────────────────────────

/// Inclusive per-axis bounds of the square arena.
///
/// Both axes share the same range; the default arena is `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: i32,
    pub max: i32,
}

impl GridBounds {
    /// Construct bounds covering `min..=max` on both axes.
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// `true` if `value` lies inside the per-axis range.
    pub fn contains_axis(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp a single axis value into the range.
    pub fn clamp_axis(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self { min: 1, max: 6 }
    }
}

/// One of the eight compass facings, valued in degrees `[0, 360)`.
///
/// East is 0° and angles grow counter-clockwise (North = 90°), matching the
/// drive base's gyro convention.  The y axis grows *southward*, so stepping
/// [`Heading::North`] decrements `y`.
///
/// The enumeration order (counter-clockwise from East) is the canonical
/// tie-break order wherever two headings compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Heading {
    /// All eight facings in enumeration (tie-break) order.
    pub const ALL: [Heading; 8] = [
        Heading::East,
        Heading::NorthEast,
        Heading::North,
        Heading::NorthWest,
        Heading::West,
        Heading::SouthWest,
        Heading::South,
        Heading::SouthEast,
    ];

    /// The four cardinal facings in enumeration order.  Grid moves and tile
    /// scans are always cardinal; the diagonals exist for the 45°-quantum
    /// threat sweep and for hazard aiming.
    pub const CARDINAL: [Heading; 4] = [
        Heading::East,
        Heading::North,
        Heading::West,
        Heading::South,
    ];

    /// Facing angle in degrees, one of `0, 45, …, 315`.
    pub fn degrees(self) -> i32 {
        match self {
            Heading::East => 0,
            Heading::NorthEast => 45,
            Heading::North => 90,
            Heading::NorthWest => 135,
            Heading::West => 180,
            Heading::SouthWest => 225,
            Heading::South => 270,
            Heading::SouthEast => 315,
        }
    }

    /// Map an angle (any winding) back to a facing.  Returns `None` when the
    /// normalized angle is not a multiple of 45°.
    pub fn from_degrees(deg: i32) -> Option<Heading> {
        match deg.rem_euclid(360) {
            0 => Some(Heading::East),
            45 => Some(Heading::NorthEast),
            90 => Some(Heading::North),
            135 => Some(Heading::NorthWest),
            180 => Some(Heading::West),
            225 => Some(Heading::SouthWest),
            270 => Some(Heading::South),
            315 => Some(Heading::SouthEast),
            _ => None,
        }
    }

    /// Unit step `(dx, dy)` for one move in this facing.
    pub fn step(self) -> (i32, i32) {
        match self {
            Heading::East => (1, 0),
            Heading::NorthEast => (1, -1),
            Heading::North => (0, -1),
            Heading::NorthWest => (-1, -1),
            Heading::West => (-1, 0),
            Heading::SouthWest => (-1, 1),
            Heading::South => (0, 1),
            Heading::SouthEast => (1, 1),
        }
    }

    /// `true` for E/N/W/S, `false` for the diagonals.
    pub fn is_cardinal(self) -> bool {
        self.degrees() % 90 == 0
    }
}

/// Integer cell coordinates inside the arena.
///
/// Mutated only by a successful move; no other code path assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `true` if both axes lie inside `bounds`.
    pub fn in_bounds(&self, bounds: GridBounds) -> bool {
        bounds.contains_axis(self.x) && bounds.contains_axis(self.y)
    }

    /// The cell one step in `heading`'s direction, clamped per axis.
    ///
    /// A move toward a boundary the position already sits on is a no-op on
    /// that axis.  Callers are expected to filter such moves out beforehand
    /// via [`Position::neighbor`]; the clamp is a backstop, not an API.
    pub fn step(self, heading: Heading, bounds: GridBounds) -> Position {
        let (dx, dy) = heading.step();
        Position {
            x: bounds.clamp_axis(self.x + dx),
            y: bounds.clamp_axis(self.y + dy),
        }
    }

    /// The adjacent cell in `heading`'s direction, or `None` when that cell
    /// would leave the arena.  This is the move-candidate filter.
    pub fn neighbor(self, heading: Heading, bounds: GridBounds) -> Option<Position> {
        let (dx, dy) = heading.step();
        let next = Position::new(self.x + dx, self.y + dy);
        next.in_bounds(bounds).then_some(next)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Objectives
// ────────────────────────────────────────────────────────────────────────────

/// The category of a queued objective.  Variant order is the fixed chase
/// priority: hazards beat resources beat the escape beacon beats items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKind {
    Hazard,
    Resource,
    EscapeBeacon,
    Item,
}

/// A `(kind, position)` pair the robot intends to reach.
///
/// Immutable once created; constructed only through [`Objective::new`], which
/// rejects out-of-bounds targets so the goal queue never holds a cell the
/// robot cannot stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    kind: ObjectiveKind,
    position: Position,
}

impl Objective {
    /// Build an objective, validating `position` against `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::OutOfBounds`] when the target cell lies outside
    /// the arena.
    pub fn new(
        kind: ObjectiveKind,
        position: Position,
        bounds: GridBounds,
    ) -> Result<Self, RoverError> {
        if !position.in_bounds(bounds) {
            return Err(RoverError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        Ok(Self { kind, position })
    }

    pub fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sensor alphabets
// ────────────────────────────────────────────────────────────────────────────

/// Classified reading from the downward color sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileColor {
    /// Adversarial marker tile.
    Hazard,
    /// Ammunition pickup tile.
    Resource,
    /// Deliverable item tile.
    Item,
    /// The delivery / escape beacon marking.
    EscapeMarker,
    /// No recognized marking.
    Blank,
}

impl TileColor {
    /// The objective discovered when this color is seen on an adjacent tile.
    ///
    /// Beacon markings and blank tiles discover nothing: the beacon objective
    /// is queued by the item-pickup transition, not by scanning.
    pub fn discovered_objective(self) -> Option<ObjectiveKind> {
        match self {
            TileColor::Hazard => Some(ObjectiveKind::Hazard),
            TileColor::Resource => Some(ObjectiveKind::Resource),
            TileColor::Item => Some(ObjectiveKind::Item),
            TileColor::EscapeMarker | TileColor::Blank => None,
        }
    }
}

/// Overall danger classification from one threat sweep.
///
/// Recomputed every round from fresh range samples and never persisted.
/// `Ord` follows severity so a sweep's result is simply the `max` of its
/// per-stop classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatLevel {
    Clear,
    Caution,
    Critical,
}

// ────────────────────────────────────────────────────────────────────────────
// Inventory
// ────────────────────────────────────────────────────────────────────────────

/// What the robot currently carries, plus the delivery tally.
///
/// The per-round step budget is derived from the ammo flag rather than stored,
/// so "carrying ammo ⇒ raised budget" holds by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub carrying_ammo: bool,
    pub carrying_item: bool,
    pub items_delivered: u32,
}

impl Inventory {
    /// Moves permitted this round: `loaded` while carrying ammo, else `base`.
    pub fn step_budget(&self, base: u8, loaded: u8) -> u8 {
        if self.carrying_ammo { loaded } else { base }
    }

    /// Record an ammo pickup.
    pub fn load_ammo(&mut self) {
        self.carrying_ammo = true;
    }

    /// Record the ammo leaving the robot (fired or dropped); the step budget
    /// reverts on the next [`Inventory::step_budget`] call.
    pub fn expend_ammo(&mut self) {
        self.carrying_ammo = false;
    }

    /// Record an item pickup.
    pub fn take_item(&mut self) {
        self.carrying_item = true;
    }

    /// Record a delivery at the beacon: clears the carried item and bumps the
    /// tally.  No-ops when nothing is carried.
    pub fn deliver_item(&mut self) {
        if self.carrying_item {
            self.carrying_item = false;
            self.items_delivered += 1;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Workspace-wide error type spanning hardware faults and the recoverable
/// engine conditions (stuck, degraded heading).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoverError {
    #[error("Hardware Fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    /// No legal move and no pending objective: terminal for the run loop,
    /// reported to the caller rather than panicking.
    #[error("Stuck at ({x}, {y}): no legal move and no pending objective")]
    Stuck { x: i32, y: i32 },

    /// Heading correction hit its iteration cap without converging.
    /// Recoverable: the caller logs and continues with the residual offset.
    #[error("Heading correction aborted with {residual_deg}° residual")]
    HeadingDegraded { residual_deg: i32 },

    #[error("Position ({x}, {y}) is outside the arena bounds")]
    OutOfBounds { x: i32, y: i32 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_degrees_roundtrip() {
        for h in Heading::ALL {
            assert_eq!(Heading::from_degrees(h.degrees()), Some(h));
            // Any winding of the same angle maps back.
            assert_eq!(Heading::from_degrees(h.degrees() + 720), Some(h));
            assert_eq!(Heading::from_degrees(h.degrees() - 360), Some(h));
        }
    }

    #[test]
    fn from_degrees_rejects_off_quantum_angles() {
        assert_eq!(Heading::from_degrees(30), None);
        assert_eq!(Heading::from_degrees(91), None);
    }

    #[test]
    fn cardinal_steps_match_arena_orientation() {
        // East grows x, South grows y, North shrinks y.
        assert_eq!(Heading::East.step(), (1, 0));
        assert_eq!(Heading::South.step(), (0, 1));
        assert_eq!(Heading::North.step(), (0, -1));
        assert_eq!(Heading::West.step(), (-1, 0));
    }

    #[test]
    fn diagonal_steps_combine_both_axes() {
        assert_eq!(Heading::NorthEast.step(), (1, -1));
        assert_eq!(Heading::SouthWest.step(), (-1, 1));
    }

    #[test]
    fn only_four_headings_are_cardinal() {
        let cardinal: Vec<Heading> = Heading::ALL
            .into_iter()
            .filter(|h| h.is_cardinal())
            .collect();
        assert_eq!(cardinal, Heading::CARDINAL.to_vec());
    }

    #[test]
    fn step_clamps_at_the_boundary() {
        let bounds = GridBounds::default();
        let corner = Position::new(1, 1);
        // Moving off the west edge is a no-op on x.
        assert_eq!(corner.step(Heading::West, bounds), corner);
        // Moving off the north edge is a no-op on y.
        assert_eq!(corner.step(Heading::North, bounds), corner);
        // Legal axes still move.
        assert_eq!(corner.step(Heading::East, bounds), Position::new(2, 1));
    }

    #[test]
    fn neighbor_filters_out_of_bounds_moves() {
        let bounds = GridBounds::default();
        let corner = Position::new(1, 1);
        assert_eq!(corner.neighbor(Heading::West, bounds), None);
        assert_eq!(corner.neighbor(Heading::North, bounds), None);
        assert_eq!(
            corner.neighbor(Heading::South, bounds),
            Some(Position::new(1, 2))
        );
        let centre = Position::new(3, 3);
        for h in Heading::CARDINAL {
            assert!(centre.neighbor(h, bounds).is_some());
        }
    }

    #[test]
    fn position_stays_in_bounds_under_any_legal_move_sequence() {
        let bounds = GridBounds::default();
        let mut pos = Position::new(1, 1);
        // Deliberately hammer the edges.
        let walk = [
            Heading::North,
            Heading::West,
            Heading::East,
            Heading::East,
            Heading::East,
            Heading::East,
            Heading::East,
            Heading::East,
            Heading::South,
            Heading::South,
            Heading::South,
            Heading::South,
            Heading::South,
            Heading::South,
        ];
        for h in walk {
            pos = pos.step(h, bounds);
            assert!(pos.in_bounds(bounds), "left bounds at {pos:?}");
        }
    }

    #[test]
    fn objective_rejects_out_of_bounds_target() {
        let bounds = GridBounds::default();
        let err = Objective::new(ObjectiveKind::Hazard, Position::new(0, 3), bounds)
            .expect_err("must reject x=0");
        assert_eq!(err, RoverError::OutOfBounds { x: 0, y: 3 });
    }

    #[test]
    fn objective_accepts_in_bounds_target() {
        let bounds = GridBounds::default();
        let obj = Objective::new(ObjectiveKind::Item, Position::new(6, 6), bounds).unwrap();
        assert_eq!(obj.kind(), ObjectiveKind::Item);
        assert_eq!(obj.position(), Position::new(6, 6));
    }

    #[test]
    fn tile_color_discovery_mapping() {
        assert_eq!(
            TileColor::Hazard.discovered_objective(),
            Some(ObjectiveKind::Hazard)
        );
        assert_eq!(
            TileColor::Resource.discovered_objective(),
            Some(ObjectiveKind::Resource)
        );
        assert_eq!(
            TileColor::Item.discovered_objective(),
            Some(ObjectiveKind::Item)
        );
        assert_eq!(TileColor::EscapeMarker.discovered_objective(), None);
        assert_eq!(TileColor::Blank.discovered_objective(), None);
    }

    #[test]
    fn threat_severity_orders_clear_caution_critical() {
        assert!(ThreatLevel::Clear < ThreatLevel::Caution);
        assert!(ThreatLevel::Caution < ThreatLevel::Critical);
        assert_eq!(
            ThreatLevel::Caution.max(ThreatLevel::Critical),
            ThreatLevel::Critical
        );
    }

    #[test]
    fn ammo_raises_and_reverts_the_step_budget() {
        let mut inv = Inventory::default();
        assert_eq!(inv.step_budget(1, 2), 1);
        inv.load_ammo();
        assert_eq!(inv.step_budget(1, 2), 2);
        inv.expend_ammo();
        assert_eq!(inv.step_budget(1, 2), 1);
    }

    #[test]
    fn delivery_requires_a_carried_item() {
        let mut inv = Inventory::default();
        inv.deliver_item();
        assert_eq!(inv.items_delivered, 0);
        inv.take_item();
        inv.deliver_item();
        assert_eq!(inv.items_delivered, 1);
        assert!(!inv.carrying_item);
    }

    #[test]
    fn position_serialization_roundtrip() {
        let pos = Position::new(4, 2);
        let json = serde_json::to_string(&pos).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(pos, back);
    }

    #[test]
    fn rover_error_display() {
        let err = RoverError::HardwareFault {
            component: "launcher".to_string(),
            details: "jammed".to_string(),
        };
        assert!(err.to_string().contains("launcher"));

        let stuck = RoverError::Stuck { x: 3, y: 4 };
        assert!(stuck.to_string().contains("(3, 4)"));

        let degraded = RoverError::HeadingDegraded { residual_deg: 7 };
        assert!(degraded.to_string().contains("7"));
    }
}
