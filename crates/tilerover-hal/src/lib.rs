//! `tilerover-hal` – hardware capability boundary.
//!
//! The decision engine never touches motors or sensors directly; it talks to
//! the traits defined here, so drivers can be swapped without touching any
//! planning logic.  Every physical call is *blocking*: it returns once the
//! motion or read has completed, and the engine sequences calls accordingly.
//!
//! # Modules
//!
//! - [`motion`] – [`MotionActuator`][motion::MotionActuator]: the wheeled
//!   drive base (signed turns, signed straight drives).
//! - [`sensor`] – [`HeadingSensor`][sensor::HeadingSensor] (gyro with an
//!   unbounded accumulator), [`ColorSensor`][sensor::ColorSensor], and
//!   [`RangeSensor`][sensor::RangeSensor].
//! - [`effector`] – [`ClawActuator`][effector::ClawActuator] and
//!   [`LauncherActuator`][effector::LauncherActuator].
//! - [`signal`] – [`StartSignal`][signal::StartSignal] (polled by the
//!   program shell, never by the engine) and
//!   [`AlarmOutput`][signal::AlarmOutput] (driven by the alarm task).
//! - [`chassis`] – [`Chassis`][chassis::Chassis]: the typed bundle of
//!   engine-facing devices.
//! - [`sim`] – [`SimArena`][sim::SimArena]: a fully simulated arena so the
//!   whole stack runs headless in tests and CI.

pub mod chassis;
pub mod effector;
pub mod motion;
pub mod sensor;
pub mod signal;
pub mod sim;

pub use chassis::Chassis;
pub use effector::{ClawActuator, LauncherActuator};
pub use motion::MotionActuator;
pub use sensor::{ColorSensor, HeadingSensor, RangeSensor};
pub use signal::{AlarmOutput, StartSignal};
pub use sim::SimArena;
