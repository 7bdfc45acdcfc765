//! [`Chassis`] – the typed bundle of engine-facing devices.
//!
//! The device set is closed (one drive base, one gyro, one color sensor, one
//! range sensor, one claw, one launcher), so the engine takes a typed bundle
//! rather than a string-keyed registry.  The start button and alarm output
//! are deliberately absent: the button is polled by the program shell and
//! the alarm is driven by its own task.

use crate::effector::{ClawActuator, LauncherActuator};
use crate::motion::MotionActuator;
use crate::sensor::{ColorSensor, HeadingSensor, RangeSensor};

/// Every device the decision engine drives, boxed behind the capability
/// traits so real and simulated hardware are interchangeable.
pub struct Chassis {
    pub motion: Box<dyn MotionActuator>,
    pub gyro: Box<dyn HeadingSensor>,
    pub color: Box<dyn ColorSensor>,
    pub range: Box<dyn RangeSensor>,
    pub claw: Box<dyn ClawActuator>,
    pub launcher: Box<dyn LauncherActuator>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimArena;
    use tilerover_types::GridBounds;

    #[test]
    fn sim_arena_builds_a_complete_chassis() {
        let arena = SimArena::new(GridBounds::default(), 300);
        let mut chassis = arena.chassis();
        chassis.motion.turn(90).expect("sim turn must succeed");
        chassis
            .motion
            .drive_straight(300)
            .expect("sim drive must succeed");
        // Sensors respond without any physical hardware attached.
        let _ = chassis.gyro.current_angle();
        let _ = chassis.color.sample();
        let _ = chassis.range.sample();
    }
}
