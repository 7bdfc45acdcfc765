//! `MotionActuator` trait for the wheeled drive base.
//!
//! Drivers implement this trait against the real motor controller; the
//! engine only ever talks to the trait.  Both operations block until the
//! physical motion has completed; there is no overlap of actuation and
//! sensing anywhere in the stack.

use tilerover_types::RoverError;

/// The differential drive base, abstracted to the two motions the engine
/// needs: rotate in place and drive straight.
pub trait MotionActuator: Send + Sync {
    /// Rotate in place by `delta_deg` signed degrees (positive =
    /// counter-clockwise, matching the gyro convention).  Blocks until the
    /// rotation completes.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] if the drive base cannot execute
    /// the rotation.
    fn turn(&mut self, delta_deg: i32) -> Result<(), RoverError>;

    /// Drive straight for `distance_units` arena units along the current
    /// facing; negative values reverse.  Blocks until the motion completes.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] if the drive base cannot execute
    /// the motion.
    fn drive_straight(&mut self, distance_units: i32) -> Result<(), RoverError>;
}
