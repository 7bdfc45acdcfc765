//! Effector traits: the pickup claw and the single-shot launcher.

use tilerover_types::RoverError;

/// The pickup claw.  Both operations block until the claw motor has
/// completed its travel.
pub trait ClawActuator: Send + Sync {
    /// Open the claw (release / prepare to grab).
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] if the claw motor stalls.
    fn open(&mut self) -> Result<(), RoverError>;

    /// Close the claw, grabbing whatever sits under it.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] if the claw motor stalls.
    fn close(&mut self) -> Result<(), RoverError>;
}

/// The projectile launcher.  One shot per loaded round of ammunition.
pub trait LauncherActuator: Send + Sync {
    /// Fire the loaded projectile along the current facing.  Blocks until
    /// the launch mechanism has cycled.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] if the mechanism jams.
    fn fire(&mut self) -> Result<(), RoverError>;
}
