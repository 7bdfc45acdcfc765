//! Operator-facing signals: the start button and the audible alarm.
//!
//! Neither device is touched by the decision engine itself.  The program
//! shell polls [`StartSignal`] to gate each outer iteration, and the alarm
//! task mirrors the engine's alarm flag into [`AlarmOutput`].

use tilerover_types::RoverError;

/// The physical start button.
pub trait StartSignal: Send + Sync {
    /// `true` while the button is held down.
    fn pressed(&mut self) -> bool;
}

/// The audible alarm output.
pub trait AlarmOutput: Send + Sync {
    /// Switch the alert sound on or off.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] if the sound device rejects the
    /// command.
    fn set_active(&mut self, active: bool) -> Result<(), RoverError>;
}
