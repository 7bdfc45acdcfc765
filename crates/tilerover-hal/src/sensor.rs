//! Sensor traits: gyro heading, downward color, forward range.
//!
//! Sensor reads are instantaneous (no blocking motion involved) and
//! infallible at this boundary: a flaky physical sensor surfaces as an
//! out-of-range or sentinel *value*, which the engine treats as "no
//! detection" rather than as an error.

use tilerover_types::TileColor;

/// Gyroscopic heading sensor.
///
/// The reading is an **unbounded accumulator** of rotation since the last
/// [`HeadingSensor::reset_zero`]: it grows past ±360° with continued turning
/// and is never wrapped by the driver.  Wrapping and residual math belong to
/// the angular-control layer.
pub trait HeadingSensor: Send + Sync {
    /// Accumulated rotation in signed degrees since the last reset.
    fn current_angle(&mut self) -> i32;

    /// Zero the accumulator at the current physical facing.
    fn reset_zero(&mut self);
}

/// Downward-facing color sensor, pre-classified to the arena's marking
/// alphabet.
pub trait ColorSensor: Send + Sync {
    /// Classify the tile marking currently under the sensor.
    fn sample(&mut self) -> TileColor;
}

/// Forward-facing range sensor.
pub trait RangeSensor: Send + Sync {
    /// Distance to the nearest obstruction along the current facing, in
    /// arena units.  Non-positive or beyond-maximum values are sentinel
    /// "no echo" readings.
    fn sample(&mut self) -> i32;
}
