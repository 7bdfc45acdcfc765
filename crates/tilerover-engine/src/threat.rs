//! Threat assessment – the rotating range sweep.
//!
//! The robot turns one angular quantum at a time, sampling the range sensor
//! at each stop.  Echoes in the near band are critical when the facing is
//! cardinal but only cautionary on diagonals (diagonal proximity is less
//! certain); echoes in the far band are cautionary.  The overall danger is
//! the maximum severity seen across the sweep, and because the stops sum to
//! a full rotation the robot ends up back on its original facing.

use tilerover_hal::chassis::Chassis;
use tilerover_types::{Heading, RoverError, ThreatLevel};
use tracing::debug;

use crate::angular::settle;
use crate::config::EngineConfig;

/// Classify one range sample taken while facing `facing`.
///
/// Non-positive readings and readings beyond the sensor maximum are
/// sentinels: no detection, never an error.
pub(crate) fn classify_sample(sample: i32, facing: Heading, cfg: &EngineConfig) -> ThreatLevel {
    if sample <= 0 || sample > cfg.range_max_units {
        return ThreatLevel::Clear;
    }
    if sample <= cfg.near_band_units {
        if facing.is_cardinal() {
            ThreatLevel::Critical
        } else {
            ThreatLevel::Caution
        }
    } else if sample <= cfg.far_band_units {
        ThreatLevel::Caution
    } else {
        ThreatLevel::Clear
    }
}

/// Run one closed sweep and return the overall danger level.
///
/// `heading` is the robot's facing when the sweep starts; the sweep's
/// quantum turns sum to 360°, so the facing is unchanged when it returns.
/// The heading is corrected after every stop, keeping the pose consistent
/// for the sample taken there.
///
/// # Errors
///
/// Propagates drive-base faults; degraded corrections are tolerated.
pub fn assess_threat(
    chassis: &mut Chassis,
    heading: Heading,
    cfg: &EngineConfig,
) -> Result<ThreatLevel, RoverError> {
    let quantum = cfg.quantum.degrees();
    let iters = cfg.max_correction_iters;
    let mut level = ThreatLevel::Clear;
    let mut facing_deg = heading.degrees();

    for _ in 0..cfg.quantum.stop_count() {
        chassis.motion.turn(quantum)?;
        settle(chassis.motion.as_mut(), chassis.gyro.as_mut(), quantum, iters)?;
        facing_deg = (facing_deg + quantum).rem_euclid(360);
        let facing = Heading::from_degrees(facing_deg).unwrap_or(heading);
        let sample = chassis.range.sample();
        level = level.max(classify_sample(sample, facing, cfg));
    }

    debug!(?level, "threat sweep complete");
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilerover_hal::sim::SimArena;
    use tilerover_types::{GridBounds, Position, TileColor};

    use crate::config::HeadingQuantum;

    #[test]
    fn near_band_on_a_cardinal_facing_is_critical() {
        let cfg = EngineConfig::default();
        assert_eq!(
            classify_sample(300, Heading::East, &cfg),
            ThreatLevel::Critical
        );
    }

    #[test]
    fn near_band_on_a_diagonal_facing_is_only_caution() {
        let cfg = EngineConfig::default();
        assert_eq!(
            classify_sample(300, Heading::NorthEast, &cfg),
            ThreatLevel::Caution
        );
    }

    #[test]
    fn far_band_is_caution_and_beyond_is_clear() {
        let cfg = EngineConfig::default();
        assert_eq!(classify_sample(600, Heading::East, &cfg), ThreatLevel::Caution);
        assert_eq!(classify_sample(900, Heading::East, &cfg), ThreatLevel::Clear);
    }

    #[test]
    fn sentinel_samples_are_no_detection() {
        let cfg = EngineConfig::default();
        assert_eq!(classify_sample(0, Heading::East, &cfg), ThreatLevel::Clear);
        assert_eq!(classify_sample(-1, Heading::East, &cfg), ThreatLevel::Clear);
        assert_eq!(
            classify_sample(cfg.range_max_units + 1, Heading::East, &cfg),
            ThreatLevel::Clear
        );
    }

    #[test]
    fn adjacent_hazard_raises_critical_and_the_sweep_closes() {
        let arena = SimArena::new(GridBounds::default(), 300)
            .with_robot_at(2, 3, Heading::East)
            .with_color(3, 3, TileColor::Hazard);
        let mut chassis = arena.chassis();
        let cfg = EngineConfig::default();

        let level = assess_threat(&mut chassis, Heading::East, &cfg).unwrap();
        assert_eq!(level, ThreatLevel::Critical);
        // Closed rotation: same facing, same cell.
        assert_eq!(arena.true_heading_deg(), Heading::East.degrees());
        assert_eq!(arena.robot_tile(), Position::new(2, 3));
    }

    #[test]
    fn hazard_two_cells_out_is_caution() {
        let arena = SimArena::new(GridBounds::default(), 300)
            .with_robot_at(1, 3, Heading::East)
            .with_color(3, 3, TileColor::Hazard);
        let mut chassis = arena.chassis();

        let level = assess_threat(&mut chassis, Heading::East, &EngineConfig::default()).unwrap();
        assert_eq!(level, ThreatLevel::Caution);
    }

    #[test]
    fn clear_arena_sweeps_clear() {
        let arena = SimArena::new(GridBounds::default(), 300).with_robot_at(3, 3, Heading::North);
        let mut chassis = arena.chassis();

        let level = assess_threat(&mut chassis, Heading::North, &EngineConfig::default()).unwrap();
        assert_eq!(level, ThreatLevel::Clear);
    }

    #[test]
    fn eighth_sweep_sees_a_diagonal_hazard_as_caution() {
        let cfg = EngineConfig {
            quantum: HeadingQuantum::Eighth,
            ..EngineConfig::default()
        };
        let arena = SimArena::new(GridBounds::default(), 300)
            .with_robot_at(3, 3, Heading::East)
            .with_color(4, 2, TileColor::Hazard);
        let mut chassis = arena.chassis();

        let level = assess_threat(&mut chassis, Heading::East, &cfg).unwrap();
        assert_eq!(level, ThreatLevel::Caution);
        assert_eq!(arena.true_heading_deg(), Heading::East.degrees());
    }

    #[test]
    fn quarter_sweep_cannot_see_a_purely_diagonal_hazard() {
        let arena = SimArena::new(GridBounds::default(), 300)
            .with_robot_at(3, 3, Heading::East)
            .with_color(4, 2, TileColor::Hazard);
        let mut chassis = arena.chassis();

        let level = assess_threat(&mut chassis, Heading::East, &EngineConfig::default()).unwrap();
        assert_eq!(level, ThreatLevel::Clear);
    }
}
