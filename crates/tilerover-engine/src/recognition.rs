//! Tile recognition – the adjacent-tile color scan.
//!
//! The robot cannot see a neighboring tile from its own cell: it turns
//! toward the tile, rolls forward just far enough for the downward color
//! sensor to cross the boundary, samples, and rolls back.  Candidates are
//! visited in order of angular proximity to the current facing so the
//! physical sweep turns as little as possible.  Discoveries are queued only
//! after the whole sweep completes.

use tilerover_hal::chassis::Chassis;
use tilerover_types::{Heading, Objective, ObjectiveKind, Position, RoverError};
use tracing::debug;

use crate::angular::{minimal_turn, rotate_to, settle};
use crate::config::EngineConfig;
use crate::state::AgentState;

/// Scan every reachable adjacent tile and queue discovered objectives.
///
/// Reachable means the cardinal neighbor exists inside the arena: all four
/// in the interior, fewer at edges and corners.  Sets
/// `recognized_this_round` on completion; the scan is idempotent within a
/// round (a second invocation re-reads the same tiles and the duplicate
/// skip in the queue absorbs the repeats).
///
/// # Errors
///
/// Propagates drive-base faults.  A degraded heading correction is
/// tolerated (the sweep continues with the residual offset).
pub fn recognize_surroundings(
    state: &mut AgentState,
    chassis: &mut Chassis,
    cfg: &EngineConfig,
) -> Result<(), RoverError> {
    let quantum = cfg.quantum.degrees();
    let iters = cfg.max_correction_iters;

    // Angular proximity first, enumeration order on ties.
    let mut candidates: Vec<(Heading, Position)> = Heading::CARDINAL
        .iter()
        .filter_map(|&h| state.position.neighbor(h, cfg.bounds).map(|n| (h, n)))
        .collect();
    candidates.sort_by_key(|(h, _)| {
        (
            minimal_turn(state.heading.degrees(), h.degrees()).abs(),
            h.degrees(),
        )
    });

    let mut discovered: Vec<(ObjectiveKind, Position)> = Vec::new();
    for (facing, neighbor) in candidates {
        state.heading = rotate_to(
            chassis.motion.as_mut(),
            chassis.gyro.as_mut(),
            state.heading,
            facing,
            quantum,
            iters,
        )?;
        chassis.motion.drive_straight(cfg.probe_units)?;
        let color = chassis.color.sample();
        if let Some(kind) = color.discovered_objective() {
            debug!(?kind, cell = ?neighbor, "recognized marking");
            discovered.push((kind, neighbor));
        }
        chassis.motion.drive_straight(-cfg.probe_units)?;
        settle(chassis.motion.as_mut(), chassis.gyro.as_mut(), quantum, iters)?;
    }

    // Queue after the full sweep; bucket priority ordering is the queue's.
    for (kind, position) in discovered {
        state.goals.add(Objective::new(kind, position, cfg.bounds)?);
    }
    state.recognized_this_round = true;
    Ok(())
}
