//! [`RoundEngine`] – the per-round decision state machine.
//!
//! Each round runs up to the current step budget.  At every step the engine
//! records its cell in the trail, maybe runs a recognition sweep, always
//! runs a threat sweep, and then acts on the result:
//!
//! * **Critical** – recognition is forced; with ammunition aboard the robot
//!   aims at the queued hazard and fires, ending the round early, otherwise
//!   it performs a stun maneuver and carries on.
//! * **Caution** on the final step with ammunition and no recognition yet –
//!   the robot moves once more and re-senses; a now-critical reading
//!   escalates to recognition and engagement.
//! * Otherwise – chase the highest-priority queued objective axis by axis
//!   (x before y), or wander to a random legal neighbor that is not in the
//!   recent trail.
//!
//! After the step budget (or an early engagement) the engine runs one more
//! recognition sweep to catch same-cell discoveries, handles the tile under
//! the robot (pickups, underfoot hazards), deposits at the beacon, and
//! evaluates the win condition.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tilerover_hal::chassis::Chassis;
use tilerover_types::{
    Heading, Objective, ObjectiveKind, Position, RoverError, ThreatLevel, TileColor,
};
use tracing::{debug, info};

use crate::alarm::AlarmFlag;
use crate::angular::{heading_toward, rotate_to, settle};
use crate::config::EngineConfig;
use crate::recognition::recognize_surroundings;
use crate::state::AgentState;
use crate::threat::assess_threat;

/// Result of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The mission continues into the next round.
    Continue,
    /// The final item was delivered at the beacon.
    Won,
}

/// Result of a full run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Won { rounds: u32 },
    /// No legal move and no pending objective: terminal but clean.
    Stuck { rounds: u32, position: Position },
    /// The round limit elapsed without a win.
    Exhausted { rounds: u32 },
}

/// The decision engine.  Owns all mutable state, the hardware bundle, the
/// seedable RNG, and the alarm flag.
pub struct RoundEngine {
    cfg: EngineConfig,
    state: AgentState,
    chassis: Chassis,
    rng: ChaCha8Rng,
    alarm: AlarmFlag,
}

impl RoundEngine {
    /// Build an engine at the arena's minimum corner, facing east.
    ///
    /// Pass a `seed` for deterministic move tie-breaking; `None` seeds from
    /// OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::Config`] when the configuration is invalid.
    pub fn new(cfg: EngineConfig, chassis: Chassis, seed: Option<u64>) -> Result<Self, RoverError> {
        cfg.validate()?;
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let start = Position::new(cfg.bounds.min, cfg.bounds.min);
        let state = AgentState::new(start, Heading::East, cfg.trail_capacity);
        Ok(Self {
            cfg,
            state,
            chassis,
            rng,
            alarm: AlarmFlag::new(),
        })
    }

    /// Read-only view of the decision state.
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// A clone of the alarm flag for the alarm task.
    pub fn alarm_flag(&self) -> AlarmFlag {
        self.alarm.clone()
    }

    /// Run rounds until a win, a stuck halt, or `max_rounds` elapse.
    ///
    /// # Errors
    ///
    /// Propagates hardware faults.  A stuck robot is an outcome, not an
    /// error.
    pub fn run(&mut self, max_rounds: u32) -> Result<RunOutcome, RoverError> {
        for round in 1..=max_rounds {
            debug!(round, position = ?self.state.position, "round start");
            match self.run_round() {
                Ok(RoundOutcome::Continue) => {}
                Ok(RoundOutcome::Won) => return Ok(RunOutcome::Won { rounds: round }),
                Err(RoverError::Stuck { x, y }) => {
                    info!(x, y, "no legal move and no pending objective; halting");
                    return Ok(RunOutcome::Stuck {
                        rounds: round,
                        position: Position::new(x, y),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(RunOutcome::Exhausted { rounds: max_rounds })
    }

    /// Execute one full round.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::Stuck`] when no move can be resolved, and
    /// propagates hardware faults.
    pub fn run_round(&mut self) -> Result<RoundOutcome, RoverError> {
        self.state.recognized_this_round = false;
        let budget = self
            .state
            .inventory
            .step_budget(self.cfg.base_step_budget, self.cfg.loaded_step_budget);

        let mut step: u8 = 0;
        'steps: while step < budget {
            self.state.trail.record(self.state.position);

            if !self.state.recognized_this_round
                && self.rng.gen_bool(self.cfg.recognition_probability)
            {
                self.recognize()?;
            }

            let danger = assess_threat(&mut self.chassis, self.state.heading, &self.cfg)?;
            debug!(?danger, step, "threat assessed");

            match danger {
                ThreatLevel::Critical => {
                    if !self.state.recognized_this_round {
                        self.recognize()?;
                    }
                    if self.state.inventory.carrying_ammo
                        && self.state.goals.has_pending(ObjectiveKind::Hazard)
                    {
                        self.engage_first_hazard()?;
                        break 'steps;
                    }
                    // No shot available: shake the attacker off and carry on.
                    self.stun_maneuver()?;
                }
                ThreatLevel::Caution
                    if self.state.inventory.carrying_ammo
                        && !self.state.recognized_this_round
                        && step + 1 == budget =>
                {
                    // Final step under caution: close in, then look again.
                    self.take_step()?;
                    let again = assess_threat(&mut self.chassis, self.state.heading, &self.cfg)?;
                    if again == ThreatLevel::Critical {
                        self.recognize()?;
                        if self.state.inventory.carrying_ammo
                            && self.state.goals.has_pending(ObjectiveKind::Hazard)
                        {
                            self.engage_first_hazard()?;
                        }
                        break 'steps;
                    }
                }
                _ => {
                    self.take_step()?;
                }
            }
            step += 1;
        }

        // One more sweep so markings that appeared on the current cell's
        // neighbors this round are not lost between rounds.
        self.recognize()?;
        self.handle_current_tile()?;
        self.deposit_if_at_beacon()?;
        self.state.recognized_this_round = false;

        if self.state.inventory.items_delivered >= self.cfg.deliveries_to_win {
            info!(
                delivered = self.state.inventory.items_delivered,
                "mission complete"
            );
            return Ok(RoundOutcome::Won);
        }
        Ok(RoundOutcome::Continue)
    }

    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------

    /// Resolve and apply one move.  A first goal sitting on the current cell
    /// is consumed in place ("no move" for this step).
    fn take_step(&mut self) -> Result<(), RoverError> {
        match self.pick_heading()? {
            Some(heading) => self.apply_move(heading),
            None => {
                // Already on the goal cell: consume it where we stand.
                self.handle_current_tile()
            }
        }
    }

    /// The heading for this step: goal chase when anything is queued,
    /// otherwise a trail-filtered random wander.
    fn pick_heading(&mut self) -> Result<Option<Heading>, RoverError> {
        if let Some(goal) = self.state.goals.first_goal() {
            Ok(self.chase_heading(goal.position()))
        } else {
            self.pick_wander_heading().map(Some)
        }
    }

    /// Axis-by-axis chase: close the x gap before the y gap.
    fn chase_heading(&self, target: Position) -> Option<Heading> {
        let here = self.state.position;
        if target.x > here.x {
            Some(Heading::East)
        } else if target.x < here.x {
            Some(Heading::West)
        } else if target.y > here.y {
            Some(Heading::South)
        } else if target.y < here.y {
            Some(Heading::North)
        } else {
            None
        }
    }

    /// Uniform random pick among legal cardinal moves, excluding cells in
    /// the recent trail.  When the exclusion would eliminate every legal
    /// move it is dropped: backtracking beats deadlock.
    fn pick_wander_heading(&mut self) -> Result<Heading, RoverError> {
        let legal: Vec<Heading> = Heading::CARDINAL
            .iter()
            .copied()
            .filter(|&h| self.state.position.neighbor(h, self.cfg.bounds).is_some())
            .collect();
        let fresh: Vec<Heading> = legal
            .iter()
            .copied()
            .filter(|&h| {
                self.state
                    .position
                    .neighbor(h, self.cfg.bounds)
                    .is_some_and(|n| !self.state.trail.contains(n))
            })
            .collect();
        let pool = if fresh.is_empty() { &legal } else { &fresh };
        if pool.is_empty() {
            return Err(RoverError::Stuck {
                x: self.state.position.x,
                y: self.state.position.y,
            });
        }
        Ok(pool[self.rng.gen_range(0..pool.len())])
    }

    /// Rotate, drive one tile, correct, and commit the new pose; then deal
    /// with whatever the robot is now standing on.
    fn apply_move(&mut self, target: Heading) -> Result<(), RoverError> {
        self.state.heading = rotate_to(
            self.chassis.motion.as_mut(),
            self.chassis.gyro.as_mut(),
            self.state.heading,
            target,
            self.cfg.quantum.degrees(),
            self.cfg.max_correction_iters,
        )?;
        self.chassis.motion.drive_straight(self.cfg.tile_units)?;
        settle(
            self.chassis.motion.as_mut(),
            self.chassis.gyro.as_mut(),
            self.cfg.quantum.degrees(),
            self.cfg.max_correction_iters,
        )?;
        self.state.position = self.state.position.step(target, self.cfg.bounds);
        debug!(position = ?self.state.position, heading = ?self.state.heading, "moved");
        self.handle_current_tile()
    }

    // -------------------------------------------------------------------------
    // Tile events
    // -------------------------------------------------------------------------

    /// Consume objectives at the current cell and react to the marking under
    /// the robot: load ammunition, secure an item (raising the alarm and
    /// queueing the escape beacon), or shake off an underfoot hazard.
    fn handle_current_tile(&mut self) -> Result<(), RoverError> {
        let achieved = self.state.goals.achieve(self.state.position);
        if !achieved.is_empty() {
            debug!(count = achieved.len(), position = ?self.state.position, "objectives achieved");
        }

        match self.chassis.color.sample() {
            TileColor::Resource if !self.state.inventory.carrying_ammo => {
                self.chassis.claw.open()?;
                self.chassis.claw.close()?;
                self.state.inventory.load_ammo();
                info!(position = ?self.state.position, "ammunition loaded");
            }
            TileColor::Item if !self.state.inventory.carrying_item => {
                self.chassis.claw.open()?;
                self.chassis.claw.close()?;
                self.state.inventory.take_item();
                self.state.goals.add(Objective::new(
                    ObjectiveKind::EscapeBeacon,
                    self.cfg.delivery_cell,
                    self.cfg.bounds,
                )?);
                self.alarm.raise();
                info!(position = ?self.state.position, "item secured; alarm raised");
            }
            TileColor::Hazard => {
                self.stun_maneuver()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Release the item at the beacon cell, clear the alarm, and count the
    /// delivery.
    fn deposit_if_at_beacon(&mut self) -> Result<(), RoverError> {
        if self.state.position == self.cfg.delivery_cell && self.state.inventory.carrying_item {
            self.chassis.claw.open()?;
            self.state.inventory.deliver_item();
            self.alarm.clear();
            self.state.goals.achieve(self.cfg.delivery_cell);
            info!(
                delivered = self.state.inventory.items_delivered,
                "item deposited at beacon"
            );
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Hazard responses
    // -------------------------------------------------------------------------

    /// Turn to face the first queued hazard and fire; the spent ammunition
    /// drops the step budget back on the next round.
    fn engage_first_hazard(&mut self) -> Result<(), RoverError> {
        let Some(hazard) = self.state.goals.first_of(ObjectiveKind::Hazard) else {
            return Ok(());
        };
        if let Some(target) =
            heading_toward(self.state.position, hazard.position(), self.cfg.quantum)
        {
            self.state.heading = rotate_to(
                self.chassis.motion.as_mut(),
                self.chassis.gyro.as_mut(),
                self.state.heading,
                target,
                self.cfg.quantum.degrees(),
                self.cfg.max_correction_iters,
            )?;
        }
        self.chassis.launcher.fire()?;
        self.state.inventory.expend_ammo();
        self.state.goals.achieve(hazard.position());
        info!(target = ?hazard.position(), "hazard engaged; ammunition expended");
        Ok(())
    }

    /// Back off, lunge, and retreat to the starting spot.  Used when a
    /// hazard is on top of the robot or no shot is available.
    fn stun_maneuver(&mut self) -> Result<(), RoverError> {
        let d = self.cfg.stun_units;
        self.chassis.motion.drive_straight(-d)?;
        self.chassis.motion.drive_straight(2 * d)?;
        self.chassis.motion.drive_straight(-d)?;
        settle(
            self.chassis.motion.as_mut(),
            self.chassis.gyro.as_mut(),
            self.cfg.quantum.degrees(),
            self.cfg.max_correction_iters,
        )?;
        debug!(position = ?self.state.position, "stun maneuver executed");
        Ok(())
    }

    fn recognize(&mut self) -> Result<(), RoverError> {
        recognize_surroundings(&mut self.state, &mut self.chassis, &self.cfg)
    }
}
