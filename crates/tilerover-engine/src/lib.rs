//! `tilerover-engine` – the autonomous decision engine.
//!
//! One round at a time, the engine decides whether to move, scan adjacent
//! tiles, evaluate threats, collect or deposit cargo, or engage a hazard,
//! while tracking facing, position, goal priorities, and inventory.  All
//! hardware access goes through the `tilerover-hal` capability traits; the
//! engine owns no I/O of its own.
//!
//! # Modules
//!
//! - [`config`] – [`EngineConfig`][config::EngineConfig]: every arena and
//!   behavior tunable, TOML-friendly with serde defaults.
//! - [`angular`] – minimal-turn arithmetic and bounded closed-loop heading
//!   correction against the gyro.
//! - [`goals`] – [`GoalQueue`][goals::GoalQueue]: priority-bucketed pending
//!   objectives (hazards before resources before the beacon before items).
//! - [`trail`] – [`RecentTrail`][trail::RecentTrail]: a short ring of
//!   visited cells that vetoes immediate backtracking while wandering.
//! - [`state`] – [`AgentState`][state::AgentState]: the single aggregate of
//!   all mutable decision state, owned by the round loop.
//! - [`recognition`] – the adjacent-tile color scan that discovers new
//!   objectives.
//! - [`threat`] – the rotating range sweep that classifies overall danger.
//! - [`round`] – [`RoundEngine`][round::RoundEngine]: the per-round decision
//!   state machine and outer run loop.
//! - [`alarm`] – [`AlarmFlag`][alarm::AlarmFlag] and the audible-alert task,
//!   the stack's only concurrent activity.

pub mod alarm;
pub mod angular;
pub mod config;
pub mod goals;
pub mod recognition;
pub mod round;
pub mod state;
pub mod threat;
pub mod trail;

pub use alarm::{AlarmFlag, run_alarm_task};
pub use config::{EngineConfig, HeadingQuantum};
pub use goals::GoalQueue;
pub use round::{RoundEngine, RoundOutcome, RunOutcome};
pub use state::AgentState;
pub use trail::RecentTrail;
