//! [`AgentState`] – the single aggregate of mutable decision state.
//!
//! Position, facing, goals, inventory, trail, and the per-round flag all
//! live here and are owned exclusively by the round loop.  Components take
//! `&mut AgentState` instead of closing over shared globals, so every
//! mutation has an owner and a call path.

use tilerover_types::{Heading, Inventory, Position};

use crate::goals::GoalQueue;
use crate::trail::RecentTrail;

/// Everything the decision engine mutates while running.
#[derive(Debug)]
pub struct AgentState {
    /// Current cell.  Updated only by a committed move.
    pub position: Position,
    /// Current facing.  Updated only after a completed rotation.
    pub heading: Heading,
    pub goals: GoalQueue,
    pub inventory: Inventory,
    pub trail: RecentTrail,
    /// Set by a completed recognition sweep; reset at round boundaries.
    pub recognized_this_round: bool,
}

impl AgentState {
    /// Fresh state at `position` facing `heading`, with an empty queue and
    /// inventory.
    pub fn new(position: Position, heading: Heading, trail_capacity: usize) -> Self {
        Self {
            position,
            heading,
            goals: GoalQueue::new(),
            inventory: Inventory::default(),
            trail: RecentTrail::new(trail_capacity),
            recognized_this_round: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_empty_handed() {
        let state = AgentState::new(Position::new(1, 1), Heading::East, 3);
        assert_eq!(state.position, Position::new(1, 1));
        assert_eq!(state.heading, Heading::East);
        assert!(state.goals.is_empty());
        assert!(!state.inventory.carrying_ammo);
        assert!(!state.inventory.carrying_item);
        assert_eq!(state.inventory.items_delivered, 0);
        assert!(state.trail.is_empty());
        assert!(!state.recognized_this_round);
    }
}
