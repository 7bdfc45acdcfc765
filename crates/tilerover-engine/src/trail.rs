//! [`RecentTrail`] – a short memory of visited cells.
//!
//! While no objective is queued the robot wanders randomly; excluding the
//! last few visited cells from the candidate pool keeps it from oscillating
//! between two tiles.  The ring is deliberately tiny (3–4 cells) so the
//! veto expires quickly.

use std::collections::VecDeque;

use tilerover_types::Position;

/// Bounded ring of the most recently visited positions, newest first.
#[derive(Debug, Clone)]
pub struct RecentTrail {
    ring: VecDeque<Position>,
    capacity: usize,
}

impl RecentTrail {
    /// Create a trail remembering up to `capacity` cells (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Record a visit.  Re-recording the newest cell is a no-op; the oldest
    /// entry falls off once the ring is full.
    pub fn record(&mut self, position: Position) {
        if self.ring.front() == Some(&position) {
            return;
        }
        self.ring.push_front(position);
        self.ring.truncate(self.capacity);
    }

    /// `true` if `position` is still remembered.
    pub fn contains(&self, position: Position) -> bool {
        self.ring.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
