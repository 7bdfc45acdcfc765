//! [`GoalQueue`] – priority-bucketed pending objectives.
//!
//! One bucket per [`ObjectiveKind`], scanned in fixed priority order:
//! hazards before resources before the escape beacon before items.  Within a
//! bucket the most recently discovered objective sits first.  The queue
//! never holds an out-of-bounds target because [`Objective`] construction
//! already rejects those.

use tilerover_types::{Objective, ObjectiveKind, Position};

/// Bucket scan order; index = priority (0 is chased first).
const PRIORITY: [ObjectiveKind; 4] = [
    ObjectiveKind::Hazard,
    ObjectiveKind::Resource,
    ObjectiveKind::EscapeBeacon,
    ObjectiveKind::Item,
];

fn bucket_index(kind: ObjectiveKind) -> usize {
    match kind {
        ObjectiveKind::Hazard => 0,
        ObjectiveKind::Resource => 1,
        ObjectiveKind::EscapeBeacon => 2,
        ObjectiveKind::Item => 3,
    }
}

/// Pending objectives, bucketed by kind.
#[derive(Debug, Clone, Default)]
pub struct GoalQueue {
    buckets: [Vec<Objective>; 4],
}

impl GoalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front of the objective's bucket; exact duplicates
    /// (same kind and position) are skipped.
    pub fn add(&mut self, objective: Objective) {
        let bucket = &mut self.buckets[bucket_index(objective.kind())];
        if bucket.contains(&objective) {
            return;
        }
        bucket.insert(0, objective);
    }

    /// The first objective of the first non-empty bucket, if any.
    pub fn first_goal(&self) -> Option<Objective> {
        PRIORITY
            .iter()
            .find_map(|kind| self.buckets[bucket_index(*kind)].first().copied())
    }

    /// The first pending objective of a specific kind.
    pub fn first_of(&self, kind: ObjectiveKind) -> Option<Objective> {
        self.buckets[bucket_index(kind)].first().copied()
    }

    /// Remove every objective (across all buckets) targeting `position` and
    /// return them.  There should be at most one, but duplicates are
    /// tolerated.  Idempotent: a second call with no new insertions removes
    /// nothing.
    pub fn achieve(&mut self, position: Position) -> Vec<Objective> {
        let mut removed = Vec::new();
        for bucket in &mut self.buckets {
            bucket.retain(|obj| {
                if obj.position() == position {
                    removed.push(*obj);
                    false
                } else {
                    true
                }
            });
        }
        removed
    }

    /// `true` when at least one objective of `kind` is pending.
    pub fn has_pending(&self, kind: ObjectiveKind) -> bool {
        !self.buckets[bucket_index(kind)].is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Total pending objectives across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
