//! # Review and Trial Queues
//!
//! The review queue is a dense array: live entries always occupy
//! `[0, pending_review_count)`. Removing the entry at position `p` shifts
//! every later entry down by one, clears the vacated last slot, and
//! reports each shifted disclosure with its new index so the owning case
//! record can be updated. A case whose recorded position disagrees with
//! its slot would corrupt the next removal, so the engine applies every
//! reported move before returning.
//!
//! The trial queue is an append-only record of cases accepted for trial.

use serde::{Deserialize, Serialize};

use dax_core::{ActorId, Amount};

/// Counters and policy shared by the queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueInfo {
    /// Live entries in the review queue.
    pub pending_review_count: usize,
    /// Cases accepted for trial without a verdict yet.
    pub awaiting_trial_count: usize,
    pub base_submission_fee: Amount,
    /// Next review slot to assign.
    pub next_position: usize,
}

impl QueueInfo {
    pub fn new(base_submission_fee: Amount) -> Self {
        Self {
            pending_review_count: 0,
            awaiting_trial_count: 0,
            base_submission_fee,
            next_position: 0,
        }
    }
}

/// A disclosure that moved to a new review slot during reorganization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotMove {
    pub(crate) disclosure: ActorId,
    pub(crate) new_position: usize,
}

/// The dense, position-indexed review queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQueue {
    slots: Vec<ActorId>,
}

impl ReviewQueue {
    /// Append `disclosure` to the first free slot and return its index.
    pub(crate) fn push(&mut self, disclosure: ActorId) -> usize {
        self.slots.push(disclosure);
        self.slots.len() - 1
    }

    /// Remove the entry at `position` and close the gap.
    ///
    /// Returns the moves applied, in index order, or `None` if `position`
    /// is not occupied.
    pub(crate) fn remove_at(&mut self, position: usize) -> Option<Vec<SlotMove>> {
        let len = self.slots.len();
        if position >= len {
            return None;
        }
        let mut moves = Vec::with_capacity(len - position - 1);
        for i in position..len - 1 {
            let shifted = self.slots[i + 1];
            self.slots[i] = shifted;
            moves.push(SlotMove {
                disclosure: shifted,
                new_position: i,
            });
        }
        self.slots.pop();
        Some(moves)
    }

    pub(crate) fn get(&self, position: usize) -> Option<&ActorId> {
        self.slots.get(position)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn as_slice(&self) -> &[ActorId] {
        &self.slots
    }
}
