//! Per-level evaluation plan.
//!
//! Built once when a level's streams are evaluated. The stream at the
//! highest list index that goes ahead is the level's "last" stream; it skips
//! the delay after its final wave.

use barrage_core::enums::StreamState;

use crate::stream::StreamSlot;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelPlan {
    level: i32,
    states: Vec<Option<StreamState>>,
    last_go_ahead: Option<usize>,
}

impl LevelPlan {
    /// Evaluate every active slot against `level`. Tombstones get `None`.
    pub fn build(level: i32, slots: &[StreamSlot]) -> Self {
        let states: Vec<Option<StreamState>> = slots
            .iter()
            .map(|slot| slot.active().map(|stream| stream.evaluate(level)))
            .collect();
        let last_go_ahead = states
            .iter()
            .rposition(|state| *state == Some(StreamState::GoAhead));
        Self {
            level,
            states,
            last_go_ahead,
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// State recorded for the slot at `index`.
    pub fn state(&self, index: usize) -> Option<StreamState> {
        self.states.get(index).copied().flatten()
    }

    pub fn is_last_active_stream(&self, index: usize) -> bool {
        self.last_go_ahead == Some(index)
    }

    pub fn go_ahead_count(&self) -> usize {
        self.states
            .iter()
            .filter(|state| **state == Some(StreamState::GoAhead))
            .count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
