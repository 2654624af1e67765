//! Progression snapshot: the complete visible scheduler state after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::ProgressionEvent;
use crate::types::{SimTime, StreamId};

/// Scheduler state broadcast to listeners after each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub mode: SchedulerMode,
    /// Current level index (infinite mode) or 1 (finite mode).
    pub level: i32,
    /// Enemies spawned so far in this session, after upgrades.
    pub enemies_spawned: u64,
    /// Waves instantiated by this session that still have members.
    pub live_waves: u32,
    /// Active streams in list order. Empty in finite mode.
    pub streams: Vec<StreamView>,
    /// Finite mode: index of the next mission entry.
    pub mission_cursor: Option<usize>,
    pub events: Vec<ProgressionEvent>,
}

/// A stream as seen from outside the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamView {
    pub id: StreamId,
    pub name: String,
    pub remaining_uses: i32,
    pub unbounded: bool,
    /// Number of levels this stream has produced waves on.
    pub spawn_count: u32,
}
