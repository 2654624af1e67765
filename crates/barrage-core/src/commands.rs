//! Inputs to a progression session.
//!
//! Commands and signals are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::WaveId;

/// Session control from the surrounding game loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    /// Begin scheduling from the first level (or the first mission wave).
    StartSession,
    /// Freeze scheduling; pending waits hold their remaining time.
    Pause,
    /// Continue after a pause.
    Resume,
    /// Tear the session down. Pending waits are abandoned.
    EndSession,
}

/// Lifecycle notifications from the externally owned world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorldSignal {
    /// The last member agent of a wave is gone.
    WaveDestroyed { wave: WaveId },
    /// The enemy agent population transitioned to zero.
    AgentsCleared,
}
