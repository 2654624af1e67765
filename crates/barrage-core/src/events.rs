//! Events raised by the schedulers for UI, audio and scoring listeners.

use serde::{Deserialize, Serialize};

use crate::types::{StreamId, WaveId};

/// Progression events, collected per tick into the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressionEvent {
    /// A new level began. Stream evaluation follows after the inter-level delay.
    LevelStarted { level: i32 },
    /// A stream evaluated `GoAhead` and is about to produce its waves.
    StreamStarted { level: i32, stream: StreamId },
    /// A wave was instantiated. `enemies` is the upgraded count.
    WaveSpawned {
        level: i32,
        stream: Option<StreamId>,
        wave: WaveId,
        layer: i32,
        enemies: u32,
    },
    /// A stream produced all of its waves for this level.
    StreamEnded { level: i32, stream: StreamId },
    /// Both wave sources and agents are gone.
    LevelEnded { level: i32 },
    /// Every stream is exhausted; the infinite session ends.
    StreamsExhausted { level: i32 },
    /// The finite mission's last wave was cleared.
    MissionComplete {
        enemies_spawned: u64,
        score: i64,
        new_high_score: bool,
    },
}
