//! Live-wave bookkeeping shared by both schedulers.

use std::collections::BTreeSet;

use barrage_core::types::WaveId;

use crate::wave_source::WaveHandle;

/// Waves created this session that still have members.
#[derive(Debug, Clone, Default)]
pub struct WaveRoster {
    live: BTreeSet<WaveId>,
    waves_spawned: u32,
    enemies_spawned: u64,
}

impl WaveRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new wave that contributed `enemies` (after upgrades).
    pub fn register(&mut self, handle: WaveHandle, enemies: u32) {
        if !self.live.insert(handle.id) {
            tracing::warn!(
                target: "barrage::roster",
                wave = %handle.id,
                "factory reused a live wave id"
            );
        }
        self.waves_spawned += 1;
        self.enemies_spawned += u64::from(enemies);
    }

    /// Forget a destroyed wave. Returns `true` if this emptied the roster.
    pub fn on_destroyed(&mut self, wave: WaveId) -> bool {
        if !self.live.remove(&wave) {
            tracing::debug!(
                target: "barrage::roster",
                wave = %wave,
                "destroyed signal for an untracked wave"
            );
            return false;
        }
        self.live.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn live_count(&self) -> u32 {
        u32::try_from(self.live.len()).unwrap_or(u32::MAX)
    }

    pub fn waves_spawned(&self) -> u32 {
        self.waves_spawned
    }

    pub fn enemies_spawned(&self) -> u64 {
        self.enemies_spawned
    }
}
