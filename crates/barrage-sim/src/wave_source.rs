//! Collaborator contracts the schedulers consume.
//!
//! The world that owns enemies, their prefabs and the score lives outside
//! the scheduler. It is reached only through these traits.

use barrage_core::commands::WorldSignal;
use barrage_core::types::WaveId;
use barrage_progression::stream::WaveTemplate;
use barrage_progression::upgrade_set::StreamUpgradeSet;

/// What the scheduler learns about a wave it just created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHandle {
    pub id: WaveId,
    /// Authored enemy count, before stream upgrades.
    pub enemy_count: u32,
}

/// Instantiates waves.
pub trait WaveFactory {
    /// Create `template` on `layer`. `upgrades` is the producing stream's
    /// upgrade set; the factory applies it to each enemy it instantiates.
    /// Returns `None` when the template cannot produce a wave.
    fn create_wave(
        &mut self,
        template: &WaveTemplate,
        layer: i32,
        upgrades: Option<&StreamUpgradeSet>,
    ) -> Option<WaveHandle>;
}

/// The enemy agent population.
pub trait AgentPopulation {
    fn living_agents(&self) -> u32;

    /// `false` when no population collaborator exists; counts as empty.
    fn has_population(&self) -> bool {
        true
    }
}

/// Score and persisted high score.
pub trait ScoreBoard {
    fn current_score(&self) -> i64;

    /// Store `score` as the high score if it beats it. Returns whether it did.
    fn record_high_score_if_greater(&mut self, score: i64) -> bool;
}

/// Everything a scheduler needs from the world.
pub trait WaveWorld: WaveFactory + AgentPopulation + ScoreBoard {
    /// Move pending lifecycle notifications into `out`. Worlds that deliver
    /// signals through `ProgressionEngine::queue_signal` keep the default.
    fn drain_signals(&mut self, _out: &mut Vec<WorldSignal>) {}
}
