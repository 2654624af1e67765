//! Finite-mode scheduler: one ordered wave timeline per mission.
//!
//! Waves spawn when their deadline comes up; each one pushes the deadline
//! out by its own delay. After the last wave the mission waits for every
//! wave source to be destroyed, then for the agent population to empty,
//! and completes.

use barrage_core::commands::WorldSignal;
use barrage_core::events::ProgressionEvent;
use barrage_core::types::SimTime;
use barrage_progression::stream::WaveTemplate;

use crate::roster::WaveRoster;
use crate::wave_source::WaveWorld;

/// Finite missions are a single level.
const MISSION_LEVEL: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    NotStarted,
    Spawning { deadline: f64 },
    AwaitingWaves,
    AwaitingAgents,
    Complete,
    Aborted,
}

/// Ordered wave timeline. `None` entries are placeholders that spawn
/// nothing.
#[derive(Debug, Clone)]
pub struct FiniteScheduler {
    entries: Vec<Option<WaveTemplate>>,
    cursor: usize,
    roster: WaveRoster,
    phase: Phase,
}

impl FiniteScheduler {
    pub fn new(entries: Vec<Option<WaveTemplate>>) -> Self {
        if entries.is_empty() {
            tracing::warn!(target: "barrage::finite", "mission has no waves");
        }
        Self {
            entries,
            cursor: 0,
            roster: WaveRoster::new(),
            phase: Phase::NotStarted,
        }
    }

    /// Index of the next entry to spawn.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn enemies_spawned(&self) -> u64 {
        self.roster.enemies_spawned()
    }

    pub fn live_waves(&self) -> u32 {
        self.roster.live_count()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Complete | Phase::Aborted)
    }

    pub fn abort(&mut self) {
        self.phase = Phase::Aborted;
    }

    pub fn tick<W: WaveWorld + ?Sized>(
        &mut self,
        now: SimTime,
        world: &mut W,
        out: &mut Vec<ProgressionEvent>,
    ) {
        loop {
            match self.phase {
                Phase::NotStarted => {
                    tracing::info!(
                        target: "barrage::finite",
                        waves = self.entries.len(),
                        "mission started"
                    );
                    out.push(ProgressionEvent::LevelStarted {
                        level: MISSION_LEVEL,
                    });
                    self.phase = Phase::Spawning {
                        deadline: now.elapsed_secs,
                    };
                }
                Phase::Spawning { deadline } => {
                    let mut deadline = deadline;
                    while self.cursor < self.entries.len() && now.reached(deadline) {
                        deadline += self.spawn_entry(world, out);
                        self.cursor += 1;
                    }
                    if self.cursor < self.entries.len() {
                        self.phase = Phase::Spawning { deadline };
                        return;
                    }
                    tracing::debug!(target: "barrage::finite", "last wave spawned");
                    self.phase = Phase::AwaitingWaves;
                }
                Phase::AwaitingWaves => {
                    if !self.roster.is_empty() {
                        return;
                    }
                    self.phase = Phase::AwaitingAgents;
                }
                Phase::AwaitingAgents => {
                    if world.has_population() && world.living_agents() > 0 {
                        return;
                    }
                    self.complete(world, out);
                }
                Phase::Complete | Phase::Aborted => return,
            }
        }
    }

    pub fn handle_signal(&mut self, signal: WorldSignal) {
        if self.phase == Phase::Aborted {
            return;
        }
        // Completion is polled in `tick`; agent signals carry no extra state.
        if let WorldSignal::WaveDestroyed { wave } = signal {
            self.roster.on_destroyed(wave);
        }
    }

    /// Spawn the entry under the cursor. Returns the delay before the next.
    fn spawn_entry<W: WaveWorld + ?Sized>(
        &mut self,
        world: &mut W,
        out: &mut Vec<ProgressionEvent>,
    ) -> f64 {
        let index = self.cursor;
        let Some(Some(template)) = self.entries.get(index) else {
            tracing::debug!(target: "barrage::finite", index, "null mission entry");
            return 0.0;
        };
        let delay = template.delay();
        if template.is_empty() {
            tracing::warn!(target: "barrage::finite", index, "empty wave template, skipping");
            return delay;
        }

        match world.create_wave(template, template.layer, None) {
            Some(handle) => {
                self.roster.register(handle, handle.enemy_count);
                tracing::debug!(
                    target: "barrage::finite",
                    index,
                    wave = %handle.id,
                    enemies = handle.enemy_count,
                    "wave spawned"
                );
                out.push(ProgressionEvent::WaveSpawned {
                    level: MISSION_LEVEL,
                    stream: None,
                    wave: handle.id,
                    layer: template.layer,
                    enemies: handle.enemy_count,
                });
            }
            None => {
                tracing::warn!(
                    target: "barrage::finite",
                    index,
                    source = %template.source,
                    "wave source produced nothing"
                );
            }
        }
        delay
    }

    fn complete<W: WaveWorld + ?Sized>(&mut self, world: &mut W, out: &mut Vec<ProgressionEvent>) {
        let score = world.current_score();
        let new_high_score = world.record_high_score_if_greater(score);
        tracing::info!(
            target: "barrage::finite",
            score,
            new_high_score,
            enemies_spawned = self.roster.enemies_spawned(),
            "mission complete"
        );
        out.push(ProgressionEvent::LevelEnded {
            level: MISSION_LEVEL,
        });
        out.push(ProgressionEvent::MissionComplete {
            enemies_spawned: self.roster.enemies_spawned(),
            score,
            new_high_score,
        });
        self.phase = Phase::Complete;
    }
}
