//! Infinite-mode scheduler: recurring streams, level after level.
//!
//! Each level: announce it, wait the inter-level delay, evaluate every
//! stream, produce the waves of the streams that go ahead (sequentially,
//! with their inter-wave delays), then wait for the level-clear latch pair.
//! On clear, exhausted streams are compacted away, the streams that spawned
//! advance their upgrades and the level index moves on.
//!
//! Waits are explicit phases resumed on later ticks, never blocking calls.

use barrage_core::commands::WorldSignal;
use barrage_core::constants::{DEFAULT_INTER_LEVEL_DELAY_SECS, FIRST_LEVEL};
use barrage_core::enums::{StreamState, UpgradeField};
use barrage_core::events::ProgressionEvent;
use barrage_core::state::StreamView;
use barrage_core::types::{SimTime, StreamId};
use barrage_progression::clear::LevelClearDetector;
use barrage_progression::plan::LevelPlan;
use barrage_progression::stream::{compact, Stream, StreamConfig, StreamSlot};

use crate::roster::WaveRoster;
use crate::wave_source::WaveWorld;

/// Tuning for an infinite session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfiniteConfig {
    /// Pause between "level start" and stream evaluation.
    pub inter_level_delay_secs: f64,
    /// Level the session begins on. Streams scheduled before it are
    /// fast-forwarded.
    pub start_level: i32,
}

impl Default for InfiniteConfig {
    fn default() -> Self {
        Self {
            inter_level_delay_secs: DEFAULT_INTER_LEVEL_DELAY_SECS,
            start_level: FIRST_LEVEL,
        }
    }
}

/// Position inside one stream's production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Evaluate the stream and announce it.
    Enter,
    /// Instantiate the template at this index.
    Spawn(usize),
    /// Raise "stream end" and consume a use.
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    slot: usize,
    step: Step,
}

impl Cursor {
    fn first() -> Self {
        Self {
            slot: 0,
            step: Step::Enter,
        }
    }

    fn next_slot(self) -> Self {
        Self {
            slot: self.slot + 1,
            step: Step::Enter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    LevelStart,
    InterLevelDelay { deadline: f64 },
    Producing(Cursor),
    WaveDelay { deadline: f64, resume: Cursor },
    AwaitingClear,
    /// Cleared during production in a tick that already ended a level.
    ClearPending,
    Exhausted,
    Aborted,
}

/// The infinite-mode scheduler. Owns its streams and its enemy tally.
#[derive(Debug, Clone)]
pub struct InfiniteScheduler {
    config: InfiniteConfig,
    level: i32,
    slots: Vec<StreamSlot>,
    roster: WaveRoster,
    detector: LevelClearDetector,
    plan: LevelPlan,
    went_ahead: Vec<StreamId>,
    phase: Phase,
    /// A signal ended the previous level ahead of this tick's `tick` call.
    ended_by_signal: bool,
}

impl InfiniteScheduler {
    /// Build a scheduler from authoring data. Stream ids follow list order.
    pub fn new(config: InfiniteConfig, streams: Vec<StreamConfig>) -> Self {
        let inter_level_delay_secs = if config.inter_level_delay_secs.is_finite() {
            config.inter_level_delay_secs.max(0.0)
        } else {
            0.0
        };
        let config = InfiniteConfig {
            inter_level_delay_secs,
            ..config
        };

        if streams.is_empty() {
            tracing::warn!(
                target: "barrage::infinite",
                "no streams configured; the session will exhaust after one empty level"
            );
        }

        let slots = streams
            .into_iter()
            .enumerate()
            .map(|(index, stream_config)| {
                let mut stream = Stream::new(StreamId(index as u32), stream_config);
                if config.start_level > stream.start_level() {
                    stream.fast_forward(config.start_level);
                }
                StreamSlot::Active(stream)
            })
            .collect();

        Self {
            config,
            level: config.start_level,
            slots,
            roster: WaveRoster::new(),
            detector: LevelClearDetector::new(),
            plan: LevelPlan::default(),
            went_ahead: Vec::new(),
            phase: Phase::LevelStart,
            ended_by_signal: false,
        }
    }

    pub fn config(&self) -> InfiniteConfig {
        self.config
    }

    /// Current level index.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Enemies spawned this session, after enemy-count upgrades.
    pub fn enemies_spawned(&self) -> u64 {
        self.roster.enemies_spawned()
    }

    pub fn live_waves(&self) -> u32 {
        self.roster.live_count()
    }

    pub fn slots(&self) -> &[StreamSlot] {
        &self.slots
    }

    pub fn stream(&self, id: StreamId) -> Option<&Stream> {
        self.slots
            .iter()
            .filter_map(StreamSlot::active)
            .find(|stream| stream.id() == id)
    }

    pub fn detector(&self) -> &LevelClearDetector {
        &self.detector
    }

    /// Whether production is done and the level waits on the clear latches.
    pub fn is_awaiting_clear(&self) -> bool {
        matches!(self.phase, Phase::AwaitingClear | Phase::ClearPending)
    }

    /// Whether every stream ran out.
    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Exhausted | Phase::Aborted)
    }

    pub fn stream_views(&self) -> Vec<StreamView> {
        self.slots
            .iter()
            .filter_map(StreamSlot::active)
            .map(|stream| StreamView {
                id: stream.id(),
                name: stream.name().to_string(),
                remaining_uses: stream.remaining_uses(),
                unbounded: stream.is_unbounded(),
                spawn_count: stream.upgrades().spawn_count(),
            })
            .collect()
    }

    /// Abandon every pending wait. Nothing scheduled after this runs.
    pub fn abort(&mut self) {
        self.detector.unsubscribe();
        self.went_ahead.clear();
        self.ended_by_signal = false;
        self.phase = Phase::Aborted;
    }

    /// Advance until the next suspension point. Crosses at most one level
    /// boundary per call.
    pub fn tick<W: WaveWorld + ?Sized>(
        &mut self,
        now: SimTime,
        world: &mut W,
        out: &mut Vec<ProgressionEvent>,
    ) {
        let entry_level = self.level;
        let ended_by_signal = std::mem::take(&mut self.ended_by_signal);
        loop {
            match self.phase {
                Phase::LevelStart => {
                    if self.level != entry_level {
                        return;
                    }
                    self.start_level(now, out);
                }
                Phase::InterLevelDelay { deadline } => {
                    if !now.reached(deadline) {
                        return;
                    }
                    self.begin_production();
                }
                Phase::Producing(cursor) => {
                    if !self.produce(cursor, now, world, out) {
                        return;
                    }
                    self.finish_production(ended_by_signal, world, out);
                }
                Phase::WaveDelay { deadline, resume } => {
                    if !now.reached(deadline) {
                        return;
                    }
                    self.phase = Phase::Producing(resume);
                }
                Phase::ClearPending => {
                    if ended_by_signal {
                        return;
                    }
                    self.end_level(world, out);
                }
                Phase::AwaitingClear | Phase::Exhausted | Phase::Aborted => return,
            }
        }
    }

    /// Apply a lifecycle notification from the world.
    pub fn handle_signal<W: WaveWorld + ?Sized>(
        &mut self,
        signal: WorldSignal,
        world: &mut W,
        out: &mut Vec<ProgressionEvent>,
    ) {
        if self.phase == Phase::Aborted {
            return;
        }
        let completed = match signal {
            WorldSignal::WaveDestroyed { wave } => {
                self.roster.on_destroyed(wave) && self.detector.on_waves_empty()
            }
            WorldSignal::AgentsCleared => self.detector.on_agents_empty(),
        };
        if completed && self.phase == Phase::AwaitingClear {
            self.end_level(world, out);
            self.ended_by_signal = true;
        }
    }

    fn start_level(&mut self, now: SimTime, out: &mut Vec<ProgressionEvent>) {
        tracing::info!(target: "barrage::infinite", level = self.level, "level started");
        out.push(ProgressionEvent::LevelStarted { level: self.level });
        self.detector.reset();
        self.went_ahead.clear();
        self.phase = Phase::InterLevelDelay {
            deadline: now.elapsed_secs + self.config.inter_level_delay_secs,
        };
    }

    fn begin_production(&mut self) {
        self.detector.unsubscribe();
        self.plan = LevelPlan::build(self.level, &self.slots);
        tracing::debug!(
            target: "barrage::infinite",
            level = self.level,
            streams = self.plan.len(),
            go_ahead = self.plan.go_ahead_count(),
            "streams evaluated"
        );
        self.phase = Phase::Producing(Cursor::first());
    }

    /// Walk the stream list from `cursor`. Returns `true` once every slot
    /// is done, `false` if production suspended on an inter-wave delay.
    fn produce<W: WaveWorld + ?Sized>(
        &mut self,
        mut cursor: Cursor,
        now: SimTime,
        world: &mut W,
        out: &mut Vec<ProgressionEvent>,
    ) -> bool {
        loop {
            if cursor.slot >= self.slots.len() {
                return true;
            }
            match cursor.step {
                Step::Enter => {
                    let Some(stream) = self.slots[cursor.slot].active() else {
                        cursor = cursor.next_slot();
                        continue;
                    };
                    let id = stream.id();
                    let has_templates = !stream.wave_templates().is_empty();
                    let state = stream.evaluate(self.level);
                    debug_assert_eq!(
                        Some(state),
                        self.plan.state(cursor.slot),
                        "{id} changed state between planning and production"
                    );
                    match state {
                        StreamState::NoMore => {
                            tracing::debug!(
                                target: "barrage::infinite",
                                stream = %id,
                                level = self.level,
                                "stream exhausted, tombstoned"
                            );
                            self.slots[cursor.slot].tombstone();
                            cursor = cursor.next_slot();
                        }
                        StreamState::NotYet => cursor = cursor.next_slot(),
                        StreamState::GoAhead => {
                            out.push(ProgressionEvent::StreamStarted {
                                level: self.level,
                                stream: id,
                            });
                            cursor.step = if has_templates {
                                Step::Spawn(0)
                            } else {
                                Step::Finish
                            };
                        }
                    }
                }
                Step::Spawn(index) => {
                    let (delay, next) = self.spawn_template(cursor.slot, index, world, out);
                    let skip_delay =
                        next == Step::Finish && self.plan.is_last_active_stream(cursor.slot);
                    cursor.step = next;
                    if !skip_delay && delay > 0.0 {
                        self.phase = Phase::WaveDelay {
                            deadline: now.elapsed_secs + delay,
                            resume: cursor,
                        };
                        return false;
                    }
                }
                Step::Finish => {
                    self.finish_stream(cursor.slot, out);
                    cursor = cursor.next_slot();
                }
            }
        }
    }

    /// Instantiate one template of the stream at `slot`. Returns the delay
    /// that follows it and the next step.
    fn spawn_template<W: WaveWorld + ?Sized>(
        &mut self,
        slot: usize,
        index: usize,
        world: &mut W,
        out: &mut Vec<ProgressionEvent>,
    ) -> (f64, Step) {
        let Some(stream) = self.slots.get(slot).and_then(StreamSlot::active) else {
            tracing::error!(target: "barrage::infinite", slot, "spawning from a tombstoned slot");
            return (0.0, Step::Finish);
        };
        let templates = stream.wave_templates();
        let Some(template) = templates.get(index) else {
            return (0.0, Step::Finish);
        };
        let next = if index + 1 < templates.len() {
            Step::Spawn(index + 1)
        } else {
            Step::Finish
        };
        let delay = template.delay();

        if template.is_empty() {
            tracing::warn!(
                target: "barrage::infinite",
                stream = %stream.id(),
                index,
                "empty wave template, skipping"
            );
            return (delay, next);
        }

        match world.create_wave(template, template.layer, Some(stream.upgrades())) {
            Some(handle) => {
                let enemies = stream
                    .upgrades()
                    .get_count(UpgradeField::EnemyCount, handle.enemy_count);
                self.roster.register(handle, enemies);
                tracing::debug!(
                    target: "barrage::infinite",
                    stream = %stream.id(),
                    wave = %handle.id,
                    source = %template.source,
                    enemies,
                    "wave spawned"
                );
                out.push(ProgressionEvent::WaveSpawned {
                    level: self.level,
                    stream: Some(stream.id()),
                    wave: handle.id,
                    layer: template.layer,
                    enemies,
                });
            }
            None => {
                tracing::warn!(
                    target: "barrage::infinite",
                    stream = %stream.id(),
                    source = %template.source,
                    "wave source produced nothing"
                );
            }
        }
        (delay, next)
    }

    fn finish_stream(&mut self, slot: usize, out: &mut Vec<ProgressionEvent>) {
        let level = self.level;
        let Some(stream) = self.slots.get_mut(slot).and_then(StreamSlot::active_mut) else {
            return;
        };
        out.push(ProgressionEvent::StreamEnded {
            level,
            stream: stream.id(),
        });
        stream.consume_use(level);
        self.went_ahead.push(stream.id());
    }

    /// Prime and subscribe the clear latches. A level that is already clear
    /// ends now, unless this tick has crossed a boundary already.
    fn finish_production<W: WaveWorld + ?Sized>(
        &mut self,
        boundary_crossed: bool,
        world: &mut W,
        out: &mut Vec<ProgressionEvent>,
    ) {
        let waves_clear = self.roster.is_empty();
        let agents_clear = if world.has_population() {
            world.living_agents() == 0
        } else {
            tracing::warn!(
                target: "barrage::infinite",
                "no agent population; treating agents as cleared"
            );
            true
        };
        self.detector.prime(waves_clear, agents_clear);
        self.phase = Phase::AwaitingClear;
        if self.detector.subscribe() {
            if boundary_crossed {
                tracing::debug!(
                    target: "barrage::infinite",
                    level = self.level,
                    "level clear, ending it next tick"
                );
                self.phase = Phase::ClearPending;
            } else {
                self.end_level(world, out);
            }
        }
    }

    fn end_level<W: WaveWorld + ?Sized>(&mut self, world: &mut W, out: &mut Vec<ProgressionEvent>) {
        let level = self.level;
        self.detector.unsubscribe();
        out.push(ProgressionEvent::LevelEnded { level });

        let score = world.current_score();
        if world.record_high_score_if_greater(score) {
            tracing::info!(target: "barrage::infinite", score, "new high score");
        }

        let removed = compact(&mut self.slots);
        for id in self.went_ahead.drain(..) {
            if let Some(stream) = self
                .slots
                .iter_mut()
                .filter_map(StreamSlot::active_mut)
                .find(|stream| stream.id() == id)
            {
                stream.advance();
            }
        }

        tracing::info!(
            target: "barrage::infinite",
            level,
            removed,
            streams = self.slots.len(),
            enemies_spawned = self.roster.enemies_spawned(),
            "level cleared"
        );

        self.level = level.saturating_add(1);
        if self.slots.is_empty() {
            tracing::info!(target: "barrage::infinite", level, "all streams exhausted");
            out.push(ProgressionEvent::StreamsExhausted { level });
            self.phase = Phase::Exhausted;
        } else {
            self.phase = Phase::LevelStart;
        }
    }
}
