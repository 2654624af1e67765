//! Streams: recurring, level-indexed spawn sources.
//!
//! A stream owns an ordered list of wave templates, an activation window
//! (start level, end level, period) and its own upgrade set. Each level the
//! scheduler asks it for a [`StreamState`].

use serde::{Deserialize, Serialize};

use barrage_core::constants::{MIN_STREAM_PERIOD, UNBOUNDED_END_LEVEL};
use barrage_core::enums::StreamState;
use barrage_core::types::StreamId;

use crate::upgrade_set::StreamUpgradeSet;

/// One wave to instantiate: an opaque asset key, the render layer to put it
/// on, and the pause before whatever comes next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveTemplate {
    pub source: String,
    #[serde(default)]
    pub layer: i32,
    #[serde(default)]
    pub delay_secs: f64,
}

impl WaveTemplate {
    pub fn new(source: impl Into<String>, layer: i32, delay_secs: f64) -> Self {
        Self {
            source: source.into(),
            layer,
            delay_secs,
        }
    }

    /// A template with no asset key produces nothing.
    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty()
    }

    /// Delay in seconds, never negative.
    pub fn delay(&self) -> f64 {
        if self.delay_secs.is_finite() {
            self.delay_secs.max(0.0)
        } else {
            0.0
        }
    }
}

/// Authoring form of a stream, as loaded from scenario data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub wave_templates: Vec<WaveTemplate>,
    #[serde(default = "default_start_level")]
    pub start_level: i32,
    /// `0` means the stream never ends.
    #[serde(default)]
    pub end_level: i32,
    #[serde(default = "default_period")]
    pub period: i32,
    #[serde(default)]
    pub unbounded: bool,
    #[serde(default)]
    pub upgrades: StreamUpgradeSet,
}

fn default_start_level() -> i32 {
    barrage_core::constants::FIRST_LEVEL
}

fn default_period() -> i32 {
    MIN_STREAM_PERIOD
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            wave_templates: Vec::new(),
            start_level: default_start_level(),
            end_level: UNBOUNDED_END_LEVEL,
            period: default_period(),
            unbounded: false,
            upgrades: StreamUpgradeSet::default(),
        }
    }
}

/// A live stream with its remaining-use bookkeeping.
#[derive(Debug, Clone)]
pub struct Stream {
    id: StreamId,
    name: String,
    wave_templates: Vec<WaveTemplate>,
    start_level: i32,
    end_level: i32,
    period: i32,
    uses: i32,
    remaining_uses: i32,
    unbounded: bool,
    upgrades: StreamUpgradeSet,
    last_consumed_level: Option<i32>,
}

impl Stream {
    /// Build a stream from authoring data, clamping anomalies.
    pub fn new(id: StreamId, config: StreamConfig) -> Self {
        let period = if config.period < MIN_STREAM_PERIOD {
            tracing::warn!(
                target: "barrage::stream",
                stream = %id,
                name = %config.name,
                period = config.period,
                "stream period below minimum, clamping"
            );
            MIN_STREAM_PERIOD
        } else {
            config.period
        };

        let mut upgrades = config.upgrades;
        let clamped = upgrades.sanitize();
        if !clamped.is_empty() {
            tracing::warn!(
                target: "barrage::stream",
                stream = %id,
                fields = ?clamped,
                "upgrade percentages out of range, clamping"
            );
        }

        let unbounded = config.unbounded || config.end_level == UNBOUNDED_END_LEVEL;
        let uses = if unbounded {
            0
        } else {
            bounded_uses(config.start_level, config.end_level, period)
        };
        if !unbounded && uses == 0 {
            tracing::warn!(
                target: "barrage::stream",
                stream = %id,
                start = config.start_level,
                end = config.end_level,
                "stream ends before it starts and will never spawn"
            );
        }

        Self {
            id,
            name: config.name,
            wave_templates: config.wave_templates,
            start_level: config.start_level,
            end_level: config.end_level,
            period,
            uses,
            remaining_uses: uses,
            unbounded,
            upgrades,
            last_consumed_level: None,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wave_templates(&self) -> &[WaveTemplate] {
        &self.wave_templates
    }

    pub fn start_level(&self) -> i32 {
        self.start_level
    }

    pub fn end_level(&self) -> i32 {
        self.end_level
    }

    pub fn period(&self) -> i32 {
        self.period
    }

    /// Total uses of a bounded stream. Zero for unbounded streams.
    pub fn uses(&self) -> i32 {
        self.uses
    }

    pub fn remaining_uses(&self) -> i32 {
        self.remaining_uses
    }

    pub fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    pub fn upgrades(&self) -> &StreamUpgradeSet {
        &self.upgrades
    }

    /// Decide whether this stream spawns on `level`. Pure; calling it any
    /// number of times within a level yields the same answer.
    pub fn evaluate(&self, level: i32) -> StreamState {
        let level = i64::from(level);
        let start = i64::from(self.start_level);
        let period = i64::from(self.period);

        if self.unbounded {
            return if level >= start && (level - start) % period == 0 {
                StreamState::GoAhead
            } else {
                StreamState::NotYet
            };
        }

        if self.remaining_uses > 0 {
            let next = start + period * i64::from(self.uses - self.remaining_uses);
            if level == next {
                StreamState::GoAhead
            } else {
                StreamState::NotYet
            }
        } else {
            StreamState::NoMore
        }
    }

    /// Spend one use after producing this level's waves. Consuming twice in
    /// one level is a scheduler bug.
    pub fn consume_use(&mut self, level: i32) {
        if self.last_consumed_level == Some(level) {
            debug_assert!(false, "{} consumed twice on level {level}", self.id);
            tracing::error!(
                target: "barrage::stream",
                stream = %self.id,
                level,
                "stream consumed twice on one level, ignoring"
            );
            return;
        }
        self.last_consumed_level = Some(level);
        if !self.unbounded {
            self.remaining_uses = (self.remaining_uses - 1).max(0);
        }
    }

    /// Increment the upgrade spawn counter. Once per level this stream
    /// produced waves on.
    pub fn advance(&mut self) {
        self.upgrades.advance();
    }

    /// Start a session at `level` as if every earlier scheduled level had
    /// been played: spend those uses and advance the upgrades for each.
    pub fn fast_forward(&mut self, level: i32) {
        for earlier in self.start_level..level {
            if self.evaluate(earlier) == StreamState::GoAhead {
                if !self.unbounded {
                    self.remaining_uses = (self.remaining_uses - 1).max(0);
                }
                self.upgrades.advance();
            }
        }
    }
}

fn bounded_uses(start: i32, end: i32, period: i32) -> i32 {
    if end < start {
        return 0;
    }
    let span = i64::from(end) - i64::from(start);
    let uses = span / i64::from(period) + 1;
    i32::try_from(uses).unwrap_or(i32::MAX)
}

/// A position in the scheduler's stream list. Exhausted streams become
/// tombstones and are removed at end-of-level cleanup.
#[derive(Debug, Clone)]
pub enum StreamSlot {
    Active(Stream),
    Tombstoned { id: StreamId },
}

impl StreamSlot {
    pub fn id(&self) -> StreamId {
        match self {
            StreamSlot::Active(stream) => stream.id(),
            StreamSlot::Tombstoned { id } => *id,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, StreamSlot::Active(_))
    }

    pub fn active(&self) -> Option<&Stream> {
        match self {
            StreamSlot::Active(stream) => Some(stream),
            StreamSlot::Tombstoned { .. } => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut Stream> {
        match self {
            StreamSlot::Active(stream) => Some(stream),
            StreamSlot::Tombstoned { .. } => None,
        }
    }

    /// Replace the stream with a tombstone. Idempotent.
    pub fn tombstone(&mut self) {
        let id = self.id();
        *self = StreamSlot::Tombstoned { id };
    }
}

/// Drop tombstoned slots, preserving the order of the survivors.
///
/// A stable sort moves tombstones to the front, so one prefix drain removes
/// them all. Returns the number removed.
pub fn compact(slots: &mut Vec<StreamSlot>) -> usize {
    slots.sort_by_key(StreamSlot::is_active);
    let dead = slots.iter().take_while(|slot| !slot.is_active()).count();
    slots.drain(..dead);
    dead
}
