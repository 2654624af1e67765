//! Scheduler constants and tuning defaults.

/// Scheduler tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Levels ---

/// First level index of an infinite session.
pub const FIRST_LEVEL: i32 = 1;

/// Default pause between "level start" and stream evaluation (seconds).
pub const DEFAULT_INTER_LEVEL_DELAY_SECS: f64 = 3.0;

// --- Streams ---

/// Smallest legal stream period. Authored periods below this are clamped.
pub const MIN_STREAM_PERIOD: i32 = 1;

/// `end_level` value marking a stream as unbounded.
pub const UNBOUNDED_END_LEVEL: i32 = 0;

// --- Upgrades ---

/// Lower bound of an upgrade formula's percentage term.
pub const MIN_UPGRADE_PERCENTAGE: f64 = 0.0;

/// Upper bound of an upgrade formula's percentage term.
pub const MAX_UPGRADE_PERCENTAGE: f64 = 100.0;

// --- Session ---

/// Default RNG seed for the reference arena.
pub const DEFAULT_SEED: u64 = 42;
