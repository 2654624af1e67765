//! Scheduling engine for BARRAGE.
//!
//! Owns the finite and infinite schedulers, advances them at a fixed tick
//! rate against an externally owned world, and produces
//! `ProgressionSnapshot`s for listeners.

pub mod arena;
pub mod engine;
pub mod finite;
pub mod infinite;
pub mod roster;
pub mod scenario;
pub mod wave_source;

pub use barrage_core as core;
pub use barrage_progression as progression;
pub use engine::ProgressionEngine;
