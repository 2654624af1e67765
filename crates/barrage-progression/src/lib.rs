//! Level progression rules for BARRAGE.
//!
//! Implements the escalation formula, per-stream upgrade sets, the stream
//! activation state machine and the level-clear latch.
//! No ECS dependency; operates on plain data.

pub mod clear;
pub mod plan;
pub mod stream;
pub mod upgrade;
pub mod upgrade_set;

pub use barrage_core as core;

#[cfg(test)]
mod tests;
