//! Core types and definitions for the BARRAGE level-progression scheduler.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, arena components, stream states, upgrade fields, commands, signals,
//! progression events, snapshots and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
