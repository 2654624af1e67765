//! ECS components for enemy entities in the reference arena.
//!
//! Components are plain data structs with no methods.
//! Stat upgrades are applied once, when the entity is spawned.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::WaveId;

/// Marker for enemy agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy;

/// World-space position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec2);

/// Render layer this enemy was spawned on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderLayer(pub i32);

/// Wave this enemy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveMember {
    pub wave: WaveId,
}

/// Survivability and reward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f64,
    pub shield: f64,
    /// Score awarded when destroyed by the player.
    pub point_value: i64,
    /// Damage dealt to the player on contact.
    pub collision_damage: f64,
}

/// Movement parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub speed: f64,
}

/// Weapon parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage: f64,
    pub bullet_speed: f64,
    /// Shots per second.
    pub fire_rate: f64,
}
