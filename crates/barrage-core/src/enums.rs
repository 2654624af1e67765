//! Enumeration types used throughout the scheduler.

use serde::{Deserialize, Serialize};

/// Result of evaluating a stream against a level index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamState {
    /// The stream is exhausted and will never spawn again.
    NoMore,
    /// The stream has uses left but does not spawn on this level.
    NotYet,
    /// The stream spawns its waves on this level.
    GoAhead,
}

/// Upgrade category. Each category can be switched off per stream, in which
/// case its formulas are never evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeCategory {
    Enemy,
    Mover,
    Weapon,
}

/// Every tunable parameter a stream can escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeField {
    // --- Enemy ---
    EnemyCount,
    Health,
    Shield,
    PointValue,
    CollisionDamage,
    // --- Mover ---
    MoverSpeed,
    // --- Weapon ---
    WeaponDamage,
    WeaponSpeed,
    WeaponRate,
}

impl UpgradeField {
    /// All fields, in declaration order.
    pub const ALL: [UpgradeField; 9] = [
        UpgradeField::EnemyCount,
        UpgradeField::Health,
        UpgradeField::Shield,
        UpgradeField::PointValue,
        UpgradeField::CollisionDamage,
        UpgradeField::MoverSpeed,
        UpgradeField::WeaponDamage,
        UpgradeField::WeaponSpeed,
        UpgradeField::WeaponRate,
    ];

    /// The category this field belongs to.
    pub fn category(self) -> UpgradeCategory {
        match self {
            UpgradeField::EnemyCount
            | UpgradeField::Health
            | UpgradeField::Shield
            | UpgradeField::PointValue
            | UpgradeField::CollisionDamage => UpgradeCategory::Enemy,
            UpgradeField::MoverSpeed => UpgradeCategory::Mover,
            UpgradeField::WeaponDamage | UpgradeField::WeaponSpeed | UpgradeField::WeaponRate => {
                UpgradeCategory::Weapon
            }
        }
    }
}

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created but not started.
    #[default]
    Idle,
    /// Scheduler is advancing.
    Active,
    /// Scheduler is frozen; all pending waits hold.
    Paused,
    /// The mission finished or every stream ran out.
    Complete,
    /// The owning session ended early. Pending waits were abandoned.
    Aborted,
}

/// Which scheduler a session runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerMode {
    /// One ordered wave timeline.
    Finite,
    /// Recurring streams, level after level.
    #[default]
    Infinite,
}
