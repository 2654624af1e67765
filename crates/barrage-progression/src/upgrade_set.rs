//! The bundle of escalation formulas owned by one stream.

use serde::{Deserialize, Serialize};

use barrage_core::enums::{UpgradeCategory, UpgradeField};

use crate::upgrade::UpgradeFormula;

/// Formulas for enemy stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyUpgrades {
    pub count: UpgradeFormula,
    pub health: UpgradeFormula,
    pub shield: UpgradeFormula,
    pub point_value: UpgradeFormula,
    pub collision_damage: UpgradeFormula,
}

/// Formulas for movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverUpgrades {
    pub speed: UpgradeFormula,
}

/// Formulas for weapons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponUpgrades {
    pub damage: UpgradeFormula,
    /// Bullet speed.
    pub speed: UpgradeFormula,
    /// Fire rate.
    pub rate: UpgradeFormula,
}

/// Escalation rules plus the spawn counter they are evaluated at.
///
/// Created once per stream at authoring time and mutated only by that
/// stream. Wave factories receive read-only copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamUpgradeSet {
    pub enemy: EnemyUpgrades,
    pub mover: MoverUpgrades,
    pub weapon: WeaponUpgrades,
    pub upgrade_enemy: bool,
    pub upgrade_mover: bool,
    pub upgrade_weapon: bool,
    /// Number of levels the owning stream has produced waves on.
    pub spawn_count: u32,
}

impl StreamUpgradeSet {
    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    pub fn category_enabled(&self, category: UpgradeCategory) -> bool {
        match category {
            UpgradeCategory::Enemy => self.upgrade_enemy,
            UpgradeCategory::Mover => self.upgrade_mover,
            UpgradeCategory::Weapon => self.upgrade_weapon,
        }
    }

    pub fn formula(&self, field: UpgradeField) -> &UpgradeFormula {
        match field {
            UpgradeField::EnemyCount => &self.enemy.count,
            UpgradeField::Health => &self.enemy.health,
            UpgradeField::Shield => &self.enemy.shield,
            UpgradeField::PointValue => &self.enemy.point_value,
            UpgradeField::CollisionDamage => &self.enemy.collision_damage,
            UpgradeField::MoverSpeed => &self.mover.speed,
            UpgradeField::WeaponDamage => &self.weapon.damage,
            UpgradeField::WeaponSpeed => &self.weapon.speed,
            UpgradeField::WeaponRate => &self.weapon.rate,
        }
    }

    fn formula_mut(&mut self, field: UpgradeField) -> &mut UpgradeFormula {
        match field {
            UpgradeField::EnemyCount => &mut self.enemy.count,
            UpgradeField::Health => &mut self.enemy.health,
            UpgradeField::Shield => &mut self.enemy.shield,
            UpgradeField::PointValue => &mut self.enemy.point_value,
            UpgradeField::CollisionDamage => &mut self.enemy.collision_damage,
            UpgradeField::MoverSpeed => &mut self.mover.speed,
            UpgradeField::WeaponDamage => &mut self.weapon.damage,
            UpgradeField::WeaponSpeed => &mut self.weapon.speed,
            UpgradeField::WeaponRate => &mut self.weapon.rate,
        }
    }

    /// Builder-style setter. Enables the field's category.
    pub fn with(mut self, field: UpgradeField, formula: UpgradeFormula) -> Self {
        *self.formula_mut(field) = formula.sanitized();
        match field.category() {
            UpgradeCategory::Enemy => self.upgrade_enemy = true,
            UpgradeCategory::Mover => self.upgrade_mover = true,
            UpgradeCategory::Weapon => self.upgrade_weapon = true,
        }
        self
    }

    /// Escalated value of `field` at the current spawn count.
    /// Disabled categories return `base` without evaluating anything.
    pub fn get(&self, field: UpgradeField, base: f64) -> f64 {
        if !self.category_enabled(field.category()) {
            return base;
        }
        self.formula(field).apply(base, self.spawn_count)
    }

    /// Integer form of [`get`](Self::get), truncating toward zero.
    pub fn get_int(&self, field: UpgradeField, base: i64) -> i64 {
        if !self.category_enabled(field.category()) {
            return base;
        }
        self.formula(field).apply_int(base, self.spawn_count)
    }

    /// Count form of [`get`](Self::get), truncating and floored at zero.
    pub fn get_count(&self, field: UpgradeField, base: u32) -> u32 {
        if !self.category_enabled(field.category()) {
            return base;
        }
        self.formula(field).apply_u32(base, self.spawn_count)
    }

    /// Record one more spawning level for the owning stream.
    pub fn advance(&mut self) {
        self.spawn_count = self.spawn_count.saturating_add(1);
    }

    /// Clamp every formula into range. Returns the fields that needed it.
    pub fn sanitize(&mut self) -> Vec<UpgradeField> {
        let mut clamped = Vec::new();
        for field in UpgradeField::ALL {
            let formula = self.formula_mut(field);
            if !formula.is_valid() || formula.additive.is_nan() {
                *formula = formula.sanitized();
                clamped.push(field);
            }
        }
        clamped
    }
}
