//! Reference world backed by a hecs ECS.
//!
//! Waves are groups of enemy entities built from a blueprint catalog. The
//! producing stream's upgrades are applied to every enemy as it is spawned.
//! Removing enemies emits the lifecycle signals the schedulers listen for.
//! Used by the test suite and the replay tool; a real game supplies its own
//! `WaveWorld`.

use std::collections::BTreeMap;

use glam::DVec2;
use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use barrage_core::commands::WorldSignal;
use barrage_core::components::*;
use barrage_core::enums::UpgradeField;
use barrage_core::types::WaveId;
use barrage_progression::stream::WaveTemplate;
use barrage_progression::upgrade_set::StreamUpgradeSet;

use crate::wave_source::{AgentPopulation, ScoreBoard, WaveFactory, WaveHandle, WaveWorld};

/// Half-width of the band along the top edge where waves enter.
const SPAWN_HALF_WIDTH: f64 = 400.0;

/// Height of the top edge.
const SPAWN_TOP: f64 = 600.0;

/// Authored stats of every enemy in one wave prefab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveBlueprint {
    pub enemy_count: u32,
    pub health: f64,
    pub shield: f64,
    pub point_value: i64,
    pub collision_damage: f64,
    pub speed: f64,
    pub weapon_damage: f64,
    pub bullet_speed: f64,
    pub fire_rate: f64,
    /// Radius enemies scatter around the wave's entry point.
    pub spread: f64,
}

/// Blueprints referenced by the builtin scenarios.
pub fn standard_catalog() -> BTreeMap<String, WaveBlueprint> {
    let entries = [
        (
            "grunt",
            WaveBlueprint {
                enemy_count: 4,
                health: 10.0,
                shield: 0.0,
                point_value: 10,
                collision_damage: 5.0,
                speed: 60.0,
                weapon_damage: 1.0,
                bullet_speed: 150.0,
                fire_rate: 0.5,
                spread: 40.0,
            },
        ),
        (
            "drone",
            WaveBlueprint {
                enemy_count: 6,
                health: 4.0,
                shield: 0.0,
                point_value: 5,
                collision_damage: 3.0,
                speed: 120.0,
                weapon_damage: 0.0,
                bullet_speed: 0.0,
                fire_rate: 0.0,
                spread: 80.0,
            },
        ),
        (
            "gunship",
            WaveBlueprint {
                enemy_count: 1,
                health: 80.0,
                shield: 20.0,
                point_value: 100,
                collision_damage: 20.0,
                speed: 30.0,
                weapon_damage: 4.0,
                bullet_speed: 220.0,
                fire_rate: 2.0,
                spread: 0.0,
            },
        ),
        (
            "boss",
            WaveBlueprint {
                enemy_count: 1,
                health: 600.0,
                shield: 150.0,
                point_value: 1_000,
                collision_damage: 50.0,
                speed: 15.0,
                weapon_damage: 8.0,
                bullet_speed: 180.0,
                fire_rate: 4.0,
                spread: 0.0,
            },
        ),
    ];
    entries
        .into_iter()
        .map(|(name, blueprint)| (name.to_string(), blueprint))
        .collect()
}

/// The reference world.
pub struct Arena {
    world: World,
    rng: ChaCha8Rng,
    catalog: BTreeMap<String, WaveBlueprint>,
    next_wave: u32,
    wave_members: BTreeMap<WaveId, u32>,
    living: u32,
    score: i64,
    high_score: i64,
    outbox: Vec<WorldSignal>,
    despawn_buffer: Vec<Entity>,
}

impl Arena {
    /// Arena with the standard catalog.
    pub fn new(seed: u64) -> Self {
        Self::with_catalog(seed, standard_catalog())
    }

    pub fn with_catalog(seed: u64, catalog: BTreeMap<String, WaveBlueprint>) -> Self {
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            catalog,
            next_wave: 0,
            wave_members: BTreeMap::new(),
            living: 0,
            score: 0,
            high_score: 0,
            outbox: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn insert_blueprint(&mut self, source: impl Into<String>, blueprint: WaveBlueprint) {
        self.catalog.insert(source.into(), blueprint);
    }

    pub fn high_score(&self) -> i64 {
        self.high_score
    }

    pub fn set_high_score(&mut self, high_score: i64) {
        self.high_score = high_score;
    }

    /// All living enemies.
    pub fn enemies(&self) -> Vec<Entity> {
        self.world
            .query::<&Enemy>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Living enemies of one wave.
    pub fn wave_enemies(&self, wave: WaveId) -> Vec<Entity> {
        self.world
            .query::<&WaveMember>()
            .iter()
            .filter(|(_, member)| member.wave == wave)
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Stats an enemy was spawned with.
    pub fn enemy_stats(&self, entity: Entity) -> Option<(Vitals, Mover, Weapon)> {
        let mut query = self
            .world
            .query_one::<(&Vitals, &Mover, &Weapon)>(entity)
            .ok()?;
        query
            .get()
            .map(|(vitals, mover, weapon)| (*vitals, *mover, *weapon))
    }

    /// Destroy one enemy and award its points. Returns `false` if the
    /// entity was not a living enemy.
    pub fn kill_enemy(&mut self, entity: Entity) -> bool {
        self.remove_enemy(entity, true)
    }

    /// Remove one enemy without awarding points (it left the screen).
    pub fn escape(&mut self, entity: Entity) -> bool {
        self.remove_enemy(entity, false)
    }

    /// Destroy every member of a wave. Returns the number destroyed.
    pub fn kill_wave(&mut self, wave: WaveId) -> u32 {
        let members = self.wave_enemies(wave);
        members
            .into_iter()
            .filter(|entity| self.kill_enemy(*entity))
            .count() as u32
    }

    /// Destroy every enemy. Returns the number destroyed.
    pub fn clear_all(&mut self) -> u32 {
        self.despawn_buffer.clear();
        self.despawn_buffer.extend(
            self.world
                .query_mut::<&Enemy>()
                .into_iter()
                .map(|(entity, _)| entity),
        );
        let buffer = std::mem::take(&mut self.despawn_buffer);
        let mut killed = 0;
        for entity in &buffer {
            if self.kill_enemy(*entity) {
                killed += 1;
            }
        }
        self.despawn_buffer = buffer;
        killed
    }

    fn remove_enemy(&mut self, entity: Entity, award: bool) -> bool {
        let Ok((member, vitals)) = self
            .world
            .query_one_mut::<(&WaveMember, &Vitals)>(entity)
            .map(|(member, vitals)| (*member, *vitals))
        else {
            return false;
        };
        let _ = self.world.despawn(entity);

        if award {
            self.score = self.score.saturating_add(vitals.point_value);
        }

        if let Some(remaining) = self.wave_members.get_mut(&member.wave) {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.wave_members.remove(&member.wave);
                self.outbox.push(WorldSignal::WaveDestroyed { wave: member.wave });
            }
        }

        self.living = self.living.saturating_sub(1);
        if self.living == 0 {
            self.outbox.push(WorldSignal::AgentsCleared);
        }
        true
    }

    fn next_wave_id(&mut self) -> WaveId {
        let id = WaveId(self.next_wave);
        self.next_wave = self.next_wave.wrapping_add(1);
        id
    }
}

fn upgraded(upgrades: Option<&StreamUpgradeSet>, field: UpgradeField, base: f64) -> f64 {
    upgrades.map_or(base, |set| set.get(field, base))
}

impl WaveFactory for Arena {
    fn create_wave(
        &mut self,
        template: &WaveTemplate,
        layer: i32,
        upgrades: Option<&StreamUpgradeSet>,
    ) -> Option<WaveHandle> {
        let blueprint = *self.catalog.get(&template.source)?;
        let id = self.next_wave_id();

        let count = upgrades.map_or(blueprint.enemy_count, |set| {
            set.get_count(UpgradeField::EnemyCount, blueprint.enemy_count)
        });
        let vitals = Vitals {
            health: upgraded(upgrades, UpgradeField::Health, blueprint.health),
            shield: upgraded(upgrades, UpgradeField::Shield, blueprint.shield),
            point_value: upgrades.map_or(blueprint.point_value, |set| {
                set.get_int(UpgradeField::PointValue, blueprint.point_value)
            }),
            collision_damage: upgraded(
                upgrades,
                UpgradeField::CollisionDamage,
                blueprint.collision_damage,
            ),
        };
        let mover = Mover {
            speed: upgraded(upgrades, UpgradeField::MoverSpeed, blueprint.speed),
        };
        let weapon = Weapon {
            damage: upgraded(upgrades, UpgradeField::WeaponDamage, blueprint.weapon_damage),
            bullet_speed: upgraded(upgrades, UpgradeField::WeaponSpeed, blueprint.bullet_speed),
            fire_rate: upgraded(upgrades, UpgradeField::WeaponRate, blueprint.fire_rate),
        };

        let origin = DVec2::new(
            self.rng.gen_range(-SPAWN_HALF_WIDTH..=SPAWN_HALF_WIDTH),
            SPAWN_TOP,
        );
        for _ in 0..count {
            let jitter = DVec2::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            ) * blueprint.spread;
            self.world.spawn((
                Enemy,
                Position(origin + jitter),
                RenderLayer(layer),
                WaveMember { wave: id },
                vitals,
                mover,
                weapon,
            ));
        }

        if count == 0 {
            // Nothing to wait on; the wave is gone as soon as it exists.
            self.outbox.push(WorldSignal::WaveDestroyed { wave: id });
        } else {
            self.wave_members.insert(id, count);
            self.living += count;
        }

        Some(WaveHandle {
            id,
            enemy_count: blueprint.enemy_count,
        })
    }
}

impl AgentPopulation for Arena {
    fn living_agents(&self) -> u32 {
        self.living
    }
}

impl ScoreBoard for Arena {
    fn current_score(&self) -> i64 {
        self.score
    }

    fn record_high_score_if_greater(&mut self, score: i64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }
}

impl WaveWorld for Arena {
    fn drain_signals(&mut self, out: &mut Vec<WorldSignal>) {
        out.append(&mut self.outbox);
    }
}
