//! Enemy spawning and respawning.
//!
//! Every entry of `assets/data/spawns.ron` owns at most one live enemy.
//! When that enemy dies the entry waits out its respawn delay and then
//! spawns a replacement somewhere inside its area.

use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;
use std::path::Path;

use bevy::prelude::*;
use bevy_rapier2d::prelude::Collider;
use rand::Rng;
use serde::Deserialize;

use super::components::{Enemy, EnemyType};
use super::data::EnemyRegistry;
use super::planner::MovementState;
use crate::animation::{Heading, SpriteAnimator};
use crate::combat::{CombatState, Health, Selection};
use crate::core::{DeathEvent, IsoQuadrant, TaskQueue};
use crate::world::{read_ron, DataLoadError};

pub const SPAWNS_PATH: &str = "assets/data/spawns.ron";

/// Disk enemies (re)appear in.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SpawnArea {
    pub center: (f32, f32),
    pub radius: f32,
    /// Used as the spawned enemy's z
    #[serde(default)]
    pub altitude: f32,
}

/// One roster entry.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SpawnConfig {
    pub name: String,
    /// Enemy definition key, the file stem under `assets/data/enemies`
    pub enemy: String,
    pub respawn_delay: f32,
    pub area: SpawnArea,
}

/// Contents of `spawns.ron`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SpawnTable {
    pub spawns: Vec<SpawnConfig>,
}

impl SpawnTable {
    /// Drop entries whose enemy type is unknown.
    pub fn validated(self, registry: &EnemyRegistry) -> (Vec<SpawnConfig>, Vec<DataLoadError>) {
        let mut errors = Vec::new();
        let configs = self
            .spawns
            .into_iter()
            .filter(|config| {
                let known = registry.get(&config.enemy).is_some();
                if !known {
                    errors.push(DataLoadError::UnknownEnemy {
                        spawn: config.name.clone(),
                        enemy: config.enemy.clone(),
                    });
                }
                known
            })
            .collect();
        (configs, errors)
    }
}

/// Ties a spawned enemy to its roster entry.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnLink(pub usize);

/// Spawn configs, their live instances, and pending respawns.
#[derive(Resource, Debug, Default)]
pub struct SpawnRoster {
    configs: Vec<SpawnConfig>,
    live: HashMap<usize, Entity>,
    pending: HashSet<usize>,
    respawns: TaskQueue<usize>,
}

impl SpawnRoster {
    pub fn new(configs: Vec<SpawnConfig>) -> Self {
        Self {
            configs,
            ..default()
        }
    }

    pub fn configs(&self) -> &[SpawnConfig] {
        &self.configs
    }

    pub fn config(&self, index: usize) -> Option<&SpawnConfig> {
        self.configs.get(index)
    }

    pub fn live(&self, index: usize) -> Option<Entity> {
        self.live.get(&index).copied()
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains(&index)
    }

    /// Entries with neither a live instance nor a pending respawn.
    pub fn vacant(&self) -> Vec<usize> {
        (0..self.configs.len())
            .filter(|index| !self.live.contains_key(index) && !self.pending.contains(index))
            .collect()
    }

    /// Record `entity` as the live instance of `index`. Refused when the
    /// entry already has one.
    pub fn claim(&mut self, index: usize, entity: Entity) -> bool {
        if index >= self.configs.len() || self.live.contains_key(&index) {
            return false;
        }
        self.pending.remove(&index);
        self.live.insert(index, entity);
        true
    }

    /// Handle the death of `entity`. Returns whether a respawn was
    /// scheduled; deaths of untracked or already handled instances are
    /// ignored.
    pub fn on_death(&mut self, index: usize, entity: Entity, now: f32) -> bool {
        if self.live.get(&index) != Some(&entity) || self.pending.contains(&index) {
            return false;
        }
        let Some(config) = self.configs.get(index) else {
            return false;
        };

        self.live.remove(&index);
        self.pending.insert(index);
        self.respawns.schedule(now + config.respawn_delay, index);
        true
    }

    /// Entries whose respawn delay has passed. They stay pending until
    /// claimed.
    pub fn due(&mut self, now: f32) -> Vec<usize> {
        self.respawns.drain_due(now)
    }

    /// Forget every instance and pending respawn.
    pub fn reset(&mut self) {
        self.live.clear();
        self.pending.clear();
        self.respawns = TaskQueue::default();
    }
}

/// Uniform point in a disk: `r = R·√u`, `θ = 2πv`.
pub fn random_point_in_disk(center: Vec2, radius: f32, rng: &mut impl Rng) -> Vec2 {
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = TAU * rng.gen::<f32>();
    center + Vec2::from_angle(theta) * r
}

/// Spawn one enemy of `enemy_type` at `position`.
pub fn spawn_enemy(
    commands: &mut Commands,
    registry: &EnemyRegistry,
    enemy_type: &str,
    position: Vec3,
) -> Option<Entity> {
    let Some(loaded) = registry.get(enemy_type) else {
        warn!("No definition found for enemy type: {}", enemy_type);
        return None;
    };
    let definition = &loaded.definition;

    let mut enemy = commands.spawn((
        Enemy,
        EnemyType(enemy_type.to_string()),
        definition.to_stats(),
        Transform::from_translation(position),
        Health::new(definition.max_health),
        definition.weapon,
        definition.bounty,
        CombatState::default(),
        MovementState::new(definition.planner, position.truncate()),
        Heading::new(IsoQuadrant::SE),
        Collider::ball(definition.obstacle_radius),
    ));
    if let Some(animations) = &loaded.animations {
        enemy.insert(SpriteAnimator::new(animations.clone(), IsoQuadrant::SE));
    }

    info!(
        "Spawned {} at ({:.1}, {:.1})",
        definition.name, position.x, position.y
    );
    Some(enemy.id())
}

fn spawn_for_entry(
    commands: &mut Commands,
    registry: &EnemyRegistry,
    roster: &mut SpawnRoster,
    index: usize,
    rng: &mut impl Rng,
) {
    let Some(config) = roster.config(index) else {
        return;
    };
    let area = config.area;
    let point = random_point_in_disk(Vec2::new(area.center.0, area.center.1), area.radius, rng);
    let enemy_type = config.enemy.clone();

    if let Some(entity) = spawn_enemy(commands, registry, &enemy_type, point.extend(area.altitude)) {
        commands.entity(entity).insert(SpawnLink(index));
        roster.claim(index, entity);
    }
}

/// Build the roster from `spawns.ron`. Runs after enemy definitions are
/// loaded so unknown types can be reported.
pub fn load_spawn_table(mut commands: Commands, registry: Res<EnemyRegistry>) {
    let table = match read_ron::<SpawnTable>(Path::new(SPAWNS_PATH)) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to load spawn table: {}", e);
            SpawnTable::default()
        }
    };

    let (configs, errors) = table.validated(&registry);
    for e in errors {
        warn!("{}", e);
    }
    info!("Loaded {} spawn entries", configs.len());
    commands.insert_resource(SpawnRoster::new(configs));
}

/// Fill every vacant roster entry when play starts.
pub fn spawn_roster(
    mut commands: Commands,
    registry: Res<EnemyRegistry>,
    mut roster: ResMut<SpawnRoster>,
) {
    let mut rng = rand::thread_rng();
    for index in roster.vacant() {
        spawn_for_entry(&mut commands, &registry, &mut roster, index, &mut rng);
    }
}

/// Remove dead enemies and schedule their respawns.
pub fn handle_enemy_deaths(
    mut commands: Commands,
    time: Res<Time>,
    mut deaths: EventReader<DeathEvent>,
    mut roster: ResMut<SpawnRoster>,
    mut selection: ResMut<Selection>,
    enemies: Query<Option<&SpawnLink>, With<Enemy>>,
) {
    let now = time.elapsed_secs();
    let mut handled = HashSet::new();

    for event in deaths.read() {
        let Ok(link) = enemies.get(event.entity) else {
            continue;
        };
        if !handled.insert(event.entity) {
            continue;
        }

        selection.clear_if(event.entity);
        if let Some(SpawnLink(index)) = link {
            if roster.on_death(*index, event.entity, now) {
                debug!("Spawn entry {} waiting to respawn", index);
            }
        }
        commands.entity(event.entity).despawn_recursive();
    }
}

/// Spawn replacements whose delay has passed.
pub fn respawn_due(
    mut commands: Commands,
    time: Res<Time>,
    registry: Res<EnemyRegistry>,
    mut roster: ResMut<SpawnRoster>,
) {
    let mut rng = rand::thread_rng();
    for index in roster.due(time.elapsed_secs()) {
        spawn_for_entry(&mut commands, &registry, &mut roster, index, &mut rng);
    }
}

/// Remove all enemies when leaving the play screen.
pub fn despawn_enemies(
    mut commands: Commands,
    mut roster: ResMut<SpawnRoster>,
    enemies: Query<Entity, With<Enemy>>,
) {
    for entity in enemies.iter() {
        commands.entity(entity).despawn_recursive();
    }
    roster.reset();
}
