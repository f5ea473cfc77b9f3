//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::spawning::{self, SpawnRoster};
use crate::core::{GameplaySet, Screen};

/// Enemy plugin - handles enemy definitions, spawning, AI, and respawns.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<SpawnRoster>()
            // Spawn entries are checked against the definitions
            .add_systems(
                Startup,
                (load_enemy_definitions, spawning::load_spawn_table).chain(),
            )
            .add_systems(OnEnter(Screen::PlayUI), spawning::spawn_roster)
            .add_systems(OnExit(Screen::PlayUI), spawning::despawn_enemies)
            .add_systems(
                Update,
                ai::plan_enemy_movement.in_set(GameplaySet::Intent),
            )
            .add_systems(
                Update,
                (spawning::handle_enemy_deaths, spawning::respawn_due)
                    .chain()
                    .in_set(GameplaySet::Resolve)
                    .after(crate::combat::resolve_strikes),
            );
    }
}
