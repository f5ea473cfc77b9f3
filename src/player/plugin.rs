//! Player plugin - movement, spells, leveling, and regeneration.

use bevy::prelude::*;

use super::components::*;
use super::movement;
use super::progression::{self, LevelCurve, RegenConfig};
use super::spawning;
use super::spells;
use crate::core::{GameplaySet, Screen};

/// Player plugin - handles the player actor from spawn to despawn.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .init_resource::<PlayerLocator>()
            .init_resource::<LevelCurve>()
            .init_resource::<RegenConfig>()
            .add_systems(Startup, spawning::load_player_animations)
            .add_systems(OnExit(Screen::PlayUI), spawning::despawn_player)
            .add_systems(
                Update,
                (movement::player_movement, spells::cast_spells).in_set(GameplaySet::Intent),
            )
            .add_systems(
                Update,
                (progression::apply_level_ups, progression::regenerate_pools)
                    .in_set(GameplaySet::Resolve)
                    .after(crate::combat::resolve_strikes),
            );
    }
}
