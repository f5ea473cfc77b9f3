//! Creating and removing the player actor.

use std::path::Path;
use std::sync::Arc;

use bevy::prelude::*;

use super::components::*;
use super::progression::{Progression, Regeneration};
use super::spells::SpellBook;
use crate::account::CharacterRecord;
use crate::animation::{AnimationSet, Heading, SpriteAnimator};
use crate::combat::{CombatState, Health, Mana, Pool};
use crate::core::Compass;
use crate::world::read_animation_set;

pub const PLAYER_ANIMATIONS_PATH: &str = "assets/data/animations/player.ron";

/// The player's validated animation table.
#[derive(Resource, Debug, Clone)]
pub struct PlayerAnimations(pub Arc<AnimationSet<Compass>>);

/// Load the player's animation table. Without it the player is invisible
/// but still playable.
pub fn load_player_animations(mut commands: Commands) {
    match read_animation_set::<Compass>(Path::new(PLAYER_ANIMATIONS_PATH)) {
        Ok(set) => {
            info!("Loaded player animations");
            commands.insert_resource(PlayerAnimations(Arc::new(set)));
        }
        Err(e) => error!("Failed to load player animations: {}", e),
    }
}

/// Where a character should appear: its saved position, or the spawn
/// point when it has never moved.
pub fn spawn_position(record: &CharacterRecord, config: &PlayerConfig) -> Vec2 {
    if record.pos_x != 0.0 || record.pos_y != 0.0 {
        Vec2::new(record.pos_x, record.pos_y)
    } else {
        config.spawn_point
    }
}

/// Spawn the player from a character record and register it with the
/// locator.
pub fn spawn_player(
    commands: &mut Commands,
    locator: &mut PlayerLocator,
    record: &CharacterRecord,
    config: &PlayerConfig,
    animations: Option<&PlayerAnimations>,
) -> Entity {
    let position = spawn_position(record, config);
    let speed = if record.speed > 0.0 {
        record.speed
    } else {
        config.move_speed
    };

    let mut player = commands.spawn((
        Player,
        Transform::from_xyz(position.x, position.y, 1.0),
        Health(Pool::new(record.current_health, record.max_health)),
        Mana(Pool::new(record.current_mana, record.max_mana)),
        Progression {
            level: record.level.max(1),
            experience: record.experience,
            gold: record.gold_amount,
        },
        MoveSpeed(speed),
        config.weapon,
        CombatState::default(),
        Regeneration::default(),
        SpellBook::default(),
        Heading::new(Compass::N),
    ));
    if let Some(animations) = animations {
        player.insert(SpriteAnimator::new(animations.0.clone(), Compass::N));
    }

    let entity = player.id();
    locator.register(entity);
    info!("Spawned player at ({:.1}, {:.1})", position.x, position.y);
    entity
}

/// Remove the player when leaving the play screen.
pub fn despawn_player(
    mut commands: Commands,
    mut locator: ResMut<PlayerLocator>,
    players: Query<Entity, With<Player>>,
) {
    for entity in players.iter() {
        commands.entity(entity).despawn_recursive();
    }
    locator.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsaved_characters_use_the_spawn_point() {
        let config = PlayerConfig {
            spawn_point: Vec2::new(3.0, -2.0),
            ..default()
        };
        let fresh = CharacterRecord::default();
        assert_eq!(spawn_position(&fresh, &config), Vec2::new(3.0, -2.0));

        let moved = CharacterRecord {
            pos_x: 0.0,
            pos_y: 4.5,
            ..default()
        };
        assert_eq!(spawn_position(&moved, &config), Vec2::new(0.0, 4.5));
    }
}
