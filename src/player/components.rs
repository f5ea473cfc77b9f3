//! Player-related components and resources.

use bevy::prelude::*;

use crate::combat::MeleeWeapon;

/// Marker component for the player entity.
#[derive(Component, Debug)]
pub struct Player;

/// Walking speed in world units per second.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MoveSpeed(pub f32);

/// Tunables for the player character.
#[derive(Resource, Debug, Clone)]
pub struct PlayerConfig {
    /// Speed used when a character record has none
    pub move_speed: f32,
    /// Vertical input is scaled by this for the 2:1 isometric projection
    pub vertical_factor: f32,
    /// Where characters without a saved position appear
    pub spawn_point: Vec2,
    /// Starting melee weapon
    pub weapon: MeleeWeapon,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            vertical_factor: 0.5,
            spawn_point: Vec2::ZERO,
            weapon: MeleeWeapon::default(),
        }
    }
}

/// Handle of the live player actor, filled in when the player spawns.
///
/// Enemies and combat ask this instead of searching the world.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerLocator(Option<Entity>);

impl PlayerLocator {
    pub fn get(&self) -> Option<Entity> {
        self.0
    }

    pub fn register(&mut self, entity: Entity) {
        self.0 = Some(entity);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}
