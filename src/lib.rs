//! Iso RPG - a sprite-based isometric action RPG in Bevy.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Screens, global events, direction math, deferred tasks
//! - **Animation**: Sprite cycle tables and per-actor animators
//! - **Combat**: Attack gate, deferred strikes, targeting
//! - **Player**: Keyboard movement, spells, leveling, regeneration
//! - **Enemies**: Movement planning, spawning and respawning
//! - **World**: Data files, play area, obstacles
//! - **Account**: Sign in, character records, saving progress
//!
//! Obstacles are Rapier colliders; add `RapierPhysicsPlugin` next to
//! [`IsoRpgPlugin`].

pub mod account;
pub mod animation;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct IsoRpgPlugin;

impl Plugin for IsoRpgPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Sprite animation
            .add_plugins(animation::AnimationPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Accounts and saving
            .add_plugins(account::AccountPlugin);
    }
}
