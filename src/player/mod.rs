//! Player module - the player actor, its movement, spells, and growth.

mod components;
mod movement;
mod plugin;
mod progression;
mod spawning;
mod spells;

pub use components::*;
pub use movement::{isometric_velocity, movement_input};
pub use plugin::PlayerPlugin;
pub use progression::*;
pub use spawning::{
    despawn_player, spawn_player, spawn_position, PlayerAnimations, PLAYER_ANIMATIONS_PATH,
};
pub use spells::*;
