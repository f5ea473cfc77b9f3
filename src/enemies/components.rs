//! Enemy-related components.

use bevy::prelude::*;

/// Marker component for all enemies.
#[derive(Component, Debug)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct EnemyType(pub String);

/// Per-type numbers that are not already covered by combat components.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub move_speed: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self { move_speed: 2.0 }
    }
}
