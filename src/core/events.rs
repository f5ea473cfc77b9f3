//! Global events used for cross-system communication.
//!
//! Combat sends [`DamageEvent`]s and [`DeathEvent`]s, progression sends
//! [`LevelUpEvent`]s. Listeners (respawn, persistence sync, logging) react
//! without the senders knowing about them.

use bevy::prelude::*;

/// Sent after damage has been applied to an entity's health.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    /// Entity that lost health
    pub target: Entity,
    /// Entity whose attack landed
    pub source: Entity,
    /// Health actually removed (after clamping at zero)
    pub amount: u32,
}

/// Sent once when an entity's health reaches zero.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}

/// Sent for every level gained.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpEvent {
    pub entity: Entity,
    pub new_level: u32,
}
