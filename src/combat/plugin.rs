//! Combat plugin - attack gate, strikes, and targeting.

use bevy::prelude::*;

use super::resolver::{self, AttackIntent, PendingStrike};
use super::selection::{self, Selection};
use crate::animation::AttackAnimationFinished;
use crate::core::{DamageEvent, DeathEvent, GameplaySet, TaskQueue};
use crate::player::Player;

/// Combat plugin - handles attacks for the player and enemies alike.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Selection>()
            .init_resource::<TaskQueue<PendingStrike>>()
            .add_event::<AttackIntent>()
            .add_systems(
                Update,
                (selection::select_nearest_enemy, selection::player_auto_attack)
                    .chain()
                    .in_set(GameplaySet::Intent),
            )
            .add_systems(
                Update,
                (
                    resolver::begin_attacks,
                    resolver::resolve_strikes,
                    report_combat,
                )
                    .chain()
                    .in_set(GameplaySet::Resolve),
            );
    }
}

/// Log swings, hits, and player deaths. The player has no death flow; it
/// stays where it fell.
fn report_combat(
    mut swings: EventReader<AttackAnimationFinished>,
    mut damage_events: EventReader<DamageEvent>,
    mut death_events: EventReader<DeathEvent>,
    players: Query<(), With<Player>>,
) {
    for swing in swings.read() {
        trace!("{:?} finished its swing", swing.entity);
    }
    for event in damage_events.read() {
        debug!("{:?} hit {:?} for {}", event.source, event.target, event.amount);
    }
    for event in death_events.read() {
        if players.contains(event.entity) {
            info!("Player died");
        }
    }
}
