//! Enemy AI: run each enemy's planner and apply the result.

use bevy::prelude::*;
use bevy_rapier2d::prelude::RapierContext;

use super::components::{Enemy, EnemyStats};
use super::planner::{MovementState, TickInput};
use crate::animation::{Heading, SpriteAnimator};
use crate::combat::{AttackIntent, CombatState, Dead};
use crate::core::IsoQuadrant;
use crate::player::{Player, PlayerLocator};

/// Move, turn, and attack for every living enemy.
///
/// Enemies hold still while a swing is in progress, like the player, but
/// keep tracking the player's distance.
pub fn plan_enemy_movement(
    time: Res<Time>,
    locator: Res<PlayerLocator>,
    rapier: Query<&RapierContext>,
    players: Query<&Transform, (With<Player>, Without<Dead>, Without<Enemy>)>,
    mut enemies: Query<
        (
            Entity,
            &mut Transform,
            &EnemyStats,
            &CombatState,
            &mut MovementState,
            &mut Heading<IsoQuadrant>,
            Option<&mut SpriteAnimator<IsoQuadrant>>,
        ),
        (With<Enemy>, Without<Dead>, Without<Player>),
    >,
    mut intents: EventWriter<AttackIntent>,
) {
    let Ok(terrain) = rapier.get_single() else {
        return;
    };
    let dt = time.delta_secs();
    let player = locator
        .get()
        .and_then(|entity| Some((entity, players.get(entity).ok()?)));
    let mut rng = rand::thread_rng();

    for (entity, mut transform, stats, combat, mut state, mut heading, animator) in
        enemies.iter_mut()
    {
        let input = TickInput {
            entity,
            position: transform.translation.truncate(),
            player: player.map(|(_, t)| t.translation.truncate()),
            speed: stats.move_speed,
            dt,
        };

        if combat.is_attacking {
            state.hold(input, terrain, &mut rng);
            continue;
        }

        let plan = state.tick(input, terrain, &mut rng);

        if plan.position != transform.translation.truncate() {
            transform.translation.x = plan.position.x;
            transform.translation.y = plan.position.y;
        }

        if heading.direction != state.heading || heading.moving != state.moving {
            heading.direction = state.heading;
            heading.moving = state.moving;
        }

        if let (Some((kind, direction)), Some(mut animator)) = (plan.cue, animator) {
            animator.transition(kind, direction);
        }

        if plan.attack {
            if let Some((target, _)) = player {
                intents.send(AttackIntent {
                    attacker: entity,
                    target,
                });
            }
        }
    }
}
