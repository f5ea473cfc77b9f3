//! Attack gate and deferred strike resolution.
//!
//! An attack starts with an [`AttackIntent`]. If the gate accepts it the
//! attacker is locked, its attack cycle starts, and a [`PendingStrike`] is
//! queued for when the swing ends. The strike lands (or fizzles, if the
//! target is gone) when the queue says it is due.

use std::collections::HashSet;

use bevy::prelude::*;
use thiserror::Error;

use super::components::*;
use super::selection::Selection;
use crate::animation::SpriteAnimator;
use crate::core::{Compass, DamageEvent, DeathEvent, Facing, IsoQuadrant, TaskQueue};
use crate::player::Progression;

/// Request for `attacker` to hit `target`. Rejected requests are no-ops,
/// so AI and input may send one every tick.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub target: Entity,
}

/// Why an attack attempt did nothing.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum AttackRejection {
    #[error("attacker is already mid-swing")]
    AlreadyAttacking,

    #[error("target is missing or dead")]
    TargetAbsent,

    #[error("target is {distance:.2} away, reach is {reach:.2}")]
    OutOfReach { distance: f32, reach: f32 },

    #[error("weapon ready in {remaining:.2}s")]
    CoolingDown { remaining: f32 },
}

/// Decide whether an attack may start at `now`. `distance` is `None` when
/// the target does not exist.
pub fn attempt_attack(
    state: &CombatState,
    weapon: &MeleeWeapon,
    distance: Option<f32>,
    now: f32,
) -> Result<(), AttackRejection> {
    if state.is_attacking {
        return Err(AttackRejection::AlreadyAttacking);
    }

    let distance = distance.ok_or(AttackRejection::TargetAbsent)?;
    if distance > weapon.reach {
        return Err(AttackRejection::OutOfReach {
            distance,
            reach: weapon.reach,
        });
    }

    let remaining = state.cooldown_remaining(weapon.cooldown, now);
    if remaining > 0.0 {
        return Err(AttackRejection::CoolingDown { remaining });
    }

    Ok(())
}

/// Damage waiting for an attack animation to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStrike {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Start the attack cycle facing `facing` and return how long it lasts.
/// Sets without an attack cycle swing instantly.
fn swing<D: Facing>(animator: &mut SpriteAnimator<D>, facing: D) -> f32 {
    match animator.set().attack_duration(facing) {
        Some(duration) => {
            animator.play_attack(facing);
            duration
        }
        None => 0.0,
    }
}

/// Run the attack gate for every intent and queue accepted strikes.
pub fn begin_attacks(
    time: Res<Time>,
    mut intents: EventReader<AttackIntent>,
    mut strikes: ResMut<TaskQueue<PendingStrike>>,
    mut attackers: Query<
        (
            &Transform,
            &mut CombatState,
            &MeleeWeapon,
            Option<&mut SpriteAnimator<Compass>>,
            Option<&mut SpriteAnimator<IsoQuadrant>>,
        ),
        Without<Dead>,
    >,
    targets: Query<&Transform, (With<Health>, Without<Dead>)>,
) {
    let now = time.elapsed_secs();

    for intent in intents.read() {
        let Ok((transform, mut state, weapon, compass, quadrant)) =
            attackers.get_mut(intent.attacker)
        else {
            continue;
        };

        let origin = transform.translation.truncate();
        let offset = targets
            .get(intent.target)
            .ok()
            .map(|target| target.translation.truncate() - origin);

        if let Err(reason) = attempt_attack(&state, weapon, offset.map(Vec2::length), now) {
            trace!("Attack by {:?} rejected: {}", intent.attacker, reason);
            continue;
        }
        let offset = offset.unwrap_or(Vec2::ZERO);

        state.lock(now);

        let mut duration = 0.0;
        if let Some(mut animator) = compass {
            let facing = Compass::from_vector(offset).unwrap_or(animator.direction());
            duration = swing(&mut animator, facing);
        } else if let Some(mut animator) = quadrant {
            duration = swing(&mut animator, IsoQuadrant::best_match(offset));
        }

        debug!(
            "{:?} attacks {:?}, strike lands in {:.2}s",
            intent.attacker, intent.target, duration
        );
        strikes.schedule(
            now + duration,
            PendingStrike {
                attacker: intent.attacker,
                target: intent.target,
                damage: weapon.damage,
            },
        );
    }
}

/// Apply every strike whose swing has finished.
pub fn resolve_strikes(
    mut commands: Commands,
    time: Res<Time>,
    mut strikes: ResMut<TaskQueue<PendingStrike>>,
    mut selection: ResMut<Selection>,
    mut combatants: Query<&mut CombatState>,
    mut targets: Query<(&mut Health, Option<&Bounty>), Without<Dead>>,
    mut progressions: Query<&mut Progression>,
    mut damage_events: EventWriter<DamageEvent>,
    mut death_events: EventWriter<DeathEvent>,
) {
    let now = time.elapsed_secs();
    let mut rng = rand::thread_rng();
    // Dead is only inserted once commands apply
    let mut died_this_tick = HashSet::new();

    for strike in strikes.drain_due(now) {
        if let Ok(mut state) = combatants.get_mut(strike.attacker) {
            state.release();
        }

        if died_this_tick.contains(&strike.target) {
            continue;
        }
        let Ok((mut health, bounty)) = targets.get_mut(strike.target) else {
            continue;
        };

        let amount = health.take_damage(strike.damage);
        damage_events.send(DamageEvent {
            target: strike.target,
            source: strike.attacker,
            amount,
        });
        if !health.is_dead() {
            continue;
        }

        died_this_tick.insert(strike.target);
        selection.clear_if(strike.target);

        if let (Some(bounty), Ok(mut progression)) =
            (bounty, progressions.get_mut(strike.attacker))
        {
            let reward = bounty.roll(&mut rng);
            progression.grant(reward);
            info!(
                "Gained {} experience and {} gold",
                reward.experience, reward.gold
            );
        }

        commands.entity(strike.target).insert(Dead);
        death_events.send(DeathEvent {
            entity: strike.target,
            killed_by: Some(strike.attacker),
        });
    }
}
