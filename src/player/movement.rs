//! Keyboard movement on the isometric ground plane.

use bevy::prelude::*;
use bevy_rapier2d::prelude::RapierContext;

use super::components::*;
use crate::animation::{AnimKind, Heading, SpriteAnimator};
use crate::combat::{CombatState, Dead};
use crate::core::Compass;
use crate::world::Terrain;

/// Raw 8-way input from WASD and the arrow keys. Each axis is -1, 0 or 1.
pub fn movement_input(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut input = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        input.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        input.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        input.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        input.x += 1.0;
    }
    input
}

/// Velocity for an input: vertical squashed for the 2:1 projection, then
/// normalised to `speed`.
pub fn isometric_velocity(input: Vec2, vertical_factor: f32, speed: f32) -> Vec2 {
    Vec2::new(input.x, input.y * vertical_factor).normalize_or_zero() * speed
}

/// Move the player and pick its Move or Idle cycle.
///
/// Nothing moves or turns while an attack is in progress.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    rapier: Query<&RapierContext>,
    mut players: Query<
        (
            Entity,
            &mut Transform,
            &MoveSpeed,
            &CombatState,
            &mut Heading<Compass>,
            Option<&mut SpriteAnimator<Compass>>,
        ),
        (With<Player>, Without<Dead>),
    >,
) {
    let Ok((entity, mut transform, speed, combat, mut heading, animator)) =
        players.get_single_mut()
    else {
        return;
    };

    if combat.is_attacking {
        return;
    }

    let input = movement_input(&keyboard);
    let (kind, facing) = match Compass::from_vector(input) {
        Some(direction) => {
            let velocity = isometric_velocity(input, config.vertical_factor, speed.0);
            let next = transform.translation.truncate() + velocity * time.delta_secs();
            let blocked = rapier
                .get_single()
                .is_ok_and(|terrain| terrain.is_blocked(next, entity));
            if !blocked {
                transform.translation.x = next.x;
                transform.translation.y = next.y;
            }
            (AnimKind::Move, direction)
        }
        None => (AnimKind::Idle, heading.direction),
    };

    let moving = kind == AnimKind::Move;
    if heading.direction != facing || heading.moving != moving {
        heading.direction = facing;
        heading.moving = moving;
    }
    if let Some(mut animator) = animator {
        animator.transition(kind, facing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_input_is_squashed_then_normalised() {
        let velocity = isometric_velocity(Vec2::new(1.0, 1.0), 0.5, 4.0);
        assert!((velocity.length() - 4.0).abs() < 1e-5);
        // Twice as much horizontal as vertical travel.
        assert!((velocity.x - 2.0 * velocity.y).abs() < 1e-5);
    }

    #[test]
    fn no_input_no_velocity() {
        assert_eq!(isometric_velocity(Vec2::ZERO, 0.5, 4.0), Vec2::ZERO);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyA);
        keyboard.press(KeyCode::ArrowRight);
        keyboard.press(KeyCode::KeyW);
        assert_eq!(movement_input(&keyboard), Vec2::new(0.0, 1.0));
    }
}
