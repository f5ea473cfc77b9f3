//! Animation plugin - sprite cycles for the player and enemies.

use bevy::prelude::*;

use super::systems::*;
use crate::core::{Compass, GameplaySet, IsoQuadrant};

/// Animates the player (eight compass facings) and enemies (four
/// isometric quadrants).
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackAnimationFinished>().add_systems(
            Update,
            (
                (tick_animators::<Compass>, tick_animators::<IsoQuadrant>),
                (attach_sprites::<Compass>, attach_sprites::<IsoQuadrant>),
                (sync_sprites::<Compass>, sync_sprites::<IsoQuadrant>),
            )
                .chain()
                .in_set(GameplaySet::Animate),
        );
    }
}
