//! Systems that drive animators and mirror them onto sprites.

use std::collections::HashMap;

use bevy::prelude::*;

use super::animator::{AnimationTick, Heading, SpriteAnimator};
use super::cycles::AnimKind;
use crate::core::Facing;

/// Sent when an attack cycle ran to its end.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackAnimationFinished {
    pub entity: Entity,
}

/// Advance every animator of facing `D` and return finished attacks to
/// their movement cycle.
pub fn tick_animators<D: Facing>(
    time: Res<Time>,
    mut animators: Query<(Entity, &mut SpriteAnimator<D>, Option<&Heading<D>>)>,
    mut finished: EventWriter<AttackAnimationFinished>,
) {
    let dt = time.delta_secs();

    for (entity, mut animator, heading) in animators.iter_mut() {
        if animator.tick(dt) != AnimationTick::Completed {
            continue;
        }

        let (kind, direction) = match heading {
            Some(heading) if heading.moving => (AnimKind::Move, heading.direction),
            Some(heading) => (AnimKind::Idle, heading.direction),
            None => (AnimKind::Idle, animator.direction()),
        };
        animator.transition(kind, direction);
        finished.send(AttackAnimationFinished { entity });
    }
}

/// Copy the visible frame into the sprite's texture atlas.
pub fn sync_sprites<D: Facing>(
    mut sprites: Query<(&SpriteAnimator<D>, &mut Sprite), Changed<SpriteAnimator<D>>>,
) {
    for (animator, mut sprite) in sprites.iter_mut() {
        let Some(index) = animator.current_index() else {
            continue;
        };
        if let Some(atlas) = sprite.texture_atlas.as_mut() {
            if atlas.index != index {
                atlas.index = index;
            }
        }
    }
}

/// Give freshly spawned animators a sprite cut from their sheet.
///
/// Headless apps have no asset server; their animators simply stay
/// invisible.
pub fn attach_sprites<D: Facing>(
    mut commands: Commands,
    asset_server: Option<Res<AssetServer>>,
    layouts: Option<ResMut<Assets<TextureAtlasLayout>>>,
    mut cache: Local<HashMap<String, Handle<TextureAtlasLayout>>>,
    animators: Query<(Entity, &SpriteAnimator<D>), (Added<SpriteAnimator<D>>, Without<Sprite>)>,
) {
    let (Some(asset_server), Some(mut layouts)) = (asset_server, layouts) else {
        return;
    };

    for (entity, animator) in animators.iter() {
        let sheet = animator.set().sheet();
        let layout = cache
            .entry(sheet.image.clone())
            .or_insert_with(|| {
                layouts.add(TextureAtlasLayout::from_grid(
                    UVec2::new(sheet.tile_size.0, sheet.tile_size.1),
                    sheet.columns,
                    sheet.rows,
                    None,
                    None,
                ))
            })
            .clone();

        let mut sprite = Sprite::from_atlas_image(
            asset_server.load(sheet.image.clone()),
            TextureAtlas {
                layout,
                index: animator.current_index().unwrap_or(0),
            },
        );
        sprite.custom_size = Some(Vec2::new(sheet.display_size.0, sheet.display_size.1));
        commands.entity(entity).insert(sprite);
    }
}
