//! Blockers on the ground plane.
//!
//! Obstacles are Rapier colliders: the static shapes of the world layout
//! and a ball around every enemy. Movement code asks its questions through
//! [`Terrain`], which the physics context answers.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use serde::Deserialize;

/// Outline of an obstacle as written in the data files.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub enum ObstacleShape {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

impl ObstacleShape {
    pub fn collider(self) -> Collider {
        match self {
            ObstacleShape::Circle { radius } => Collider::ball(radius),
            ObstacleShape::Rectangle { width, height } => {
                Collider::cuboid(width / 2.0, height / 2.0)
            }
        }
    }

    /// Bounding box, used to size placeholder sprites.
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleShape::Circle { radius } => Vec2::splat(radius * 2.0),
            ObstacleShape::Rectangle { width, height } => Vec2::new(width, height),
        }
    }
}

/// What movement planning needs to know about the ground.
pub trait Terrain {
    /// Whether `point` is inside an obstacle not owned by `exclude`.
    fn is_blocked(&self, point: Vec2, exclude: Entity) -> bool;

    /// Whether walking straight from `from` to `to` runs into an obstacle
    /// not owned by `exclude`.
    fn segment_blocked(&self, from: Vec2, to: Vec2, exclude: Entity) -> bool;
}

impl Terrain for RapierContext {
    fn is_blocked(&self, point: Vec2, exclude: Entity) -> bool {
        let mut blocked = false;
        self.intersections_with_point(
            point,
            QueryFilter::default().exclude_collider(exclude),
            |_| {
                blocked = true;
                false
            },
        );
        blocked
    }

    fn segment_blocked(&self, from: Vec2, to: Vec2, exclude: Entity) -> bool {
        let delta = to - from;
        let length = delta.length();
        if length <= f32::EPSILON {
            return false;
        }

        self.cast_ray(
            from,
            delta / length,
            length,
            true,
            QueryFilter::default().exclude_collider(exclude),
        )
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::hierarchy::HierarchyPlugin;
    use bevy::transform::TransformPlugin;

    /// A physics world holding `obstacles`, stepped until the query
    /// pipeline knows about them.
    fn physics_world(obstacles: &[(Vec2, ObstacleShape)]) -> (App, Vec<Entity>) {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            TransformPlugin,
            HierarchyPlugin,
            RapierPhysicsPlugin::<NoUserData>::default(),
        ));

        let owners = obstacles
            .iter()
            .map(|(position, shape)| {
                app.world_mut()
                    .spawn((Transform::from_translation(position.extend(0.0)), shape.collider()))
                    .id()
            })
            .collect();

        app.update();
        app.update();
        (app, owners)
    }

    fn with_terrain<R>(app: &mut App, check: impl FnOnce(&RapierContext) -> R) -> R {
        let mut contexts = app.world_mut().query::<&RapierContext>();
        check(contexts.single(app.world()))
    }

    #[test]
    fn circles_block_points_inside_only() {
        let (mut app, owners) =
            physics_world(&[(Vec2::new(5.0, 0.0), ObstacleShape::Circle { radius: 1.0 })]);
        let other = Entity::from_raw(9999);

        with_terrain(&mut app, |terrain| {
            assert!(terrain.is_blocked(Vec2::new(5.5, 0.5), other));
            assert!(!terrain.is_blocked(Vec2::new(6.5, 0.0), other));
            assert!(!terrain.is_blocked(Vec2::new(5.0, 0.0), owners[0]));
        });
    }

    #[test]
    fn rectangles_block_by_half_extents() {
        let (mut app, _) = physics_world(&[(
            Vec2::ZERO,
            ObstacleShape::Rectangle {
                width: 4.0,
                height: 2.0,
            },
        )]);
        let other = Entity::from_raw(9999);

        with_terrain(&mut app, |terrain| {
            assert!(terrain.is_blocked(Vec2::new(1.9, 0.9), other));
            assert!(!terrain.is_blocked(Vec2::new(1.9, 1.1), other));
            assert!(!terrain.is_blocked(Vec2::new(2.1, 0.0), other));
        });
    }

    #[test]
    fn walking_through_an_obstacle_is_blocked() {
        let (mut app, owners) = physics_world(&[
            (Vec2::new(2.0, 0.0), ObstacleShape::Circle { radius: 0.5 }),
            (
                Vec2::new(-2.0, 0.0),
                ObstacleShape::Rectangle {
                    width: 1.0,
                    height: 10.0,
                },
            ),
        ]);
        let other = Entity::from_raw(9999);

        with_terrain(&mut app, |terrain| {
            assert!(terrain.segment_blocked(Vec2::ZERO, Vec2::new(4.0, 0.2), other));
            assert!(!terrain.segment_blocked(Vec2::ZERO, Vec2::new(4.0, 2.0), other));
            assert!(!terrain.segment_blocked(Vec2::ZERO, Vec2::new(1.0, 0.0), other));
            assert!(terrain.segment_blocked(Vec2::ZERO, Vec2::new(-4.0, 1.0), other));

            // An enemy standing in its own ball walks out freely.
            assert!(!terrain.segment_blocked(Vec2::new(2.0, 0.0), Vec2::new(4.0, 1.0), owners[0]));
        });
    }
}
