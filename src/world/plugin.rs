//! World plugin - layout loading and static obstacles.

use bevy::prelude::*;

use super::data::{load_world_layout, WorldLayout};
use crate::core::Screen;

/// Marker for entities that belong to the play area and go away with it.
#[derive(Component, Debug)]
pub struct WorldGeometry;

/// World plugin - handles the play area's static obstacles.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_world_layout)
            .add_systems(OnEnter(Screen::PlayUI), setup_world)
            .add_systems(OnExit(Screen::PlayUI), cleanup_world);
    }
}

const OBSTACLE_COLOR: Color = Color::srgb(0.35, 0.3, 0.25);

/// Place the layout's obstacles as colliders with flat placeholder sprites.
pub fn setup_world(mut commands: Commands, layout: Option<Res<WorldLayout>>) {
    let Some(layout) = layout else {
        warn!("No world layout loaded, play area is empty");
        return;
    };

    for placed in &layout.obstacles {
        commands.spawn((
            WorldGeometry,
            placed.shape.collider(),
            Sprite {
                color: OBSTACLE_COLOR,
                custom_size: Some(placed.shape.size()),
                ..default()
            },
            Transform::from_xyz(placed.position.0, placed.position.1, -1.0),
        ));
    }
    info!("Placed {} obstacles", layout.obstacles.len());
}

/// Clean up world entities when leaving the play screen.
fn cleanup_world(mut commands: Commands, geometry: Query<Entity, With<WorldGeometry>>) {
    for entity in geometry.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
