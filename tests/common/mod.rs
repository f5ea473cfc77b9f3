//! Headless app helpers shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::hierarchy::HierarchyPlugin;
use bevy::state::app::StatesPlugin;
use bevy::transform::TransformPlugin;
use bevy_rapier2d::prelude::*;

use iso_rpg::account::{AccountCommand, CharacterForm, SignUpForm};
use iso_rpg::player::PlayerLocator;
use iso_rpg::IsoRpgPlugin;

pub const EMAIL: &str = "tester@example.com";
pub const PASSWORD: &str = "hunter22";
/// The first account a `MemoryIdentity` creates.
pub const USER_ID: &str = "user-1";

/// The whole game, physics included, without windows, rendering, or a
/// real clock. Startup has already run, so data files are loaded.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        StatesPlugin,
        TransformPlugin,
        HierarchyPlugin,
        RapierPhysicsPlugin::<NoUserData>::default(),
    ))
    .init_resource::<Time>()
    .init_resource::<ButtonInput<KeyCode>>()
    .add_plugins(IsoRpgPlugin);
    app.update();
    app
}

/// Advance the clock by `secs` and run one frame.
pub fn advance(app: &mut App, secs: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(secs));
    app.update();
}

/// Run frames of `dt` until `secs` have passed.
pub fn run_for(app: &mut App, secs: f32, dt: f32) {
    let frames = (secs / dt).round() as usize;
    for _ in 0..frames {
        advance(app, dt);
    }
}

pub fn elapsed(app: &App) -> f32 {
    app.world().resource::<Time>().elapsed_secs()
}

/// Sign up, create `name`, and enter the game with it. Returns the player.
pub fn play_as(app: &mut App, name: &str) -> Entity {
    let world = app.world_mut();
    world.send_event(AccountCommand::SignUp(SignUpForm {
        account_name: "Tester".to_string(),
        email: EMAIL.to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
    }));
    world.send_event(AccountCommand::CreateCharacter(CharacterForm {
        name: name.to_string(),
    }));
    world.send_event(AccountCommand::SelectCharacter(name.to_string()));

    // Commands run this frame, the screen switches on the next.
    advance(app, 0.0);
    advance(app, 0.0);

    app.world()
        .resource::<PlayerLocator>()
        .get()
        .expect("player was not spawned")
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}
