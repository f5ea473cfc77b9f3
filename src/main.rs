//! Iso RPG - Entry Point
//!
//! Controls:
//! - WASD / arrows: Move
//! - Tab: Select the nearest enemy (attacks it while in reach)
//! - F1: Heal
//! - Escape: Back to the dashboard
//!
//! There are no menu widgets; a local demo account signs in and plays its
//! character straight away. Progress is saved to `saves/characters.json`.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use iso_rpg::account::{
    character_path, AccountCommand, Auth, CharacterForm, JsonFileStore, MemoryIdentity, SignUpForm,
    Store,
};

const SAVE_FILE: &str = "saves/characters.json";
const DEMO_EMAIL: &str = "demo@iso-rpg.local";
const DEMO_PASSWORD: &str = "demo-password";
const DEMO_CHARACTER: &str = "Wanderer";

fn main() {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Iso RPG".to_string(),
                    resolution: (1280.0, 720.0).into(),
                    ..default()
                }),
                ..default()
            })
            // Pixel art
            .set(ImagePlugin::default_nearest()),
    );

    match JsonFileStore::open(SAVE_FILE) {
        Ok(store) => {
            app.insert_resource(Store(Box::new(store)));
        }
        Err(e) => error!("Falling back to in-memory saves: {}", e),
    }
    app.insert_resource(Auth(Box::new(MemoryIdentity::default())));

    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(iso_rpg::IsoRpgPlugin)
        .add_systems(Startup, (spawn_camera, sign_in_demo_account))
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale: 1.0 / 48.0,
            ..OrthographicProjection::default_2d()
        },
    ));
}

/// Sign up the demo account and jump into its character.
fn sign_in_demo_account(store: Res<Store>, mut requests: EventWriter<AccountCommand>) {
    requests.send(AccountCommand::SignUp(SignUpForm {
        account_name: "Demo".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
        confirm_password: DEMO_PASSWORD.to_string(),
    }));

    // MemoryIdentity numbers users from 1, so the demo user is always the first.
    let path = character_path("user-1", DEMO_CHARACTER);
    if !matches!(store.0.read(&path), Ok(Some(_))) {
        requests.send(AccountCommand::CreateCharacter(CharacterForm {
            name: DEMO_CHARACTER.to_string(),
        }));
    }
    requests.send(AccountCommand::SelectCharacter(DEMO_CHARACTER.to_string()));
}
