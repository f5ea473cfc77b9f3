//! Screen state that controls the overall flow of the client.
//!
//! The presentation layer shows exactly one screen at a time. Gameplay
//! systems only run while [`Screen::PlayUI`] is active.

use bevy::prelude::*;

/// Mutually exclusive client screens.
///
/// - Start on `Login`
/// - `CreateAccount` registers a new identity
/// - `Dashboard` lists the signed-in user's characters
/// - `CreateCharacter` / `ManageAccount` are reached from the dashboard
/// - `PlayUI` is active gameplay with a character in the world
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Screen {
    #[default]
    Login,
    CreateAccount,
    Dashboard,
    CreateCharacter,
    ManageAccount,
    PlayUI,
}
