//! Account plugin - identity, character storage, and the screen flow.

use bevy::prelude::*;

use super::flow::{self, AccountCommand, AccountStatus, CharacterList};
use super::identity::Auth;
use super::store::{flush_store_queue, Store, StoreOutcome, StoreQueue};
use super::sync::{self, SyncConfig};
use crate::core::{GameplaySet, Screen};

/// Account plugin - everything between launching the game and playing a
/// character, plus saving that character while it is played.
///
/// Uses in-memory identity and storage unless `Auth` / `Store` resources
/// were inserted before the plugin.
pub struct AccountPlugin;

impl Plugin for AccountPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Auth>()
            .init_resource::<Store>()
            .init_resource::<StoreQueue>()
            .init_resource::<SyncConfig>()
            .init_resource::<CharacterList>()
            .add_event::<AccountCommand>()
            .add_event::<AccountStatus>()
            .add_event::<StoreOutcome>()
            .add_systems(OnEnter(Screen::Dashboard), flow::refresh_character_list)
            .add_systems(
                OnExit(Screen::PlayUI),
                sync::save_on_leave.before(crate::player::despawn_player),
            )
            .add_systems(
                Update,
                (
                    flow::leave_game_on_escape.run_if(in_state(Screen::PlayUI)),
                    flow::handle_account_commands,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                sync::sync_active_character.in_set(GameplaySet::Persist),
            )
            .add_systems(Update, flush_store_queue.after(GameplaySet::Persist));
    }
}
