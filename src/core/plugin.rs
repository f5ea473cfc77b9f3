//! Core plugin that sets up screens, events, and the gameplay tick order.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Per-tick ordering of gameplay systems.
///
/// Intent decides what actors want to do (input, AI), Resolve applies
/// combat and stat rules, Animate advances sprites, Persist reports changes
/// to the character store. All of it only runs on the play screen.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Intent,
    Resolve,
    Animate,
    Persist,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - The [`Screen`] state (Login, Dashboard, PlayUI, ...)
/// - Global events (DamageEvent, DeathEvent, LevelUpEvent)
/// - The [`GameplaySet`] ordering
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<Screen>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<LevelUpEvent>()
            .configure_sets(
                Update,
                (
                    GameplaySet::Intent,
                    GameplaySet::Resolve,
                    GameplaySet::Animate,
                    GameplaySet::Persist,
                )
                    .chain()
                    .run_if(in_state(Screen::PlayUI)),
            )
            .add_systems(Update, log_screen_changes);
    }
}

/// Report every screen switch.
fn log_screen_changes(screen: Res<State<Screen>>) {
    if screen.is_changed() {
        info!("Screen: {:?}", screen.get());
    }
}
