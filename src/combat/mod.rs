//! Combat module - health, attacks, deferred strikes, and targeting.

mod components;
mod plugin;
mod resolver;
mod selection;

pub use components::*;
pub use plugin::CombatPlugin;
pub use resolver::{
    attempt_attack, begin_attacks, resolve_strikes, AttackIntent, AttackRejection, PendingStrike,
};
pub use selection::Selection;
