//! Core game module - screens, events, direction math and deferred tasks.
//!
//! This module provides the foundation that all other game systems build upon.

mod direction;
mod events;
mod plugin;
mod schedule;
mod states;

pub use direction::*;
pub use events::*;
pub use plugin::{CorePlugin, GameplaySet};
pub use schedule::*;
pub use states::*;
