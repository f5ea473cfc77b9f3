//! Enemies module - enemy entities, movement planning, and respawning.

mod ai;
mod components;
pub mod data;
pub mod planner;
mod plugin;
pub mod spawning;

pub use ai::plan_enemy_movement;
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry, LoadedEnemy};
pub use planner::{MovementState, Phase, Plan, PlannerConfig, TickInput};
pub use plugin::EnemyPlugin;
pub use spawning::{spawn_enemy, SpawnLink, SpawnRoster};
