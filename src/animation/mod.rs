//! Animation module - sprite cycle tables and the per-actor animator.

mod animator;
pub(crate) mod cycles;
mod plugin;
mod systems;

pub use animator::*;
pub use cycles::*;
pub use plugin::AnimationPlugin;
pub use systems::AttackAnimationFinished;
