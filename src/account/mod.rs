//! Account module - sign in, character records, and saving progress.

mod flow;
mod identity;
mod plugin;
mod record;
mod store;
mod sync;

pub use flow::*;
pub use identity::*;
pub use plugin::AccountPlugin;
pub use record::CharacterRecord;
pub use store::*;
pub use sync::{snapshot, ActiveCharacter, SyncConfig};
