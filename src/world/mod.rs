//! World module - data files, the play area, and obstacles.

mod data;
mod error;
mod obstacles;
mod plugin;

pub use data::*;
pub use error::DataLoadError;
pub use obstacles::*;
pub use plugin::{setup_world, WorldGeometry, WorldPlugin};
