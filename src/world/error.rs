//! Error types for game data loading.

use thiserror::Error;

use crate::animation::AnimationError;

/// Errors that can occur when loading RON data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// An animation table is incomplete.
    #[error("Invalid animation table '{path}': {source}")]
    InvalidAnimation {
        path: String,
        #[source]
        source: AnimationError,
    },

    /// A spawn entry names an enemy type with no definition.
    #[error("Spawn '{spawn}' refers to unknown enemy type '{enemy}'")]
    UnknownEnemy { spawn: String, enemy: String },
}
