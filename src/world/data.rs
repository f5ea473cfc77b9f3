//! RON data loading shared by every registry, plus the world layout file.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::DataLoadError;
use super::obstacles::ObstacleShape;
use crate::animation::{AnimationSet, AnimationSetDef};
use crate::core::Facing;

/// Parse RON text. `origin` names the source in errors.
pub fn parse_ron<T: DeserializeOwned>(contents: &str, origin: &str) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: origin.to_string(),
        details: e.to_string(),
    })
}

/// Read and parse a RON file.
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    parse_ron(&contents, &display)
}

/// Every `.ron` file directly inside `dir`, sorted by name.
pub fn ron_files(dir: &Path) -> Result<Vec<PathBuf>, DataLoadError> {
    if !dir.exists() {
        return Err(DataLoadError::FileNotFound(dir.display().to_string()));
    }
    let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();
    Ok(files)
}

/// Parse and validate an animation table.
pub fn parse_animation_set<D: Facing + DeserializeOwned>(
    contents: &str,
    origin: &str,
) -> Result<AnimationSet<D>, DataLoadError> {
    let def: AnimationSetDef<D> = parse_ron(contents, origin)?;
    AnimationSet::from_def(def).map_err(|source| DataLoadError::InvalidAnimation {
        path: origin.to_string(),
        source,
    })
}

/// Read and validate an animation table file.
pub fn read_animation_set<D: Facing + DeserializeOwned>(
    path: &Path,
) -> Result<AnimationSet<D>, DataLoadError> {
    let display = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    parse_animation_set(&contents, &display)
}

/// An obstacle placed in the world.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedObstacle {
    pub position: (f32, f32),
    pub shape: ObstacleShape,
}

/// Static layout of the play area, `assets/data/world.ron`.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
pub struct WorldLayout {
    pub obstacles: Vec<PlacedObstacle>,
}

pub const WORLD_LAYOUT_PATH: &str = "assets/data/world.ron";

/// Load the world layout, falling back to an empty world.
pub fn load_world_layout(mut commands: Commands) {
    let layout = match read_ron::<WorldLayout>(Path::new(WORLD_LAYOUT_PATH)) {
        Ok(layout) => {
            info!("Loaded world layout with {} obstacles", layout.obstacles.len());
            layout
        }
        Err(e) => {
            error!("Failed to load world layout: {}", e);
            WorldLayout::default()
        }
    };
    commands.insert_resource(layout);
}
