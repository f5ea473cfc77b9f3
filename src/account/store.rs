//! Key-value character storage.
//!
//! Stores are addressed by slash separated paths such as
//! `users/{id}/characters/{name}`. Gameplay never calls a store directly:
//! it pushes [`StoreRequest`]s onto the [`StoreQueue`] and a flush system
//! reports each result as a [`StoreOutcome`].

use std::fs;
use std::path::PathBuf;

use bevy::prelude::*;
use serde_json::Value;
use thiserror::Error;

/// Field name to value, one level deep.
pub type FieldMap = serde_json::Map<String, Value>;

pub fn characters_path(user_id: &str) -> String {
    format!("users/{user_id}/characters")
}

pub fn character_path(user_id: &str, name: &str) -> String {
    format!("{}/{name}", characters_path(user_id))
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("Nothing stored at '{0}'")]
    NotFound(String),

    #[error("Stored data at '{path}' is malformed: {details}")]
    Malformed { path: String, details: String },

    #[error("Write to '{path}' rejected: {reason}")]
    Rejected { path: String, reason: String },
}

pub trait CharacterStore: Send + Sync + 'static {
    /// Replace whatever is at `path` with `fields`.
    fn write(&mut self, path: &str, fields: FieldMap) -> Result<(), StoreError>;

    /// Merge `fields` into the existing object at `path`.
    fn update(&mut self, path: &str, fields: FieldMap) -> Result<(), StoreError>;

    fn read(&self, path: &str) -> Result<Option<Value>, StoreError>;
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A store holding one JSON tree in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    root: FieldMap,
}

impl MemoryStore {
    pub fn from_tree(root: FieldMap) -> Self {
        Self { root }
    }

    pub fn tree(&self) -> &FieldMap {
        &self.root
    }

    fn node_mut(&mut self, path: &str, create: bool) -> Result<&mut FieldMap, StoreError> {
        let mut node = &mut self.root;
        for segment in segments(path) {
            if create && !matches!(node.get(segment), Some(Value::Object(_))) {
                node.insert(segment.to_string(), Value::Object(FieldMap::new()));
            }
            node = match node.get_mut(segment) {
                Some(Value::Object(child)) => child,
                Some(_) => {
                    return Err(StoreError::Rejected {
                        path: path.to_string(),
                        reason: format!("'{segment}' is not an object"),
                    })
                }
                None => return Err(StoreError::NotFound(path.to_string())),
            };
        }
        Ok(node)
    }
}

impl CharacterStore for MemoryStore {
    fn write(&mut self, path: &str, fields: FieldMap) -> Result<(), StoreError> {
        if segments(path).next().is_none() {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                reason: "empty path".to_string(),
            });
        }
        let node = self.node_mut(path, true)?;
        *node = fields;
        Ok(())
    }

    fn update(&mut self, path: &str, fields: FieldMap) -> Result<(), StoreError> {
        let node = self.node_mut(path, false)?;
        node.extend(fields);
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let mut node = &self.root;
        let mut parts = segments(path).peekable();
        while let Some(segment) = parts.next() {
            match node.get(segment) {
                Some(Value::Object(child)) => node = child,
                Some(leaf) if parts.peek().is_none() => return Ok(Some(leaf.clone())),
                _ => return Ok(None),
            }
        }
        Ok(Some(Value::Object(node.clone())))
    }
}

/// A [`MemoryStore`] mirrored to a JSON file after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file doesn't exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let display = path.display().to_string();

        let inner = match fs::read_to_string(&path) {
            Ok(contents) => {
                let root = serde_json::from_str(&contents).map_err(|e| StoreError::Malformed {
                    path: display,
                    details: e.to_string(),
                })?;
                MemoryStore::from_tree(root)
            }
            Err(_) => MemoryStore::default(),
        };
        Ok(Self { path, inner })
    }

    fn persist(&self) -> Result<(), StoreError> {
        let rejected = |reason: String| StoreError::Rejected {
            path: self.path.display().to_string(),
            reason,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| rejected(e.to_string()))?;
        }
        let contents =
            serde_json::to_string_pretty(self.inner.tree()).map_err(|e| rejected(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| rejected(e.to_string()))
    }
}

impl CharacterStore for JsonFileStore {
    fn write(&mut self, path: &str, fields: FieldMap) -> Result<(), StoreError> {
        self.inner.write(path, fields)?;
        self.persist()
    }

    fn update(&mut self, path: &str, fields: FieldMap) -> Result<(), StoreError> {
        self.inner.update(path, fields)?;
        self.persist()
    }

    fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.inner.read(path)
    }
}

/// The game's character store.
#[derive(Resource)]
pub struct Store(pub Box<dyn CharacterStore>);

impl Default for Store {
    fn default() -> Self {
        Self(Box::new(MemoryStore::default()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    Write { path: String, fields: FieldMap },
    Update { path: String, fields: FieldMap },
}

impl StoreRequest {
    pub fn path(&self) -> &str {
        match self {
            StoreRequest::Write { path, .. } | StoreRequest::Update { path, .. } => path,
        }
    }
}

/// Requests waiting for the next flush.
#[derive(Resource, Debug, Default)]
pub struct StoreQueue(pub Vec<StoreRequest>);

impl StoreQueue {
    pub fn update(&mut self, path: impl Into<String>, fields: FieldMap) {
        self.0.push(StoreRequest::Update {
            path: path.into(),
            fields,
        });
    }

    pub fn write(&mut self, path: impl Into<String>, fields: FieldMap) {
        self.0.push(StoreRequest::Write {
            path: path.into(),
            fields,
        });
    }
}

/// Result of one flushed request. Never refers to an actor.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct StoreOutcome {
    pub path: String,
    pub result: Result<(), StoreError>,
}

/// Send every queued request to the store.
pub fn flush_store_queue(
    mut queue: ResMut<StoreQueue>,
    mut store: ResMut<Store>,
    mut outcomes: EventWriter<StoreOutcome>,
) {
    for request in queue.0.drain(..) {
        let path = request.path().to_string();
        let result = match request {
            StoreRequest::Write { path, fields } => store.0.write(&path, fields),
            StoreRequest::Update { path, fields } => store.0.update(&path, fields),
        };
        if let Err(e) = &result {
            warn!("Store request failed: {}", e);
        }
        outcomes.send(StoreOutcome { path, result });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn paths_follow_the_user_tree() {
        assert_eq!(character_path("u1", "Ayla"), "users/u1/characters/Ayla");
    }

    #[test]
    fn write_then_update_merges_fields() {
        let mut store = MemoryStore::default();
        let path = character_path("u1", "Ayla");

        store.write(&path, fields(json!({ "level": 1, "goldAmount": 0 }))).unwrap();
        store.update(&path, fields(json!({ "goldAmount": 25 }))).unwrap();

        assert_eq!(
            store.read(&path).unwrap(),
            Some(json!({ "level": 1, "goldAmount": 25 }))
        );
        assert_eq!(store.read(&format!("{path}/level")).unwrap(), Some(json!(1)));
    }

    #[test]
    fn listing_reads_every_character() {
        let mut store = MemoryStore::default();
        store.write(&character_path("u1", "A"), fields(json!({ "level": 2 }))).unwrap();
        store.write(&character_path("u1", "B"), fields(json!({ "level": 5 }))).unwrap();
        store.write(&character_path("u2", "C"), fields(json!({ "level": 9 }))).unwrap();

        assert_eq!(
            store.read(&characters_path("u1")).unwrap(),
            Some(json!({ "A": { "level": 2 }, "B": { "level": 5 } }))
        );
        assert_eq!(store.read(&characters_path("nobody")).unwrap(), None);
    }

    #[test]
    fn updating_a_missing_record_fails() {
        let mut store = MemoryStore::default();
        let err = store
            .update("users/u1/characters/Ghost", FieldMap::new())
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("users/u1/characters/Ghost".to_string()));
    }

    #[test]
    fn file_store_survives_reopening() {
        let dir = std::env::temp_dir().join(format!("iso-rpg-store-{}", std::process::id()));
        let file = dir.join("characters.json");
        let path = character_path("u1", "Ayla");

        let mut store = JsonFileStore::open(&file).unwrap();
        store.write(&path, fields(json!({ "level": 4 }))).unwrap();

        let reopened = JsonFileStore::open(&file).unwrap();
        assert_eq!(reopened.read(&path).unwrap(), Some(json!({ "level": 4 })));

        let _ = fs::remove_dir_all(dir);
    }
}
