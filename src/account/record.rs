//! The stored shape of a character.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::{FieldMap, StoreError};

/// One character as it lives under `users/{id}/characters/{name}`.
///
/// Missing fields read back as the values a new character starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterRecord {
    pub pos_x: f32,
    pub pos_y: f32,
    pub level: u32,
    pub max_health: u32,
    pub max_mana: u32,
    pub current_health: u32,
    pub current_mana: u32,
    pub experience: u32,
    pub gold_amount: u32,
    pub speed: f32,
}

impl Default for CharacterRecord {
    fn default() -> Self {
        Self {
            pos_x: 0.0,
            pos_y: 0.0,
            level: 1,
            max_health: 180,
            max_mana: 180,
            current_health: 180,
            current_mana: 180,
            experience: 0,
            gold_amount: 0,
            speed: 4.0,
        }
    }
}

pub const POSITION_FIELDS: [&str; 2] = ["posX", "posY"];

impl CharacterRecord {
    /// Every field, keyed by its stored name.
    pub fn to_fields(&self) -> FieldMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            _ => FieldMap::new(),
        }
    }

    pub fn from_value(path: &str, value: Value) -> Result<Self, StoreError> {
        serde_json::from_value(value).map_err(|e| StoreError::Malformed {
            path: path.to_string(),
            details: e.to_string(),
        })
    }

    /// Fields of `current` that differ from `self`.
    pub fn diff(&self, current: &CharacterRecord) -> FieldMap {
        let before = self.to_fields();
        current
            .to_fields()
            .into_iter()
            .filter(|(key, value)| before.get(key) != Some(value))
            .collect()
    }

    /// Like [`diff`](Self::diff) but without the position.
    pub fn stat_diff(&self, current: &CharacterRecord) -> FieldMap {
        let mut fields = self.diff(current);
        for key in POSITION_FIELDS {
            fields.remove(key);
        }
        fields
    }
}
