//! Throttled saving of the character being played.

use bevy::prelude::*;
use serde_json::Value;

use super::record::CharacterRecord;
use super::store::{character_path, FieldMap, StoreQueue};
use crate::combat::{Health, Mana};
use crate::player::{MoveSpeed, Player, PlayerLocator, Progression};

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    /// Seconds between position checks
    pub position_interval: f32,
    /// Smallest per-axis move worth saving
    pub position_tolerance: f32,
    /// Seconds between stat flushes
    pub stats_interval: f32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            position_interval: 2.0,
            position_tolerance: 0.1,
            stats_interval: 0.5,
        }
    }
}

/// The character being played and what the store last heard about it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ActiveCharacter {
    pub user_id: String,
    pub name: String,
    pub saved: CharacterRecord,
    position_elapsed: f32,
    stats_elapsed: f32,
}

impl ActiveCharacter {
    pub fn new(user_id: &str, name: &str, saved: CharacterRecord) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            saved,
            position_elapsed: 0.0,
            stats_elapsed: 0.0,
        }
    }

    pub fn path(&self) -> String {
        character_path(&self.user_id, &self.name)
    }

    /// Advance both timers by `dt` and return the fields due for saving.
    /// Returned fields count as saved.
    pub fn poll(&mut self, current: &CharacterRecord, dt: f32, config: &SyncConfig) -> Option<FieldMap> {
        let mut fields = FieldMap::new();

        self.position_elapsed += dt;
        if self.position_elapsed >= config.position_interval {
            self.position_elapsed = 0.0;
            let moved_x = (current.pos_x - self.saved.pos_x).abs() >= config.position_tolerance;
            let moved_y = (current.pos_y - self.saved.pos_y).abs() >= config.position_tolerance;
            if moved_x || moved_y {
                fields.insert("posX".to_string(), Value::from(current.pos_x));
                fields.insert("posY".to_string(), Value::from(current.pos_y));
                self.saved.pos_x = current.pos_x;
                self.saved.pos_y = current.pos_y;
            }
        }

        self.stats_elapsed += dt;
        if self.stats_elapsed >= config.stats_interval {
            self.stats_elapsed = 0.0;
            let stats = self.saved.stat_diff(current);
            if !stats.is_empty() {
                self.saved = CharacterRecord {
                    pos_x: self.saved.pos_x,
                    pos_y: self.saved.pos_y,
                    ..current.clone()
                };
                fields.extend(stats);
            }
        }

        (!fields.is_empty()).then_some(fields)
    }

    /// Everything that changed since the last save, ignoring throttling.
    pub fn flush(&mut self, current: &CharacterRecord) -> Option<FieldMap> {
        let fields = self.saved.diff(current);
        self.saved = current.clone();
        (!fields.is_empty()).then_some(fields)
    }
}

/// Record of a live player.
pub fn snapshot(
    position: Vec2,
    health: &Health,
    mana: &Mana,
    progression: &Progression,
    speed: &MoveSpeed,
) -> CharacterRecord {
    CharacterRecord {
        pos_x: position.x,
        pos_y: position.y,
        level: progression.level,
        max_health: health.maximum,
        max_mana: mana.maximum,
        current_health: health.current,
        current_mana: mana.current,
        experience: progression.experience,
        gold_amount: progression.gold,
        speed: speed.0,
    }
}

type PlayerRecordQuery<'w, 's> = Query<
    'w,
    's,
    (&'static Transform, &'static Health, &'static Mana, &'static Progression, &'static MoveSpeed),
    With<Player>,
>;

fn current_record(locator: &PlayerLocator, players: &PlayerRecordQuery) -> Option<CharacterRecord> {
    let (transform, health, mana, progression, speed) = players.get(locator.get()?).ok()?;
    Some(snapshot(
        transform.translation.truncate(),
        health,
        mana,
        progression,
        speed,
    ))
}

/// Queue throttled saves for the active character.
pub fn sync_active_character(
    time: Res<Time>,
    config: Res<SyncConfig>,
    locator: Res<PlayerLocator>,
    active: Option<ResMut<ActiveCharacter>>,
    players: PlayerRecordQuery,
    mut queue: ResMut<StoreQueue>,
) {
    let Some(mut active) = active else {
        return;
    };
    let Some(current) = current_record(&locator, &players) else {
        return;
    };

    if let Some(fields) = active.poll(&current, time.delta_secs(), &config) {
        debug!("Saving {} fields of {}", fields.len(), active.name);
        let path = active.path();
        queue.update(path, fields);
    }
}

/// Save everything on the way out of the game and forget the character.
pub fn save_on_leave(
    mut commands: Commands,
    locator: Res<PlayerLocator>,
    active: Option<ResMut<ActiveCharacter>>,
    players: PlayerRecordQuery,
    mut queue: ResMut<StoreQueue>,
) {
    let Some(mut active) = active else {
        return;
    };
    if let Some(current) = current_record(&locator, &players) {
        if let Some(fields) = active.flush(&current) {
            let path = active.path();
            queue.update(path, fields);
        }
    }
    info!("Left the game with {}", active.name);
    commands.remove_resource::<ActiveCharacter>();
}
