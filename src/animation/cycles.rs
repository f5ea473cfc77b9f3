//! Sprite cycle tables keyed by (kind, facing).

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::core::Facing;

/// What an actor is visibly doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum AnimKind {
    #[default]
    Idle,
    Move,
    Attack,
}

impl AnimKind {
    /// Idle and Move loop forever, Attack plays once.
    pub fn is_looping(self) -> bool {
        !matches!(self, AnimKind::Attack)
    }
}

/// Errors raised while validating an animation table.
#[derive(Debug, Error, PartialEq)]
pub enum AnimationError {
    #[error("frame rate must be a positive number, got {0}")]
    InvalidFrameRate(f32),

    #[error("missing {kind:?} cycle for direction {direction}")]
    MissingCycle { kind: AnimKind, direction: String },
}

/// Sprite sheet the cycle indices point into.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteSheetDef {
    pub image: String,
    pub tile_size: (u32, u32),
    pub columns: u32,
    pub rows: u32,
    /// Drawn size in world units
    #[serde(default = "default_display_size")]
    pub display_size: (f32, f32),
}

fn default_display_size() -> (f32, f32) {
    (1.0, 1.0)
}

/// Animation table as written in `assets/data/animations/*.ron`.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "D: Deserialize<'de>"))]
pub struct AnimationSetDef<D: Facing> {
    pub frame_rate: f32,
    pub sheet: SpriteSheetDef,
    pub idle: HashMap<D, Vec<usize>>,
    pub movement: HashMap<D, Vec<usize>>,
    #[serde(default)]
    pub attack: Option<HashMap<D, Vec<usize>>>,
}

/// Validated animation table: every (kind, facing) the actor can enter
/// has an entry, so lookups never miss.
#[derive(Debug, Clone)]
pub struct AnimationSet<D: Facing> {
    frame_rate: f32,
    sheet: SpriteSheetDef,
    cycles: HashMap<(AnimKind, D), Vec<usize>>,
    has_attack: bool,
}

impl<D: Facing> AnimationSet<D> {
    /// Validate a table definition. Idle and Move must cover every facing;
    /// an Attack table is optional but must be complete when present.
    pub fn from_def(def: AnimationSetDef<D>) -> Result<Self, AnimationError> {
        if !(def.frame_rate.is_finite() && def.frame_rate > 0.0) {
            return Err(AnimationError::InvalidFrameRate(def.frame_rate));
        }

        let mut cycles = HashMap::new();
        let has_attack = def.attack.is_some();

        let tables = [
            (AnimKind::Idle, Some(def.idle)),
            (AnimKind::Move, Some(def.movement)),
            (AnimKind::Attack, def.attack),
        ];

        for (kind, table) in tables {
            let Some(mut table) = table else {
                continue;
            };
            for &direction in D::ALL {
                let frames = table.remove(&direction).ok_or_else(|| AnimationError::MissingCycle {
                    kind,
                    direction: format!("{direction:?}"),
                })?;
                cycles.insert((kind, direction), frames);
            }
        }

        Ok(Self {
            frame_rate: def.frame_rate,
            sheet: def.sheet,
            cycles,
            has_attack,
        })
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    pub fn sheet(&self) -> &SpriteSheetDef {
        &self.sheet
    }

    /// Atlas indices for a cycle. Empty when the set has no such cycle.
    pub fn cycle(&self, kind: AnimKind, direction: D) -> &[usize] {
        self.cycles
            .get(&(kind, direction))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Seconds one full pass of a cycle takes.
    pub fn cycle_duration(&self, kind: AnimKind, direction: D) -> f32 {
        self.cycle(kind, direction).len() as f32 / self.frame_rate
    }

    /// How long an attack swing lasts, `None` when there is nothing to play.
    pub fn attack_duration(&self, direction: D) -> Option<f32> {
        if !self.has_attack || self.cycle(AnimKind::Attack, direction).is_empty() {
            return None;
        }
        Some(self.cycle_duration(AnimKind::Attack, direction))
    }
}
