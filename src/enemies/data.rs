//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::components::EnemyStats;
use super::planner::PlannerConfig;
use crate::animation::AnimationSet;
use crate::combat::{Bounty, MeleeWeapon};
use crate::core::IsoQuadrant;
use crate::world::{read_animation_set, read_ron, ron_files, DataLoadError};

pub const ENEMIES_DIR: &str = "assets/data/enemies";

fn default_obstacle_radius() -> f32 {
    0.4
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: u32,
    pub move_speed: f32,
    #[serde(default)]
    pub weapon: MeleeWeapon,
    #[serde(default)]
    pub bounty: Bounty,
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Path of the `AnimationSetDef<IsoQuadrant>` file
    pub animations: String,
    /// Radius of the circle other actors can't walk through
    #[serde(default = "default_obstacle_radius")]
    pub obstacle_radius: f32,
}

impl EnemyDefinition {
    /// Convert to EnemyStats component.
    pub fn to_stats(&self) -> EnemyStats {
        EnemyStats {
            move_speed: self.move_speed,
        }
    }
}

/// A definition with its validated animation table.
#[derive(Debug, Clone)]
pub struct LoadedEnemy {
    pub definition: EnemyDefinition,
    pub animations: Option<Arc<AnimationSet<IsoQuadrant>>>,
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default, Debug)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, LoadedEnemy>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&LoadedEnemy> {
        self.definitions.get(enemy_type)
    }

    pub fn insert(&mut self, enemy_type: impl Into<String>, enemy: LoadedEnemy) {
        self.definitions.insert(enemy_type.into(), enemy);
    }
}

/// Read one definition and the animation table it points at. A broken
/// table leaves the enemy without sprites rather than dropping it.
fn load_enemy(path: &Path) -> Result<LoadedEnemy, DataLoadError> {
    let definition: EnemyDefinition = read_ron(path)?;
    let animations = match read_animation_set::<IsoQuadrant>(Path::new(&definition.animations)) {
        Ok(set) => Some(Arc::new(set)),
        Err(e) => {
            error!("Failed to load animations for {}: {}", definition.name, e);
            None
        }
    };
    Ok(LoadedEnemy {
        definition,
        animations,
    })
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let files = match ron_files(Path::new(ENEMIES_DIR)) {
        Ok(files) => files,
        Err(e) => {
            warn!("No enemy definitions: {}", e);
            return;
        }
    };

    for path in files {
        let enemy_type = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        match load_enemy(&path) {
            Ok(enemy) => {
                info!("Loaded enemy definition: {} ({})", enemy.definition.name, enemy_type);
                registry.insert(enemy_type, enemy);
            }
            Err(e) => error!("Failed to load enemy definition {:?}: {}", path, e),
        }
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{parse_animation_set, parse_ron};

    #[test]
    fn bundled_skeleton_definition_parses() {
        let definition: EnemyDefinition = parse_ron(
            include_str!("../../assets/data/enemies/skeleton.ron"),
            "skeleton.ron",
        )
        .unwrap();

        assert_eq!(definition.name, "Skeleton");
        assert_eq!(definition.weapon.damage, 10);
        assert_eq!(definition.weapon.cooldown, 2.0);
        assert_eq!(definition.bounty.gold, (10, 50));
        assert_eq!(definition.planner, PlannerConfig::default());
        assert_eq!(definition.animations, "assets/data/animations/skeleton.ron");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let definition: EnemyDefinition = parse_ron(
            r#"(
                name: "Rat",
                max_health: 20,
                move_speed: 3.0,
                animations: "assets/data/animations/rat.ron",
                planner: (patrol_radius: 3.0),
            )"#,
            "rat.ron",
        )
        .unwrap();

        assert_eq!(definition.weapon, MeleeWeapon::default());
        assert_eq!(definition.obstacle_radius, 0.4);
        assert_eq!(definition.planner.patrol_radius, 3.0);
        assert_eq!(definition.planner.chasing_radius, 10.0);
    }

    #[test]
    fn bundled_skeleton_animations_cover_every_quadrant() {
        let set = parse_animation_set::<IsoQuadrant>(
            include_str!("../../assets/data/animations/skeleton.ron"),
            "skeleton.ron",
        )
        .unwrap();
        for &quadrant in &IsoQuadrant::CANDIDATES {
            assert!(set.attack_duration(quadrant).is_some());
        }
    }
}
