//! Experience, levels, and passive regeneration.

use bevy::prelude::*;

use crate::combat::{Dead, Health, Mana, Pool, Reward};
use crate::core::LevelUpEvent;

/// Level, experience, and gold of a character.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub level: u32,
    pub experience: u32,
    pub gold: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            gold: 0,
        }
    }
}

impl Progression {
    pub fn grant(&mut self, reward: Reward) {
        self.experience = self.experience.saturating_add(reward.experience);
        self.gold = self.gold.saturating_add(reward.gold);
    }
}

/// Experience curve and per-level pool sizes.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LevelCurve {
    pub base_experience: f32,
    pub multiplier: f32,
    pub base_health: u32,
    pub health_per_level: u32,
    pub base_mana: u32,
    pub mana_per_level: u32,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_experience: 100.0,
            multiplier: 1.5,
            base_health: 175,
            health_per_level: 5,
            base_mana: 175,
            mana_per_level: 25,
        }
    }
}

impl LevelCurve {
    /// Experience needed to leave `level`.
    pub fn experience_needed(&self, level: u32) -> u32 {
        (self.base_experience * (level as f32).powf(self.multiplier)).floor() as u32
    }

    pub fn max_health(&self, level: u32) -> u32 {
        self.base_health + self.health_per_level * level
    }

    pub fn max_mana(&self, level: u32) -> u32 {
        self.base_mana + self.mana_per_level * level
    }

    /// Roll banked experience into levels, refilling both pools on every
    /// level gained. Returns the number of levels gained.
    pub fn apply(&self, progression: &mut Progression, health: &mut Pool, mana: &mut Pool) -> u32 {
        let mut gained = 0;
        let mut needed = self.experience_needed(progression.level);

        while needed > 0 && progression.experience >= needed {
            progression.experience -= needed;
            progression.level += 1;
            gained += 1;

            health.set_maximum(self.max_health(progression.level));
            health.refill();
            mana.set_maximum(self.max_mana(progression.level));
            mana.refill();

            needed = self.experience_needed(progression.level);
        }

        gained
    }
}

/// Regeneration intervals and amount.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct RegenConfig {
    pub health_interval: f32,
    pub mana_interval: f32,
    pub amount: u32,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            health_interval: 2.0,
            mana_interval: 1.0,
            amount: 2,
        }
    }
}

/// Time banked towards the next health and mana tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Regeneration {
    pub health_elapsed: f32,
    pub mana_elapsed: f32,
}

impl Regeneration {
    /// Advance both timers. Returns which pools changed.
    pub fn tick(
        &mut self,
        dt: f32,
        config: &RegenConfig,
        health: &mut Pool,
        mana: &mut Pool,
    ) -> (bool, bool) {
        let health_changed = regenerate(
            &mut self.health_elapsed,
            dt,
            config.health_interval,
            config.amount,
            health,
        );
        let mana_changed = regenerate(
            &mut self.mana_elapsed,
            dt,
            config.mana_interval,
            config.amount,
            mana,
        );
        (health_changed, mana_changed)
    }
}

fn regenerate(elapsed: &mut f32, dt: f32, interval: f32, amount: u32, pool: &mut Pool) -> bool {
    *elapsed += dt;
    if *elapsed < interval {
        return false;
    }
    *elapsed = 0.0;
    pool.restore(amount) > 0
}

/// Apply the level curve to everyone with banked experience.
pub fn apply_level_ups(
    curve: Res<LevelCurve>,
    mut characters: Query<(Entity, &mut Progression, &mut Health, &mut Mana), Changed<Progression>>,
    mut level_ups: EventWriter<LevelUpEvent>,
) {
    for (entity, mut progression, mut health, mut mana) in characters.iter_mut() {
        if progression.experience < curve.experience_needed(progression.level) {
            continue;
        }
        let before = progression.level;
        let gained = curve.apply(&mut progression, &mut health.0, &mut mana.0);

        for new_level in before + 1..=before + gained {
            info!("Level up! Now level {}", new_level);
            level_ups.send(LevelUpEvent { entity, new_level });
        }
    }
}

/// Trickle health and mana back for the living.
pub fn regenerate_pools(
    time: Res<Time>,
    config: Res<RegenConfig>,
    mut characters: Query<(&mut Regeneration, &mut Health, &mut Mana), Without<Dead>>,
) {
    let dt = time.delta_secs();
    for (mut regen, mut health, mut mana) in characters.iter_mut() {
        regen.tick(dt, &config, &mut health.0, &mut mana.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_hundred_experience_reaches_level_two() {
        let curve = LevelCurve::default();
        assert_eq!(curve.experience_needed(1), 100);

        let mut progression = Progression {
            level: 1,
            experience: 100,
            gold: 0,
        };
        let mut health = Pool::new(40, 180);
        let mut mana = Pool::new(3, 180);

        assert_eq!(curve.apply(&mut progression, &mut health, &mut mana), 1);
        assert_eq!(progression.level, 2);
        assert_eq!(progression.experience, 0);
        assert_eq!(health, Pool::full(185));
        assert_eq!(mana, Pool::full(225));
    }

    #[test]
    fn large_grants_roll_over_several_levels() {
        let curve = LevelCurve::default();
        // 100 for level 1, 282 for level 2, 519 for level 3.
        assert_eq!(curve.experience_needed(2), 282);
        assert_eq!(curve.experience_needed(3), 519);

        let mut progression = Progression {
            level: 1,
            experience: 100 + 282 + 519 + 7,
            gold: 0,
        };
        let mut health = Pool::full(180);
        let mut mana = Pool::full(180);

        assert_eq!(curve.apply(&mut progression, &mut health, &mut mana), 3);
        assert_eq!(progression.level, 4);
        assert_eq!(progression.experience, 7);
    }

    #[test]
    fn below_threshold_changes_nothing() {
        let curve = LevelCurve::default();
        let mut progression = Progression {
            level: 1,
            experience: 99,
            gold: 5,
        };
        let mut health = Pool::new(10, 180);
        let mut mana = Pool::new(10, 180);

        assert_eq!(curve.apply(&mut progression, &mut health, &mut mana), 0);
        assert_eq!(progression.experience, 99);
        assert_eq!(health.current, 10);
    }

    #[test]
    fn zero_threshold_does_not_loop() {
        let curve = LevelCurve {
            base_experience: 0.0,
            ..default()
        };
        let mut progression = Progression::default();
        let mut health = Pool::full(180);
        let mut mana = Pool::full(180);
        assert_eq!(curve.apply(&mut progression, &mut health, &mut mana), 0);
    }

    #[test]
    fn health_regenerates_to_exactly_max() {
        let config = RegenConfig::default();
        let mut regen = Regeneration::default();
        let mut health = Pool::new(170, 180);
        let mut mana = Pool::full(180);

        let mut history = Vec::new();
        for _ in 0..14 {
            // One tick per second.
            regen.tick(1.0, &config, &mut health, &mut mana);
            history.push(health.current);
        }

        assert_eq!(
            history,
            vec![170, 172, 172, 174, 174, 176, 176, 178, 178, 180, 180, 180, 180, 180]
        );
    }

    #[test]
    fn mana_ticks_on_its_own_interval() {
        let config = RegenConfig::default();
        let mut regen = Regeneration::default();
        let mut health = Pool::new(100, 180);
        let mut mana = Pool::new(100, 180);

        let (health_changed, mana_changed) = regen.tick(1.0, &config, &mut health, &mut mana);
        assert!(!health_changed);
        assert!(mana_changed);
        assert_eq!((health.current, mana.current), (100, 102));
    }

    #[test]
    fn full_pools_do_not_bank_time() {
        let config = RegenConfig::default();
        let mut regen = Regeneration::default();
        let mut health = Pool::full(180);
        let mut mana = Pool::full(180);

        regen.tick(2.5, &config, &mut health, &mut mana);
        health.drain(10);
        regen.tick(1.0, &config, &mut health, &mut mana);
        assert_eq!(health.current, 170);
        regen.tick(1.0, &config, &mut health, &mut mana);
        assert_eq!(health.current, 172);
    }
}
