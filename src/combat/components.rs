//! Combat-related components.

use std::ops::{Deref, DerefMut};

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

/// A bounded resource such as health or mana. `current` never exceeds
/// `maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub current: u32,
    pub maximum: u32,
}

impl Pool {
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Pool with `current` clamped to `maximum`.
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    /// Remove up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    /// Add up to `amount`, returning what was actually added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    /// Change the maximum, keeping `current` within it.
    pub fn set_maximum(&mut self, maximum: u32) {
        self.maximum = maximum;
        self.current = self.current.min(maximum);
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// Hit points. Reaching zero means death.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health(pub Pool);

impl Health {
    pub fn new(max: u32) -> Self {
        Self(Pool::full(max))
    }

    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.0.drain(amount)
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        self.0.restore(amount)
    }

    pub fn is_dead(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Health {
    type Target = Pool;

    fn deref(&self) -> &Pool {
        &self.0
    }
}

impl DerefMut for Health {
    fn deref_mut(&mut self) -> &mut Pool {
        &mut self.0
    }
}

/// Spell resource.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mana(pub Pool);

impl Mana {
    pub fn new(max: u32) -> Self {
        Self(Pool::full(max))
    }

    /// Spend `cost` if there is enough, otherwise leave the pool untouched.
    pub fn spend(&mut self, cost: u32) -> bool {
        if self.0.current < cost {
            return false;
        }
        self.0.current -= cost;
        true
    }
}

impl Deref for Mana {
    type Target = Pool;

    fn deref(&self) -> &Pool {
        &self.0
    }
}

impl DerefMut for Mana {
    fn deref_mut(&mut self) -> &mut Pool {
        &mut self.0
    }
}

/// Melee attack profile for anything that fights.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MeleeWeapon {
    pub damage: u32,
    /// Maximum distance to the target in world units
    pub reach: f32,
    /// Seconds between the start of two attacks
    pub cooldown: f32,
}

impl Default for MeleeWeapon {
    fn default() -> Self {
        Self {
            damage: 10,
            reach: 2.0,
            cooldown: 2.0,
        }
    }
}

/// Attack lock and cooldown bookkeeping.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatState {
    /// Set from attack start until the strike resolves
    pub is_attacking: bool,
    /// Game time the last accepted attack started
    pub last_attack_at: Option<f32>,
}

impl CombatState {
    pub fn lock(&mut self, now: f32) {
        self.is_attacking = true;
        self.last_attack_at = Some(now);
    }

    pub fn release(&mut self) {
        self.is_attacking = false;
    }

    /// Seconds until `cooldown` has elapsed since the last attack.
    pub fn cooldown_remaining(&self, cooldown: f32, now: f32) -> f32 {
        self.last_attack_at
            .map_or(0.0, |last| (last + cooldown - now).max(0.0))
    }
}

/// Reward ranges rolled when this entity is killed. Both ranges are
/// inclusive.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Bounty {
    pub experience: (u32, u32),
    pub gold: (u32, u32),
}

impl Default for Bounty {
    fn default() -> Self {
        Self {
            experience: (0, 0),
            gold: (10, 50),
        }
    }
}

/// Experience and gold granted for a kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reward {
    pub experience: u32,
    pub gold: u32,
}

impl Bounty {
    pub fn roll(&self, rng: &mut impl Rng) -> Reward {
        Reward {
            experience: roll_inclusive(rng, self.experience),
            gold: roll_inclusive(rng, self.gold),
        }
    }
}

fn roll_inclusive(rng: &mut impl Rng, (min, max): (u32, u32)) -> u32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component, Debug)]
pub struct Dead;
