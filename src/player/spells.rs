//! Player spells bound to function keys.

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use super::components::{Player, PlayerLocator};
use crate::combat::{Dead, Health, Mana};

/// What a spell does when cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellEffect {
    /// Restore a uniform `min..=max` health to the caster
    Heal { min: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spell {
    pub name: String,
    pub mana_cost: u32,
    pub effect: SpellEffect,
}

impl Spell {
    pub fn heal() -> Self {
        Self {
            name: "Heal".to_string(),
            mana_cost: 20,
            effect: SpellEffect::Heal { min: 10, max: 40 },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpellError {
    #[error("no spell in slot {0}")]
    UnknownSpell(usize),

    #[error("{spell} needs {required} mana, have {available}")]
    InsufficientMana {
        spell: String,
        required: u32,
        available: u32,
    },
}

/// Spells the caster knows, slot 0 is bound to F1.
#[derive(Component, Debug, Clone)]
pub struct SpellBook(pub Vec<Spell>);

impl Default for SpellBook {
    fn default() -> Self {
        Self(vec![Spell::heal()])
    }
}

/// What a successful cast did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastOutcome {
    pub healed: u32,
    pub mana_left: u32,
}

impl SpellBook {
    /// Cast the spell in `slot`. Nothing is spent when the cast fails.
    pub fn cast(
        &self,
        slot: usize,
        health: &mut Health,
        mana: &mut Mana,
        rng: &mut impl Rng,
    ) -> Result<CastOutcome, SpellError> {
        let spell = self.0.get(slot).ok_or(SpellError::UnknownSpell(slot))?;

        if !mana.spend(spell.mana_cost) {
            return Err(SpellError::InsufficientMana {
                spell: spell.name.clone(),
                required: spell.mana_cost,
                available: mana.current,
            });
        }

        let healed = match spell.effect {
            SpellEffect::Heal { min, max } => health.heal(rng.gen_range(min..=max.max(min))),
        };

        Ok(CastOutcome {
            healed,
            mana_left: mana.current,
        })
    }
}

/// Function keys in slot order.
const SPELL_KEYS: [KeyCode; 4] = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4];

/// Cast spells from the function keys.
pub fn cast_spells(
    keyboard: Res<ButtonInput<KeyCode>>,
    locator: Res<PlayerLocator>,
    mut casters: Query<(&SpellBook, &mut Health, &mut Mana), (With<Player>, Without<Dead>)>,
) {
    let Some(slot) = SPELL_KEYS.iter().position(|key| keyboard.just_pressed(*key)) else {
        return;
    };
    let Some((book, mut health, mut mana)) = locator.get().and_then(|e| casters.get_mut(e).ok())
    else {
        return;
    };

    match book.cast(slot, &mut health, &mut mana, &mut rand::thread_rng()) {
        Ok(outcome) => info!(
            "Healed {} health, {} mana left",
            outcome.healed, outcome.mana_left
        ),
        Err(err) => info!("Spell failed: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Pool;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn heal_costs_twenty_mana_and_clamps() {
        let book = SpellBook::default();
        let mut health = Health(Pool::new(170, 180));
        let mut mana = Mana(Pool::new(50, 180));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = book.cast(0, &mut health, &mut mana, &mut rng).unwrap();
        assert_eq!(outcome.mana_left, 30);
        assert_eq!(health.current, 180);
        assert_eq!(outcome.healed, 10);
    }

    #[test]
    fn heal_amount_is_within_range() {
        let book = SpellBook::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let mut health = Health(Pool::new(0, 180));
            let mut mana = Mana(Pool::full(180));
            let outcome = book.cast(0, &mut health, &mut mana, &mut rng).unwrap();
            assert!((10..=40).contains(&outcome.healed));
        }
    }

    #[test]
    fn insufficient_mana_spends_nothing() {
        let book = SpellBook::default();
        let mut health = Health(Pool::new(100, 180));
        let mut mana = Mana(Pool::new(19, 180));
        let mut rng = StdRng::seed_from_u64(1);

        let err = book.cast(0, &mut health, &mut mana, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SpellError::InsufficientMana {
                spell: "Heal".to_string(),
                required: 20,
                available: 19
            }
        );
        assert_eq!((health.current, mana.current), (100, 19));
    }

    #[test]
    fn empty_slot_is_unknown() {
        let book = SpellBook::default();
        let mut health = Health::new(180);
        let mut mana = Mana::new(180);
        assert_eq!(
            book.cast(3, &mut health, &mut mana, &mut StdRng::seed_from_u64(0)),
            Err(SpellError::UnknownSpell(3))
        );
    }
}
