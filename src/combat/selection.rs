//! The player's current target.

use bevy::prelude::*;

use super::components::Dead;
use super::resolver::AttackIntent;
use crate::enemies::Enemy;
use crate::player::PlayerLocator;

/// At most one selected enemy.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection(Option<Entity>);

impl Selection {
    pub fn current(&self) -> Option<Entity> {
        self.0
    }

    /// Select `entity`, or clear the selection if it is already selected.
    pub fn toggle(&mut self, entity: Entity) {
        self.0 = if self.0 == Some(entity) {
            None
        } else {
            Some(entity)
        };
    }

    /// Clear the selection if it points at `entity`.
    pub fn clear_if(&mut self, entity: Entity) -> bool {
        if self.0 == Some(entity) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Tab picks the living enemy closest to the player.
pub fn select_nearest_enemy(
    keyboard: Res<ButtonInput<KeyCode>>,
    locator: Res<PlayerLocator>,
    mut selection: ResMut<Selection>,
    transforms: Query<&Transform>,
    enemies: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>)>,
) {
    if !keyboard.just_pressed(KeyCode::Tab) {
        return;
    }
    let Some(player) = locator.get().and_then(|e| transforms.get(e).ok()) else {
        return;
    };
    let origin = player.translation.truncate();

    let nearest = enemies
        .iter()
        .map(|(entity, transform)| (entity, transform.translation.truncate().distance(origin)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((entity, _)) = nearest {
        selection.toggle(entity);
        info!("Selection: {:?}", selection.current());
    }
}

/// While something is selected the player keeps trying to hit it.
pub fn player_auto_attack(
    locator: Res<PlayerLocator>,
    selection: Res<Selection>,
    mut intents: EventWriter<AttackIntent>,
) {
    if let (Some(attacker), Some(target)) = (locator.get(), selection.current()) {
        intents.send(AttackIntent { attacker, target });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_the_selected_enemy_clears_it() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let mut selection = Selection::default();

        selection.toggle(a);
        assert_eq!(selection.current(), Some(a));
        selection.toggle(b);
        assert_eq!(selection.current(), Some(b));
        selection.toggle(b);
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn clear_if_only_clears_a_match() {
        let a = Entity::from_raw(1);
        let mut selection = Selection::default();
        selection.toggle(a);

        assert!(!selection.clear_if(Entity::from_raw(2)));
        assert_eq!(selection.current(), Some(a));
        assert!(selection.clear_if(a));
        assert_eq!(selection.current(), None);
    }
}
