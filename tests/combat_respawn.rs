mod common;

use bevy::prelude::*;

use common::*;
use iso_rpg::combat::{CombatState, Health, Selection};
use iso_rpg::enemies::{Enemy, SpawnLink, SpawnRoster};
use iso_rpg::player::Progression;

fn enemies_of(app: &mut App, index: usize) -> Vec<Entity> {
    app.world_mut()
        .query::<(Entity, &SpawnLink)>()
        .iter(app.world())
        .filter(|(_, link)| link.0 == index)
        .map(|(entity, _)| entity)
        .collect()
}

/// Put the player next to the enemy of spawn entry `index`, weaken the
/// enemy to one hit, and select it.
fn engage(app: &mut App, player: Entity, index: usize) -> Entity {
    let enemy = enemies_of(app, index)[0];
    let position = app.world().get::<Transform>(enemy).unwrap().translation;

    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation = position + Vec3::new(0.5, 0.0, 0.0);
    app.world_mut().get_mut::<Health>(enemy).unwrap().0.current = 5;
    app.world_mut().resource_mut::<Selection>().toggle(enemy);
    enemy
}

/// Step until `entity` is gone, returning the time it went.
fn wait_for_despawn(app: &mut App, entity: Entity) -> f32 {
    for _ in 0..100 {
        advance(app, 0.05);
        if !app.world().entities().contains(entity) {
            return elapsed(app);
        }
    }
    panic!("{entity:?} never died");
}

#[test]
fn killing_an_enemy_pays_out_and_clears_the_selection() {
    let mut app = headless_app();
    let player = play_as(&mut app, "Ayla");
    let enemy = engage(&mut app, player, 0);

    wait_for_despawn(&mut app, enemy);

    let progression = app.world().get::<Progression>(player).unwrap();
    assert_eq!(progression.level, 1);
    assert_eq!(progression.experience, 25);
    assert!((10..=50).contains(&progression.gold));

    assert_eq!(app.world().resource::<Selection>().current(), None);
    assert!(!app.world().get::<CombatState>(player).unwrap().is_attacking);
}

#[test]
fn dead_enemies_respawn_exactly_once_after_their_delay() {
    let mut app = headless_app();
    let player = play_as(&mut app, "Ayla");
    let delay = app.world().resource::<SpawnRoster>().configs()[0].respawn_delay;

    let enemy = engage(&mut app, player, 0);
    let died_at = wait_for_despawn(&mut app, enemy);

    // Far out of everyone's chasing radius, so the replacement stays put.
    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation = Vec3::new(-60.0, 60.0, 1.0);

    run_for(&mut app, delay - 1.0, 0.1);
    assert!(enemies_of(&mut app, 0).is_empty());
    assert!(app.world().resource::<SpawnRoster>().is_pending(0));
    assert!(elapsed(&app) < died_at + delay);

    run_for(&mut app, 2.0, 0.1);
    let respawned = enemies_of(&mut app, 0);
    assert_eq!(respawned.len(), 1);
    assert_ne!(respawned[0], enemy);
    assert_eq!(
        app.world().resource::<SpawnRoster>().live(0),
        Some(respawned[0])
    );

    // Still inside the configured area.
    let area = app.world().resource::<SpawnRoster>().configs()[0].area;
    let position = app.world().get::<Transform>(respawned[0]).unwrap().translation;
    let center = Vec2::new(area.center.0, area.center.1);
    assert!(position.truncate().distance(center) <= area.radius + 0.5);
}

#[test]
fn enemies_fight_back() {
    let mut app = headless_app();
    let player = play_as(&mut app, "Ayla");
    let enemy = enemies_of(&mut app, 0)[0];
    let position = app.world().get::<Transform>(enemy).unwrap().translation;
    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation = position + Vec3::new(0.0, 0.5, 0.0);

    run_for(&mut app, 1.5, 0.05);

    let health = app.world().get::<Health>(player).unwrap();
    assert!(health.current < 180, "player was never hit");
    assert_eq!(count::<With<Enemy>>(&mut app), 3);
}
