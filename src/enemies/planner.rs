//! Enemy movement planning: wander near home, chase the player on a
//! diagonal grid, stop and fight at close range.
//!
//! The planner is plain data plus a `tick` that returns a [`Plan`]; the AI
//! system applies plans to transforms, animators, and the combat gate.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::animation::AnimKind;
use crate::core::IsoQuadrant;
use crate::world::Terrain;

/// What an enemy is doing about the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Wandering around the anchor
    #[default]
    Idle,
    /// Walking towards the player
    Chasing,
    /// Close enough to fight
    Attacking,
}

/// Distances and timings for enemy movement.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Max distance from the anchor any step may end at
    pub patrol_radius: f32,
    /// Player closer than this is chased
    pub chasing_radius: f32,
    /// Player closer than this is attacked
    pub stop_distance: f32,
    /// Size of one diagonal step
    pub grid: (f32, f32),
    pub wander_interval: f32,
    pub stuck_threshold: f32,
    pub stuck_epsilon: f32,
    pub movement_timeout: f32,
    pub arrive_epsilon: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            patrol_radius: 5.0,
            chasing_radius: 10.0,
            stop_distance: 1.0,
            grid: (2.0, 1.0),
            wander_interval: 2.0,
            stuck_threshold: 5.0,
            stuck_epsilon: 0.01,
            movement_timeout: 5.0,
            arrive_epsilon: 0.01,
        }
    }
}

impl PlannerConfig {
    fn grid(&self) -> Vec2 {
        Vec2::new(self.grid.0, self.grid.1)
    }
}

/// Per-tick inputs that live outside the planner.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// The planning enemy, excluded from obstacle tests
    pub entity: Entity,
    pub position: Vec2,
    /// Player position, `None` while there is no player
    pub player: Option<Vec2>,
    pub speed: f32,
    pub dt: f32,
}

/// Result of one planner tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plan {
    /// Where the enemy stands after this tick
    pub position: Vec2,
    /// Animation cycle to switch to, if any
    pub cue: Option<(AnimKind, IsoQuadrant)>,
    /// Whether to ask the combat gate for an attack on the player
    pub attack: bool,
}

/// Movement state machine of one enemy.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct MovementState {
    pub config: PlannerConfig,
    pub phase: Phase,
    /// Spawn point the patrol radius is measured from
    pub anchor: Vec2,
    pub target: Vec2,
    pub moving: bool,
    pub following_path: bool,
    pub stuck_timer: f32,
    pub wander_timer: f32,
    pub movement_timer: f32,
    pub last_position: Vec2,
    /// Last quadrant walked or faced
    pub heading: IsoQuadrant,
}

impl MovementState {
    pub fn new(config: PlannerConfig, anchor: Vec2) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            anchor,
            target: anchor,
            moving: false,
            following_path: false,
            stuck_timer: 0.0,
            wander_timer: 0.0,
            movement_timer: 0.0,
            last_position: anchor,
            heading: IsoQuadrant::SE,
        }
    }

    /// Advance one tick: phase, stuck check, timeout, then phase behaviour.
    pub fn tick(&mut self, input: TickInput, terrain: &impl Terrain, rng: &mut impl Rng) -> Plan {
        let mut plan = Plan {
            position: input.position,
            cue: None,
            attack: false,
        };

        self.update_phase(input.player, &mut plan);
        self.check_stuck(&input, terrain, rng, &mut plan);
        self.check_timeout(&input, terrain, rng, &mut plan);

        match self.phase {
            Phase::Idle => {
                if self.moving {
                    self.move_to_target(&input, terrain, &mut plan);
                } else {
                    self.wander_timer += input.dt;
                    if self.wander_timer >= self.config.wander_interval {
                        self.wander_timer = 0.0;
                        self.random_step(&input, terrain, rng, &mut plan);
                    }
                }
            }
            Phase::Chasing => {
                if let Some(player) = input.player {
                    if !self.moving && !self.following_path {
                        self.plan_towards(player, &input, terrain, &mut plan);
                    } else {
                        self.move_to_target(&input, terrain, &mut plan);
                    }
                }
            }
            Phase::Attacking => {
                self.moving = false;
                if let Some(player) = input.player {
                    let facing = IsoQuadrant::best_match(player - plan.position);
                    if facing != self.heading {
                        self.heading = facing;
                        plan.cue = Some((AnimKind::Idle, facing));
                    }
                    plan.attack = true;
                }
            }
        }

        plan
    }

    /// Tick while the enemy is locked in a swing. Phase, stuck and timeout
    /// bookkeeping advance as usual; the enemy neither moves nor changes
    /// its animation.
    pub fn hold(&mut self, input: TickInput, terrain: &impl Terrain, rng: &mut impl Rng) {
        let mut plan = Plan {
            position: input.position,
            cue: None,
            attack: false,
        };

        self.update_phase(input.player, &mut plan);
        self.check_stuck(&input, terrain, rng, &mut plan);
        self.check_timeout(&input, terrain, rng, &mut plan);
    }

    fn update_phase(&mut self, player: Option<Vec2>, plan: &mut Plan) {
        let Some(player) = player else {
            return;
        };
        let distance = plan.position.distance(player);

        if distance > self.config.chasing_radius {
            if self.phase != Phase::Idle {
                self.phase = Phase::Idle;
                self.moving = false;
                self.wander_timer = 0.0;
            }
        } else if distance > self.config.stop_distance {
            if self.phase != Phase::Chasing {
                debug!("Enemy starts chasing");
                self.phase = Phase::Chasing;
                self.moving = false;
            }
        } else if self.phase != Phase::Attacking {
            debug!("Enemy starts attacking");
            self.phase = Phase::Attacking;
            self.moving = false;
            self.heading = IsoQuadrant::best_match(player - plan.position);
            plan.cue = Some((AnimKind::Idle, self.heading));
        }
    }

    fn check_stuck(
        &mut self,
        input: &TickInput,
        terrain: &impl Terrain,
        rng: &mut impl Rng,
        plan: &mut Plan,
    ) {
        let moved = plan.position.distance(self.last_position);
        self.last_position = plan.position;

        if !self.moving {
            return;
        }
        if moved >= self.config.stuck_epsilon {
            self.stuck_timer = 0.0;
            return;
        }

        self.stuck_timer += input.dt;
        if self.stuck_timer < self.config.stuck_threshold {
            return;
        }

        debug!("Enemy stuck, choosing a new direction");
        self.moving = false;
        self.stuck_timer = 0.0;
        plan.cue = Some((AnimKind::Idle, self.heading));
        if self.phase == Phase::Idle {
            self.random_step(input, terrain, rng, plan);
        }
    }

    fn check_timeout(
        &mut self,
        input: &TickInput,
        terrain: &impl Terrain,
        rng: &mut impl Rng,
        plan: &mut Plan,
    ) {
        if !self.moving {
            self.movement_timer = 0.0;
            return;
        }

        self.movement_timer += input.dt;
        if self.movement_timer < self.config.movement_timeout {
            return;
        }

        self.moving = false;
        self.following_path = false;
        self.movement_timer = 0.0;
        match (self.phase, input.player) {
            (Phase::Idle, _) => self.random_step(input, terrain, rng, plan),
            (Phase::Chasing, Some(player)) => self.plan_towards(player, input, terrain, plan),
            _ => {}
        }
    }

    /// Inside the patrol radius and not inside someone else's obstacle.
    fn is_valid(&self, point: Vec2, entity: Entity, terrain: &impl Terrain) -> bool {
        self.anchor.distance(point) <= self.config.patrol_radius
            && !terrain.is_blocked(point, entity)
    }

    fn step_from(&self, position: Vec2, quadrant: IsoQuadrant) -> Vec2 {
        position + quadrant.step() * self.config.grid()
    }

    fn set_target(&mut self, target: Vec2, quadrant: IsoQuadrant, plan: &mut Plan) {
        self.target = target;
        self.heading = quadrant;
        self.moving = true;
        self.following_path = false;
        self.movement_timer = 0.0;
        plan.cue = Some((AnimKind::Move, quadrant));
    }

    fn random_step(
        &mut self,
        input: &TickInput,
        terrain: &impl Terrain,
        rng: &mut impl Rng,
        plan: &mut Plan,
    ) {
        let candidates: Vec<IsoQuadrant> = IsoQuadrant::CANDIDATES
            .into_iter()
            .filter(|&q| self.is_valid(self.step_from(plan.position, q), input.entity, terrain))
            .collect();

        if let Some(&quadrant) = candidates.choose(rng) {
            let target = self.step_from(plan.position, quadrant);
            self.set_target(target, quadrant, plan);
        }
    }

    /// Pick the next grid step towards the player.
    fn plan_towards(
        &mut self,
        player: Vec2,
        input: &TickInput,
        terrain: &impl Terrain,
        plan: &mut Plan,
    ) {
        let position = plan.position;
        if position.distance(player) <= self.config.stop_distance {
            return;
        }

        let direction = (player - position).normalize_or_zero();
        let mut quadrant = IsoQuadrant::best_match(direction);
        let mut target = self.step_from(position, quadrant);

        if target.distance(player) < self.config.stop_distance {
            // Aim for the point stop distance short of the player instead.
            let ideal = player - direction * self.config.stop_distance;
            quadrant = IsoQuadrant::best_match((ideal - position).normalize_or_zero());
            target = self.step_from(position, quadrant);
        }

        if self.is_valid(target, input.entity, terrain)
            && !terrain.segment_blocked(position, target, input.entity)
        {
            self.set_target(target, quadrant, plan);
            return;
        }

        let open: Vec<IsoQuadrant> = IsoQuadrant::CANDIDATES
            .into_iter()
            .filter(|&q| {
                let step = self.step_from(position, q);
                self.is_valid(step, input.entity, terrain)
                    && !terrain.segment_blocked(position, step, input.entity)
            })
            .collect();

        match IsoQuadrant::best_among(&open, direction) {
            Some(quadrant) => {
                let target = self.step_from(position, quadrant);
                self.set_target(target, quadrant, plan);
            }
            None => debug!("No valid path towards the player, staying put"),
        }
    }

    fn move_to_target(&mut self, input: &TickInput, terrain: &impl Terrain, plan: &mut Plan) {
        let next = move_towards(plan.position, self.target, input.speed * input.dt);
        if !terrain.is_blocked(next, input.entity) {
            plan.position = next;
        }

        if plan.position.distance(self.target) < self.config.arrive_epsilon {
            plan.position = self.target;
            self.moving = false;
            self.movement_timer = 0.0;
            plan.cue = Some((AnimKind::Idle, self.heading));
        }
    }
}

fn move_towards(from: Vec2, to: Vec2, max_distance: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_distance || distance == 0.0 {
        to
    } else {
        from + offset / distance * max_distance
    }
}
