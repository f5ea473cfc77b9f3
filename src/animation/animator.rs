//! Per-actor sprite animation state machine.

use std::sync::Arc;

use bevy::prelude::*;

use super::cycles::{AnimKind, AnimationSet};
use crate::core::Facing;

/// Where an animator currently is inside its table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState<D> {
    pub kind: AnimKind,
    pub direction: D,
    pub frame: usize,
    pub timer: f32,
}

/// What a single [`SpriteAnimator::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTick {
    /// A transition happened this tick, nothing advanced.
    Held,
    /// The current cycle has no frames.
    Inert,
    /// Not enough time accumulated for the next frame.
    Waiting,
    /// Moved to the given frame of the cycle.
    Advanced(usize),
    /// The attack cycle ran past its last frame.
    Completed,
}

/// Last movement heading of an actor, used to pick the cycle an attack
/// falls back to.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Heading<D: Facing> {
    pub direction: D,
    pub moving: bool,
}

impl<D: Facing> Heading<D> {
    pub fn new(direction: D) -> Self {
        Self {
            direction,
            moving: false,
        }
    }
}

/// Drives a sprite through the cycles of an [`AnimationSet`].
#[derive(Component, Debug, Clone)]
pub struct SpriteAnimator<D: Facing> {
    set: Arc<AnimationSet<D>>,
    state: AnimationState<D>,
    transitioned: bool,
}

impl<D: Facing> SpriteAnimator<D> {
    /// Start idle, facing `direction`.
    pub fn new(set: Arc<AnimationSet<D>>, direction: D) -> Self {
        Self {
            set,
            state: AnimationState {
                kind: AnimKind::Idle,
                direction,
                frame: 0,
                timer: 0.0,
            },
            transitioned: false,
        }
    }

    pub fn set(&self) -> &AnimationSet<D> {
        &self.set
    }

    pub fn state(&self) -> AnimationState<D> {
        self.state
    }

    pub fn kind(&self) -> AnimKind {
        self.state.kind
    }

    pub fn direction(&self) -> D {
        self.state.direction
    }

    pub fn is_attacking(&self) -> bool {
        self.state.kind == AnimKind::Attack
    }

    /// Switch cycles. Returns `false` and changes nothing when the
    /// animator already plays `(kind, direction)`.
    pub fn transition(&mut self, kind: AnimKind, direction: D) -> bool {
        if self.state.kind == kind && self.state.direction == direction {
            return false;
        }
        self.restart(kind, direction);
        true
    }

    /// Play the attack cycle from its first frame, even if one is running.
    pub fn play_attack(&mut self, direction: D) {
        self.restart(AnimKind::Attack, direction);
    }

    fn restart(&mut self, kind: AnimKind, direction: D) {
        self.state = AnimationState {
            kind,
            direction,
            frame: 0,
            timer: 0.0,
        };
        self.transitioned = true;
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> AnimationTick {
        if std::mem::take(&mut self.transitioned) {
            return AnimationTick::Held;
        }

        let len = self.set.cycle(self.state.kind, self.state.direction).len();
        if len == 0 {
            return AnimationTick::Inert;
        }

        self.state.timer += dt;
        // Exact multiples of the frame period must advance.
        if self.state.timer * self.set.frame_rate() < 1.0 {
            return AnimationTick::Waiting;
        }
        self.state.timer = 0.0;

        if self.state.kind.is_looping() {
            self.state.frame = (self.state.frame + 1) % len;
            AnimationTick::Advanced(self.state.frame)
        } else {
            self.state.frame += 1;
            if self.state.frame >= len {
                AnimationTick::Completed
            } else {
                AnimationTick::Advanced(self.state.frame)
            }
        }
    }

    /// Atlas index of the visible frame. `None` for an empty cycle or a
    /// finished attack.
    pub fn current_index(&self) -> Option<usize> {
        self.set
            .cycle(self.state.kind, self.state.direction)
            .get(self.state.frame)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::cycles::tests::full_set;
    use crate::core::{Compass, IsoQuadrant};

    fn animator<D: Facing + Default>(frame_rate: f32, attack_len: usize) -> SpriteAnimator<D> {
        SpriteAnimator::new(Arc::new(full_set(frame_rate, attack_len)), D::default())
    }

    #[test]
    fn transition_resets_and_shows_first_frame() {
        let mut anim = animator::<Compass>(10.0, 3);
        anim.tick(0.1);
        anim.tick(0.1);
        assert_eq!(anim.state().frame, 2);

        assert!(anim.transition(AnimKind::Move, Compass::E));
        let state = anim.state();
        assert_eq!((state.kind, state.direction, state.frame), (AnimKind::Move, Compass::E, 0));
        assert_eq!(state.timer, 0.0);
        assert_eq!(
            anim.current_index(),
            Some(anim.set().cycle(AnimKind::Move, Compass::E)[0])
        );
    }

    #[test]
    fn same_transition_is_a_no_op() {
        let mut anim = animator::<Compass>(10.0, 3);
        anim.tick(0.1);
        assert!(!anim.transition(AnimKind::Idle, Compass::N));
        assert_eq!(anim.state().frame, 1);
    }

    #[test]
    fn tick_after_transition_is_held() {
        let mut anim = animator::<IsoQuadrant>(10.0, 3);
        anim.transition(AnimKind::Move, IsoQuadrant::NW);
        assert_eq!(anim.tick(1.0), AnimationTick::Held);
        assert_eq!(anim.state().frame, 0);
        assert_eq!(anim.tick(0.1), AnimationTick::Advanced(1));
    }

    #[test]
    fn looping_cycles_wrap() {
        let mut anim = animator::<IsoQuadrant>(4.0, 3);
        // Idle cycles have four frames.
        let frames: Vec<_> = (0..5).map(|_| anim.tick(0.25)).collect();
        assert_eq!(
            frames,
            vec![
                AnimationTick::Advanced(1),
                AnimationTick::Advanced(2),
                AnimationTick::Advanced(3),
                AnimationTick::Advanced(0),
                AnimationTick::Advanced(1),
            ]
        );
    }

    #[test]
    fn short_ticks_accumulate() {
        let mut anim = animator::<Compass>(10.0, 3);
        assert_eq!(anim.tick(0.04), AnimationTick::Waiting);
        assert_eq!(anim.tick(0.04), AnimationTick::Waiting);
        assert_eq!(anim.tick(0.04), AnimationTick::Advanced(1));
    }

    #[test]
    fn attack_completes_after_exactly_its_duration() {
        // Four frames at eight frames per second: done after half a second.
        let mut anim = animator::<Compass>(8.0, 4);
        assert_eq!(anim.set().attack_duration(Compass::SW), Some(0.5));

        anim.play_attack(Compass::SW);
        assert!(anim.is_attacking());
        assert_eq!(anim.tick(0.125), AnimationTick::Held);

        let mut elapsed = 0.0;
        for expected in 1..4 {
            elapsed += 0.125;
            assert_eq!(anim.tick(0.125), AnimationTick::Advanced(expected));
        }
        elapsed += 0.125;
        assert_eq!(anim.tick(0.125), AnimationTick::Completed);
        assert_eq!(elapsed, 0.5);
        assert_eq!(anim.current_index(), None);
    }

    #[test]
    fn play_attack_restarts_a_running_attack() {
        let mut anim = animator::<Compass>(8.0, 4);
        anim.play_attack(Compass::E);
        anim.tick(0.125);
        anim.tick(0.125);
        assert_eq!(anim.state().frame, 1);

        anim.play_attack(Compass::E);
        assert_eq!(anim.state().frame, 0);
        assert_eq!(anim.tick(0.125), AnimationTick::Held);
    }

    #[test]
    fn empty_cycle_is_inert() {
        let mut anim = animator::<Compass>(8.0, 0);
        anim.play_attack(Compass::N);
        anim.tick(0.1);
        assert_eq!(anim.tick(5.0), AnimationTick::Inert);
        assert_eq!(anim.current_index(), None);
    }
}
