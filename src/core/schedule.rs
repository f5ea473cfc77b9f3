//! Deferred work polled once per tick.
//!
//! Anything that has to happen "later" (damage landing after an attack
//! animation, an enemy coming back after its respawn delay) is an entry in a
//! [`TaskQueue`] with a due time in game seconds. Entries capture the entity
//! handles they act on; whoever drains the queue must check those handles
//! still exist.

use bevy::prelude::*;

/// A task and the game time it becomes due.
#[derive(Debug, Clone)]
pub struct Scheduled<T> {
    pub due: f32,
    pub task: T,
}

/// Time-ordered queue of deferred tasks.
#[derive(Resource, Debug)]
pub struct TaskQueue<T: Send + Sync + 'static> {
    entries: Vec<Scheduled<T>>,
}

impl<T: Send + Sync + 'static> Default for TaskQueue<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: Send + Sync + 'static> TaskQueue<T> {
    pub fn schedule(&mut self, due: f32, task: T) {
        self.entries.push(Scheduled { due, task });
    }

    /// Remove and return every task due at `now`, earliest first.
    /// Tasks with equal due times keep their insertion order.
    pub fn drain_due(&mut self, now: f32) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.due <= now);
        self.entries = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|entry| entry.task).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
