//! Race state machine.
//!
//! `Idle -> Racing -> Finished`, with [`RaceTracker::reset`] as the only way
//! back. Timestamps are world-time seconds.

use bevy_ecs::prelude::{Entity, Resource};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RaceState {
    #[default]
    Idle,
    Racing,
    Finished,
}

#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct RaceTracker {
    pub state: RaceState,
    pub racer: Option<Entity>,
    pub finish_zone: Option<Entity>,
    pub started_at: f32,
    pub finished_at: f32,
}

impl RaceTracker {
    /// Begin timing `racer` towards `finish_zone`.
    ///
    /// Without a finish zone the tracker stays idle and `false` is returned.
    pub fn start(&mut self, racer: Entity, finish_zone: Option<Entity>, now: f32) -> bool {
        let Some(zone) = finish_zone else {
            self.reset();
            return false;
        };
        self.state = RaceState::Racing;
        self.racer = Some(racer);
        self.finish_zone = Some(zone);
        self.started_at = now;
        self.finished_at = now;
        true
    }

    /// Stop the clock. Returns the race duration, or `None` when not racing.
    pub fn finish(&mut self, now: f32) -> Option<f32> {
        if self.state != RaceState::Racing {
            return None;
        }
        self.state = RaceState::Finished;
        self.finished_at = now;
        Some(self.finished_at - self.started_at)
    }

    /// Seconds on the race clock.
    pub fn current_elapsed(&self, now: f32) -> f32 {
        match self.state {
            RaceState::Idle => 0.0,
            RaceState::Racing => now - self.started_at,
            RaceState::Finished => self.finished_at - self.started_at,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
