//! Difficulty ramp: maps elapsed spawn cycles to a shrinking spawn interval and a matching
//! obstacle speed. Pure arithmetic over the current interval, so each cycle only needs the
//! previous value — no history is kept anywhere.

use bevy::prelude::*;

/// Tuning knobs for the ramp. The defaults reproduce the intended feel; none of the values are
/// load-bearing contracts and can be adjusted freely.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DifficultySettings {
    /// Spawn interval at run start, in milliseconds.
    pub start_interval_ms: f32,
    /// How much the interval shrinks after each spawn cycle.
    pub step_ms: f32,
    /// The interval never drops below this, which also caps obstacle speed.
    pub floor_ms: f32,
    /// Scroll speed magnitude is `speed_scale / interval_ms`, in px/s.
    pub speed_scale: f32,
    /// Obstacles move at the scroll speed divided by this, keeping jump timing fair.
    pub obstacle_speed_divisor: f32,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            start_interval_ms: 1500.0,
            step_ms: 10.0,
            floor_ms: 200.0,
            speed_scale: 5_000_000.0,
            obstacle_speed_divisor: 10.0,
        }
    }
}

impl DifficultySettings {
    /// Next spawn interval after one cycle: shrink by `step_ms`, clamped at the floor.
    pub fn ramp(&self, interval_ms: f32) -> f32 {
        (interval_ms - self.step_ms).max(self.floor_ms)
    }

    /// Leftward scroll speed (px/s, negative) associated with a spawn interval. Shorter
    /// intervals mean faster scroll; the interval floor caps the magnitude.
    pub fn scroll_speed(&self, interval_ms: f32) -> f32 {
        -self.speed_scale / interval_ms.max(self.floor_ms)
    }

    /// Horizontal velocity assigned to obstacles spawned at a given interval.
    pub fn obstacle_velocity(&self, interval_ms: f32) -> f32 {
        self.scroll_speed(interval_ms) / self.obstacle_speed_divisor
    }

    /// Fastest obstacle speed magnitude the ramp can ever produce.
    pub fn obstacle_speed_cap(&self) -> f32 {
        self.speed_scale / self.floor_ms / self.obstacle_speed_divisor
    }
}
