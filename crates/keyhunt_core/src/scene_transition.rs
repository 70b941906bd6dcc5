//! Delayed scene loads
//!
//! A [`Scheduler`] holds one-shot timers. Each timer counts game time
//! (advanced by the frame delta, not wall-clock) and, when due, is handed
//! back to the caller so the scene manager can perform the load.

use std::time::Duration;

/// How a scene load affects the scenes already on the stack
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Replace every active scene
    #[default]
    Single,
    /// Push on top of the current scene as an overlay
    Additive,
}

/// A scene load waiting for its delay to elapse
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSceneLoad {
    /// Name of the scene to load
    to_scene: String,
    delay: Duration,
    elapsed: Duration,
    mode: LoadMode,
}

impl PendingSceneLoad {
    pub fn new(to_scene: impl Into<String>, delay: Duration, mode: LoadMode) -> Self {
        Self {
            to_scene: to_scene.into(),
            delay,
            elapsed: Duration::ZERO,
            mode,
        }
    }

    /// Advance the timer by `dt` seconds
    ///
    /// Returns true once the delay has fully elapsed. Negative or
    /// non-finite deltas do not advance the timer.
    pub fn advance(&mut self, dt: f32) -> bool {
        let step = Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO);
        self.elapsed = self.elapsed.saturating_add(step);
        self.is_due()
    }

    pub fn is_due(&self) -> bool {
        self.elapsed >= self.delay
    }

    /// Time left before the load fires
    pub fn remaining(&self) -> Duration {
        self.delay.saturating_sub(self.elapsed)
    }

    /// Progress from 0.0 (just scheduled) to 1.0 (due)
    pub fn progress(&self) -> f32 {
        if self.delay.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.delay.as_secs_f32()).min(1.0)
    }

    pub fn to_scene(&self) -> &str {
        &self.to_scene
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }
}

/// One-shot timers owned by a scene
///
/// Timers cannot be cancelled once scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<PendingSceneLoad>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a scene load to happen after `delay`
    pub fn schedule_scene_load(&mut self, to_scene: impl Into<String>, delay: Duration, mode: LoadMode) {
        let load = PendingSceneLoad::new(to_scene, delay, mode);
        log::debug!("Scheduled load of '{}' in {:?}", load.to_scene(), delay);
        self.pending.push(load);
    }

    /// Advance all timers, returning the loads that became due (in schedule order)
    pub fn advance(&mut self, dt: f32) -> Vec<PendingSceneLoad> {
        self.advance_oldest(self.pending.len(), dt)
    }

    /// Advance only the first `count` timers in schedule order
    ///
    /// Timers past `count` keep their elapsed time, so a load scheduled partway
    /// through a frame starts counting on the next one.
    pub fn advance_oldest(&mut self, count: usize, dt: f32) -> Vec<PendingSceneLoad> {
        let count = count.min(self.pending.len());
        let fresh = self.pending.split_off(count);

        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(count + fresh.len());
        for mut load in self.pending.drain(..) {
            if load.advance(dt) {
                due.push(load);
            } else {
                waiting.push(load);
            }
        }
        waiting.extend(fresh);
        self.pending = waiting;
        due
    }

    pub fn pending(&self) -> &[PendingSceneLoad] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
