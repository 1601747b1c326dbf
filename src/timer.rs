use crate::config::TIMER_EPSILON;

/// Accumulates simulated seconds toward a fixed duration.
///
/// Elapsed time is summed in f64 and compared with a small tolerance, so a
/// duration is reached on the frame where `n * dt` equals it for ordinary frame rates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    duration: f32,
    elapsed: f64,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    pub fn remaining(&self) -> f32 {
        (f64::from(self.duration) - self.elapsed).max(0.0) as f32
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= f64::from(self.duration) - TIMER_EPSILON
    }

    /// Add `dt` and report whether the duration has been reached. A finished timer stops counting.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_finished() {
            self.elapsed += f64::from(dt.max(0.0));
        }
        self.is_finished()
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
