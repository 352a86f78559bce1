//! Smooth-scroll emulation
//!
//! Wheel input moves a target position; the applied position chases it with
//! exponential damping so the page glides instead of jumping in wheel-sized
//! steps. Damping is expressed per 60 Hz frame but integrated over real
//! elapsed time, so the motion looks the same at any frame rate.

use crate::config::SmoothConfig;

/// Remaining distance (px) under which the position snaps to the target
const SNAP_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct SmoothScroll {
    current: f32,
    target: f32,
    limit: f32,
    lerp: f32,
    wheel_multiplier: f32,
    animating: bool,
}

impl SmoothScroll {
    pub fn new(config: &SmoothConfig) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            limit: 0.0,
            lerp: config.lerp,
            wheel_multiplier: config.wheel_multiplier,
            animating: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Maximum scroll position; re-clamps the target
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
    }

    /// Feed a wheel delta in pixels
    pub fn wheel(&mut self, delta_y: f32) {
        self.scroll_to(self.target + delta_y * self.wheel_multiplier);
    }

    /// Start gliding toward an absolute position
    pub fn scroll_to(&mut self, position: f32) {
        self.target = position.clamp(0.0, self.limit);
        self.animating = self.target != self.current;
    }

    /// Adopt a position the page reached on its own (scrollbar, keyboard).
    /// Ignored while a glide is running.
    pub fn sync(&mut self, native_y: f32) {
        if self.animating {
            return;
        }
        self.current = native_y;
        self.target = native_y;
    }

    /// Advance by `dt` seconds; returns the new position if it moved
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if !self.animating {
            return None;
        }

        let lambda = self.lerp * 60.0;
        let t = 1.0 - (-lambda * dt.max(0.0)).exp();
        self.current += (self.target - self.current) * t;

        if (self.target - self.current).abs() < SNAP_DISTANCE {
            self.current = self.target;
            self.animating = false;
        }
        Some(self.current)
    }
}
