//! Frame ticker
//!
//! Turns absolute frame timestamps into deltas, independent of whether ticks
//! come from an animation-frame callback, an engine schedule or a test.

use crate::config::SmoothConfig;

#[derive(Debug, Clone)]
pub struct Ticker {
    last_ms: Option<f64>,
    lag_threshold_ms: Option<f64>,
    lag_adjusted_ms: f64,
}

impl Ticker {
    pub fn new(config: &SmoothConfig) -> Self {
        Self {
            last_ms: None,
            lag_threshold_ms: config.lag_threshold_ms,
            lag_adjusted_ms: config.lag_adjusted_ms,
        }
    }

    /// Record a frame at `now_ms`; returns seconds since the previous frame.
    ///
    /// The first frame reports zero. With lag smoothing disabled (the
    /// default) long gaps are reported in full so scroll-driven motion never
    /// falls behind the page.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let mut elapsed = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        if let Some(threshold) = self.lag_threshold_ms {
            if elapsed > threshold {
                elapsed = self.lag_adjusted_ms;
            }
        }

        self.last_ms = Some(now_ms);
        (elapsed / 1000.0) as f32
    }
}
