//! Pinned scroll region
//!
//! A region starts when the trigger element's top reaches the viewport top
//! and lasts `extent_viewports` viewport heights. While inside, the trigger
//! is translated down by exactly the distance scrolled so it appears frozen,
//! and the same distance is reserved after it as spacing.

/// Geometry of one pinned region, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedRegion {
    start: f32,
    extent: f32,
}

impl PinnedRegion {
    /// `start_px` is the trigger's document top
    pub fn new(start_px: f32, viewport_height: f32, extent_viewports: f32) -> Self {
        Self {
            start: start_px,
            extent: (viewport_height * extent_viewports).max(0.0),
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.start + self.extent
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Normalized position inside the region, clamped to [0, 1]
    pub fn progress(&self, scroll_y: f32) -> f32 {
        if self.extent <= 0.0 {
            return if scroll_y >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / self.extent).clamp(0.0, 1.0)
    }

    /// Translation keeping the pinned element visually fixed
    pub fn pin_offset(&self, scroll_y: f32) -> f32 {
        (scroll_y - self.start).clamp(0.0, self.extent)
    }

    /// Layout space reserved after the pinned element
    pub fn spacing(&self) -> f32 {
        self.extent
    }
}

/// Reports progress only when it changes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressTracker {
    last: Option<f32>,
}

impl ProgressTracker {
    /// Returns the new progress if it differs from the last reported one
    pub fn update(&mut self, progress: f32) -> Option<f32> {
        if self.last == Some(progress) {
            return None;
        }
        self.last = Some(progress);
        Some(progress)
    }

    /// Forget the last value so the next update always reports
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
