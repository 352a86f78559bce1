//! Model placement for narrow and wide viewports
//!
//! The model is shifted so its bounding-box center lands next to (narrow) or
//! slightly left of (wide) the origin, lifted a little, and the camera is
//! pulled back along +Z proportionally to the model's largest dimension.

use glam::Vec3;

use crate::config::PlacementConfig;

/// Viewport class used to pick layout constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Narrow,
    Wide,
}

impl Layout {
    /// Narrow when strictly below the breakpoint
    pub fn classify(viewport_width: f32, breakpoint_px: f32) -> Self {
        if viewport_width < breakpoint_px {
            Layout::Narrow
        } else {
            Layout::Wide
        }
    }
}

/// Axis-aligned bounding box of a model in its own space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ModelBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds containing nothing; grows with `include`
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Grow to contain another box
    pub fn include(&mut self, min: Vec3, max: Vec3) {
        self.min = self.min.min(min);
        self.max = self.max.max(max);
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.include(point, point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}

/// Result of placing a model for a given viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub layout: Layout,
    pub model_translation: Vec3,
    /// Rotation about the model's forward (Z) axis, radians
    pub roll: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
}

pub fn compute_placement(bounds: &ModelBounds, viewport_width: f32, config: &PlacementConfig) -> Placement {
    let layout = Layout::classify(viewport_width, config.breakpoint_px);
    let center = bounds.center();
    let size = bounds.size();

    let (x, roll, camera_factor) = match layout {
        Layout::Narrow => (center.x + size.x * config.narrow_offset_x, 0.0, config.narrow_camera_factor),
        Layout::Wide => (
            -center.x - size.x * config.wide_offset_x,
            config.wide_roll_degrees.to_radians(),
            config.wide_camera_factor,
        ),
    };

    Placement {
        layout,
        model_translation: Vec3::new(x, -center.y + size.y * config.lift_y, -center.z),
        roll,
        camera_position: Vec3::new(0.0, 0.0, bounds.max_dimension() * camera_factor),
        camera_target: Vec3::ZERO,
    }
}
