//! Scroll-to-animation binder
//!
//! Maps one progress value in [0, 1] to a vertical offset for every bound
//! page element and to an incremental rotation of the model. The rotation
//! accumulator stores the last applied *absolute* angle, so the final
//! orientation only depends on the latest progress, never on how many
//! updates arrived in between.

use glam::Vec3;
use tracing::debug;

use crate::bindings::TargetBindings;
use crate::config::ScrollConfig;

/// Something that can be rotated in its own local frame
pub trait RotationTarget {
    /// Rotate by `angle` radians about a unit `axis` in local space
    fn rotate_on_axis(&mut self, axis: Vec3, angle: f32);
}

/// Receiver for per-element vertical offsets
pub trait OffsetSink {
    /// Set the vertical translation of every element matching `selector`, in vh
    fn set_offset(&mut self, selector: &str, offset_vh: f32);
}

/// A rotation the binder applied to the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationStep {
    /// Unit axis the delta was applied about
    pub axis: Vec3,
    /// Incremental angle applied on this update
    pub delta: f32,
    /// Absolute angle the model now has from scroll
    pub target: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationOutcome {
    /// Progress is inside the dead zone at the start of the region
    DeadZone,
    /// No model yet
    NotLoaded,
    /// Delta too small to be worth applying
    BelowThreshold,
    Rotated(RotationStep),
}

/// What a single `on_progress` call did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinderUpdate {
    /// Shared translation before per-target bias, in vh
    pub translate_vh: f32,
    pub rotation: RotationOutcome,
}

#[derive(Debug, Clone)]
pub struct ScrollBinder {
    accumulator: f32,
    bindings: TargetBindings,
    axis: Vec3,
    dead_zone: f32,
    min_delta: f32,
    full_turn: f32,
    travel_vh: f32,
}

impl Default for ScrollBinder {
    fn default() -> Self {
        Self::new(&ScrollConfig::default())
    }
}

impl ScrollBinder {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            accumulator: 0.0,
            bindings: config.bindings.clone(),
            axis: config.axis_vec().try_normalize().unwrap_or(Vec3::X),
            dead_zone: config.dead_zone,
            min_delta: config.min_delta,
            full_turn: config.full_turn,
            travel_vh: config.travel_vh,
        }
    }

    /// Last applied absolute rotation angle
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn bindings(&self) -> &TargetBindings {
        &self.bindings
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Shared vertical translation for a progress value
    pub fn translate_vh(&self, progress: f32) -> f32 {
        -progress * self.travel_vh
    }

    /// Apply one progress update.
    ///
    /// Offsets are always written. Rotation is skipped inside the dead zone
    /// and while `model` is `None`; in both cases the accumulator is left
    /// untouched. Progress is expected to be pre-clamped by the caller.
    pub fn on_progress<M, S>(&mut self, progress: f32, model: Option<&mut M>, sink: &mut S) -> BinderUpdate
    where
        M: RotationTarget + ?Sized,
        S: OffsetSink + ?Sized,
    {
        let translate_vh = self.translate_vh(progress);
        for binding in self.bindings.iter() {
            sink.set_offset(&binding.selector, binding.offset(translate_vh));
        }

        let rotation = self.rotate(progress, model);
        BinderUpdate { translate_vh, rotation }
    }

    fn rotate<M: RotationTarget + ?Sized>(&mut self, progress: f32, model: Option<&mut M>) -> RotationOutcome {
        if progress < self.dead_zone {
            return RotationOutcome::DeadZone;
        }
        let Some(model) = model else {
            return RotationOutcome::NotLoaded;
        };

        let target = self.full_turn * progress;
        let delta = target - self.accumulator;
        if delta.abs() <= self.min_delta {
            return RotationOutcome::BelowThreshold;
        }

        model.rotate_on_axis(self.axis, delta);
        self.accumulator = target;
        debug!(progress, delta, target, "Rotated model from scroll");

        RotationOutcome::Rotated(RotationStep {
            axis: self.axis,
            delta,
            target,
        })
    }
}
