//! Scrollstage Scene - Bevy plugins for the scroll-driven model showcase
//!
//! This crate renders the showcase model and keeps it in sync with the page:
//! camera and light rig, glTF loading with bounds measurement, viewport
//! placement, and the system that feeds scroll progress into the binder.
//! Browser-specific input and DOM output live in `scrollstage-web`.

pub mod animation;
pub mod camera;
pub mod lighting;
pub mod model;
pub mod placement;

use bevy::prelude::*;
use scrollstage_core::SceneConfig;

/// Scene configuration shared by all plugins
#[derive(Debug, Clone, Resource, Deref)]
pub struct StageConfig(pub SceneConfig);

/// Ordering of the per-frame work.
///
/// Scroll sources should run before `Animate`; DOM writers after it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageSet {
    Load,
    Place,
    Animate,
}

/// Plugin that sets up the whole showcase scene
pub struct ScrollStagePlugin {
    pub config: SceneConfig,
}

impl Plugin for ScrollStagePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(StageConfig(self.config.clone()))
            .configure_sets(Update, (StageSet::Load, StageSet::Place, StageSet::Animate).chain())
            .add_plugins(camera::CameraPlugin)
            .add_plugins(lighting::LightingPlugin)
            .add_plugins(model::ModelPlugin)
            .add_plugins(placement::PlacementPlugin)
            .add_plugins(animation::AnimationPlugin);
    }
}

// Re-export commonly used types
pub use animation::{ScrollAnimator, ScrollProgressChanged, TargetOffsets};
pub use camera::MainCamera;
pub use model::{LoadedModel, ModelState, ShowcaseModel};
pub use placement::ViewportSize;
