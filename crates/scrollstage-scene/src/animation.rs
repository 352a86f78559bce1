//! Scroll progress → binder → model rotation and DOM offsets

use bevy::prelude::*;
use scrollstage_core::{OffsetSink, RotationOutcome, RotationTarget, ScrollBinder};
use std::collections::BTreeMap;

use crate::model::{LoadedModel, ShowcaseModel};
use crate::{StageConfig, StageSet};

/// New progress through the pinned region, in [0, 1]
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ScrollProgressChanged(pub f32);

/// The binder and its rotation accumulator
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct ScrollAnimator(pub ScrollBinder);

/// Latest vertical offset (vh) per bound selector, waiting to be written
/// to the page
#[derive(Resource, Debug, Default)]
pub struct TargetOffsets {
    offsets: BTreeMap<String, f32>,
    dirty: bool,
}

impl TargetOffsets {
    pub fn get(&self, selector: &str) -> Option<f32> {
        self.offsets.get(selector).copied()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hand out the offsets if anything changed since the last drain
    pub fn drain_dirty(&mut self) -> Option<impl Iterator<Item = (&str, f32)>> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.offsets.iter().map(|(selector, offset)| (selector.as_str(), *offset)))
    }
}

impl OffsetSink for TargetOffsets {
    fn set_offset(&mut self, selector: &str, offset_vh: f32) {
        if self.offsets.get(selector) != Some(&offset_vh) {
            self.offsets.insert(selector.to_string(), offset_vh);
            self.dirty = true;
        }
    }
}

/// Rotation target backed by an entity's transform
struct LocalRotation<'a>(&'a mut Transform);

impl RotationTarget for LocalRotation<'_> {
    fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        self.0.rotate_local(Quat::from_axis_angle(axis, angle));
    }
}

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ScrollProgressChanged>()
            .init_resource::<TargetOffsets>()
            .add_systems(Startup, init_animator)
            .add_systems(Update, apply_scroll_progress.in_set(StageSet::Animate));
    }
}

fn init_animator(mut commands: Commands, config: Res<StageConfig>) {
    commands.insert_resource(ScrollAnimator(ScrollBinder::new(&config.scroll)));
}

/// Feed every progress update of this frame through the binder
pub fn apply_scroll_progress(
    mut events: MessageReader<ScrollProgressChanged>,
    animator: Option<ResMut<ScrollAnimator>>,
    mut offsets: ResMut<TargetOffsets>,
    model: Res<LoadedModel>,
    mut model_query: Query<&mut Transform, With<ShowcaseModel>>,
) {
    let Some(mut animator) = animator else {
        return;
    };

    for ScrollProgressChanged(progress) in events.read().copied() {
        // Absent until loaded and measured; the binder then skips rotation
        let mut transform = model
            .ready()
            .and_then(|(entity, _)| model_query.get_mut(entity).ok());
        let mut target = transform.as_deref_mut().map(LocalRotation);

        let update = animator.on_progress(progress, target.as_mut(), &mut *offsets);
        if let RotationOutcome::Rotated(step) = update.rotation {
            tracing::trace!(progress, delta = step.delta, "Scroll rotation applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollstage_core::{ModelBounds, SceneConfig};
    use std::f32::consts::TAU;

    use crate::model::ModelState;

    fn setup() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(StageConfig(SceneConfig::default()))
            .init_resource::<LoadedModel>()
            .add_plugins(AnimationPlugin);

        let model = app.world_mut().spawn((Transform::default(), ShowcaseModel)).id();
        // Runs Startup so the animator exists
        app.update();
        (app, model)
    }

    fn make_ready(app: &mut App, entity: Entity) {
        let mut loaded = app.world_mut().resource_mut::<LoadedModel>();
        loaded.state = ModelState::Ready;
        loaded.entity = Some(entity);
        loaded.bounds = Some(ModelBounds::new(Vec3::ZERO, Vec3::ONE));
    }

    fn scroll(app: &mut App, progress: f32) {
        app.world_mut().write_message(ScrollProgressChanged(progress));
        app.update();
    }

    fn accumulator(app: &App) -> f32 {
        app.world().resource::<ScrollAnimator>().accumulator()
    }

    fn rotation(app: &App, entity: Entity) -> Quat {
        app.world().get::<Transform>(entity).unwrap().rotation
    }

    #[test]
    fn test_offsets_written_without_model() {
        let (mut app, model) = setup();
        scroll(&mut app, 0.25);

        let offsets = app.world().resource::<TargetOffsets>();
        assert_eq!(offsets.get(".header-1"), Some(-25.0));
        assert_eq!(offsets.get(".header-2"), Some(35.0));
        assert!(offsets.is_dirty());

        // Not loaded: no rotation and no drift
        assert_eq!(accumulator(&app), 0.0);
        assert_eq!(rotation(&app, model), Quat::IDENTITY);
    }

    #[test]
    fn test_rotates_loaded_model_about_local_axis() {
        let (mut app, model) = setup();
        make_ready(&mut app, model);
        scroll(&mut app, 0.5);

        let axis = Vec3::new(1.0, 0.2, 0.2).normalize();
        let expected = Quat::from_axis_angle(axis, TAU * 0.5);
        assert!(rotation(&app, model).abs_diff_eq(expected, 1e-5));
        assert!((accumulator(&app) - TAU * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_reverse_scroll_unwinds_rotation() {
        let (mut app, model) = setup();
        make_ready(&mut app, model);
        scroll(&mut app, 0.8);
        scroll(&mut app, 0.3);

        let axis = Vec3::new(1.0, 0.2, 0.2).normalize();
        let expected = Quat::from_axis_angle(axis, TAU * 0.3);
        let actual = rotation(&app, model);
        // q and -q are the same orientation
        assert!(actual.dot(expected).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_dead_zone_leaves_model_alone() {
        let (mut app, model) = setup();
        make_ready(&mut app, model);
        scroll(&mut app, 0.05);

        assert_eq!(rotation(&app, model), Quat::IDENTITY);
        assert_eq!(accumulator(&app), 0.0);
    }

    #[test]
    fn test_drain_dirty_once() {
        let mut offsets = TargetOffsets::default();
        offsets.set_offset(".a", -10.0);
        assert_eq!(offsets.drain_dirty().map(|it| it.count()), Some(1));
        assert!(offsets.drain_dirty().is_none());

        // Same value again does not re-dirty
        offsets.set_offset(".a", -10.0);
        assert!(!offsets.is_dirty());
        offsets.set_offset(".a", -11.0);
        assert!(offsets.is_dirty());
    }
}
