//! Viewport-dependent model and camera placement

use bevy::prelude::*;
use scrollstage_core::{compute_placement, Placement};

use crate::camera::MainCamera;
use crate::model::{LoadedModel, ShowcaseModel};
use crate::{StageConfig, StageSet};

/// Current viewport size in CSS pixels.
///
/// Filled by the page integration; the window's own size follows the canvas
/// container and the device pixel ratio, so it is not used here.
#[derive(Debug, Clone, Copy, Resource, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportSize>()
            .add_systems(Update, place_model.in_set(StageSet::Place));
    }
}

/// Re-place the model when it becomes ready or the viewport changes
fn place_model(
    model: Res<LoadedModel>,
    viewport: Res<ViewportSize>,
    config: Res<StageConfig>,
    mut model_query: Query<&mut Transform, (With<ShowcaseModel>, Without<MainCamera>)>,
    mut camera_query: Query<&mut Transform, (With<MainCamera>, Without<ShowcaseModel>)>,
) {
    if !model.is_changed() && !viewport.is_changed() {
        return;
    }
    // Tolerates running before the model exists
    let Some((entity, bounds)) = model.ready() else {
        return;
    };
    let Ok(mut model_transform) = model_query.get_mut(entity) else {
        return;
    };
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let placement = compute_placement(&bounds, viewport.width, &config.placement);
    apply_placement(&mut model_transform, &mut camera_transform, &placement);
    tracing::info!(
        "Placed model for {:?} viewport ({}px): camera at z={:.3}",
        placement.layout,
        viewport.width,
        placement.camera_position.z
    );
}

/// Write a placement into the model and camera transforms.
///
/// Only the roll (Z of the XYZ Euler decomposition) is replaced, so any
/// scroll rotation already applied about X/Y survives a resize.
pub fn apply_placement(model: &mut Transform, camera: &mut Transform, placement: &Placement) {
    model.translation = placement.model_translation;
    let (x, y, _) = model.rotation.to_euler(EulerRot::XYZ);
    model.rotation = Quat::from_euler(EulerRot::XYZ, x, y, placement.roll);

    *camera = Transform::from_translation(placement.camera_position).looking_at(placement.camera_target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollstage_core::{ModelBounds, SceneConfig};

    use crate::model::ModelState;

    const EPS: f32 = 1e-4;

    fn setup(width: f32) -> (App, Entity, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(StageConfig(SceneConfig::default()))
            .insert_resource(ViewportSize { width, height: 800.0 })
            .init_resource::<LoadedModel>()
            .add_systems(Update, place_model);

        let model = app.world_mut().spawn((Transform::default(), ShowcaseModel)).id();
        let camera = app.world_mut().spawn((Transform::default(), MainCamera)).id();
        (app, model, camera)
    }

    fn make_ready(app: &mut App, entity: Entity) {
        let mut loaded = app.world_mut().resource_mut::<LoadedModel>();
        loaded.state = ModelState::Ready;
        loaded.entity = Some(entity);
        // center (0, 1, 0), size (1, 2, 0.5)
        loaded.bounds = Some(ModelBounds::new(Vec3::new(-0.5, 0.0, -0.25), Vec3::new(0.5, 2.0, 0.25)));
    }

    #[test]
    fn test_noop_before_model_ready() {
        let (mut app, model, camera) = setup(1440.0);
        app.update();

        assert_eq!(*app.world().get::<Transform>(model).unwrap(), Transform::default());
        assert_eq!(*app.world().get::<Transform>(camera).unwrap(), Transform::default());
    }

    #[test]
    fn test_places_on_ready_wide() {
        let (mut app, model, camera) = setup(1440.0);
        make_ready(&mut app, model);
        app.update();

        let model_transform = app.world().get::<Transform>(model).unwrap();
        let expected = Vec3::new(-0.01, -1.0 + 2.0 * 0.085, 0.0);
        assert!(model_transform.translation.abs_diff_eq(expected, EPS));
        let (_, _, roll) = model_transform.rotation.to_euler(EulerRot::XYZ);
        assert!((roll - 50f32.to_radians()).abs() < EPS);

        let camera_transform = app.world().get::<Transform>(camera).unwrap();
        assert!(camera_transform.translation.abs_diff_eq(Vec3::new(0.0, 0.0, 2.5), EPS));
        assert!(camera_transform.forward().as_vec3().abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn test_replaces_on_resize() {
        let (mut app, model, camera) = setup(1440.0);
        make_ready(&mut app, model);
        app.update();

        app.world_mut().resource_mut::<ViewportSize>().width = 600.0;
        app.update();

        let model_transform = app.world().get::<Transform>(model).unwrap();
        assert!(model_transform.translation.abs_diff_eq(Vec3::new(1.0, -0.83, 0.0), EPS));
        let (_, _, roll) = model_transform.rotation.to_euler(EulerRot::XYZ);
        assert!(roll.abs() < EPS);

        let camera_transform = app.world().get::<Transform>(camera).unwrap();
        assert!(camera_transform.translation.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), EPS));
    }

    #[test]
    fn test_apply_keeps_pitch_and_yaw() {
        let mut model = Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, 0.3, -0.2, 1.0));
        let mut camera = Transform::default();
        let placement = Placement {
            layout: scrollstage_core::Layout::Wide,
            model_translation: Vec3::new(1.0, 2.0, 3.0),
            roll: 0.5,
            camera_position: Vec3::new(0.0, 0.0, 10.0),
            camera_target: Vec3::ZERO,
        };
        apply_placement(&mut model, &mut camera, &placement);

        let (x, y, z) = model.rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.3).abs() < EPS);
        assert!((y + 0.2).abs() < EPS);
        assert!((z - 0.5).abs() < EPS);
        assert_eq!(model.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.translation, Vec3::new(0.0, 0.0, 10.0));
    }
}
