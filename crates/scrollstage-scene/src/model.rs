//! glTF model loading and bounds measurement
//!
//! The model is requested once at startup. When the glTF finishes loading
//! its scene is spawned under a `ShowcaseModel` root; once the scene's
//! meshes are present their bounds are measured in model space and the
//! model becomes `Ready`. A failed load is logged and never retried.

use bevy::asset::LoadState;
use bevy::camera::primitives::MeshAabb;
use bevy::gltf::Gltf;
use bevy::math::Affine3A;
use bevy::prelude::*;
use scrollstage_core::ModelBounds;

use crate::{StageConfig, StageSet};

/// Root entity of the spawned model
#[derive(Component)]
pub struct ShowcaseModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelState {
    #[default]
    NotRequested,
    Loading,
    /// Scene spawned, waiting for meshes to measure
    Spawned,
    Ready,
    Failed,
}

/// Shared reference to the loaded model
#[derive(Resource, Default, Debug)]
pub struct LoadedModel {
    pub state: ModelState,
    pub handle: Option<Handle<Gltf>>,
    pub entity: Option<Entity>,
    /// Model-space bounds, known once `Ready`
    pub bounds: Option<ModelBounds>,
}

impl LoadedModel {
    /// Entity and bounds once the model can be placed and animated
    pub fn ready(&self) -> Option<(Entity, ModelBounds)> {
        match (self.state, self.entity, self.bounds) {
            (ModelState::Ready, Some(entity), Some(bounds)) => Some((entity, bounds)),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready().is_some()
    }
}

pub struct ModelPlugin;

impl Plugin for ModelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadedModel>()
            .add_systems(Startup, request_model)
            .add_systems(Update, (poll_model_load, measure_model_bounds).chain().in_set(StageSet::Load));
    }
}

/// Normalize a configured model path into an asset path
pub fn asset_path(path: &str) -> String {
    // Absolute URLs load through the https asset source
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    path.trim_start_matches('/').to_string()
}

fn request_model(mut model: ResMut<LoadedModel>, asset_server: Res<AssetServer>, config: Res<StageConfig>) {
    let path = asset_path(&config.model.path);
    tracing::info!("Loading model: {}", path);
    model.handle = Some(asset_server.load(path));
    model.state = ModelState::Loading;
}

/// Check loading state and spawn the scene once the glTF is in
fn poll_model_load(
    mut commands: Commands,
    mut model: ResMut<LoadedModel>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    if model.state != ModelState::Loading {
        return;
    }
    let Some(handle) = model.handle.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(gltf) = gltf_assets.get(&handle) else {
                return;
            };
            // Use first scene if no default
            let Some(scene) = gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()) else {
                tracing::error!("Model has no scenes, nothing to show");
                model.state = ModelState::Failed;
                return;
            };

            let entity = commands
                .spawn((SceneRoot(scene), Transform::default(), Visibility::default(), ShowcaseModel))
                .id();
            tracing::info!("Model loaded, spawned as {:?}", entity);
            model.entity = Some(entity);
            model.state = ModelState::Spawned;
        }
        Some(LoadState::Failed(err)) => {
            tracing::error!("Failed to load model: {}", err);
            model.state = ModelState::Failed;
        }
        _ => {
            // Still loading
        }
    }
}

/// Measure the spawned scene's mesh bounds relative to the model root
fn measure_model_bounds(
    mut model: ResMut<LoadedModel>,
    children_query: Query<&Children>,
    node_query: Query<(&Transform, Option<&Mesh3d>)>,
    meshes: Res<Assets<Mesh>>,
) {
    if model.state != ModelState::Spawned {
        return;
    }
    let Some(root) = model.entity else {
        return;
    };

    // The root's own transform is left out so later placement does not
    // feed back into the measurement
    let mut bounds = ModelBounds::empty();
    if let Ok(children) = children_query.get(root) {
        for child in children.iter() {
            collect_bounds(child, Affine3A::IDENTITY, &children_query, &node_query, &meshes, &mut bounds);
        }
    }

    // Scene instances appear a frame after the root; try again next frame
    if bounds.is_empty() {
        return;
    }

    let size = bounds.size();
    tracing::info!(
        "Model measured: size ({:.3}, {:.3}, {:.3}), center {:?}",
        size.x,
        size.y,
        size.z,
        bounds.center()
    );
    model.bounds = Some(bounds);
    model.state = ModelState::Ready;
}

/// Recursively accumulate mesh AABBs; `parent` maps into model space
fn collect_bounds(
    entity: Entity,
    parent: Affine3A,
    children_query: &Query<&Children>,
    node_query: &Query<(&Transform, Option<&Mesh3d>)>,
    meshes: &Assets<Mesh>,
    bounds: &mut ModelBounds,
) {
    let Ok((transform, mesh)) = node_query.get(entity) else {
        return;
    };
    let affine = parent * transform.compute_affine();

    if let Some(aabb) = mesh.and_then(|m| meshes.get(&m.0)).and_then(|m| m.compute_aabb()) {
        let center = Vec3::from(aabb.center);
        let half = Vec3::from(aabb.half_extents);
        for corner in box_corners(center - half, center + half) {
            bounds.include_point(affine.transform_point3(corner));
        }
    }

    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            collect_bounds(child, affine, children_query, node_query, meshes, bounds);
        }
    }
}

fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path() {
        assert_eq!(asset_path("/wand.glb"), "wand.glb");
        assert_eq!(asset_path("models/wand.glb"), "models/wand.glb");
        assert_eq!(asset_path("https://cdn.example.com/wand.glb"), "https://cdn.example.com/wand.glb");
    }

    #[test]
    fn test_ready_requires_bounds() {
        let mut model = LoadedModel::default();
        assert!(!model.is_ready());

        model.entity = Some(Entity::PLACEHOLDER);
        model.state = ModelState::Spawned;
        assert!(!model.is_ready());

        model.bounds = Some(ModelBounds::new(Vec3::ZERO, Vec3::ONE));
        model.state = ModelState::Ready;
        assert_eq!(model.ready().map(|(_, b)| b.size()), Some(Vec3::ONE));
    }

    #[test]
    fn test_box_corners_span_box() {
        let mut bounds = ModelBounds::empty();
        for corner in box_corners(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0)) {
            bounds.include_point(corner);
        }
        assert_eq!(bounds.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_measures_child_meshes_in_model_space() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .add_systems(Update, measure_model_bounds);

        let cube = app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::new(2.0, 2.0, 2.0));

        // The root's own offset must not leak into the bounds
        let root = app
            .world_mut()
            .spawn((Transform::from_xyz(100.0, 0.0, 0.0), ShowcaseModel))
            .id();
        let node = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 3.0, 0.0), ChildOf(root)))
            .id();
        app.world_mut()
            .spawn((Transform::from_xyz(1.0, 0.0, 0.0), Mesh3d(cube), ChildOf(node)));

        app.insert_resource(LoadedModel {
            state: ModelState::Spawned,
            entity: Some(root),
            ..default()
        });
        app.update();

        let model = app.world().resource::<LoadedModel>();
        assert_eq!(model.state, ModelState::Ready);
        let bounds = model.bounds.unwrap();
        assert!(bounds.min.abs_diff_eq(Vec3::new(0.0, 2.0, -1.0), 1e-5));
        assert!(bounds.max.abs_diff_eq(Vec3::new(2.0, 4.0, 1.0), 1e-5));
    }

    #[test]
    fn test_waits_for_scene_children() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .add_systems(Update, measure_model_bounds);

        let root = app.world_mut().spawn((Transform::default(), ShowcaseModel)).id();
        app.insert_resource(LoadedModel {
            state: ModelState::Spawned,
            entity: Some(root),
            ..default()
        });
        app.update();

        let model = app.world().resource::<LoadedModel>();
        assert_eq!(model.state, ModelState::Spawned);
        assert!(model.bounds.is_none());
    }
}
