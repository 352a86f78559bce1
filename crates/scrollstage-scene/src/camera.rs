//! Camera and clear color

use bevy::prelude::*;

use crate::StageConfig;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the showcase camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands, config: Res<StageConfig>) {
    // Transparent clear lets the page show through the canvas
    let clear = if config.render.transparent {
        Color::NONE
    } else {
        Color::BLACK
    };
    commands.insert_resource(ClearColor(clear));

    // Aspect follows the window automatically; placement moves the camera
    // once the model is measured
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));
}
