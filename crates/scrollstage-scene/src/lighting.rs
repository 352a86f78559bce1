//! Light rig - ambient fill plus a key and a back directional light

use bevy::prelude::*;
use scrollstage_core::config::LightsConfig;

use crate::StageConfig;

/// Ambient brightness (cd/m²) per unit of configured intensity
const AMBIENT_PER_UNIT: f32 = 100.0;

/// Directional illuminance (lux) per unit of configured intensity
const ILLUMINANCE_PER_UNIT: f32 = 1_000.0;

/// Marker for the key light
#[derive(Component)]
pub struct MainLight;

/// Marker for the back/fill light
#[derive(Component)]
pub struct FillLight;

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lights);
    }
}

fn setup_lights(mut commands: Commands, config: Res<StageConfig>) {
    let lights = &config.lights;

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: ambient_brightness(lights),
        ..default()
    });

    // Directional lights shine from their position toward the origin
    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: lights.main_intensity * ILLUMINANCE_PER_UNIT,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(lights.main_position)).looking_at(Vec3::ZERO, Vec3::Y),
        MainLight,
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: lights.fill_intensity * ILLUMINANCE_PER_UNIT,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(lights.fill_position)).looking_at(Vec3::ZERO, Vec3::Y),
        FillLight,
    ));

    tracing::debug!(
        ambient = lights.ambient_intensity,
        main = lights.main_intensity,
        fill = lights.fill_intensity,
        "Light rig ready"
    );
}

fn ambient_brightness(lights: &LightsConfig) -> f32 {
    lights.ambient_intensity * AMBIENT_PER_UNIT
}
