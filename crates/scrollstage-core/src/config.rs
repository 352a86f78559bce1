//! Scene configuration loading and validation

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use thiserror::Error;
use tracing::info;

use crate::bindings::TargetBindings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse scene config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize scene config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid scene config: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lights: LightsConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub smooth: SmoothConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Asset path of the glTF model
    #[serde(default = "default_model_path")]
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

fn default_model_path() -> String {
    "/wand.glb".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Selector of the canvas the renderer draws into
    #[serde(default = "default_canvas")]
    pub canvas: String,
    /// Selector of the element that hosts the canvas
    #[serde(default = "default_container")]
    pub container: String,
    /// Clear to transparent so the page shows through
    #[serde(default = "default_true")]
    pub transparent: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: default_canvas(),
            container: default_container(),
            transparent: true,
        }
    }
}

fn default_canvas() -> String {
    "#scrollstage-canvas".to_string()
}

fn default_container() -> String {
    ".model-container".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_fov() -> f32 {
    60.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

/// Light rig: one ambient term and two directional lights.
///
/// Intensities use the unitless scale page authors are used to
/// (1.0 = "normal"); the renderer converts them to physical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightsConfig {
    #[serde(default = "default_ambient")]
    pub ambient_intensity: f32,
    #[serde(default = "default_main_intensity")]
    pub main_intensity: f32,
    #[serde(default = "default_main_position")]
    pub main_position: [f32; 3],
    #[serde(default = "default_fill_intensity")]
    pub fill_intensity: f32,
    #[serde(default = "default_fill_position")]
    pub fill_position: [f32; 3],
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: default_ambient(),
            main_intensity: default_main_intensity(),
            main_position: default_main_position(),
            fill_intensity: default_fill_intensity(),
            fill_position: default_fill_position(),
        }
    }
}

fn default_ambient() -> f32 {
    2.0
}

fn default_main_intensity() -> f32 {
    3.0
}

fn default_main_position() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_fill_intensity() -> f32 {
    3.5
}

fn default_fill_position() -> [f32; 3] {
    [-2.0, 0.0, -2.0]
}

/// Layout constants for narrow (mobile) and wide (desktop) viewports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Viewports narrower than this are "narrow"
    #[serde(default = "default_breakpoint")]
    pub breakpoint_px: f32,
    /// Horizontal shift in model widths, narrow layout (to the right)
    #[serde(default = "default_narrow_offset_x")]
    pub narrow_offset_x: f32,
    /// Horizontal shift in model widths, wide layout (to the left)
    #[serde(default = "default_wide_offset_x")]
    pub wide_offset_x: f32,
    /// Vertical lift in model heights
    #[serde(default = "default_lift_y")]
    pub lift_y: f32,
    /// Roll about the forward axis in the wide layout
    #[serde(default = "default_wide_roll")]
    pub wide_roll_degrees: f32,
    /// Camera distance in multiples of the largest model dimension
    #[serde(default = "default_narrow_camera_factor")]
    pub narrow_camera_factor: f32,
    #[serde(default = "default_wide_camera_factor")]
    pub wide_camera_factor: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: default_breakpoint(),
            narrow_offset_x: default_narrow_offset_x(),
            wide_offset_x: default_wide_offset_x(),
            lift_y: default_lift_y(),
            wide_roll_degrees: default_wide_roll(),
            narrow_camera_factor: default_narrow_camera_factor(),
            wide_camera_factor: default_wide_camera_factor(),
        }
    }
}

fn default_breakpoint() -> f32 {
    1000.0
}

fn default_narrow_offset_x() -> f32 {
    1.0
}

fn default_wide_offset_x() -> f32 {
    0.01
}

fn default_lift_y() -> f32 {
    0.085
}

fn default_wide_roll() -> f32 {
    50.0
}

fn default_narrow_camera_factor() -> f32 {
    2.0
}

fn default_wide_camera_factor() -> f32 {
    1.25
}

/// Pinned scroll region and the binder driven by it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Element whose top reaching the viewport top starts the region
    #[serde(default = "default_trigger")]
    pub trigger: String,
    /// Region length in viewport heights
    #[serde(default = "default_extent_viewports")]
    pub extent_viewports: f32,
    /// Progress below this never rotates the model
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,
    /// Rotation deltas at or below this (radians) are dropped
    #[serde(default = "default_min_delta")]
    pub min_delta: f32,
    /// Rotation at progress 1.0 (radians)
    #[serde(default = "default_full_turn")]
    pub full_turn: f32,
    /// Local rotation axis; normalized before use
    #[serde(default = "default_axis")]
    pub axis: [f32; 3],
    /// Total upward travel of bound targets over the region, in vh
    #[serde(default = "default_travel_vh")]
    pub travel_vh: f32,
    #[serde(default)]
    pub bindings: TargetBindings,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            extent_viewports: default_extent_viewports(),
            dead_zone: default_dead_zone(),
            min_delta: default_min_delta(),
            full_turn: default_full_turn(),
            axis: default_axis(),
            travel_vh: default_travel_vh(),
            bindings: TargetBindings::default(),
        }
    }
}

impl ScrollConfig {
    pub fn axis_vec(&self) -> Vec3 {
        Vec3::from_array(self.axis)
    }
}

fn default_trigger() -> String {
    ".product-overview".to_string()
}

fn default_extent_viewports() -> f32 {
    2.0
}

fn default_dead_zone() -> f32 {
    0.1
}

fn default_min_delta() -> f32 {
    0.001
}

fn default_full_turn() -> f32 {
    TAU
}

fn default_axis() -> [f32; 3] {
    [1.0, 0.2, 0.2]
}

fn default_travel_vh() -> f32 {
    100.0
}

/// Smooth-scroll emulation and the ticker feeding it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fraction of the remaining distance covered per 60 Hz frame
    #[serde(default = "default_lerp")]
    pub lerp: f32,
    /// Scale applied to wheel deltas
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f32,
    /// Frame gaps longer than this are shortened; unset disables lag smoothing
    #[serde(default)]
    pub lag_threshold_ms: Option<f64>,
    /// Delta reported instead of an over-threshold gap
    #[serde(default = "default_lag_adjusted")]
    pub lag_adjusted_ms: f64,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lerp: default_lerp(),
            wheel_multiplier: default_wheel_multiplier(),
            lag_threshold_ms: None,
            lag_adjusted_ms: default_lag_adjusted(),
        }
    }
}

fn default_lerp() -> f32 {
    0.1
}

fn default_wheel_multiplier() -> f32 {
    1.0
}

fn default_lag_adjusted() -> f64 {
    33.0
}

impl SceneConfig {
    /// Parse and validate a TOML document; missing sections use defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        info!(model = %config.model.path, trigger = %config.scroll.trigger, "Loaded scene configuration");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.model.path.trim().is_empty() {
            return invalid("model.path is empty".to_string());
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return invalid(format!(
                "camera clip range is invalid: near={} far={}",
                self.camera.near, self.camera.far
            ));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return invalid(format!("camera.fov_degrees out of range: {}", self.camera.fov_degrees));
        }
        if self.placement.breakpoint_px <= 0.0 {
            return invalid("placement.breakpoint_px must be positive".to_string());
        }
        if self.placement.narrow_camera_factor <= 0.0 || self.placement.wide_camera_factor <= 0.0 {
            return invalid("placement camera factors must be positive".to_string());
        }
        if self.scroll.extent_viewports <= 0.0 {
            return invalid(format!(
                "scroll.extent_viewports must be positive, got {}",
                self.scroll.extent_viewports
            ));
        }
        if !(0.0..=1.0).contains(&self.scroll.dead_zone) {
            return invalid(format!("scroll.dead_zone must be within [0, 1], got {}", self.scroll.dead_zone));
        }
        if self.scroll.min_delta < 0.0 {
            return invalid("scroll.min_delta must not be negative".to_string());
        }
        if self.scroll.axis_vec().length_squared() == 0.0 {
            return invalid("scroll.axis must be non-zero".to_string());
        }
        if let Some(selector) = self.scroll.bindings.duplicate_selector() {
            return invalid(format!("scroll.bindings lists {} more than once", selector));
        }
        if !(self.smooth.lerp > 0.0 && self.smooth.lerp <= 1.0) {
            return invalid(format!("smooth.lerp must be within (0, 1], got {}", self.smooth.lerp));
        }
        if let Some(threshold) = self.smooth.lag_threshold_ms {
            if threshold <= 0.0 {
                return invalid("smooth.lag_threshold_ms must be positive".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.path, "/wand.glb");
        assert_eq!(config.scroll.dead_zone, 0.1);
        assert_eq!(config.scroll.min_delta, 0.001);
        assert_eq!(config.placement.breakpoint_px, 1000.0);
        assert!(config.smooth.lag_threshold_ms.is_none());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let content = r#"
[model]
path = "/models/lamp.glb"

[scroll]
dead_zone = 0.2
extent_viewports = 3.0

[[scroll.bindings]]
selector = ".title"

[[scroll.bindings]]
selector = ".subtitle"
bias_vh = 40.0
"#;
        let config = SceneConfig::from_toml_str(content).unwrap();
        assert_eq!(config.model.path, "/models/lamp.glb");
        assert_eq!(config.scroll.dead_zone, 0.2);
        assert_eq!(config.scroll.extent_viewports, 3.0);
        assert_eq!(config.scroll.min_delta, 0.001);
        assert_eq!(config.scroll.bindings.len(), 2);
        assert_eq!(config.scroll.bindings.get(".title").map(|b| b.bias_vh), Some(0.0));
        assert_eq!(config.scroll.bindings.get(".subtitle").map(|b| b.bias_vh), Some(40.0));
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = SceneConfig::default();
        let content = config.to_toml_string().unwrap();
        let parsed = SceneConfig::from_toml_str(&content).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_zero_axis() {
        let content = "[scroll]\naxis = [0.0, 0.0, 0.0]\n";
        let err = SceneConfig::from_toml_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_duplicate_bindings() {
        let content = r#"
[[scroll.bindings]]
selector = ".a"

[[scroll.bindings]]
selector = ".a"
"#;
        let err = SceneConfig::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains(".a"));
    }

    #[test]
    fn test_rejects_bad_extent_and_clip_range() {
        let mut config = SceneConfig::default();
        config.scroll.extent_viewports = 0.0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.camera.far = config.camera.near;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = SceneConfig::from_toml_str("[scroll\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
