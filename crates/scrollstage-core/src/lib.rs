//! Scrollstage Core - Engine-free scroll binding and model placement
//!
//! This crate holds everything that does not need a renderer or a browser:
//! - Scroll-to-animation binder (DOM offsets + incremental model rotation)
//! - Model placement math for narrow/wide viewports
//! - Pinned scroll region progress and pin geometry
//! - Smooth-scroll emulation and the frame ticker that drives it
//! - TOML scene configuration

pub mod binder;
pub mod bindings;
pub mod config;
pub mod pinned;
pub mod placement;
pub mod smooth;
pub mod ticker;

pub use binder::{BinderUpdate, OffsetSink, RotationOutcome, RotationStep, RotationTarget, ScrollBinder};
pub use bindings::{TargetBinding, TargetBindings};
pub use config::{ConfigError, SceneConfig};
pub use pinned::{PinnedRegion, ProgressTracker};
pub use placement::{compute_placement, Layout, ModelBounds, Placement};
pub use smooth::SmoothScroll;
pub use ticker::Ticker;
