//! Bevy application setup

use bevy::prelude::*;
use bevy::window::CompositeAlphaMode;
use scrollstage_core::SceneConfig;
use scrollstage_scene::ScrollStagePlugin;

use crate::dom;
use crate::scroll::PageScrollPlugin;

fn primary_window(config: &SceneConfig) -> Window {
    Window {
        title: "scrollstage".to_string(),
        canvas: Some(config.render.canvas.clone()),
        fit_canvas_to_parent: true,
        // Page must keep receiving scroll and touch input
        prevent_default_event_handling: false,
        transparent: config.render.transparent,
        composite_alpha_mode: if config.render.transparent {
            CompositeAlphaMode::PreMultiplied
        } else {
            CompositeAlphaMode::Auto
        },
        ..default()
    }
}

/// Run the Bevy application
pub fn run(config: SceneConfig) {
    dom::ensure_canvas(&config.render.container, &config.render.canvas);

    App::new()
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(primary_window(&config)),
                ..default()
            })
            .set(AssetPlugin {
                // Model paths are resolved against the page origin
                file_path: "".to_string(),
                // Don't look for .meta files - static hosts don't have them
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        .add_plugins(ScrollStagePlugin { config })
        .add_plugins(PageScrollPlugin)
        .run();
}
