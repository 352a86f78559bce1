//! Scrollstage Web - browser entry point
//!
//! Loads the scene configuration, makes sure the render canvas exists and
//! starts the Bevy app. Page scrolling, pinning and DOM offsets are wired up
//! by the plugins in this crate.

mod app;
mod config;
mod dom;
mod page;
mod scroll;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging; renderer noise stays below INFO
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );

    wasm_bindgen_futures::spawn_local(async {
        let config = config::load_scene_config().await;
        app::run(config);
    });
}
