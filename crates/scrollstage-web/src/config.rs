//! Scene configuration from the `?config=` URL parameter

use scrollstage_core::SceneConfig;
use wasm_bindgen::JsCast;

/// Fetch and parse the configured TOML file, falling back to defaults
pub async fn load_scene_config() -> SceneConfig {
    let Some(url) = config_url() else {
        tracing::info!("No config parameter, using default scene configuration");
        return SceneConfig::default();
    };

    tracing::info!("Loading scene configuration from {}", url);
    let content = match fetch_text(&url).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to fetch scene configuration: {}; using defaults", e);
            return SceneConfig::default();
        }
    };

    match SceneConfig::from_toml_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            SceneConfig::default()
        }
    }
}

/// Read ?config= from the page URL
fn config_url() -> Option<String> {
    let window = web_sys::window()?;
    let href = window.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get("config").filter(|value| !value.is_empty())
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("No window")?;

    let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: web_sys::Response = resp.dyn_into().map_err(|_| "Response cast failed")?;

    if !resp.ok() {
        return Err(format!("HTTP {}: {}", resp.status(), resp.status_text()));
    }

    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|_| "Failed to get text")?)
        .await
        .map_err(|e| format!("Text extraction failed: {:?}", e))?;

    text.as_string().ok_or_else(|| "Not a string".to_string())
}
