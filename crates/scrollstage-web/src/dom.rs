//! Thin helpers over the page DOM
//!
//! Everything here degrades to a logged no-op when the page lacks an
//! element; nothing panics on a missing selector.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

/// CSS transform value for a vertical offset in vh
pub fn translate_y_vh(offset_vh: f32) -> String {
    format!("translateY({}vh)", offset_vh)
}

/// CSS transform value for a vertical offset in px
pub fn translate_y_px(offset_px: f32) -> String {
    format!("translateY({}px)", offset_px)
}

/// Element id from an `#id` selector
pub fn id_from_selector(selector: &str) -> Option<&str> {
    selector.strip_prefix('#').filter(|id| {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

/// All elements matching a selector
pub fn select_all(selector: &str) -> Vec<HtmlElement> {
    let Some(document) = document() else {
        return Vec::new();
    };
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("Invalid selector {}: {:?}", selector, e);
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn select_one(selector: &str) -> Option<HtmlElement> {
    document()?
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

/// Set one style property on every element matching `selector`.
/// Returns how many elements were updated.
pub fn set_style_all(selector: &str, property: &str, value: &str) -> usize {
    let elements = select_all(selector);
    for element in &elements {
        element.style().set_property(property, value).ok();
    }
    elements.len()
}

/// Viewport size in CSS pixels
pub fn viewport_size() -> Option<(f32, f32)> {
    let window = window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}


pub fn scroll_y() -> f32 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0) as f32
}

pub fn scroll_to(y: f32) {
    if let Some(window) = window() {
        window.scroll_to_with_x_and_y(0.0, y as f64);
    }
}

/// Largest reachable scroll position
pub fn max_scroll() -> f32 {
    let Some(window) = window() else {
        return 0.0;
    };
    let Some(root) = window.document().and_then(|d| d.document_element()) else {
        return 0.0;
    };
    let viewport = window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0);
    (root.scroll_height() as f64 - viewport).max(0.0) as f32
}

/// Document-space top of an element
pub fn document_top(element: &HtmlElement) -> f32 {
    element.get_bounding_client_rect().top() as f32 + scroll_y()
}

/// Make sure the render canvas exists inside its container.
///
/// The renderer draws into an existing canvas; if the page only provides the
/// container, a canvas with the configured id is created and appended.
pub fn ensure_canvas(container_selector: &str, canvas_selector: &str) {
    let Some(document) = document() else {
        return;
    };
    if document.query_selector(canvas_selector).ok().flatten().is_some() {
        return;
    }
    let Some(id) = id_from_selector(canvas_selector) else {
        tracing::warn!("Canvas selector {} is not an #id; cannot create it", canvas_selector);
        return;
    };
    let Some(container) = select_one(container_selector) else {
        tracing::warn!("Render container {} not found", container_selector);
        return;
    };

    match document.create_element("canvas") {
        Ok(canvas) => {
            canvas.set_id(id);
            if let Err(e) = container.append_child(&canvas) {
                tracing::error!("Failed to append canvas: {:?}", e);
            }
        }
        Err(e) => tracing::error!("Failed to create canvas: {:?}", e),
    }
}
