//! Page access used by the scroll systems
//!
//! Systems talk to the document through `PageSurface` so they can run
//! against an in-memory page in tests.

use bevy::prelude::*;

use crate::dom;

/// Reads and writes the scroll systems need from the document.
/// All lengths are CSS pixels.
pub trait PageSurface: Send + Sync + 'static {
    /// `innerWidth` x `innerHeight`
    fn viewport_size(&self) -> Option<(f32, f32)>;
    fn scroll_y(&self) -> f32;
    fn scroll_to(&mut self, y: f32);
    /// Largest reachable scroll position
    fn max_scroll(&self) -> f32;
    /// Document top of the first element matching `selector`
    fn element_top(&self, selector: &str) -> Option<f32>;
    /// Set a style property on all matches; returns how many were updated
    fn set_style(&mut self, selector: &str, property: &str, value: &str) -> usize;
}

#[derive(Resource, Deref, DerefMut)]
pub struct Page(pub Box<dyn PageSurface>);

impl Page {
    pub fn new(surface: impl PageSurface) -> Self {
        Self(Box::new(surface))
    }
}

/// The live browser document
pub struct BrowserPage;

impl PageSurface for BrowserPage {
    fn viewport_size(&self) -> Option<(f32, f32)> {
        dom::viewport_size()
    }

    fn scroll_y(&self) -> f32 {
        dom::scroll_y()
    }

    fn scroll_to(&mut self, y: f32) {
        dom::scroll_to(y);
    }

    fn max_scroll(&self) -> f32 {
        dom::max_scroll()
    }

    fn element_top(&self, selector: &str) -> Option<f32> {
        dom::select_one(selector).map(|element| dom::document_top(&element))
    }

    fn set_style(&mut self, selector: &str, property: &str, value: &str) -> usize {
        dom::set_style_all(selector, property, value)
    }
}
