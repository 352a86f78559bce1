//! DOM target bindings - which page elements follow scroll progress

use serde::{Deserialize, Serialize};

/// A page element that is translated vertically with scroll progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBinding {
    /// CSS selector; every matching element receives the offset
    pub selector: String,
    /// Added to the shared translation, in vh
    #[serde(default)]
    pub bias_vh: f32,
}

impl TargetBinding {
    pub fn new(selector: impl Into<String>, bias_vh: f32) -> Self {
        Self {
            selector: selector.into(),
            bias_vh,
        }
    }

    /// Offset of this target for a shared translation value
    pub fn offset(&self, translate_vh: f32) -> f32 {
        translate_vh + self.bias_vh
    }
}

/// Fixed set of bound targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetBindings(pub Vec<TargetBinding>);

impl Default for TargetBindings {
    fn default() -> Self {
        Self(vec![
            TargetBinding::new(".header-1", 0.0),
            // Secondary header trails the rest so it is revealed later
            TargetBinding::new(".header-2", 60.0),
            TargetBinding::new(".circular-mask", 0.0),
            TargetBinding::new(".tooltips", 0.0),
        ])
    }
}

impl TargetBindings {
    pub fn iter(&self) -> impl Iterator<Item = &TargetBinding> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the binding for a selector
    pub fn get(&self, selector: &str) -> Option<&TargetBinding> {
        self.0.iter().find(|b| b.selector == selector)
    }

    /// First selector that appears more than once, if any
    pub fn duplicate_selector(&self) -> Option<&str> {
        self.0.iter().enumerate().find_map(|(i, binding)| {
            self.0[..i]
                .iter()
                .any(|earlier| earlier.selector == binding.selector)
                .then_some(binding.selector.as_str())
        })
    }
}
