//! Page scroll source, pinning and DOM offset output
//!
//! Wheel input is captured and replayed through the smooth-scroll emulator;
//! the resulting position drives the pinned region, whose progress is handed
//! to the scene's binder. Offsets produced by the binder are written back to
//! the page after the binder has run.

use bevy::prelude::*;
use scrollstage_core::{PinnedRegion, ProgressTracker, SmoothScroll, Ticker};
use scrollstage_scene::{ScrollProgressChanged, StageConfig, StageSet, TargetOffsets, ViewportSize};
use std::sync::{Arc, Mutex};

use crate::dom;
use crate::page::{BrowserPage, Page};

/// Pixels per line for line-mode wheel deltas
const LINE_HEIGHT_PX: f32 = 16.0;

pub struct PageScrollPlugin;

impl Plugin for PageScrollPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Page>() {
            app.insert_resource(Page::new(BrowserPage));
        }

        app.init_resource::<PendingWheel>()
            .init_resource::<ViewportSize>()
            .add_systems(Startup, (init_page_scroll, install_wheel_listener).chain())
            .add_systems(Update, track_viewport.before(StageSet::Place))
            .add_systems(
                Update,
                (refresh_scroll_limit, measure_region, drive_scroll)
                    .chain()
                    .after(track_viewport)
                    .after(StageSet::Place)
                    .before(StageSet::Animate),
            )
            .add_systems(Update, write_offsets.after(StageSet::Animate));
    }
}

#[derive(Debug, Default)]
struct WheelState {
    delta_px: f32,
    /// Whether the page can scroll, so wheel events may be taken over
    capture: bool,
}

/// Wheel deltas collected by the browser callback since the last frame
#[derive(Resource, Default, Clone)]
pub struct PendingWheel(Arc<Mutex<WheelState>>);

impl PendingWheel {
    /// Queue a delta; returns false when capture is off and the browser
    /// should scroll natively
    pub fn push(&self, delta_px: f32) -> bool {
        let Ok(mut state) = self.0.lock() else {
            return false;
        };
        if state.capture {
            state.delta_px += delta_px;
        }
        state.capture
    }

    pub fn take(&self) -> f32 {
        self.0
            .lock()
            .map(|mut state| std::mem::take(&mut state.delta_px))
            .unwrap_or(0.0)
    }

    pub fn set_capture(&self, capture: bool) {
        if let Ok(mut state) = self.0.lock() {
            state.capture = capture;
            if !capture {
                state.delta_px = 0.0;
            }
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.0.lock().map(|state| state.capture).unwrap_or(false)
    }
}

/// Scroll-side state: smoothing, frame clock and the pinned region
#[derive(Resource)]
pub struct PageScroll {
    smooth: SmoothScroll,
    smooth_enabled: bool,
    ticker: Ticker,
    tracker: ProgressTracker,
    region: Option<PinnedRegion>,
    /// Pin translation currently applied to the trigger element
    applied_pin: f32,
    trigger_missing: bool,
}

fn init_page_scroll(mut commands: Commands, config: Res<StageConfig>) {
    commands.insert_resource(PageScroll {
        smooth: SmoothScroll::new(&config.smooth),
        smooth_enabled: config.smooth.enabled,
        ticker: Ticker::new(&config.smooth),
        tracker: ProgressTracker::default(),
        region: None,
        applied_pin: 0.0,
        trigger_missing: false,
    });
}

/// Convert a wheel delta to pixels according to its delta mode
pub fn wheel_delta_px(delta_y: f64, delta_mode: u32, viewport_height: f32) -> f32 {
    match delta_mode {
        // DOM_DELTA_LINE
        1 => delta_y as f32 * LINE_HEIGHT_PX,
        // DOM_DELTA_PAGE
        2 => delta_y as f32 * viewport_height,
        _ => delta_y as f32,
    }
}

/// Capture wheel input so the emulator owns scrolling
#[cfg(target_arch = "wasm32")]
fn install_wheel_listener(pending: Res<PendingWheel>, config: Res<StageConfig>) {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    if !config.smooth.enabled {
        return;
    }
    let Some(window) = dom::window() else {
        return;
    };

    let pending = PendingWheel::clone(&pending);
    let closure = Closure::wrap(Box::new(move |event: web_sys::WheelEvent| {
        // Pinch-zoom arrives as ctrl+wheel; leave it to the browser
        if event.ctrl_key() {
            return;
        }
        let height = dom::viewport_size().map(|(_, h)| h).unwrap_or(0.0);
        if pending.push(wheel_delta_px(event.delta_y(), event.delta_mode(), height)) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);

    let options = web_sys::AddEventListenerOptions::new();
    options.set_passive(false);
    match window.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        closure.as_ref().unchecked_ref(),
        &options,
    ) {
        Ok(()) => tracing::debug!("Wheel listener installed"),
        Err(e) => tracing::error!("Failed to install wheel listener: {:?}", e),
    }
    // Listener lives as long as the page
    closure.forget();
}

#[cfg(not(target_arch = "wasm32"))]
fn install_wheel_listener() {}

/// Mirror the CSS viewport, touching the resource only on change
fn track_viewport(page: Res<Page>, mut viewport: ResMut<ViewportSize>) {
    let Some((width, height)) = page.viewport_size() else {
        return;
    };
    let size = ViewportSize { width, height };
    if *viewport != size {
        tracing::debug!("Viewport resized to {}x{}", width, height);
        *viewport = size;
    }
}

/// Follow the document's scrollable height; wheel capture is only on
/// while there is somewhere to scroll to
fn refresh_scroll_limit(page: Res<Page>, pending: Res<PendingWheel>, mut scroll: ResMut<PageScroll>) {
    if !scroll.smooth_enabled {
        return;
    }
    let limit = page.max_scroll();
    if limit != scroll.smooth.limit() {
        tracing::debug!("Scroll limit now {}px", limit);
        scroll.smooth.set_limit(limit);
    }
    pending.set_capture(limit > 0.0);
}

/// (Re)measure the pinned region whenever the viewport changes
fn measure_region(
    viewport: Res<ViewportSize>,
    config: Res<StageConfig>,
    mut page: ResMut<Page>,
    mut scroll: ResMut<PageScroll>,
) {
    if !viewport.is_changed() || viewport.height <= 0.0 {
        return;
    }
    let trigger = &config.scroll.trigger;
    let Some(top) = page.element_top(trigger) else {
        if !scroll.trigger_missing {
            tracing::warn!("Scroll trigger {} not found; scroll animation disabled", trigger);
            scroll.trigger_missing = true;
        }
        scroll.region = None;
        return;
    };
    scroll.trigger_missing = false;

    // Remove the pin's own translation from the measured position
    let start = top - scroll.applied_pin;
    let region = PinnedRegion::new(start, viewport.height, config.scroll.extent_viewports);

    // Reserve layout space so the page keeps scrolling while pinned
    page.set_style(trigger, "margin-bottom", &format!("{}px", region.spacing()));

    scroll.tracker.invalidate();
    scroll.region = Some(region);
    tracing::info!("Pinned region {}: {}px to {}px", trigger, region.start(), region.end());
}

/// Advance smoothing, pin the trigger and publish progress changes
fn drive_scroll(
    time: Res<Time>,
    config: Res<StageConfig>,
    pending: Res<PendingWheel>,
    mut page: ResMut<Page>,
    mut scroll: ResMut<PageScroll>,
    mut progress_events: MessageWriter<ScrollProgressChanged>,
) {
    let dt = scroll.ticker.tick(time.elapsed_secs_f64() * 1000.0);

    let scroll_y = if scroll.smooth_enabled {
        let wheel = pending.take();
        if wheel != 0.0 {
            scroll.smooth.wheel(wheel);
        }
        match scroll.smooth.advance(dt) {
            Some(y) => {
                page.scroll_to(y);
                y
            }
            None => {
                let native = page.scroll_y();
                scroll.smooth.sync(native);
                native
            }
        }
    } else {
        page.scroll_y()
    };

    let Some(region) = scroll.region else {
        return;
    };

    let pin = region.pin_offset(scroll_y);
    if pin != scroll.applied_pin {
        page.set_style(&config.scroll.trigger, "transform", &dom::translate_y_px(pin));
        scroll.applied_pin = pin;
    }

    if let Some(progress) = scroll.tracker.update(region.progress(scroll_y)) {
        progress_events.write(ScrollProgressChanged(progress));
    }
}

/// Write changed target offsets to the page
fn write_offsets(mut offsets: ResMut<TargetOffsets>, mut page: ResMut<Page>) {
    let Some(changed) = offsets.drain_dirty() else {
        return;
    };
    for (selector, offset_vh) in changed {
        if page.set_style(selector, "transform", &dom::translate_y_vh(offset_vh)) == 0 {
            tracing::debug!("No elements match {}", selector);
        }
    }
}
