//! Animated chat bar resizing

use std::sync::atomic::Ordering;

use tauri::{AppHandle, Manager};

use crate::core::animation::{ResizeAnimation, FRAME_INTERVAL, RESIZE_DURATION};
use crate::core::geometry::{reconcile, resize_anchored, VerticalAnchor};
use crate::core::surface::SurfaceKind;
use crate::state::{lock, AppState};
use crate::system::window::host::{available_displays, set_window_frame, window_frame};

/// Animate to `height` when the sizer produced one and the chat bar is showing.
pub fn resize_if_owner(app: &AppHandle, height: Option<f64>) {
    let Some(height) = height else {
        return;
    };
    let owns = lock(&app.state::<AppState>().surfaces).is_owner(SurfaceKind::ChatBar);
    if owns {
        animate_to(app, height);
    }
}

/// Grow or shrink the chat bar to `height`, keeping its bottom edge in place.
///
/// Starting a new animation invalidates the one in flight.
pub fn animate_to(app: &AppHandle, height: f64) {
    let state = app.state::<AppState>();
    let generation = state.resize_generation.fetch_add(1, Ordering::SeqCst) + 1;

    let Some(window) = app.get_window(SurfaceKind::ChatBar.label()) else {
        tracing::debug!("Chat bar window not created yet, skipping resize");
        return;
    };
    let start = match window_frame(&window) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Failed to read chat bar frame: {}", e);
            return;
        }
    };

    let frames = ResizeAnimation::new(start.height, height, RESIZE_DURATION).frames(FRAME_INTERVAL);
    tracing::debug!(from = start.height, to = height, frames = frames.len(), "chat bar resize");

    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        let displays = available_displays(&app);
        let state = app.state::<AppState>();

        for frame_height in frames {
            if state.resize_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            let frame = reconcile(
                resize_anchored(start, frame_height, VerticalAnchor::Bottom),
                &displays,
            );
            if let Err(e) = set_window_frame(&window, frame) {
                tracing::warn!("Chat bar resize stopped: {}", e);
                return;
            }
            tokio::time::sleep(FRAME_INTERVAL).await;
        }
    });
}
