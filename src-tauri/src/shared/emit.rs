use tauri::{AppHandle, Emitter};

use super::events::AppEvent;

/// Emit an application event to all webviews
pub fn emit_event(app: &AppHandle, event: AppEvent) {
    let result = match &event {
        AppEvent::SettingsUpdated(settings) => app.emit("settings://update", settings),
        AppEvent::SurfaceChanged(owner) => app.emit("surface://changed", owner),
        AppEvent::ZoomChanged(factor) => app.emit("view://zoom", factor),
    };

    if let Err(e) = result {
        tracing::warn!("Failed to emit {:?}: {}", event, e);
    }
}
