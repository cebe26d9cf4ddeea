//! Surface command module
//!
//! Async so window creation never runs inside the main-thread command handler.

use tauri::AppHandle;

use crate::core::surface::SurfaceKind;
use crate::shared::error::AppResult;
use crate::system::window::surfaces;

/// Move the chat into `kind` and show it
#[tauri::command]
pub async fn show_surface(app: AppHandle, kind: SurfaceKind) -> AppResult<Option<SurfaceKind>> {
    surfaces::show_surface(&app, kind, None)
}

/// Hide `kind` if it currently shows the chat
#[tauri::command]
pub async fn hide_surface(app: AppHandle, kind: SurfaceKind) -> AppResult<Option<SurfaceKind>> {
    surfaces::hide_surface(&app, kind)
}

#[tauri::command]
pub async fn toggle_surface(app: AppHandle, kind: SurfaceKind) -> AppResult<Option<SurfaceKind>> {
    surfaces::toggle_surface(&app, kind, None)
}

#[tauri::command]
pub async fn current_surface(app: AppHandle) -> Option<SurfaceKind> {
    surfaces::current_surface(&app)
}
