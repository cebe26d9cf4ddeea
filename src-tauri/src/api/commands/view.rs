//! View command module
//!
//! Zoom and page reload for the shared chat web view. These run on the async
//! runtime so the main thread never waits on app state locks.

use tauri::AppHandle;

use crate::shared::error::AppResult;
use crate::shared::types::ViewState;
use crate::system::chat;

#[tauri::command]
pub async fn view_state(app: AppHandle) -> ViewState {
    chat::view_state(&app)
}

#[tauri::command]
pub async fn zoom_in(app: AppHandle) -> AppResult<ViewState> {
    chat::zoom_in(&app)
}

#[tauri::command]
pub async fn zoom_out(app: AppHandle) -> AppResult<ViewState> {
    chat::zoom_out(&app)
}

#[tauri::command]
pub async fn zoom_reset(app: AppHandle) -> AppResult<ViewState> {
    chat::zoom_reset(&app)
}

#[tauri::command]
pub async fn set_zoom(app: AppHandle, factor: f64) -> AppResult<ViewState> {
    chat::set_zoom(&app, factor)
}

#[tauri::command]
pub async fn reload_chat(app: AppHandle) -> AppResult<()> {
    chat::reload(&app)
}

/// Go back to the chat home page and collapse the chat bar
#[tauri::command]
pub async fn new_chat(app: AppHandle) -> AppResult<()> {
    chat::new_chat(&app)
}
