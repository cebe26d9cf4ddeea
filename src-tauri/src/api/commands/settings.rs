//! Settings command module
//!
//! Handles application settings persistence and re-applies whatever changed.

use tauri::{AppHandle, Manager};

use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;
use crate::state::{lock, AppState};
use crate::system::window::chat_bar;
use crate::system::window::host::CHAT_WEBVIEW_LABEL;
use crate::system::{chat, login_item, shortcut, tray};

/// Get current application settings
#[tauri::command]
pub async fn get_settings(app: AppHandle) -> AppResult<AppSettings> {
    Ok(app.state::<AppState>().settings_snapshot())
}

/// Save application settings and apply them
#[tauri::command]
pub async fn save_settings(app: AppHandle, settings: AppSettings) -> AppResult<AppSettings> {
    let mut settings = settings;
    settings.normalize();

    let state = app.state::<AppState>();
    let previous = std::mem::replace(&mut *lock(&state.settings), settings.clone());
    let changes = settings.changes_since(&previous);

    if changes.shortcut {
        // Registration sleeps between retries
        let handle = app.clone();
        let accelerator = settings.behavior.chat_bar_shortcut.clone();
        let registered = tauri::async_runtime::spawn_blocking(move || {
            shortcut::register_chat_bar_shortcut(&handle, &accelerator)
        })
        .await;
        match registered {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("{}", e),
            Err(e) => tracing::error!("Shortcut registration task failed: {}", e),
        }
    }

    if changes.launch_at_login {
        if let Err(e) = login_item::set_enabled(settings.behavior.launch_at_login) {
            tracing::error!("Failed to update login item: {}", e);
        }
        tray::sync_launch_at_login(&app, settings.behavior.launch_at_login);
    }

    if changes.zoom {
        if let Err(e) = chat::apply_zoom(&app) {
            tracing::error!("Failed to apply zoom: {}", e);
        }
    }

    if changes.sizer {
        let height = lock(&state.sizer).reconfigure(settings.sizer_config());
        chat_bar::resize_if_owner(&app, height);
    }

    if changes.chat_url {
        if let (Some(url), Some(webview)) = (settings.chat_url(), app.get_webview(CHAT_WEBVIEW_LABEL)) {
            tracing::info!(%url, "chat URL changed, navigating");
            if let Err(e) = webview.navigate(url) {
                tracing::error!("Failed to open new chat URL: {}", e);
            }
        }
    }

    // Applying is best effort; what is in memory always reaches disk
    crate::state::save_settings(&app).await
}
