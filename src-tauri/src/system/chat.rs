//! Operations on the shared chat web view: zoom, reload and new chat

use tauri::{AppHandle, Manager, Webview};

use crate::core::zoom::Zoom;
use crate::shared::emit::emit_event;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::AppEvent;
use crate::shared::types::ViewState;
use crate::state::{lock, persist_settings, AppState};
use crate::system::window::chat_bar;
use crate::system::window::host::CHAT_WEBVIEW_LABEL;

fn chat_webview(app: &AppHandle) -> Option<Webview> {
    app.get_webview(CHAT_WEBVIEW_LABEL)
}

pub fn view_state(app: &AppHandle) -> ViewState {
    let state = app.state::<AppState>();
    let zoom = lock(&state.settings).zoom();
    let owner = lock(&state.surfaces).owner();
    ViewState {
        owner,
        zoom: zoom.factor(),
        can_zoom_in: zoom.can_zoom_in(),
        can_zoom_out: zoom.can_zoom_out(),
    }
}

/// Apply `update` to the stored zoom, push it to the web view and persist it.
fn change_zoom(app: &AppHandle, update: impl FnOnce(Zoom) -> Zoom) -> AppResult<ViewState> {
    let state = app.state::<AppState>();
    let (before, after) = {
        let mut settings = lock(&state.settings);
        let before = settings.zoom();
        let after = update(before);
        settings.view.zoom = after.factor();
        (before, after)
    };

    if before != after {
        // The web view may not exist yet; it picks the zoom up on first attach
        if let Some(webview) = chat_webview(app) {
            webview.set_zoom(after.factor())?;
        }
        tracing::debug!(from = before.factor(), to = after.factor(), "zoom changed");
        follow_zoom(app, after);
        emit_event(app, AppEvent::ZoomChanged(after.factor()));
        persist_settings(app);
    }
    Ok(view_state(app))
}

pub fn zoom_in(app: &AppHandle) -> AppResult<ViewState> {
    change_zoom(app, Zoom::zoom_in)
}

pub fn zoom_out(app: &AppHandle) -> AppResult<ViewState> {
    change_zoom(app, Zoom::zoom_out)
}

pub fn zoom_reset(app: &AppHandle) -> AppResult<ViewState> {
    change_zoom(app, |_| Zoom::reset())
}

pub fn set_zoom(app: &AppHandle, factor: f64) -> AppResult<ViewState> {
    if !factor.is_finite() {
        return Err(AppError::Validation(format!("Invalid zoom factor: {}", factor)));
    }
    change_zoom(app, |_| Zoom::new(factor))
}

/// Re-apply the stored zoom, e.g. after settings were replaced wholesale.
pub fn apply_zoom(app: &AppHandle) -> AppResult<()> {
    let zoom = lock(&app.state::<AppState>().settings).zoom();
    if let Some(webview) = chat_webview(app) {
        webview.set_zoom(zoom.factor())?;
    }
    follow_zoom(app, zoom);
    emit_event(app, AppEvent::ZoomChanged(zoom.factor()));
    Ok(())
}

/// The composer is measured in page pixels, so the chat bar scales with zoom
fn follow_zoom(app: &AppHandle, zoom: Zoom) {
    let height = lock(&app.state::<AppState>().sizer).set_zoom(zoom.factor());
    chat_bar::resize_if_owner(app, height);
}

fn collapse_chat_bar(app: &AppHandle) {
    let height = lock(&app.state::<AppState>().sizer).reset();
    chat_bar::resize_if_owner(app, height);
}

pub fn reload(app: &AppHandle) -> AppResult<()> {
    let webview = chat_webview(app)
        .ok_or_else(|| AppError::Window("Chat is not open yet".to_string()))?;
    webview.eval("window.location.reload()")?;
    collapse_chat_bar(app);
    tracing::info!("chat reloaded");
    Ok(())
}

/// Navigate back to the configured chat home page.
pub fn new_chat(app: &AppHandle) -> AppResult<()> {
    let webview = chat_webview(app)
        .ok_or_else(|| AppError::Window("Chat is not open yet".to_string()))?;
    let url = lock(&app.state::<AppState>().settings)
        .chat_url()
        .ok_or_else(|| AppError::Validation("Chat URL is not a valid http(s) URL".to_string()))?;
    webview.navigate(url)?;
    collapse_chat_bar(app);
    tracing::info!("new chat started");
    Ok(())
}
