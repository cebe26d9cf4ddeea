//! Surface switching entry points shared by the tray, the shortcut and IPC

use tauri::{AppHandle, Manager, Window, WindowEvent};

use crate::core::geometry::Rect;
use crate::core::surface::{SurfaceCoordinator, SurfaceKind, Transition};
use crate::shared::emit::emit_event;
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::state::{lock, persist_settings, AppState};
use crate::system::window::host::TauriSurfaceHost;

/// Run `op` on the coordinator; returns the transition and the new owner.
fn run_transition<F>(app: &AppHandle, anchor: Option<Rect>, op: F) -> AppResult<(Transition, Option<SurfaceKind>)>
where
    F: FnOnce(&mut SurfaceCoordinator, &mut TauriSurfaceHost) -> AppResult<Transition>,
{
    let state = app.state::<AppState>();
    let mut host = TauriSurfaceHost::new(app.clone(), anchor);

    let (transition, owner) = {
        let mut surfaces = lock(&state.surfaces);
        let result = op(&mut surfaces, &mut host);
        // A failed attach may still have detached the previous owner
        let owner = surfaces.owner();
        (result, owner)
    };

    if host.geometry_recorded() {
        persist_settings(app);
    }

    match transition {
        Ok(Transition::Unchanged) => Ok((Transition::Unchanged, owner)),
        Ok(transition) => {
            tracing::info!(?transition, "surface changed");
            emit_event(app, AppEvent::SurfaceChanged(owner));
            Ok((transition, owner))
        }
        Err(e) => {
            tracing::error!("Surface transition failed: {}", e);
            emit_event(app, AppEvent::SurfaceChanged(owner));
            Err(e)
        }
    }
}

pub fn show_surface(app: &AppHandle, kind: SurfaceKind, anchor: Option<Rect>) -> AppResult<Option<SurfaceKind>> {
    run_transition(app, anchor, |surfaces, host| surfaces.attach(host, kind))
        .map(|(_, owner)| owner)
}

pub fn hide_surface(app: &AppHandle, kind: SurfaceKind) -> AppResult<Option<SurfaceKind>> {
    run_transition(app, None, |surfaces, host| surfaces.detach(host, kind))
        .map(|(_, owner)| owner)
}

pub fn toggle_surface(app: &AppHandle, kind: SurfaceKind, anchor: Option<Rect>) -> AppResult<Option<SurfaceKind>> {
    run_transition(app, anchor, |surfaces, host| surfaces.toggle(host, kind))
        .map(|(_, owner)| owner)
}

pub fn hide_all(app: &AppHandle) -> AppResult<Option<SurfaceKind>> {
    run_transition(app, None, |surfaces, host| surfaces.release(host))
        .map(|(_, owner)| owner)
}

/// Hide the popover after it lost focus; true when it was showing the chat.
fn dismiss_popover(app: &AppHandle) -> AppResult<bool> {
    let (transition, _) = run_transition(app, None, |surfaces, host| {
        surfaces.detach(host, SurfaceKind::Popover)
    })?;
    Ok(transition.is_detach_of(SurfaceKind::Popover))
}

pub fn current_surface(app: &AppHandle) -> Option<SurfaceKind> {
    lock(&app.state::<AppState>().surfaces).owner()
}

/// Window events for the surface containers
pub fn on_window_event(window: &Window, event: &WindowEvent) {
    let Some(kind) = SurfaceKind::from_label(window.label()) else {
        return;
    };
    let app = window.app_handle().clone();

    match event {
        WindowEvent::Focused(false) if kind == SurfaceKind::Popover => {
            let state = app.state::<AppState>();
            if !lock(&state.settings).behavior.hide_popover_on_blur {
                return;
            }
            // Window events can arrive while a transition holds the coordinator,
            // so the ownership check happens off this callback
            tauri::async_runtime::spawn(async move {
                match dismiss_popover(&app) {
                    // A popover hidden by a switch elsewhere was not dismissed by a click
                    Ok(true) => app.state::<AppState>().mark_popover_dismissed(),
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Failed to hide popover on blur: {}", e),
                }
            });
        }
        WindowEvent::CloseRequested { api, .. } => {
            // Containers are hidden, never destroyed, so the web view survives
            api.prevent_close();
            tauri::async_runtime::spawn(async move {
                if let Err(e) = hide_surface(&app, kind) {
                    tracing::warn!(?kind, "Failed to hide surface on close: {}", e);
                }
            });
        }
        _ => {}
    }
}
