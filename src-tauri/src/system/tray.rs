//! Status bar icon and menu

use tauri::image::Image;
use tauri::menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Manager, Wry};

use crate::core::geometry::Rect;
use crate::core::surface::SurfaceKind;
use crate::shared::error::AppResult;
use crate::state::{lock, persist_settings, AppState};
use crate::system::window::surfaces;
use crate::system::{alert, chat, login_item};

const TRAY_ICON_ID: &str = "menuchat-tray";

const MENU_CHAT_BAR: &str = "open_chat_bar";
const MENU_MAIN_WINDOW: &str = "open_main_window";
const MENU_NEW_CHAT: &str = "new_chat";
const MENU_RELOAD: &str = "reload";
const MENU_ZOOM_IN: &str = "zoom_in";
const MENU_ZOOM_OUT: &str = "zoom_out";
const MENU_ZOOM_RESET: &str = "zoom_reset";
const MENU_LAUNCH_AT_LOGIN: &str = "launch_at_login";
const MENU_QUIT: &str = "quit";

/// Menu items whose state follows settings
pub struct TrayMenu {
    launch_at_login: CheckMenuItem<Wry>,
}

pub fn setup_tray(app: &AppHandle) -> AppResult<TrayIcon> {
    let launch_at_login = lock(&app.state::<AppState>().settings).behavior.launch_at_login;

    let chat_bar_item = MenuItem::with_id(app, MENU_CHAT_BAR, "Open Chat Bar", true, None::<&str>)?;
    let main_item = MenuItem::with_id(app, MENU_MAIN_WINDOW, "Open Main Window", true, None::<&str>)?;
    let new_chat_item = MenuItem::with_id(app, MENU_NEW_CHAT, "New Chat", true, None::<&str>)?;
    let reload_item = MenuItem::with_id(app, MENU_RELOAD, "Reload", true, None::<&str>)?;
    let zoom_in_item = MenuItem::with_id(app, MENU_ZOOM_IN, "Zoom In", true, None::<&str>)?;
    let zoom_out_item = MenuItem::with_id(app, MENU_ZOOM_OUT, "Zoom Out", true, None::<&str>)?;
    let zoom_reset_item = MenuItem::with_id(app, MENU_ZOOM_RESET, "Actual Size", true, None::<&str>)?;
    let login_item = CheckMenuItem::with_id(
        app,
        MENU_LAUNCH_AT_LOGIN,
        "Launch at Login",
        true,
        launch_at_login,
        None::<&str>,
    )?;
    let quit_item = MenuItem::with_id(app, MENU_QUIT, "Quit", true, Some("CmdOrCtrl+Q"))?;

    let menu = Menu::with_items(
        app,
        &[
            &chat_bar_item,
            &main_item,
            &PredefinedMenuItem::separator(app)?,
            &new_chat_item,
            &reload_item,
            &PredefinedMenuItem::separator(app)?,
            &zoom_in_item,
            &zoom_out_item,
            &zoom_reset_item,
            &PredefinedMenuItem::separator(app)?,
            &login_item,
            &PredefinedMenuItem::separator(app)?,
            &quit_item,
        ],
    )?;

    app.manage(TrayMenu {
        launch_at_login: login_item,
    });

    let tray = TrayIconBuilder::with_id(TRAY_ICON_ID)
        .tooltip("MenuChat")
        .icon(Image::from_bytes(include_bytes!("../../icons/tray.png"))?)
        .icon_as_template(true)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            // Tray callbacks run on the main thread, which surface transitions
            // need free while they hold app state
            let app = app.clone();
            let id = event.id().as_ref().to_string();
            tauri::async_runtime::spawn(async move { handle_menu_event(&app, &id).await });
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                rect,
                ..
            } = event
            {
                let app = tray.app_handle();
                // This click is what blurred the popover; don't reopen it
                if app.state::<AppState>().take_recent_popover_dismissal() {
                    tracing::debug!("Tray click closed the popover");
                    return;
                }
                let anchor = icon_rect(app, &rect);
                let app = app.clone();
                tauri::async_runtime::spawn(async move {
                    if let Err(e) = surfaces::toggle_surface(&app, SurfaceKind::Popover, anchor) {
                        tracing::error!("Failed to toggle popover: {}", e);
                    }
                });
            }
        })
        .build(app)?;

    tracing::info!("Tray icon created");
    Ok(tray)
}

/// Tray icon rect in logical points
fn icon_rect(app: &AppHandle, rect: &tauri::Rect) -> Option<Rect> {
    let position = rect.position.to_physical::<f64>(1.0);
    let scale = match app.monitor_from_point(position.x, position.y) {
        Ok(Some(monitor)) => monitor.scale_factor(),
        _ => app
            .primary_monitor()
            .ok()
            .flatten()
            .map(|monitor| monitor.scale_factor())?,
    };
    let position = rect.position.to_logical::<f64>(scale);
    let size = rect.size.to_logical::<f64>(scale);
    Some(Rect::new(position.x, position.y, size.width, size.height))
}

async fn handle_menu_event(app: &AppHandle, id: &str) {
    let result = match id {
        MENU_CHAT_BAR => surfaces::show_surface(app, SurfaceKind::ChatBar, None).map(|_| ()),
        MENU_MAIN_WINDOW => surfaces::show_surface(app, SurfaceKind::MainWindow, None).map(|_| ()),
        MENU_NEW_CHAT => chat::new_chat(app),
        MENU_RELOAD => chat::reload(app),
        MENU_ZOOM_IN => chat::zoom_in(app).map(|_| ()),
        MENU_ZOOM_OUT => chat::zoom_out(app).map(|_| ()),
        MENU_ZOOM_RESET => chat::zoom_reset(app).map(|_| ()),
        MENU_LAUNCH_AT_LOGIN => {
            toggle_launch_at_login(app);
            Ok(())
        }
        MENU_QUIT => {
            tracing::info!("Quit requested from tray");
            quit(app).await;
            Ok(())
        }
        other => {
            tracing::debug!("Unhandled menu event: {}", other);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("Tray action {} failed: {}", id, e);
    }
}

/// Hide the visible surface so its frame is recorded, save, then exit.
async fn quit(app: &AppHandle) {
    if let Err(e) = surfaces::hide_all(app) {
        tracing::warn!("Failed to hide surfaces before quitting: {}", e);
    }
    if let Err(e) = app.state::<AppState>().write_settings().await {
        tracing::error!("Failed to save settings on quit: {}", e);
    }
    app.exit(0);
}

fn toggle_launch_at_login(app: &AppHandle) {
    let state = app.state::<AppState>();
    let enabled = !lock(&state.settings).behavior.launch_at_login;

    match login_item::set_enabled(enabled) {
        Ok(()) => {
            lock(&state.settings).behavior.launch_at_login = enabled;
            persist_settings(app);
        }
        Err(e) => {
            alert::show_error(app, "Launch at Login", &format!("Could not update login item: {}", e));
        }
    }

    // The menu flips the check mark on click; keep it in step with the setting
    let stored = lock(&state.settings).behavior.launch_at_login;
    sync_launch_at_login(app, stored);
}

/// Keep the check item in step with settings changed elsewhere.
pub fn sync_launch_at_login(app: &AppHandle, enabled: bool) {
    let Some(menu) = app.try_state::<TrayMenu>() else {
        return;
    };
    if let Err(e) = menu.launch_at_login.set_checked(enabled) {
        tracing::warn!("Failed to update Launch at Login check mark: {}", e);
    }
}
