// Module declarations
mod api;
mod config;
mod core;
mod shared;
mod state;
mod system;

use tauri::{Manager, RunEvent};
use tracing_subscriber::EnvFilter;

use crate::shared::settings::AppSettings;
use crate::state::AppState;

fn init_tracing() {
    let default_filter = if cfg!(debug_assertions) {
        "info,menuchat_lib=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second init (tests, re-entry) is harmless
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            // Menu-bar agent: no Dock icon, panels may join full-screen spaces
            if let Err(e) = system::window::nswindow::set_app_activation_policy_accessory() {
                tracing::warn!("Failed to set activation policy: {}", e);
            }

            let settings_path = AppSettings::get_settings_path()?;
            let settings = tauri::async_runtime::block_on(AppSettings::load_from(&settings_path))
                .unwrap_or_else(|e| {
                    tracing::error!("Failed to load settings, using defaults: {}", e);
                    AppSettings::default()
                });
            tracing::info!(path = %settings_path.display(), "settings loaded");

            let launch_at_login = settings.behavior.launch_at_login;
            let accelerator = settings.behavior.chat_bar_shortcut.clone();
            app.manage(AppState::new(settings, settings_path));

            if let Err(e) = system::login_item::set_enabled(launch_at_login) {
                tracing::warn!("Failed to sync login item: {}", e);
            }

            system::tray::setup_tray(app.handle())?;

            if let Err(e) = system::shortcut::register_chat_bar_shortcut(app.handle(), &accelerator) {
                tracing::warn!("{}. Use the tray menu to open the chat bar.", e);
            }

            tracing::info!("MenuChat initialized");
            Ok(())
        })
        .on_window_event(system::window::surfaces::on_window_event)
        .invoke_handler(tauri::generate_handler![
            api::commands::surface::show_surface,
            api::commands::surface::hide_surface,
            api::commands::surface::toggle_surface,
            api::commands::surface::current_surface,
            api::commands::page::page_signal,
            api::commands::view::view_state,
            api::commands::view::zoom_in,
            api::commands::view::zoom_out,
            api::commands::view::zoom_reset,
            api::commands::view::set_zoom,
            api::commands::view::reload_chat,
            api::commands::view::new_chat,
            api::commands::settings::get_settings,
            api::commands::settings::save_settings,
            api::commands::system::log_message,
        ])
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("FATAL: Failed to start Tauri application: {}", e);
            std::process::exit(1);
        }
    };

    app.run(|_app, event| {
        // Hiding the last surface must not quit a menu-bar app; explicit exits carry a code
        if let RunEvent::ExitRequested { api, code, .. } = event {
            if code.is_none() {
                api.prevent_exit();
            }
        }
    });
}
