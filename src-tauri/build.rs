/// Every `#[tauri::command]` registered in `lib.rs`. Each gets an
/// `allow-<name>` permission that capabilities grant per origin.
const COMMANDS: &[&str] = &[
    "show_surface",
    "hide_surface",
    "toggle_surface",
    "current_surface",
    "page_signal",
    "view_state",
    "zoom_in",
    "zoom_out",
    "zoom_reset",
    "set_zoom",
    "reload_chat",
    "new_chat",
    "get_settings",
    "save_settings",
    "log_message",
];

fn main() {
    let attributes = tauri_build::Attributes::new()
        .app_manifest(tauri_build::AppManifest::new().commands(COMMANDS));
    if let Err(e) = tauri_build::try_build(attributes) {
        panic!("tauri build script failed: {:#}", e);
    }
}
