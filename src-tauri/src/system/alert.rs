//! Modal alerts for failures the user has to know about

use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

/// Show a non-blocking error alert. Also logged, since the alert is gone once dismissed.
pub fn show_error(app: &AppHandle, title: &str, message: &str) {
    tracing::error!("{}: {}", title, message);
    app.dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Error)
        .show(|_| {});
}
