//! System integration command module

use crate::shared::error::AppResult;
use crate::shared::types::LogRequest;

/// Log a message from the page
#[tauri::command]
pub async fn log_message(request: LogRequest) -> AppResult<()> {
    match request.level.to_lowercase().as_str() {
        "error" => tracing::error!(target: "page", "{}", request.message),
        "warn" | "warning" => tracing::warn!(target: "page", "{}", request.message),
        "debug" => tracing::debug!(target: "page", "{}", request.message),
        "trace" => tracing::trace!(target: "page", "{}", request.message),
        _ => tracing::info!(target: "page", "{}", request.message),
    }
    Ok(())
}
