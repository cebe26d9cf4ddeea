//! Download handling for the chat web view
//!
//! Files go straight to the Downloads folder under a name that does not
//! clobber an existing file. Failures are reported once with an alert.

use std::path::PathBuf;

use directories::UserDirs;
use tauri::webview::DownloadEvent;
use tauri::AppHandle;

use crate::core::downloads::{suggested_file_name, unique_destination};
use crate::shared::error::{AppError, AppResult};
use crate::system::alert;

fn downloads_dir() -> AppResult<PathBuf> {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|dir| dir.to_path_buf()))
        .ok_or_else(|| AppError::Download("Downloads folder is not available".to_string()))
}

/// `on_download` hook; returning false cancels the download.
pub fn handle_event(app: &AppHandle, event: DownloadEvent<'_>) -> bool {
    match event {
        DownloadEvent::Requested { url, destination } => {
            let dir = match downloads_dir() {
                Ok(dir) => dir,
                Err(e) => {
                    alert::show_error(app, "Download Failed", &e.to_string());
                    return false;
                }
            };
            let name = suggested_file_name(&url);
            let target = unique_destination(&dir, &name, |path| path.exists());
            tracing::info!(%url, destination = %target.display(), "download started");
            *destination = target;
            true
        }
        DownloadEvent::Finished { url, path, success } => {
            if success {
                tracing::info!(%url, path = ?path, "download finished");
            } else {
                let message = format!("Could not download {}", url);
                alert::show_error(app, "Download Failed", &message);
            }
            true
        }
        _ => true,
    }
}
