//! Global chat bar shortcut

use std::time::Duration;

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use crate::core::surface::SurfaceKind;
use crate::shared::error::{AppError, AppResult};
use crate::system::window::surfaces;

const MAX_ATTEMPTS: u32 = 5;

/// 100ms, 200ms, 400ms, 800ms
fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2_u64.pow(attempt))
}

/// Replace any previous registration with `accelerator`, which toggles the chat bar.
///
/// Registration is retried with exponential backoff; on final failure the app
/// keeps running without a shortcut and the error is returned for logging.
pub fn register_chat_bar_shortcut(app: &AppHandle, accelerator: &str) -> AppResult<()> {
    let shortcut: Shortcut = accelerator
        .parse()
        .map_err(|e| AppError::Shortcut(format!("Invalid shortcut '{}': {}", accelerator, e)))?;

    let global = app.global_shortcut();
    if let Err(e) = global.unregister_all() {
        tracing::debug!("Unregister before registering shortcut: {}", e);
    }

    let mut last_error = None;
    for attempt in 0..MAX_ATTEMPTS {
        let result = global.on_shortcut(shortcut, |app, _shortcut, event| {
            if !matches!(event.state(), ShortcutState::Pressed) {
                return;
            }
            let app = app.clone();
            tauri::async_runtime::spawn(async move {
                if let Err(e) = surfaces::toggle_surface(&app, SurfaceKind::ChatBar, None) {
                    tracing::error!("Shortcut failed to toggle chat bar: {}", e);
                }
            });
        });

        match result {
            Ok(()) => {
                tracing::info!(accelerator, attempt = attempt + 1, "registered chat bar shortcut");
                return Ok(());
            }
            Err(e) => {
                if attempt + 1 < MAX_ATTEMPTS {
                    let delay = retry_delay(attempt);
                    tracing::warn!(
                        "Shortcut registration attempt {} failed: {}. Retrying in {:?}",
                        attempt + 1,
                        e,
                        delay
                    );
                    std::thread::sleep(delay);
                }
                last_error = Some(e);
            }
        }
    }

    let message = last_error.map(|e| e.to_string()).unwrap_or_default();
    tracing::warn!("Continuing without chat bar shortcut. Check System Settings > Keyboard > Keyboard Shortcuts for conflicts");
    Err(AppError::Shortcut(format!(
        "Failed to register '{}' after {} attempts: {}",
        accelerator, MAX_ATTEMPTS, message
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delays_double() {
        let delays: Vec<u128> = (0..MAX_ATTEMPTS - 1).map(|a| retry_delay(a).as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 800]);
    }

    #[test]
    fn test_default_accelerator_parses() {
        let default = crate::shared::settings::BehaviorSettings::default().chat_bar_shortcut;
        assert!(default.parse::<Shortcut>().is_ok());
        assert!("Alt+Nope+Space".parse::<Shortcut>().is_err());
    }
}
