//! Page bridge command module

use tauri::{AppHandle, Manager};

use crate::core::bridge::PageSignal;
use crate::shared::error::AppResult;
use crate::state::{lock, AppState};
use crate::system::window::chat_bar;

/// Signal from the injected page script.
///
/// Every valid signal updates the sizer so the chat bar opens at the right
/// height; the bar is only resized while it shows the chat.
#[tauri::command]
pub async fn page_signal(app: AppHandle, signal: PageSignal) -> AppResult<()> {
    signal.validate()?;

    if let PageSignal::Navigated { url } = &signal {
        tracing::debug!(%url, "chat page navigated");
    }

    let height = {
        let state = app.state::<AppState>();
        let mut sizer = lock(&state.sizer);
        let height = sizer.apply(&signal);
        if let Some(height) = height {
            tracing::debug!(height, conversation = sizer.conversation_started(), "chat bar target changed");
        }
        height
    };
    chat_bar::resize_if_owner(&app, height);
    Ok(())
}
