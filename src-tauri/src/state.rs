//! Shared application state held by Tauri's state manager

use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tauri::{AppHandle, Manager};

use crate::core::sizer::PanelSizer;
use crate::core::surface::SurfaceCoordinator;
use crate::shared::emit::emit_event;
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::shared::settings::AppSettings;

/// A tray click this soon after the popover hid on blur is the same click
const DISMISS_GRACE: Duration = Duration::from_millis(300);

pub struct AppState {
    pub settings: Mutex<AppSettings>,
    pub settings_path: PathBuf,
    pub surfaces: Mutex<SurfaceCoordinator>,
    pub sizer: Mutex<PanelSizer>,
    /// Bumped for every chat bar resize; a running animation stops when it changes
    pub resize_generation: AtomicU64,
    popover_dismissed_at: Mutex<Option<Instant>>,
    /// Serialises settings writes; held across the snapshot and the write
    settings_writer: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn new(settings: AppSettings, settings_path: PathBuf) -> Self {
        let sizer = PanelSizer::with_zoom(settings.sizer_config(), settings.zoom().factor());
        Self {
            settings: Mutex::new(settings),
            settings_path,
            surfaces: Mutex::new(SurfaceCoordinator::new()),
            sizer: Mutex::new(sizer),
            resize_generation: AtomicU64::new(0),
            popover_dismissed_at: Mutex::new(None),
            settings_writer: tokio::sync::Mutex::new(()),
        }
    }

    pub fn settings_snapshot(&self) -> AppSettings {
        lock(&self.settings).clone()
    }

    /// Write the settings as they are when this writer's turn comes.
    ///
    /// The snapshot is taken under the writer lock, so the last write to
    /// finish always carries the newest settings.
    pub async fn write_settings(&self) -> AppResult<AppSettings> {
        let _writer = self.settings_writer.lock().await;
        let settings = self.settings_snapshot();
        settings.save_to(&self.settings_path).await?;
        Ok(settings)
    }

    pub fn mark_popover_dismissed(&self) {
        *lock(&self.popover_dismissed_at) = Some(Instant::now());
    }

    /// True once per blur dismissal, within the grace period
    pub fn take_recent_popover_dismissal(&self) -> bool {
        lock(&self.popover_dismissed_at)
            .take()
            .is_some_and(|at| at.elapsed() < DISMISS_GRACE)
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("State mutex poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

/// Write the current settings to disk in the background.
pub fn persist_settings(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        if let Err(e) = save_settings(&app).await {
            tracing::error!("Failed to save settings: {}", e);
        }
    });
}

/// Write the current settings and announce them.
pub async fn save_settings(app: &AppHandle) -> AppResult<AppSettings> {
    let settings = app.state::<AppState>().write_settings().await?;
    emit_event(app, AppEvent::SettingsUpdated(settings.clone()));
    Ok(settings)
}
