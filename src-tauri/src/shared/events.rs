use serde::Serialize;

use crate::core::surface::SurfaceKind;
use crate::shared::settings::AppSettings;

/// Events pushed from the app to the chat web view
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum AppEvent {
    SettingsUpdated(AppSettings),
    SurfaceChanged(Option<SurfaceKind>),
    ZoomChanged(f64),
}
