use serde::{Deserialize, Serialize};

use crate::core::surface::SurfaceKind;

/// Log line forwarded from the page bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
}

/// Snapshot of the view state returned by view commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    pub owner: Option<SurfaceKind>,
    pub zoom: f64,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
}
