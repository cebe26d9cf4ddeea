//! Surface window registry
//!
//! Centralized window configuration for the three containers of the chat
//! web view. Sizes come from settings where the user can change them.

use serde::{Deserialize, Serialize};

use crate::core::surface::SurfaceKind;
use crate::shared::settings::AppSettings;

pub const MAIN_WINDOW_SIZE: (f64, f64) = (1100.0, 780.0);
pub const MAIN_WINDOW_MIN_SIZE: (f64, f64) = (480.0, 360.0);

/// Window configuration for a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub decorations: bool,
    pub resizable: bool,
    /// Floating, non-activating panel above full-screen apps
    pub floating: bool,
    pub min_size: Option<(f64, f64)>,
}

impl WindowConfig {
    pub fn panel(width: f64, height: f64, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            decorations: false,
            resizable: false,
            floating: true,
            min_size: None,
        }
    }
}

pub fn surface_config(kind: SurfaceKind, settings: &AppSettings) -> WindowConfig {
    match kind {
        SurfaceKind::Popover => {
            WindowConfig::panel(settings.popover.width, settings.popover.height, "Chat")
        }
        SurfaceKind::ChatBar => WindowConfig::panel(
            settings.chat_bar.width,
            settings.chat_bar.collapsed_height,
            "Chat Bar",
        ),
        SurfaceKind::MainWindow => {
            let (width, height) = settings
                .main_window
                .frame
                .map(|frame| (frame.width, frame.height))
                .unwrap_or(MAIN_WINDOW_SIZE);
            WindowConfig {
                width,
                height,
                title: "MenuChat".to_string(),
                decorations: true,
                resizable: true,
                floating: false,
                min_size: Some(MAIN_WINDOW_MIN_SIZE),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Rect;

    #[test]
    fn test_panels_float_without_chrome() {
        let settings = AppSettings::default();
        for kind in [SurfaceKind::Popover, SurfaceKind::ChatBar] {
            let config = surface_config(kind, &settings);
            assert!(config.floating);
            assert!(!config.decorations);
        }
        let main = surface_config(SurfaceKind::MainWindow, &settings);
        assert!(!main.floating && main.decorations && main.resizable);
        assert_eq!((main.width, main.height), MAIN_WINDOW_SIZE);
    }

    #[test]
    fn test_sizes_follow_settings() {
        let mut settings = AppSettings::default();
        settings.popover.width = 360.0;
        settings.chat_bar.collapsed_height = 90.0;
        settings.main_window.frame = Some(Rect::new(10.0, 10.0, 900.0, 700.0));

        assert_eq!(surface_config(SurfaceKind::Popover, &settings).width, 360.0);
        assert_eq!(surface_config(SurfaceKind::ChatBar, &settings).height, 90.0);
        let main = surface_config(SurfaceKind::MainWindow, &settings);
        assert_eq!((main.width, main.height), (900.0, 700.0));
    }
}
