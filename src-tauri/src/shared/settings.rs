use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use url::Url;

use crate::core::bridge::BridgeSelectors;
use crate::core::geometry::{Point, Rect};
use crate::core::navigation::NavigationPolicy;
use crate::core::sizer::SizerConfig;
use crate::core::zoom::Zoom;
use crate::shared::error::{AppError, AppResult};

pub const DEFAULT_CHAT_URL: &str = "https://chatgpt.com/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub chat: ChatSettings,
    pub popover: PanelSize,
    pub chat_bar: ChatBarSettings,
    pub main_window: MainWindowSettings,
    pub view: ViewSettings,
    pub behavior: BehaviorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub url: String,
    pub allowed_hosts: Vec<String>,
    pub user_agent: Option<String>,
    pub selectors: BridgeSelectors,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatBarSettings {
    pub width: f64,
    pub collapsed_height: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub expanded_height: f64,
    pub overlay_floor: f64,
    pub expand_on_conversation: bool,
    /// Bottom-left corner of the bar when it was last hidden; it grows upward from here
    pub origin: Option<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainWindowSettings {
    pub frame: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSettings {
    pub launch_at_login: bool,
    pub hide_popover_on_blur: bool,
    pub chat_bar_shortcut: String,
    pub open_external_links_in_browser: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_CHAT_URL.to_string(),
            allowed_hosts: vec![
                "chatgpt.com".to_string(),
                "openai.com".to_string(),
                "oaistatic.com".to_string(),
                "oaiusercontent.com".to_string(),
                "accounts.google.com".to_string(),
                "appleid.apple.com".to_string(),
                "login.microsoftonline.com".to_string(),
                "login.live.com".to_string(),
                "challenges.cloudflare.com".to_string(),
            ],
            user_agent: None,
            selectors: BridgeSelectors::default(),
        }
    }
}

impl Default for PanelSize {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 640.0,
        }
    }
}

impl Default for ChatBarSettings {
    fn default() -> Self {
        let sizer = SizerConfig::default();
        Self {
            width: 680.0,
            collapsed_height: sizer.collapsed_height,
            min_height: sizer.min_height,
            max_height: sizer.max_height,
            expanded_height: sizer.expanded_height,
            overlay_floor: sizer.overlay_floor,
            expand_on_conversation: sizer.expand_on_conversation,
            origin: None,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom: Zoom::default().factor(),
        }
    }
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            launch_at_login: false,
            hide_popover_on_blur: true,
            chat_bar_shortcut: "Alt+Space".to_string(),
            open_external_links_in_browser: true,
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 1.0 {
        value
    } else {
        fallback
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "menuchat", "app")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Settings("Failed to determine config directory".to_string()))
    }

    /// Bring every value back into its valid range.
    pub fn normalize(&mut self) {
        let defaults = ChatBarSettings::default();
        let bar = &mut self.chat_bar;

        bar.width = positive_or(bar.width, defaults.width);
        bar.min_height = positive_or(bar.min_height, defaults.min_height);
        bar.max_height = positive_or(bar.max_height, defaults.max_height);
        if bar.min_height > bar.max_height {
            std::mem::swap(&mut bar.min_height, &mut bar.max_height);
        }
        let (min, max) = (bar.min_height, bar.max_height);
        bar.collapsed_height = positive_or(bar.collapsed_height, defaults.collapsed_height).clamp(min, max);
        bar.expanded_height = positive_or(bar.expanded_height, defaults.expanded_height).clamp(min, max);
        bar.overlay_floor = positive_or(bar.overlay_floor, defaults.overlay_floor).clamp(min, max);
        if bar.origin.is_some_and(|p| !p.x.is_finite() || !p.y.is_finite()) {
            bar.origin = None;
        }

        let popover = PanelSize::default();
        self.popover.width = positive_or(self.popover.width, popover.width);
        self.popover.height = positive_or(self.popover.height, popover.height);

        if self.main_window.frame.is_some_and(|frame| !frame.is_usable()) {
            self.main_window.frame = None;
        }

        self.view.zoom = Zoom::new(self.view.zoom).factor();

        if self.behavior.chat_bar_shortcut.trim().is_empty() {
            self.behavior.chat_bar_shortcut = BehaviorSettings::default().chat_bar_shortcut;
        }
    }

    /// Chat URL if it is a usable http(s) URL
    pub fn chat_url(&self) -> Option<Url> {
        Url::parse(self.chat.url.trim())
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
    }

    pub fn sizer_config(&self) -> SizerConfig {
        SizerConfig {
            collapsed_height: self.chat_bar.collapsed_height,
            min_height: self.chat_bar.min_height,
            max_height: self.chat_bar.max_height,
            expanded_height: self.chat_bar.expanded_height,
            overlay_floor: self.chat_bar.overlay_floor,
            expand_on_conversation: self.chat_bar.expand_on_conversation,
        }
    }

    /// The chat host is always allowed, on top of the configured list.
    pub fn navigation_policy(&self) -> NavigationPolicy {
        let chat_host = self
            .chat_url()
            .and_then(|url| url.host_str().map(str::to_string));
        let hosts = self.chat.allowed_hosts.iter().cloned().chain(chat_host);
        NavigationPolicy::new(hosts, self.behavior.open_external_links_in_browser)
    }

    pub fn zoom(&self) -> Zoom {
        Zoom::new(self.view.zoom)
    }

    /// Which live effects need re-applying after replacing `previous`
    pub fn changes_since(&self, previous: &AppSettings) -> SettingsChanges {
        SettingsChanges {
            shortcut: self.behavior.chat_bar_shortcut != previous.behavior.chat_bar_shortcut,
            launch_at_login: self.behavior.launch_at_login != previous.behavior.launch_at_login,
            zoom: self.view.zoom != previous.view.zoom,
            sizer: self.sizer_config() != previous.sizer_config(),
            chat_url: self.chat_url() != previous.chat_url(),
        }
    }

    /// Load from `path`, writing defaults when the file does not exist yet.
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Settings(format!("Failed to read settings file: {}", e)))?;

        let mut settings: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Settings(format!("Failed to parse settings: {}", e)))?;
        settings.normalize();
        Ok(settings)
    }

    /// Write to `path` through a temp file and a rename, so a reader never
    /// sees a partial file.
    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Settings(format!("Failed to create config directory: {}", e)))?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let content = serde_json::to_string_pretty(&normalized)?;

        let temp = temp_path(path);
        if let Err(e) = fs::write(&temp, content).await {
            let _ = fs::remove_file(&temp).await;
            return Err(AppError::Settings(format!("Failed to write settings file: {}", e)));
        }
        fs::rename(&temp, path)
            .await
            .map_err(|e| AppError::Settings(format!("Failed to replace settings file: {}", e)))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SettingsChanges {
    pub shortcut: bool,
    pub launch_at_login: bool,
    pub zoom: bool,
    pub sizer: bool,
    pub chat_url: bool,
}

/// Sibling of `path` unique to this write
fn temp_path(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "settings.json".to_string());
    path.with_file_name(format!(".{}.{}-{}.tmp", name, std::process::id(), n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("menuchat-test-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[tokio::test]
    async fn test_missing_file_writes_defaults() {
        let path = temp_settings_path();

        let settings = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(settings, AppSettings::default());
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let path = temp_settings_path();
        let mut settings = AppSettings::default();
        settings.view.zoom = 1.2;
        settings.behavior.launch_at_login = true;
        settings.chat_bar.origin = Some(Point { x: 200.0, y: 640.0 });

        settings.save_to(&path).await.unwrap();
        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let path = temp_settings_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "view": { "zoom": 9.0 }, "popover": { "width": 500 } }"#).unwrap();

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded.view.zoom, 1.4);
        assert_eq!(loaded.popover.width, 500.0);
        assert_eq!(loaded.popover.height, PanelSize::default().height);
        assert_eq!(loaded.chat, ChatSettings::default());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_overlapping_saves_leave_a_readable_file() {
        let path = temp_settings_path();

        let mut saves = Vec::new();
        for step in 0..24 {
            let mut settings = AppSettings::default();
            settings.chat.url = format!("https://chatgpt.com/{}", "x".repeat(step * 200));
            let path = path.clone();
            saves.push(tokio::spawn(async move { settings.save_to(&path).await }));
        }
        for save in saves {
            save.await.unwrap().unwrap();
        }

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert!(loaded.chat.url.starts_with("https://chatgpt.com/"));
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1, "temp files left behind");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let path = temp_settings_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let result = AppSettings::load_from(&path).await;
        assert!(matches!(result, Err(AppError::Settings(_))));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_normalize_chat_bar_limits() {
        let mut settings = AppSettings::default();
        settings.chat_bar.min_height = 700.0;
        settings.chat_bar.max_height = 100.0;
        settings.chat_bar.collapsed_height = f64::NAN;
        settings.chat_bar.overlay_floor = 5000.0;
        settings.normalize();

        let bar = &settings.chat_bar;
        assert_eq!((bar.min_height, bar.max_height), (100.0, 700.0));
        assert_eq!(bar.collapsed_height, 100.0);
        assert_eq!(bar.overlay_floor, 700.0);
        assert!(bar.expanded_height <= bar.max_height);
    }

    #[test]
    fn test_normalize_drops_unusable_frame() {
        let mut settings = AppSettings::default();
        settings.main_window.frame = Some(Rect::new(0.0, 0.0, 0.0, 600.0));
        settings.behavior.chat_bar_shortcut = "  ".to_string();
        settings.normalize();

        assert_eq!(settings.main_window.frame, None);
        assert_eq!(settings.behavior.chat_bar_shortcut, "Alt+Space");
    }

    #[test]
    fn test_changes_since() {
        let previous = AppSettings::default();
        assert_eq!(previous.changes_since(&previous), SettingsChanges::default());

        let mut next = previous.clone();
        next.view.zoom = 1.2;
        next.chat_bar.max_height = 500.0;
        next.chat.url = "https://chatgpt.com/".to_string();
        assert_eq!(
            next.changes_since(&previous),
            SettingsChanges {
                zoom: true,
                sizer: true,
                ..SettingsChanges::default()
            }
        );

        next.behavior.chat_bar_shortcut = "Alt+Shift+Space".to_string();
        next.behavior.launch_at_login = !previous.behavior.launch_at_login;
        let changes = next.changes_since(&previous);
        assert!(changes.shortcut && changes.launch_at_login);
        assert!(!changes.chat_url);
    }

    #[test]
    fn test_chat_url_validation() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.chat_url().unwrap().as_str(), DEFAULT_CHAT_URL);

        settings.chat.url = "javascript:alert(1)".to_string();
        assert!(settings.chat_url().is_none());

        settings.chat.url = "not a url".to_string();
        assert!(settings.chat_url().is_none());
    }

    #[test]
    fn test_navigation_policy_includes_chat_host() {
        let mut settings = AppSettings::default();
        settings.chat.url = "https://chat.example.org/".to_string();
        settings.chat.allowed_hosts.clear();

        let policy = settings.navigation_policy();
        let url = Url::parse("https://chat.example.org/c/1").unwrap();
        assert_eq!(
            policy.decide(&url),
            crate::core::navigation::NavigationDecision::Allow
        );
    }
}
