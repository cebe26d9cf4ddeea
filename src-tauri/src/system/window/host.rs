//! Tauri side of surface switching
//!
//! The three containers are plain Tauri windows without a webview of their
//! own. The single `chat` webview is created inside whichever container asks
//! for it first and is reparented afterwards, so the page, its cookies and
//! its scroll position survive every switch.

use tauri::webview::{PageLoadEvent, WebviewBuilder};
use tauri::window::WindowBuilder;
use tauri::{AppHandle, LogicalPosition, LogicalSize, Manager, Webview, WebviewUrl, Window};
use tauri_plugin_opener::OpenerExt;
use url::Url;

use crate::config::{surface_config, WindowConfig};
use crate::core::bridge::render_bridge_script;
use crate::core::geometry::{
    centered_frame, chat_bar_frame, display_for_point, popover_frame, reconcile, Display, Point,
    Rect, CHAT_BAR_BOTTOM_MARGIN,
};
use crate::core::navigation::NavigationDecision;
use crate::core::surface::{SurfaceHost, SurfaceKind};
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;
use crate::state::{lock, AppState};
use crate::system::downloads;
use crate::system::window::{chat_bar, nswindow};

pub const CHAT_WEBVIEW_LABEL: &str = "chat";

/// Bundled page shown when the configured chat URL is unusable
const OFFLINE_PAGE: &str = "index.html";

pub struct TauriSurfaceHost {
    app: AppHandle,
    /// Tray icon rect in logical points, for the popover
    anchor: Option<Rect>,
    /// Set when a detach wrote window geometry into settings
    geometry_recorded: bool,
}

impl TauriSurfaceHost {
    pub fn new(app: AppHandle, anchor: Option<Rect>) -> Self {
        Self {
            app,
            anchor,
            geometry_recorded: false,
        }
    }

    pub fn geometry_recorded(&self) -> bool {
        self.geometry_recorded
    }

    fn ensure_window(&self, kind: SurfaceKind, config: &WindowConfig, frame: Rect) -> AppResult<Window> {
        if let Some(window) = self.app.get_window(kind.label()) {
            return Ok(window);
        }

        tracing::debug!(?kind, "creating surface window");
        let mut builder = WindowBuilder::new(&self.app, kind.label())
            .title(&config.title)
            .inner_size(frame.width, frame.height)
            .position(frame.x, frame.y)
            .decorations(config.decorations)
            .resizable(config.resizable)
            .visible(false);

        if config.floating {
            builder = builder
                .always_on_top(true)
                .skip_taskbar(true)
                .visible_on_all_workspaces(true);
        }
        if let Some((width, height)) = config.min_size {
            builder = builder.min_inner_size(width, height);
        }

        let window = builder.build()?;
        if config.floating {
            if let Err(e) = nswindow::configure_floating_panel(&window) {
                tracing::warn!(?kind, "Failed to configure floating panel: {}", e);
            }
        }
        Ok(window)
    }

    fn frame_for(&self, kind: SurfaceKind, config: &WindowConfig, settings: &AppSettings) -> Rect {
        let displays = available_displays(&self.app);
        let cursor_display = cursor_point().and_then(|point| display_for_point(&displays, point));

        match kind {
            SurfaceKind::Popover => {
                let anchor = self.anchor.or_else(|| {
                    cursor_point().map(|point| Rect::new(point.x, point.y, 0.0, 0.0))
                });
                match anchor {
                    Some(anchor) => popover_frame(anchor, config.width, config.height, &displays),
                    None => Rect::new(0.0, 0.0, config.width, config.height),
                }
            }
            SurfaceKind::ChatBar => {
                let height = lock(&self.app.state::<AppState>().sizer).current_height();
                match (settings.chat_bar.origin, cursor_display) {
                    // The bar grows upward, so its bottom-left corner is what sticks
                    (Some(origin), _) => reconcile(
                        Rect::new(origin.x, origin.y - height, config.width, height),
                        &displays,
                    ),
                    (None, Some(display)) => {
                        chat_bar_frame(display, config.width, height, CHAT_BAR_BOTTOM_MARGIN)
                    }
                    (None, None) => Rect::new(0.0, 0.0, config.width, height),
                }
            }
            SurfaceKind::MainWindow => match (settings.main_window.frame, cursor_display) {
                (Some(frame), _) => reconcile(frame, &displays),
                (None, Some(display)) => centered_frame(display, config.width, config.height),
                (None, None) => Rect::new(0.0, 0.0, config.width, config.height),
            },
        }
    }

    fn create_chat_webview(&self, window: &Window, settings: &AppSettings) -> AppResult<Webview> {
        let url = match settings.chat_url() {
            Some(url) => WebviewUrl::External(url),
            None => {
                tracing::warn!("Chat URL {:?} is not usable, loading offline page", settings.chat.url);
                WebviewUrl::App(OFFLINE_PAGE.into())
            }
        };
        let script = render_bridge_script(&settings.chat.selectors)?;

        let nav_app = self.app.clone();
        let download_app = self.app.clone();
        let load_app = self.app.clone();

        let mut builder = WebviewBuilder::new(CHAT_WEBVIEW_LABEL, url)
            .initialization_script(&script)
            .auto_resize()
            .on_navigation(move |url| allow_navigation(&nav_app, url))
            .on_download(move |_webview, event| downloads::handle_event(&download_app, event))
            .on_page_load(move |_webview, payload| {
                if matches!(payload.event(), PageLoadEvent::Started) {
                    tracing::debug!(url = %payload.url(), "chat page load started");
                    let app = load_app.clone();
                    tauri::async_runtime::spawn(async move {
                        let height = lock(&app.state::<AppState>().sizer).reset();
                        chat_bar::resize_if_owner(&app, height);
                    });
                }
            });
        if let Some(agent) = settings.chat.user_agent.as_deref().filter(|a| !a.trim().is_empty()) {
            builder = builder.user_agent(agent);
        }

        let size = window.inner_size()?.to_logical::<f64>(window.scale_factor()?);
        let webview = window.add_child(builder, LogicalPosition::new(0.0, 0.0), size)?;
        tracing::info!("Chat webview created in {}", window.label());
        Ok(webview)
    }

    fn record_geometry(&mut self, kind: SurfaceKind, window: &Window) {
        let frame = match window_frame(window) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(?kind, "Failed to read window frame: {}", e);
                return;
            }
        };

        let state = self.app.state::<AppState>();
        let mut settings = lock(&state.settings);
        match kind {
            SurfaceKind::ChatBar => {
                settings.chat_bar.origin = Some(Point {
                    x: frame.x,
                    y: frame.bottom(),
                });
            }
            SurfaceKind::MainWindow => settings.main_window.frame = Some(frame),
            SurfaceKind::Popover => return,
        }
        self.geometry_recorded = true;
    }
}

impl SurfaceHost for TauriSurfaceHost {
    type Error = AppError;

    fn attach(&mut self, to: SurfaceKind) -> AppResult<()> {
        let settings = self.app.state::<AppState>().settings_snapshot();
        let config = surface_config(to, &settings);
        let frame = self.frame_for(to, &config, &settings);
        let window = self.ensure_window(to, &config, frame)?;

        set_window_frame(&window, frame)?;

        let webview = match self.app.get_webview(CHAT_WEBVIEW_LABEL) {
            Some(webview) => {
                webview.reparent(&window)?;
                webview
            }
            None => self.create_chat_webview(&window, &settings)?,
        };
        webview.set_position(LogicalPosition::new(0.0, 0.0))?;
        webview.set_size(LogicalSize::new(frame.width, frame.height))?;
        webview.set_zoom(settings.zoom().factor())?;

        window.show()?;
        window.set_focus()?;
        webview.set_focus()?;
        Ok(())
    }

    fn detach(&mut self, from: SurfaceKind) -> AppResult<()> {
        let window = self
            .app
            .get_window(from.label())
            .ok_or_else(|| AppError::Window(format!("Surface window {} not found", from.label())))?;

        if window.is_visible().unwrap_or(false) {
            self.record_geometry(from, &window);
        }
        window.hide()?;
        Ok(())
    }
}

fn allow_navigation(app: &AppHandle, url: &Url) -> bool {
    let policy = lock(&app.state::<AppState>().settings).navigation_policy();
    match policy.decide(url) {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternally => {
            tracing::debug!(%url, "opening link externally");
            if let Err(e) = app.opener().open_url(url.as_str(), None::<&str>) {
                tracing::warn!("Failed to open {} externally: {}", url, e);
            }
            false
        }
        NavigationDecision::Block => {
            tracing::debug!(%url, "navigation blocked");
            false
        }
    }
}

/// Every connected monitor as a `Display` in logical points
pub fn available_displays(app: &AppHandle) -> Vec<Display> {
    match app.available_monitors() {
        Ok(monitors) => monitors
            .iter()
            .filter_map(|monitor| {
                let position = monitor.position();
                let size = monitor.size();
                Display::from_physical(
                    position.x,
                    position.y,
                    size.width,
                    size.height,
                    monitor.scale_factor(),
                )
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to enumerate monitors: {}", e);
            Vec::new()
        }
    }
}

/// Window position and content size in logical points, in the same terms
/// `set_window_frame` takes
pub fn window_frame(window: &Window) -> AppResult<Rect> {
    let scale = window.scale_factor()?;
    let position = window.outer_position()?.to_logical::<f64>(scale);
    let size = window.inner_size()?.to_logical::<f64>(scale);
    Ok(Rect::new(position.x, position.y, size.width, size.height))
}

pub fn set_window_frame(window: &Window, frame: Rect) -> AppResult<()> {
    window.set_size(LogicalSize::new(frame.width, frame.height))?;
    window.set_position(LogicalPosition::new(frame.x, frame.y))?;
    Ok(())
}

/// Mouse location in global logical points
fn cursor_point() -> Option<Point> {
    use mouse_position::mouse_position::Mouse;

    match Mouse::get_mouse_position() {
        Mouse::Position { x, y } => Some(Point {
            x: f64::from(x),
            y: f64::from(y),
        }),
        Mouse::Error => {
            tracing::debug!("Cursor position unavailable");
            None
        }
    }
}
