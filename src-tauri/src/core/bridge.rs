//! Page bridge
//!
//! A small initialization script is injected into the chat page. It watches
//! the composer, transient overlays and the message list, and reports what it
//! sees back through the `page_signal` command as a `PageSignal`.

use serde::{Deserialize, Serialize};

use crate::shared::error::{AppError, AppResult};

const BRIDGE_TEMPLATE: &str = include_str!("page_bridge.js");
const SELECTORS_PLACEHOLDER: &str = "__MENUCHAT_SELECTORS__";

/// Signals reported by the injected page script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageSignal {
    /// Rendered height of the message composer, in CSS pixels
    InputHeight { height: f64 },
    /// A menu, listbox or dialog opened or closed inside the page
    OverlayVisibility { visible: bool },
    /// The page now shows (or no longer shows) conversation messages
    ConversationStarted { started: bool },
    /// Client-side route change
    Navigated { url: String },
}

impl PageSignal {
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::InputHeight { height } if !height.is_finite() || *height < 0.0 => Err(
                AppError::Validation(format!("Invalid input height reported by page: {}", height)),
            ),
            _ => Ok(()),
        }
    }
}

/// CSS selectors the bridge script uses to find page elements.
///
/// These track a third-party page, so they live in settings rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSelectors {
    pub input: String,
    pub overlay: String,
    pub conversation: String,
}

impl Default for BridgeSelectors {
    fn default() -> Self {
        Self {
            input: "form textarea, form [contenteditable='true']".to_string(),
            overlay: "[role='menu'], [role='listbox'], [role='dialog']".to_string(),
            conversation: "main [data-message-author-role], main article".to_string(),
        }
    }
}

/// Render the initialization script for the given selectors.
pub fn render_bridge_script(selectors: &BridgeSelectors) -> AppResult<String> {
    let encoded = serde_json::to_string(selectors)?;
    Ok(BRIDGE_TEMPLATE.replace(SELECTORS_PLACEHOLDER, &encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_format() {
        let signal: PageSignal =
            serde_json::from_str(r#"{"kind":"input_height","height":38.5}"#).unwrap();
        assert_eq!(signal, PageSignal::InputHeight { height: 38.5 });

        let signal: PageSignal =
            serde_json::from_str(r#"{"kind":"overlay_visibility","visible":true}"#).unwrap();
        assert_eq!(signal, PageSignal::OverlayVisibility { visible: true });

        let signal: PageSignal =
            serde_json::from_str(r#"{"kind":"conversation_started","started":false}"#).unwrap();
        assert_eq!(signal, PageSignal::ConversationStarted { started: false });
    }

    #[test]
    fn test_unknown_signal_is_rejected() {
        let result = serde_json::from_str::<PageSignal>(r#"{"kind":"scroll","y":10}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_heights() {
        assert!(PageSignal::InputHeight { height: 0.0 }.validate().is_ok());
        assert!(PageSignal::InputHeight { height: -1.0 }.validate().is_err());
        assert!(PageSignal::InputHeight { height: f64::NAN }.validate().is_err());
        assert!(PageSignal::InputHeight { height: f64::INFINITY }.validate().is_err());
        assert!(PageSignal::OverlayVisibility { visible: false }.validate().is_ok());
    }

    #[test]
    fn test_script_embeds_escaped_selectors() {
        let selectors = BridgeSelectors {
            input: "textarea[placeholder=\"Ask\"]".to_string(),
            ..BridgeSelectors::default()
        };
        let script = render_bridge_script(&selectors).unwrap();

        assert!(!script.contains(SELECTORS_PLACEHOLDER));
        assert!(script.contains(r#"textarea[placeholder=\"Ask\"]"#));
        assert!(script.contains("page_signal"));
    }

    #[test]
    fn test_script_reports_failures_to_log_message() {
        let script = render_bridge_script(&BridgeSelectors::default()).unwrap();

        // Rejected calls and observer errors go to the app log, shaped like `LogRequest`
        assert!(script.contains(r#"invoke("log_message", { request: { level: level, message: message } })"#));
        assert!(!script.contains(".catch(function () {});\n  }\n\n  function flush"));
        assert!(script.contains(r#"log("warn", "bridge: " + cmd + " rejected: " + err)"#));
        assert!(script.contains(r#"log("error", "bridge: " + err)"#));
    }
}
