//! IPC commands
//!
//! - `surface`: show, hide and toggle the chat containers
//! - `page`: signals from the injected page bridge
//! - `view`: zoom, reload and new chat
//! - `settings`: settings persistence
//! - `system`: logging from the page

pub mod page;
pub mod settings;
pub mod surface;
pub mod system;
pub mod view;

#[cfg(test)]
mod tests {
    use serde_json::Value;

    const COMMANDS: &[&str] = &[
        "show_surface",
        "hide_surface",
        "toggle_surface",
        "current_surface",
        "page_signal",
        "view_state",
        "zoom_in",
        "zoom_out",
        "zoom_reset",
        "set_zoom",
        "reload_chat",
        "new_chat",
        "get_settings",
        "save_settings",
        "log_message",
    ];

    fn permissions(capability: &str) -> Vec<String> {
        let value: Value = serde_json::from_str(capability).unwrap();
        value["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p.as_str().map(str::to_string))
            .collect()
    }

    fn allow(command: &str) -> String {
        format!("allow-{}", command.replace('_', "-"))
    }

    #[test]
    fn test_build_script_declares_every_command() {
        let build = include_str!("../../build.rs");
        for command in COMMANDS {
            assert!(build.contains(&format!("\"{}\"", command)), "{} missing from app manifest", command);
        }
    }

    #[test]
    fn test_chat_origin_can_reach_bridge_commands() {
        let capability = include_str!("../../capabilities/chat-remote.json");
        let value: Value = serde_json::from_str(capability).unwrap();
        assert!(value["remote"]["urls"]
            .as_array()
            .unwrap()
            .iter()
            .any(|url| url == "https://chatgpt.com/*"));

        let granted = permissions(capability);
        assert!(granted.contains(&allow("page_signal")));
        assert!(granted.contains(&allow("log_message")));
        // The remote page gets nothing beyond the bridge
        assert!(!granted.contains(&allow("save_settings")));
        assert!(!granted.contains(&allow("show_surface")));
    }

    #[test]
    fn test_bundled_page_can_reach_every_command() {
        let granted = permissions(include_str!("../../capabilities/default.json"));
        for command in COMMANDS {
            assert!(granted.contains(&allow(command)), "{} not granted locally", command);
        }
    }
}
