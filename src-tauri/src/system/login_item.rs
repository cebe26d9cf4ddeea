//! Launch at login through a per-user LaunchAgent
//!
//! Only macOS is supported; everywhere else the setting is stored but has no effect.

use std::path::{Path, PathBuf};

use crate::shared::error::{AppError, AppResult};

pub const AGENT_LABEL: &str = "com.menuchat.app";

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// LaunchAgent property list that starts `program` at login.
pub fn render_plist(label: &str, program: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{label}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{program}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>ProcessType</key>
    <string>Interactive</string>
</dict>
</plist>
"#,
        label = escape_xml(label),
        program = escape_xml(&program.to_string_lossy()),
    )
}

fn agent_path() -> AppResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| {
            dirs.home_dir()
                .join("Library/LaunchAgents")
                .join(format!("{}.plist", AGENT_LABEL))
        })
        .ok_or_else(|| AppError::Settings("Failed to determine home directory".to_string()))
}

/// Install or remove the LaunchAgent.
#[cfg(target_os = "macos")]
pub fn set_enabled(enabled: bool) -> AppResult<()> {
    let path = agent_path()?;

    if enabled {
        let program = std::env::current_exe()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, render_plist(AGENT_LABEL, &program))?;
        tracing::info!(path = %path.display(), "launch at login enabled");
    } else if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "launch at login disabled");
    }
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub fn set_enabled(enabled: bool) -> AppResult<()> {
    tracing::debug!(enabled, path = ?agent_path().ok(), "launch at login is macOS only");
    Ok(())
}
