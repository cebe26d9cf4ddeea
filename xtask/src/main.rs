//! xtask: release bundling for MenuChat.
//!
//! `cargo xtask bundle` builds the `.app` with the Tauri CLI for one macOS
//! architecture and packs it into a compressed disk image with `hdiutil`.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for MenuChat")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the .app bundle and, unless told otherwise, a .dmg next to it.
    Bundle(BundleArgs),
}

#[derive(Debug, Clone, clap::Args)]
struct BundleArgs {
    /// Build with the debug profile.
    #[arg(long)]
    debug: bool,

    /// Target architecture.
    #[arg(long, value_enum, default_value_t = Arch::Arm64)]
    arch: Arch,

    /// Stop after the .app bundle.
    #[arg(long)]
    no_dmg: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Arch {
    Arm64,
    #[value(name = "x86_64")]
    X86_64,
    Universal,
}

impl Arch {
    fn triple(self) -> &'static str {
        match self {
            Arch::Arm64 => "aarch64-apple-darwin",
            Arch::X86_64 => "x86_64-apple-darwin",
            Arch::Universal => "universal-apple-darwin",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X86_64 => "x86_64",
            Arch::Universal => "universal",
        }
    }
}

/// The fields of `tauri.conf.json` the bundle names are derived from
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TauriConfig {
    product_name: String,
    version: String,
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_tauri_config(app_dir: &Path) -> Result<TauriConfig> {
    let path = app_dir.join("tauri.conf.json");
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn tauri_build_args(args: &BundleArgs) -> Vec<String> {
    let mut cmd = vec![
        "tauri".to_string(),
        "build".to_string(),
        "--target".to_string(),
        args.arch.triple().to_string(),
        "--bundles".to_string(),
        "app".to_string(),
    ];
    if args.debug {
        cmd.push("--debug".to_string());
    }
    cmd
}

/// `target/<triple>/<profile>/bundle/macos`
fn bundle_dir(root: &Path, args: &BundleArgs) -> PathBuf {
    let profile = if args.debug { "debug" } else { "release" };
    root.join("target")
        .join(args.arch.triple())
        .join(profile)
        .join("bundle")
        .join("macos")
}

fn dmg_name(config: &TauriConfig, arch: Arch) -> String {
    format!("{}_{}_{}.dmg", config.product_name, config.version, arch.name())
}

fn hdiutil_args(volume: &str, app: &Path, dmg: &Path) -> Vec<String> {
    vec![
        "create".to_string(),
        "-volname".to_string(),
        volume.to_string(),
        "-srcfolder".to_string(),
        app.display().to_string(),
        "-ov".to_string(),
        "-format".to_string(),
        "UDZO".to_string(),
        dmg.display().to_string(),
    ]
}

fn run(program: &str, args: &[String], dir: &Path) -> Result<()> {
    tracing::info!("$ {} {}", program, args.join(" "));
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .with_context(|| format!("failed to start {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}

fn bundle(args: &BundleArgs) -> Result<()> {
    let root = workspace_root();
    let app_dir = root.join("src-tauri");
    let config = read_tauri_config(&app_dir)?;

    run("cargo", &tauri_build_args(args), &app_dir)?;

    let out_dir = bundle_dir(&root, args);
    let app = out_dir.join(format!("{}.app", config.product_name));
    if !app.is_dir() {
        bail!("expected bundle not found at {}", app.display());
    }
    tracing::info!("bundle ready: {}", app.display());

    if args.no_dmg {
        return Ok(());
    }

    let dmg = out_dir.join(dmg_name(&config, args.arch));
    run("hdiutil", &hdiutil_args(&config.product_name, &app, &dmg), &root)?;
    tracing::info!("disk image ready: {}", dmg.display());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xtask=info".into()),
        )
        .without_time()
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Task::Bundle(args) => bundle(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> BundleArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Task::Bundle(args) => args,
        }
    }

    #[test]
    fn test_defaults_to_arm64_release_with_dmg() {
        let args = parse(&["xtask", "bundle"]);
        assert_eq!(args.arch, Arch::Arm64);
        assert!(!args.debug);
        assert!(!args.no_dmg);
        assert_eq!(
            tauri_build_args(&args),
            vec!["tauri", "build", "--target", "aarch64-apple-darwin", "--bundles", "app"]
        );
    }

    #[test]
    fn test_debug_universal_build() {
        let args = parse(&["xtask", "bundle", "--debug", "--arch", "universal", "--no-dmg"]);
        assert!(args.no_dmg);
        assert_eq!(
            tauri_build_args(&args),
            vec![
                "tauri",
                "build",
                "--target",
                "universal-apple-darwin",
                "--bundles",
                "app",
                "--debug"
            ]
        );
        assert!(bundle_dir(Path::new("/w"), &args)
            .ends_with("target/universal-apple-darwin/debug/bundle/macos"));
    }

    #[test]
    fn test_x86_64_arch_name() {
        let args = parse(&["xtask", "bundle", "--arch", "x86_64"]);
        assert_eq!(args.arch.triple(), "x86_64-apple-darwin");
        assert!(Cli::try_parse_from(["xtask", "bundle", "--arch", "ppc"]).is_err());
    }

    #[test]
    fn test_dmg_naming_and_hdiutil_args() {
        let config = TauriConfig {
            product_name: "MenuChat".to_string(),
            version: "0.1.0".to_string(),
        };
        assert_eq!(dmg_name(&config, Arch::X86_64), "MenuChat_0.1.0_x86_64.dmg");

        let args = hdiutil_args("MenuChat", Path::new("/b/MenuChat.app"), Path::new("/b/M.dmg"));
        assert_eq!(args[0], "create");
        assert!(args.windows(2).any(|w| w == ["-format", "UDZO"]));
        assert_eq!(args.last().map(String::as_str), Some("/b/M.dmg"));
    }

    #[test]
    fn test_reads_product_from_tauri_config() {
        let config = read_tauri_config(&workspace_root().join("src-tauri")).unwrap();
        assert_eq!(config.product_name, "MenuChat");
        assert!(!config.version.is_empty());
    }
}
