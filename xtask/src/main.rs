//! Development tasks for keyclack
//!
//! Usage:
//!   cargo xtask install     Install release binary to /usr/local/bin (requires sudo)
//!   cargo xtask uninstall   Remove binary from /usr/local/bin (requires sudo)
//!   cargo xtask service     Write a systemd user unit that restarts keyclack on failure
//!   cargo xtask dist        Build release binary for distribution

use std::env;
use std::path::PathBuf;
use std::process::{Command, ExitCode};

const INSTALL_PATH: &str = "/usr/local/bin/keyclack";
const SERVICE_NAME: &str = "keyclack.service";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_help();
        return ExitCode::SUCCESS;
    }

    let result = match args[0].as_str() {
        "install" => install(),
        "uninstall" => uninstall(),
        "service" => service(),
        "dist" => dist(),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_help();
            Err(anyhow::anyhow!("Unknown command"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    eprintln!(
        r#"
keyclack development tasks

Usage: cargo xtask <COMMAND>

Commands:
  install    Build release binary and install to /usr/local/bin (requires sudo)
  uninstall  Remove keyclack from /usr/local/bin (requires sudo)
  service    Write ~/.config/systemd/user/keyclack.service
  dist       Build optimized release binary for distribution

Examples:
  cargo xtask install && cargo xtask service
  systemctl --user enable --now keyclack
"#
    );
}

/// Get the project root directory
fn project_root() -> PathBuf {
    let dir = env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    // xtask is in a subdirectory, go up one level
    dir.parent().unwrap_or(&dir).to_path_buf()
}

fn build_release() -> anyhow::Result<PathBuf> {
    let root = project_root();

    let status = Command::new("cargo")
        .args(["build", "--release"])
        .current_dir(&root)
        .status()?;

    if !status.success() {
        anyhow::bail!("Build failed");
    }

    let binary = root.join("target/release/keyclack");
    if !binary.exists() {
        anyhow::bail!("Binary not found at {:?}", binary);
    }

    Ok(binary)
}

/// Build release binary and install to /usr/local/bin
fn install() -> anyhow::Result<()> {
    println!("==> Building release binary...");
    let binary = build_release()?;

    println!("==> Installing to {}...", INSTALL_PATH);

    let status = Command::new("sudo")
        .arg("install")
        .arg("-Dm755")
        .arg(&binary)
        .arg(INSTALL_PATH)
        .status()?;

    if !status.success() {
        anyhow::bail!("Install failed (sudo required)");
    }

    println!("==> Installed successfully!");
    println!();

    let _ = Command::new(INSTALL_PATH).arg("--version").status();

    Ok(())
}

/// Remove keyclack from /usr/local/bin
fn uninstall() -> anyhow::Result<()> {
    println!("==> Removing {}...", INSTALL_PATH);

    let status = Command::new("sudo")
        .args(["rm", "-f", INSTALL_PATH])
        .status()?;

    if !status.success() {
        anyhow::bail!("Uninstall failed (sudo required)");
    }

    println!("==> Uninstalled successfully!");
    Ok(())
}

/// Write a systemd user unit; keyclack exits on device loss and relies on this to come back
fn service() -> anyhow::Result<()> {
    let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME is not set"))?;
    let dir = PathBuf::from(home).join(".config/systemd/user");
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(SERVICE_NAME);
    let unit = format!(
        r#"[Unit]
Description=Keyclack key-press sound feedback
After=sound.target

[Service]
Type=simple
ExecStart={INSTALL_PATH} daemon
Restart=on-failure
RestartSec=2
Environment=XDG_RUNTIME_DIR=%t

[Install]
WantedBy=default.target
"#
    );

    std::fs::write(&path, unit)?;
    println!("==> Wrote {:?}", path);
    println!("    Enable with: systemctl --user daemon-reload && systemctl --user enable --now keyclack");

    Ok(())
}

/// Build optimized release binary for distribution
fn dist() -> anyhow::Result<()> {
    println!("==> Building distribution binary...");
    let binary = build_release()?;
    println!("==> Built: {:?}", binary);

    let _ = Command::new("ls").arg("-lh").arg(&binary).status();
    let _ = Command::new(&binary).arg("--version").status();

    Ok(())
}
