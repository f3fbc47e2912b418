//! Configuration loading and types for keyclack
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/keyclack/config.toml)
//! 3. Environment variables (KEYCLACK_*)
//! 4. CLI arguments (highest priority)
//!
//! Everything is resolved once at startup. Nothing is reloaded while the
//! daemon runs.

use crate::error::KeyclackError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Keyclack Configuration
#
# Location: ~/.config/keyclack/config.toml
# All settings can be overridden via CLI flags

# Directory containing the four feedback sounds:
#   key.wav, space.wav, backspace.wav, enter.wav
# Default: ~/.local/share/keyclack/sounds
# sound_dir = "/usr/share/keyclack/sounds"

# Debug log file. Use "auto" for $XDG_RUNTIME_DIR/keyclack/keyclack.log,
# a custom path, or "disabled" to log to the console only.
# The file is truncated every time the daemon starts.
log_file = "auto"

[player]
# Program used to play a sound. It is run once per key press with the
# sound file appended as the last argument; its output is discarded.
command = "aplay"
args = ["-q"]
"#;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding key.wav, space.wav, backspace.wav and enter.wav
    #[serde(default = "default_sound_dir")]
    pub sound_dir: PathBuf,

    /// External player settings
    #[serde(default)]
    pub player: PlayerConfig,

    /// Log file: "auto", "disabled", or a path
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,
}

/// External audio player configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Program name or path
    #[serde(default = "default_player_command")]
    pub command: String,

    /// Arguments placed before the sound file path
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

fn default_sound_dir() -> PathBuf {
    Config::data_dir().join("sounds")
}

fn default_log_file() -> Option<String> {
    Some("auto".to_string())
}

fn default_player_command() -> String {
    "aplay".to_string()
}

fn default_player_args() -> Vec<String> {
    vec!["-q".to_string()]
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: default_player_args(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound_dir: default_sound_dir(),
            player: PlayerConfig::default(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "keyclack")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the runtime directory for ephemeral files (logs)
    pub fn runtime_dir() -> PathBuf {
        // Use XDG_RUNTIME_DIR if available, otherwise fall back to /tmp
        std::env::var("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
            .join("keyclack")
    }

    /// Get the data directory path (for sounds)
    pub fn data_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "keyclack")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve the log file path from config
    /// Returns None if logging to a file is disabled
    pub fn resolve_log_file(&self) -> Option<PathBuf> {
        self.log_file.as_ref().and_then(|path| {
            match path.to_lowercase().as_str() {
                "disabled" | "none" | "off" | "false" => None,
                "auto" => Some(Self::runtime_dir().join("keyclack.log")),
                _ => Some(PathBuf::from(path)),
            }
        })
    }
}

/// Load configuration from file, with defaults for missing values
pub fn load_config(path: Option<&Path>) -> Result<Config, KeyclackError> {
    let mut config = Config::default();

    let config_path = path.map(PathBuf::from).or_else(Config::default_path);

    if let Some(ref path) = config_path {
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| KeyclackError::Config(format!("Failed to read config: {}", e)))?;

            config = toml::from_str(&contents)
                .map_err(|e| KeyclackError::Config(format!("Invalid config: {}", e)))?;
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
        }
    }

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    Ok(config)
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = var("KEYCLACK_SOUND_DIR") {
        config.sound_dir = PathBuf::from(dir);
    }
    if let Some(file) = var("KEYCLACK_LOG_FILE") {
        config.log_file = Some(file);
    }
    if let Some(player) = var("KEYCLACK_PLAYER") {
        config.player.command = player;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.sound_dir.ends_with("sounds"));
        assert_eq!(config.player.command, "aplay");
        assert_eq!(config.player.args, vec!["-q"]);
        assert_eq!(config.log_file.as_deref(), Some("auto"));
    }

    #[test]
    fn test_default_config_text_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.log_file.as_deref(), Some("auto"));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
            sound_dir = "/opt/sounds"
            log_file = "disabled"

            [player]
            command = "paplay"
            args = []
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sound_dir, PathBuf::from("/opt/sounds"));
        assert_eq!(config.player.command, "paplay");
        assert!(config.player.args.is_empty());
        assert_eq!(config.resolve_log_file(), None);
    }

    #[test]
    fn test_partial_player_section_keeps_defaults() {
        let config: Config = toml::from_str("[player]\ncommand = \"pw-play\"\n").unwrap();
        assert_eq!(config.player.command, "pw-play");
        assert_eq!(config.player.args, vec!["-q"]);
    }

    #[test]
    fn test_resolve_log_file() {
        let mut config = Config::default();
        assert!(config
            .resolve_log_file()
            .unwrap()
            .ends_with("keyclack/keyclack.log"));

        config.log_file = Some("/var/tmp/clack.log".to_string());
        assert_eq!(
            config.resolve_log_file(),
            Some(PathBuf::from("/var/tmp/clack.log"))
        );

        config.log_file = Some("OFF".to_string());
        assert_eq!(config.resolve_log_file(), None);

        config.log_file = None;
        assert_eq!(config.resolve_log_file(), None);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "sound_dir = \"/srv/clicks\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.player.command, "aplay");
        if std::env::var("KEYCLACK_SOUND_DIR").is_err() {
            assert_eq!(config.sound_dir, PathBuf::from("/srv/clicks"));
        }
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "sound_dir = [").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(KeyclackError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("KEYCLACK_SOUND_DIR", "/env/sounds"),
            ("KEYCLACK_LOG_FILE", "disabled"),
            ("KEYCLACK_PLAYER", "paplay"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.sound_dir, PathBuf::from("/env/sounds"));
        assert_eq!(config.resolve_log_file(), None);
        assert_eq!(config.player.command, "paplay");
        assert_eq!(config.player.args, vec!["-q"]);
    }
}
