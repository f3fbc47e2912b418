//! Error types for keyclack
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues.

use crate::sound::SoundCategory;
use thiserror::Error;

/// Top-level error type for the keyclack application
#[derive(Error, Debug)]
pub enum KeyclackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Sound error: {0}")]
    Sound(#[from] SoundError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to input devices and their event streams
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Cannot open input device '{0}'. Is the user in the 'input' group?\n  Run: sudo usermod -aG input $USER\n  Then log out and back in.")]
    DeviceAccess(String),

    #[error("No input devices found in /dev/input/")]
    NoDeviceFound,

    #[error("Input event stream ended: {0}")]
    StreamFault(String),

    #[error("evdev error: {0}")]
    Evdev(String),
}

/// Errors related to sound playback
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("No sound file bound for category '{0}'")]
    UnknownSoundCategory(SoundCategory),

    #[error("Audio player '{0}' not found in PATH. Install alsa-utils or set [player] command.")]
    PlayerNotFound(String),

    #[error("Failed to start audio player: {0}")]
    Spawn(String),
}

/// Result type alias using KeyclackError
pub type Result<T> = std::result::Result<T, KeyclackError>;
