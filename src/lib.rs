//! Keyclack: audible key-press feedback for Linux
//!
//! This library provides the core functionality for:
//! - Picking one input device among those under /dev/input (evdev)
//! - Reading its key events on a dedicated thread
//! - Mapping each key press to a sound category
//! - Playing the category's sound through a detached external player
//!
//! # Architecture
//!
//! ```text
//!          ┌──────────────┐
//!          │   Device     │  name contains "keyboard"
//!          │  Selector    │  → has KEY_A + KEY_SPACE
//!          └──────────────┘  → first device
//!                 │
//!                 ▼ device
//!          ┌──────────────┐
//!          │ Reader thread│  blocks on the device,
//!          │   (evdev)    │  forwards presses only
//!          └──────────────┘
//!                 │
//!                 ▼ key press (mpsc)
//!          ┌──────────────┐
//!          │    Sound     │  ENTER / SPACE / BACKSPACE / other KEY_*
//!          │  Dispatcher  │
//!          └──────────────┘
//!                 │
//!                 ▼ file path (fire and forget)
//!          ┌──────────────┐
//!          │ aplay -q ... │
//!          └──────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod daemon;
pub mod error;
pub mod input;
pub mod logging;
pub mod sound;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use daemon::Daemon;
pub use error::{KeyclackError, Result};
