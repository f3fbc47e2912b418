// Command-line interface definitions for keyclack
//
// This module is separate so it can be used by both the binary (main.rs)
// and build.rs for generating man pages.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "keyclack")]
#[command(author, version, about = "Audible key-press feedback for Linux")]
#[command(long_about = "
Keyclack plays a short sound every time you press a key.
It reads key events straight from the kernel (evdev), so it works under
Wayland, X11 and on the bare console.

SETUP:
  1. Add yourself to the input group: sudo usermod -aG input $USER
  2. Log out and back in
  3. Put key.wav, space.wav, backspace.wav and enter.wav in the sound
     directory (see: keyclack config)
  4. Run: keyclack (to start the daemon)

Keyclack listens on one device: the first whose name contains
\"keyboard\", else the first that has both A and Space keys, else the
first device found. Run `keyclack devices` to see which one it picks.
")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Override the sound directory
    #[arg(long, value_name = "DIR")]
    pub sound_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as daemon (default if no command specified)
    Daemon,

    /// List input devices and show which one would be used
    Devices,

    /// Show current configuration and sound files
    Config,

    /// Play one feedback sound (key, space, backspace, enter)
    Play {
        /// Sound category
        #[arg(value_name = "CATEGORY")]
        category: String,
    },
}
