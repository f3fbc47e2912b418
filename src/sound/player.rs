//! External audio player invocation
//!
//! Playback is delegated to a command-line player (aplay by default).
//! Each request spawns one detached process: its output is discarded and
//! nobody waits for it to finish. Overlapping presses produce overlapping
//! players. There is no backpressure and no completion signal.

use crate::config::PlayerConfig;
use crate::error::SoundError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Something that can start playback of a sound file
pub trait Player: Send + Sync {
    /// Start playing `path` and return without waiting for it to finish
    fn play(&self, path: &Path) -> Result<(), SoundError>;
}

/// Plays sounds by spawning an external program
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            program: config.command.clone(),
            args: config.args.clone(),
        }
    }

    /// Resolve the player program on PATH
    pub fn locate(&self) -> Result<PathBuf, SoundError> {
        which::which(&self.program).map_err(|_| SoundError::PlayerNotFound(self.program.clone()))
    }
}

impl Player for CommandPlayer {
    fn play(&self, path: &Path) -> Result<(), SoundError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SoundError::PlayerNotFound(self.program.clone())
                } else {
                    SoundError::Spawn(e.to_string())
                }
            })?;

        // Dropping the handle detaches the child; tokio reaps it in the background.
        tracing::trace!("Spawned {} (pid {:?})", self.program, child.id());
        drop(child);

        Ok(())
    }
}
