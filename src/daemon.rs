//! Daemon module - main event loop orchestration
//!
//! Selects the input device, starts the reader thread on it, and plays
//! a sound for every key press until the stream ends or the process is
//! asked to stop.

use crate::config::Config;
use crate::error::{InputError, KeyclackError, Result};
use crate::input::{self, select_device, DeviceSource, KeyEvent};
use crate::sound::{CommandPlayer, SoundDispatcher, SoundSet};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

/// Main daemon that ties device selection, reading and playback together
pub struct Daemon {
    source: Box<dyn DeviceSource>,
    dispatcher: SoundDispatcher,
}

impl Daemon {
    /// Create a daemon for the platform's input devices and the configured player
    pub fn new(config: &Config) -> Self {
        let player = CommandPlayer::new(&config.player);
        match player.locate() {
            Ok(path) => tracing::debug!("Audio player: {:?}", path),
            Err(e) => tracing::warn!("{}", e),
        }

        let sounds = SoundSet::from_dir(&config.sound_dir);
        tracing::info!(
            "Sounds: {} of 4 bound from {:?}",
            sounds.len(),
            config.sound_dir
        );

        Self::with_parts(
            input::create_source(),
            SoundDispatcher::new(sounds, Arc::new(player)),
        )
    }

    /// Create a daemon from explicit components
    pub fn with_parts(source: Box<dyn DeviceSource>, dispatcher: SoundDispatcher) -> Self {
        Self { source, dispatcher }
    }

    /// Run until the device stream ends or a termination signal arrives
    ///
    /// Returns `Ok` only on SIGTERM/SIGINT. Device selection failures and
    /// stream faults are returned as errors.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting keyclack daemon");

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tracing::info!("Scanning devices...");
        let devices = self.source.enumerate()?;
        tracing::info!("Found {} devices", devices.len());
        for device in &devices {
            tracing::info!("  Device: {} at {:?}", device.name, device.path);
        }

        let selection = select_device(&devices)?;
        tracing::info!(
            "Selected ({}): {}",
            selection.reason,
            selection.device.name
        );

        let stream = self.source.open(selection.device)?;
        tracing::info!("Listening on {:?}...", selection.device.path);

        let events = input::spawn_reader(stream)?;

        tokio::select! {
            fault = self.dispatch_all(events) => Err(KeyclackError::from(fault)),

            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down...");
                Ok(())
            }

            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, shutting down...");
                Ok(())
            }
        }
    }

    fn handle_press(&self, event: &KeyEvent) {
        if self.dispatcher.dispatch(&event.key).is_none() {
            tracing::trace!("No sound for {}", event.key);
        }
    }

    /// Play sounds for presses until the reader reports the fault that ended it
    async fn dispatch_all(
        &self,
        mut events: mpsc::Receiver<std::result::Result<KeyEvent, InputError>>,
    ) -> InputError {
        while let Some(item) = events.recv().await {
            match item {
                Ok(event) => self.handle_press(&event),
                Err(e) => return e,
            }
        }
        InputError::StreamFault("reader thread exited".to_string())
    }
}
