//! Sound dispatcher
//!
//! Turns a pressed key into a sound category and hands the category's file
//! to the player. Failures here are per-event: they are logged and never
//! stop the event loop.

use super::{Player, SoundCategory, SoundSet};
use crate::error::SoundError;
use std::sync::Arc;

/// Maps key identities to feedback sounds and triggers playback
pub struct SoundDispatcher {
    sounds: SoundSet,
    player: Arc<dyn Player>,
}

impl SoundDispatcher {
    pub fn new(sounds: SoundSet, player: Arc<dyn Player>) -> Self {
        Self { sounds, player }
    }

    /// Play the feedback sound for a pressed key
    ///
    /// Returns the category that was played, or `None` if the key has no
    /// category or playback was skipped.
    pub fn dispatch(&self, key: &str) -> Option<SoundCategory> {
        let category = SoundCategory::for_key(key)?;

        match self.play(category) {
            Ok(()) => Some(category),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    /// Trigger playback of a category's sound without waiting for it
    pub fn play(&self, category: SoundCategory) -> Result<(), SoundError> {
        let path = self
            .sounds
            .get(category)
            .ok_or(SoundError::UnknownSoundCategory(category))?;

        tracing::info!("Playing: {}", category);
        self.player.play(path)
    }

    pub fn sounds(&self) -> &SoundSet {
        &self.sounds
    }
}
