//! Sound categories and the sound-resource mapping
//!
//! Every key press falls into one of four fixed categories. Each category
//! is bound once at startup to a WAV file in the configured sound
//! directory; the binding is never changed afterwards.

pub mod dispatcher;
pub mod player;

pub use dispatcher::SoundDispatcher;
pub use player::{CommandPlayer, Player};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The fixed set of feedback sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundCategory {
    /// Any ordinary key
    Key,
    Space,
    Backspace,
    Enter,
}

impl SoundCategory {
    /// All categories, in the order they are reported
    pub const ALL: [SoundCategory; 4] = [
        SoundCategory::Key,
        SoundCategory::Space,
        SoundCategory::Backspace,
        SoundCategory::Enter,
    ];

    /// Map a kernel key name (e.g. `KEY_SPACE`) to its sound category
    ///
    /// Names that are not keyboard keys (`BTN_LEFT`, unknown codes) have no
    /// category.
    pub fn for_key(key: &str) -> Option<Self> {
        match key.strip_prefix("KEY_")? {
            "ENTER" => Some(SoundCategory::Enter),
            "SPACE" => Some(SoundCategory::Space),
            "BACKSPACE" => Some(SoundCategory::Backspace),
            _ => Some(SoundCategory::Key),
        }
    }

    /// Short name used in logs and on the command line
    pub fn name(self) -> &'static str {
        match self {
            SoundCategory::Key => "key",
            SoundCategory::Space => "space",
            SoundCategory::Backspace => "backspace",
            SoundCategory::Enter => "enter",
        }
    }

    /// File name of this category's sound inside the sound directory
    pub fn file_name(self) -> &'static str {
        match self {
            SoundCategory::Key => "key.wav",
            SoundCategory::Space => "space.wav",
            SoundCategory::Backspace => "backspace.wav",
            SoundCategory::Enter => "enter.wav",
        }
    }
}

impl fmt::Display for SoundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown sound category '{}'. Use one of: key, space, backspace, enter",
                    s
                )
            })
    }
}

/// Immutable binding of sound categories to playable files
#[derive(Debug, Clone, Default)]
pub struct SoundSet {
    files: HashMap<SoundCategory, PathBuf>,
}

impl SoundSet {
    /// Build a sound set from an explicit mapping
    pub fn new(files: HashMap<SoundCategory, PathBuf>) -> Self {
        Self { files }
    }

    /// Bind every category whose file exists in `dir`
    ///
    /// Missing files are logged and left unbound; the dispatcher skips them.
    pub fn from_dir(dir: &Path) -> Self {
        if !dir.is_dir() {
            tracing::warn!("Sound directory not found: {:?}", dir);
        }

        let mut files = HashMap::new();
        for category in SoundCategory::ALL {
            let path = dir.join(category.file_name());
            if path.is_file() {
                tracing::debug!("Bound {} -> {:?}", category, path);
                files.insert(category, path);
            } else {
                tracing::warn!("Missing sound for '{}': {:?}", category, path);
            }
        }

        Self { files }
    }

    /// Path bound to the category, if any
    pub fn get(&self, category: SoundCategory) -> Option<&Path> {
        self.files.get(&category).map(PathBuf::as_path)
    }

    /// Number of bound categories
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
