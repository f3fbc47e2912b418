//! Input device discovery and key event reading
//!
//! On Linux, devices are read through evdev at the kernel level, which
//! works under any display server (or none). The user must be in the
//! 'input' group to open /dev/input/event* devices.
//!
//! The rest of the crate only sees the [`DeviceSource`] and [`EventStream`]
//! seams, so selection and the event loop run the same against real
//! devices and scripted ones.

#[cfg(target_os = "linux")]
pub mod evdev_source;
pub mod reader;
pub mod select;

pub use reader::{spawn_reader, EventReader};
pub use select::{select_device, Selection, SelectionReason};

use crate::error::InputError;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// One enumerable input source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Device node, e.g. /dev/input/event3
    pub path: PathBuf,
    /// Name reported by the driver
    pub name: String,
    /// Kernel names of the keys the device can emit (`KEY_A`, `BTN_LEFT`, ...)
    pub keys: HashSet<String>,
}

impl DeviceDescriptor {
    pub fn new<I, S>(path: impl Into<PathBuf>, name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn supports(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// State carried by a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released,
    Pressed,
    /// Auto-repeat while held
    Repeated,
}

impl KeyState {
    /// Decode the value field of a kernel key event
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeated),
            _ => None,
        }
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyState::Released => "released",
            KeyState::Pressed => "pressed",
            KeyState::Repeated => "repeated",
        })
    }
}

/// A decoded key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Kernel key name, e.g. `KEY_SPACE`
    pub key: String,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, state: KeyState) -> Self {
        Self {
            key: key.into(),
            state,
        }
    }
}

/// Raw event as delivered by the device, before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// EV_KEY event with the key's kernel name and the raw value
    Key { key: String, value: i32 },
    /// Any other event type (sync, relative motion, misc, ...)
    Other { event_type: u16 },
}

/// Blocking stream of raw events from one device
pub trait EventStream: Send {
    /// Block until the next raw event arrives
    ///
    /// An error means the stream is finished for good.
    fn next_event(&mut self) -> Result<RawEvent, InputError>;
}

/// Source of input devices
pub trait DeviceSource {
    /// List the devices available right now, in enumeration order
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, InputError>;

    /// Open the event stream of a previously enumerated device
    fn open(&self, device: &DeviceDescriptor) -> Result<Box<dyn EventStream>, InputError>;
}

/// Create the platform's device source
#[cfg(target_os = "linux")]
pub fn create_source() -> Box<dyn DeviceSource> {
    Box::new(evdev_source::EvdevSource::new())
}

/// Create the platform's device source
///
/// Only Linux evdev devices are supported.
#[cfg(not(target_os = "linux"))]
pub fn create_source() -> Box<dyn DeviceSource> {
    struct Unsupported;

    impl DeviceSource for Unsupported {
        fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, InputError> {
            Err(InputError::Evdev(
                "input devices are only supported on Linux".to_string(),
            ))
        }

        fn open(&self, device: &DeviceDescriptor) -> Result<Box<dyn EventStream>, InputError> {
            Err(InputError::DeviceAccess(device.path.display().to_string()))
        }
    }

    Box::new(Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state_from_value() {
        assert_eq!(KeyState::from_value(0), Some(KeyState::Released));
        assert_eq!(KeyState::from_value(1), Some(KeyState::Pressed));
        assert_eq!(KeyState::from_value(2), Some(KeyState::Repeated));
        assert_eq!(KeyState::from_value(3), None);
        assert_eq!(KeyState::from_value(-1), None);
    }

    #[test]
    fn test_descriptor_supports() {
        let device = DeviceDescriptor::new("/dev/input/event0", "kbd", ["KEY_A", "KEY_SPACE"]);
        assert!(device.supports("KEY_A"));
        assert!(!device.supports("KEY_ENTER"));
    }
}
