//! evdev-based device source
//!
//! Enumerates /dev/input/event* nodes and reads kernel input events.
//! The user must be in the 'input' group to access these devices.

use super::{DeviceDescriptor, DeviceSource, EventStream, RawEvent};
use crate::error::InputError;
use evdev::{Device, InputEventKind};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

const INPUT_DIR: &str = "/dev/input";

/// Device source backed by the Linux input subsystem
#[derive(Debug)]
pub struct EvdevSource {
    input_dir: PathBuf,
}

impl Default for EvdevSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EvdevSource {
    pub fn new() -> Self {
        Self {
            input_dir: PathBuf::from(INPUT_DIR),
        }
    }
}

impl DeviceSource for EvdevSource {
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, InputError> {
        let mut devices = Vec::new();
        let mut denied = Vec::new();

        for path in event_device_paths(&self.input_dir)? {
            match Device::open(&path) {
                Ok(device) => devices.push(describe(path, &device)),
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        denied.push(path.display().to_string());
                    }
                    tracing::trace!("Skipping {:?}: {}", path, e);
                }
            }
        }

        // Every node refused us: report that rather than an empty system
        if devices.is_empty() && !denied.is_empty() {
            return Err(InputError::DeviceAccess(denied.join(", ")));
        }

        Ok(devices)
    }

    fn open(&self, device: &DeviceDescriptor) -> Result<Box<dyn EventStream>, InputError> {
        let opened = Device::open(&device.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                InputError::DeviceAccess(device.path.display().to_string())
            } else {
                InputError::Evdev(format!("{}: {}", device.path.display(), e))
            }
        })?;

        tracing::debug!("Opened device: {:?}", device.path);

        Ok(Box::new(EvdevStream {
            device: opened,
            pending: VecDeque::new(),
        }))
    }
}

/// Blocking event stream over one evdev device
struct EvdevStream {
    device: Device,
    pending: VecDeque<RawEvent>,
}

impl EventStream for EvdevStream {
    fn next_event(&mut self) -> Result<RawEvent, InputError> {
        while self.pending.is_empty() {
            // Blocks until the kernel delivers the next batch
            let events = self
                .device
                .fetch_events()
                .map_err(|e| InputError::StreamFault(e.to_string()))?;

            self.pending.extend(events.map(|event| match event.kind() {
                InputEventKind::Key(key) => RawEvent::Key {
                    key: format!("{:?}", key),
                    value: event.value(),
                },
                _ => RawEvent::Other {
                    event_type: event.event_type().0,
                },
            }));
        }

        self.pending
            .pop_front()
            .ok_or_else(|| InputError::StreamFault("empty event batch".to_string()))
    }
}

fn describe(path: PathBuf, device: &Device) -> DeviceDescriptor {
    let keys = device
        .supported_keys()
        .map(|keys| keys.iter().map(|key| format!("{:?}", key)).collect())
        .unwrap_or_default();

    DeviceDescriptor {
        path,
        name: device.name().unwrap_or("unknown").to_string(),
        keys,
    }
}

/// List event* nodes, ordered by their event number
fn event_device_paths(input_dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let entries = std::fs::read_dir(input_dir).map_err(|e| {
        InputError::DeviceAccess(format!("{}: {}", input_dir.display(), e))
    })?;

    let mut numbered = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| InputError::DeviceAccess(e.to_string()))?;
        let path = entry.path();

        if let Some(index) = event_index(&path) {
            numbered.push((index, path));
        }
    }

    numbered.sort();
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// `/dev/input/event12` -> 12
fn event_index(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("event")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_index() {
        assert_eq!(event_index(Path::new("/dev/input/event0")), Some(0));
        assert_eq!(event_index(Path::new("/dev/input/event12")), Some(12));
        assert_eq!(event_index(Path::new("/dev/input/mice")), None);
        assert_eq!(event_index(Path::new("/dev/input/by-id")), None);
    }

    #[test]
    fn test_event_paths_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["event10", "event2", "mouse0", "event1"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let paths = event_device_paths(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["event1", "event2", "event10"]);
    }

    #[test]
    fn test_missing_input_dir() {
        let result = event_device_paths(Path::new("/nonexistent/keyclack/input"));
        assert!(matches!(result, Err(InputError::DeviceAccess(_))));
    }
}
