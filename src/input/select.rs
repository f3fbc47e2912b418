//! Device selection
//!
//! Picks the one device to listen on, first match wins:
//! 1. a device whose name contains "keyboard" (any case)
//! 2. a device that can emit both KEY_A and KEY_SPACE
//! 3. the first enumerated device
//!
//! The last rule is a weak default: with several non-keyboard devices
//! attached it may pick a mouse or a power button.

use super::DeviceDescriptor;
use crate::error::InputError;
use std::fmt;

/// Why a device was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// Name contains "keyboard"
    Name,
    /// Supports KEY_A and KEY_SPACE
    Capabilities,
    /// Nothing matched; first device in enumeration order
    Fallback,
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionReason::Name => "name",
            SelectionReason::Capabilities => "has keys",
            SelectionReason::Fallback => "fallback",
        })
    }
}

/// The chosen device and the rule that chose it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub device: &'a DeviceDescriptor,
    pub reason: SelectionReason,
}

/// Select exactly one device, or fail with `NoDeviceFound`
pub fn select_device(devices: &[DeviceDescriptor]) -> Result<Selection<'_>, InputError> {
    let by_name = devices
        .iter()
        .find(|d| d.name.to_lowercase().contains("keyboard"))
        .map(|device| Selection {
            device,
            reason: SelectionReason::Name,
        });

    let by_keys = || {
        devices
            .iter()
            .find(|d| d.supports("KEY_A") && d.supports("KEY_SPACE"))
            .map(|device| Selection {
                device,
                reason: SelectionReason::Capabilities,
            })
    };

    let fallback = || {
        devices.first().map(|device| Selection {
            device,
            reason: SelectionReason::Fallback,
        })
    };

    by_name
        .or_else(by_keys)
        .or_else(fallback)
        .ok_or(InputError::NoDeviceFound)
}
