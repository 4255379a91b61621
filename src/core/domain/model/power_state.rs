//! Power state and reset models for `ComputerSystem` resources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Power state of a managed host as reported by its BMC.
///
/// Anything the controller reports that is not one of the known Redfish
/// values maps to [`PowerState::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    On,
    Off,
    PoweringOn,
    PoweringOff,
    Unknown,
}

impl PowerState {
    /// Maps a Redfish `PowerState` value onto the enumeration.
    pub fn from_redfish(value: &str) -> Self {
        match value {
            "On" => PowerState::On,
            "Off" => PowerState::Off,
            "PoweringOn" => PowerState::PoweringOn,
            "PoweringOff" => PowerState::PoweringOff,
            _ => PowerState::Unknown,
        }
    }
}

impl From<Option<&str>> for PowerState {
    fn from(value: Option<&str>) -> Self {
        value.map_or(PowerState::Unknown, PowerState::from_redfish)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PowerState::On => "On",
            PowerState::Off => "Off",
            PowerState::PoweringOn => "Powering On",
            PowerState::PoweringOff => "Powering Off",
            PowerState::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Redfish reset types issued by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetType {
    On,
    ForceOff,
}

/// Body of the `ComputerSystem.Reset` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResetRequest {
    pub reset_type: ResetType,
}

impl ResetRequest {
    pub fn new(reset_type: ResetType) -> Self {
        Self { reset_type }
    }
}
