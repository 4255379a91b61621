//! Domain models for the `/Managers/{id}/VirtualMedia` resources.

use super::computer_system::OdataRef;
use serde::{Deserialize, Serialize};

/// Media types this client can boot an installer image from.
pub const COMPATIBLE_MEDIA_TYPES: [&str; 2] = ["CD", "DVD"];

/// A virtual media device exposed by a manager.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualMedia {
    /// Resource identifier (e.g., "Cd", "1").
    #[serde(default)]
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Whether an image is currently inserted. Absent means not inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted: Option<bool>,
    /// Supported media types (e.g., "CD", "DVD", "USBStick").
    #[serde(default)]
    pub media_types: Vec<String>,
    /// URI of the inserted image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl VirtualMedia {
    pub fn is_inserted(&self) -> bool {
        self.inserted.unwrap_or(false)
    }

    /// The first media type of this device that can hold a boot image.
    pub fn compatible_media_type(&self) -> Option<&str> {
        self.media_types
            .iter()
            .map(String::as_str)
            .find(|t| COMPATIBLE_MEDIA_TYPES.contains(t))
    }
}

/// The `VirtualMediaCollection` of a manager.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualMediaCollection {
    #[serde(default)]
    pub members: Vec<OdataRef>,
}

/// Body of the `VirtualMedia.InsertMedia` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InsertMediaRequest {
    pub image: String,
    pub inserted: bool,
}

impl InsertMediaRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            inserted: true,
        }
    }
}
