//! Domain models for the `/Systems/{id}` resource.
//!
//! Only the subset of the Redfish `ComputerSystem` schema needed for power
//! and boot source control is modelled.

use super::power_state::PowerState;
use serde::{Deserialize, Serialize};

/// A Redfish `ComputerSystem` as returned by `GET /Systems/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerSystem {
    /// Resource identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Raw power state string (e.g., "On", "PoweringOff").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<String>,
    /// Boot override settings.
    #[serde(default)]
    pub boot: Boot,
    /// Links to related resources.
    #[serde(default)]
    pub links: SystemLinks,
}

impl ComputerSystem {
    /// Power state mapped onto [`PowerState`].
    pub fn power(&self) -> PowerState {
        PowerState::from(self.power_state.as_deref())
    }

    /// The `@odata.id` of the first manager responsible for this system.
    pub fn manager_link(&self) -> Option<&str> {
        self.links.managed_by.first().map(|r| r.odata_id.as_str())
    }
}

/// The `Boot` object of a `ComputerSystem`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Boot {
    /// Current boot source override target (e.g., "Cd", "Pxe").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_source_override_target: Option<String>,
    /// Targets the BMC accepts for `BootSourceOverrideTarget`.
    #[serde(
        rename = "BootSourceOverrideTarget@Redfish.AllowableValues",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub allowable_override_targets: Vec<String>,
}

/// The `Links` object of a `ComputerSystem`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemLinks {
    #[serde(default)]
    pub managed_by: Vec<OdataRef>,
}

/// A reference to another Redfish resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OdataRef {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

/// Body of a `PATCH /Systems/{id}` that changes the boot source override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemPatch {
    pub boot: BootPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BootPatch {
    pub boot_source_override_target: String,
}

impl SystemPatch {
    pub fn boot_source_override(target: impl Into<String>) -> Self {
        Self {
            boot: BootPatch {
                boot_source_override_target: target.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_system() {
        let system: ComputerSystem = serde_json::from_value(serde_json::json!({
            "@odata.id": "/redfish/v1/Systems/1234",
            "Id": "1234",
            "PowerState": "PoweringOn",
            "Boot": {
                "BootSourceOverrideTarget": "None",
                "BootSourceOverrideTarget@Redfish.AllowableValues": ["None", "Pxe", "Cd", "Hdd"]
            },
            "Links": {
                "ManagedBy": [{ "@odata.id": "/redfish/v1/Managers/bmc" }]
            }
        }))
        .unwrap();

        assert_eq!(system.id.as_deref(), Some("1234"));
        assert_eq!(system.power(), PowerState::PoweringOn);
        assert_eq!(system.boot.allowable_override_targets.len(), 4);
        assert_eq!(system.manager_link(), Some("/redfish/v1/Managers/bmc"));
    }

    #[test]
    fn test_sparse_system() {
        let system: ComputerSystem = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(system.power(), PowerState::Unknown);
        assert!(system.manager_link().is_none());
    }

    #[test]
    fn test_patch_wire_format() {
        let body = serde_json::to_value(SystemPatch::boot_source_override("Cd")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "Boot": { "BootSourceOverrideTarget": "Cd" } })
        );
    }
}
