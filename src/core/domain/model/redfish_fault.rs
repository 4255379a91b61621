//! Redfish error payloads.
//!
//! A Redfish service reports failures with a body of the shape
//! `{"error": {"code": ..., "message": ..., "@Message.ExtendedInfo": [...]}}`.

use serde::Deserialize;

/// The top-level Redfish error body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RedfishFault {
    pub error: RedfishFaultDetail,
}

/// The `error` object of a Redfish error body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RedfishFaultDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "@Message.ExtendedInfo", default)]
    pub extended_info: Vec<ExtendedInfo>,
}

/// One entry of `@Message.ExtendedInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtendedInfo {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RedfishFault {
    /// Decodes a response body, returning `None` if it is not a Redfish fault
    /// or carries no message at all.
    pub fn decode(body: &str) -> Option<Self> {
        let fault: RedfishFault = serde_json::from_str(body).ok()?;
        let has_message = fault.error.message.is_some()
            || fault.error.extended_info.iter().any(|i| i.message.is_some());
        has_message.then_some(fault)
    }

    /// The fault message followed by every extended-info message.
    pub fn summary(&self) -> String {
        self.error
            .message
            .iter()
            .chain(self.error.extended_info.iter().filter_map(|i| i.message.as_ref()))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_message() {
        let fault = RedfishFault::decode(r#"{"error":{"code":"Base.1.0.GeneralError","message":"nope"}}"#)
            .unwrap();
        assert_eq!(fault.error.code.as_deref(), Some("Base.1.0.GeneralError"));
        assert_eq!(fault.summary(), "nope");
    }

    #[test]
    fn test_decode_rejects_other_bodies() {
        assert!(RedfishFault::decode("not json").is_none());
        assert!(RedfishFault::decode(r#"{"Id":"1"}"#).is_none());
        assert!(RedfishFault::decode(r#"{"error":{"code":"x"}}"#).is_none());
    }
}
