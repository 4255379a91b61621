//! Classification of failed Management API calls into [`RedfishError`].

use super::{RedfishError, RedfishResult};
use crate::core::domain::model::redfish_fault::RedfishFault;
use reqwest::StatusCode;

/// A failed call against the Management API surface.
///
/// Carries whatever the transport observed: the HTTP status and body when a
/// response came back, and the raw error text in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    status: Option<u16>,
    body: Option<String>,
    message: String,
}

impl ApiFailure {
    /// A failure where no HTTP response was received (DNS, TLS, refused connection...).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// A failure where the BMC answered with `status` and `body`.
    pub fn response(status: u16, body: impl Into<String>, message: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            status: Some(status),
            body: (!body.is_empty()).then_some(body),
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a single Management API call.
pub type ApiResult<T> = Result<T, ApiFailure>;

/// Screens the outcome of a Management API call.
///
/// A successful call is returned as-is whatever its transport status was.
/// A failed call is classified by its HTTP status into a
/// [`RedfishError::RedfishClient`], enriched with the Redfish fault message
/// decoded from the body or, when the body cannot be decoded, the raw error text.
pub fn screen_redfish_error<T>(result: ApiResult<T>) -> RedfishResult<T> {
    result.map_err(classify)
}

fn classify(failure: ApiFailure) -> RedfishError {
    let Some(status) = failure.status else {
        return RedfishError::client(format!("HTTP request failed: {}", failure.message));
    };

    let class = match StatusCode::from_u16(status) {
        Ok(StatusCode::NOT_FOUND) => "Redfish: Not Found",
        Ok(StatusCode::BAD_REQUEST) => "Redfish: Invalid Request",
        Ok(StatusCode::UNAUTHORIZED) => "Redfish: Unauthorized",
        Ok(StatusCode::INTERNAL_SERVER_ERROR) => "Redfish: Internal server error",
        Ok(code) if code.is_success() => "Redfish: Malformed response",
        _ => "Redfish: Unknown error",
    };

    let detail = failure
        .body
        .as_deref()
        .and_then(RedfishFault::decode)
        .map(|fault| fault.summary())
        .unwrap_or(failure.message);

    RedfishError::RedfishClient {
        message: format!("{class} {detail}"),
        status: Some(status),
    }
}
