use thiserror::Error;

mod screen;

pub use screen::{ApiFailure, ApiResult, screen_redfish_error};

/// The main error type for Redfish out-of-band operations.
///
/// This enum represents all possible errors that can occur while driving
/// a BMC, including missing configuration, protocol failures, convergence
/// polls that never converged and cancelled operations.
#[derive(Error, Debug)]
pub enum RedfishError {
    /// A required piece of configuration was not supplied
    ///
    /// # Fields
    /// * `what` - The name of the missing value (e.g. "Redfish URL")
    #[error("missing configuration: {what}")]
    MissingConfiguration { what: String },

    /// Represents protocol or transport failures reported by the BMC
    ///
    /// # Fields
    /// * `message` - The classified failure, including the decoded Redfish fault when present
    /// * `status` - The HTTP status code, if a response was received
    #[error("redfish client error: {message}")]
    RedfishClient {
        message: String,
        status: Option<u16>,
    },

    /// A convergence poll did not observe the expected state within its budget
    ///
    /// # Fields
    /// * `what` - The operation that was being waited on
    /// * `retries` - The number of attempts that were made
    #[error("operation '{what}' did not complete after {retries} retries")]
    OperationRetriesExceeded { what: String, retries: u32 },

    /// The operation context was cancelled before the operation completed
    #[error("operation '{what}' was cancelled")]
    Cancelled { what: String },

    /// Represents errors that occur while building the HTTP transport
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents validation failures with detailed context
    #[error("Validation error: {source}")]
    Validation { source: ValidationError },
}

impl RedfishError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        RedfishError::MissingConfiguration { what: what.into() }
    }

    pub(crate) fn client(message: impl Into<String>) -> Self {
        RedfishError::RedfishClient {
            message: message.into(),
            status: None,
        }
    }
}

impl From<ValidationError> for RedfishError {
    fn from(error: ValidationError) -> Self {
        RedfishError::Validation { source: error }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),
}

/// Type alias for Results that may fail with a RedfishError
pub type RedfishResult<T> = Result<T, RedfishError>;
