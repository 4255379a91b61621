use crate::core::domain::error::{RedfishError, RedfishResult};
use url::Url;

/// A validated Redfish management URL pointing at a single system.
///
/// The URL has the shape `scheme://host[:port]/<base-path>/<systemID>`: the
/// system identifier is its last path segment, and the API base path is
/// everything up to the `/Systems` collection (or, if the URL does not go
/// through `/Systems`, everything before the identifier).
///
/// # Examples
///
/// ```
/// use redfish_oob::RedfishUrl;
///
/// let url = RedfishUrl::parse("https://10.0.0.1/redfish/v1/Systems/1234").unwrap();
/// assert_eq!(url.system_id(), "1234");
/// assert_eq!(url.base_path(), "https://10.0.0.1/redfish/v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedfishUrl {
    url: String,
    base_path: String,
    system_id: String,
}

impl RedfishUrl {
    /// Parses and validates a management URL.
    ///
    /// # Errors
    /// * `MissingConfiguration` if the URL is empty or carries no system ID
    /// * `RedfishClient` if the URL cannot be parsed
    pub fn parse(url: &str) -> RedfishResult<Self> {
        validate_url(url)?;
        let parsed = Url::parse(url)
            .map_err(|e| RedfishError::client(format!("invalid URL format: {e}")))?;

        let system_id = resource_id_from_path(parsed.path());
        if system_id.is_empty() {
            return Err(RedfishError::missing("management URL system ID"));
        }

        Ok(Self {
            url: url.to_string(),
            base_path: base_path(&parsed, system_id),
            system_id: system_id.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }
}

/// Validates that a management URL was supplied at all.
pub(crate) fn validate_url(url: &str) -> RedfishResult<()> {
    if url.trim().is_empty() {
        return Err(RedfishError::missing("Redfish URL"));
    }
    Ok(())
}

/// Returns the identifier of a Redfish resource: the last segment of its
/// `@odata.id` path (trailing slashes ignored).
///
/// Accepts both absolute URLs and bare paths such as `/redfish/v1/Managers/1`.
pub fn resource_id_from_url(reference: &str) -> String {
    match Url::parse(reference) {
        Ok(parsed) => resource_id_from_path(parsed.path()).to_string(),
        Err(_) => {
            let path = reference.split(['?', '#']).next().unwrap_or_default();
            resource_id_from_path(path).to_string()
        }
    }
}

fn resource_id_from_path(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

fn base_path(parsed: &Url, system_id: &str) -> String {
    let mut base = format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or_default());
    if let Some(port) = parsed.port() {
        base.push_str(&format!(":{port}"));
    }

    let path = parsed.path().trim_end_matches('/');
    let prefix = match path.find("/Systems") {
        Some(end) => &path[..end],
        None => path
            .strip_suffix(system_id)
            .unwrap_or_default()
            .trim_end_matches('/'),
    };
    base.push_str(prefix);
    base
}
