mod basic_auth;
mod redfish_url;

pub use basic_auth::BasicAuth;
pub use redfish_url::{RedfishUrl, resource_id_from_url};
