pub mod out_of_band;
pub mod poller;
pub mod redfish_api;
pub mod redfish_client;
