pub mod client_config;
pub mod computer_system;
pub mod operation_context;
pub mod power_state;
pub mod redfish_fault;
pub mod virtual_media;
