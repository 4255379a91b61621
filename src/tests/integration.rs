use crate::{PowerState, RedfishResult, new_client};
use dotenvy::dotenv;
use std::env;

fn setup() -> (String, String, String) {
    dotenv().ok();
    let url = env::var("REDFISH_URL").expect("REDFISH_URL not set");
    let username = env::var("REDFISH_USERNAME").expect("REDFISH_USERNAME not set");
    let password = env::var("REDFISH_PASSWORD").expect("REDFISH_PASSWORD not set");
    (url, username, password)
}

#[tokio::test]
#[ignore = "requires a reachable BMC and environment variables"]
async fn test_integration_power_status() -> RedfishResult<()> {
    let (url, username, password) = setup();

    // lab BMCs use self-signed certificates
    let (ctx, client) = new_client(&url, true, false, &username, &password)?;
    let status = client.system_power_status(&ctx).await?;

    assert_ne!(status, PowerState::Unknown);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a reachable BMC and environment variables"]
async fn test_integration_invalid_credentials() -> RedfishResult<()> {
    let (url, _, _) = setup();

    let (ctx, client) = new_client(&url, true, false, "invalid_user", "invalid_pass")?;
    let result = client.system_power_status(&ctx).await;

    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
#[ignore = "reboots the node behind REDFISH_URL"]
async fn test_integration_provision_cycle() -> RedfishResult<()> {
    let (url, username, password) = setup();
    let image = env::var("REDFISH_IMAGE").expect("REDFISH_IMAGE not set");

    let (ctx, client) = new_client(&url, true, false, &username, &password)?;
    client.set_virtual_media(&ctx, &image).await?;
    client.set_boot_source_by_type(&ctx).await?;
    client.reboot_system(&ctx).await?;
    assert_eq!(client.system_power_status(&ctx).await?, PowerState::On);

    client.eject_virtual_media(&ctx).await?;
    Ok(())
}
