use redfish_oob::{RedfishResult, new_client};

#[tokio::main]
async fn main() -> RedfishResult<()> {
    let (ctx, client) = new_client(
        "https://192.168.1.120/redfish/v1/Systems/System.Embedded.1",
        true,
        false,
        "root",
        "calvin",
    )?;

    println!("Power state: {}", client.system_power_status(&ctx).await?);

    client
        .set_virtual_media(&ctx, "http://192.168.1.10/images/installer.iso")
        .await?;
    client.set_boot_source_by_type(&ctx).await?;
    println!("Installer image inserted, rebooting {}", client.node_id());

    client
        .reboot_system(&ctx.clone().with_retry_budget(20))
        .await?;
    println!("Power state: {}", client.system_power_status(&ctx).await?);

    Ok(())
}
