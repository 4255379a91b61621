use super::fake_bmc::{FakeBmc, POLL_INTERVAL, client_for};
use crate::{OperationContext, OutOfBandClient, PowerState, RedfishError};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_eject_with_nothing_inserted_is_noop() {
    let client = client_for(FakeBmc::new());

    client
        .eject_virtual_media(&OperationContext::new())
        .await
        .unwrap();

    assert!(client.api().commands().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_eject_waits_until_media_reports_ejected() {
    let bmc = FakeBmc::new()
        .with_inserted("Cd", "http://images/old.iso")
        .with_inserted("Floppy1", "http://images/drivers.img")
        .with_eject_delay(3);
    let client = client_for(bmc);

    client
        .eject_virtual_media(&OperationContext::new())
        .await
        .unwrap();

    assert_eq!(client.api().commands(), vec!["eject:Cd", "eject:Floppy1"]);
    assert!(client.api().inserted_media().is_empty());
    assert!(!client.api().media("Cd").is_inserted());
    assert!(!client.api().media("Floppy1").is_inserted());
}

#[tokio::test(start_paused = true)]
async fn test_eject_retries_exceeded() {
    let bmc = FakeBmc::new()
        .with_inserted("Cd", "http://images/old.iso")
        .with_stuck_eject();
    let client = client_for(bmc);
    let ctx = OperationContext::new().with_retry_budget(5);

    let result = client.eject_virtual_media(&ctx).await;

    assert!(matches!(
        result,
        Err(RedfishError::OperationRetriesExceeded { ref what, retries: 5 }) if what == "eject media Cd"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_reboot_observes_off_before_power_on() {
    let bmc = FakeBmc::new().with_power_delay(3);
    let client = client_for(bmc);

    client.reboot_system(&OperationContext::new()).await.unwrap();

    let log = client.api().log();
    let off_command = log.iter().position(|e| e == "reset:ForceOff").unwrap();
    let off_observed = log.iter().position(|e| e == "state:Off").unwrap();
    let on_command = log.iter().position(|e| e == "reset:On").unwrap();
    assert!(off_command < off_observed);
    assert!(off_observed < on_command);
    assert_eq!(log.last().map(String::as_str), Some("state:On"));
    assert_eq!(client.api().commands(), vec!["reset:ForceOff", "reset:On"]);
}

#[tokio::test(start_paused = true)]
async fn test_reboot_from_stale_on_state_still_powers_off() {
    // The node already reports On; a reboot must still go through Off.
    let bmc = FakeBmc::new().with_power("On").with_power_delay(1);
    let client = client_for(bmc);

    client.reboot_system(&OperationContext::new()).await.unwrap();

    assert_eq!(client.api().commands(), vec!["reset:ForceOff", "reset:On"]);
}

#[tokio::test(start_paused = true)]
async fn test_reboot_off_phase_exhaustion_never_powers_on() {
    let bmc = FakeBmc::new().with_stuck_power();
    let client = client_for(bmc);
    let ctx = OperationContext::new().with_retry_budget(3);
    let start = Instant::now();

    let result = client.reboot_system(&ctx).await;

    assert!(matches!(
        result,
        Err(RedfishError::OperationRetriesExceeded { ref what, retries: 3 }) if what == "power off system 1"
    ));
    assert_eq!(client.api().commands(), vec!["reset:ForceOff"]);
    assert!(start.elapsed() >= POLL_INTERVAL * 2 && start.elapsed() < POLL_INTERVAL * 3);
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_of_one_fails_after_single_poll() {
    let bmc = FakeBmc::new().with_power_delay(5);
    let client = client_for(bmc);
    let ctx = OperationContext::new().with_retry_budget(1);

    let result = client.reboot_system(&ctx).await;

    assert!(matches!(
        result,
        Err(RedfishError::OperationRetriesExceeded { retries: 1, .. })
    ));
    let polls = client
        .api()
        .log()
        .iter()
        .filter(|e| e.starts_with("state:"))
        .count();
    assert_eq!(polls, 1);
}

#[tokio::test(start_paused = true)]
async fn test_reboot_cancellation_aborts_promptly() {
    let bmc = FakeBmc::new().with_stuck_power();
    let client = client_for(bmc);
    let token = CancellationToken::new();
    let ctx = OperationContext::new().with_cancellation(token.clone());
    let start = Instant::now();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(45)).await;
        token.cancel();
    });

    let result = client.reboot_system(&ctx).await;

    assert!(matches!(
        result,
        Err(RedfishError::Cancelled { ref what }) if what == "power off system 1"
    ));
    assert!(start.elapsed() < POLL_INTERVAL * 2);
    assert_eq!(client.api().commands(), vec!["reset:ForceOff"]);
}

#[tokio::test(start_paused = true)]
async fn test_set_virtual_media_twice_leaves_single_image() {
    let bmc = FakeBmc::new().with_eject_delay(1);
    let client = client_for(bmc);
    let ctx = OperationContext::new();

    client
        .set_virtual_media(&ctx, "http://images/first.iso")
        .await
        .unwrap();
    client
        .set_virtual_media(&ctx, "http://images/second.iso")
        .await
        .unwrap();

    let inserted = client.api().inserted_media();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].id, "Cd");
    assert_eq!(inserted[0].image.as_deref(), Some("http://images/second.iso"));
    assert_eq!(
        client.api().commands(),
        vec![
            "insert:Cd:http://images/first.iso",
            "eject:Cd",
            "insert:Cd:http://images/second.iso",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_set_virtual_media_ejects_other_devices_first() {
    let bmc = FakeBmc::new().with_inserted("Floppy1", "http://images/drivers.img");
    let client = client_for(bmc);

    client
        .set_virtual_media(&OperationContext::new(), "http://images/installer.iso")
        .await
        .unwrap();

    assert_eq!(
        client.api().commands(),
        vec!["eject:Floppy1", "insert:Cd:http://images/installer.iso"]
    );
    assert!(!client.api().media("Floppy1").is_inserted());
}

#[tokio::test(start_paused = true)]
async fn test_set_virtual_media_fails_when_eject_fails() {
    let bmc = FakeBmc::new()
        .with_inserted("Cd", "http://images/old.iso")
        .with_stuck_eject();
    let client = client_for(bmc);
    let ctx = OperationContext::new().with_retry_budget(2);

    let result = client
        .set_virtual_media(&ctx, "http://images/new.iso")
        .await;

    assert!(matches!(
        result,
        Err(RedfishError::OperationRetriesExceeded { .. })
    ));
    assert!(
        !client
            .api()
            .commands()
            .iter()
            .any(|c| c.starts_with("insert:"))
    );
}

#[tokio::test]
async fn test_set_boot_source_matches_case_insensitively() {
    let bmc = FakeBmc::new().with_allowable_targets(&["None", "Pxe", "Hdd", "Cd", "BiosSetup"]);
    let client = client_for(bmc);

    client
        .set_boot_source_by_type(&OperationContext::new())
        .await
        .unwrap();

    assert_eq!(client.api().boot_target().as_deref(), Some("Cd"));
}

#[tokio::test]
async fn test_set_boot_source_without_matching_value() {
    let bmc = FakeBmc::new().with_allowable_targets(&["None", "Pxe", "Hdd"]);
    let client = client_for(bmc);

    let result = client
        .set_boot_source_by_type(&OperationContext::new())
        .await;

    assert!(matches!(result, Err(RedfishError::RedfishClient { .. })));
    assert!(client.api().boot_target().is_none());
}

#[tokio::test]
async fn test_power_commands_are_single_shot() {
    let bmc = FakeBmc::new().with_power_delay(2);
    let client = client_for(bmc);
    let ctx = OperationContext::new();

    client.system_power_off(&ctx).await.unwrap();
    assert_eq!(
        client.system_power_status(&ctx).await.unwrap(),
        PowerState::PoweringOff
    );
    assert_eq!(
        client.system_power_status(&ctx).await.unwrap(),
        PowerState::Off
    );

    client.system_power_on(&ctx).await.unwrap();
    assert_eq!(client.api().commands(), vec!["reset:ForceOff", "reset:On"]);
}

#[tokio::test]
async fn test_power_status_unknown_state() {
    let client = client_for(FakeBmc::new().with_power("Paused"));

    let status = client
        .system_power_status(&OperationContext::new())
        .await
        .unwrap();

    assert_eq!(status, PowerState::Unknown);
    assert_eq!(status.to_string(), "Unknown");
}

#[tokio::test(start_paused = true)]
async fn test_provisioning_through_trait_object() {
    let client: Box<dyn OutOfBandClient> = Box::new(client_for(
        FakeBmc::new()
            .with_inserted("Cd", "http://images/old.iso")
            .with_power_delay(2),
    ));
    let ctx = OperationContext::new();

    assert_eq!(client.node_id(), "1");
    client
        .set_virtual_media(&ctx, "http://images/installer.iso")
        .await
        .unwrap();
    client.set_boot_source_by_type(&ctx).await.unwrap();
    client.reboot_system(&ctx).await.unwrap();
    assert_eq!(client.system_power_status(&ctx).await.unwrap(), PowerState::On);
}

#[tokio::test]
async fn test_cancelled_context_sends_no_power_command() {
    let client = client_for(FakeBmc::new());
    let ctx = OperationContext::new();
    ctx.cancellation().cancel();

    let result = client.reboot_system(&ctx).await;
    assert!(matches!(
        result,
        Err(RedfishError::Cancelled { ref what }) if what == "power off system 1"
    ));

    let result = client.system_power_on(&ctx).await;
    assert!(matches!(
        result,
        Err(RedfishError::Cancelled { ref what }) if what == "power on system 1"
    ));
    assert!(client.api().commands().is_empty());
}

#[tokio::test]
async fn test_cancelled_context_sends_no_media_command() {
    let client = client_for(FakeBmc::new().with_inserted("Cd", "http://images/old.iso"));
    let ctx = OperationContext::new();
    ctx.cancellation().cancel();

    let result = client
        .set_virtual_media(&ctx, "http://images/new.iso")
        .await;

    assert!(matches!(
        result,
        Err(RedfishError::Cancelled { ref what }) if what == "eject media Cd"
    ));
    assert!(client.api().commands().is_empty());
    assert!(client.api().media("Cd").is_inserted());
}

#[tokio::test]
async fn test_cancelled_context_leaves_boot_source_untouched() {
    let client = client_for(FakeBmc::new());
    let ctx = OperationContext::new();
    ctx.cancellation().cancel();

    let result = client.set_boot_source_by_type(&ctx).await;

    assert!(matches!(result, Err(RedfishError::Cancelled { .. })));
    assert!(client.api().boot_target().is_none());
}
