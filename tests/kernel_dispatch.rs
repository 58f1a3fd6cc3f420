mod common;

use serde_json::json;

use vivarium_core::CoreError;
use vivarium_lib::kernel::{Kernel, KernelError};

#[test]
fn test_feed_dispatch_caps_delivery() {
    let settings = common::scratch_settings("feed-dispatch");
    let mut kernel = Kernel::bootstrap(&settings).unwrap();

    let response = kernel
        .post("tablet.feed", json!({ "number": "121" }))
        .unwrap();
    let payload = response.payload;
    assert_eq!(payload["descriptor"], "palindrome");
    assert_eq!(payload["channel"], "mirror");
    assert_eq!(payload["number"], "121");
    // requested 1.44 from three palindromic digits, delivered capped at 1.0
    assert!((payload["requested"].as_f64().unwrap() - 1.44).abs() < 1e-9);
    assert!((payload["delivered"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((kernel.agent().hunger() - 29.0).abs() < 1e-9);

    let second = kernel.post("tablet.feed", json!({ "number": "7" }));
    assert!(matches!(
        second,
        Err(KernelError::Core(CoreError::BurstCapExceeded))
    ));

    common::cleanup("feed-dispatch");
}

#[test]
fn test_teach_and_concept_dispatch() {
    let settings = common::scratch_settings("teach-dispatch");
    let mut kernel = Kernel::bootstrap(&settings).unwrap();

    let response = kernel
        .post("tablet.teach", json!({ "token": "zen" }))
        .unwrap();
    assert_eq!(response.payload["channel"], "shard");
    assert_eq!(response.payload["token"], "zen");

    let response = kernel
        .post(
            "net.add",
            json!({ "text": "a river remembered in fog", "tags": ["dream"] }),
        )
        .unwrap();
    assert_eq!(response.payload["channel"], "flux");
    assert_eq!(response.payload["tags"], json!(["dream"]));
    assert_eq!(kernel.agent().knowledge().len(), 2);

    common::cleanup("teach-dispatch");
}

#[test]
fn test_bad_addresses_are_device_errors() {
    let settings = common::scratch_settings("bad-address");
    let mut kernel = Kernel::bootstrap(&settings).unwrap();

    for address in ["tablet", "ghost.feed", "tablet.sing", "net.feed"] {
        let result = kernel.post(address, json!({}));
        assert!(
            matches!(result, Err(KernelError::Device(_))),
            "expected device error for {address}"
        );
    }
    assert!(matches!(
        kernel.post("tablet.feed", json!({})),
        Err(KernelError::Device(_))
    ));
    assert!(matches!(
        kernel.post("net.add", json!({ "text": "   " })),
        Err(KernelError::Device(_))
    ));

    common::cleanup("bad-address");
}

#[test]
fn test_stream_records_successful_posts_only() {
    let settings = common::scratch_settings("stream-log");
    let mut kernel = Kernel::bootstrap(&settings).unwrap();

    kernel
        .post("tablet.teach", json!({ "token": "ivy" }))
        .unwrap();
    let _ = kernel.post("ghost.feed", json!({}));
    kernel
        .post("net.add", json!({ "text": "moss on stone" }))
        .unwrap();

    let tail = kernel.stream_tail(10).unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].address, "tablet.teach");
    assert_eq!(tail[1].address, "net.add");
    assert_eq!(tail[1].response["channel"], "mirror");

    common::cleanup("stream-log");
}

#[test]
fn test_tick_and_observe() {
    let settings = common::scratch_settings("tick-observe");
    let mut kernel = Kernel::bootstrap(&settings).unwrap();

    let summary = kernel.tick(1).unwrap();
    assert_eq!(summary.age_hours, 1);
    assert!((summary.hunger - 36.1).abs() < 1e-9);

    let observation = kernel.observe();
    assert!(observation.skin.contains("Aura:"));
    assert!(observation.skin.contains('◈'));
    assert_eq!(observation.summary.age_hours, 1);

    assert!(matches!(
        kernel.tick(-1),
        Err(KernelError::Core(CoreError::InvalidArgument(_)))
    ));

    common::cleanup("tick-observe");
}

#[test]
fn test_state_survives_kernel_restart() {
    let settings = common::scratch_settings("restart");
    {
        let mut kernel = Kernel::bootstrap(&settings).unwrap();
        kernel.tick(2).unwrap();
        kernel
            .post("tablet.feed", json!({ "number": "44" }))
            .unwrap();
    }
    let kernel = Kernel::bootstrap(&settings).unwrap();
    let agent = kernel.agent();
    assert_eq!(agent.clock().total_hours(), 2);
    assert_eq!(agent.knowledge().len(), 1);
    assert!(agent.feed_window().contains_key(&2));

    common::cleanup("restart");
}
