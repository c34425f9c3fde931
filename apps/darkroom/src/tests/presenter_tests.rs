use super::*;

use std::sync::Arc;

use darkroom_core::{StageController, Timing, UnavailableImageProvider};
use shared::{
    domain::{BathType, ExposureLevel, ImageRef},
    error::{ErrorCode, IntentRejection},
    protocol::DryingSnapshot,
};

#[test]
fn exposure_ticks_print_once_per_second() {
    assert_eq!(
        describe_event(&DarkroomEvent::ExposureTick { elapsed_secs: 0.3 }),
        None
    );
    assert_eq!(
        describe_event(&DarkroomEvent::ExposureTick { elapsed_secs: 4.0 }).as_deref(),
        Some("exposure: 4s")
    );
    assert_eq!(
        describe_event(&DarkroomEvent::ExposureCommitted {
            elapsed_secs: 25.0,
            level: ExposureLevel::Correct
        })
        .as_deref(),
        Some("exposure: committed 25.0s (Correct)")
    );
}

#[test]
fn bath_and_dryer_progress_are_thinned() {
    let tick = |elapsed_secs| DarkroomEvent::BathTick {
        bath: BathType::Stop,
        elapsed_secs,
    };
    assert_eq!(describe_event(&tick(7.0)), None);
    assert_eq!(
        describe_event(&tick(20.0)).as_deref(),
        Some("tray: Stop Bath 20s")
    );

    let drying = |progress_percent| {
        DarkroomEvent::DryingProgress(DryingSnapshot {
            covered: true,
            progress_percent,
        })
    };
    assert_eq!(describe_event(&drying(12.5)), None);
    assert_eq!(
        describe_event(&drying(50.0)).as_deref(),
        Some("dryer: 50% (covered)")
    );
}

#[test]
fn rejections_and_images_are_always_shown() {
    let rejected = DarkroomEvent::IntentRejected(IntentRejection::new(
        ErrorCode::DoubleImmersion,
        "place_in_bath",
        "paper is already in the Developer tray",
    ));
    assert_eq!(
        describe_event(&rejected).as_deref(),
        Some("rejected place_in_bath: paper is already in the Developer tray")
    );

    let inline = format!("data:image/png;base64,{}", "A".repeat(200));
    let line = describe_event(&DarkroomEvent::ImageResolved {
        image_ref: ImageRef::new(inline),
        fallback: false,
    })
    .expect("line");
    assert!(line.ends_with("..."));
    assert!(line.len() < 100);
}

#[tokio::test]
async fn fresh_session_renders_capture_status() {
    let controller = StageController::new(
        Timing::default(),
        Arc::new(UnavailableImageProvider),
        ImageRef::new("https://fallback.example.test/scene.jpg"),
    );
    let text = render_snapshot(&controller.snapshot().await);

    assert!(text.starts_with("stage: capture\n"));
    assert!(text.contains("view: negative | room light: off"));
    assert!(text.contains("exposure: shutter closed"));
    assert!(text.contains("print: grayscale(100%)"));
    assert!(!text.contains("ideal:"));
    assert!(!text.contains("ready:"));
}
