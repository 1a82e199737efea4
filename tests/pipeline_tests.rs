// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end pipeline scenarios over the simulated backend

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingLibrary, TestAuthority};
use raw_capture::backends::sim::SimulatedBackend;
use raw_capture::backends::CaptureBackend;
use raw_capture::backends::types::Codec;
use raw_capture::errors::{CaptureError, SettingsError};
use raw_capture::library::AssetLibrary;
use raw_capture::permissions::{Authorization, PermissionAuthority};
use raw_capture::surface::{self, AlertKind, SurfaceEvent, SurfaceReceiver};
use raw_capture::{CaptureSession, CaptureTier, Config, SetupResult};

fn start(
    backend: SimulatedBackend,
    authority: TestAuthority,
    library: RecordingLibrary,
) -> (
    CaptureSession,
    Arc<SimulatedBackend>,
    Arc<RecordingLibrary>,
    SurfaceReceiver,
) {
    let backend = Arc::new(backend);
    let library = Arc::new(library);
    let (surface_tx, surface_rx) = surface::channel();
    let session = CaptureSession::start(
        Arc::clone(&backend) as Arc<dyn CaptureBackend>,
        Arc::new(authority) as Arc<dyn PermissionAuthority>,
        Arc::clone(&library) as Arc<dyn AssetLibrary>,
        surface_tx,
        Config::default(),
    );
    (session, backend, library, surface_rx)
}

fn drain(rx: &mut SurfaceReceiver) -> Vec<SurfaceEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Collect surface events until the shutter re-enables (shot terminal state)
async fn wait_for_idle(rx: &mut SurfaceReceiver) -> Vec<SurfaceEvent> {
    let mut events = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("expected a surface event before the test timeout")
            .expect("surface channel closed");
        let done = matches!(event, SurfaceEvent::ShutterEnabled(true));
        events.push(event);
        if done {
            return events;
        }
    }
}

#[tokio::test]
async fn raw_capture_end_to_end_moves_the_temp_file_into_the_library() {
    // Tier set {Photo, Raw}: extended RAW unsupported on this device
    let backend = SimulatedBackend::new().with_extended_raw_supported(false);
    let (session, backend, library, mut rx) =
        start(backend, TestAuthority::granted(), RecordingLibrary::new());

    assert_eq!(session.bootstrap().await, SetupResult::Success);
    assert_eq!(
        session.available_tiers().await,
        vec![CaptureTier::Photo, CaptureTier::Raw]
    );

    session.press_shutter(CaptureTier::Raw).await.unwrap();
    wait_for_idle(&mut rx).await;

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].raw_format.is_some());
    assert_eq!(submissions[0].processed_codec, Some(Codec::Hevc));
    assert!(!submissions[0].high_resolution);

    let requests = library.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1, "exactly one transactional library call");
    assert!(!requests[0].compressed.is_empty());
    assert!(requests[0].move_file);
    let raw_file = requests[0].raw_file.clone().expect("raw file reference");
    assert!(raw_file.exists(), "temp file written before the handoff");
    let _ = std::fs::remove_file(raw_file);

    assert!(session.coordinator().is_shutter_enabled().await);
    assert!(!session.coordinator().has_pending_capture().await);
}

#[tokio::test]
async fn library_denial_at_finalize_makes_no_library_call() {
    let authority = TestAuthority::granted().library_state(Authorization::Denied, false);
    let (session, _backend, library, mut rx) =
        start(SimulatedBackend::new(), authority, RecordingLibrary::new());

    assert_eq!(session.bootstrap().await, SetupResult::Success);
    session.press_shutter(CaptureTier::Photo).await.unwrap();
    let events = wait_for_idle(&mut rx).await;

    assert_eq!(library.request_count(), 0);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SurfaceEvent::ShotFailed(_))),
        "denied persistence must be surfaced: {events:?}"
    );
    assert!(session.coordinator().is_shutter_enabled().await);
    assert!(!session.coordinator().has_pending_capture().await);
}

#[tokio::test]
async fn denied_camera_access_blocks_the_whole_bootstrap() {
    let authority = TestAuthority::granted().camera_state(Authorization::Denied, false);
    let (session, backend, _library, mut rx) =
        start(SimulatedBackend::new(), authority, RecordingLibrary::new());

    assert_eq!(session.bootstrap().await, SetupResult::NotAuthorized);
    assert!(!backend.is_running(), "session must not start without access");

    let events = drain(&mut rx);
    assert!(events.contains(&SurfaceEvent::Alert {
        kind: AlertKind::CameraNotAuthorized,
        offer_settings: true,
    }));

    // Dependent work stays locked: a shutter press cannot proceed.
    assert!(matches!(
        session.press_shutter(CaptureTier::Photo).await,
        Err(CaptureError::Configuration(_))
    ));
}

#[tokio::test]
async fn undetermined_camera_access_is_requested_exactly_once() {
    let authority = Arc::new(
        TestAuthority::granted().camera_state(Authorization::Undetermined, true),
    );
    let (surface_tx, _surface_rx) = surface::channel();
    let session = CaptureSession::start(
        Arc::new(SimulatedBackend::new()),
        Arc::clone(&authority) as Arc<dyn PermissionAuthority>,
        Arc::new(RecordingLibrary::new()),
        surface_tx,
        Config::default(),
    );

    assert_eq!(session.bootstrap().await, SetupResult::Success);
    assert_eq!(
        authority
            .camera_requests
            .load(std::sync::atomic::Ordering::SeqCst),
        1,
        "exactly one resume per undetermined state"
    );
}

#[tokio::test]
async fn missing_device_fails_configuration() {
    let (session, _backend, _library, mut rx) = start(
        SimulatedBackend::new().without_device(),
        TestAuthority::granted(),
        RecordingLibrary::new(),
    );

    assert_eq!(session.bootstrap().await, SetupResult::ConfigurationFailed);
    let events = drain(&mut rx);
    assert!(events.contains(&SurfaceEvent::SetupCompleted(
        SetupResult::ConfigurationFailed
    )));
}

#[tokio::test]
async fn rejected_input_capacity_fails_configuration() {
    let (session, _backend, _library, _rx) = start(
        SimulatedBackend::new().without_input_capacity(),
        TestAuthority::granted(),
        RecordingLibrary::new(),
    );

    assert_eq!(session.bootstrap().await, SetupResult::ConfigurationFailed);
}

#[tokio::test]
async fn capability_pruning_is_announced_to_the_surface() {
    let (session, _backend, _library, mut rx) = start(
        SimulatedBackend::new().with_raw_formats(vec![]),
        TestAuthority::granted(),
        RecordingLibrary::new(),
    );

    assert_eq!(session.bootstrap().await, SetupResult::Success);
    assert_eq!(session.available_tiers().await, vec![CaptureTier::Photo]);

    let events = drain(&mut rx);
    assert!(events.contains(&SurfaceEvent::TierRemoved(CaptureTier::Raw)));
    assert!(events.contains(&SurfaceEvent::TierRemoved(CaptureTier::ProRaw)));
    assert!(events.contains(&SurfaceEvent::PreviewAttached));
}

#[tokio::test]
async fn shutter_is_rejected_while_a_capture_is_outstanding() {
    let (session, backend, _library, _rx) = start(
        SimulatedBackend::new(),
        TestAuthority::granted(),
        RecordingLibrary::new(),
    );
    assert_eq!(session.bootstrap().await, SetupResult::Success);

    // First shot never completes: the backend delivers no signals for it.
    backend.queue_capture_script(vec![]);
    session.press_shutter(CaptureTier::Photo).await.unwrap();

    assert_eq!(
        session.press_shutter(CaptureTier::Photo).await,
        Err(CaptureError::CaptureInProgress)
    );
}

#[tokio::test]
async fn settings_failure_aborts_only_the_current_shot() {
    // RAW formats present but no HEVC codec: the Raw tier is advertised yet
    // settings construction must fail and re-enable the shutter.
    let backend = SimulatedBackend::new().with_codecs(vec![Codec::Jpeg]);
    let (session, _backend, library, mut rx) =
        start(backend, TestAuthority::granted(), RecordingLibrary::new());

    assert_eq!(session.bootstrap().await, SetupResult::Success);
    assert_eq!(
        session.press_shutter(CaptureTier::Raw).await,
        Err(CaptureError::Settings(SettingsError::NoCodec))
    );

    assert!(session.coordinator().is_shutter_enabled().await);
    assert!(!session.coordinator().has_pending_capture().await);
    assert_eq!(library.request_count(), 0);

    let events = drain(&mut rx);
    assert!(events.contains(&SurfaceEvent::ShutterEnabled(true)));

    // The user may retry with a different tier.
    session.press_shutter(CaptureTier::Photo).await.unwrap();
    wait_for_idle(&mut rx).await;
    assert_eq!(library.request_count(), 1);
}
