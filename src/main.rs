// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use raw_capture::backends::sim::SimulatedBackend;
use raw_capture::constants::APP_ID;
use raw_capture::library::FileAssetLibrary;
use raw_capture::permissions::{Authorization, PermissionAuthority};
use raw_capture::surface::{self, AlertKind, SurfaceEvent};
use raw_capture::{CaptureSession, Config, SetupResult};

/// Demo authority: everything already granted, nothing to ask the user
struct GrantedAuthority;

#[async_trait]
impl PermissionAuthority for GrantedAuthority {
    fn camera_authorization(&self) -> Authorization {
        Authorization::Granted
    }

    async fn request_camera_access(&self) -> bool {
        true
    }

    fn library_authorization(&self) -> Authorization {
        Authorization::Granted
    }

    async fn request_library_access(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=raw_capture=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let config = Config::load();
    let library_dir = config.library_dir.clone().unwrap_or_else(|| {
        dirs::picture_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_ID)
    });
    info!(dir = %library_dir.display(), "Assets will be written here");

    let backend = Arc::new(SimulatedBackend::new());
    let (surface_tx, mut surface_rx) = surface::channel();
    let session = CaptureSession::start(
        backend,
        Arc::new(GrantedAuthority),
        Arc::new(FileAssetLibrary::new(library_dir)),
        surface_tx,
        config,
    );

    match session.bootstrap().await {
        SetupResult::Success => {}
        SetupResult::NotAuthorized => {
            warn!("No permission to use the camera, nothing to do");
            return Ok(());
        }
        SetupResult::ConfigurationFailed => {
            return Err("session configuration failed".into());
        }
    }

    let tiers = session.available_tiers().await;
    info!(?tiers, "Capturing one shot per available tier");

    for tier in tiers {
        session.press_shutter(tier).await?;
        // Drain surface events until this shot reaches a terminal state
        while let Some(event) = surface_rx.recv().await {
            let done = matches!(event, SurfaceEvent::ShutterEnabled(true));
            present(event);
            if done {
                break;
            }
        }
    }

    Ok(())
}

/// Stand-in for the display/alert surface: renders events into the log
fn present(event: SurfaceEvent) {
    match event {
        SurfaceEvent::SetupCompleted(result) => info!(?result, "Setup completed"),
        SurfaceEvent::Alert {
            kind,
            offer_settings,
        } => {
            let message = match kind {
                AlertKind::CameraNotAuthorized => "no permission to use the camera",
                AlertKind::LibraryNotAuthorized => "no permission to use the photo library",
            };
            warn!(offer_settings, "ALERT: {message}");
        }
        SurfaceEvent::ShutterEnabled(enabled) => info!(enabled, "Shutter"),
        SurfaceEvent::TierRemoved(tier) => info!(%tier, "Tier removed from selector"),
        SurfaceEvent::PreviewAttached => info!("Live preview attached"),
        SurfaceEvent::ShotFailed(reason) => warn!(reason, "Shot failed"),
        SurfaceEvent::ShotSaved(path) => match path {
            Some(path) => info!(path = %path.display(), "Shot saved"),
            None => info!("Shot saved"),
        },
    }
}
