// SPDX-License-Identifier: GPL-3.0-only

//! Serial capture session actor
//!
//! One spawned task owns all device/session mutation. Commands execute
//! strictly one at a time in submission order; the camera-permission await
//! inside the bootstrap command suspends the whole task until the user
//! answers, exactly once per undetermined state. Capture completion events
//! do not pass through this task — the backend delivers them to the
//! coordinator on their own pump.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::backends::CaptureBackend;
use crate::backends::types::{AutoMode, CaptureEventSender, DeviceHandle};
use crate::config::Config;
use crate::errors::{CaptureError, DeviceError};
use crate::library::AssetLibrary;
use crate::permissions::{PermissionAuthority, PermissionGate};
use crate::pipeline::capabilities::{self, CaptureTier, DeviceCapabilities};
use crate::pipeline::coordinator::CaptureCoordinator;
use crate::pipeline::settings;
use crate::surface::{AlertKind, SurfaceEvent, SurfaceSender};

/// Outcome of one bootstrap attempt.
///
/// Terminal for the session lifetime except by a fresh bootstrap attempt.
/// The presentation layer picks one of three mutually exclusive branches
/// from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupResult {
    Success,
    /// No permission to use the camera (or the photo library)
    NotAuthorized,
    /// Device or session wiring failed
    ConfigurationFailed,
}

enum SessionCommand {
    Bootstrap {
        reply: oneshot::Sender<SetupResult>,
    },
    Shutter {
        tier: CaptureTier,
        reply: oneshot::Sender<Result<(), CaptureError>>,
    },
    AvailableTiers {
        reply: oneshot::Sender<Vec<CaptureTier>>,
    },
}

/// Handle to the serial session task.
///
/// Cheap to clone; all methods enqueue onto the serial context and await the
/// reply.
#[derive(Clone)]
pub struct CaptureSession {
    commands: mpsc::Sender<SessionCommand>,
    coordinator: Arc<CaptureCoordinator>,
}

impl CaptureSession {
    /// Spawn the serial session task and the capture-event pump.
    pub fn start(
        backend: Arc<dyn CaptureBackend>,
        authority: Arc<dyn PermissionAuthority>,
        library: Arc<dyn AssetLibrary>,
        surface: SurfaceSender,
        config: Config,
    ) -> Self {
        let coordinator = Arc::new(CaptureCoordinator::new(
            Arc::clone(&authority),
            library,
            surface.clone(),
            config.completion_timeout(),
        ));

        // Device callbacks are not session work: capture events bypass the
        // serial queue and feed the coordinator directly.
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let pump = Arc::clone(&coordinator);
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                pump.handle_event(event).await;
            }
        });

        let (commands, command_rx) = mpsc::channel(16);
        let task = SessionTask {
            backend,
            authority,
            surface,
            coordinator: Arc::clone(&coordinator),
            config,
            event_tx,
            setup: SetupResult::Success,
            device: None,
            capabilities: None,
        };
        tokio::spawn(task.run(command_rx));

        Self {
            commands,
            coordinator,
        }
    }

    /// Run the one-time permission/session bootstrap.
    pub async fn bootstrap(&self) -> SetupResult {
        let (reply, rx) = oneshot::channel();
        if self
            .commands
            .send(SessionCommand::Bootstrap { reply })
            .await
            .is_err()
        {
            return SetupResult::ConfigurationFailed;
        }
        rx.await.unwrap_or(SetupResult::ConfigurationFailed)
    }

    /// Request one capture at the given tier.
    pub async fn press_shutter(&self, tier: CaptureTier) -> Result<(), CaptureError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::Shutter { tier, reply })
            .await
            .map_err(|_| CaptureError::Configuration("session task stopped".into()))?;
        rx.await
            .map_err(|_| CaptureError::Configuration("session task stopped".into()))?
    }

    /// The negotiated tier set; empty before a successful bootstrap.
    pub async fn available_tiers(&self) -> Vec<CaptureTier> {
        let (reply, rx) = oneshot::channel();
        if self
            .commands
            .send(SessionCommand::AvailableTiers { reply })
            .await
            .is_err()
        {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    /// The completion coordinator (shutter state, pending capture)
    pub fn coordinator(&self) -> &Arc<CaptureCoordinator> {
        &self.coordinator
    }
}

/// State owned by the serial session task
struct SessionTask {
    backend: Arc<dyn CaptureBackend>,
    authority: Arc<dyn PermissionAuthority>,
    surface: SurfaceSender,
    coordinator: Arc<CaptureCoordinator>,
    config: Config,
    event_tx: CaptureEventSender,
    setup: SetupResult,
    device: Option<DeviceHandle>,
    /// Negotiated once per successful bootstrap, then read-only
    capabilities: Option<DeviceCapabilities>,
}

impl SessionTask {
    async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        while let Some(command) = commands.recv().await {
            match command {
                SessionCommand::Bootstrap { reply } => {
                    let result = self.handle_bootstrap().await;
                    let _ = reply.send(result);
                }
                SessionCommand::Shutter { tier, reply } => {
                    let result = self.handle_shutter(tier).await;
                    let _ = reply.send(result);
                }
                SessionCommand::AvailableTiers { reply } => {
                    let tiers = self
                        .capabilities
                        .as_ref()
                        .map(DeviceCapabilities::available_tiers)
                        .unwrap_or_default();
                    let _ = reply.send(tiers);
                }
            }
        }
    }

    async fn handle_bootstrap(&mut self) -> SetupResult {
        let outcome = PermissionGate::check_and_request(&self.authority).await;

        let result = if !outcome.camera_granted {
            SetupResult::NotAuthorized
        } else {
            match self.configure_session() {
                Ok(device) => {
                    self.device = Some(device);
                    SetupResult::Success
                }
                Err(err) => {
                    error!(error = %err, "Session configuration failed");
                    SetupResult::ConfigurationFailed
                }
            }
        };

        if result == SetupResult::Success {
            let capabilities = capabilities::negotiate(self.backend.as_ref());
            let available = capabilities.available_tiers();
            for tier in CaptureTier::ALL {
                if !available.contains(&tier) {
                    let _ = self.surface.send(SurfaceEvent::TierRemoved(tier));
                }
            }
            self.capabilities = Some(capabilities);
            self.backend.start_running();
            info!("Capture session running");
        }

        self.setup = result;
        let _ = self.surface.send(SurfaceEvent::SetupCompleted(result));
        match result {
            SetupResult::Success => {}
            SetupResult::NotAuthorized => {
                let _ = self.surface.send(SurfaceEvent::Alert {
                    kind: AlertKind::CameraNotAuthorized,
                    offer_settings: true,
                });
            }
            SetupResult::ConfigurationFailed => {
                let _ = self.surface.send(SurfaceEvent::Alert {
                    kind: AlertKind::LibraryNotAuthorized,
                    offer_settings: false,
                });
            }
        }
        result
    }

    /// One-time hardware/session wiring: device selection, capacity-checked
    /// input/output attachment, preset, continuous auto modes.
    fn configure_session(&mut self) -> Result<DeviceHandle, DeviceError> {
        let backend = self.backend.as_ref();

        let device = backend
            .select_device(self.config.device_position, self.config.device_kind)
            .ok_or_else(|| {
                DeviceError::ConfigurationFailed("no matching capture device".into())
            })?;
        info!(device = %device.name, "Selected capture device");

        backend.begin_configuration();
        let wired = Self::wire_outputs(backend, &device, self.config.session_preset);
        backend.commit_configuration();
        let preview_attached = wired?;

        if preview_attached {
            let _ = self.surface.send(SurfaceEvent::PreviewAttached);
        }

        // Best-effort continuous auto modes; a refusal is logged, not fatal.
        for mode in [AutoMode::Focus, AutoMode::Exposure, AutoMode::WhiteBalance] {
            if backend.auto_mode_supported(&device, mode) {
                if let Err(err) = backend.set_auto_mode(&device, mode) {
                    error!(mode = %mode, error = %err, "Could not enable auto mode");
                }
            }
        }

        Ok(device)
    }

    /// Attach input and outputs inside the configuration transaction.
    ///
    /// Returns whether the optional preview output was attached. Runs to a
    /// result so the caller always commits the transaction.
    fn wire_outputs(
        backend: &dyn CaptureBackend,
        device: &DeviceHandle,
        preset: crate::backends::types::SessionPreset,
    ) -> Result<bool, DeviceError> {
        if !backend.can_add_input(device) {
            return Err(DeviceError::AttachRejected("device input".into()));
        }
        backend.add_input(device)?;

        if !backend.can_add_photo_output() {
            return Err(DeviceError::AttachRejected("photo output".into()));
        }
        backend.add_photo_output()?;

        // Preview is optional; capture works without it.
        let preview_attached = if backend.can_add_preview_output() {
            backend.add_preview_output().is_ok()
        } else {
            false
        };

        backend.set_preset(preset);
        Ok(preview_attached)
    }

    async fn handle_shutter(&mut self, tier: CaptureTier) -> Result<(), CaptureError> {
        if self.setup != SetupResult::Success {
            return Err(CaptureError::Configuration(
                "session is not configured".into(),
            ));
        }
        let Some(capabilities) = self.capabilities.as_ref() else {
            return Err(CaptureError::Configuration(
                "capabilities not negotiated".into(),
            ));
        };

        // Claim the shutter before building settings so a second press
        // cannot race past while this request is prepared.
        self.coordinator.begin_capture().await?;

        let settings = match settings::build(tier, capabilities) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(tier = %tier, error = %err, "Settings construction failed");
                self.coordinator.abort(err.into()).await;
                return Err(err.into());
            }
        };

        info!(tier = %tier, raw = settings.raw_format.is_some(), "Submitting capture");
        if let Err(err) = self
            .backend
            .submit_capture(&settings, self.event_tx.clone())
        {
            self.coordinator.abort(err.clone().into()).await;
            return Err(err.into());
        }
        Ok(())
    }
}
