// SPDX-License-Identifier: GPL-3.0-only

//! Capture completion coordinator
//!
//! Correlates the two asynchronous completion signals of one submitted
//! capture into a single asset-library handoff:
//!
//! ```text
//!            begin_capture          conjunction satisfied
//!   Idle ───────────────▶ AwaitingCapture ───────────────▶ Finalizing
//!    ▲                          │                              │
//!    │        abort (device error, temp-file failure,          │
//!    │         timeout, denied authorization)                  │
//!    └──────────────────────────┴──────────────────────────────┘
//!                      library completion (success or failure)
//! ```
//!
//! The two signals arrive in unspecified relative order; both handlers are
//! idempotent writers into the shared [`PendingCapture`] and the transition
//! to `Finalizing` is gated on the conjunction of both facts (compressed
//! buffer present and finished-success recorded), never on a fixed sequence.
//! At most one `PendingCapture` exists at a time; the coordinator's phase is
//! the shutter mutual-exclusion mechanism and is read and cleared under one
//! lock with request submission.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::backends::types::{CaptureEvent, PhotoFrame};
use crate::errors::{CaptureError, PersistenceError};
use crate::library::{AssetCreationRequest, AssetLibrary};
use crate::permissions::{Authorization, PermissionAuthority};
use crate::storage;
use crate::surface::{SurfaceEvent, SurfaceSender};

/// Mutable accumulator for one in-flight shot.
///
/// Created on submission, consumed by the asset-library handoff, destroyed
/// on every terminal transition.
#[derive(Debug, Default)]
pub struct PendingCapture {
    /// Processed (compressed) photo component
    pub compressed: Option<Vec<u8>>,
    /// Materialized temporary raw file, if the shot carries a raw component
    pub raw_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingCapture,
    Finalizing,
}

struct Inner {
    phase: Phase,
    pending: Option<PendingCapture>,
    /// The capture-finished signal reported success
    finished_ok: bool,
    /// Bumped on every terminal transition so a stale timeout watcher can
    /// never abort a later shot
    generation: u64,
}

/// Correlates completion signals and owns the pending capture
pub struct CaptureCoordinator {
    inner: Mutex<Inner>,
    authority: Arc<dyn PermissionAuthority>,
    library: Arc<dyn AssetLibrary>,
    surface: SurfaceSender,
    completion_timeout: Option<Duration>,
}

impl CaptureCoordinator {
    pub fn new(
        authority: Arc<dyn PermissionAuthority>,
        library: Arc<dyn AssetLibrary>,
        surface: SurfaceSender,
        completion_timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                phase: Phase::Idle,
                pending: None,
                finished_ok: false,
                generation: 0,
            }),
            authority,
            library,
            surface,
            completion_timeout,
        }
    }

    /// Atomically claim the shutter for a new capture request.
    ///
    /// Rejects with [`CaptureError::CaptureInProgress`] unless the
    /// coordinator is idle. On success a fresh empty [`PendingCapture`] is
    /// created and the completion timeout watcher armed.
    pub async fn begin_capture(self: &Arc<Self>) -> Result<(), CaptureError> {
        let generation = {
            let mut inner = self.inner.lock().await;
            if inner.phase != Phase::Idle {
                return Err(CaptureError::CaptureInProgress);
            }
            inner.phase = Phase::AwaitingCapture;
            inner.pending = Some(PendingCapture::default());
            inner.finished_ok = false;
            inner.generation += 1;
            let _ = self.surface.send(SurfaceEvent::ShutterEnabled(false));
            inner.generation
        };

        if let Some(timeout) = self.completion_timeout {
            let coordinator = Arc::clone(self);
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                coordinator.handle_timeout(generation).await;
            });
        }
        Ok(())
    }

    /// Abort the current shot from outside the signal handlers (settings
    /// construction or submission failure). No-op when idle.
    pub async fn abort(&self, err: CaptureError) {
        let mut inner = self.inner.lock().await;
        if inner.phase == Phase::Idle {
            return;
        }
        Self::abort_locked(&mut inner, &self.surface, err).await;
    }

    /// Feed one backend completion signal into the state machine
    pub async fn handle_event(self: &Arc<Self>, event: CaptureEvent) {
        match event {
            CaptureEvent::PhotoData(frame) => self.handle_photo_data(frame).await,
            CaptureEvent::Finished(result) => self.handle_finished(result).await,
        }
    }

    /// Photo-data-ready signal: either a raw buffer (materialized to a
    /// unique temporary file) or the compressed buffer (stored directly).
    async fn handle_photo_data(self: &Arc<Self>, frame: PhotoFrame) {
        let mut inner = self.inner.lock().await;
        if inner.phase != Phase::AwaitingCapture {
            error!(
                phase = ?inner.phase,
                is_raw = frame.is_raw,
                "Photo data signal outside an awaiting capture; correlation contract violated"
            );
            return;
        }
        let Some(pending) = inner.pending.as_mut() else {
            error!("No pending capture while awaiting; correlation contract violated");
            return;
        };

        if frame.is_raw {
            if pending.raw_file.is_some() {
                warn!("Duplicate raw photo data signal ignored");
                return;
            }
            match storage::write_temp_raw(&frame.data).await {
                Ok(path) => {
                    info!(path = %path.display(), "Raw component materialized");
                    pending.raw_file = Some(path);
                }
                Err(err) => {
                    // A lost raw component must fail the whole shot rather
                    // than silently degrade it.
                    Self::abort_locked(&mut inner, &self.surface, err.into()).await;
                    return;
                }
            }
        } else if pending.compressed.is_none() {
            pending.compressed = Some(frame.data);
        } else {
            warn!("Duplicate compressed photo data signal ignored");
            return;
        }

        self.try_finalize(&mut inner).await;
    }

    /// Capture-finished signal: success is recorded as a fact; a device
    /// error aborts the shot.
    async fn handle_finished(self: &Arc<Self>, result: Result<(), crate::errors::DeviceError>) {
        let mut inner = self.inner.lock().await;
        if inner.phase != Phase::AwaitingCapture {
            error!(
                phase = ?inner.phase,
                "Capture finished signal outside an awaiting capture; correlation contract violated"
            );
            return;
        }

        match result {
            Err(err) => {
                Self::abort_locked(&mut inner, &self.surface, err.into()).await;
            }
            Ok(()) => {
                inner.finished_ok = true;
                let has_compressed = inner
                    .pending
                    .as_ref()
                    .is_some_and(|p| p.compressed.is_some());
                if !has_compressed {
                    // The conjunction rule keeps the shot alive until the
                    // buffer arrives or the timeout fires.
                    warn!("Capture finished before any compressed photo data arrived");
                }
                self.try_finalize(&mut inner).await;
            }
        }
    }

    /// Transition to `Finalizing` when both facts are present, then hand the
    /// finished asset to the library and return to `Idle`.
    async fn try_finalize(&self, inner: &mut Inner) {
        if !(inner.finished_ok && inner.pending.as_ref().is_some_and(|p| p.compressed.is_some())) {
            return;
        }

        let Some(pending) = inner.pending.take() else {
            return;
        };
        let Some(compressed) = pending.compressed else {
            return;
        };
        inner.phase = Phase::Finalizing;
        let raw_file = pending.raw_file;

        let authorized = match self.authority.library_authorization() {
            Authorization::Granted => true,
            Authorization::Undetermined => self.authority.request_library_access().await,
            Authorization::Denied => false,
        };
        if !authorized {
            warn!("Library write not authorized, discarding finished capture");
            if let Some(path) = &raw_file {
                storage::remove_quietly(path).await;
            }
            let _ = self.surface.send(SurfaceEvent::ShotFailed(
                PersistenceError::LibraryDenied.to_string(),
            ));
            Self::finish_locked(inner, &self.surface);
            return;
        }

        let request = match AssetCreationRequest::new(compressed, raw_file.clone(), true) {
            Ok(request) => request,
            Err(err) => {
                error!(error = %err, "Finished capture failed asset validation");
                if let Some(path) = &raw_file {
                    storage::remove_quietly(path).await;
                }
                let _ = self.surface.send(SurfaceEvent::ShotFailed(err.to_string()));
                Self::finish_locked(inner, &self.surface);
                return;
            }
        };

        match self.library.create_asset(request).await {
            Ok(path) => {
                info!("Capture committed to the asset library");
                let _ = self.surface.send(SurfaceEvent::ShotSaved(path));
                Self::finish_locked(inner, &self.surface);
            }
            Err(err) => {
                warn!(error = %err, "Asset creation failed");
                // The move may not have happened; drop the temp file either way.
                if let Some(path) = &raw_file {
                    storage::remove_quietly(path).await;
                }
                let _ = self.surface.send(SurfaceEvent::ShotFailed(err.to_string()));
                Self::finish_locked(inner, &self.surface);
            }
        }
    }

    /// Abort the shot the timeout watcher was armed for, unless a later
    /// transition already retired that generation.
    async fn handle_timeout(&self, generation: u64) {
        let mut inner = self.inner.lock().await;
        if inner.generation != generation || inner.phase == Phase::Idle {
            return;
        }
        let err = if inner.finished_ok {
            // Finished-success was recorded but the compressed buffer never
            // arrived: the two-signal correlation invariant was violated.
            error!("Capture finished but no photo data ever arrived");
            CaptureError::Inconsistency("capture finished without photo data".into())
        } else {
            CaptureError::Device(crate::errors::DeviceError::CompletionTimeout)
        };
        Self::abort_locked(&mut inner, &self.surface, err).await;
    }

    /// Discard the pending capture and return to `Idle`, surfacing the error
    async fn abort_locked(inner: &mut Inner, surface: &SurfaceSender, err: CaptureError) {
        warn!(error = %err, "Aborting capture request");
        if let Some(pending) = inner.pending.take() {
            if let Some(path) = pending.raw_file {
                storage::remove_quietly(&path).await;
            }
        }
        let _ = surface.send(SurfaceEvent::ShotFailed(err.to_string()));
        Self::finish_locked(inner, surface);
    }

    /// Terminal transition back to `Idle`: re-enable the shutter and retire
    /// the current generation
    fn finish_locked(inner: &mut Inner, surface: &SurfaceSender) {
        inner.phase = Phase::Idle;
        inner.pending = None;
        inner.finished_ok = false;
        inner.generation += 1;
        let _ = surface.send(SurfaceEvent::ShutterEnabled(true));
    }

    /// Whether a new capture request would be accepted
    pub async fn is_shutter_enabled(&self) -> bool {
        self.inner.lock().await.phase == Phase::Idle
    }

    /// Whether a pending capture is currently referenced
    pub async fn has_pending_capture(&self) -> bool {
        self.inner.lock().await.pending.is_some()
    }
}
