// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate for camera and photo library access
//!
//! Camera authorization gates the whole bootstrap: an undetermined state
//! suspends the serial session task on a single await and resumes it exactly
//! once with the user's answer. Library authorization never blocks capture;
//! a denial only blocks the later persistence step, which re-checks it.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Authorization state as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    /// The user has not been asked yet
    Undetermined,
    /// Denied or restricted; only a system-settings change can lift this
    Denied,
}

/// The platform permission authority.
///
/// `request_*` methods resolve once the user answers and must be invoked at
/// most once per undetermined state.
#[async_trait]
pub trait PermissionAuthority: Send + Sync {
    fn camera_authorization(&self) -> Authorization;

    /// Ask the user for camera access. Resolves with the outcome.
    async fn request_camera_access(&self) -> bool;

    fn library_authorization(&self) -> Authorization;

    /// Ask the user for library write access. Resolves with the outcome.
    async fn request_library_access(&self) -> bool;
}

/// Result of the bootstrap permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionOutcome {
    /// Camera access settled as granted
    pub camera_granted: bool,
    /// Library state at check time; may still be undetermined while the
    /// non-blocking request is in flight
    pub library: Authorization,
}

/// Resolves both authorizations before any hardware reconfiguration proceeds
pub struct PermissionGate;

impl PermissionGate {
    /// Check camera and library authorization, requesting each where
    /// undetermined.
    ///
    /// The camera request is awaited in place; since this runs on the serial
    /// session task, all queued session work is suspended until the user
    /// answers. The library request is spawned and not awaited.
    pub async fn check_and_request(authority: &Arc<dyn PermissionAuthority>) -> PermissionOutcome {
        let camera_granted = match authority.camera_authorization() {
            Authorization::Granted => true,
            Authorization::Undetermined => {
                info!("Camera access undetermined, asking the user");
                let granted = authority.request_camera_access().await;
                info!(granted, "Camera access request resolved");
                granted
            }
            Authorization::Denied => {
                warn!("Camera access denied or restricted");
                false
            }
        };

        let library = authority.library_authorization();
        match library {
            Authorization::Granted => {}
            Authorization::Undetermined => {
                // Does not gate capture; the outcome is only needed at
                // finalize time, which queries the authority again.
                let authority = Arc::clone(authority);
                tokio::spawn(async move {
                    let granted = authority.request_library_access().await;
                    info!(granted, "Library access request resolved");
                });
            }
            Authorization::Denied => {
                warn!("Library access denied; captures cannot be persisted");
            }
        }

        PermissionOutcome {
            camera_granted,
            library,
        }
    }
}
