// SPDX-License-Identifier: GPL-3.0-only

//! Display/alert surface seam
//!
//! The core never mutates presentation state directly. Every UI-visible
//! transition is sent as a [`SurfaceEvent`] over an unbounded channel and
//! marshaled by whoever owns the single-threaded UI context (the demo binary
//! drains it into the log).

use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::pipeline::capabilities::CaptureTier;
use crate::pipeline::session::SetupResult;

/// The alert variants the surface can present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// The app has no permission to use the camera
    CameraNotAuthorized,
    /// The app has no permission to use the photo library
    LibraryNotAuthorized,
}

/// One UI-visible notification from the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A bootstrap attempt finished; `Success` presents no alert
    SetupCompleted(SetupResult),
    /// Present an alert; `offer_settings` asks the surface to show a
    /// system-settings redirect (the redirect itself is not performed here)
    Alert {
        kind: AlertKind,
        offer_settings: bool,
    },
    /// Shutter availability changed
    ShutterEnabled(bool),
    /// A tier must be removed from the selector (capability pruning)
    TierRemoved(CaptureTier),
    /// The live preview output was attached to the session
    PreviewAttached,
    /// The current shot was aborted; non-fatal, the shutter is usable again
    ShotFailed(String),
    /// A finished capture was committed to the asset library
    ShotSaved(Option<PathBuf>),
}

/// Sender half handed to the core
pub type SurfaceSender = mpsc::UnboundedSender<SurfaceEvent>;

/// Receiver half owned by the presentation layer
pub type SurfaceReceiver = mpsc::UnboundedReceiver<SurfaceEvent>;

/// Create the surface channel pair
pub fn channel() -> (SurfaceSender, SurfaceReceiver) {
    mpsc::unbounded_channel()
}
