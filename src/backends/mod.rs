// SPDX-License-Identifier: GPL-3.0-only

//! Device capture service abstraction
//!
//! This module provides the trait-based abstraction the pipeline drives the
//! camera hardware through.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  CaptureSession      │  ← Serial bootstrap + shutter operations
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ CaptureBackend Trait │  ← Device/session contract
//! └──────────┬───────────┘
//!            │
//!            ▼
//!      ┌───────────┐
//!      │ Simulated │  ← Concrete implementation (demo + tests)
//!      └───────────┘
//! ```
//!
//! All session-mutating methods are invoked from a single serial task, so
//! implementations never see concurrent configuration calls. Capture events
//! are delivered through the sender handed to [`CaptureBackend::submit_capture`]
//! and may arrive from any thread, in any order.

pub mod sim;
pub mod types;

pub use types::*;

use crate::errors::DeviceError;
use crate::pipeline::settings::CaptureSettings;

/// Complete capture backend trait
///
/// All capture backends must implement this trait to provide:
/// - Device selection and session wiring
/// - Capability reports (raw formats, codecs, extended-RAW support)
/// - Asynchronous capture submission
pub trait CaptureBackend: Send + Sync {
    // ===== Device selection =====

    /// Select a device by position and kind, if one exists
    fn select_device(&self, position: DevicePosition, kind: DeviceKind) -> Option<DeviceHandle>;

    // ===== Session wiring =====

    /// Open a configuration transaction on the session
    fn begin_configuration(&self);

    /// Commit the configuration transaction
    fn commit_configuration(&self);

    /// Check whether the session can accept an input for this device
    fn can_add_input(&self, device: &DeviceHandle) -> bool;

    /// Attach the device input. Must only be called after a positive
    /// [`CaptureBackend::can_add_input`] check.
    fn add_input(&self, device: &DeviceHandle) -> Result<(), DeviceError>;

    /// Check whether the session can accept the photo output
    fn can_add_photo_output(&self) -> bool;

    /// Attach the photo output
    fn add_photo_output(&self) -> Result<(), DeviceError>;

    /// Check whether the session can accept the preview output
    fn can_add_preview_output(&self) -> bool;

    /// Attach the preview output
    fn add_preview_output(&self) -> Result<(), DeviceError>;

    /// Apply a session preset
    fn set_preset(&self, preset: SessionPreset);

    /// Check whether the device supports a continuous auto mode
    fn auto_mode_supported(&self, device: &DeviceHandle, mode: AutoMode) -> bool;

    /// Enable a continuous auto mode on the device
    fn set_auto_mode(&self, device: &DeviceHandle, mode: AutoMode) -> Result<(), DeviceError>;

    /// Start the session running. Called once after a successful bootstrap.
    fn start_running(&self);

    // ===== Capability reports =====

    /// Raw pixel formats the photo output can deliver
    fn available_raw_formats(&self) -> Vec<RawFormat>;

    /// Output codecs the photo output can encode to
    fn available_codecs(&self) -> Vec<Codec>;

    /// Whether extended RAW is supported by this device/OS combination
    fn extended_raw_supported(&self) -> bool;

    /// Enable or disable extended RAW delivery
    fn set_extended_raw_enabled(&self, enabled: bool);

    /// Whether extended RAW delivery is currently enabled
    fn extended_raw_enabled(&self) -> bool;

    // ===== Capture =====

    /// Submit one capture request.
    ///
    /// Completion is reported asynchronously through `events`: any number of
    /// photo-data signals followed or preceded (order unspecified) by exactly
    /// one finished signal.
    fn submit_capture(
        &self,
        settings: &CaptureSettings,
        events: CaptureEventSender,
    ) -> Result<(), DeviceError>;
}
