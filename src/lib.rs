// SPDX-License-Identifier: GPL-3.0-only

//! RAW Capture - tiered photo capture with two-phase asynchronous completion
//!
//! This library configures an image-capture session, negotiates which of
//! three capture tiers (photo, sensor RAW, vendor-extended RAW) the device
//! can actually deliver, builds immutable per-shot settings, and correlates
//! the two unordered completion signals of each capture into a single
//! persisted asset.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: device capture service abstraction (plus a simulated backend)
//! - [`pipeline`]: bootstrap, capability negotiation, settings, completion
//! - [`permissions`]: camera/library authorization gate
//! - [`library`]: asset library contract and filesystem implementation
//! - [`surface`]: display/alert surface event channel
//! - [`config`]: user configuration handling
//! - [`storage`]: temporary raw-file handling

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod library;
pub mod permissions;
pub mod pipeline;
pub mod storage;
pub mod surface;

// Re-export commonly used types
pub use config::Config;
pub use errors::{CaptureError, CaptureResult, SettingsError};
pub use pipeline::capabilities::{CaptureTier, DeviceCapabilities};
pub use pipeline::session::{CaptureSession, SetupResult};
pub use surface::SurfaceEvent;
