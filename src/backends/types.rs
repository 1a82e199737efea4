// SPDX-License-Identifier: GPL-3.0-only

//! Value types shared between the capture backend and the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

use crate::errors::DeviceError;

/// Physical position of a capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevicePosition {
    Back,
    Front,
}

/// Kind of capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    WideAngle,
    Telephoto,
    UltraWide,
}

/// Session preset applied during bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPreset {
    /// Still-photo quality preset
    Photo,
    /// Generic high-quality preset
    High,
}

/// Continuous auto modes applied to the selected device when supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoMode {
    Focus,
    Exposure,
    WhiteBalance,
}

impl fmt::Display for AutoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoMode::Focus => write!(f, "continuous autofocus"),
            AutoMode::Exposure => write!(f, "continuous auto exposure"),
            AutoMode::WhiteBalance => write!(f, "continuous auto white balance"),
        }
    }
}

/// Handle to a selected capture device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    /// Backend-specific device identifier
    pub id: String,
    /// Human readable device name
    pub name: String,
    pub position: DevicePosition,
    pub kind: DeviceKind,
}

/// Family of a device-reported raw pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormatFamily {
    /// Generic sensor Bayer format
    Bayer,
    /// Vendor-extended RAW format; usable only when the extended-RAW
    /// capability is confirmed for this device/OS combination
    Extended,
}

/// A raw pixel format as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFormat {
    /// Device-reported format tag
    pub id: u32,
    pub family: RawFormatFamily,
}

impl RawFormat {
    pub fn bayer(id: u32) -> Self {
        Self {
            id,
            family: RawFormatFamily::Bayer,
        }
    }

    pub fn extended(id: u32) -> Self {
        Self {
            id,
            family: RawFormatFamily::Extended,
        }
    }
}

impl fmt::Display for RawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x} ({:?})", self.id, self.family)
    }
}

/// Output codec for processed photo data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Jpeg,
    Hevc,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Jpeg => write!(f, "JPEG"),
            Codec::Hevc => write!(f, "HEVC"),
        }
    }
}

/// One photo buffer delivered by the photo-data-ready signal.
///
/// A single capture may deliver several of these: a raw capture produces one
/// raw frame and one processed (compressed) frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFrame {
    pub data: Vec<u8>,
    pub is_raw: bool,
}

impl PhotoFrame {
    pub fn raw(data: Vec<u8>) -> Self {
        Self { data, is_raw: true }
    }

    pub fn compressed(data: Vec<u8>) -> Self {
        Self {
            data,
            is_raw: false,
        }
    }
}

/// Asynchronous completion signals emitted for one submitted capture.
///
/// The relative order of `PhotoData` and `Finished` is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Photo-data-ready signal carrying one raw or compressed buffer
    PhotoData(PhotoFrame),
    /// Capture-finished signal: success or a device-reported error
    Finished(Result<(), DeviceError>),
}

/// Channel end the backend delivers capture events into
pub type CaptureEventSender = mpsc::UnboundedSender<CaptureEvent>;

/// Channel end the pipeline consumes capture events from
pub type CaptureEventReceiver = mpsc::UnboundedReceiver<CaptureEvent>;
