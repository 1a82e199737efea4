// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture pipeline

use std::fmt;

/// Result type alias using CaptureError
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Main capture pipeline error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Permission denied (camera or library)
    Permission(PermissionError),
    /// Device/session wiring failed during bootstrap
    Configuration(String),
    /// Per-shot settings could not be built from the negotiated capabilities
    Settings(SettingsError),
    /// Device-reported failure during capture
    Device(DeviceError),
    /// Temporary-file or library-write failure
    Persistence(PersistenceError),
    /// A capture is already in flight; the shutter is disabled
    CaptureInProgress,
    /// The two-signal correlation invariant was violated
    Inconsistency(String),
}

/// Permission errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionError {
    /// Camera access denied or restricted
    CameraDenied,
    /// Photo library write access denied
    LibraryDenied,
}

/// Settings construction errors (capability/request mismatch)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// The device reports no raw pixel formats
    NoRawFormat,
    /// The required output codec is not available
    NoCodec,
    /// No raw format satisfies the negotiated family predicate
    NoMatchingFormat,
}

/// Device-reported capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Capture request could not be submitted
    SubmitFailed(String),
    /// The device reported a failure while capturing
    CaptureFailed(String),
    /// The capture never produced both completion signals in time
    CompletionTimeout,
    /// Input/output attachment rejected by the session
    AttachRejected(String),
    /// Device configuration (auto modes, preset) failed
    ConfigurationFailed(String),
}

/// Persistence errors (temp file and asset library)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Writing the raw buffer to its temporary file failed
    TempFileWrite(String),
    /// The asset library rejected or failed the creation request
    LibraryWrite(String),
    /// Library write authorization was denied at finalize time
    LibraryDenied,
    /// The creation request carried an empty compressed buffer
    EmptyCompressedBuffer,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Permission(e) => write!(f, "Permission error: {}", e),
            CaptureError::Configuration(msg) => write!(f, "Configuration failed: {}", msg),
            CaptureError::Settings(e) => write!(f, "Settings error: {}", e),
            CaptureError::Device(e) => write!(f, "Capture device error: {}", e),
            CaptureError::Persistence(e) => write!(f, "Persistence error: {}", e),
            CaptureError::CaptureInProgress => write!(f, "A capture is already in progress"),
            CaptureError::Inconsistency(msg) => write!(f, "Internal inconsistency: {}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::CameraDenied => write!(f, "camera access denied"),
            PermissionError::LibraryDenied => write!(f, "photo library access denied"),
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NoRawFormat => write!(f, "no raw pixel format available"),
            SettingsError::NoCodec => write!(f, "required output codec not available"),
            SettingsError::NoMatchingFormat => {
                write!(f, "no raw format matches the negotiated family")
            }
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::SubmitFailed(msg) => write!(f, "submit failed: {}", msg),
            DeviceError::CaptureFailed(msg) => write!(f, "capture failed: {}", msg),
            DeviceError::CompletionTimeout => write!(f, "capture completion timed out"),
            DeviceError::AttachRejected(msg) => write!(f, "attach rejected: {}", msg),
            DeviceError::ConfigurationFailed(msg) => {
                write!(f, "device configuration failed: {}", msg)
            }
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::TempFileWrite(msg) => {
                write!(f, "failed to write temporary raw file: {}", msg)
            }
            PersistenceError::LibraryWrite(msg) => write!(f, "library write failed: {}", msg),
            PersistenceError::LibraryDenied => write!(f, "library write not authorized"),
            PersistenceError::EmptyCompressedBuffer => {
                write!(f, "compressed buffer is required and must not be empty")
            }
        }
    }
}

impl std::error::Error for CaptureError {}
impl std::error::Error for PermissionError {}
impl std::error::Error for SettingsError {}
impl std::error::Error for DeviceError {}
impl std::error::Error for PersistenceError {}

// Conversions from sub-errors to CaptureError
impl From<PermissionError> for CaptureError {
    fn from(err: PermissionError) -> Self {
        CaptureError::Permission(err)
    }
}

impl From<SettingsError> for CaptureError {
    fn from(err: SettingsError) -> Self {
        CaptureError::Settings(err)
    }
}

impl From<DeviceError> for CaptureError {
    fn from(err: DeviceError) -> Self {
        CaptureError::Device(err)
    }
}

impl From<PersistenceError> for CaptureError {
    fn from(err: PersistenceError) -> Self {
        CaptureError::Persistence(err)
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::TempFileWrite(err.to_string())
    }
}
