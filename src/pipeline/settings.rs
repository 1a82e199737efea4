// SPDX-License-Identifier: GPL-3.0-only

//! Per-shot capture settings construction
//!
//! One immutable [`CaptureSettings`] value is built fresh for every shutter
//! press from the requested tier and the negotiated capabilities. Each tier
//! is an independent pure function returning a result; there is no implicit
//! fallback between tiers.

use crate::backends::types::{Codec, RawFormat};
use crate::errors::SettingsError;
use crate::pipeline::capabilities::{CaptureTier, DeviceCapabilities};

/// Immutable description of exactly one requested shot.
///
/// Owned solely by the in-flight capture request and discarded after
/// submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Raw pixel format to deliver, if this is a RAW-bearing shot
    pub raw_format: Option<RawFormat>,
    /// Codec for the processed photo component
    pub processed_codec: Option<Codec>,
    /// Codec for the embedded thumbnail, if one is requested
    pub thumbnail_codec: Option<Codec>,
    /// High-resolution capture is always disabled to bound capture
    /// latency and memory
    pub high_resolution: bool,
}

/// Build settings for the requested tier, or fail without side effects.
pub fn build(
    tier: CaptureTier,
    capabilities: &DeviceCapabilities,
) -> Result<CaptureSettings, SettingsError> {
    match tier {
        CaptureTier::Photo => Ok(build_photo()),
        CaptureTier::Raw => build_raw(capabilities),
        CaptureTier::ProRaw => build_pro_raw(capabilities),
    }
}

/// Standard photo: embedded JPEG thumbnail, no raw component.
///
/// Succeeds regardless of capabilities.
fn build_photo() -> CaptureSettings {
    CaptureSettings {
        raw_format: None,
        processed_codec: None,
        thumbnail_codec: Some(Codec::Jpeg),
        high_resolution: false,
    }
}

/// Sensor RAW: first available raw format paired with the HEVC codec.
fn build_raw(capabilities: &DeviceCapabilities) -> Result<CaptureSettings, SettingsError> {
    let raw_format = capabilities
        .first_raw_format()
        .ok_or(SettingsError::NoRawFormat)?;
    if !capabilities.has_codec(Codec::Hevc) {
        return Err(SettingsError::NoCodec);
    }
    Ok(CaptureSettings {
        raw_format: Some(raw_format),
        processed_codec: Some(Codec::Hevc),
        thumbnail_codec: None,
        high_resolution: false,
    })
}

/// Extended RAW: predicate search over the negotiated format family.
///
/// A missing format aborts this shot rather than degrading it silently.
fn build_pro_raw(capabilities: &DeviceCapabilities) -> Result<CaptureSettings, SettingsError> {
    let family = capabilities.negotiated_family();
    let raw_format = capabilities
        .raw_format_in_family(family)
        .ok_or(SettingsError::NoMatchingFormat)?;
    if !capabilities.has_codec(Codec::Hevc) {
        return Err(SettingsError::NoCodec);
    }
    Ok(CaptureSettings {
        raw_format: Some(raw_format),
        processed_codec: Some(Codec::Hevc),
        thumbnail_codec: None,
        high_resolution: false,
    })
}
