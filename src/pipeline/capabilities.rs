// SPDX-License-Identifier: GPL-3.0-only

//! Capability negotiation across the three capture tiers
//!
//! Runs once after a successful bootstrap. The resulting
//! [`DeviceCapabilities`] snapshot is cached for the session lifetime;
//! device capabilities do not change mid-session in this design.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::backends::CaptureBackend;
use crate::backends::types::{Codec, RawFormat, RawFormatFamily};

/// Capture quality tier requested per shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureTier {
    /// Standard processed photo
    Photo,
    /// Sensor RAW paired with a processed HEVC component
    Raw,
    /// Vendor-extended RAW
    ProRaw,
}

impl CaptureTier {
    /// All tiers, in selector order
    pub const ALL: [CaptureTier; 3] = [CaptureTier::Photo, CaptureTier::Raw, CaptureTier::ProRaw];
}

impl fmt::Display for CaptureTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureTier::Photo => write!(f, "Photo"),
            CaptureTier::Raw => write!(f, "RAW"),
            CaptureTier::ProRaw => write!(f, "Extended RAW"),
        }
    }
}

/// Snapshot of what the device can actually deliver.
///
/// Immutable after negotiation; every shutter press reads from the same
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Raw pixel formats reported by the photo output
    pub raw_formats: Vec<RawFormat>,
    /// Output codecs reported by the photo output
    pub codecs: Vec<Codec>,
    /// Extended RAW confirmed supported and enabled for this session
    pub extended_raw_enabled: bool,
}

impl DeviceCapabilities {
    /// The raw format family the extended-RAW tier selects from
    pub fn negotiated_family(&self) -> RawFormatFamily {
        if self.extended_raw_enabled {
            RawFormatFamily::Extended
        } else {
            RawFormatFamily::Bayer
        }
    }

    pub fn has_codec(&self, codec: Codec) -> bool {
        self.codecs.contains(&codec)
    }

    /// First raw format in device order, used by the plain RAW tier
    pub fn first_raw_format(&self) -> Option<RawFormat> {
        self.raw_formats.first().copied()
    }

    /// Predicate search for a raw format of the given family
    pub fn raw_format_in_family(&self, family: RawFormatFamily) -> Option<RawFormat> {
        self.raw_formats.iter().copied().find(|f| f.family == family)
    }

    /// The tiers a caller may request.
    ///
    /// - No raw formats at all: standard photo is the sole tier.
    /// - Extended RAW requires the confirmed-enabled flag and at least one
    ///   format of the extended family; otherwise the tier is pruned rather
    ///   than left to fail at capture time.
    pub fn available_tiers(&self) -> Vec<CaptureTier> {
        let mut tiers = vec![CaptureTier::Photo];
        if self.raw_formats.is_empty() {
            return tiers;
        }
        tiers.push(CaptureTier::Raw);
        if self.extended_raw_enabled
            && self
                .raw_format_in_family(RawFormatFamily::Extended)
                .is_some()
        {
            tiers.push(CaptureTier::ProRaw);
        }
        tiers
    }

    pub fn supports_tier(&self, tier: CaptureTier) -> bool {
        self.available_tiers().contains(&tier)
    }
}

/// Inspect the backend's capability reports and fix the session's tier set.
///
/// The extended-RAW delivery bit is switched on exactly when the platform
/// confirms support for it.
pub fn negotiate(backend: &dyn CaptureBackend) -> DeviceCapabilities {
    let raw_formats = backend.available_raw_formats();
    let codecs = backend.available_codecs();

    let extended_supported = backend.extended_raw_supported();
    backend.set_extended_raw_enabled(extended_supported);
    let extended_raw_enabled = backend.extended_raw_enabled();

    let capabilities = DeviceCapabilities {
        raw_formats,
        codecs,
        extended_raw_enabled,
    };

    debug!(
        raw_formats = capabilities.raw_formats.len(),
        codecs = capabilities.codecs.len(),
        extended_raw_enabled,
        "Negotiated device capabilities"
    );
    info!(tiers = ?capabilities.available_tiers(), "Available capture tiers");

    capabilities
}
