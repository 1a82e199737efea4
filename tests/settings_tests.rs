// SPDX-License-Identifier: GPL-3.0-only

//! Settings builder and negotiation properties

use raw_capture::CaptureTier;
use raw_capture::backends::sim::SimulatedBackend;
use raw_capture::backends::types::{Codec, RawFormat};
use raw_capture::errors::SettingsError;
use raw_capture::pipeline::capabilities::{self, DeviceCapabilities};
use raw_capture::pipeline::settings;

fn capabilities(raw_formats: Vec<RawFormat>, extended: bool) -> DeviceCapabilities {
    DeviceCapabilities {
        raw_formats,
        codecs: vec![Codec::Jpeg, Codec::Hevc],
        extended_raw_enabled: extended,
    }
}

#[test]
fn build_is_a_pure_function_of_its_inputs() {
    let caps = capabilities(
        vec![RawFormat::bayer(0x100), RawFormat::extended(0x200)],
        true,
    );
    for tier in CaptureTier::ALL {
        let first = settings::build(tier, &caps);
        let second = settings::build(tier, &caps);
        assert_eq!(
            first, second,
            "identical (tier, capabilities) must yield value-equal settings"
        );
    }
}

#[test]
fn raw_tiers_fail_without_raw_formats_but_photo_always_builds() {
    let caps = capabilities(vec![], true);

    assert!(settings::build(CaptureTier::Photo, &caps).is_ok());
    assert_eq!(
        settings::build(CaptureTier::Raw, &caps),
        Err(SettingsError::NoRawFormat)
    );
    assert!(settings::build(CaptureTier::ProRaw, &caps).is_err());
}

#[test]
fn photo_builds_regardless_of_capabilities() {
    let empty = DeviceCapabilities {
        raw_formats: vec![],
        codecs: vec![],
        extended_raw_enabled: false,
    };
    assert!(settings::build(CaptureTier::Photo, &empty).is_ok());
}

#[test]
fn negotiator_pruning_is_exhaustive_for_unsupported_extended_raw() {
    // If extended RAW is unsupported, the advertised tier set must never
    // contain ProRaw; a well-behaved caller then never invokes the builder
    // for it.
    let backend = SimulatedBackend::new().with_extended_raw_supported(false);
    let caps = capabilities::negotiate(&backend);

    assert!(!caps.supports_tier(CaptureTier::ProRaw));
    assert!(caps.supports_tier(CaptureTier::Raw));
}

#[test]
fn negotiator_advertises_photo_only_without_raw_formats() {
    let backend = SimulatedBackend::new().with_raw_formats(vec![]);
    let caps = capabilities::negotiate(&backend);

    assert_eq!(caps.available_tiers(), vec![CaptureTier::Photo]);
}
