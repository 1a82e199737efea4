// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Application identifier used for config and data directories
pub const APP_ID: &str = "raw-capture";

/// Human readable application name (alert titles)
pub const APP_NAME: &str = "RAW Capture";

/// File extension for materialized sensor-RAW buffers
pub const RAW_FILE_EXTENSION: &str = "dng";

/// File extension for the processed (compressed) photo component
pub const PHOTO_FILE_EXTENSION: &str = "jpg";

/// Config file name inside the app config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default bound on how long a submitted capture may stay in flight, in
/// seconds. A shot that has not reached the asset library by then is aborted
/// and the shutter re-enabled.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 10;

/// Timestamp format for persisted asset file names (e.g. `IMG_20260829_142501`)
pub const ASSET_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
