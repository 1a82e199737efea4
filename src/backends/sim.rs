// SPDX-License-Identifier: GPL-3.0-only

//! Simulated capture backend
//!
//! Stands in for the camera hardware in the demo binary and the integration
//! tests: capabilities are configurable, session wiring is tracked, and
//! completion signals are delivered from per-shot scripts (or synthesized
//! from the submitted settings when no script is queued).

use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

use super::CaptureBackend;
use super::types::{
    AutoMode, CaptureEvent, CaptureEventSender, Codec, DeviceHandle, DeviceKind, DevicePosition,
    PhotoFrame, RawFormat, SessionPreset,
};
use crate::errors::DeviceError;
use crate::pipeline::settings::CaptureSettings;

struct SimState {
    device_present: bool,
    raw_formats: Vec<RawFormat>,
    codecs: Vec<Codec>,
    extended_supported: bool,
    extended_enabled: bool,
    input_capacity: bool,
    photo_output_capacity: bool,
    preview_capacity: bool,
    input_added: bool,
    photo_output_added: bool,
    preview_output_added: bool,
    preset: Option<SessionPreset>,
    configuring: bool,
    running: bool,
    /// Scripted completion signals, one script per submitted capture
    scripts: VecDeque<Vec<CaptureEvent>>,
    submissions: Vec<CaptureSettings>,
}

/// Configurable in-process capture backend
pub struct SimulatedBackend {
    state: Mutex<SimState>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    /// A fully capable device: Bayer and extended raw formats, JPEG and
    /// HEVC codecs, extended RAW supported.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                device_present: true,
                raw_formats: vec![RawFormat::bayer(0x62343270), RawFormat::extended(0x6c343270)],
                codecs: vec![Codec::Jpeg, Codec::Hevc],
                extended_supported: true,
                extended_enabled: false,
                input_capacity: true,
                photo_output_capacity: true,
                preview_capacity: true,
                input_added: false,
                photo_output_added: false,
                preview_output_added: false,
                preset: None,
                configuring: false,
                running: false,
                scripts: VecDeque::new(),
                submissions: Vec::new(),
            }),
        }
    }

    pub fn with_raw_formats(self, raw_formats: Vec<RawFormat>) -> Self {
        self.state.lock().unwrap().raw_formats = raw_formats;
        self
    }

    pub fn with_codecs(self, codecs: Vec<Codec>) -> Self {
        self.state.lock().unwrap().codecs = codecs;
        self
    }

    pub fn with_extended_raw_supported(self, supported: bool) -> Self {
        self.state.lock().unwrap().extended_supported = supported;
        self
    }

    /// Remove the capture device entirely (bootstrap must fail)
    pub fn without_device(self) -> Self {
        self.state.lock().unwrap().device_present = false;
        self
    }

    /// Refuse the device-input capacity check
    pub fn without_input_capacity(self) -> Self {
        self.state.lock().unwrap().input_capacity = false;
        self
    }

    /// Queue the completion signals for the next submitted capture, in the
    /// exact order they should be delivered.
    pub fn queue_capture_script(&self, events: Vec<CaptureEvent>) {
        self.state.lock().unwrap().scripts.push_back(events);
    }

    /// Settings of every capture submitted so far
    pub fn submissions(&self) -> Vec<CaptureSettings> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    pub fn preview_output_added(&self) -> bool {
        self.state.lock().unwrap().preview_output_added
    }

    /// Default signals for settings without a queued script: a raw-bearing
    /// shot delivers a raw buffer, the compressed buffer, then success.
    fn synthesize_events(settings: &CaptureSettings) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        if settings.raw_format.is_some() {
            events.push(CaptureEvent::PhotoData(PhotoFrame::raw(
                b"sim-raw-sensor-data".to_vec(),
            )));
        }
        events.push(CaptureEvent::PhotoData(PhotoFrame::compressed(
            b"sim-compressed-photo".to_vec(),
        )));
        events.push(CaptureEvent::Finished(Ok(())));
        events
    }
}

impl CaptureBackend for SimulatedBackend {
    fn select_device(&self, position: DevicePosition, kind: DeviceKind) -> Option<DeviceHandle> {
        let state = self.state.lock().unwrap();
        if !state.device_present {
            return None;
        }
        Some(DeviceHandle {
            id: "sim-0".into(),
            name: "Simulated camera".into(),
            position,
            kind,
        })
    }

    fn begin_configuration(&self) {
        self.state.lock().unwrap().configuring = true;
    }

    fn commit_configuration(&self) {
        self.state.lock().unwrap().configuring = false;
    }

    fn can_add_input(&self, _device: &DeviceHandle) -> bool {
        let state = self.state.lock().unwrap();
        state.input_capacity && !state.input_added
    }

    fn add_input(&self, device: &DeviceHandle) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.input_capacity || state.input_added {
            return Err(DeviceError::AttachRejected(format!(
                "input for {}",
                device.id
            )));
        }
        state.input_added = true;
        Ok(())
    }

    fn can_add_photo_output(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.photo_output_capacity && !state.photo_output_added
    }

    fn add_photo_output(&self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.photo_output_capacity || state.photo_output_added {
            return Err(DeviceError::AttachRejected("photo output".into()));
        }
        state.photo_output_added = true;
        Ok(())
    }

    fn can_add_preview_output(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.preview_capacity && !state.preview_output_added
    }

    fn add_preview_output(&self) -> Result<(), DeviceError> {
        let mut state = self.state.lock().unwrap();
        if !state.preview_capacity || state.preview_output_added {
            return Err(DeviceError::AttachRejected("preview output".into()));
        }
        state.preview_output_added = true;
        Ok(())
    }

    fn set_preset(&self, preset: SessionPreset) {
        self.state.lock().unwrap().preset = Some(preset);
    }

    fn auto_mode_supported(&self, _device: &DeviceHandle, _mode: AutoMode) -> bool {
        true
    }

    fn set_auto_mode(&self, _device: &DeviceHandle, mode: AutoMode) -> Result<(), DeviceError> {
        debug!(mode = %mode, "Simulated auto mode enabled");
        Ok(())
    }

    fn start_running(&self) {
        self.state.lock().unwrap().running = true;
    }

    fn available_raw_formats(&self) -> Vec<RawFormat> {
        self.state.lock().unwrap().raw_formats.clone()
    }

    fn available_codecs(&self) -> Vec<Codec> {
        self.state.lock().unwrap().codecs.clone()
    }

    fn extended_raw_supported(&self) -> bool {
        self.state.lock().unwrap().extended_supported
    }

    fn set_extended_raw_enabled(&self, enabled: bool) {
        self.state.lock().unwrap().extended_enabled = enabled;
    }

    fn extended_raw_enabled(&self) -> bool {
        self.state.lock().unwrap().extended_enabled
    }

    fn submit_capture(
        &self,
        settings: &CaptureSettings,
        events: CaptureEventSender,
    ) -> Result<(), DeviceError> {
        let script = {
            let mut state = self.state.lock().unwrap();
            if !state.running || !state.photo_output_added {
                return Err(DeviceError::SubmitFailed("session is not running".into()));
            }
            state.submissions.push(settings.clone());
            state
                .scripts
                .pop_front()
                .unwrap_or_else(|| Self::synthesize_events(settings))
        };

        for event in script {
            if events.send(event).is_err() {
                return Err(DeviceError::SubmitFailed("event channel closed".into()));
            }
        }
        Ok(())
    }
}
