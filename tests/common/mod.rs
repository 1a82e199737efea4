// SPDX-License-Identifier: GPL-3.0-only
#![allow(dead_code)]

//! Shared test doubles for the permission authority and the asset library

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use raw_capture::errors::PersistenceError;
use raw_capture::library::{AssetCreationRequest, AssetLibrary};
use raw_capture::permissions::{Authorization, PermissionAuthority};

/// Authority with fixed states and scripted request outcomes
pub struct TestAuthority {
    pub camera: Authorization,
    pub camera_grant: bool,
    pub library: Authorization,
    pub library_grant: bool,
    pub camera_requests: AtomicUsize,
    pub library_requests: AtomicUsize,
}

impl TestAuthority {
    pub fn granted() -> Self {
        Self {
            camera: Authorization::Granted,
            camera_grant: true,
            library: Authorization::Granted,
            library_grant: true,
            camera_requests: AtomicUsize::new(0),
            library_requests: AtomicUsize::new(0),
        }
    }

    pub fn camera_state(mut self, state: Authorization, grant: bool) -> Self {
        self.camera = state;
        self.camera_grant = grant;
        self
    }

    pub fn library_state(mut self, state: Authorization, grant: bool) -> Self {
        self.library = state;
        self.library_grant = grant;
        self
    }
}

#[async_trait]
impl PermissionAuthority for TestAuthority {
    fn camera_authorization(&self) -> Authorization {
        self.camera
    }

    async fn request_camera_access(&self) -> bool {
        self.camera_requests.fetch_add(1, Ordering::SeqCst);
        self.camera_grant
    }

    fn library_authorization(&self) -> Authorization {
        self.library
    }

    async fn request_library_access(&self) -> bool {
        self.library_requests.fetch_add(1, Ordering::SeqCst);
        self.library_grant
    }
}

/// Asset library that records every creation request
#[derive(Default)]
pub struct RecordingLibrary {
    pub requests: Mutex<Vec<AssetCreationRequest>>,
    pub fail_with: Option<String>,
}

impl RecordingLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn recorded_raw_files(&self) -> Vec<Option<PathBuf>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.raw_file.clone())
            .collect()
    }
}

#[async_trait]
impl AssetLibrary for RecordingLibrary {
    async fn create_asset(
        &self,
        request: AssetCreationRequest,
    ) -> Result<Option<PathBuf>, PersistenceError> {
        self.requests.lock().unwrap().push(request);
        match &self.fail_with {
            Some(message) => Err(PersistenceError::LibraryWrite(message.clone())),
            None => Ok(None),
        }
    }
}
