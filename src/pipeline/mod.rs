// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipeline: bootstrap, negotiation, settings, completion
//!
//! ```text
//! ┌────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │ PermissionGate │ ─▶ │ SessionBootstrap │ ─▶ │   Negotiator    │
//! └────────────────┘    └──────────────────┘    └────────┬────────┘
//!                                                        │ cached
//!                       shutter press                    ▼
//!                      ┌──────────────────┐    ┌─────────────────┐
//!                      │ SettingsBuilder  │ ◀─ │ DeviceCapabilities│
//!                      └────────┬─────────┘    └─────────────────┘
//!                               │ submit
//!                               ▼
//!                      ┌──────────────────┐    ┌─────────────────┐
//!                      │   Coordinator    │ ─▶ │  Asset Library  │
//!                      └──────────────────┘    └─────────────────┘
//! ```
//!
//! The permission gate gates bootstrap; bootstrap success unlocks the
//! negotiator, whose cached snapshot feeds the settings builder on every
//! shutter press; the builder's output goes to the device backend, whose two
//! unordered completion signals are correlated by the coordinator into one
//! persisted asset.

pub mod capabilities;
pub mod coordinator;
pub mod session;
pub mod settings;
