//! IXP Lab Orchestrator Client
//!
//! Thin client for the external orchestrator that builds and runs the IXP
//! Digital Twin lab, plus a [`LabMonitor`] that reproduces the dashboard's
//! polling: `running` every few seconds and, while a lab is up, `devices`.
//! An unreachable or non-success `running` endpoint reads as stopped.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod client;
mod config;
mod error;
mod monitor;
mod types;

pub use client::OrchestratorClient;
pub use config::OrchestratorConfig;
pub use error::OrchestratorError;
pub use monitor::{LabMonitor, LabSnapshot, MonitorHandle};
pub use types::{DeviceStats, LabStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
