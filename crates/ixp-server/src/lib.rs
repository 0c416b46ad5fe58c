//! IXP Digital Twin Server
//!
//! REST surface over the config/resource store plus lab control proxied to
//! the external orchestrator.
//!
//! # Architecture
//!
//! ```text
//! warp routes ──► ArtifactStore ──► NamespaceStore ──► FsRepository
//!      │                                 └── ConfigValidator (configs only)
//!      └────────► OrchestratorClient / LabMonitor snapshots
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{AppConfig, ConfigError, ServerConfig, ValidationConfig};
pub use routes::routes;
pub use server::{Server, ServerError};
pub use state::AppState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
