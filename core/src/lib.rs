#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

//! Client library for the Simplenote note service, speaking both the legacy
//! `api2` protocol and the Simperium bucket api.

pub mod client;
pub mod config;
pub mod error;
pub mod incremental;
pub mod index;
pub mod models;
pub mod session;
pub mod transport;
pub mod urls;
pub mod wire;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use client::{LegacyClient, ListOptions, NoteSource, SimperiumClient};
pub use config::{ClientConfig, Endpoints, DEFAULT_APP_ID};
pub use error::{Error, Result};
pub use incremental::{DownloadMode, DownloadStats, IncrementalCoordinator, SeenSet};
pub use models::{Note, NoteInfo, SnapshotKey};
pub use session::Credentials;
pub use transport::WIRE_TARGET;
