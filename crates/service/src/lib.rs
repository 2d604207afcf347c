//! Serving layer for the media gate.
//!
//! This crate provides what the core in `common` needs from a host:
//! - Database (SQLite with a ContentProvider implementation)
//! - Configuration (TOML file with defaults)
//! - State management (ServiceState for the gate + database)
//! - Rule persistence (`.htaccess` block writer)
//! - HTTP handlers (gated endpoint, robots.txt, admin API, health checks)

pub mod config;
pub mod database;
pub mod htaccess;
pub mod http;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use database::{Database, DatabaseSetupError};
pub use htaccess::HtaccessSink;
pub use state::{State as ServiceState, StateSetupError};
