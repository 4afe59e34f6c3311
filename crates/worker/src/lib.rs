//! Periodic-job entry points for synchronizing autogenerated routes.
//!
//! The binary in `main.rs` wires these to PostgreSQL and the filesystem;
//! everything here takes its collaborators as arguments.

pub mod config;
pub mod files;
pub mod runner;

pub use config::WorkerConfig;
pub use files::ConfigFiles;
pub use runner::sync_org;
