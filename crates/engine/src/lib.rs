//! Autogenerated notification routing.
//!
//! Turns per-rule notification settings into a three-level routing subtree
//! and merges it into a user-owned routing configuration:
//!
//! - [`SettingsCollector`]: reads settings from a [`NotificationSettingsStore`],
//!   drops invalid entries and deduplicates by fingerprint.
//! - [`build_route`]: builds the subtree and its aggregate fingerprint.
//! - [`AutogeneratedRoute::add_to_config`]: splices the subtree into the
//!   configuration ahead of user routes.
//! - [`AutogenSync`]: one full pass for an organization, reporting whether
//!   anything changed since the last stored fingerprint.

pub mod builder;
pub mod collector;
pub mod error;
pub mod merge;
pub mod store;
pub mod sync;
pub mod validator;

pub use builder::{build_route, AutogeneratedRoute};
pub use collector::SettingsCollector;
pub use error::{EngineError, StoreError};
pub use merge::{merge_route, remove_autogenerated};
pub use store::{InMemorySettingsStore, NotificationSettingsStore, RuleSettings};
pub use sync::{AutogenSync, SyncOutcome};
pub use validator::{ConfigValidator, IntrinsicValidator, SettingsValidator};
