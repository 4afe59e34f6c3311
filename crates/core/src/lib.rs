//! Domain types for autogenerated notification routing.
//!
//! Everything in this crate is pure data and pure logic: notification
//! settings, content fingerprints, and the Alertmanager-shaped routing
//! configuration the engine reads and writes. No I/O happens here.

pub mod duration;
pub mod error;
pub mod fingerprint;
pub mod labels;
pub mod route;
pub mod settings;
pub mod types;

pub use duration::PromDuration;
pub use error::CoreError;
pub use fingerprint::{aggregate_fingerprint, Fingerprint, Fnv64};
pub use route::{MatchType, Matcher, MuteTimeInterval, Receiver, RouteNode, RoutingConfig};
pub use settings::NotificationSettings;
pub use types::{OrgId, RuleKey};
