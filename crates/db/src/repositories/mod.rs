//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod alert_rule_repo;

pub use alert_rule_repo::AlertRuleRepo;
