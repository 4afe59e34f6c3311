//! Well-known label name constants.
//!
//! These are part of the contract with the downstream alert dispatcher:
//! alerts produced by rules with custom notification settings carry these
//! labels, and the generated routes match on them. Changing any of them
//! breaks routing for every already-firing alert.

/// Set to `"true"` on every alert whose rule opts into autogenerated routing.
pub const AUTOGENERATED_ROUTE_LABEL: &str = "__autogenerated__";

/// Carries the receiver name chosen by the rule.
pub const AUTOGENERATED_ROUTE_RECEIVER_NAME_LABEL: &str = "__receiver__";

/// Carries the hex fingerprint of the rule's notification settings.
pub const AUTOGENERATED_ROUTE_SETTINGS_HASH_LABEL: &str = "__settings_hash__";

/// Title of the folder the alert rule lives in.
pub const FOLDER_TITLE_LABEL: &str = "folder";

/// Name of the alert rule.
pub const ALERT_NAME_LABEL: &str = "alertname";

/// Special group-by value meaning "group by every label".
pub const GROUP_BY_ALL: &str = "...";

/// Grouping applied to every receiver branch so that rules from different
/// folders sharing one receiver still group sensibly.
pub const DEFAULT_RECEIVER_GROUP_BY: [&str; 2] = [FOLDER_TITLE_LABEL, ALERT_NAME_LABEL];
