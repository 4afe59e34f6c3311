//! Alertmanager-shaped routing configuration.
//!
//! Only the parts of the configuration this workspace reasons about are
//! modelled as typed fields. Everything else (receiver integrations, inhibit
//! rules, templates, unknown route keys) is kept in flattened `extra` maps so
//! a user-authored configuration survives a read-modify-write untouched.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::duration::PromDuration;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "=~")]
    Regexp,
    #[serde(rename = "!~")]
    NotRegexp,
}

/// A label condition. Serialized as a `[name, op, value]` triple, the
/// `object_matchers` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matcher {
    pub name: String,
    pub match_type: MatchType,
    pub value: String,
}

impl Matcher {
    /// Build a matcher, rejecting label names the dispatcher would not accept.
    pub fn new(
        match_type: MatchType,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        validate_label_name(&name)?;
        Ok(Self {
            name,
            match_type,
            value: value.into(),
        })
    }

    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Result<Self, CoreError> {
        Self::new(MatchType::Equal, name, value)
    }

    /// True if this is an equality matcher on `name` with `value`.
    pub fn is_equal(&self, name: &str, value: &str) -> bool {
        self.match_type == MatchType::Equal && self.name == name && self.value == value
    }
}

fn validate_label_name(name: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidMatcher {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("label name is empty")),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Err(invalid("label name must start with a letter or underscore"))
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(
            "label name may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

impl Serialize for Matcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.match_type)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Matcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MatcherVisitor;

        impl<'de> Visitor<'de> for MatcherVisitor {
            type Value = Matcher;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a [name, op, value] matcher triple")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Matcher, A::Error> {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let match_type: MatchType = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let value: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                Ok(Matcher {
                    name,
                    match_type,
                    value,
                })
            }
        }

        deserializer.deserialize_tuple(3, MatcherVisitor)
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// A node in the routing tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteNode {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub receiver: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_matchers: Vec<Matcher>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,
    /// Keep evaluating sibling routes after this one matched.
    #[serde(default, rename = "continue", skip_serializing_if = "is_false")]
    pub continue_matching: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<PromDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<PromDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<PromDuration>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteNode {
    pub fn has_equal_matcher(&self, name: &str, value: &str) -> bool {
        self.object_matchers.iter().any(|m| m.is_equal(name, value))
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

// ---------------------------------------------------------------------------
// Configuration root
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuteTimeInterval {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The user-owned routing configuration the generated tree is merged into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receivers: Vec<Receiver>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<MuteTimeInterval>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_intervals: Vec<MuteTimeInterval>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoutingConfig {
    pub fn receiver_names(&self) -> impl Iterator<Item = &str> {
        self.receivers.iter().map(|r| r.name.as_str())
    }

    /// Names of every time interval usable as a mute timing.
    pub fn time_interval_names(&self) -> impl Iterator<Item = &str> {
        self.mute_time_intervals
            .iter()
            .chain(self.time_intervals.iter())
            .map(|i| i.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn matcher_serializes_as_triple() {
        let m = Matcher::equal("__receiver__", "slack").unwrap();
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            serde_json::json!(["__receiver__", "=", "slack"])
        );
    }

    #[test]
    fn matcher_parses_triple() {
        let m: Matcher = serde_json::from_str(r#"["team", "=~", "ops|sre"]"#).unwrap();
        assert_eq!(m.name, "team");
        assert_eq!(m.match_type, MatchType::Regexp);
        assert_eq!(m.value, "ops|sre");
    }

    #[test]
    fn invalid_label_names_are_rejected() {
        assert_matches!(Matcher::equal("", "x"), Err(CoreError::InvalidMatcher { .. }));
        assert_matches!(Matcher::equal("1abc", "x"), Err(CoreError::InvalidMatcher { .. }));
        assert_matches!(
            Matcher::equal("has-dash", "x"),
            Err(CoreError::InvalidMatcher { .. })
        );
        assert!(Matcher::equal("__autogenerated__", "true").is_ok());
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let raw = serde_json::json!({
            "route": {
                "receiver": "default",
                "matchers": ["severity=\"critical\""],
                "routes": [
                    { "receiver": "pager", "continue": true, "active_time_intervals": ["work"] }
                ]
            },
            "receivers": [
                { "name": "default", "email_configs": [{ "to": "ops@example.com" }] }
            ],
            "inhibit_rules": [{ "equal": ["alertname"] }],
            "templates": []
        });

        let config: RoutingConfig = serde_json::from_value(raw.clone()).unwrap();
        let route = config.route.as_ref().unwrap();
        assert_eq!(route.receiver, "default");
        assert!(route.routes[0].continue_matching);
        assert!(route.extra.contains_key("matchers"));

        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn false_continue_and_empty_lists_are_omitted() {
        let node = RouteNode {
            receiver: "slack".into(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({ "receiver": "slack" })
        );
    }

    #[test]
    fn time_interval_names_cover_both_lists() {
        let config: RoutingConfig = serde_json::from_value(serde_json::json!({
            "mute_time_intervals": [{ "name": "weekends" }],
            "time_intervals": [{ "name": "nights" }]
        }))
        .unwrap();
        let names: Vec<&str> = config.time_interval_names().collect();
        assert_eq!(names, vec!["weekends", "nights"]);
    }
}
