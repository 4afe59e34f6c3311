//! Per-rule notification settings.
//!
//! A rule that opts into autogenerated routing names a receiver and may
//! override the grouping and timing behaviour of its notifications.

use std::hash::Hasher;

use serde::{Deserialize, Deserializer, Serialize};

use crate::duration::PromDuration;
use crate::error::CoreError;
use crate::fingerprint::{Fingerprint, Fnv64, FIELD_SEPARATOR};
use crate::labels::{ALERT_NAME_LABEL, FOLDER_TITLE_LABEL, GROUP_BY_ALL};

/// One rule's notification preferences.
///
/// Absent and empty lists are the same value: both deserialize to an empty
/// `Vec` and hash identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Name of the receiver alerts from this rule are delivered to.
    pub receiver: String,
    /// Labels to group alerts by. Empty means "use the receiver default".
    #[serde(
        default,
        deserialize_with = "nullable_vec",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub group_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<PromDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<PromDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<PromDuration>,
    /// Names of mute time intervals applied to this rule's notifications.
    #[serde(
        default,
        deserialize_with = "nullable_vec",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mute_time_intervals: Vec<String>,
}

impl NotificationSettings {
    /// Settings that only pick a receiver.
    pub fn new(receiver: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            ..Default::default()
        }
    }

    /// True when no optional field is set, i.e. the settings only select a
    /// receiver and need no dedicated route.
    pub fn is_all_default(&self) -> bool {
        self.group_by.is_empty()
            && self.group_wait.is_none()
            && self.group_interval.is_none()
            && self.repeat_interval.is_none()
            && self.mute_time_intervals.is_empty()
    }

    /// Stable content fingerprint.
    ///
    /// Field order is fixed: receiver, group-by labels, group wait, group
    /// interval, repeat interval, mute time intervals. Every field is
    /// terminated by the 0xFF separator; an unset duration is written as a
    /// lone separator.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut h = Fnv64::new();

        h.write_field(self.receiver.as_bytes());
        for label in &self.group_by {
            h.write_field(label.as_bytes());
        }
        for duration in [&self.group_wait, &self.group_interval, &self.repeat_interval] {
            match duration {
                Some(d) => h.write_field(&d.as_nanos_u64().to_le_bytes()),
                None => h.write_u8(FIELD_SEPARATOR),
            }
        }
        for interval in &self.mute_time_intervals {
            h.write_field(interval.as_bytes());
        }

        h.fingerprint()
    }

    /// Intrinsic checks that do not depend on the surrounding configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.receiver.is_empty() {
            return Err(CoreError::Validation("receiver must be specified".into()));
        }

        if !self.group_by.is_empty() && !self.group_by.iter().any(|l| l == GROUP_BY_ALL) {
            let has_alert_name = self.group_by.iter().any(|l| l == ALERT_NAME_LABEL);
            let has_folder = self.group_by.iter().any(|l| l == FOLDER_TITLE_LABEL);
            if !has_alert_name || !has_folder {
                return Err(CoreError::Validation(format!(
                    "group by override must contain two required labels: \
                     '{ALERT_NAME_LABEL}' and '{FOLDER_TITLE_LABEL}'"
                )));
            }
        }

        if self.group_interval.is_some_and(|d| d.is_zero()) {
            return Err(CoreError::Validation(
                "group interval override must be a positive duration".into(),
            ));
        }
        if self.repeat_interval.is_some_and(|d| d.is_zero()) {
            return Err(CoreError::Validation(
                "repeat interval override must be a positive duration".into(),
            ));
        }

        if self.mute_time_intervals.iter().any(String::is_empty) {
            return Err(CoreError::Validation(
                "mute time interval name cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Treat an explicit JSON `null` the same as an absent list.
fn nullable_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn full_settings() -> NotificationSettings {
        NotificationSettings {
            receiver: "slack".into(),
            group_by: vec![FOLDER_TITLE_LABEL.into(), ALERT_NAME_LABEL.into(), "team".into()],
            group_wait: Some(PromDuration::from_secs(30)),
            group_interval: Some(PromDuration::from_secs(300)),
            repeat_interval: Some(PromDuration::from_secs(14_400)),
            mute_time_intervals: vec!["weekends".into()],
        }
    }

    // -- is_all_default ------------------------------------------------------

    #[test]
    fn receiver_only_is_all_default() {
        assert!(NotificationSettings::new("slack").is_all_default());
    }

    #[test]
    fn any_override_is_not_default() {
        let mut s = NotificationSettings::new("slack");
        s.group_wait = Some(PromDuration::from_secs(0));
        assert!(!s.is_all_default());

        let mut s = NotificationSettings::new("slack");
        s.mute_time_intervals = vec!["nights".into()];
        assert!(!s.is_all_default());
    }

    // -- fingerprint ---------------------------------------------------------

    #[test]
    fn fingerprint_is_pinned() {
        // Changing this value invalidates every stored route fingerprint.
        assert_eq!(
            NotificationSettings::new("slack").fingerprint(),
            Fingerprint(0xb1a0_c4c3_0a29_8607)
        );
    }

    #[test]
    fn equal_content_gives_equal_fingerprint() {
        assert_eq!(full_settings().fingerprint(), full_settings().fingerprint());
    }

    #[test]
    fn every_field_contributes() {
        let base = full_settings().fingerprint();

        let mut s = full_settings();
        s.receiver = "email".into();
        assert_ne!(s.fingerprint(), base);

        let mut s = full_settings();
        s.group_by.pop();
        assert_ne!(s.fingerprint(), base);

        let mut s = full_settings();
        s.group_wait = None;
        assert_ne!(s.fingerprint(), base);

        let mut s = full_settings();
        s.repeat_interval = Some(PromDuration::from_secs(3600));
        assert_ne!(s.fingerprint(), base);

        let mut s = full_settings();
        s.mute_time_intervals.clear();
        assert_ne!(s.fingerprint(), base);
    }

    #[test]
    fn duration_slots_are_not_interchangeable() {
        let mut wait = NotificationSettings::new("slack");
        wait.group_wait = Some(PromDuration::from_secs(30));
        let mut interval = NotificationSettings::new("slack");
        interval.group_interval = Some(PromDuration::from_secs(30));
        assert_ne!(wait.fingerprint(), interval.fingerprint());
    }

    #[test]
    fn null_and_missing_lists_hash_identically() {
        let missing: NotificationSettings =
            serde_json::from_str(r#"{"receiver":"slack"}"#).unwrap();
        let null: NotificationSettings =
            serde_json::from_str(r#"{"receiver":"slack","group_by":null,"mute_time_intervals":null}"#)
                .unwrap();
        let empty: NotificationSettings =
            serde_json::from_str(r#"{"receiver":"slack","group_by":[]}"#).unwrap();

        assert_eq!(missing.fingerprint(), null.fingerprint());
        assert_eq!(missing.fingerprint(), empty.fingerprint());
        assert!(null.is_all_default());
    }

    // -- validate ------------------------------------------------------------

    #[test]
    fn valid_settings_pass() {
        assert!(full_settings().validate().is_ok());
        assert!(NotificationSettings::new("slack").validate().is_ok());
    }

    #[test]
    fn empty_receiver_is_rejected() {
        assert_matches!(
            NotificationSettings::new("").validate(),
            Err(CoreError::Validation(msg)) if msg.contains("receiver")
        );
    }

    #[test]
    fn group_by_must_keep_required_labels() {
        let mut s = NotificationSettings::new("slack");
        s.group_by = vec!["team".into()];
        assert_matches!(s.validate(), Err(CoreError::Validation(_)));

        s.group_by = vec![GROUP_BY_ALL.into()];
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let mut s = NotificationSettings::new("slack");
        s.group_interval = Some(PromDuration::default());
        assert_matches!(s.validate(), Err(CoreError::Validation(_)));

        let mut s = NotificationSettings::new("slack");
        s.repeat_interval = Some(PromDuration::default());
        assert_matches!(s.validate(), Err(CoreError::Validation(_)));

        let mut s = NotificationSettings::new("slack");
        s.group_wait = Some(PromDuration::default());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn blank_mute_interval_is_rejected() {
        let mut s = NotificationSettings::new("slack");
        s.mute_time_intervals = vec![String::new()];
        assert_matches!(s.validate(), Err(CoreError::Validation(_)));
    }
}
