//! Validity checks applied to each settings object before it is routed.

use std::collections::HashSet;

use autoroute_core::{CoreError, NotificationSettings, RoutingConfig};

pub trait SettingsValidator: Send + Sync {
    fn validate(&self, settings: &NotificationSettings) -> Result<(), CoreError>;
}

/// Only the checks that need no outside context.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicValidator;

impl SettingsValidator for IntrinsicValidator {
    fn validate(&self, settings: &NotificationSettings) -> Result<(), CoreError> {
        settings.validate()
    }
}

/// Intrinsic checks plus existence of the referenced receiver and mute time
/// intervals in a routing configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigValidator {
    receivers: HashSet<String>,
    time_intervals: HashSet<String>,
}

impl ConfigValidator {
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            receivers: config.receiver_names().map(str::to_string).collect(),
            time_intervals: config.time_interval_names().map(str::to_string).collect(),
        }
    }
}

impl SettingsValidator for ConfigValidator {
    fn validate(&self, settings: &NotificationSettings) -> Result<(), CoreError> {
        settings.validate()?;

        if !self.receivers.contains(&settings.receiver) {
            return Err(CoreError::Validation(format!(
                "receiver '{}' does not exist",
                settings.receiver
            )));
        }
        if let Some(missing) = settings
            .mute_time_intervals
            .iter()
            .find(|name| !self.time_intervals.contains(*name))
        {
            return Err(CoreError::Validation(format!(
                "mute time interval '{missing}' does not exist"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config() -> RoutingConfig {
        serde_json::from_value(serde_json::json!({
            "route": { "receiver": "default" },
            "receivers": [{ "name": "default" }, { "name": "slack" }],
            "mute_time_intervals": [{ "name": "weekends" }]
        }))
        .unwrap()
    }

    #[test]
    fn known_receiver_and_interval_pass() {
        let mut s = NotificationSettings::new("slack");
        s.mute_time_intervals = vec!["weekends".into()];
        assert!(ConfigValidator::from_config(&config()).validate(&s).is_ok());
    }

    #[test]
    fn unknown_receiver_fails() {
        let v = ConfigValidator::from_config(&config());
        assert_matches!(
            v.validate(&NotificationSettings::new("pagerduty")),
            Err(CoreError::Validation(msg)) if msg.contains("pagerduty")
        );
    }

    #[test]
    fn unknown_mute_interval_fails() {
        let mut s = NotificationSettings::new("slack");
        s.mute_time_intervals = vec!["holidays".into()];
        assert_matches!(
            ConfigValidator::from_config(&config()).validate(&s),
            Err(CoreError::Validation(msg)) if msg.contains("holidays")
        );
    }

    #[test]
    fn intrinsic_checks_still_apply() {
        assert_matches!(
            ConfigValidator::from_config(&config()).validate(&NotificationSettings::new("")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            IntrinsicValidator.validate(&NotificationSettings::new("")),
            Err(CoreError::Validation(_))
        );
    }
}
