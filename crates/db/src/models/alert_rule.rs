//! Alert rule rows as far as notification routing is concerned.

use autoroute_core::{NotificationSettings, OrgId, RuleKey};
use sqlx::types::Json;
use sqlx::FromRow;

/// The notification columns of a row from the `alert_rules` table.
///
/// `notification_settings` is a JSONB array; rules without custom routing
/// store `NULL` or an empty array.
#[derive(Debug, Clone, FromRow)]
pub struct AlertRuleNotificationRow {
    pub org_id: OrgId,
    pub uid: String,
    pub notification_settings: Option<Json<Vec<NotificationSettings>>>,
}

impl AlertRuleNotificationRow {
    /// Split into the rule identity and its settings, in stored order.
    pub fn into_rule_settings(self) -> (RuleKey, Vec<NotificationSettings>) {
        let settings = self
            .notification_settings
            .map(|Json(settings)| settings)
            .unwrap_or_default();
        (RuleKey::new(self.org_id, self.uid), settings)
    }
}
