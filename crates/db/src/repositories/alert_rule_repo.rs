//! Repository for the notification columns of the `alert_rules` table.

use autoroute_core::OrgId;
use sqlx::PgPool;

use crate::models::alert_rule::AlertRuleNotificationRow;

/// Column list for notification settings queries.
const NOTIFICATION_COLUMNS: &str = "org_id, uid, notification_settings";

/// Read-only queries over alert rule notification settings.
pub struct AlertRuleRepo;

impl AlertRuleRepo {
    /// List every rule of an organization that declares notification
    /// settings.
    pub async fn list_with_notification_settings(
        pool: &PgPool,
        org_id: OrgId,
    ) -> Result<Vec<AlertRuleNotificationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM alert_rules \
             WHERE org_id = $1 \
               AND notification_settings IS NOT NULL \
               AND jsonb_array_length(notification_settings) > 0 \
             ORDER BY uid"
        );
        sqlx::query_as::<_, AlertRuleNotificationRow>(&query)
            .bind(org_id)
            .fetch_all(pool)
            .await
    }
}
