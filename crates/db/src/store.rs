//! PostgreSQL implementation of [`NotificationSettingsStore`].

use async_trait::async_trait;
use autoroute_core::OrgId;
use autoroute_engine::{NotificationSettingsStore, RuleSettings, StoreError};

use crate::repositories::AlertRuleRepo;
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgSettingsStore {
    pool: DbPool,
}

impl PgSettingsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSettingsStore for PgSettingsStore {
    async fn list_notification_settings(&self, org_id: OrgId) -> Result<RuleSettings, StoreError> {
        let rows = AlertRuleRepo::list_with_notification_settings(&self.pool, org_id)
            .await
            .map_err(|e| StoreError::Backend(Box::new(e)))?;

        tracing::debug!(org_id, rules = rows.len(), "Loaded rule notification settings");
        Ok(rows
            .into_iter()
            .map(|row| row.into_rule_settings())
            .collect())
    }
}
