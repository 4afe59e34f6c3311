//! Read-only access to per-rule notification settings.

use std::collections::HashMap;

use async_trait::async_trait;
use autoroute_core::{NotificationSettings, OrgId, RuleKey};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Settings grouped by the rule that declared them, in declaration order.
pub type RuleSettings = HashMap<RuleKey, Vec<NotificationSettings>>;

/// Source of the notification settings of every alert rule in an
/// organization.
#[async_trait]
pub trait NotificationSettingsStore: Send + Sync {
    async fn list_notification_settings(&self, org_id: OrgId) -> Result<RuleSettings, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store backed by a map, for embedding callers that already hold the rules
/// in memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    rules: RwLock<HashMap<OrgId, RuleSettings>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the settings of one rule.
    pub async fn set_rule(&self, key: RuleKey, settings: Vec<NotificationSettings>) {
        let mut rules = self.rules.write().await;
        rules.entry(key.org_id).or_default().insert(key, settings);
    }

    /// Remove a rule. Returns whether it existed.
    pub async fn remove_rule(&self, key: &RuleKey) -> bool {
        let mut rules = self.rules.write().await;
        rules
            .get_mut(&key.org_id)
            .is_some_and(|org| org.remove(key).is_some())
    }
}

#[async_trait]
impl NotificationSettingsStore for InMemorySettingsStore {
    async fn list_notification_settings(&self, org_id: OrgId) -> Result<RuleSettings, StoreError> {
        let rules = self.rules.read().await;
        Ok(rules.get(&org_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_only_the_requested_org() {
        let store = InMemorySettingsStore::new();
        store
            .set_rule(RuleKey::new(1, "a"), vec![NotificationSettings::new("slack")])
            .await;
        store
            .set_rule(RuleKey::new(2, "b"), vec![NotificationSettings::new("email")])
            .await;

        let org1 = store.list_notification_settings(1).await.unwrap();
        assert_eq!(org1.len(), 1);
        assert!(org1.contains_key(&RuleKey::new(1, "a")));

        assert!(store.list_notification_settings(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_rule_reports_existence() {
        let store = InMemorySettingsStore::new();
        let key = RuleKey::new(1, "a");
        store.set_rule(key.clone(), vec![]).await;

        assert!(store.remove_rule(&key).await);
        assert!(!store.remove_rule(&key).await);
    }
}
