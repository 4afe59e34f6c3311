//! Gathers the unique, valid notification settings of an organization.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use autoroute_core::{Fingerprint, NotificationSettings, OrgId};
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::store::NotificationSettingsStore;
use crate::validator::SettingsValidator;

/// Reads every rule's settings from the store and reduces them to one entry
/// per fingerprint.
pub struct SettingsCollector<'a> {
    store: &'a dyn NotificationSettingsStore,
    validator: &'a dyn SettingsValidator,
}

impl<'a> SettingsCollector<'a> {
    pub fn new(
        store: &'a dyn NotificationSettingsStore,
        validator: &'a dyn SettingsValidator,
    ) -> Self {
        Self { store, validator }
    }

    /// Collect the deduplicated settings of `org_id`.
    ///
    /// Invalid settings are logged and skipped. When two rules carry the same
    /// settings the first one seen is kept; rules are visited in key order so
    /// that choice is stable between runs. An empty map means no rule uses
    /// custom notification routing. Only a failing or cancelled store query
    /// is an error.
    pub async fn collect(
        &self,
        org_id: OrgId,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<Fingerprint, NotificationSettings>, EngineError> {
        let by_rule = tokio::select! {
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
            listed = self.store.list_notification_settings(org_id) => listed?,
        };

        let mut rules: Vec<_> = by_rule.into_iter().collect();
        rules.sort_by(|a, b| a.0.cmp(&b.0));

        let mut unique = BTreeMap::new();
        let mut skipped = 0usize;
        for (rule, settings) in rules {
            for setting in settings {
                if let Err(e) = self.validator.validate(&setting) {
                    tracing::warn!(
                        org_id = rule.org_id,
                        rule_uid = %rule.uid,
                        error = %e,
                        "Rule notification settings are invalid, skipping"
                    );
                    skipped += 1;
                    continue;
                }
                if let Entry::Vacant(slot) = unique.entry(setting.fingerprint()) {
                    slot.insert(setting);
                }
            }
        }

        tracing::debug!(
            org_id,
            unique = unique.len(),
            skipped,
            "Collected notification settings"
        );
        Ok(unique)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
