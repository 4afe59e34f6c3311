//! One synchronization pass for an organization.
//!
//! [`AutogenSync`] ties the pieces together: strip the subtree merged by a
//! previous pass, collect settings, build the new subtree and merge it. The
//! aggregate fingerprint lets the caller skip persisting a configuration
//! whose generated part did not change.

use autoroute_core::labels::AUTOGENERATED_ROUTE_LABEL;
use autoroute_core::{Fingerprint, OrgId, RoutingConfig};
use tokio_util::sync::CancellationToken;

use crate::builder::build_route;
use crate::collector::SettingsCollector;
use crate::error::EngineError;
use crate::merge::remove_autogenerated;
use crate::store::NotificationSettingsStore;
use crate::validator::ConfigValidator;

/// What a pass did to the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Generated routing is identical to the previous pass; the configuration
    /// was not modified and need not be written.
    Unchanged { fingerprint: Fingerprint },
    /// A new subtree replaced whatever was merged before.
    Updated {
        fingerprint: Fingerprint,
        unique_settings: usize,
    },
    /// No rule needs custom routing any more; old generated routes were
    /// removed.
    Cleared,
}

impl SyncOutcome {
    /// Whether the configuration must be persisted.
    pub fn is_modified(&self) -> bool {
        !matches!(self, SyncOutcome::Unchanged { .. })
    }

    /// Fingerprint to store for the next pass.
    pub fn fingerprint(&self) -> Fingerprint {
        match self {
            SyncOutcome::Unchanged { fingerprint } | SyncOutcome::Updated { fingerprint, .. } => {
                *fingerprint
            }
            SyncOutcome::Cleared => Fingerprint::ZERO,
        }
    }
}

pub struct AutogenSync<'a> {
    store: &'a dyn NotificationSettingsStore,
}

impl<'a> AutogenSync<'a> {
    pub fn new(store: &'a dyn NotificationSettingsStore) -> Self {
        Self { store }
    }

    /// Regenerate the autogenerated routes of `org_id` inside `config`.
    ///
    /// Settings are validated against `config` itself: a rule pointing at a
    /// receiver or mute timing that does not exist is skipped. `previous` is
    /// the fingerprint returned by the last pass, if any.
    pub async fn sync(
        &self,
        org_id: OrgId,
        default_receiver: &str,
        config: &mut RoutingConfig,
        previous: Option<Fingerprint>,
        cancel: &CancellationToken,
    ) -> Result<SyncOutcome, EngineError> {
        if config.route.is_none() {
            return Err(EngineError::MissingRootRoute);
        }

        let validator = ConfigValidator::from_config(config);
        let settings = SettingsCollector::new(self.store, &validator)
            .collect(org_id, cancel)
            .await?;
        let unique_settings = settings.len();
        let generated = build_route(default_receiver, &settings)?;
        let fingerprint = generated.fingerprint;

        if generated.is_empty() {
            let removed = remove_autogenerated(config);
            if removed == 0 {
                tracing::debug!(org_id, "No autogenerated routes needed");
                return Ok(SyncOutcome::Unchanged { fingerprint });
            }
            tracing::info!(org_id, removed, "Removed autogenerated routes");
            return Ok(SyncOutcome::Cleared);
        }

        if previous == Some(fingerprint) && autogenerated_is_current(config) {
            tracing::debug!(org_id, %fingerprint, "Autogenerated routes unchanged");
            return Ok(SyncOutcome::Unchanged { fingerprint });
        }

        remove_autogenerated(config);
        generated.add_to_config(config)?;
        tracing::info!(
            org_id,
            %fingerprint,
            unique_settings,
            "Updated autogenerated routes"
        );
        Ok(SyncOutcome::Updated {
            fingerprint,
            unique_settings,
        })
    }
}

/// A generated subtree is merged and still inherits the root's receiver.
fn autogenerated_is_current(config: &RoutingConfig) -> bool {
    config.route.as_ref().is_some_and(|root| {
        root.routes.iter().any(|r| {
            r.has_equal_matcher(AUTOGENERATED_ROUTE_LABEL, "true") && r.receiver == root.receiver
        })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
