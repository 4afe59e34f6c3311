use anyhow::Context;
use autoroute_core::OrgId;
use autoroute_engine::{AutogenSync, NotificationSettingsStore, SyncOutcome};
use tokio_util::sync::CancellationToken;

use crate::files::ConfigFiles;

/// Synchronize one organization's routing configuration file.
///
/// The file is rewritten only when the generated routes changed since the
/// fingerprint recorded by the previous run.
pub async fn sync_org(
    store: &dyn NotificationSettingsStore,
    files: &ConfigFiles,
    org_id: OrgId,
    default_receiver: &str,
    cancel: &CancellationToken,
) -> anyhow::Result<SyncOutcome> {
    let mut config = files
        .load_config(org_id)
        .context("failed to load routing configuration")?;
    let previous = files
        .load_fingerprint(org_id)
        .context("failed to load previous fingerprint")?;

    let outcome = AutogenSync::new(store)
        .sync(org_id, default_receiver, &mut config, previous, cancel)
        .await
        .with_context(|| format!("failed to synchronize org {org_id}"))?;

    if outcome.is_modified() {
        files
            .save(org_id, &config, outcome.fingerprint())
            .context("failed to save routing configuration")?;
        tracing::info!(
            org_id,
            fingerprint = %outcome.fingerprint(),
            path = %files.config_path(org_id).display(),
            "Wrote routing configuration"
        );
    }

    Ok(outcome)
}
