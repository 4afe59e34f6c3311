use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoroute_db::PgSettingsStore;
use autoroute_worker::{sync_org, ConfigFiles, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoroute_worker=debug,autoroute_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env().expect("Invalid worker configuration");
    tracing::info!(
        orgs = config.org_ids.len(),
        dir = %config.config_dir.display(),
        "Loaded worker configuration"
    );

    // --- Database ---
    let pool = autoroute_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    autoroute_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection pool created");

    let store = PgSettingsStore::new(pool);
    let files = ConfigFiles::new(&config.config_dir);

    // --- Cancellation ---
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, cancelling sync");
                cancel.cancel();
            }
        });
    }

    // --- Sync ---
    let mut failures = 0usize;
    for &org_id in &config.org_ids {
        match sync_org(&store, &files, org_id, &config.default_receiver, &cancel).await {
            Ok(outcome) => tracing::info!(org_id, ?outcome, "Org synchronized"),
            Err(e) => {
                tracing::error!(org_id, error = %format!("{e:#}"), "Failed to synchronize org");
                failures += 1;
            }
        }
        if cancel.is_cancelled() {
            break;
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
