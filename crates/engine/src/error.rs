use autoroute_core::CoreError;

/// Failure reported by a [`NotificationSettingsStore`](crate::NotificationSettingsStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to list notification settings: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build {stage} matcher: {source}")]
    Matcher {
        stage: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("invalid routing configuration: the root route does not exist")]
    MissingRootRoute,

    #[error("synchronization cancelled")]
    Cancelled,
}
