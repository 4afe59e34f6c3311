use std::path::PathBuf;

use autoroute_core::OrgId;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} contains an invalid organization id '{value}'")]
    InvalidOrgId { name: &'static str, value: String },

    #[error("invalid worker configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone, Validate)]
pub struct WorkerConfig {
    #[validate(length(min = 1, message = "DATABASE_URL must not be empty"))]
    pub database_url: String,
    /// Organizations to synchronize, in order.
    #[validate(length(min = 1, message = "ORG_IDS must list at least one organization"))]
    pub org_ids: Vec<OrgId>,
    /// Receiver of the generated root route before it is merged.
    #[validate(length(min = 1, message = "DEFAULT_RECEIVER must not be empty"))]
    pub default_receiver: String,
    /// Directory holding `<org_id>.json` and `<org_id>.fingerprint`.
    pub config_dir: PathBuf,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default     |
    /// |----------------------|-------------|
    /// | `DATABASE_URL`       | (required)  |
    /// | `ORG_IDS`            | (required)  |
    /// | `DEFAULT_RECEIVER`   | `default`   |
    /// | `ROUTING_CONFIG_DIR` | `./routing` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let org_ids = lookup("ORG_IDS")
            .ok_or(ConfigError::Missing("ORG_IDS"))?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<OrgId>().map_err(|_| ConfigError::InvalidOrgId {
                    name: "ORG_IDS",
                    value: s.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let default_receiver = lookup("DEFAULT_RECEIVER").unwrap_or_else(|| "default".into());

        let config_dir = lookup("ROUTING_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./routing"));

        let config = Self {
            database_url,
            org_ids,
            default_receiver,
            config_dir,
        };
        config.validate()?;
        Ok(config)
    }
}
