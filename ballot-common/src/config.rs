//! Configuration loading and database path resolution

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable naming the database file
pub const DATABASE_ENV_VAR: &str = "BALLOT_DATABASE";

/// Database location used when nothing else is configured
pub const DEFAULT_DATABASE_PATH: &str = "./db/election.db";

/// Whether a voter may cast more than one ballot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePolicy {
    /// Every ballot is recorded, including repeats from the same voter
    #[default]
    Unrestricted,
    /// A second ballot from the same voter is rejected with `DuplicateVote`
    OneVotePerVoter,
}

/// Behavior switches for the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Have SQLite reject dangling `party_id` / `candidate_id` references
    pub enforce_foreign_keys: bool,
    pub vote_policy: VotePolicy,
    /// Deadline applied to each store operation; 0 disables it
    pub operation_timeout_ms: u64,
    /// SQLite busy_timeout
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enforce_foreign_keys: false,
            vote_policy: VotePolicy::Unrestricted,
            operation_timeout_ms: 5000,
            busy_timeout_ms: 5000,
        }
    }
}

/// Contents of the service TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub database_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub store: StoreConfig,
}

/// Read and parse a service TOML file
pub fn load_service_config(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Database path resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. Compiled default (fallback)
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: Option<&ServiceConfig>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = config.and_then(|c| c.database_path.as_ref()) {
        return path.clone();
    }

    // Priority 4: Compiled default
    PathBuf::from(DEFAULT_DATABASE_PATH)
}
