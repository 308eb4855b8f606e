use std::path::PathBuf;

use crate::catalog_factory::CatalogParams;
use crate::error::{FixError, Result};

pub const DEFAULT_BACKUP_PATH: &str = "bibfix-backup.log";

const ENV_CATALOG_URL: &str = "BIBFIX_CATALOG_URL";
const ENV_CATALOG_TOKEN: &str = "BIBFIX_CATALOG_TOKEN";
const ENV_BACKUP_PATH: &str = "BIBFIX_BACKUP_PATH";

/// Process configuration, read once by the owning process and injected.
/// The catalog URL is only required for operations that talk upstream, so
/// loading never fails on its absence; `catalog()` does.
#[derive(Clone, Debug)]
pub struct Config {
    pub catalog_url: Option<String>,
    pub catalog_token: Option<String>,
    pub backup_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            catalog_url: env_non_empty(ENV_CATALOG_URL),
            catalog_token: env_non_empty(ENV_CATALOG_TOKEN),
            backup_path: env_non_empty(ENV_BACKUP_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_PATH)),
        }
    }

    /// Catalog connection parameters; fatal before any batch work when the
    /// URL is missing.
    pub fn catalog(&self) -> Result<CatalogParams> {
        let base_url = self
            .catalog_url
            .clone()
            .ok_or_else(|| FixError::Config(format!("{ENV_CATALOG_URL} is not set")))?;
        Ok(CatalogParams {
            base_url,
            token: self.catalog_token.clone(),
        })
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
