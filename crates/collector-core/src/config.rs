use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOCUMENTS_ROOT: &str = "/mnt/us/documents";
pub const DEFAULT_CATALOG_PATH: &str = "/var/local/cc.db";
pub const DEFAULT_MANAGER_URL: &str = "http://localhost:9101/change";
pub const DEFAULT_REQUEST_ID: i64 = 666;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    pub documents_root: String,
    pub catalog_path: String,
    pub manager_url: String,
    pub request_id: i64,
    /// Build a delete-all batch instead of syncing the scanned tree.
    pub remove_all: bool,
    /// Make single-entry collections visible in the home screen.
    pub force_visible: bool,
    /// Print the change request instead of committing it.
    pub dry_run: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            documents_root: DEFAULT_DOCUMENTS_ROOT.to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            manager_url: DEFAULT_MANAGER_URL.to_string(),
            request_id: DEFAULT_REQUEST_ID,
            remove_all: false,
            force_visible: false,
            dry_run: false,
        }
    }
}

/// Load configuration from built-in defaults, an optional `Collector.*` file
/// in the working directory and `COLLECTOR_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_configuration_from("Collector")
}

pub fn load_configuration_from(file_name: &str) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("documents_root", defaults.documents_root)?
        .set_default("catalog_path", defaults.catalog_path)?
        .set_default("manager_url", defaults.manager_url)?
        .set_default("request_id", defaults.request_id)?
        .set_default("remove_all", defaults.remove_all)?
        .set_default("force_visible", defaults.force_visible)?
        .set_default("dry_run", defaults.dry_run)?
        .add_source(ConfigFile::with_name(file_name).required(false))
        .add_source(Environment::with_prefix("COLLECTOR").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("does_not_exist");
        let config = load_configuration_from(missing.to_str().unwrap()).unwrap();
        assert_eq!(config.catalog_path, DEFAULT_CATALOG_PATH);
        assert_eq!(config.manager_url, DEFAULT_MANAGER_URL);
        assert_eq!(config.request_id, 666);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("Collector.toml");
        fs::write(
            &file,
            "documents_root = \"/tmp/books\"\nforce_visible = true\n",
        )
        .unwrap();

        let base = tmp.path().join("Collector");
        let config = load_configuration_from(base.to_str().unwrap()).unwrap();
        assert_eq!(config.documents_root, "/tmp/books");
        assert!(config.force_visible);
        // untouched keys keep their defaults
        assert_eq!(config.catalog_path, DEFAULT_CATALOG_PATH);
    }
}
