use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub sync: SyncOptions,
}

/// How the catalog client authenticates. Read-only export of ordinary lists
/// works without credentials; ratings and the watchlist do not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogAuth {
    Cookies,
    None,
}

fn default_catalog_auth() -> CatalogAuth {
    CatalogAuth::Cookies
}

fn default_catalog_base_url() -> String {
    "https://catalog.example.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_auth")]
    pub auth: CatalogAuth,
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Catalog user identifier; required for export endpoints.
    pub user_id: String,
    /// Session cookie, required when `auth = "cookies"`.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Catalog-native ids of the ordinary lists to sync.
    #[serde(default)]
    pub lists: Vec<String>,
}

impl CatalogConfig {
    pub fn credentials_present(&self) -> bool {
        self.auth == CatalogAuth::Cookies && self.session_cookie.is_some()
    }
}

fn default_tracker_base_url() -> String {
    "https://api.tracker.example.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_tracker_base_url")]
    pub base_url: String,
    pub client_id: String,
    pub access_token: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    #[serde(default = "default_true")]
    pub lists: bool,
    #[serde(default = "default_true")]
    pub watchlist: bool,
    #[serde(default = "default_true")]
    pub ratings: bool,
    #[serde(default = "default_true")]
    pub history: bool,
    #[serde(default)]
    pub mode: SyncMode,
}

fn default_true() -> bool {
    true
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            lists: true,
            watchlist: true,
            ratings: true,
            history: true,
            mode: SyncMode::default(),
        }
    }
}

/// Policy applied at every mutating call site against the tracker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Execute every computed add and remove.
    Full,
    /// Execute adds; report removes without executing them.
    AddOnly,
    /// Report everything, execute nothing.
    #[default]
    DryRun,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncMode::Full => "full",
            SyncMode::AddOnly => "add-only",
            SyncMode::DryRun => "dry-run",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SyncMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(SyncMode::Full),
            "add-only" => Ok(SyncMode::AddOnly),
            "dry-run" => Ok(SyncMode::DryRun),
            other => Err(anyhow::anyhow!(
                "unknown sync mode '{other}' (expected full, add-only or dry-run)"
            )),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides
    /// for credentials so secrets can stay out of the file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("could not read config file {}: {e}", path.display())
        })?;
        let mut config: Config = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("could not parse config file {}: {e}", path.display()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(cookie) = std::env::var("SHELFSYNC_CATALOG_COOKIE") {
            self.catalog.session_cookie = Some(cookie);
        }
        if let Ok(token) = std::env::var("SHELFSYNC_TRACKER_TOKEN") {
            self.tracker.access_token = token;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_config(
            r#"
            [catalog]
            user_id = "ur0001"
            lists = ["ls001", "ls002"]

            [tracker]
            client_id = "cid"
            access_token = "tok"
            username = "someone"
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.catalog.lists, vec!["ls001", "ls002"]);
        assert_eq!(config.catalog.auth, CatalogAuth::Cookies);
        assert!(config.sync.lists);
        assert!(config.sync.watchlist);
        assert!(config.sync.ratings);
        assert!(config.sync.history);
        assert_eq!(config.sync.mode, SyncMode::DryRun);
    }

    #[test]
    fn test_load_sync_overrides() {
        let file = write_config(
            r#"
            [catalog]
            auth = "none"
            user_id = "ur0001"

            [tracker]
            client_id = "cid"
            access_token = "tok"
            username = "someone"

            [sync]
            history = false
            mode = "add-only"
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.catalog.auth, CatalogAuth::None);
        assert!(!config.catalog.credentials_present());
        assert!(!config.sync.history);
        assert!(config.sync.ratings);
        assert_eq!(config.sync.mode, SyncMode::AddOnly);
    }

    #[test]
    fn test_sync_mode_round_trip() {
        for mode in [SyncMode::Full, SyncMode::AddOnly, SyncMode::DryRun] {
            assert_eq!(mode.to_string().parse::<SyncMode>().unwrap(), mode);
        }
        assert!("sideways".parse::<SyncMode>().is_err());
    }

    #[test]
    fn test_credentials_present_requires_cookie() {
        let file = write_config(
            r#"
            [catalog]
            user_id = "ur0001"
            session_cookie = "abc"

            [tracker]
            client_id = "cid"
            access_token = "tok"
            username = "someone"
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert!(config.catalog.credentials_present());
    }
}
