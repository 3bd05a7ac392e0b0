use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::{AdminSecret, Authorizer, DenyAll};
use crate::core::theme::Theme;
use crate::error::ConfigError;

pub const ENV_STORE_URL: &str = "LINKBOARD_STORE_URL";
pub const ENV_STORE_KEY: &str = "LINKBOARD_STORE_KEY";

fn default_collection() -> String {
    "links".into()
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Non-secret preferences, stored as JSON under the user config dir.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Name of the remote table holding the links.
    pub collection: String,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub theme: Theme,
    pub debug_logging: bool,
    /// Go back to the unfiltered list after publishing a link.
    pub reset_view_on_add: bool,
    /// Argon2 PHC hash of the admin secret required for deletion.
    pub admin_secret_hash: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            theme: Theme::default(),
            debug_logging: false,
            reset_view_on_add: false,
            admin_secret_hash: None,
        }
    }
}

impl BoardConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("linkboard")
            .join("config.json")
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// The authorizer guarding deletes. Without a usable hash nobody may delete.
    pub fn authorizer(&self) -> Box<dyn Authorizer> {
        match self.admin_secret_hash.as_deref() {
            Some(phc) => match AdminSecret::from_hash(phc) {
                Ok(secret) => Box::new(secret),
                Err(e) => {
                    log::warn!("Ignoring malformed admin_secret_hash: {}", e);
                    Box::new(DenyAll)
                }
            },
            None => Box::new(DenyAll),
        }
    }
}

/// Endpoint and access key for the hosted link store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreSecrets {
    pub endpoint: String,
    pub api_key: String,
}

impl std::fmt::Debug for StoreSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSecrets")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Somewhere the store secrets can be read from.
pub trait SecretSource {
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<StoreSecrets>, ConfigError>> + Send;
}

/// Reads `LINKBOARD_STORE_URL` / `LINKBOARD_STORE_KEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl EnvSecrets {
    fn from_vars(url: Option<String>, key: Option<String>) -> Option<StoreSecrets> {
        let endpoint = url?.trim().to_string();
        let api_key = key?.trim().to_string();
        if endpoint.is_empty() || api_key.is_empty() {
            return None;
        }
        Some(StoreSecrets { endpoint, api_key })
    }
}

impl SecretSource for EnvSecrets {
    async fn load(&self) -> Result<Option<StoreSecrets>, ConfigError> {
        Ok(Self::from_vars(
            std::env::var(ENV_STORE_URL).ok(),
            std::env::var(ENV_STORE_KEY).ok(),
        ))
    }
}

/// Environment first, then the system keyring.
pub async fn load_store_secrets() -> Result<Option<StoreSecrets>, ConfigError> {
    if let Some(secrets) = EnvSecrets.load().await? {
        log::debug!("Using store secrets from environment");
        return Ok(Some(secrets));
    }
    crate::sync::keyring::KeyringSecrets.load().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("linkboard-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = BoardConfig::load(&temp_path("missing")).unwrap();
        assert_eq!(cfg, BoardConfig::default());
        assert_eq!(cfg.collection, "links");
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: BoardConfig =
            serde_json::from_str(r#"{"theme": "afternoon", "refresh_interval_secs": 5}"#).unwrap();
        assert_eq!(cfg.theme, Theme::Afternoon);
        assert_eq!(cfg.refresh_interval_secs, 5);
        assert_eq!(cfg.collection, "links");
        assert!(!cfg.reset_view_on_add);
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let cfg = BoardConfig {
            theme: Theme::Light,
            reset_view_on_add: true,
            ..BoardConfig::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(BoardConfig::load(&path).unwrap(), cfg);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let path = temp_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(BoardConfig::load(&path), Err(ConfigError::Parse(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn no_admin_hash_denies_deletes() {
        let cfg = BoardConfig::default();
        assert!(!cfg.authorizer().authorize("admin123"));

        let cfg = BoardConfig {
            admin_secret_hash: Some("admin123".into()),
            ..BoardConfig::default()
        };
        assert!(!cfg.authorizer().authorize("admin123"));
    }

    #[test]
    fn env_secrets_need_both_values() {
        assert_eq!(EnvSecrets::from_vars(None, Some("k".into())), None);
        assert_eq!(EnvSecrets::from_vars(Some(" ".into()), Some("k".into())), None);
        assert_eq!(
            EnvSecrets::from_vars(Some("https://x.supabase.co/".into()), Some(" k ".into())),
            Some(StoreSecrets {
                endpoint: "https://x.supabase.co/".into(),
                api_key: "k".into(),
            })
        );
    }

    #[test]
    fn secrets_debug_hides_key() {
        let s = StoreSecrets {
            endpoint: "https://x".into(),
            api_key: "super-secret".into(),
        };
        assert!(!format!("{:?}", s).contains("super-secret"));
    }
}
