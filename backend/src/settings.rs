//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `LEJIO_*` environment variables, or a config
//! file, in that order of precedence. Scalar fields carry OrthoConfig
//! defaults; optional ones fall back in their accessors.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ROOT_DOMAIN: &str = "lejio-fri.dk";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_STORAGE: &str = "memory";
const DEFAULT_TOKEN_TTL_MINUTES: u32 = 60;
const DEFAULT_TRIAL_DAYS: u32 = 30;
const DEFAULT_DB_POOL_SIZE: u32 = 8;

/// Which backend stores pages, tenants, and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Everything in process memory.
    #[default]
    Memory,
    /// Pages in JSON files under the data directory; other data in memory.
    File,
    /// Everything in PostgreSQL.
    Postgres,
}

/// Unrecognised storage mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown storage mode {0}; expected memory, file, or postgres")]
pub struct UnknownStorageMode(String);

impl FromStr for StorageMode {
    type Err = UnknownStorageMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mock" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(UnknownStorageMode(s.to_owned())),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Postgres => "postgres",
        })
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error(transparent)]
    Storage(#[from] UnknownStorageMode),
    #[error("postgres storage requires a database URL")]
    MissingDatabaseUrl,
}

/// Configuration for the Lejio API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEJIO")]
pub struct LejioSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Platform root domain tenant subdomains hang off.
    pub root_domain: Option<String>,
    /// Storage backend: `memory`, `file`, or `postgres`.
    #[ortho_config(default = DEFAULT_STORAGE.to_owned())]
    pub storage: String,
    /// Directory for the JSON page store.
    pub data_dir: Option<PathBuf>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled PostgreSQL connections.
    #[ortho_config(default = DEFAULT_DB_POOL_SIZE)]
    pub db_pool_size: u32,
    /// HMAC secret for access tokens. Enables token checks when set.
    pub token_secret: Option<String>,
    /// Lifetime of issued access tokens.
    #[ortho_config(default = DEFAULT_TOKEN_TTL_MINUTES)]
    pub token_ttl_minutes: u32,
    /// Trial length granted at signup.
    #[ortho_config(default = DEFAULT_TRIAL_DAYS)]
    pub trial_days: u32,
}

impl LejioSettings {
    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Root domain, lowercased.
    pub fn root_domain(&self) -> String {
        self.root_domain
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ROOT_DOMAIN)
            .to_ascii_lowercase()
    }

    /// Selected storage backend.
    pub fn storage(&self) -> Result<StorageMode, SettingsError> {
        if self.storage.trim().is_empty() {
            return Ok(StorageMode::default());
        }
        Ok(self.storage.parse()?)
    }

    /// Directory for the JSON page store.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Database URL, required in postgres mode.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size
    }

    /// Token signing secret, if configured.
    pub fn token_secret(&self) -> Option<&[u8]> {
        self.token_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(str::as_bytes)
    }

    /// Access token lifetime.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.token_ttl_minutes))
    }

    /// Trial length in days.
    pub fn trial_days(&self) -> u32 {
        self.trial_days
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "LEJIO_BIND_ADDR",
        "LEJIO_ROOT_DOMAIN",
        "LEJIO_STORAGE",
        "LEJIO_DATA_DIR",
        "LEJIO_DATABASE_URL",
        "LEJIO_DB_POOL_SIZE",
        "LEJIO_TOKEN_SECRET",
        "LEJIO_TOKEN_TTL_MINUTES",
        "LEJIO_TRIAL_DAYS",
    ];

    fn load_from_empty_args() -> LejioSettings {
        LejioSettings::load_from_iter([OsString::from("lejio")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.root_domain(), "lejio-fri.dk");
        assert_eq!(settings.storage(), Ok(StorageMode::Memory));
        assert_eq!(settings.data_dir(), PathBuf::from("data"));
        assert_eq!(settings.database_url(), Err(SettingsError::MissingDatabaseUrl));
        assert_eq!(settings.db_pool_size(), 8);
        assert!(settings.token_secret().is_none());
        assert_eq!(settings.token_ttl(), chrono::Duration::minutes(60));
        assert_eq!(settings.trial_days(), 30);
    }

    #[rstest]
    fn empty_environment_fills_scalar_fields() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = LejioSettings::load_from_iter([OsString::from("lejio")])
            .expect("empty environment should load");

        assert_eq!(settings.storage, DEFAULT_STORAGE);
        assert_eq!(settings.db_pool_size, DEFAULT_DB_POOL_SIZE);
        assert_eq!(settings.token_ttl_minutes, DEFAULT_TOKEN_TTL_MINUTES);
        assert_eq!(settings.trial_days, DEFAULT_TRIAL_DAYS);
        assert!(settings.bind_addr.is_none());
        assert!(settings.database_url.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("LEJIO_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("LEJIO_ROOT_DOMAIN", Some("Example.DK".to_owned())),
            ("LEJIO_STORAGE", Some("postgres".to_owned())),
            ("LEJIO_DATA_DIR", None),
            (
                "LEJIO_DATABASE_URL",
                Some("postgres://localhost/lejio".to_owned()),
            ),
            ("LEJIO_DB_POOL_SIZE", Some("3".to_owned())),
            ("LEJIO_TOKEN_SECRET", Some("s3cret".to_owned())),
            ("LEJIO_TOKEN_TTL_MINUTES", Some("15".to_owned())),
            ("LEJIO_TRIAL_DAYS", Some("14".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.root_domain(), "example.dk");
        assert_eq!(settings.storage(), Ok(StorageMode::Postgres));
        assert_eq!(settings.database_url(), Ok("postgres://localhost/lejio"));
        assert_eq!(settings.db_pool_size(), 3);
        assert_eq!(settings.token_secret(), Some(b"s3cret".as_slice()));
        assert_eq!(settings.token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(settings.trial_days(), 14);
    }

    #[rstest]
    #[case("memory", Ok(StorageMode::Memory))]
    #[case("File", Ok(StorageMode::File))]
    #[case("postgresql", Ok(StorageMode::Postgres))]
    #[case("redis", Err(UnknownStorageMode("redis".to_owned())))]
    fn storage_mode_parses_known_names(
        #[case] raw: &str,
        #[case] expected: Result<StorageMode, UnknownStorageMode>,
    ) {
        assert_eq!(raw.parse::<StorageMode>(), expected);
    }

    #[rstest]
    fn invalid_bind_address_is_reported() {
        let settings = LejioSettings {
            bind_addr: Some("not-an-address".to_owned()),
            root_domain: None,
            storage: DEFAULT_STORAGE.to_owned(),
            data_dir: None,
            database_url: None,
            db_pool_size: DEFAULT_DB_POOL_SIZE,
            token_secret: None,
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            trial_days: DEFAULT_TRIAL_DAYS,
        };

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }
}
