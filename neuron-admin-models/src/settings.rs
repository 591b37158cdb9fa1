use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_STATUS_REFRESH_SECS,
    ENV_PREFIX, LOG_DIR, LOG_FILE,
};
use config::{Config, Environment, File};
use neuron_admin_error::NAResult;
use serde::Deserialize;
use std::{ops::Deref, sync::Arc, time::Duration};

#[derive(Debug, Clone)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    /// Load settings from an optional TOML file overlaid with `NA__*` variables.
    pub fn new(config_path: &str) -> NAResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self(Arc::new(Inner::default()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inner {
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub client: Client,
    #[serde(default)]
    pub drivers: Drivers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    /// One of `trace`, `debug`, `info`, `warn`, `error`
    #[serde(default = "Log::level_default")]
    pub level: String,
    #[serde(default = "Log::dir_default")]
    pub dir: String,
    #[serde(default = "Log::file_default")]
    pub file: String,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: Log::level_default(),
            dir: Log::dir_default(),
            file: Log::file_default(),
        }
    }
}

impl Log {
    fn level_default() -> String {
        "info".into()
    }

    fn dir_default() -> String {
        LOG_DIR.into()
    }

    fn file_default() -> String {
        LOG_FILE.into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Client {
    #[serde(default = "Client::base_url_default")]
    pub base_url: String,
    /// Pre-issued bearer token; takes precedence over username/password
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "Client::timeout_ms_default")]
    pub timeout_ms: u64,
}

impl Default for Client {
    fn default() -> Self {
        Client {
            base_url: Client::base_url_default(),
            token: None,
            username: None,
            password: None,
            timeout_ms: Client::timeout_ms_default(),
        }
    }
}

impl Client {
    fn base_url_default() -> String {
        DEFAULT_BASE_URL.into()
    }

    fn timeout_ms_default() -> u64 {
        DEFAULT_REQUEST_TIMEOUT_MS
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Drivers {
    #[serde(default = "Drivers::refresh_interval_secs_default")]
    pub refresh_interval_secs: u64,
    #[serde(default = "Drivers::page_size_default")]
    pub page_size: u32,
}

impl Default for Drivers {
    fn default() -> Self {
        Drivers {
            refresh_interval_secs: Drivers::refresh_interval_secs_default(),
            page_size: Drivers::page_size_default(),
        }
    }
}

impl Drivers {
    fn refresh_interval_secs_default() -> u64 {
        DEFAULT_STATUS_REFRESH_SECS
    }

    fn page_size_default() -> u32 {
        DEFAULT_PAGE_SIZE
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::new("does-not-exist/neuron-admin").unwrap();
        assert_eq!(settings.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.client.timeout(), Duration::from_secs(10));
        assert_eq!(settings.drivers.refresh_interval(), Duration::from_secs(15));
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[client]\nbase_url = \"http://10.0.0.5:7000\"\ntoken = \"abc\"\n\n[drivers]\npage_size = 10"
        )
        .unwrap();

        let settings = Settings::new(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.client.base_url, "http://10.0.0.5:7000");
        assert_eq!(settings.client.token.as_deref(), Some("abc"));
        assert_eq!(settings.drivers.page_size, 10);
        assert_eq!(settings.drivers.refresh_interval_secs, 15);
    }
}
