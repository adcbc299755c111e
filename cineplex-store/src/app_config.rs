use cineplex_catalog::PricingConfig;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub schedule: ScheduleConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub theater: TheaterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// IANA zone all showtimes are displayed in, e.g. `Asia/Kolkata`
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Memory backend only
    pub quota_bytes: Option<usize>,
}

fn default_storage_path() -> String { "data/bookings.json".to_string() }
fn default_key_prefix() -> String { "bookings".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct TheaterConfig {
    #[serde(default = "default_auditorium")]
    pub default_auditorium: String,
}

fn default_auditorium() -> String { cineplex_catalog::DEFAULT_AUDITORIUM.to_string() }

impl Default for TheaterConfig {
    fn default() -> Self {
        Self {
            default_auditorium: default_auditorium(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `CINEPLEX__STORAGE__BACKEND=memory`
            .add_source(config::Environment::with_prefix("CINEPLEX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
