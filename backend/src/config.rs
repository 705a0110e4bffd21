//! # Portal Configuration
//!
//! Runtime settings loaded from a single YAML file, with a couple of
//! environment overrides for deployment.
//!
//! ```yaml
//! data_directory: "./data"
//! bind_address: "127.0.0.1:3000"
//! timezone_offset: "-03:00"
//! search_debounce_ms: 300
//! allowed_email_domains: ["imobiliaria.com.br"]
//! log_filter: "info"
//! ranking:
//!   cache_capacity: 64
//!   cache_ttl_seconds: 300
//!   page_size: 20
//! ```

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "PORTAL_CONFIG";
pub const DATA_DIR_ENV: &str = "PORTAL_DATA_DIR";
pub const BIND_ADDRESS_ENV: &str = "PORTAL_BIND_ADDRESS";

const DEFAULT_CONFIG_PATH: &str = "portal_config.yaml";

/// Where the loaded configuration came from. Reported by the caller once
/// logging is up, since loading happens before the subscriber exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file was absent, so built-in defaults were used
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "loaded from {:?}", path),
            ConfigSource::Defaults(path) => write!(f, "no file at {:?}, using defaults", path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Directory holding the CSV tables
    pub data_directory: PathBuf,
    pub bind_address: String,
    /// Organizational UTC offset used to read calendar dates, e.g. "-03:00"
    pub timezone_offset: String,
    pub search_debounce_ms: u64,
    /// Domains accepted for corporate e-mail addresses
    pub allowed_email_domains: Vec<String>,
    /// Default tracing filter when RUST_LOG is not set
    pub log_filter: String,
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub cache_capacity: usize,
    pub cache_ttl_seconds: u64,
    pub page_size: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 64,
            cache_ttl_seconds: 300,
            page_size: 20,
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("data"),
            bind_address: "127.0.0.1:3000".to_string(),
            timezone_offset: "-03:00".to_string(),
            search_debounce_ms: 300,
            allowed_email_domains: vec!["imobiliaria.com.br".to_string()],
            log_filter: "info".to_string(),
            ranking: RankingConfig::default(),
        }
    }
}

impl PortalConfig {
    /// Load the configuration from `PORTAL_CONFIG` (or `./portal_config.yaml`),
    /// apply environment overrides and validate the result.
    pub fn load() -> Result<(Self, ConfigSource)> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let (mut config, source) = Self::from_file_or_default(Path::new(&path))?;

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data_directory = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var(BIND_ADDRESS_ENV) {
            config.bind_address = addr;
        }

        config.validate()?;
        Ok((config, source))
    }

    /// Read a YAML file, falling back to defaults when it does not exist
    pub fn from_file_or_default(path: &Path) -> Result<(Self, ConfigSource)> {
        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults(path.to_path_buf())));
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_yaml(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.timezone()?;
        self.socket_addr()?;
        if self.ranking.cache_capacity == 0 {
            bail!("ranking.cache_capacity must be greater than zero");
        }
        if self.ranking.page_size == 0 {
            bail!("ranking.page_size must be greater than zero");
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<FixedOffset> {
        parse_offset(&self.timezone_offset)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind_address: {}", self.bind_address))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.ranking.cache_ttl_seconds)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Parse "+HH:MM", "-HH:MM", "+HHMM" or "Z" into a fixed offset
pub fn parse_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).context("Invalid UTC offset");
    }

    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => bail!("Invalid timezone_offset '{}': expected +HH:MM or -HH:MM", value),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        bail!("Invalid timezone_offset '{}': expected +HH:MM or -HH:MM", value);
    }

    let hours: i32 = digits[..2].parse()?;
    let minutes: i32 = digits[2..].parse()?;
    if hours > 23 || minutes > 59 {
        bail!("Invalid timezone_offset '{}': out of range", value);
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("Invalid timezone_offset '{}'", value))
}
