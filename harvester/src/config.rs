use bh_names::OverrideTable;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::congress::SourceKind;

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with BH_ prefix (always wins)
///
/// API credentials live here rather than in the process environment so the
/// catalog clients receive them explicitly at construction.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub followers: FollowersConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub govtrack: GovTrackConfig,
    #[serde(default)]
    pub propublica: ProPublicaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GovTrackConfig {
    /// Root of the bulk data tree (`{base}/{congress}/bills/...`).
    #[serde(default = "default_govtrack_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProPublicaConfig {
    #[serde(default = "default_propublica_url")]
    pub base_url: String,

    /// API key sent as `X-API-Key` (required for ProPublica runs, no compiled-in default).
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    /// Join sponsors against the legislator roster (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// EveryPolitician data root.
    #[serde(default = "default_roster_url")]
    pub base_url: String,

    #[serde(default = "default_roster_country")]
    pub country: String,

    #[serde(default = "default_roster_chamber")]
    pub chamber: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FollowersConfig {
    /// Look up follower counts for roster twitter handles (default: false).
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_followers_url")]
    pub base_url: String,

    /// Bearer token for the follower lookup API (required when enabled).
    #[serde(default)]
    pub bearer_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append-only plain-text log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Emit a progress line every N identifiers.
    #[serde(default = "default_progress_every")]
    pub progress_every: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory the CSV tables are written to (created if missing).
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Sponsorship join key -> roster join key, for names cleaning cannot reconcile.
    ///
    /// Set these in YAML. Environment keys are lowercased on load, so an
    /// override set through `BH_IDENTITY__OVERRIDES__*` never matches a key.
    #[serde(default)]
    pub overrides: OverrideTable,
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

fn default_govtrack_url() -> String {
    "https://www.govtrack.us/data/congress".to_string()
}

fn default_propublica_url() -> String {
    "https://api.propublica.org/congress/v1".to_string()
}

fn default_roster_url() -> String {
    "https://raw.githubusercontent.com/everypolitician/everypolitician-data/master/data"
        .to_string()
}

fn default_roster_country() -> String {
    "United_States_of_America".to_string()
}

fn default_roster_chamber() -> String {
    "House".to_string()
}

fn default_followers_url() -> String {
    "https://api.twitter.com".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("bill-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "bill-harvest.log".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_progress_every() -> u32 {
    25
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for GovTrackConfig {
    fn default() -> Self {
        Self {
            base_url: default_govtrack_url(),
        }
    }
}

impl Default for ProPublicaConfig {
    fn default() -> Self {
        Self {
            base_url: default_propublica_url(),
            api_key: String::new(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_roster_url(),
            country: default_roster_country(),
            chamber: default_roster_chamber(),
        }
    }
}

impl Default for FollowersConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_followers_url(),
            bearer_token: String::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            progress_every: default_progress_every(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://, got: '{url}'"
        )))
    }
}

impl Config {
    /// Load configuration with a custom YAML file path.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. The YAML file at `yaml_path` (if exists)
    /// 3. Environment variables with BH_ prefix (highest)
    ///
    /// Environment keys are lowercased, which makes them unusable for
    /// case-sensitive map keys such as `identity.overrides`.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("BH_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate values that do not depend on the selected source.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("sources.govtrack.base_url", &self.sources.govtrack.base_url)?;
        check_url("sources.propublica.base_url", &self.sources.propublica.base_url)?;
        check_url("roster.base_url", &self.roster.base_url)?;
        check_url("followers.base_url", &self.followers.base_url)?;

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs cannot be 0".into(),
            ));
        }

        if self.logging.progress_every == 0 {
            return Err(ConfigError::Validation(
                "logging.progress_every cannot be 0".into(),
            ));
        }

        if self.followers.enabled && self.followers.bearer_token.is_empty() {
            return Err(ConfigError::Validation(
                "followers.bearer_token is required when followers.enabled is set. Set BH_FOLLOWERS__BEARER_TOKEN environment variable or configure in config.yaml.".into(),
            ));
        }

        Ok(())
    }

    /// Validate credentials needed to walk `source`.
    ///
    /// # Errors
    /// Returns an error if the source needs a credential that is not configured.
    pub fn validate_for(&self, source: SourceKind) -> Result<(), ConfigError> {
        self.validate()?;

        if source == SourceKind::ProPublica && self.sources.propublica.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "sources.propublica.api_key is required. Set BH_SOURCES__PROPUBLICA__API_KEY environment variable or configure in config.yaml.".into(),
            ));
        }

        Ok(())
    }
}
