//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/weekview/config.toml` by default.
//!
//! ```toml
//! timezone = "Pacific Standard Time"
//! time_format = "h:mm tt"
//! display_name = "Adele Vance"
//!
//! [graph]
//! access_token = "env::GRAPH_TOKEN"
//! page_size = 50
//! timeout = 30
//! ```
//!
//! `access_token` supports secret references:
//! - `pass::path/in/store`: resolved via `pass show`
//! - `env::VAR_NAME`: resolved from the environment
//! - plain text: used as-is

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use weekview_core::ClaimSet;
use weekview_core::timezone::is_known_timezone;

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the weekview client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Preferred timezone (IANA or Windows name). UTC when unset.
    pub timezone: Option<String>,

    /// Preferred time-of-day pattern. `HH:mm` when unset.
    pub time_format: Option<String>,

    /// Name shown above the week.
    pub display_name: Option<String>,

    /// Debug mode.
    pub debug: bool,

    /// Microsoft Graph settings.
    pub graph: GraphSettings,
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weekview")
    }

    /// The user preferences as claims, with sign-in defaults applied.
    pub fn claims(&self) -> ClaimSet {
        ClaimSet::from_profile(
            self.display_name.as_deref(),
            None,
            self.timezone.as_deref(),
            self.time_format.as_deref(),
        )
    }

    /// Checks values that would otherwise be silently replaced by defaults.
    pub fn validate(&self) -> Result<Vec<String>, String> {
        let mut warnings = Vec::new();

        if let Some(ref tz) = self.timezone {
            if !tz.trim().is_empty() && !is_known_timezone(tz) {
                warnings.push(format!("timezone {:?} is not recognized, UTC will be used", tz));
            }
        }

        #[cfg(feature = "graph")]
        self.graph.to_source_config()?.validate()?;

        if let Some(size) = self.graph.page_size {
            if !(1..=weekview_providers::MAX_PAGE_SIZE).contains(&size) {
                warnings.push(format!(
                    "graph.page_size {} is out of range, it will be clamped to 1..={}",
                    size,
                    weekview_providers::MAX_PAGE_SIZE
                ));
            }
        }

        Ok(warnings)
    }
}

// ---------------------------------------------------------------------------
// GraphSettings ([graph] section)
// ---------------------------------------------------------------------------

/// Microsoft Graph settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// API root. Defaults to the public Graph v1.0 endpoint.
    pub base_url: Option<String>,

    /// Bearer token (supports `pass::` and `env::` prefixes).
    pub access_token: Option<String>,

    /// Events per page (1 to 50).
    pub page_size: Option<u32>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

impl GraphSettings {
    /// Converts to source configuration.
    #[cfg(feature = "graph")]
    pub fn to_source_config(&self) -> Result<weekview_providers::graph::GraphConfig, String> {
        use std::time::Duration;
        use weekview_providers::graph::GraphConfig;

        let mut config = GraphConfig::new();

        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size);
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("graph.timeout must be greater than zero".to_string());
            }
            config = config.with_timeout(Duration::from_secs(timeout));
        }

        Ok(config)
    }

    /// Resolves the access token, expanding `pass::` and `env::` references.
    ///
    /// Returns `Ok(None)` when no token is configured.
    pub fn resolve_access_token(&self) -> Result<Option<String>, String> {
        self.access_token
            .as_deref()
            .map(|raw| {
                crate::secret::resolve(raw)
                    .map_err(|e| format!("failed to resolve graph.access_token: {}", e))
            })
            .transpose()
    }
}
