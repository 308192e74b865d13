//! Resolver configuration loaded from `~/.config/playsource/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Gap kept behind the live edge when a live source starts playing.
pub const LIVE_STREAM_EDGE_GAP_MILLIS: u64 = 10_000;

/// Locale sent to niconico when fetching watch pages.
pub const NICONICO_LOCALE: &str = "ja-JP";

/// Base URL the default niconico HLS transform builds manifest URLs under.
pub const NICONICO_MANIFEST_BASE: &str = "https://delivery.domand.nicovideo.jp/hlsbid";

/// What to do when session negotiation fails for a reason other than a login wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegotiationPolicy {
    /// Log the failure and play through the provider's fallback route.
    #[default]
    Fallback,
    /// Return the failure to the caller.
    Strict,
}

/// HTTP settings for the page client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
        }
    }
}

/// Settings for the niconico session negotiator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NiconicoConfig {
    /// Language tag sent as `Accept-Language`.
    pub locale: String,
    /// Prefix for rewritten HLS manifest URLs.
    pub manifest_base: String,
}

impl Default for NiconicoConfig {
    fn default() -> Self {
        Self {
            locale: NICONICO_LOCALE.to_string(),
            manifest_base: NICONICO_MANIFEST_BASE.to_string(),
        }
    }
}

/// Top-level resolver configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub live_edge_gap_ms: u64,
    pub negotiation_policy: NegotiationPolicy,
    pub http: HttpConfig,
    pub niconico: NiconicoConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            live_edge_gap_ms: LIVE_STREAM_EDGE_GAP_MILLIS,
            negotiation_policy: NegotiationPolicy::default(),
            http: HttpConfig::default(),
            niconico: NiconicoConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Target offset behind the live edge.
    #[must_use]
    pub fn live_edge_gap(&self) -> Duration {
        Duration::from_millis(self.live_edge_gap_ms)
    }

    /// Load from the default location.
    ///
    /// Returns defaults if the file doesn't exist (configuration is optional).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(&config_path())
    }

    fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Return the path to the resolver config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("playsource")
        .join("config.toml")
}
