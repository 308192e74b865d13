//! Error types for stream resolution.
//!
//! Two layers: [`NegotiationError`] covers everything that can go wrong
//! while talking to a provider's watch page, and [`ResolveError`] is what
//! callers of the resolver see.

use thiserror::Error;

use crate::stream::ContentType;

/// Maximum watch-page body size accepted during negotiation (16 MB).
pub const MAX_PAGE_SIZE: usize = 16 * 1024 * 1024;

/// Failure while negotiating a playback session with a provider.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The watch page carries no session document; the provider wants a login.
    #[error("login required: watch page has no session data")]
    LoginRequired,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: u16, url: String },

    /// Rate limit or captcha page served instead of the watch page.
    #[error("challenge served for {url} (status {status})")]
    Challenge { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("session document is missing `{0}`")]
    MissingField(&'static str),

    #[error("Response too large ({size} bytes, max {MAX_PAGE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl NegotiationError {
    /// Whether this failure must abort resolution regardless of policy.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }
}

impl From<reqwest::Error> for NegotiationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for NegotiationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Error returned by [`PlaybackResolver`](crate::stream::PlaybackResolver).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No factory exists for this content type in this mode. Indicates a bug
    /// in classification or negotiation, never a property of the stream.
    #[error("unsupported content type {content_type:?} (live: {live})")]
    UnsupportedContentType {
        content_type: ContentType,
        live: bool,
    },

    #[error("{provider} requires authentication to play {url}")]
    AuthenticationRequired { provider: &'static str, url: String },

    /// Only surfaced under [`NegotiationPolicy::Strict`](crate::config::NegotiationPolicy).
    #[error("{provider} session negotiation failed: {source}")]
    Negotiation {
        provider: &'static str,
        #[source]
        source: NegotiationError,
    },
}

/// Errors loading the resolver configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_is_the_only_fatal_negotiation_error() {
        assert!(NegotiationError::LoginRequired.is_fatal());
        assert!(!NegotiationError::Network("reset".into()).is_fatal());
        assert!(!NegotiationError::Parse("eof".into()).is_fatal());
        assert!(!NegotiationError::MissingField("media").is_fatal());
        assert!(!NegotiationError::Challenge {
            status: 429,
            url: "https://example.com".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_error_display_http() {
        let err = NegotiationError::Http {
            status: 404,
            url: "https://www.nicovideo.jp/watch/sm9".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 for https://www.nicovideo.jp/watch/sm9");
    }

    #[test]
    fn test_error_display_unsupported() {
        let err = ResolveError::UnsupportedContentType {
            content_type: ContentType::Other,
            live: true,
        };
        assert_eq!(err.to_string(), "unsupported content type Other (live: true)");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: NegotiationError = json_err.into();
        assert!(matches!(err, NegotiationError::Parse(_)));
    }

    #[test]
    fn negotiation_error_is_reported_as_source() {
        use std::error::Error as _;

        let err = ResolveError::Negotiation {
            provider: "niconico",
            source: NegotiationError::MissingField("media"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("niconico"));
    }

    #[test]
    fn test_max_page_size() {
        assert_eq!(MAX_PAGE_SIZE, 16 * 1024 * 1024);
    }
}
