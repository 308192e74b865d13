//! Watch-page HTTP client
//!
//! Features:
//! - Browser-like request headers with a per-request locale
//! - Brotli, Zstd, Gzip compression (auto-negotiated)
//! - Cookie store and bounded redirects
//! - Body size limit before anything is parsed

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};

use crate::config::HttpConfig;
use crate::error::{NegotiationError, MAX_PAGE_SIZE};
use crate::fingerprint::{accept_language_for, profile_for_locale};
use crate::stream::PageFetcher;

/// HTTP client used for session negotiation page fetches
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Create a client from HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        // Locale is set per request; the profile only supplies the rest.
        let headers = profile_for_locale("en-US").to_headers().unwrap_or_default();

        let client = Client::builder()
            // Let the server negotiate HTTP/2
            .http2_adaptive_window(true)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }
}

/// Rate-limit and captcha responses, as opposed to plain HTTP failures.
fn is_challenge(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN
}

#[async_trait]
impl PageFetcher for PageClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_page(&self, url: &str, locale: &str) -> Result<String, NegotiationError> {
        debug!("Fetching watch page");

        let accept_language = HeaderValue::from_str(&accept_language_for(locale))
            .map_err(|e| NegotiationError::Parse(format!("invalid locale {locale:?}: {e}")))?;

        let response = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, accept_language)
            .send()
            .await?;

        let status = response.status();
        info!(
            status = %status,
            version = ?response.version(),
            "Response received"
        );

        if is_challenge(status) {
            return Err(NegotiationError::Challenge {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(NegotiationError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(length) = response.content_length() {
            if length > MAX_PAGE_SIZE as u64 {
                return Err(NegotiationError::ResponseTooLarge { size: length });
            }
        }

        let body = response.bytes().await?;
        if body.len() > MAX_PAGE_SIZE {
            return Err(NegotiationError::ResponseTooLarge {
                size: body.len() as u64,
            });
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
