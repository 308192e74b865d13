//! niconico session negotiation
//!
//! niconico watch URLs say nothing about how the video will be delivered.
//! The watch page embeds the viewer's session document in the
//! `data-api-data` attribute of `#js-initial-watch-data`; its
//! `media.delivery.movie.session.protocols[0]` names the protocol the server
//! granted. `"hls"` means a session-bound HLS playlist, anything else means
//! raw delivery through niconico's own data source.
//!
//! A page without the element is served to anonymous viewers of gated
//! content, so that case is reported as [`NegotiationError::LoginRequired`].

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::config::NiconicoConfig;
use crate::error::{NegotiationError, MAX_PAGE_SIZE};
use crate::stream::negotiation::{NegotiatedRoute, PageFetcher, SessionNegotiator};
use crate::stream::source::{DeliveryFactory, FactoryKind, ProviderDelivery, SourceFactory};

const PROVIDER: &str = "niconico";
const WATCH_DATA_SELECTOR: &str = "#js-initial-watch-data";
const WATCH_DATA_ATTR: &str = "data-api-data";
const PROTOCOL_POINTER: &str = "/media/delivery/movie/session/protocols/0";
const HLS_PROTOCOL: &str = "hls";

/// Rewrites a watch URL into the session-bound HLS manifest URL.
pub trait HlsUrlTransform: Send + Sync {
    fn transform(&self, url: &str) -> String;
}

/// Maps `…/watch/<id>` to `{manifest_base}/<id>/master.m3u8`.
///
/// URLs without a watch id pass through unchanged.
#[derive(Debug, Clone)]
pub struct WatchManifestTransform {
    manifest_base: String,
}

impl WatchManifestTransform {
    pub fn new(manifest_base: impl Into<String>) -> Self {
        Self {
            manifest_base: manifest_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Extract the video id from a watch URL
    /// URLs: <https://www.nicovideo.jp/watch/sm9>
    /// URLs: <https://sp.nicovideo.jp/watch/so1234?ref=top>
    fn extract_watch_id(url: &str) -> Option<&str> {
        let (_, rest) = url.split_once("/watch/")?;
        let id = rest.split(['?', '#', '/']).next()?;
        (!id.is_empty()).then_some(id)
    }
}

impl HlsUrlTransform for WatchManifestTransform {
    fn transform(&self, url: &str) -> String {
        match Self::extract_watch_id(url) {
            Some(id) => format!("{}/{id}/master.m3u8", self.manifest_base),
            None => url.to_string(),
        }
    }
}

/// Protocol granted by the watch page. Lives only for one negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionInfo {
    protocol: String,
}

impl SessionInfo {
    fn is_hls(&self) -> bool {
        self.protocol == HLS_PROTOCOL
    }
}

/// Pull the session document out of a watch page.
fn parse_watch_page(html: &str) -> Result<SessionInfo, NegotiationError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(WATCH_DATA_SELECTOR)
        .map_err(|e| NegotiationError::Parse(format!("{e:?}")))?;

    let element = document
        .select(&selector)
        .next()
        .ok_or(NegotiationError::LoginRequired)?;

    let api_data = element
        .value()
        .attr(WATCH_DATA_ATTR)
        .ok_or(NegotiationError::MissingField(WATCH_DATA_ATTR))?;

    let watch: serde_json::Value = serde_json::from_str(api_data)?;
    let protocol = watch
        .pointer(PROTOCOL_POINTER)
        .and_then(serde_json::Value::as_str)
        .ok_or(NegotiationError::MissingField(
            "media.delivery.movie.session.protocols[0]",
        ))?;

    Ok(SessionInfo {
        protocol: protocol.to_string(),
    })
}

/// Session negotiator for nicovideo URLs.
pub struct NiconicoNegotiator {
    fetcher: Arc<dyn PageFetcher>,
    locale: String,
    transform: Box<dyn HlsUrlTransform>,
    hls_factory: Arc<dyn SourceFactory>,
    raw_factory: Arc<dyn SourceFactory>,
}

impl NiconicoNegotiator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &NiconicoConfig) -> Self {
        Self {
            fetcher,
            locale: config.locale.clone(),
            transform: Box::new(WatchManifestTransform::new(config.manifest_base.as_str())),
            hls_factory: DeliveryFactory::shared(FactoryKind::Provider {
                provider: PROVIDER,
                delivery: ProviderDelivery::Hls,
            }),
            raw_factory: DeliveryFactory::shared(FactoryKind::Provider {
                provider: PROVIDER,
                delivery: ProviderDelivery::Raw,
            }),
        }
    }

    /// Replace the built-in factories with engine-backed ones.
    #[must_use]
    pub fn with_factories(
        mut self,
        hls_factory: Arc<dyn SourceFactory>,
        raw_factory: Arc<dyn SourceFactory>,
    ) -> Self {
        self.hls_factory = hls_factory;
        self.raw_factory = raw_factory;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Box<dyn HlsUrlTransform>) -> Self {
        self.transform = transform;
        self
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_session(&self, url: &str) -> Result<SessionInfo, NegotiationError> {
        let html = self.fetcher.fetch_page(url, &self.locale).await?;
        if html.len() > MAX_PAGE_SIZE {
            return Err(NegotiationError::ResponseTooLarge {
                size: html.len() as u64,
            });
        }

        let session = parse_watch_page(&html)?;
        debug!(protocol = %session.protocol, "Session document parsed");
        Ok(session)
    }
}

#[async_trait]
impl SessionNegotiator for NiconicoNegotiator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn matches(&self, url: &str) -> bool {
        url.contains("nicovideo")
    }

    async fn negotiate(&self, url: &str) -> Result<NegotiatedRoute, NegotiationError> {
        let session = self.fetch_session(url).await?;

        if session.is_hls() {
            let manifest_url = self.transform.transform(url);
            debug!("Session granted HLS, playing {manifest_url}");
            Ok(NegotiatedRoute {
                url: manifest_url,
                factory: Arc::clone(&self.hls_factory),
            })
        } else {
            debug!("Session granted {}, using raw delivery", session.protocol);
            Ok(self.fallback(url))
        }
    }

    fn fallback(&self, url: &str) -> NegotiatedRoute {
        NegotiatedRoute {
            url: url.to_string(),
            factory: Arc::clone(&self.raw_factory),
        }
    }
}
