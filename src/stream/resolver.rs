//! Stream resolution: from a [`StreamDescriptor`] to a [`PlayableSource`].
//!
//! Live streams go straight to a live factory with a live-edge offset.
//! On-demand streams are classified, handed to a session negotiator when a
//! provider claims the URL, and finally built by the selected factory.
//!
//! Resolution may perform one network round trip (negotiation) and is
//! therefore `async`. There is no internal timeout beyond the HTTP client's.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use playsource::{PageClient, PlaybackResolver, ResolverConfig, StreamDescriptor};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ResolverConfig::load()?;
//! let fetcher = Arc::new(PageClient::new(&config.http)?);
//! let resolver = PlaybackResolver::from_config(&config, fetcher);
//!
//! let stream = StreamDescriptor::new("https://example.com/v/master.m3u8", "v-1", Arc::new(()));
//! if let Some(source) = resolver.resolve(&stream).await? {
//!     println!("{} -> {}", source.factory, source.uri());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::content_type::{classify, ContentType};
use super::descriptor::{MediaTag, StreamDescriptor};
use super::factory::FactorySet;
use super::negotiation::{NegotiatedRoute, NegotiatorRegistry, PageFetcher, SessionNegotiator};
use super::providers::NiconicoNegotiator;
use super::source::{MediaItem, PlayableSource};
use crate::config::{NegotiationPolicy, ResolverConfig, LIVE_STREAM_EDGE_GAP_MILLIS};
use crate::error::ResolveError;

/// Resolves stream descriptors into playable sources.
///
/// Holds no per-stream state; one instance can serve concurrent resolutions.
pub struct PlaybackResolver {
    factories: FactorySet,
    negotiators: NegotiatorRegistry,
    live_edge_gap: Duration,
    policy: NegotiationPolicy,
}

impl PlaybackResolver {
    /// Resolver with the given factories and negotiators and default settings.
    #[must_use]
    pub fn new(factories: FactorySet, negotiators: NegotiatorRegistry) -> Self {
        Self {
            factories,
            negotiators,
            live_edge_gap: Duration::from_millis(LIVE_STREAM_EDGE_GAP_MILLIS),
            policy: NegotiationPolicy::default(),
        }
    }

    /// Default factories plus every built-in negotiator, configured from `config`.
    pub fn from_config(config: &ResolverConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let negotiators = NegotiatorRegistry::new()
            .with(Box::new(NiconicoNegotiator::new(fetcher, &config.niconico)));

        Self::new(FactorySet::new(), negotiators)
            .with_live_edge_gap(config.live_edge_gap())
            .with_policy(config.negotiation_policy)
    }

    #[must_use]
    pub fn with_live_edge_gap(mut self, gap: Duration) -> Self {
        self.live_edge_gap = gap;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: NegotiationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn negotiators(&self) -> &NegotiatorRegistry {
        &self.negotiators
    }

    /// Resolve a stream along whichever path its type calls for.
    ///
    /// `Ok(None)` means a live stream that has no manifest yet.
    pub async fn resolve(
        &self,
        stream: &StreamDescriptor,
    ) -> Result<Option<PlayableSource>, ResolveError> {
        if stream.stream_type.is_live() {
            return self.maybe_build_live_source(stream);
        }

        self.build_media_source(
            &stream.url,
            &stream.cache_key,
            &stream.format_extension,
            Arc::clone(&stream.tag),
        )
        .await
        .map(Some)
    }

    /// Live source for `stream`, if it is live and exposes a manifest.
    ///
    /// The HLS playlist wins over the DASH manifest when both are present.
    pub fn maybe_build_live_source(
        &self,
        stream: &StreamDescriptor,
    ) -> Result<Option<PlayableSource>, ResolveError> {
        if !stream.stream_type.is_live() {
            return Ok(None);
        }

        let tag = Arc::clone(&stream.tag);
        if !stream.hls_url.is_empty() {
            return self
                .build_live_source(&stream.hls_url, ContentType::Hls, tag)
                .map(Some);
        }
        if !stream.dash_mpd_url.is_empty() {
            return self
                .build_live_source(&stream.dash_mpd_url, ContentType::Dash, tag)
                .map(Some);
        }

        debug!("Live stream has no manifest yet");
        Ok(None)
    }

    /// Build a live source with the configured live-edge offset.
    pub fn build_live_source(
        &self,
        url: &str,
        content_type: ContentType,
        tag: MediaTag,
    ) -> Result<PlayableSource, ResolveError> {
        let factory = self.factories.select(content_type, true)?;
        let source = factory.create(MediaItem::live(url, self.live_edge_gap, tag));

        info!(factory = %source.factory, url, "Resolved live source");
        Ok(source)
    }

    /// Build an on-demand source.
    ///
    /// A non-empty `override_extension` decides the content type instead of
    /// the URL. If a negotiator claims the URL, its route replaces both the
    /// factory and the URL.
    pub async fn build_media_source(
        &self,
        url: &str,
        cache_key: &str,
        override_extension: &str,
        tag: MediaTag,
    ) -> Result<PlayableSource, ResolveError> {
        let content_type = classify(url, Some(override_extension));
        debug!(%content_type, url, "Classified stream");

        let (factory, source_url) = match self.negotiators.find(url) {
            Some(negotiator) => {
                let route = self.negotiate(negotiator, url).await?;
                (route.factory, route.url)
            }
            None => (
                Arc::clone(self.factories.select(content_type, false)?),
                url.to_string(),
            ),
        };

        let source = factory.create(MediaItem::on_demand(source_url, cache_key, tag));
        info!(factory = %source.factory, url = source.uri(), "Resolved on-demand source");
        Ok(source)
    }

    /// Run a negotiator and apply the failure policy to its outcome.
    async fn negotiate(
        &self,
        negotiator: &dyn SessionNegotiator,
        url: &str,
    ) -> Result<NegotiatedRoute, ResolveError> {
        let provider = negotiator.name();
        debug!("Negotiating session with {provider}");

        match negotiator.negotiate(url).await {
            Ok(route) => Ok(route),
            Err(e) if e.is_fatal() => Err(ResolveError::AuthenticationRequired {
                provider,
                url: url.to_string(),
            }),
            Err(source) if self.policy == NegotiationPolicy::Strict => {
                Err(ResolveError::Negotiation { provider, source })
            }
            Err(e) => {
                warn!("Session negotiation with {provider} failed for {url}: {e}");
                Ok(negotiator.fallback(url))
            }
        }
    }
}
