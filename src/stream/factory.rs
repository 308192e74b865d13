//! Total mapping from `(ContentType, live)` to a source factory.

use std::sync::Arc;

use super::content_type::ContentType;
use super::source::{DeliveryFactory, FactoryKind, SourceFactory};
use crate::error::ResolveError;

/// One factory per protocol slot.
///
/// Every slot is filled at construction, so [`select`](Self::select) is a
/// plain lookup. The only hole is live progressive playback, which no
/// engine supports.
#[derive(Clone)]
pub struct FactorySet {
    pub smooth_streaming: Arc<dyn SourceFactory>,
    pub live_dash: Arc<dyn SourceFactory>,
    pub live_hls: Arc<dyn SourceFactory>,
    pub dash: Arc<dyn SourceFactory>,
    pub hls: Arc<dyn SourceFactory>,
    pub progressive: Arc<dyn SourceFactory>,
}

impl FactorySet {
    /// Set backed by [`DeliveryFactory`] in every slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            smooth_streaming: DeliveryFactory::shared(FactoryKind::SmoothStreaming),
            live_dash: DeliveryFactory::shared(FactoryKind::LiveDash),
            live_hls: DeliveryFactory::shared(FactoryKind::LiveHls),
            dash: DeliveryFactory::shared(FactoryKind::Dash),
            hls: DeliveryFactory::shared(FactoryKind::Hls),
            progressive: DeliveryFactory::shared(FactoryKind::Progressive),
        }
    }

    /// Pick the factory for a content type in the given mode.
    ///
    /// Fails only for `(Other, live)`. Hitting that is a caller bug.
    pub fn select(
        &self,
        content_type: ContentType,
        live: bool,
    ) -> Result<&Arc<dyn SourceFactory>, ResolveError> {
        let factory = match (content_type, live) {
            (ContentType::SmoothStreaming, _) => &self.smooth_streaming,
            (ContentType::Dash, true) => &self.live_dash,
            (ContentType::Hls, true) => &self.live_hls,
            (ContentType::Dash, false) => &self.dash,
            (ContentType::Hls, false) => &self.hls,
            (ContentType::Other, false) => &self.progressive,
            (ContentType::Other, true) => {
                return Err(ResolveError::UnsupportedContentType { content_type, live });
            }
        };
        Ok(factory)
    }
}

impl Default for FactorySet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FactorySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactorySet")
            .field("smooth_streaming", &self.smooth_streaming.kind())
            .field("live_dash", &self.live_dash.kind())
            .field("live_hls", &self.live_hls.kind())
            .field("dash", &self.dash.kind())
            .field("hls", &self.hls.kind())
            .field("progressive", &self.progressive.kind())
            .finish()
    }
}
