//! Source factories and the playable sources they produce.
//!
//! A [`SourceFactory`] stands in for a playback engine's per-protocol media
//! source builder. The resolver decides *which* factory to use and hands it a
//! fully configured [`MediaItem`]; what the factory does with it is its own
//! business. [`DeliveryFactory`] is the built-in implementation, which simply
//! records the decision.

use std::sync::Arc;
use std::time::Duration;

use super::descriptor::MediaTag;

/// Delivery variant a provider negotiated for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderDelivery {
    /// Session-bound HLS playlist.
    Hls,
    /// Raw media bytes through the provider's own data source.
    Raw,
}

/// Identifies a factory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactoryKind {
    /// Shared by live and on-demand Smooth Streaming.
    SmoothStreaming,
    LiveDash,
    LiveHls,
    Dash,
    Hls,
    /// Progressive download of a single media file.
    Progressive,
    /// Owned by a session negotiator.
    Provider {
        provider: &'static str,
        delivery: ProviderDelivery,
    },
}

impl std::fmt::Display for FactoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SmoothStreaming => f.write_str("smooth-streaming"),
            Self::LiveDash => f.write_str("live-dash"),
            Self::LiveHls => f.write_str("live-hls"),
            Self::Dash => f.write_str("dash"),
            Self::Hls => f.write_str("hls"),
            Self::Progressive => f.write_str("progressive"),
            Self::Provider { provider, delivery } => match delivery {
                ProviderDelivery::Hls => write!(f, "{provider}-hls"),
                ProviderDelivery::Raw => write!(f, "{provider}-raw"),
            },
        }
    }
}

/// Playback starts this far behind the live edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveConfiguration {
    pub target_offset: Duration,
}

/// Request handed to a [`SourceFactory`].
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub uri: String,
    pub tag: MediaTag,
    /// Set for on-demand items only.
    pub custom_cache_key: Option<String>,
    /// Set for live items only.
    pub live_configuration: Option<LiveConfiguration>,
}

impl MediaItem {
    pub fn on_demand(uri: impl Into<String>, cache_key: impl Into<String>, tag: MediaTag) -> Self {
        Self {
            uri: uri.into(),
            tag,
            custom_cache_key: Some(cache_key.into()),
            live_configuration: None,
        }
    }

    pub fn live(uri: impl Into<String>, target_offset: Duration, tag: MediaTag) -> Self {
        Self {
            uri: uri.into(),
            tag,
            custom_cache_key: None,
            live_configuration: Some(LiveConfiguration { target_offset }),
        }
    }
}

/// Output of a resolution: a configured item bound to the factory that built it.
#[derive(Debug, Clone)]
pub struct PlayableSource {
    pub factory: FactoryKind,
    pub item: MediaItem,
}

impl PlayableSource {
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.item.uri
    }

    #[must_use]
    pub fn tag(&self) -> &MediaTag {
        &self.item.tag
    }

    #[must_use]
    pub fn cache_key(&self) -> Option<&str> {
        self.item.custom_cache_key.as_deref()
    }

    #[must_use]
    pub fn live_offset(&self) -> Option<Duration> {
        self.item.live_configuration.map(|c| c.target_offset)
    }
}

/// Builds playable sources for one protocol and playback mode.
pub trait SourceFactory: Send + Sync {
    fn kind(&self) -> FactoryKind;

    fn create(&self, item: MediaItem) -> PlayableSource;
}

/// Factory that binds the item to its own kind and nothing more.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryFactory {
    kind: FactoryKind,
}

impl DeliveryFactory {
    #[must_use]
    pub fn new(kind: FactoryKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn shared(kind: FactoryKind) -> Arc<dyn SourceFactory> {
        Arc::new(Self::new(kind))
    }
}

impl SourceFactory for DeliveryFactory {
    fn kind(&self) -> FactoryKind {
        self.kind
    }

    fn create(&self, item: MediaItem) -> PlayableSource {
        PlayableSource {
            factory: self.kind,
            item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_demand_item() {
        let tag: MediaTag = Arc::new(7_u32);
        let item = MediaItem::on_demand("https://example.com/a.mp4", "key-1", Arc::clone(&tag));
        assert_eq!(item.custom_cache_key.as_deref(), Some("key-1"));
        assert!(item.live_configuration.is_none());
        assert!(Arc::ptr_eq(&item.tag, &tag));
    }

    #[test]
    fn test_delivery_factory_binds_kind() {
        let tag: MediaTag = Arc::new(());
        let factory = DeliveryFactory::new(FactoryKind::LiveHls);
        let source = factory.create(MediaItem::live(
            "https://example.com/live.m3u8",
            Duration::from_secs(10),
            tag,
        ));
        assert_eq!(source.factory, FactoryKind::LiveHls);
        assert_eq!(source.live_offset(), Some(Duration::from_secs(10)));
        assert_eq!(source.cache_key(), None);
    }

    #[test]
    fn test_factory_kind_display() {
        let kind = FactoryKind::Provider {
            provider: "niconico",
            delivery: ProviderDelivery::Raw,
        };
        assert_eq!(kind.to_string(), "niconico-raw");
        assert_eq!(FactoryKind::Progressive.to_string(), "progressive");
    }
}
