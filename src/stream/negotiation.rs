//! Provider session negotiation.
//!
//! Some providers hide the delivery protocol behind a per-session decision
//! made server-side. A [`SessionNegotiator`] claims such URLs and, before a
//! factory is chosen, discovers the granted protocol and the URL to play.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: the HTTP seam negotiators fetch watch pages through
//! - [`SessionNegotiator`]: async trait for one provider's handshake
//! - [`NegotiatorRegistry`]: dispatches URLs to the negotiator that claims them

use std::sync::Arc;

use async_trait::async_trait;

use super::source::SourceFactory;
use crate::error::NegotiationError;

/// Fetches a page body as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url`, asking for content in `locale` (a BCP 47 tag like `ja-JP`).
    async fn fetch_page(&self, url: &str, locale: &str) -> Result<String, NegotiationError>;
}

/// Where a negotiated stream should be played from, and by whom.
#[derive(Clone)]
pub struct NegotiatedRoute {
    pub url: String,
    pub factory: Arc<dyn SourceFactory>,
}

impl std::fmt::Debug for NegotiatedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegotiatedRoute")
            .field("url", &self.url)
            .field("factory", &self.factory.kind())
            .finish()
    }
}

/// Provider-specific session handshake.
#[async_trait]
pub trait SessionNegotiator: Send + Sync {
    /// Short lowercase provider name (e.g., `"niconico"`).
    fn name(&self) -> &'static str;

    /// Returns `true` if URLs like this one need negotiation.
    fn matches(&self, url: &str) -> bool;

    /// Run the handshake and return the route the server granted.
    async fn negotiate(&self, url: &str) -> Result<NegotiatedRoute, NegotiationError>;

    /// Route to use when negotiation failed for a non-fatal reason.
    fn fallback(&self, url: &str) -> NegotiatedRoute;
}

/// Routes URLs to session negotiators.
///
/// Negotiators are checked in registration order. First match wins.
#[derive(Default)]
pub struct NegotiatorRegistry {
    negotiators: Vec<Box<dyn SessionNegotiator>>,
}

impl NegotiatorRegistry {
    /// Registry with no negotiators; every URL resolves generically.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, negotiator: Box<dyn SessionNegotiator>) {
        tracing::debug!("Registered session negotiator: {}", negotiator.name());
        self.negotiators.push(negotiator);
    }

    #[must_use]
    pub fn with(mut self, negotiator: Box<dyn SessionNegotiator>) -> Self {
        self.register(negotiator);
        self
    }

    /// The negotiator claiming `url`, if any.
    #[must_use]
    pub fn find(&self, url: &str) -> Option<&dyn SessionNegotiator> {
        self.negotiators
            .iter()
            .find(|n| n.matches(url))
            .map(|n| n.as_ref())
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.negotiators.iter().map(|n| n.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.negotiators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.negotiators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::source::{DeliveryFactory, FactoryKind, ProviderDelivery};

    struct Fixed {
        name: &'static str,
        host: &'static str,
    }

    #[async_trait]
    impl SessionNegotiator for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn matches(&self, url: &str) -> bool {
            url.contains(self.host)
        }

        async fn negotiate(&self, url: &str) -> Result<NegotiatedRoute, NegotiationError> {
            Ok(self.fallback(url))
        }

        fn fallback(&self, url: &str) -> NegotiatedRoute {
            NegotiatedRoute {
                url: url.to_string(),
                factory: DeliveryFactory::shared(FactoryKind::Provider {
                    provider: self.name,
                    delivery: ProviderDelivery::Raw,
                }),
            }
        }
    }

    #[test]
    fn empty_registry_matches_nothing() {
        let registry = NegotiatorRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.find("https://example.com/v.mp4").is_none());
    }

    #[test]
    fn first_match_wins() {
        let registry = NegotiatorRegistry::new()
            .with(Box::new(Fixed { name: "first", host: "example.com" }))
            .with(Box::new(Fixed { name: "second", host: "example" }));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["first", "second"]);
        assert_eq!(registry.find("https://example.com/v").unwrap().name(), "first");
        assert_eq!(registry.find("https://example.org/v").unwrap().name(), "second");
        assert!(registry.find("https://other.net/v").is_none());
    }

    #[test]
    fn route_debug_shows_factory_kind() {
        let route = Fixed { name: "p", host: "h" }.fallback("https://h/v");
        let rendered = format!("{route:?}");
        assert!(rendered.contains("https://h/v"));
        assert!(rendered.contains("Provider"));
    }
}
