//! Stream resolution core
//!
//! Classifies stream URLs, negotiates provider sessions where needed, and
//! picks the source factory that turns a stream into a playable source.

pub mod content_type;
pub mod descriptor;
pub mod factory;
pub mod negotiation;
pub mod providers;
pub mod resolver;
pub mod source;

pub use content_type::{classify, ContentType};
pub use descriptor::{MediaTag, StreamDescriptor, StreamType};
pub use factory::FactorySet;
pub use negotiation::{NegotiatedRoute, NegotiatorRegistry, PageFetcher, SessionNegotiator};
pub use resolver::PlaybackResolver;
pub use source::{
    DeliveryFactory, FactoryKind, LiveConfiguration, MediaItem, PlayableSource, ProviderDelivery,
    SourceFactory,
};
