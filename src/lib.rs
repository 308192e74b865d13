//! `playsource` - Playback source resolution for remote media streams
//!
//! # Features
//!
//! - **Classification**: HLS, DASH, Smooth Streaming, or progressive, from the URL or a format override
//! - **Factory selection**: total lookup over protocol and live/on-demand mode
//! - **Session negotiation**: provider handshakes that decide the protocol server-side (niconico)
//! - **Live playback**: live-edge offset applied to live manifests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use playsource::{PageClient, PlaybackResolver, ResolverConfig, StreamDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ResolverConfig::default();
//!     let resolver = PlaybackResolver::from_config(&config, Arc::new(PageClient::new(&config.http)?));
//!     let stream = StreamDescriptor::new("https://www.nicovideo.jp/watch/sm9", "sm9", Arc::new(()));
//!     let source = resolver.resolve(&stream).await?;
//!     println!("{source:?}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod http_client;
pub mod stream;

pub use config::{NegotiationPolicy, ResolverConfig};
pub use error::{ConfigError, NegotiationError, ResolveError};
pub use http_client::PageClient;
pub use stream::{
    classify, ContentType, FactoryKind, FactorySet, MediaTag, PlayableSource, PlaybackResolver,
    StreamDescriptor, StreamType,
};

/// Version of playsource
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
