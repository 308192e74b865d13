//! Provider session negotiators

pub mod niconico;

pub use niconico::{HlsUrlTransform, NiconicoNegotiator, WatchManifestTransform};
