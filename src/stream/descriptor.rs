//! Input description of a stream to resolve.

use std::any::Any;
use std::sync::Arc;

/// Caller-owned metadata attached to the produced source.
///
/// The resolver never inspects it and never copies it: the same allocation
/// the caller passed in ends up on the [`PlayableSource`](super::PlayableSource).
pub type MediaTag = Arc<dyn Any + Send + Sync>;

/// Kind of stream as reported by the extraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamType {
    #[default]
    None,
    VideoStream,
    AudioStream,
    LiveStream,
    AudioLiveStream,
    /// A finished live broadcast, now available on demand.
    PostLiveStream,
    PostLiveAudioStream,
}

impl StreamType {
    /// Only ongoing broadcasts count; post-live streams play on demand.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::LiveStream | Self::AudioLiveStream)
    }
}

impl std::str::FromStr for StreamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "none" => Ok(Self::None),
            "video" | "videostream" => Ok(Self::VideoStream),
            "audio" | "audiostream" => Ok(Self::AudioStream),
            "live" | "livestream" => Ok(Self::LiveStream),
            "audiolive" | "audiolivestream" => Ok(Self::AudioLiveStream),
            "postlive" | "postlivestream" => Ok(Self::PostLiveStream),
            "postliveaudio" | "postliveaudiostream" => Ok(Self::PostLiveAudioStream),
            other => Err(format!("unknown stream type: {other}")),
        }
    }
}

/// Everything the resolver needs to know about one stream.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    /// URL used for on-demand playback.
    pub url: String,
    /// HLS playlist for live playback. Empty means absent.
    pub hls_url: String,
    /// DASH manifest for live playback. Empty means absent.
    pub dash_mpd_url: String,
    pub stream_type: StreamType,
    pub tag: MediaTag,
    /// Forwarded untouched to the source factory.
    pub cache_key: String,
    /// Classify as if the URL ended in `.{ext}`. Empty means absent.
    pub format_extension: String,
}

impl StreamDescriptor {
    /// On-demand descriptor with no live manifests.
    pub fn new(url: impl Into<String>, cache_key: impl Into<String>, tag: MediaTag) -> Self {
        Self {
            url: url.into(),
            hls_url: String::new(),
            dash_mpd_url: String::new(),
            stream_type: StreamType::VideoStream,
            tag,
            cache_key: cache_key.into(),
            format_extension: String::new(),
        }
    }

    #[must_use]
    pub fn with_stream_type(mut self, stream_type: StreamType) -> Self {
        self.stream_type = stream_type;
        self
    }

    #[must_use]
    pub fn with_hls_url(mut self, url: impl Into<String>) -> Self {
        self.hls_url = url.into();
        self
    }

    #[must_use]
    pub fn with_dash_mpd_url(mut self, url: impl Into<String>) -> Self {
        self.dash_mpd_url = url.into();
        self
    }

    #[must_use]
    pub fn with_format_extension(mut self, ext: impl Into<String>) -> Self {
        self.format_extension = ext.into();
        self
    }

    /// Declared live and at least one live manifest present.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.stream_type.is_live() && (!self.hls_url.is_empty() || !self.dash_mpd_url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag() -> MediaTag {
        Arc::new("meta")
    }

    #[test]
    fn test_live_stream_types() {
        assert!(StreamType::LiveStream.is_live());
        assert!(StreamType::AudioLiveStream.is_live());
        assert!(!StreamType::PostLiveStream.is_live());
        assert!(!StreamType::VideoStream.is_live());
        assert!(!StreamType::None.is_live());
    }

    #[test]
    fn test_is_live_needs_a_manifest() {
        let stream = StreamDescriptor::new("https://example.com/v", "k", tag())
            .with_stream_type(StreamType::LiveStream);
        assert!(!stream.is_live());
        assert!(stream.clone().with_dash_mpd_url("https://example.com/l.mpd").is_live());
        assert!(stream.with_hls_url("https://example.com/l.m3u8").is_live());
    }

    #[test]
    fn test_is_live_needs_live_type() {
        let stream = StreamDescriptor::new("https://example.com/v", "k", tag())
            .with_hls_url("https://example.com/l.m3u8");
        assert!(!stream.is_live());
    }

    #[test]
    fn test_parse_stream_type() {
        assert_eq!("live".parse::<StreamType>().unwrap(), StreamType::LiveStream);
        assert_eq!("AUDIO_LIVE_STREAM".parse::<StreamType>().unwrap(), StreamType::AudioLiveStream);
        assert_eq!("post-live".parse::<StreamType>().unwrap(), StreamType::PostLiveStream);
        assert!("radio".parse::<StreamType>().is_err());
    }
}
