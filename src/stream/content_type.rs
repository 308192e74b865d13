//! Delivery protocol classification from URLs.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Delivery protocol of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Microsoft Smooth Streaming (`.ism` / `.isml` manifests).
    SmoothStreaming,
    /// MPEG-DASH (`.mpd` manifests).
    Dash,
    /// HTTP Live Streaming (`.m3u8` playlists).
    Hls,
    /// Anything else, played as a progressive download.
    Other,
}

impl ContentType {
    /// All variants, in selector order.
    pub const ALL: [Self; 4] = [Self::SmoothStreaming, Self::Dash, Self::Hls, Self::Other];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SmoothStreaming => "ss",
            Self::Dash => "dash",
            Self::Hls => "hls",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `foo.ism`, `foo.isml`, optionally followed by `/Manifest` and a format hint.
static ISM_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:.*\.)?isml?(?:/(manifest(.*))?)?$").expect("ISM pattern is valid")
});

const ISM_DASH_FORMAT: &str = "format=mpd-time-csf";
const ISM_HLS_FORMAT: &str = "format=m3u8-aapl";

/// Classify a stream URL.
///
/// A non-empty `extension_override` replaces whatever the URL itself says:
/// the synthetic path `.{ext}` is classified instead. An empty override
/// counts as no override.
#[must_use]
pub fn classify(url: &str, extension_override: Option<&str>) -> ContentType {
    match extension_override {
        Some(ext) if !ext.is_empty() => classify_path(&format!(".{ext}")),
        _ => classify_url(url),
    }
}

/// Classify by the URL's path. Query and fragment never count.
#[must_use]
pub fn classify_url(url: &str) -> ContentType {
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme().eq_ignore_ascii_case("rtsp") => ContentType::Other,
        Ok(parsed) => classify_path(parsed.path()),
        Err(_) => {
            // Relative or otherwise unparsable: strip query/fragment by hand.
            let path = url.split(['?', '#']).next().unwrap_or(url);
            classify_path(path)
        }
    }
}

/// Classify a bare path or file name.
#[must_use]
pub fn classify_path(path: &str) -> ContentType {
    let path = path.to_ascii_lowercase();

    if path.ends_with(".mpd") {
        return ContentType::Dash;
    }
    if path.ends_with(".m3u8") {
        return ContentType::Hls;
    }

    if let Some(captures) = ISM_PATH.captures(&path) {
        if let Some(hint) = captures.get(2).map(|m| m.as_str()) {
            if hint.contains(ISM_DASH_FORMAT) {
                return ContentType::Dash;
            }
            if hint.contains(ISM_HLS_FORMAT) {
                return ContentType::Hls;
            }
        }
        return ContentType::SmoothStreaming;
    }

    ContentType::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_extensions() {
        assert_eq!(classify("https://cdn.example.com/v/manifest.mpd", None), ContentType::Dash);
        assert_eq!(classify("https://cdn.example.com/v/master.m3u8", None), ContentType::Hls);
        assert_eq!(classify("https://cdn.example.com/v/clip.ism", None), ContentType::SmoothStreaming);
        assert_eq!(
            classify("https://cdn.example.com/v/clip.isml/Manifest", None),
            ContentType::SmoothStreaming
        );
        assert_eq!(classify("https://cdn.example.com/v/clip.mp4", None), ContentType::Other);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("https://example.com/LIVE/INDEX.M3U8", None), ContentType::Hls);
        assert_eq!(classify("https://example.com/Stream.MPD", None), ContentType::Dash);
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            classify("https://example.com/master.m3u8?token=abc.mpd", None),
            ContentType::Hls
        );
        assert_eq!(
            classify("https://example.com/video.mp4?format=.m3u8", None),
            ContentType::Other
        );
        assert_eq!(classify("https://example.com/a.mpd#t=10", None), ContentType::Dash);
    }

    #[test]
    fn test_ism_format_hints() {
        assert_eq!(
            classify("https://example.com/clip.ism/Manifest(format=mpd-time-csf)", None),
            ContentType::Dash
        );
        assert_eq!(
            classify("https://example.com/clip.ism/Manifest(format=m3u8-aapl)", None),
            ContentType::Hls
        );
    }

    #[test]
    fn test_override_wins_over_url() {
        assert_eq!(classify("https://example.com/master.m3u8", Some("mpd")), ContentType::Dash);
        assert_eq!(classify("https://example.com/stream", Some("m3u8")), ContentType::Hls);
        assert_eq!(classify("https://example.com/manifest.mpd", Some("webm")), ContentType::Other);
        assert_eq!(classify("https://example.com/video", Some("ism")), ContentType::SmoothStreaming);
    }

    #[test]
    fn test_empty_override_is_ignored() {
        assert_eq!(classify("https://example.com/master.m3u8", Some("")), ContentType::Hls);
    }

    #[test]
    fn test_unrecognized_falls_back_to_other() {
        assert_eq!(classify("https://www.nicovideo.jp/watch/sm9", None), ContentType::Other);
        assert_eq!(classify("rtsp://camera.local/stream.m3u8", None), ContentType::Other);
        assert_eq!(classify("not a url at all", None), ContentType::Other);
        assert_eq!(classify("", None), ContentType::Other);
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(classify("/media/master.m3u8?x=1", None), ContentType::Hls);
        assert_eq!(classify("stream.mpd", None), ContentType::Dash);
    }

    #[test]
    fn test_deterministic() {
        let url = "https://example.com/path/clip.isml/manifest";
        assert_eq!(classify(url, None), classify(url, None));
    }

    #[test]
    fn test_display() {
        assert_eq!(ContentType::Hls.to_string(), "hls");
        assert_eq!(ContentType::SmoothStreaming.to_string(), "ss");
    }
}
