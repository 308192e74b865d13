//! Browser request profiles
//!
//! Watch pages are served differently to non-browser clients, so page
//! requests carry a realistic desktop browser header set. The
//! `Accept-Language` header is derived from the provider's locale rather
//! than randomized.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE,
    USER_AGENT,
};

/// Browser profile used for page requests
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub accept_encoding: String,
    pub sec_ch_ua: String,
    pub sec_ch_ua_platform: String,
}

/// Recent Chrome versions
const CHROME_VERSIONS: &[(&str, &str)] = &[
    ("131", "131.0.0.0"),
    ("130", "130.0.0.0"),
    ("129", "129.0.0.0"),
    ("128", "128.0.0.0"),
];

/// Recent Firefox versions
const FIREFOX_VERSIONS: &[&str] = &["133.0", "132.0", "131.0"];

#[derive(Debug, Clone, Copy)]
enum Platform {
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    const ALL: [Self; 3] = [Self::Windows, Self::MacOS, Self::Linux];

    fn os_string(self) -> &'static str {
        match self {
            Platform::MacOS => "Macintosh; Intel Mac OS X 10_15_7",
            Platform::Windows => "Windows NT 10.0; Win64; x64",
            Platform::Linux => "X11; Linux x86_64",
        }
    }

    fn sec_ch_platform(self) -> &'static str {
        match self {
            Platform::MacOS => "\"macOS\"",
            Platform::Windows => "\"Windows\"",
            Platform::Linux => "\"Linux\"",
        }
    }
}

/// Build an `Accept-Language` value preferring `locale`, then its bare
/// language, then English.
///
/// `ja-JP` becomes `ja-JP,ja;q=0.9,en;q=0.8`.
#[must_use]
pub fn accept_language_for(locale: &str) -> String {
    let locale = locale.trim();
    if locale.is_empty() {
        return "en-US,en;q=0.9".to_string();
    }

    let language = locale.split(['-', '_']).next().unwrap_or(locale);
    let mut value = locale.replace('_', "-");
    if language != locale {
        value.push_str(&format!(",{language};q=0.9"));
    }
    if language != "en" {
        value.push_str(",en;q=0.8");
    }
    value
}

/// Chrome profile for the given locale
#[must_use]
pub fn chrome_profile(locale: &str) -> BrowserProfile {
    let mut rng = rand::thread_rng();
    let platform = *Platform::ALL.choose(&mut rng).unwrap_or(&Platform::Windows);
    let (major, full) = *CHROME_VERSIONS.choose(&mut rng).unwrap_or(&CHROME_VERSIONS[0]);

    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{full} Safari/537.36",
            platform.os_string()
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
            .to_string(),
        accept_language: accept_language_for(locale),
        accept_encoding: "gzip, deflate, br, zstd".to_string(),
        sec_ch_ua: format!(
            "\"Google Chrome\";v=\"{major}\", \"Chromium\";v=\"{major}\", \"Not_A Brand\";v=\"24\""
        ),
        sec_ch_ua_platform: platform.sec_ch_platform().to_string(),
    }
}

/// Firefox profile for the given locale
#[must_use]
pub fn firefox_profile(locale: &str) -> BrowserProfile {
    let mut rng = rand::thread_rng();
    let platform = *Platform::ALL.choose(&mut rng).unwrap_or(&Platform::Windows);
    let version = *FIREFOX_VERSIONS.choose(&mut rng).unwrap_or(&FIREFOX_VERSIONS[0]);

    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({}; rv:{version}) Gecko/20100101 Firefox/{version}",
            platform.os_string()
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        accept_language: accept_language_for(locale),
        accept_encoding: "gzip, deflate, br, zstd".to_string(),
        // Firefox doesn't send Sec-CH-UA headers
        sec_ch_ua: String::new(),
        sec_ch_ua_platform: String::new(),
    }
}

/// Pick a profile for the locale, weighted toward Chrome
#[must_use]
pub fn profile_for_locale(locale: &str) -> BrowserProfile {
    let roll: f32 = rand::thread_rng().gen();
    if roll < 0.75 {
        chrome_profile(locale)
    } else {
        firefox_profile(locale)
    }
}

impl BrowserProfile {
    /// Convert profile to reqwest `HeaderMap`
    pub fn to_headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_str(&self.accept)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&self.accept_language)?);
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_str(&self.accept_encoding)?);

        if !self.sec_ch_ua.is_empty() {
            headers.insert("Sec-CH-UA", HeaderValue::from_str(&self.sec_ch_ua)?);
            headers.insert("Sec-CH-UA-Mobile", HeaderValue::from_static("?0"));
            headers.insert(
                "Sec-CH-UA-Platform",
                HeaderValue::from_str(&self.sec_ch_ua_platform)?,
            );
        }

        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_language_region() {
        assert_eq!(accept_language_for("ja-JP"), "ja-JP,ja;q=0.9,en;q=0.8");
        assert_eq!(accept_language_for("fi_FI"), "fi-FI,fi;q=0.9,en;q=0.8");
    }

    #[test]
    fn test_accept_language_bare_and_english() {
        assert_eq!(accept_language_for("de"), "de,en;q=0.8");
        assert_eq!(accept_language_for("en-GB"), "en-GB,en;q=0.9");
        assert_eq!(accept_language_for(""), "en-US,en;q=0.9");
    }

    #[test]
    fn test_chrome_profile() {
        let profile = chrome_profile("ja-JP");
        assert!(profile.user_agent.contains("Chrome"));
        assert!(!profile.sec_ch_ua.is_empty());
        assert!(profile.accept_language.starts_with("ja-JP"));
    }

    #[test]
    fn test_firefox_profile() {
        let profile = firefox_profile("ja-JP");
        assert!(profile.user_agent.contains("Firefox"));
        assert!(profile.sec_ch_ua.is_empty());
    }

    #[test]
    fn test_headers_conversion() {
        let headers = profile_for_locale("ja-JP").to_headers().unwrap();
        assert!(headers.contains_key(USER_AGENT));
        assert_eq!(
            headers.get(ACCEPT_LANGUAGE).unwrap(),
            "ja-JP,ja;q=0.9,en;q=0.8"
        );
    }
}
