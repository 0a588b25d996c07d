//! User agent and header profiles

use std::collections::BTreeMap;

/// Chrome on Android, as expected by the catalog search API
const MOBILE_CHROME_UA: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Mobile Safari/537.36";

/// User agent sent to upstreams that do not require a browser profile
pub fn default_user_agent(suffix: Option<&str>) -> String {
    match suffix.map(str::trim).filter(|s| !s.is_empty()) {
        Some(suffix) => format!("translate-search/{} {}", crate::VERSION, suffix),
        None => format!("translate-search/{}", crate::VERSION),
    }
}

/// Standard accept headers for JSON requests
pub fn accept_json() -> &'static str {
    "application/json"
}

/// Browser-like header set for the catalog search API.
///
/// The API rejects requests that do not look like they come from the store
/// website, so these mimic a mobile Chrome session on www.costco.com.
pub fn browser_headers() -> BTreeMap<String, String> {
    [
        ("Accept", accept_json().to_string()),
        ("Accept-Language", "en-US,en;q=0.9".to_string()),
        ("Connection", "keep-alive".to_string()),
        ("Content-Type", "application/json".to_string()),
        ("DNT", "1".to_string()),
        ("Origin", "https://www.costco.com".to_string()),
        ("Referer", "https://www.costco.com/".to_string()),
        ("Sec-Fetch-Dest", "empty".to_string()),
        ("Sec-Fetch-Mode", "cors".to_string()),
        ("Sec-Fetch-Site", "same-site".to_string()),
        ("User-Agent", MOBILE_CHROME_UA.to_string()),
        (
            "sec-ch-ua",
            r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#.to_string(),
        ),
        ("sec-ch-ua-mobile", "?1".to_string()),
        ("sec-ch-ua-platform", r#""Android""#.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}
