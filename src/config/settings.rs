//! Settings structures for translate-search configuration

use crate::network::browser_headers;
use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use url::Url;

/// Main settings structure, loaded once at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub limiter: LimiterSettings,
    pub search: SearchSettings,
    pub translator: TranslatorSettings,
    pub product_search: ProductSearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with process environment variables
    pub fn merge_env(&mut self) -> Result<()> {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary variable source
    pub fn merge_from<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("TRANSLATE_API_URL") {
            self.translator.url = val;
        }
        if let Some(val) = var("TRANSLATE_API_TOKEN") {
            self.translator.token = Secret::new(val);
        }
        if let Some(val) = var("COSTCO_API_KEY") {
            self.product_search.api_key = Secret::new(val);
        }
        if let Some(val) = var("TRANSLATE_SEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("TRANSLATE_SEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("TRANSLATE_SEARCH_REQUIRE_AUTH") {
            self.server.require_auth = parse_flag(&val)
                .with_context(|| format!("TRANSLATE_SEARCH_REQUIRE_AUTH={:?}", val))?;
        }
        if let Some(val) = var("TRANSLATE_SEARCH_API_TOKENS") {
            self.server.api_tokens = val
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| Secret::new(t.to_string()))
                .collect();
        }
        if let Some(val) = var("TRANSLATE_SEARCH_RATE_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.limiter.requests_per_minute = limit;
            }
        }
        Ok(())
    }

    /// Reject incomplete or inconsistent settings before the server starts
    pub fn validate(&self) -> Result<()> {
        parse_http_url(&self.translator.url).context("translator.url (TRANSLATE_API_URL)")?;
        ensure!(
            !self.translator.token.is_blank(),
            "translator.token (TRANSLATE_API_TOKEN) is not set"
        );

        parse_http_url(&self.product_search.endpoint).context("product_search.endpoint")?;
        ensure!(
            !self.product_search.api_key.is_blank(),
            "product_search.api_key (COSTCO_API_KEY) is not set"
        );
        ensure!(
            self.product_search.docs_pointer.starts_with('/'),
            "product_search.docs_pointer must be a JSON pointer starting with '/'"
        );

        ensure!(
            self.outgoing.request_timeout.is_finite() && self.outgoing.request_timeout > 0.0,
            "outgoing.request_timeout must be a positive number of seconds"
        );
        ensure!(
            self.search.translation_concurrency > 0,
            "search.translation_concurrency must be at least 1"
        );
        if self.limiter.enabled {
            ensure!(
                self.limiter.requests_per_minute > 0,
                "limiter.requests_per_minute must be at least 1 when the limiter is enabled"
            );
        }
        if self.server.require_auth && self.server.api_tokens.iter().all(Secret::is_blank) {
            bail!("server.require_auth is enabled but no server.api_tokens are configured");
        }

        Ok(())
    }
}

/// Parse a boolean switch; anything unrecognised is an error
fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected one of true/false, 1/0, yes/no, on/off"),
    }
}

fn parse_http_url(raw: &str) -> Result<Url> {
    ensure!(!raw.trim().is_empty(), "URL is not set");
    let url = Url::parse(raw).with_context(|| format!("invalid URL {:?}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("unsupported URL scheme {:?}", other),
    }
}

/// A credential that never appears in logs or debug output
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Require `Authorization: Bearer <token>` on the search endpoint
    pub require_auth: bool,
    /// Accepted bearer tokens when `require_auth` is set
    pub api_tokens: Vec<Secret>,
    /// Method to determine real IP
    pub real_ip_method: RealIpMethod,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "127.0.0.1".to_string(),
            require_auth: false,
            api_tokens: vec![],
            real_ip_method: RealIpMethod::default(),
        }
    }
}

/// Method to determine real client IP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealIpMethod {
    /// Use X-Forwarded-For header
    XForwardedFor,
    /// Use X-Real-IP header
    XRealIp,
    /// Use connection IP directly
    #[default]
    Connection,
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Maximum request timeout
    pub max_request_timeout: Option<f64>,
    /// Appended to the default user agent
    pub useragent_suffix: Option<String>,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl OutgoingSettings {
    /// Request timeout in seconds, clamped to the configured maximum
    pub fn effective_timeout(&self) -> f64 {
        match self.max_request_timeout {
            Some(max) if max > 0.0 => self.request_timeout.min(max),
            _ => self.request_timeout,
        }
    }
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            max_request_timeout: Some(30.0),
            useragent_suffix: None,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Per-client request limiter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterSettings {
    pub enabled: bool,
    pub requests_per_minute: u32,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 60,
        }
    }
}

/// Search pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Language the catalog is searched in
    pub catalog_lang: String,
    /// Maximum result-name translations in flight per request
    pub translation_concurrency: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            catalog_lang: "en".to_string(),
            translation_concurrency: 4,
        }
    }
}

/// Remote translation API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorSettings {
    pub url: String,
    pub token: Secret,
}

/// Remote product catalog search API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSearchSettings {
    pub endpoint: String,
    pub api_key: Secret,
    /// Headers sent with every search request (the API key is added separately)
    pub headers: BTreeMap<String, String>,
    /// Fixed query parameters; `q` is added per request
    pub params: BTreeMap<String, String>,
    /// JSON pointer to the array of product documents
    pub docs_pointer: String,
    /// Document field holding the product name
    pub name_field: String,
    /// Document field holding the product price
    pub price_field: String,
}

impl Default for ProductSearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://search.costco.com/api/apps/www_costco_com/query/www_costco_com_search"
                .to_string(),
            api_key: Secret::default(),
            headers: browser_headers(),
            params: default_catalog_params(),
            docs_pointer: "/response/docs".to_string(),
            name_field: "name".to_string(),
            price_field: "price".to_string(),
        }
    }
}

/// Catalog scope of the search API: US locale, Washington warehouses, ship-it items
fn default_catalog_params() -> BTreeMap<String, String> {
    [
        ("expoption", "def"),
        ("locale", "en-US"),
        ("start", "0"),
        ("expand", "false"),
        ("userLocation", "WA"),
        (
            "loc",
            "115-bd,1-wh,1250-3pl,1321-wm,1456-3pl,283-wm,561-wm,725-wm,731-wm,758-wm,759-wm,\
             847_0-cor,847_0-cwt,847_0-edi,847_0-ehs,847_0-membership,847_0-mpt,847_0-spc,\
             847_0-wm,847_1-cwt,847_1-edi,847_d-fis,847_lg_n1f-edi,847_NA-cor,847_NA-pharmacy,\
             847_NA-wm,847_ss_u362-edi,847_wp_r458-edi,951-wm,952-wm,9847-wcs",
        ),
        ("whloc", "1-wh"),
        (
            "fq",
            r#"{!tag=item_program_eligibility}item_program_eligibility:("ShipIt")"#,
        ),
        ("chdcategory", "true"),
        ("chdheader", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
