//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

use crate::core::errors::{GatewayError, Result};

/// Default per-call timeout for every provider
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_GOOGLE_URL: &str = "https://translate.googleapis.com/translate_a/single";
const DEFAULT_MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";
const DEFAULT_PROVIDERS: &str = "google,mymemory";

/// Vendors the gateway knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Translate free web endpoint
    Google,
    /// MyMemory translation memory API
    MyMemory,
    /// Self-hosted LibreTranslate instance
    LibreTranslate,
}

impl ProviderKind {
    /// Kind for a configured name, `None` when unknown
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "google" => Some(ProviderKind::Google),
            "mymemory" => Some(ProviderKind::MyMemory),
            "libretranslate" | "libre" => Some(ProviderKind::LibreTranslate),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::MyMemory => write!(f, "mymemory"),
            ProviderKind::LibreTranslate => write!(f, "libretranslate"),
        }
    }
}

/// Canonical code to vendor code. Unknown codes pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCodeMap(HashMap<String, String>);

impl LanguageCodeMap {
    /// Map built from `(canonical, vendor)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }

    /// Vendor code for `code`
    pub fn map<'a>(&'a self, code: &'a str) -> &'a str {
        self.0.get(code).map(String::as_str).unwrap_or(code)
    }
}

/// One provider entry, in priority order inside `GatewayConfig`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Unique name used in logs
    pub name: String,
    /// Wire protocol
    pub kind: ProviderKind,
    /// Full endpoint URL
    pub endpoint: String,
    /// Per-call timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Vendor API key, when the vendor takes one
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sent to MyMemory as `de` for a higher daily quota
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Canonical to vendor language codes
    #[serde(default)]
    pub language_map: LanguageCodeMap,
    /// Vendor strings that signal a rejected request rather than a translation
    #[serde(default)]
    pub sentinels: Vec<String>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ProviderSpec {
    /// Built-in defaults for a vendor
    pub fn for_kind(kind: ProviderKind, endpoint: impl Into<String>) -> Self {
        let (language_map, sentinels) = match kind {
            ProviderKind::Google => (
                LanguageCodeMap::from_pairs(&[("zh", "zh-CN"), ("he", "iw")]),
                vec![],
            ),
            ProviderKind::MyMemory => (
                LanguageCodeMap::from_pairs(&[("pt", "pt-BR"), ("zh", "zh-CN")]),
                vec![
                    "PLEASE SELECT TWO DISTINCT LANGUAGES".to_string(),
                    "NO QUERY SPECIFIED. EXAMPLE REQUEST: GET?Q=HELLO&LANGPAIR=EN|IT".to_string(),
                ],
            ),
            ProviderKind::LibreTranslate => (LanguageCodeMap::default(), vec![]),
        };

        Self {
            name: kind.to_string(),
            kind,
            endpoint: endpoint.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_key: None,
            contact_email: None,
            language_map,
            sentinels,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Whether `text` is one of this vendor's sentinel strings
    pub fn is_sentinel(&self, text: &str) -> bool {
        let text = text.trim();
        self.sentinels.iter().any(|s| s.eq_ignore_ascii_case(text))
    }
}

/// Gateway configuration, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Only origin allowed by CORS
    pub frontend_url: String,
    /// Providers in fallback order
    pub providers: Vec<ProviderSpec>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            providers: vec![
                ProviderSpec::for_kind(ProviderKind::Google, DEFAULT_GOOGLE_URL),
                ProviderSpec::for_kind(ProviderKind::MyMemory, DEFAULT_MYMEMORY_URL),
            ],
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .trim()
            .parse::<u16>()
            .map_err(|e| GatewayError::config(format!("PORT is not a valid port: {}", e)))?;
        let frontend_url = var("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());
        let timeout_ms = var("PROVIDER_TIMEOUT_MS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_MS.to_string())
            .trim()
            .parse::<u64>()
            .map_err(|e| {
                GatewayError::config(format!("PROVIDER_TIMEOUT_MS is not a number: {}", e))
            })?;

        let libre_url = var("LIBRETRANSLATE_URL");
        let mut names: Vec<String> = var("PROVIDERS")
            .unwrap_or_else(|| DEFAULT_PROVIDERS.to_string())
            .split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if libre_url.is_some()
            && !names
                .iter()
                .any(|n| ProviderKind::parse(n) == Some(ProviderKind::LibreTranslate))
        {
            names.push(ProviderKind::LibreTranslate.to_string());
        }

        let mut providers = Vec::with_capacity(names.len());
        for name in names {
            let kind = ProviderKind::parse(&name)
                .ok_or_else(|| GatewayError::UnknownProvider { name: name.clone() })?;
            let spec = match kind {
                ProviderKind::Google => ProviderSpec::for_kind(
                    kind,
                    var("GOOGLE_TRANSLATE_URL").unwrap_or_else(|| DEFAULT_GOOGLE_URL.to_string()),
                ),
                ProviderKind::MyMemory => {
                    let mut spec = ProviderSpec::for_kind(
                        kind,
                        var("MYMEMORY_URL").unwrap_or_else(|| DEFAULT_MYMEMORY_URL.to_string()),
                    );
                    spec.contact_email = var("MYMEMORY_EMAIL");
                    spec
                }
                ProviderKind::LibreTranslate => {
                    let endpoint = libre_url.clone().ok_or_else(|| {
                        GatewayError::config("libretranslate requires LIBRETRANSLATE_URL")
                    })?;
                    let mut spec = ProviderSpec::for_kind(kind, endpoint);
                    spec.api_key = var("LIBRETRANSLATE_API_KEY");
                    spec
                }
            };
            providers.push(spec.with_timeout_ms(timeout_ms));
        }

        let config = Self {
            host,
            port,
            frontend_url,
            providers,
        };
        info!(
            "Loaded {} providers: {}",
            config.providers.len(),
            config.provider_names().join(" -> ")
        );
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            warn!("No providers configured, every translation will fail");
        }

        for spec in &self.providers {
            if spec.name.trim().is_empty() {
                return Err(GatewayError::config("provider name is required"));
            }
            if spec.endpoint.trim().is_empty() {
                return Err(GatewayError::config(format!(
                    "provider {} has no endpoint",
                    spec.name
                )));
            }
            if spec.timeout_ms == 0 {
                return Err(GatewayError::config(format!(
                    "provider {} timeout must be greater than 0",
                    spec.name
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for spec in &self.providers {
            if !seen.insert(spec.name.as_str()) {
                return Err(GatewayError::config(format!(
                    "provider {} is listed twice",
                    spec.name
                )));
            }
        }

        Ok(())
    }

    /// Provider names in priority order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name.as_str()).collect()
    }

    /// Find provider by name
    pub fn find_provider(&self, name: &str) -> Option<&ProviderSpec> {
        self.providers.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_from_empty_env() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.frontend_url, "http://localhost:5173");
        assert_eq!(config.provider_names(), vec!["google", "mymemory"]);
        assert!(config.providers.iter().all(|p| p.timeout_ms == 10_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_order_and_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("PROVIDERS", "mymemory, google"),
            ("PROVIDER_TIMEOUT_MS", "2500"),
            ("MYMEMORY_EMAIL", "ops@example.com"),
            ("FRONTEND_URL", "https://tradz.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.provider_names(), vec!["mymemory", "google"]);
        assert_eq!(config.providers[0].timeout_ms, 2500);
        assert_eq!(
            config.providers[0].contact_email.as_deref(),
            Some("ops@example.com")
        );
        assert_eq!(config.frontend_url, "https://tradz.example.com");
    }

    #[test]
    fn test_libretranslate_appended_when_configured() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("LIBRETRANSLATE_URL", "http://localhost:5001/translate"),
            ("LIBRETRANSLATE_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(
            config.provider_names(),
            vec!["google", "mymemory", "libretranslate"]
        );
        let libre = config.find_provider("libretranslate").unwrap();
        assert_eq!(libre.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_libretranslate_without_url_is_error() {
        let result = GatewayConfig::from_lookup(lookup(&[("PROVIDERS", "libretranslate")]));
        assert!(matches!(result, Err(GatewayError::ConfigError { .. })));
    }

    #[test]
    fn test_unknown_provider() {
        let result = GatewayConfig::from_lookup(lookup(&[("PROVIDERS", "google,bing")]));
        assert!(matches!(result, Err(GatewayError::UnknownProvider { name }) if name == "bing"));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(GatewayConfig::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(GatewayConfig::from_lookup(lookup(&[("PROVIDER_TIMEOUT_MS", "soon")])).is_err());
    }

    #[test]
    fn test_validation_rejects_duplicates_and_zero_timeout() {
        let mut config = GatewayConfig::default();
        config.providers.push(config.providers[0].clone());
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.providers[0].timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_language_map_passthrough() {
        let spec = ProviderSpec::for_kind(ProviderKind::MyMemory, DEFAULT_MYMEMORY_URL);
        assert_eq!(spec.language_map.map("pt"), "pt-BR");
        assert_eq!(spec.language_map.map("en"), "en");
        assert!(spec.is_sentinel(" please select two distinct languages "));
        assert!(!spec.is_sentinel("Hello"));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tradz.json");
        let config = GatewayConfig::default();
        config.to_file(&path).unwrap();
        assert_eq!(GatewayConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_file_with_minimal_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tradz.json");
        std::fs::write(
            &path,
            r#"{
                "host": "127.0.0.1",
                "port": 8080,
                "frontend_url": "http://localhost:3000",
                "providers": [
                    {"name": "primary", "kind": "mymemory", "endpoint": "http://localhost:9000/get"}
                ]
            }"#,
        )
        .unwrap();
        let config = GatewayConfig::from_file(&path).unwrap();
        assert_eq!(config.providers[0].timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.providers[0].kind, ProviderKind::MyMemory);
        assert!(config.providers[0].language_map.map("pt") == "pt");
    }
}
