use crate::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the login identifier
pub const IDENTIFIER_ENV: &str = "REEL_HARVEST_IDENTIFIER";

/// Environment variable holding the login secret
pub const SECRET_ENV: &str = "REEL_HARVEST_SECRET";

/// Environment variable overriding the WebDriver URL
pub const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// Configuration for a single harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Page whose reels are collected; usually supplied on the command line
    #[serde(default)]
    pub target_url: String,

    /// Number of scroll-to-bottom repetitions
    #[serde(default = "default_scrolls")]
    pub scrolls: usize,

    /// Upper bound on each settle wait, in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,

    /// How often the page is polled while waiting, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Login page URL
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Element id of the identifier input
    #[serde(default = "default_identifier_field")]
    pub identifier_field: String,

    /// Element id of the secret input
    #[serde(default = "default_secret_field")]
    pub secret_field: String,

    /// How long to wait for the login form to go away, in seconds
    #[serde(default = "default_login_timeout_secs")]
    pub login_timeout_secs: u64,

    /// Keep scraping even if the login was not accepted
    #[serde(default)]
    pub allow_unauthenticated: bool,

    /// Path fragment an href must contain to be collected
    #[serde(default = "default_link_marker")]
    pub link_marker: String,

    /// Regex patterns for links to drop
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,
}

fn default_scrolls() -> usize {
    5
}

fn default_delay_secs() -> u64 {
    3
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_login_url() -> String {
    "https://www.facebook.com/login".to_string()
}

fn default_identifier_field() -> String {
    "email".to_string()
}

fn default_secret_field() -> String {
    "pass".to_string()
}

fn default_login_timeout_secs() -> u64 {
    10
}

fn default_link_marker() -> String {
    "/reel/".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

impl HarvestConfig {
    /// Create a new configuration with default values
    pub fn new(target_url: &str) -> Self {
        Self {
            target_url: target_url.to_string(),
            scrolls: default_scrolls(),
            delay_secs: default_delay_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            login_url: default_login_url(),
            identifier_field: default_identifier_field(),
            secret_field: default_secret_field(),
            login_timeout_secs: default_login_timeout_secs(),
            allow_unauthenticated: false,
            link_marker: default_link_marker(),
            exclude_patterns: Vec::new(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` override if it is set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var(WEBDRIVER_URL_ENV) {
            self.override_webdriver_url(&webdriver_url);
        }
    }

    /// Replace the WebDriver URL unless `url` is empty
    pub fn override_webdriver_url(&mut self, url: &str) {
        if !url.is_empty() {
            self.webdriver_url = url.to_string();
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }
}

/// Identifier and secret used for a single login attempt
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Read credentials from the environment, letting `identifier` override the variable
    pub fn from_env(identifier: Option<String>) -> Result<Self> {
        let identifier = match identifier {
            Some(identifier) => identifier,
            None => read_env(IDENTIFIER_ENV)?,
        };
        let secret = read_env(SECRET_ENV)?;
        Ok(Self { identifier, secret })
    }
}

fn read_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(HarvestError::MissingCredentials(name)),
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config =
            HarvestConfig::from_json(r#"{"target_url": "https://example.com/page/reels/"}"#)
                .unwrap();

        assert_eq!(config.target_url, "https://example.com/page/reels/");
        assert_eq!(config.scrolls, 5);
        assert_eq!(config.delay(), Duration::from_secs(3));
        assert_eq!(config.identifier_field, "email");
        assert_eq!(config.secret_field, "pass");
        assert_eq!(config.link_marker, "/reel/");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
        assert!(!config.allow_unauthenticated);
    }

    #[test]
    fn test_explicit_fields_are_kept() {
        let json = r#"{
            "target_url": "https://example.com/reels/",
            "scrolls": 0,
            "delay_secs": 1,
            "allow_unauthenticated": true,
            "exclude_patterns": ["/reel/ads"]
        }"#;
        let config = HarvestConfig::from_json(json).unwrap();

        assert_eq!(config.scrolls, 0);
        assert_eq!(config.delay_secs, 1);
        assert!(config.allow_unauthenticated);
        assert_eq!(config.exclude_patterns, vec!["/reel/ads".to_string()]);
    }

    #[test]
    fn test_target_url_may_be_omitted() {
        let config = HarvestConfig::from_json(r#"{"scrolls": 10}"#).unwrap();

        assert_eq!(config.target_url, "");
        assert_eq!(config.scrolls, 10);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = HarvestConfig::from_json(r#"{"scrolls": "many"}"#);
        assert!(matches!(result, Err(HarvestError::Json(_))));
    }

    #[test]
    fn test_empty_webdriver_override_ignored() {
        let mut config = HarvestConfig::new("https://example.com/reels/");

        config.override_webdriver_url("");
        assert_eq!(config.webdriver_url, "http://localhost:4444");

        config.override_webdriver_url("http://remote:9515");
        assert_eq!(config.webdriver_url, "http://remote:9515");
    }

    #[test]
    fn test_webdriver_url_from_env() {
        let mut config = HarvestConfig::new("https://example.com/reels/");

        // Only this test touches WEBDRIVER_URL
        unsafe { std::env::set_var(WEBDRIVER_URL_ENV, "") };
        config.apply_env();
        assert_eq!(config.webdriver_url, "http://localhost:4444");

        unsafe { std::env::set_var(WEBDRIVER_URL_ENV, "http://grid:4444") };
        config.apply_env();
        assert_eq!(config.webdriver_url, "http://grid:4444");

        unsafe { std::env::remove_var(WEBDRIVER_URL_ENV) };
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("someone@example.com", "hunter2");
        let printed = format!("{:?}", creds);

        assert!(printed.contains("someone@example.com"));
        assert!(!printed.contains("hunter2"));
    }
}
