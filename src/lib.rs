// Re-export modules
pub mod browser;
pub mod collect;
pub mod config;
pub mod diagram;
pub mod error;
pub mod filter;
pub mod links;
pub mod login;
pub mod results;
pub mod session;
pub mod utils;
pub mod wait;

// Re-export commonly used types for convenience
pub use config::{Credentials, HarvestConfig};
pub use error::HarvestError;
pub use results::ReelLinks;

use std::path::Path;

/// Builder for a single reel harvest run
pub struct Harvest {
    config: HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest builder for the given page URL with default settings
    pub fn new(target_url: &str) -> Self {
        Self {
            config: HarvestConfig::new(target_url),
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> error::Result<Self> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Apply configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> error::Result<Self> {
        let config = HarvestConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    /// Apply overrides from the environment (`WEBDRIVER_URL`)
    pub fn with_env(mut self) -> Self {
        self.config.apply_env();
        self
    }

    /// Override the target page
    pub fn with_target_url(mut self, url: &str) -> Self {
        self.config.target_url = url.to_string();
        self
    }

    /// Override the number of scrolls
    pub fn with_scrolls(mut self, scrolls: usize) -> Self {
        self.config.scrolls = scrolls;
        self
    }

    /// Override the settle delay
    pub fn with_delay(mut self, seconds: u64) -> Self {
        self.config.delay_secs = seconds;
        self
    }

    /// Override the WebDriver URL
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    /// Show or hide the browser window
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Keep scraping when the login is not accepted
    pub fn with_allow_unauthenticated(mut self, allow: bool) -> Self {
        self.config.allow_unauthenticated = allow;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Log in and collect the reel links of the target page
    pub async fn run(self, credentials: &Credentials) -> error::Result<ReelLinks> {
        session::harvest(&self.config, credentials).await
    }
}
