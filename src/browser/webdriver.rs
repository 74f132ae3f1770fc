use crate::browser::{Browser, PAGE_HEIGHT, SCROLL_TO_BOTTOM};
use crate::error::{HarvestError, Result};
use fantoccini::key::Key;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};

/// Common local WebDriver endpoints tried when the configured one refuses the connection
const FALLBACK_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A browser session driven through a WebDriver server
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Connects to the WebDriver instance, falling back to common local ports
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(chrome_capabilities(headless));

        let first_error = match builder.connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::warn!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
                e
            }
        };

        for url in FALLBACK_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = builder.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(HarvestError::Connect {
            url: webdriver_url.to_string(),
            source: first_error,
        })
    }
}

/// Chrome capabilities: optionally headless, without the automation marker
fn chrome_capabilities(headless: bool) -> Capabilities {
    let mut args = vec!["--disable-blink-features=AutomationControlled"];
    if headless {
        args.push("--headless=new");
    }

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

impl Browser for WebDriverBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        ::log::debug!("GOTO: {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn has_element(&self, id: &str) -> Result<bool> {
        let found = self.client.find_all(Locator::Id(id)).await?;
        Ok(!found.is_empty())
    }

    async fn fill(&self, id: &str, text: &str) -> Result<()> {
        let element = self.client.find(Locator::Id(id)).await?;
        element.send_keys(text).await?;
        Ok(())
    }

    async fn submit(&self, id: &str) -> Result<()> {
        let element = self.client.find(Locator::Id(id)).await?;
        let enter: char = Key::Return.into();
        element.send_keys(&enter.to_string()).await?;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.client.execute(SCROLL_TO_BOTTOM, Vec::new()).await?;
        Ok(())
    }

    async fn page_height(&self) -> Result<u64> {
        let value = self.client.execute(PAGE_HEIGHT, Vec::new()).await?;
        Ok(height_from_value(&value))
    }

    async fn source(&self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    async fn close(self) -> Result<()> {
        self.client.close().await?;
        ::log::debug!("WebDriver session closed");
        Ok(())
    }
}

/// Script results come back as JSON numbers, possibly fractional
fn height_from_value(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|h| h.max(0.0) as u64))
        .unwrap_or(0)
}
