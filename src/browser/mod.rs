pub mod webdriver;

#[cfg(test)]
pub(crate) mod mock;

use crate::error::Result;

/// Script that scrolls the window to the bottom of the document
pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Script that reports the current document height
pub const PAGE_HEIGHT: &str = "return document.body.scrollHeight;";

/// The browser operations a harvest run needs.
///
/// Implemented by [`webdriver::WebDriverBrowser`] for real sessions.
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Navigate to a URL and wait for the navigation to complete
    async fn goto(&self, url: &str) -> Result<()>;

    /// URL of the currently loaded page
    async fn current_url(&self) -> Result<String>;

    /// Whether an element with the given id is present
    async fn has_element(&self, id: &str) -> Result<bool>;

    /// Type text into the element with the given id
    async fn fill(&self, id: &str, text: &str) -> Result<()>;

    /// Press Return inside the element with the given id
    async fn submit(&self, id: &str) -> Result<()>;

    /// Scroll the page to the bottom
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Current height of the document body in pixels
    async fn page_height(&self) -> Result<u64>;

    /// Serialized DOM of the current page
    async fn source(&self) -> Result<String>;

    /// End the browser session
    async fn close(self) -> Result<()>;
}
