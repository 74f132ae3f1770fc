use serde::Serialize;

/// Reel links collected from one page
#[derive(Debug, Clone, Serialize)]
pub struct ReelLinks {
    /// URL of the page that was scrolled
    pub page_url: String,

    /// Whether the login was accepted before scraping
    pub authenticated: bool,

    /// Unique links, query strings removed
    pub links: Vec<String>,
}

impl ReelLinks {
    /// Create a new result instance
    pub fn new(page_url: String, authenticated: bool, links: Vec<String>) -> Self {
        Self {
            page_url,
            authenticated,
            links,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
