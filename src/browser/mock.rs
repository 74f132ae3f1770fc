//! Scripted in-memory browser for exercising harvest steps without a WebDriver server.

use crate::browser::Browser;
use crate::error::{HarvestError, Result};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Counters shared with the test after the browser has been consumed
#[derive(Debug, Default)]
pub struct Calls {
    pub visited: RefCell<Vec<String>>,
    pub filled: RefCell<Vec<(String, String)>>,
    pub submits: Cell<usize>,
    pub scrolls: Cell<usize>,
    pub sources: Cell<usize>,
    pub closed: Cell<bool>,
}

pub struct MockBrowser {
    pub calls: Rc<Calls>,
    /// Element ids present on the login page
    pub login_fields: Vec<String>,
    /// Whether submitting the login form navigates away
    pub accept_login: bool,
    /// HTML returned for any non-login page
    pub page_html: String,
    /// Where the login page actually lands after navigation
    pub login_redirect: Option<String>,
    /// Fail the nth scroll (1-based)
    pub fail_on_scroll: Option<usize>,
    /// Panic on the nth scroll (1-based)
    pub panic_on_scroll: Option<usize>,
    url: RefCell<String>,
    logged_in: Cell<bool>,
}

impl MockBrowser {
    pub fn new(page_html: &str) -> Self {
        Self {
            calls: Rc::new(Calls::default()),
            login_fields: vec!["email".to_string(), "pass".to_string()],
            accept_login: true,
            page_html: page_html.to_string(),
            login_redirect: None,
            fail_on_scroll: None,
            panic_on_scroll: None,
            url: RefCell::new("about:blank".to_string()),
            logged_in: Cell::new(false),
        }
    }

    fn on_login_page(&self) -> bool {
        self.url.borrow().contains("/login") && !self.logged_in.get()
    }
}

impl Browser for MockBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        self.calls.visited.borrow_mut().push(url.to_string());
        let landed = match &self.login_redirect {
            Some(redirect) if url.contains("/login") => redirect.clone(),
            _ => url.to_string(),
        };
        *self.url.borrow_mut() = landed;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.borrow().clone())
    }

    async fn has_element(&self, id: &str) -> Result<bool> {
        Ok(self.on_login_page() && self.login_fields.iter().any(|f| f == id))
    }

    async fn fill(&self, id: &str, text: &str) -> Result<()> {
        self.calls
            .filled
            .borrow_mut()
            .push((id.to_string(), text.to_string()));
        Ok(())
    }

    async fn submit(&self, _id: &str) -> Result<()> {
        self.calls.submits.set(self.calls.submits.get() + 1);
        if self.accept_login {
            self.logged_in.set(true);
            *self.url.borrow_mut() = "https://x.com/home".to_string();
        }
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let n = self.calls.scrolls.get() + 1;
        self.calls.scrolls.set(n);
        if self.panic_on_scroll == Some(n) {
            panic!("browser crashed on scroll {}", n);
        }
        if self.fail_on_scroll == Some(n) {
            return Err(HarvestError::Io(std::io::Error::other("scroll failed")));
        }
        Ok(())
    }

    async fn page_height(&self) -> Result<u64> {
        Ok(1000)
    }

    async fn source(&self) -> Result<String> {
        self.calls.sources.set(self.calls.sources.get() + 1);
        Ok(self.page_html.clone())
    }

    async fn close(self) -> Result<()> {
        self.calls.closed.set(true);
        Ok(())
    }
}
