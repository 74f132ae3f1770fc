use crate::browser::Browser;
use crate::browser::webdriver::WebDriverBrowser;
use crate::collect;
use crate::config::{Credentials, HarvestConfig};
use crate::error::{HarvestError, Result};
use crate::filter::LinkFilter;
use crate::login::{self, LoginOutcome};
use crate::results::ReelLinks;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Connects to WebDriver, logs in and collects reel links.
///
/// The browser session is closed before returning, including when the run fails, panics or
/// is interrupted with Ctrl-C.
pub async fn harvest(config: &HarvestConfig, credentials: &Credentials) -> Result<ReelLinks> {
    // Reject bad patterns before a browser is started
    let filter = LinkFilter::new(&config.link_marker, &config.exclude_patterns)?;
    url::Url::parse(&config.target_url)?;

    // Watch Ctrl-C from before the connection so no window leaves a session behind
    let interrupt = ctrl_c();
    tokio::pin!(interrupt);

    let connect = WebDriverBrowser::connect(&config.webdriver_url, config.headless);
    let browser = interruptible(connect, &mut interrupt).await?;
    run_scoped(browser, config, credentials, &filter, interrupt).await
}

/// Awaits `fut` unless `shutdown` resolves first
async fn interruptible<F, T, S>(fut: F, shutdown: S) -> Result<T>
where
    F: Future<Output = Result<T>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = fut => result,
        _ = shutdown => {
            ::log::warn!("Interrupted while connecting to WebDriver");
            Err(HarvestError::Interrupted)
        }
    }
}

/// Resolves when Ctrl-C is pressed; never resolves if the signal cannot be watched
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        ::log::warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Runs the harvest steps on `browser` and always closes it afterwards.
///
/// If `shutdown` resolves first the run is abandoned with [`HarvestError::Interrupted`].
pub async fn run_scoped<B, S>(
    browser: B,
    config: &HarvestConfig,
    credentials: &Credentials,
    filter: &LinkFilter,
    shutdown: S,
) -> Result<ReelLinks>
where
    B: Browser,
    S: Future<Output = ()>,
{
    let outcome = {
        let steps =
            AssertUnwindSafe(run_steps(&browser, config, credentials, filter)).catch_unwind();
        tokio::select! {
            outcome = steps => outcome,
            _ = shutdown => {
                ::log::warn!("Interrupted, shutting down the browser");
                Ok(Err(HarvestError::Interrupted))
            }
        }
    };

    if let Err(e) = browser.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }

    match outcome {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

async fn run_steps<B: Browser>(
    browser: &B,
    config: &HarvestConfig,
    credentials: &Credentials,
    filter: &LinkFilter,
) -> Result<ReelLinks> {
    let authenticated = match login::log_in(browser, config, credentials).await? {
        LoginOutcome::Authenticated => true,
        LoginOutcome::Rejected { url } => {
            if !config.allow_unauthenticated {
                return Err(HarvestError::LoginRejected { url });
            }
            ::log::warn!("Continuing without an authenticated session");
            false
        }
    };

    let links = collect::scroll_and_collect(browser, config, filter).await?;
    Ok(ReelLinks::new(config.target_url.clone(), authenticated, links))
}
