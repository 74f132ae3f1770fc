use crate::browser::Browser;
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::filter::LinkFilter;
use crate::links;
use crate::wait;

/// Loads the target page, scrolls it `config.scrolls` times and returns the matching links.
///
/// Each scroll is followed by a settle wait bounded by `config.delay()`. Extraction runs once,
/// after the last scroll.
pub async fn scroll_and_collect<B: Browser>(
    browser: &B,
    config: &HarvestConfig,
    filter: &LinkFilter,
) -> Result<Vec<String>> {
    let start = std::time::Instant::now();
    ::log::info!("Loading {}", config.target_url);
    browser.goto(&config.target_url).await?;
    wait::settle(browser, config.delay(), config.poll_interval()).await?;

    for i in 0..config.scrolls {
        ::log::debug!("Scroll {} of {}", i + 1, config.scrolls);
        browser.scroll_to_bottom().await?;
        wait::settle(browser, config.delay(), config.poll_interval()).await?;
    }

    let html = browser.source().await?;
    let page_url = browser.current_url().await?;
    let links = links::links_from_html(&html, &page_url, filter);

    ::log::info!(
        "Collected {} links from {} in {:.2} seconds",
        links.len(),
        config.target_url,
        start.elapsed().as_secs_f64()
    );
    Ok(links)
}
