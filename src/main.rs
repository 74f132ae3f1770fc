use clap::Parser;
use reel_harvest::diagram::{self, Topology};
use reel_harvest::{Credentials, Harvest, HarvestError, ReelLinks};
use std::process::ExitCode;

mod args;
use args::{Args, Command, ScrapeArgs};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match args.command {
        Command::Scrape(scrape_args) => match scrape(scrape_args).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                ::log::error!("Scrape failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Command::Diagram { output } => {
            match diagram::render(&Topology::web_service(), output.as_deref()) {
                Ok(path) => {
                    println!("{}", path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    ::log::error!("Diagram rendering failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn scrape(args: ScrapeArgs) -> Result<(), HarvestError> {
    let harvest = build_harvest(&args)?;
    let credentials = Credentials::from_env(args.identifier)?;
    ::log::info!(
        "Harvesting {} with WebDriver at {}",
        harvest.config().target_url,
        harvest.config().webdriver_url
    );

    let reels = harvest.run(&credentials).await?;
    print_reels(&reels, args.json)?;
    Ok(())
}

/// File config first, then WEBDRIVER_URL, then command-line overrides
fn build_harvest(args: &ScrapeArgs) -> Result<Harvest, HarvestError> {
    let mut harvest = Harvest::new(&args.url);
    if let Some(path) = &args.config {
        ::log::info!("Loading configuration from file: {}", path.display());
        harvest = harvest.with_config_file(path)?;
    }
    let mut harvest = harvest.with_env().with_target_url(&args.url);

    if let Some(scrolls) = args.scrolls {
        harvest = harvest.with_scrolls(scrolls);
    }
    if let Some(delay) = args.delay {
        harvest = harvest.with_delay(delay);
    }
    if let Some(webdriver) = &args.webdriver {
        harvest = harvest.with_webdriver_url(webdriver);
    }
    if args.show_browser {
        harvest = harvest.with_headless(false);
    }
    if args.allow_unauthenticated {
        harvest = harvest.with_allow_unauthenticated(true);
    }
    Ok(harvest)
}

fn print_reels(reels: &ReelLinks, json: bool) -> Result<(), HarvestError> {
    if json {
        println!("{}", serde_json::to_string_pretty(reels)?);
        return Ok(());
    }

    println!("Found {} reels:", reels.len());
    for link in &reels.links {
        println!("{}", link);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scrape_args(url: &str) -> ScrapeArgs {
        ScrapeArgs {
            url: url.to_string(),
            config: None,
            scrolls: None,
            delay: None,
            identifier: None,
            webdriver: None,
            show_browser: false,
            allow_unauthenticated: false,
            json: false,
        }
    }

    #[test]
    fn test_config_file_without_target_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = r#"{"scrolls": 9, "delay_secs": 4, "webdriver_url": "http://file:4444"}"#;
        file.write_all(json.as_bytes()).unwrap();

        let mut args = scrape_args("https://x.com/page/reels/");
        args.config = Some(file.path().to_path_buf());
        args.scrolls = Some(2);
        args.webdriver = Some("http://flag:9515".to_string());
        args.show_browser = true;

        let harvest = build_harvest(&args).unwrap();
        let config = harvest.config();

        assert_eq!(config.target_url, "https://x.com/page/reels/");
        assert_eq!(config.scrolls, 2);
        assert_eq!(config.delay_secs, 4);
        assert_eq!(config.webdriver_url, "http://flag:9515");
        assert!(!config.headless);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let mut args = scrape_args("https://x.com/page/reels/");
        args.config = Some("/nonexistent/reel-harvest.json".into());

        assert!(matches!(build_harvest(&args), Err(HarvestError::Io(_))));
    }
}
