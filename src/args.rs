use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reel-harvest")]
#[command(about = "Collects reel links from a page and renders the web service diagram")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in, scroll a page and print its reel links
    Scrape(ScrapeArgs),

    /// Render the web service architecture diagram to a PNG file
    Diagram {
        /// Output path (defaults to web_service.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct ScrapeArgs {
    /// Page whose reels are collected
    pub url: String,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of scroll-to-bottom repetitions
    #[arg(short, long)]
    pub scrolls: Option<usize>,

    /// Maximum seconds to wait for the page to settle after each scroll
    #[arg(short, long)]
    pub delay: Option<u64>,

    /// Login identifier (overrides REEL_HARVEST_IDENTIFIER; the secret is only read from
    /// REEL_HARVEST_SECRET)
    #[arg(short, long)]
    pub identifier: Option<String>,

    /// WebDriver server URL (overrides WEBDRIVER_URL)
    #[arg(short, long)]
    pub webdriver: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub show_browser: bool,

    /// Keep scraping if the login is not accepted
    #[arg(long)]
    pub allow_unauthenticated: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
