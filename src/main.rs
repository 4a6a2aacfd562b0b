//! fragrance-scraper - paginated fragrance catalog scraper
//!
//! Without a subcommand, shows an interactive category menu.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fragrance_scraper::commands::{shell, ScrapeCommand};
use fragrance_scraper::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fragrance-scraper",
    version,
    about = "Scrapes the fragrance catalog into a spreadsheet",
    long_about = "Walks every listing page of the fragrance catalog, extracts per-variant pricing from each product page and writes one spreadsheet row per SKU."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output spreadsheet path
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Output format (xlsx, csv)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// First listing page to request
    #[arg(long, global = true)]
    start_page: Option<u32>,

    /// Stop after this many listing pages
    #[arg(long, global = true)]
    max_pages: Option<u32>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the whole catalog without prompting
    #[command(alias = "s")]
    Scrape,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(start_page) = cli.start_page {
        config.start_page = start_page;
    }
    if cli.max_pages.is_some() {
        config.max_pages = cli.max_pages;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    config.validate()?;

    match cli.command {
        Some(Commands::Scrape) => {
            let summary = ScrapeCommand::new(config.clone()).execute().await?;
            println!("{}", summary);
            println!("Saved to {}", config.output.display());
        }
        None => shell::run(&config).await?,
    }

    Ok(())
}
