use std::time::Duration;

use clap::Parser;
use qa_forge::config;
use qa_forge::scraper::{CrawlOptions, FirecrawlClient, Format, Scraper};

/// Scrape and crawl a site through Firecrawl, printing the raw results.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL to scrape and crawl
    #[arg(short, long, default_value = "https://firecrawl.dev")]
    url: String,

    /// Maximum number of pages to crawl
    #[arg(short, long, default_value_t = 100)]
    limit: usize,

    /// Seconds between crawl status polls
    #[arg(short, long, default_value_t = 2)]
    poll_secs: u64,

    /// Only scrape the single page
    #[arg(short, long)]
    skip_crawl: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    qa_forge::init_tracing();

    let args = Args::parse();
    let (api_key, api_url) = config::firecrawl_credentials()?;
    let firecrawl = FirecrawlClient::new(api_key, api_url);
    let formats = vec![Format::Markdown, Format::Html];

    let scraped = firecrawl.scrape(&args.url, &formats).await?;
    println!("{}", serde_json::to_string_pretty(&scraped)?);

    if !args.skip_crawl {
        let options = CrawlOptions {
            limit: args.limit,
            formats,
        };
        let crawled = firecrawl
            .crawl(&args.url, &options, Duration::from_secs(args.poll_secs))
            .await?;
        println!("{}", serde_json::to_string_pretty(&crawled)?);
    }

    Ok(())
}
