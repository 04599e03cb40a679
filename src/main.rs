use archive_scrap::{
    info_time, process::process_archives, Result, ScrapeConfig, DEFAULT_CONCURRENCY,
    DEFAULT_END_ID, DEFAULT_START_ID,
};
use chrono::Local;
use clap::Parser;

/// Scrape the bytes.dev archives into one JSON file per issue.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// First archive id, inclusive
    #[arg(long, default_value_t = DEFAULT_START_ID, value_parser = clap::value_parser!(u32).range(1..))]
    start: u32,

    /// Last archive id, inclusive
    #[arg(long, default_value_t = DEFAULT_END_ID)]
    end: u32,

    /// Max simultaneous in-flight fetches
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY as u64, value_parser = clap::value_parser!(u64).range(1..))]
    concurrency: u64,
}

impl Args {
    fn into_config(self) -> ScrapeConfig {
        ScrapeConfig {
            ids: self.start..=self.end,
            concurrency: usize::try_from(self.concurrency).unwrap_or(usize::MAX),
            ..ScrapeConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let start_time = Local::now();
    info_time!(
        "Starting download from archive {} to {} with {} concurrent downloads",
        args.start,
        args.end,
        args.concurrency
    );

    process_archives(args.into_config()).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}
