//! Archive scraper: fetches a numbered range of archive pages, extracts
//! title, date, text and links from each one and writes every page to its
//! own JSON file.

use std::{ops::RangeInclusive, path::PathBuf, time::Duration};

mod error;
mod macros;
pub mod parse;
pub mod process;
pub mod record;
pub mod request;
pub mod save;

pub use error::{Error, Result};

/// Archive pages live at `{ARCHIVE_BASE_URL}/{id}`.
pub const ARCHIVE_BASE_URL: &str = "https://bytes.dev/archives";
pub const DEFAULT_START_ID: u32 = 1;
pub const DEFAULT_END_ID: u32 = 378;
pub const DEFAULT_CONCURRENCY: usize = 20;
pub const OUTPUT_DIR: &str = "archives";
/// Total time a single request may take, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything the coordinator needs to run a batch.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub out_dir: PathBuf,
    pub ids: RangeInclusive<u32>,
    /// Upper bound on pipelines holding a fetch permit at once. Zero is treated as 1.
    pub concurrency: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: ARCHIVE_BASE_URL.to_string(),
            out_dir: PathBuf::from(OUTPUT_DIR),
            ids: DEFAULT_START_ID..=DEFAULT_END_ID,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
