use std::sync::Arc;

use reqwest::Client;
use tokio::{
    sync::{OwnedSemaphorePermit, Semaphore},
    task::{JoinError, JoinSet},
};

use crate::parse::parse_archive;
use crate::request::{archive_url, build_client, fetch_archive};
use crate::save::save_archive;
use crate::{error_time, Result, ScrapeConfig};

/// What became of every id in a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Records written to disk.
    pub saved: usize,
    /// Fetch failed or the page was empty.
    pub skipped: usize,
    /// Parsing or saving errored, or the task panicked.
    pub failed: usize,
}

enum Outcome {
    Saved,
    NoContent,
}

impl BatchSummary {
    fn tally(&mut self, task: std::result::Result<(u32, Result<Outcome>), JoinError>) {
        match task {
            Ok((_, Ok(Outcome::Saved))) => self.saved += 1,
            Ok((_, Ok(Outcome::NoContent))) => self.skipped += 1,
            Ok((archive_id, Err(e))) => {
                error_time!("Error processing archive {}: {}", archive_id, e);
                self.failed += 1;
            }
            Err(e) => {
                error_time!("Archive task failed: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// Runs one fetch -> parse -> save pipeline per id in `config.ids`, with at most
/// `config.concurrency` of them past the gate at once, and waits for all of them.
/// Per-id failures are logged and counted, never propagated.
///
/// Ids are admitted in ascending order only as permits free up, so a huge range
/// never has more than `concurrency` tasks alive.
pub async fn process_archives(config: ScrapeConfig) -> Result<BatchSummary> {
    let client = build_client()?;
    let limit = config.concurrency.max(1);
    let gate = Arc::new(Semaphore::new(limit));
    let config = Arc::new(config);

    let mut summary = BatchSummary::default();
    let mut task_set = JoinSet::new();
    for archive_id in config.ids.clone() {
        while task_set.len() >= limit {
            if let Some(task) = task_set.join_next().await {
                summary.tally(task);
            }
        }
        let permit = gate.clone().acquire_owned().await?;

        task_set.spawn({
            // Client uses Arc so we can clone cheaply
            let client = client.clone();
            let config = config.clone();

            async move {
                let res = process_archive(&client, permit, &config, archive_id).await;
                (archive_id, res)
            }
        });
    }

    while let Some(task) = task_set.join_next().await {
        summary.tally(task);
    }
    Ok(summary)
}

/// The permit is held from the fetch until the save is done.
async fn process_archive(
    client: &Client,
    _permit: OwnedSemaphorePermit,
    config: &ScrapeConfig,
    archive_id: u32,
) -> Result<Outcome> {
    let url = archive_url(&config.base_url, archive_id);
    let Some(html) = fetch_archive(client, &url, archive_id).await else {
        return Ok(Outcome::NoContent);
    };
    let Some(record) = parse_archive(html, url).await? else {
        return Ok(Outcome::NoContent);
    };
    save_archive(&record, archive_id, &config.out_dir).await?;

    Ok(Outcome::Saved)
}
