use reqwest::Client;

use crate::{error_time, Result, REQUEST_TIMEOUT};

/// Builds the single client shared by every pipeline in a batch.
pub fn build_client() -> Result<Client> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(client)
}

#[inline]
pub fn archive_url(base_url: &str, archive_id: u32) -> String {
    format!("{}/{archive_id}", base_url.trim_end_matches('/'))
}

/// Requests an archive page and returns its HTML, or `None` if the request failed.
/// Failures are logged here and never propagated, so one bad id can't stop a batch.
pub async fn fetch_archive(client: &Client, url: &str, archive_id: u32) -> Option<String> {
    match request_page_html(client, url).await {
        Ok(html) => Some(html),
        Err(e) => {
            error_time!("Error fetching archive {}: {}", archive_id, e);
            None
        }
    }
}

/// Requests a page and returns a `Result<String>` containing the HTML.
/// Non-2xx responses are errors.
async fn request_page_html(client: &Client, url: &str) -> Result<String> {
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}
