use std::time::Duration;

use tracing::info;

use crate::error::{HarvestError, Result};

const USER_AGENT: &str = concat!("prompt_harvest/", env!("CARGO_PKG_VERSION"));

/// Fetch the document at `url` as text. One attempt, no retries.
pub async fn fetch_document(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(HarvestError::Client)?;

    info!("Fetching document: {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| transport(url, source))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status,
        });
    }

    let text = response.text().await.map_err(|source| transport(url, source))?;
    info!("Fetched {} bytes ({} lines)", text.len(), text.lines().count());
    Ok(text)
}

fn transport(url: &str, source: reqwest::Error) -> HarvestError {
    HarvestError::Transport {
        url: url.to_string(),
        source,
    }
}

// ── Tests ──
