//! Paginated recording listing and media download
//!
//! `list_recordings` walks the recordings collection page by page until the
//! response carries no next-page indicator, re-authenticating on every call
//! through the cached token. `download_media` streams a single recording's
//! media to disk and reports success as a boolean so a batch can continue past
//! individual failures.

use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::client::RecordingClient;
use crate::error::{Error, Result};
use crate::retry::fetch_with_retry;
use crate::types::{Recording, RecordingPage};

impl RecordingClient {
    /// List all recordings whose start time falls within `[start, end]`
    ///
    /// Pages are fetched sequentially with a short pause between them to
    /// respect rate limits; transient page failures are retried with backoff.
    /// Any error that survives the retries aborts the whole walk — there is no
    /// partial-result recovery.
    ///
    /// # Errors
    ///
    /// Propagates authentication, network, and unexpected-status errors from
    /// any page request.
    pub async fn list_recordings(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Recording>> {
        let mut recordings = Vec::new();
        let mut page_number: u32 = 1;

        loop {
            let page = fetch_with_retry(&self.config.retry, || {
                self.fetch_page(start, end, page_number)
            })
            .await?;

            let fetched = page.entities.len();
            recordings.extend(page.entities);
            tracing::debug!(
                page = page_number,
                items = fetched,
                total = recordings.len(),
                "fetched recordings page"
            );

            if page.next_uri.is_none() {
                break;
            }
            page_number += 1;
            tokio::time::sleep(self.config.page_delay).await;
        }

        tracing::info!(count = recordings.len(), "recording listing complete");
        Ok(recordings)
    }

    /// Fetch a single page of the recordings collection
    async fn fetch_page(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page_number: u32,
    ) -> Result<RecordingPage> {
        let token = self.auth.get_token().await?;
        let endpoint = "/api/v2/recordings";
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("pageSize", self.config.page_size.to_string()),
                ("pageNumber", page_number.to_string()),
                ("startDate", start.to_rfc3339()),
                ("endDate", end.to_rfc3339()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                page = page_number,
                body = %body,
                "recordings page request failed"
            );
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.into(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Download a recording's media into `output_dir`, returning success
    ///
    /// The media is streamed in chunks to `{timestamp}_{conversation_id}.wav`.
    /// Failures are logged and reported as `false` rather than raised, so the
    /// caller can continue with the remaining items. No retry is attempted.
    pub async fn download_media(&self, recording: &Recording, output_dir: &Path) -> bool {
        let path = output_dir.join(recording.output_filename());
        match self.try_download_media(&recording.id, &path).await {
            Ok(()) => {
                tracing::info!(recording_id = %recording.id, path = %path.display(), "downloaded recording");
                true
            }
            Err(e) => {
                tracing::error!(recording_id = %recording.id, error = %e, "failed to download recording");
                false
            }
        }
    }

    async fn try_download_media(&self, recording_id: &str, path: &Path) -> Result<()> {
        let token = self.auth.get_token().await?;
        let endpoint = format!("/api/v2/recordings/{recording_id}/media");
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
                body,
            });
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
}
