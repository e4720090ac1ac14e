//! Bulk export job submission and polling
//!
//! Submission first previews the match count through the analytics API so the
//! caller can decide whether to proceed; a zero-match interval aborts before
//! any job is created. Polling is bounded by a maximum wait and a
//! caller-supplied cancellation token, and a job observed in a terminal state
//! is never re-polled.

use chrono::SecondsFormat;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::RecordingClient;
use crate::error::{Error, Result};
use crate::types::{
    ConversationQuery, ConversationQueryPreview, ExportJobRequest, ExportQuery, JobState,
    JobStatus, JobSubmitResponse, Paging,
};

/// Pure submit/abort decision: submit only when matches exist and the caller
/// agreed to proceed
pub fn should_submit(preview_count: u64, proceed: bool) -> bool {
    preview_count > 0 && proceed
}

impl RecordingClient {
    /// Count the conversations matching `query`'s interval without side effects
    ///
    /// Issues a read-only conversation detail query with a single-item page and
    /// returns the reported total.
    pub async fn preview_count(&self, query: &ExportQuery) -> Result<u64> {
        let endpoint = "/api/v2/analytics/conversations/details/query";
        let body = ConversationQuery {
            interval: query.interval,
            order: query.order,
            order_by: &query.order_by,
            paging: Paging {
                page_size: 1,
                page_number: 1,
            },
        };

        let preview: ConversationQueryPreview = self.post_json(endpoint, &body).await?;
        let count = preview.total_hits.unwrap_or(0);
        tracing::info!(interval = %query.interval, matches = count, "previewed export match count");
        Ok(count)
    }

    /// Preview the match count, consult the caller, and submit the export job
    ///
    /// `proceed` is only consulted when the preview found at least one match;
    /// a zero-match interval or a declined confirmation aborts without any
    /// submission call. Returns the assigned job id, or `None` if the
    /// submission was aborted.
    ///
    /// # Errors
    ///
    /// Propagates request errors from the preview or the submission.
    pub async fn submit_export(
        &self,
        query: &ExportQuery,
        proceed: impl FnOnce(u64) -> bool,
    ) -> Result<Option<String>> {
        let count = self.preview_count(query).await?;
        if count == 0 {
            tracing::warn!(interval = %query.interval, "no conversations matched, aborting export");
            return Ok(None);
        }

        let decision = proceed(count);
        if !should_submit(count, decision) {
            tracing::info!(matches = count, "export declined by caller");
            return Ok(None);
        }

        let job_id = self.create_export_job(query).await?;
        tracing::info!(job_id = %job_id, matches = count, "export job submitted");
        Ok(Some(job_id))
    }

    /// Submit the export job descriptor and return the assigned job id
    async fn create_export_job(&self, query: &ExportQuery) -> Result<String> {
        let endpoint = "/api/v2/recording/jobs";
        let body = ExportJobRequest {
            action: "EXPORT",
            action_date: query
                .action_date
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            integration_id: &query.integration_id,
            conversation_query: ConversationQuery {
                interval: query.interval,
                order: query.order,
                order_by: &query.order_by,
                paging: Paging {
                    page_size: query.page_size,
                    page_number: 1,
                },
            },
        };

        let response: JobSubmitResponse = self.post_json(endpoint, &body).await?;
        Ok(response.id)
    }

    /// Fetch the current status snapshot of an export job
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus> {
        let token = self.auth.get_token().await?;
        let endpoint = format!("/api/v2/recording/jobs/{job_id}");
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), job_id = %job_id, "job status request failed");
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Poll an export job until it reaches a terminal state
    ///
    /// Reports progress between polls and sleeps the configured poll interval.
    /// The wait is bounded by `max_poll_wait` and by `cancel`; a FULFILLED job
    /// yields its final status snapshot with the summary totals.
    ///
    /// # Errors
    ///
    /// - [`Error::JobFailed`] when the server reports FAILED or CANCELLED
    /// - [`Error::PollTimeout`] when `max_poll_wait` elapses first
    /// - [`Error::Cancelled`] when `cancel` fires between polls
    pub async fn wait_for_job(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<JobStatus> {
        let started = Instant::now();

        loop {
            let status = self.job_status(job_id).await?;
            match status.state {
                JobState::Fulfilled => {
                    tracing::info!(
                        job_id = %job_id,
                        conversations = status.total_conversations.unwrap_or(0),
                        recordings = status.total_recordings.unwrap_or(0),
                        "export job fulfilled"
                    );
                    return Ok(status);
                }
                JobState::Failed | JobState::Cancelled => {
                    let message = status
                        .error_message
                        .unwrap_or_else(|| "no error message reported".into());
                    tracing::error!(job_id = %job_id, state = %status.state, message = %message, "export job ended unsuccessfully");
                    return Err(Error::JobFailed {
                        id: job_id.to_string(),
                        state: status.state,
                        message,
                    });
                }
                JobState::Pending | JobState::Processing => {
                    tracing::info!(
                        job_id = %job_id,
                        state = %status.state,
                        progress = status.percent_progress.unwrap_or(0),
                        processed = status.total_processed_recordings.unwrap_or(0),
                        "export job in progress"
                    );

                    let waited = started.elapsed();
                    if waited >= self.config.max_poll_wait {
                        return Err(Error::PollTimeout {
                            id: job_id.to_string(),
                            waited,
                        });
                    }

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }
    }

    /// POST a JSON body to an API endpoint and deserialize the JSON response
    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let token = self.auth.get_token().await?;
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), endpoint = %endpoint, body = %body, "API request failed");
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.into(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
