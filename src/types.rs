//! Core wire types for recording-dl
//!
//! These are read-only projections of the platform's JSON responses plus the
//! request bodies for the analytics and export job endpoints. Field names map
//! to the platform's camelCase wire format via serde renames.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a single call recording
///
/// Projection of the recordings collection response; only the fields needed to
/// derive output filenames and fetch media are retained.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Unique recording identifier
    pub id: String,
    /// Conversation this recording belongs to, if reported
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Timestamp at which the recording started
    pub start_time: DateTime<Utc>,
}

impl Recording {
    /// Derive the local output filename: `{YYYYMMDD_HHMMSS}_{conversation_id}.wav`
    ///
    /// A missing conversation id falls back to `"unknown"`.
    pub fn output_filename(&self) -> String {
        format!(
            "{}_{}.wav",
            self.start_time.format("%Y%m%d_%H%M%S"),
            self.conversation_id.as_deref().unwrap_or("unknown")
        )
    }
}

/// One page of the recordings collection
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingPage {
    /// Recordings on this page
    #[serde(default)]
    pub entities: Vec<Recording>,
    /// URI of the next page; absent on the final page
    #[serde(default)]
    pub next_uri: Option<String>,
}

/// OAuth token endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// State of a server-side export job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// Accepted, not yet started
    Pending,
    /// Running on the server
    Processing,
    /// Completed successfully
    Fulfilled,
    /// Ended with a server-side error
    Failed,
    /// Cancelled on the server
    Cancelled,
}

impl JobState {
    /// Whether this state admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Fulfilled | JobState::Failed | JobState::Cancelled
        )
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Pending => "PENDING",
            JobState::Processing => "PROCESSING",
            JobState::Fulfilled => "FULFILLED",
            JobState::Failed => "FAILED",
            JobState::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Last-polled snapshot of an export job
///
/// The job itself is server-owned; the client only ever holds this snapshot.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// Job identifier
    pub id: String,
    /// Current job state
    pub state: JobState,
    /// Percent progress reported by the server, when available
    #[serde(default)]
    pub percent_progress: Option<u32>,
    /// Total conversations matched by the job query
    #[serde(default)]
    pub total_conversations: Option<u64>,
    /// Total recordings covered by the job
    #[serde(default)]
    pub total_recordings: Option<u64>,
    /// Recordings processed so far
    #[serde(default)]
    pub total_processed_recordings: Option<u64>,
    /// Server-provided error message for FAILED/CANCELLED jobs
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Sort order for conversation queries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// Closed time interval, serialized in the platform's `start/end` ISO-8601 form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    /// Interval start (inclusive)
    pub start: DateTime<Utc>,
    /// Interval end (exclusive)
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval from explicit bounds
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The 24 hours leading up to `end`
    pub fn last_24_hours(end: DateTime<Utc>) -> Self {
        Self {
            start: end - chrono::Duration::hours(24),
            end,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}

impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Descriptor for a bulk export job
///
/// Describes which conversations to export, how to order them, and where the
/// platform should deliver the result.
#[derive(Clone, Debug)]
pub struct ExportQuery {
    /// Time interval the export covers
    pub interval: Interval,
    /// Ordering of matched conversations
    pub order: SortOrder,
    /// Field to order by (typically `conversationStart`)
    pub order_by: String,
    /// Page size for the underlying conversation query
    pub page_size: u32,
    /// Timestamp at which the export action takes effect
    pub action_date: DateTime<Utc>,
    /// Integration the export is delivered to
    pub integration_id: String,
}

/// Paging block for conversation queries
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Items per page
    pub page_size: u32,
    /// 1-based page number
    pub page_number: u32,
}

/// Conversation detail query body (analytics API)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConversationQuery<'a> {
    pub interval: Interval,
    pub order: SortOrder,
    pub order_by: &'a str,
    pub paging: Paging,
}

/// Response to a conversation detail query; only the match count is consumed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConversationQueryPreview {
    #[serde(default)]
    pub total_hits: Option<u64>,
}

/// Export job submission body (recording jobs API)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportJobRequest<'a> {
    pub action: &'static str,
    pub action_date: String,
    pub integration_id: &'a str,
    pub conversation_query: ConversationQuery<'a>,
}

/// Response to an export job submission; only the assigned id is consumed
#[derive(Debug, Deserialize)]
pub(crate) struct JobSubmitResponse {
    pub id: String,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn output_filename_uses_timestamp_and_conversation_id() {
        let recording = Recording {
            id: "rec-1".into(),
            conversation_id: Some("conv-42".into()),
            start_time: Utc.with_ymd_and_hms(2026, 8, 22, 14, 30, 5).unwrap(),
        };
        assert_eq!(recording.output_filename(), "20260822_143005_conv-42.wav");
    }

    #[test]
    fn output_filename_falls_back_to_unknown_conversation() {
        let recording = Recording {
            id: "rec-2".into(),
            conversation_id: None,
            start_time: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        };
        assert_eq!(recording.output_filename(), "20260102_030405_unknown.wav");
    }

    #[test]
    fn interval_serializes_in_slash_separated_iso_form() {
        let interval = Interval::new(
            Utc.with_ymd_and_hms(2026, 8, 22, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 23, 0, 0, 0).unwrap(),
        );
        assert_eq!(
            interval.to_string(),
            "2026-08-22T00:00:00.000Z/2026-08-23T00:00:00.000Z"
        );
        let json = serde_json::to_value(interval).unwrap();
        assert_eq!(json, "2026-08-22T00:00:00.000Z/2026-08-23T00:00:00.000Z");
    }

    #[test]
    fn job_state_parses_screaming_snake_case() {
        let state: JobState = serde_json::from_str("\"FULFILLED\"").unwrap();
        assert_eq!(state, JobState::Fulfilled);
        assert!(state.is_terminal());
        assert!(!JobState::Processing.is_terminal());
    }

    #[test]
    fn job_status_deserializes_camel_case_fields() {
        let json = serde_json::json!({
            "id": "job-7",
            "state": "PROCESSING",
            "percentProgress": 40,
            "totalConversations": 12,
            "totalRecordings": 30,
            "totalProcessedRecordings": 12
        });
        let status: JobStatus = serde_json::from_value(json).unwrap();
        assert_eq!(status.state, JobState::Processing);
        assert_eq!(status.percent_progress, Some(40));
        assert_eq!(status.total_recordings, Some(30));
        assert!(status.error_message.is_none());
    }

    #[test]
    fn recording_page_tolerates_missing_next_uri_and_entities() {
        let page: RecordingPage = serde_json::from_str("{}").unwrap();
        assert!(page.entities.is_empty());
        assert!(page.next_uri.is_none());
    }

    #[test]
    fn export_job_request_serializes_camel_case() {
        let interval = Interval::new(
            Utc.with_ymd_and_hms(2026, 8, 22, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 23, 0, 0, 0).unwrap(),
        );
        let request = ExportJobRequest {
            action: "EXPORT",
            action_date: "2026-08-23T00:00:00.000Z".into(),
            integration_id: "int-1",
            conversation_query: ConversationQuery {
                interval,
                order: SortOrder::Asc,
                order_by: "conversationStart",
                paging: Paging {
                    page_size: 100,
                    page_number: 1,
                },
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["action"], "EXPORT");
        assert_eq!(json["integrationId"], "int-1");
        assert_eq!(json["conversationQuery"]["order"], "asc");
        assert_eq!(json["conversationQuery"]["orderBy"], "conversationStart");
        assert_eq!(json["conversationQuery"]["paging"]["pageSize"], 100);
    }
}
