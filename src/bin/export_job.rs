//! Bulk export of call recordings through a server-side job.
//!
//! Previews the number of conversations in the last 24 hours, asks for
//! confirmation on stdin, submits an export job targeting the configured
//! integration, and polls the job until it reaches a terminal state. Ctrl+C
//! cancels the poll. Exits non-zero on any unrecoverable error, on zero
//! matches, and on declined confirmation.

use chrono::Utc;
use recording_dl::{
    Config, Credentials, Error, ExportQuery, Interval, RecordingClient, SortOrder,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the integration the export is delivered to
const ENV_INTEGRATION_ID: &str = "GENESYS_CLOUD_INTEGRATION_ID";

fn init_logging(log_name: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", log_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();
    guard
}

/// Prompt on stdout and read a yes/no answer from stdin
fn confirm(count: u64) -> std::io::Result<bool> {
    println!("About to submit an export job covering {count} conversations. Continue? [y/N]");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[tokio::main]
async fn main() -> recording_dl::Result<()> {
    dotenvy::dotenv().ok();
    let _guard = init_logging("export_job.log");

    match run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "export run failed");
            Err(e)
        }
    }
}

async fn run() -> recording_dl::Result<()> {
    let credentials = Credentials::from_env()?;
    let integration_id = std::env::var(ENV_INTEGRATION_ID)
        .map_err(|_| Error::config_key("integration id must be set", ENV_INTEGRATION_ID))?;

    let config = Config::default();
    let client = RecordingClient::new(credentials, config.clone())?;

    let now = Utc::now();
    let query = ExportQuery {
        interval: Interval::last_24_hours(now),
        order: SortOrder::Asc,
        order_by: "conversationStart".into(),
        page_size: config.page_size,
        action_date: now,
        integration_id,
    };

    tracing::info!(interval = %query.interval, "previewing export match count");
    let job_id = client
        .submit_export(&query, |count| confirm(count).unwrap_or(false))
        .await?;

    let Some(job_id) = job_id else {
        // Zero matches or declined confirmation; submit_export already logged why.
        std::process::exit(1);
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl+C, cancelling export wait");
            signal_cancel.cancel();
        }
    });

    let status = client.wait_for_job(&job_id, &cancel).await?;
    tracing::info!(
        job_id = %status.id,
        conversations = status.total_conversations.unwrap_or(0),
        recordings = status.total_recordings.unwrap_or(0),
        processed = status.total_processed_recordings.unwrap_or(0),
        "export complete"
    );
    Ok(())
}
