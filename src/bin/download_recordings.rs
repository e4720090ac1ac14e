//! Direct paginated download of call recordings.
//!
//! Authenticates with client credentials from the environment, lists every
//! recording from the start of the current month to now, and streams each
//! recording's media into the output directory. Individual download failures
//! are logged and skipped; everything else aborts the run.

use chrono::{Datelike, TimeZone, Utc};
use recording_dl::{Config, Credentials, RecordingClient};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

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

#[tokio::main]
async fn main() -> recording_dl::Result<()> {
    dotenvy::dotenv().ok();
    let _guard = init_logging("download_recordings.log");

    match run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "download run failed");
            Err(e)
        }
    }
}

async fn run() -> recording_dl::Result<()> {
    let credentials = Credentials::from_env()?;
    let config = Config::default();
    let output_dir = config.output_dir.clone();
    tokio::fs::create_dir_all(&output_dir).await?;

    let client = RecordingClient::new(credentials, config)?;

    let end = Utc::now();
    let start = Utc
        .with_ymd_and_hms(end.year(), end.month(), 1, 0, 0, 0)
        .earliest()
        .unwrap_or(end);

    tracing::info!(start = %start, end = %end, "fetching recordings");
    let recordings = client.list_recordings(start, end).await?;
    tracing::info!(count = recordings.len(), "found recordings");

    let mut downloaded = 0usize;
    let mut failed = 0usize;
    for recording in &recordings {
        if client.download_media(recording, &output_dir).await {
            downloaded += 1;
        } else {
            failed += 1;
        }
    }

    tracing::info!(downloaded, failed, "download run complete");
    Ok(())
}
