//! wisense — live Wi-Fi signal strength visualizer.
//!
//! Samples RSSI/noise via `sudo wdutil info` in a background task, plots
//! the series in the terminal, and writes the full session CSV on exit.

mod action;
mod app;
mod components;
mod sampler;
mod theme;
mod viewport;
mod widgets;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::info;

use wisense_core::export::{self, session_filename};
use wisense_core::platform::data_dir;
use wisense_core::LiveData;

use crate::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let log_path = data_dir.join("wisense.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print the log path to stderr so the operator can tail it immediately.
    eprintln!("wisense log: {}", log_path.display());
    info!("starting");

    // CSV lands in the working directory, stamped with the session start.
    let csv_path = std::env::current_dir()
        .unwrap_or_else(|_| data_dir.clone())
        .join(session_filename(chrono::Local::now()));

    let store = LiveData::shared();
    let (tx, rx) = mpsc::channel(1024);
    let (live_tx, live_rx) = watch::channel(true);

    let sampler_handle = tokio::spawn(sampler::run(store.clone(), live_rx, tx.clone()));

    let run_result = App::new(store.clone(), live_tx).run(rx, tx).await;

    // Stop sampling before the final export so the log can't grow under us.
    sampler_handle.abort();

    let data = store.lock().await;
    let rows = data.export_log().len();
    match export::write_csv(&csv_path, data.export_log()) {
        Ok(()) if rows > 0 => {
            info!("exported {rows} rows to {}", csv_path.display());
            println!("saved {} rows to {}", rows, csv_path.display());
        }
        Ok(()) => println!("no samples collected, nothing exported"),
        Err(e) => eprintln!("export failed ({}): {e}", csv_path.display()),
    }

    run_result
}
