//! Sampling loop — a background tokio task pulling one wdutil reading
//! per tick.
//!
//! Two states, switched by the App through a watch channel: **live**
//! (sample, append, notify) and **paused** (the statistics view is open;
//! ticks are dropped entirely, not queued). Acquisition and parse
//! failures skip the tick with a log line and a status message — the
//! next tick proceeds at the normal cadence.

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use wisense_core::constants::SAMPLE_INTERVAL;
use wisense_core::store::epoch_now;
use wisense_core::{wdutil, SharedLiveData};

use crate::app::AppMessage;

pub async fn run(
    store: SharedLiveData,
    live_rx: watch::Receiver<bool>,
    tx: mpsc::Sender<AppMessage>,
) {
    let mut ticker = tokio::time::interval(SAMPLE_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if !*live_rx.borrow() {
            continue;
        }

        // wdutil can block for seconds; only this task waits on it.
        match wdutil::read_wifi_metrics().await {
            Ok((rssi, noise)) => {
                let ts = epoch_now();
                store.lock().await.append(ts, rssi, noise);
                debug!("sample rssi={rssi} noise={noise}");
                if tx.send(AppMessage::Sampled).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("tick skipped: {e}");
                if tx.send(AppMessage::SampleFailed(e.to_string())).await.is_err() {
                    break;
                }
            }
        }
    }
}
