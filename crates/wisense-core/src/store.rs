//! Live data store — the single shared mutable state of the session.
//!
//! One `tokio::sync::Mutex` covers the whole store (update rates are
//! ≤ a few Hz and every critical section is a handful of pushes), so
//! the background sampler and the rendering/input task never observe a
//! half-applied mutation. The renderer takes a [`ChartSnapshot`] and
//! releases the lock before drawing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::Mutex;
use tracing::info;

use crate::constants::RETENTION_WINDOW_SECS;
use crate::export::ExportRecord;
use crate::material::{Band, Material};
use crate::stats::{summaries, MaterialStats, MaterialSummary};

pub type SharedLiveData = Arc<Mutex<LiveData>>;

/// One measurement. SNR is derived at construction and never diverges
/// from `rssi_dbm - noise_dbm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Wall-clock seconds since the unix epoch.
    pub timestamp: f64,
    pub rssi_dbm: f64,
    pub noise_dbm: f64,
    pub snr_db: f64,
}

impl Sample {
    pub fn new(timestamp: f64, rssi_dbm: f64, noise_dbm: f64) -> Self {
        Self {
            timestamp,
            rssi_dbm,
            noise_dbm,
            snr_db: rssi_dbm - noise_dbm,
        }
    }
}

/// Marks the moment the material under test changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub timestamp: f64,
    pub material: Material,
}

/// A contiguous background-shading span: `material` was active over
/// `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub material: Material,
}

/// Everything the chart controller needs for one frame, cloned out from
/// under the lock.
#[derive(Debug, Clone)]
pub struct ChartSnapshot {
    pub samples: Vec<Sample>,
    pub transitions: Vec<Transition>,
    pub floor_material: Material,
    pub material: Material,
    pub band: Band,
    pub summaries: Vec<MaterialSummary>,
}

impl ChartSnapshot {
    /// Background intervals over `[window_start, now]`.
    pub fn intervals(&self, window_start: f64, now: f64) -> Vec<Interval> {
        replay_intervals(self.floor_material, &self.transitions, window_start, now)
    }
}

pub struct LiveData {
    window_secs: f64,
    samples: VecDeque<Sample>,
    transitions: Vec<Transition>,
    /// Material active at the start of the retention window. Baseline
    /// until a transition ages out of the window, after which it takes
    /// the evicted transition's material so interval replay stays exact.
    floor_material: Material,
    accumulators: HashMap<Material, MaterialStats>,
    current_material: Material,
    current_band: Band,
    export_log: Vec<ExportRecord>,
}

impl LiveData {
    pub fn new() -> Self {
        Self::with_window(RETENTION_WINDOW_SECS)
    }

    pub fn with_window(window_secs: f64) -> Self {
        Self {
            window_secs,
            samples: VecDeque::new(),
            transitions: Vec::new(),
            floor_material: Material::Baseline,
            accumulators: HashMap::new(),
            current_material: Material::Baseline,
            current_band: Band::Ghz24,
            export_log: Vec::new(),
        }
    }

    pub fn shared() -> SharedLiveData {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Record one reading. Derives SNR, evicts everything older than the
    /// retention window, feeds the current material's accumulator, and
    /// appends the flattened export row. Always succeeds.
    pub fn append(&mut self, timestamp: f64, rssi_dbm: f64, noise_dbm: f64) {
        let sample = Sample::new(timestamp, rssi_dbm, noise_dbm);
        self.samples.push_back(sample);

        let cutoff = timestamp - self.window_secs;
        while self
            .samples
            .front()
            .is_some_and(|s| s.timestamp < cutoff)
        {
            self.samples.pop_front();
        }
        while self
            .transitions
            .first()
            .is_some_and(|t| t.timestamp < cutoff)
        {
            self.floor_material = self.transitions.remove(0).material;
        }

        self.accumulators
            .entry(self.current_material)
            .or_default()
            .push(rssi_dbm, noise_dbm, sample.snr_db);

        self.export_log.push(ExportRecord {
            timestamp: epoch_to_local(timestamp),
            band: self.current_band,
            material: self.current_material.label().to_string(),
            rssi_dbm,
            noise_dbm,
            snr_db: sample.snr_db,
        });
    }

    /// Switch the material under test; existing samples are untouched.
    pub fn set_material(&mut self, material: Material, timestamp: f64) {
        self.current_material = material;
        self.transitions.push(Transition {
            timestamp,
            material,
        });
        info!("material -> {material}");
    }

    pub fn toggle_band(&mut self) {
        self.current_band = self.current_band.toggled();
        info!("band -> {} GHz", self.current_band);
    }

    /// Drop the live series, transitions and accumulators; reset the
    /// material to baseline. The band and the export log survive — a
    /// single sentinel row marks the boundary in the log.
    pub fn clear(&mut self, timestamp: f64) {
        self.samples.clear();
        self.transitions.clear();
        self.accumulators.clear();
        self.current_material = Material::Baseline;
        self.floor_material = Material::Baseline;
        self.export_log
            .push(ExportRecord::sentinel(epoch_to_local(timestamp), self.current_band));
        info!("cleared, reset to baseline");
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            samples: self.samples.iter().copied().collect(),
            transitions: self.transitions.clone(),
            floor_material: self.floor_material,
            material: self.current_material,
            band: self.current_band,
            summaries: summaries(&self.accumulators),
        }
    }

    pub fn current_material(&self) -> Material {
        self.current_material
    }

    pub fn current_band(&self) -> Band {
        self.current_band
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn export_log(&self) -> &[ExportRecord] {
        &self.export_log
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

impl Default for LiveData {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay a transition list into contiguous material spans covering
/// `[window_start, now]`.
///
/// Left-edge policy: the span before the earliest transition inside the
/// window takes `floor` (transitions at or before `window_start` update
/// the floor instead of opening a span). The final span runs to `now`.
pub fn replay_intervals(
    floor: Material,
    transitions: &[Transition],
    window_start: f64,
    now: f64,
) -> Vec<Interval> {
    let mut out = Vec::new();
    if now <= window_start {
        return out;
    }

    let mut cursor = window_start;
    let mut material = floor;
    for t in transitions {
        if t.timestamp <= window_start {
            material = t.material;
            continue;
        }
        if t.timestamp >= now {
            break;
        }
        if t.timestamp > cursor {
            out.push(Interval {
                start: cursor,
                end: t.timestamp,
                material,
            });
        }
        cursor = t.timestamp;
        material = t.material;
    }
    out.push(Interval {
        start: cursor,
        end: now,
        material,
    });
    out
}

/// Wall-clock now as fractional seconds since the unix epoch — the
/// timestamp unit used throughout the store.
pub fn epoch_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn epoch_to_local(ts: f64) -> DateTime<Local> {
    let secs = ts.floor() as i64;
    let nanos = ((ts - ts.floor()) * 1e9) as u32;
    Local
        .timestamp_opt(secs, nanos)
        .single()
        .unwrap_or_else(Local::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CLEAR_SENTINEL;

    #[test]
    fn retention_window_invariant_holds_after_every_append() {
        let mut data = LiveData::with_window(10.0);
        for i in 0..40 {
            let ts = i as f64;
            data.append(ts, -40.0 - i as f64, -90.0);

            let latest = data.latest().unwrap().timestamp;
            let cutoff = latest - 10.0;
            assert!(data.samples().all(|s| s.timestamp >= cutoff));
            // Still in increasing timestamp order.
            let times: Vec<f64> = data.samples().map(|s| s.timestamp).collect();
            let mut sorted = times.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(times, sorted);
        }
        // Exactly the samples within [30, 40) … cutoff is exclusive below.
        assert_eq!(data.samples().count(), 11);
    }

    #[test]
    fn snr_is_always_signal_minus_noise() {
        let mut data = LiveData::new();
        data.append(1.0, -40.0, -90.0);
        data.append(2.0, -55.5, -92.0);
        for s in data.samples() {
            assert_eq!(s.snr_db, s.rssi_dbm - s.noise_dbm);
        }
        for r in data.export_log() {
            assert_eq!(r.snr_db, r.rssi_dbm - r.noise_dbm);
        }
    }

    #[test]
    fn accumulator_follows_current_material() {
        let mut data = LiveData::new();
        data.append(1.0, -40.0, -90.0);
        data.set_material(Material::Wood, 1.5);
        data.append(2.0, -50.0, -90.0);

        let snap = data.snapshot();
        assert_eq!(snap.summaries.len(), 2);
        assert_eq!(snap.summaries[0].material, Material::Baseline);
        assert_eq!(snap.summaries[0].snr_median, 50.0);
        assert_eq!(snap.summaries[1].material, Material::Wood);
        assert_eq!(snap.summaries[1].snr_median, 40.0);
    }

    #[test]
    fn clear_resets_everything_but_band_and_log() {
        let mut data = LiveData::new();
        data.toggle_band();
        data.append(1.0, -40.0, -90.0);
        data.set_material(Material::Copper, 1.5);
        data.append(2.0, -50.0, -90.0);
        let rows_before = data.export_log().len();

        data.clear(3.0);

        assert_eq!(data.samples().count(), 0);
        assert_eq!(data.snapshot().transitions.len(), 0);
        assert!(data.snapshot().summaries.is_empty());
        assert_eq!(data.current_material(), Material::Baseline);
        assert_eq!(data.current_band(), Band::Ghz5);
        // Exactly one sentinel appended; earlier rows intact.
        assert_eq!(data.export_log().len(), rows_before + 1);
        assert_eq!(data.export_log().last().unwrap().material, CLEAR_SENTINEL);
        assert_eq!(
            data.export_log()
                .iter()
                .filter(|r| r.material == CLEAR_SENTINEL)
                .count(),
            1
        );
    }

    #[test]
    fn interval_replay_matches_fixed_left_edge_policy() {
        let transitions = vec![
            Transition { timestamp: 10.0, material: Material::Wood },
            Transition { timestamp: 25.0, material: Material::Glass },
        ];
        let spans = replay_intervals(Material::Baseline, &transitions, 0.0, 30.0);
        assert_eq!(
            spans,
            vec![
                Interval { start: 0.0, end: 10.0, material: Material::Baseline },
                Interval { start: 10.0, end: 25.0, material: Material::Wood },
                Interval { start: 25.0, end: 30.0, material: Material::Glass },
            ]
        );
    }

    #[test]
    fn interval_replay_with_no_transitions_is_one_floor_span() {
        let spans = replay_intervals(Material::Baseline, &[], 5.0, 12.0);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].material, Material::Baseline);
        assert_eq!((spans[0].start, spans[0].end), (5.0, 12.0));
        assert!(replay_intervals(Material::Baseline, &[], 5.0, 5.0).is_empty());
    }

    #[test]
    fn transition_at_window_start_updates_the_floor() {
        let transitions = vec![
            Transition { timestamp: 3.0, material: Material::Wood },
            Transition { timestamp: 20.0, material: Material::Glass },
        ];
        let spans = replay_intervals(Material::Baseline, &transitions, 10.0, 30.0);
        assert_eq!(
            spans,
            vec![
                Interval { start: 10.0, end: 20.0, material: Material::Wood },
                Interval { start: 20.0, end: 30.0, material: Material::Glass },
            ]
        );
    }

    #[test]
    fn evicted_transitions_promote_the_floor_material() {
        let mut data = LiveData::with_window(10.0);
        data.set_material(Material::Wood, 1.0);
        data.append(2.0, -40.0, -90.0);
        data.set_material(Material::Glass, 8.0);
        data.append(9.0, -40.0, -90.0);
        // This append pushes the cutoff past the wood transition.
        data.append(12.5, -40.0, -90.0);

        let snap = data.snapshot();
        assert_eq!(snap.floor_material, Material::Wood);
        assert_eq!(snap.transitions.len(), 1);
        let spans = snap.intervals(2.5, 12.5);
        assert_eq!(
            spans,
            vec![
                Interval { start: 2.5, end: 8.0, material: Material::Wood },
                Interval { start: 8.0, end: 12.5, material: Material::Glass },
            ]
        );
    }

    #[test]
    fn set_material_does_not_touch_samples() {
        let mut data = LiveData::new();
        data.append(1.0, -40.0, -90.0);
        let before: Vec<Sample> = data.samples().copied().collect();
        data.set_material(Material::Steel, 1.5);
        let after: Vec<Sample> = data.samples().copied().collect();
        assert_eq!(before, after);
        assert_eq!(data.current_material(), Material::Steel);
    }
}
