//! Session CSV export.
//!
//! The export log is append-only for the life of the process; it survives
//! a chart clear (a sentinel row marks the boundary) and is written out
//! once, synchronously, when the operator quits.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};

use crate::error::SenseError;
use crate::material::Band;

/// Material label used for the clear-boundary sentinel row.
pub const CLEAR_SENTINEL: &str = "--- CLEARED ---";

/// One flattened row of the export log.
///
/// `material` is a label rather than a `Material` so the sentinel row can
/// share the column.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub timestamp: DateTime<Local>,
    pub band: Band,
    pub material: String,
    pub rssi_dbm: f64,
    pub noise_dbm: f64,
    pub snr_db: f64,
}

impl ExportRecord {
    /// The boundary row appended by a clear action.
    pub fn sentinel(timestamp: DateTime<Local>, band: Band) -> Self {
        Self {
            timestamp,
            band,
            material: CLEAR_SENTINEL.to_string(),
            rssi_dbm: 0.0,
            noise_dbm: 0.0,
            snr_db: 0.0,
        }
    }
}

/// Output filename stamped with the session start time, e.g.
/// `wifi_readings_20260829_142301.csv`.
pub fn session_filename(start: DateTime<Local>) -> String {
    format!("wifi_readings_{}.csv", start.format("%Y%m%d_%H%M%S"))
}

/// Write the whole log to `path`. No-op when the log is empty; a full
/// rewrite otherwise, so calling it repeatedly is safe.
pub fn write_csv(path: &Path, records: &[ExportRecord]) -> Result<(), SenseError> {
    if records.is_empty() {
        return Ok(());
    }

    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "timestamp,band,material,rssi_dbm,noise_dbm,snr_db")?;
    for r in records {
        writeln!(
            w,
            "{},{},{},{},{},{}",
            r.timestamp.to_rfc3339(),
            r.band,
            r.material,
            r.rssi_dbm,
            r.noise_dbm,
            r.snr_db
        )?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use chrono::TimeZone;

    fn record(secs: i64, material: Material) -> ExportRecord {
        ExportRecord {
            timestamp: Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            band: Band::Ghz24,
            material: material.label().to_string(),
            rssi_dbm: -40.0,
            noise_dbm: -90.0,
            snr_db: 50.0,
        }
    }

    #[test]
    fn empty_log_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![
            record(0, Material::Baseline),
            ExportRecord::sentinel(Local.timestamp_opt(1_700_000_001, 0).unwrap(), Band::Ghz24),
            record(2, Material::Wood),
        ];
        write_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "timestamp,band,material,rssi_dbm,noise_dbm,snr_db");
        assert!(lines[1].contains(",2.4,baseline,-40,-90,50"));
        assert!(lines[2].contains(CLEAR_SENTINEL));
        assert!(lines[3].contains(",2.4,wood,"));
        // Timestamps are ISO-8601 with an offset.
        assert!(lines[1].contains('T'));
    }

    #[test]
    fn rewrite_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![record(0, Material::Glass)];
        write_csv(&path, &rows).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        write_csv(&path, &rows).unwrap();
        assert_eq!(first, std::fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn session_filename_is_stamped() {
        let ts = Local.with_ymd_and_hms(2026, 8, 29, 14, 23, 1).unwrap();
        assert_eq!(session_filename(ts), "wifi_readings_20260829_142301.csv");
    }
}
