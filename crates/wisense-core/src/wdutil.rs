//! Metric source: `sudo wdutil info` invocation and output scraping.
//!
//! wdutil prints a report of sections that look like
//!
//! ```text
//! ————————————————————————
//! WIFI
//! ————————————————————————
//!     RSSI                 : -40 dBm
//!     Noise                : -90 dBm
//! ```
//!
//! Other sections (BLUETOOTH in particular) can contain their own RSSI
//! lines, so the parser only honours fields found inside the WIFI
//! section. The section ends at the next all-caps header line.

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::constants::WDUTIL_TIMEOUT;
use crate::error::SenseError;

/// Pull one `(rssi_dbm, noise_dbm)` reading from the OS.
///
/// Any failure mode — missing binary, non-zero exit, timeout, garbled
/// output — comes back as an error the sampling loop turns into a
/// skipped tick.
pub async fn read_wifi_metrics() -> Result<(f64, f64), SenseError> {
    let invocation = Command::new("sudo").args(["wdutil", "info"]).output();

    let output = timeout(WDUTIL_TIMEOUT, invocation)
        .await
        .map_err(|_| SenseError::Acquisition("wdutil timed out".to_string()))?
        .map_err(|e| SenseError::Acquisition(format!("failed to run wdutil: {e}")))?;

    if !output.status.success() {
        return Err(SenseError::Acquisition(format!(
            "wdutil exited with {}",
            output.status
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    debug!("wdutil returned {} bytes", text.len());
    parse_wdutil_output(&text)
}

/// Extract RSSI and noise (dBm) from wdutil's report text.
pub fn parse_wdutil_output(text: &str) -> Result<(f64, f64), SenseError> {
    let mut rssi: Option<f64> = None;
    let mut noise: Option<f64> = None;
    let mut in_wifi_section = false;

    for raw in text.lines() {
        let line = raw.trim();

        if line == "WIFI" {
            in_wifi_section = true;
            continue;
        }

        // Horizontal rules separate headers from their bodies; skip them
        // without ending the section.
        if line.starts_with("————") {
            continue;
        }

        // A new all-caps header (no colon) ends the WIFI section.
        if in_wifi_section && !line.is_empty() && !line.contains(':') && is_header(line) {
            in_wifi_section = false;
            continue;
        }

        if !in_wifi_section {
            continue;
        }

        if rssi.is_none() && line.contains("RSSI") && line.contains(':') {
            rssi = value_after_colon(line);
        } else if noise.is_none() && line.contains("Noise") && line.contains(':') {
            noise = value_after_colon(line);
        }
    }

    match (rssi, noise) {
        (Some(r), Some(n)) => Ok((r, n)),
        (None, _) => Err(SenseError::Parse("RSSI")),
        (_, None) => Err(SenseError::Parse("Noise")),
    }
}

/// True for lines like `BLUETOOTH` — at least one letter, all letters
/// uppercase.
fn is_header(line: &str) -> bool {
    let mut has_alpha = false;
    for c in line.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

/// First signed integer appearing after the colon, e.g. `-40` out of
/// `RSSI : -40 dBm`.
fn value_after_colon(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once(':')?;
    first_signed_int(rest)
}

fn first_signed_int(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = if i > 0 && bytes[i - 1] == b'-' { i - 1 } else { i };
            let mut end = i;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            return s[start..end].parse().ok();
        }
        i += 1;
    }
    None
}
