//! Startup constants. There is no config file — the tool is a
//! single-operator instrument and these values match the bench setup.

use std::time::Duration;

/// How often the sampling loop pulls one reading from wdutil.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// How long samples and material transitions are retained in memory.
pub const RETENTION_WINDOW_SECS: f64 = 300.0;

/// Default width of the auto-scrolling viewport.
pub const DISPLAY_WINDOW_SECS: f64 = 60.0;

/// Extra margin shown ahead of the latest sample in follow mode.
pub const LOOKAHEAD_MARGIN_SECS: f64 = 5.0;

/// Narrowest the viewport can be zoomed.
pub const MIN_VIEWPORT_SECS: f64 = 10.0;

/// Hard cap on a single `wdutil info` invocation.
pub const WDUTIL_TIMEOUT: Duration = Duration::from_secs(10);
