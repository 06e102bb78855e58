//! Viewport — the visible x-range of the live chart, as an explicit
//! value with pure methods (no closures over shared chart state).
//!
//! Two policies: `Follow` keeps a window of `follow_width` seconds glued
//! to the latest sample (plus a small lookahead margin); `Manual` is a
//! fixed user-set range produced by pan/zoom. Every zoom clamps the
//! width to `[MIN_VIEWPORT_SECS, RETENTION_WINDOW_SECS]`.

use wisense_core::constants::{
    DISPLAY_WINDOW_SECS, LOOKAHEAD_MARGIN_SECS, MIN_VIEWPORT_SECS, RETENTION_WINDOW_SECS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMode {
    Follow,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub mode: ViewportMode,
    /// Manual bounds, in seconds since session start. Only meaningful in
    /// `Manual` mode but kept current so mode switches are seamless.
    left: f64,
    right: f64,
    /// Window width used while following.
    follow_width: f64,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            mode: ViewportMode::Follow,
            left: 0.0,
            right: DISPLAY_WINDOW_SECS + LOOKAHEAD_MARGIN_SECS,
            follow_width: DISPLAY_WINDOW_SECS,
        }
    }

    pub fn is_following(self) -> bool {
        self.mode == ViewportMode::Follow
    }

    /// Current visible `[left, right]`, given the latest sample time.
    pub fn bounds(self, latest: f64) -> (f64, f64) {
        match self.mode {
            ViewportMode::Follow => (
                (latest - self.follow_width).max(0.0),
                latest + LOOKAHEAD_MARGIN_SECS,
            ),
            ViewportMode::Manual => (self.left, self.right),
        }
    }

    pub fn width(self, latest: f64) -> f64 {
        let (l, r) = self.bounds(latest);
        r - l
    }

    /// Shift the window by `frac` of its width. Drops out of follow mode.
    pub fn pan(self, frac: f64, latest: f64) -> Self {
        let (left, right) = self.bounds(latest);
        let shift = (right - left) * frac;
        Self {
            mode: ViewportMode::Manual,
            left: left + shift,
            right: right + shift,
            follow_width: self.follow_width,
        }
    }

    /// Rescale about the window centre. Drops out of follow mode.
    pub fn zoom_centered(self, factor: f64, latest: f64) -> Self {
        let (left, right) = self.bounds(latest);
        let center = (left + right) / 2.0;
        let new_width = clamp_width((right - left) * factor);
        Self {
            mode: ViewportMode::Manual,
            left: center - new_width / 2.0,
            right: center + new_width / 2.0,
            follow_width: new_width,
        }
    }

    /// Rescale about an arbitrary time coordinate (mouse-wheel zoom), so
    /// the point under the cursor stays put. Drops out of follow mode.
    pub fn zoom_about(self, anchor: f64, factor: f64, latest: f64) -> Self {
        let (left, right) = self.bounds(latest);
        let width = right - left;
        let new_width = clamp_width(width * factor);
        let new_left = anchor - new_width * (anchor - left) / width;
        Self {
            mode: ViewportMode::Manual,
            left: new_left,
            right: new_left + new_width,
            follow_width: new_width,
        }
    }

    /// Home: back to auto-scroll at the default width.
    pub fn reset(self) -> Self {
        Self::new()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_width(width: f64) -> f64 {
    width.clamp(MIN_VIEWPORT_SECS, RETENTION_WINDOW_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATEST: f64 = 100.0;

    #[test]
    fn follow_window_tracks_latest_sample() {
        let vp = Viewport::new();
        let (l, r) = vp.bounds(LATEST);
        assert_eq!(l, LATEST - DISPLAY_WINDOW_SECS);
        assert_eq!(r, LATEST + LOOKAHEAD_MARGIN_SECS);
        // Early in the session the left edge pins to zero.
        let (l, _) = vp.bounds(10.0);
        assert_eq!(l, 0.0);
    }

    #[test]
    fn repeated_zoom_never_escapes_width_limits() {
        let mut vp = Viewport::new();
        for _ in 0..50 {
            vp = vp.zoom_centered(1.0 / 1.2, LATEST);
            let w = vp.width(LATEST);
            assert!(w >= MIN_VIEWPORT_SECS - 1e-9, "width {w} below minimum");
        }
        assert!((vp.width(LATEST) - MIN_VIEWPORT_SECS).abs() < 1e-9);

        for _ in 0..50 {
            vp = vp.zoom_centered(1.2, LATEST);
            let w = vp.width(LATEST);
            assert!(w <= RETENTION_WINDOW_SECS + 1e-9, "width {w} above window");
        }
        assert!((vp.width(LATEST) - RETENTION_WINDOW_SECS).abs() < 1e-9);
    }

    #[test]
    fn wheel_zoom_respects_limits_too() {
        let mut vp = Viewport::new();
        for _ in 0..80 {
            vp = vp.zoom_about(60.0, 1.0 / 1.2, LATEST);
        }
        assert!((vp.width(LATEST) - MIN_VIEWPORT_SECS).abs() < 1e-9);
        for _ in 0..80 {
            vp = vp.zoom_about(60.0, 1.2, LATEST);
        }
        assert!((vp.width(LATEST) - RETENTION_WINDOW_SECS).abs() < 1e-9);
    }

    #[test]
    fn zoom_about_keeps_the_anchor_fraction_fixed() {
        let vp = Viewport::new();
        let (l0, r0) = vp.bounds(LATEST);
        let anchor = l0 + (r0 - l0) * 0.25;

        let zoomed = vp.zoom_about(anchor, 0.5, LATEST);
        let (l1, r1) = zoomed.bounds(LATEST);
        let frac = (anchor - l1) / (r1 - l1);
        assert!((frac - 0.25).abs() < 1e-9);
    }

    #[test]
    fn pan_and_zoom_disable_follow_and_home_restores_it() {
        let vp = Viewport::new().pan(0.1, LATEST);
        assert_eq!(vp.mode, ViewportMode::Manual);

        let vp = Viewport::new().zoom_centered(0.8, LATEST);
        assert_eq!(vp.mode, ViewportMode::Manual);
        // Manual bounds no longer track the latest sample.
        assert_eq!(vp.bounds(LATEST), vp.bounds(LATEST + 50.0));

        let vp = vp.reset();
        assert!(vp.is_following());
        assert!((vp.width(LATEST) - DISPLAY_WINDOW_SECS - LOOKAHEAD_MARGIN_SECS).abs() < 1e-9);
    }

    #[test]
    fn pan_shifts_by_a_tenth_of_width() {
        let vp = Viewport::new();
        let (l0, r0) = vp.bounds(LATEST);
        let panned = vp.pan(-0.1, LATEST);
        let (l1, r1) = panned.bounds(LATEST);
        let width = r0 - l0;
        assert!((l0 - l1 - width * 0.1).abs() < 1e-9);
        assert!((r0 - r1 - width * 0.1).abs() < 1e-9);
    }
}
