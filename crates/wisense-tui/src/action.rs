//! Action enum — all user-initiated intents, plus the view-mode state.

/// Which of the two mutually exclusive views is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Live,
    Statistics,
}

/// All actions that can flow out of key/mouse handling. The App
/// dispatches each against the store and the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    // ── Conditions ───────────────────────────────────────────────────────────
    SetMaterial(wisense_core::Material),
    ToggleBand,

    // ── Views ────────────────────────────────────────────────────────────────
    EnterStatistics,
    /// `c`: leaves the statistics view, or clears the session when the
    /// live view is already showing.
    LeaveStatisticsOrClear,

    // ── Viewport ─────────────────────────────────────────────────────────────
    PanLeft,
    PanRight,
    ZoomIn,
    ZoomOut,
    /// Mouse-wheel zoom about a time coordinate (seconds, factor).
    ZoomAbout(f64, f64),
    /// Home: restore auto-scroll at the default width.
    ResetViewport,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
