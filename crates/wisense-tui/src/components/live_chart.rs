//! Live view — RSSI / Noise / SNR plotted against elapsed seconds, with
//! material-tinted background intervals and transition markers.
//!
//! The chart is drawn without axis label gutters (bounds only, like a
//! scope display) so the plot area spans the whole block interior; that
//! keeps the background shading, the markers and the mouse→time mapping
//! on the same linear scale as the data itself. The visible time range
//! is shown in the block's bottom title instead.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use wisense_core::store::ChartSnapshot;

use crate::theme::{
    self, material_bg, C_MARKER, C_NOISE, C_RSSI, C_SNR,
};
use crate::viewport::Viewport;

/// Geometry of the last-drawn plot, kept by the App for mouse
/// hit-testing and wheel-zoom coordinate mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotGeometry {
    pub area: Rect,
    pub left: f64,
    pub right: f64,
}

impl PlotGeometry {
    /// Map a terminal column back to a time coordinate, if it falls
    /// inside the plot.
    pub fn time_at_column(&self, col: u16) -> Option<f64> {
        if self.area.width == 0 || col < self.area.x || col >= self.area.x + self.area.width {
            return None;
        }
        let frac = (col - self.area.x) as f64 / self.area.width as f64;
        Some(self.left + frac * (self.right - self.left))
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.area.width > 0
            && self.area.height > 0
            && col >= self.area.x
            && col < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    fn column_for(&self, t: f64) -> Option<u16> {
        if self.area.width == 0 || self.right <= self.left {
            return None;
        }
        let frac = (t - self.left) / (self.right - self.left);
        if !(0.0..=1.0).contains(&frac) {
            return None;
        }
        // frac == 1.0 lands in the last column, not one past it.
        let offset = ((frac * self.area.width as f64) as u16).min(self.area.width - 1);
        Some(self.area.x + offset)
    }
}

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    snap: &ChartSnapshot,
    viewport: Viewport,
    session_start: f64,
    now: f64,
) -> PlotGeometry {
    let now_rel = now - session_start;
    let latest_rel = snap
        .samples
        .last()
        .map(|s| s.timestamp - session_start)
        .unwrap_or(now_rel.max(0.0));
    let (left, right) = viewport.bounds(latest_rel);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::style_border())
        .title(Span::styled(
            " Live Wi-Fi Signal (wdutil) ",
            theme::style_default(),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" {left:.0}s … {right:.0}s "),
            theme::style_secondary(),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return PlotGeometry::default();
    }

    let geometry = PlotGeometry {
        area: inner,
        left,
        right,
    };

    shade_materials(frame, &geometry, snap, session_start, now_rel);
    render_series(frame, &geometry, snap, session_start);
    draw_transition_markers(frame, &geometry, snap, session_start);
    draw_overlay(frame, inner, snap, viewport);

    geometry
}

/// Paint the background of each plot column with the material active at
/// that time, replayed from the transition list. Runs before the chart
/// so braille points land on top of the tint.
fn shade_materials(
    frame: &mut Frame,
    geo: &PlotGeometry,
    snap: &ChartSnapshot,
    session_start: f64,
    now_rel: f64,
) {
    let shade_end = geo.right.min(now_rel);
    if shade_end <= geo.left {
        return;
    }

    let intervals = snap.intervals(session_start + geo.left, session_start + shade_end);
    let buf = frame.buffer_mut();
    let width = geo.right - geo.left;

    for interval in intervals {
        let start_rel = interval.start - session_start;
        let end_rel = interval.end - session_start;
        let a = ((start_rel - geo.left) / width).clamp(0.0, 1.0);
        let b = ((end_rel - geo.left) / width).clamp(0.0, 1.0);
        let col_a = geo.area.x + (a * geo.area.width as f64) as u16;
        let col_b = geo.area.x + (b * geo.area.width as f64).ceil() as u16;
        let color = material_bg(interval.material);

        for col in col_a..col_b.min(geo.area.x + geo.area.width) {
            for row in geo.area.y..geo.area.y + geo.area.height {
                buf[(col, row)].set_bg(color);
            }
        }
    }
}

fn render_series(frame: &mut Frame, geo: &PlotGeometry, snap: &ChartSnapshot, session_start: f64) {
    let rssi: Vec<(f64, f64)> = snap
        .samples
        .iter()
        .map(|s| (s.timestamp - session_start, s.rssi_dbm))
        .collect();
    let noise: Vec<(f64, f64)> = snap
        .samples
        .iter()
        .map(|s| (s.timestamp - session_start, s.noise_dbm))
        .collect();
    let snr: Vec<(f64, f64)> = snap
        .samples
        .iter()
        .map(|s| (s.timestamp - session_start, s.snr_db))
        .collect();

    let (y_min, y_max) = y_bounds(geo, &rssi, &noise, &snr);

    let datasets = vec![
        Dataset::default()
            .name("RSSI")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(C_RSSI))
            .data(&rssi),
        Dataset::default()
            .name("Noise")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(C_NOISE))
            .data(&noise),
        Dataset::default()
            .name("SNR")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(C_SNR))
            .data(&snr),
    ];

    // Bounds-only axes: labels would reserve gutter columns and skew the
    // column→time mapping shared with the shading pass.
    let chart = Chart::new(datasets)
        .x_axis(Axis::default().bounds([geo.left, geo.right]))
        .y_axis(Axis::default().bounds([y_min, y_max]))
        .hidden_legend_constraints((
            ratatui::layout::Constraint::Ratio(1, 2),
            ratatui::layout::Constraint::Ratio(1, 2),
        ));

    frame.render_widget(chart, geo.area);
}

/// Y range: visible samples padded by 5 dB either side, with a sane
/// default before any data arrives.
fn y_bounds(
    geo: &PlotGeometry,
    rssi: &[(f64, f64)],
    noise: &[(f64, f64)],
    snr: &[(f64, f64)],
) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for series in [rssi, noise, snr] {
        for &(x, y) in series {
            if x >= geo.left && x <= geo.right {
                min = min.min(y);
                max = max.max(y);
            }
        }
    }
    if min.is_finite() && max.is_finite() {
        (min - 5.0, max + 5.0)
    } else {
        (-120.0, 20.0)
    }
}

/// Dashed vertical line at each material change, drawn only into cells
/// the chart left blank so the series stay legible.
fn draw_transition_markers(
    frame: &mut Frame,
    geo: &PlotGeometry,
    snap: &ChartSnapshot,
    session_start: f64,
) {
    let buf = frame.buffer_mut();
    for transition in &snap.transitions {
        let Some(col) = geo.column_for(transition.timestamp - session_start) else {
            continue;
        };
        for row in geo.area.y..geo.area.y + geo.area.height {
            let cell = &mut buf[(col, row)];
            if cell.symbol() == " " {
                cell.set_symbol("┊");
                cell.set_fg(C_MARKER);
            }
        }
    }
}

/// Top-left stats box: current condition, viewport policy, and the
/// per-material SNR mean/median accumulated over the session.
fn draw_overlay(frame: &mut Frame, inner: Rect, snap: &ChartSnapshot, viewport: Viewport) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("material: ", theme::style_secondary()),
            Span::styled(
                format!("{} ({} GHz)", snap.material, snap.band),
                theme::style_default(),
            ),
        ]),
        Line::from(Span::styled(
            if viewport.is_following() {
                "auto-scroll: ON  (Home=reset, arrows=pan/zoom)"
            } else {
                "auto-scroll: OFF (Home=reset, arrows=pan/zoom)"
            },
            theme::style_secondary(),
        )),
    ];
    for s in &snap.summaries {
        lines.push(Line::from(Span::styled(
            format!(
                "{:<10} mean={:6.1}  med={:6.1}",
                s.material.label(),
                s.snr_mean,
                s.snr_median
            ),
            Style::default().fg(theme::material_color(s.material)),
        )));
    }

    let height = (lines.len() as u16).min(inner.height);
    let width = lines
        .iter()
        .map(|l| l.width() as u16)
        .max()
        .unwrap_or(0)
        .min(inner.width.saturating_sub(2));
    if width == 0 || height == 0 {
        return;
    }
    let overlay = Rect {
        x: inner.x + 1,
        y: inner.y,
        width,
        height,
    };
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme::C_BG)),
        overlay,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> PlotGeometry {
        PlotGeometry {
            area: Rect::new(10, 5, 50, 20),
            left: 0.0,
            right: 100.0,
        }
    }

    #[test]
    fn column_mapping_keeps_boundary_transitions_visible() {
        let geo = geometry();
        assert_eq!(geo.column_for(0.0), Some(10));
        assert_eq!(geo.column_for(50.0), Some(35));
        // Exactly on the right edge still lands in the last column.
        assert_eq!(geo.column_for(100.0), Some(59));
        assert_eq!(geo.column_for(100.1), None);
        assert_eq!(geo.column_for(-0.1), None);
        assert_eq!(PlotGeometry::default().column_for(0.0), None);
    }

    #[test]
    fn time_at_column_inverts_the_mapping() {
        let geo = geometry();
        assert_eq!(geo.time_at_column(10), Some(0.0));
        assert_eq!(geo.time_at_column(35), Some(50.0));
        assert_eq!(geo.time_at_column(60), None);
        assert_eq!(geo.time_at_column(9), None);
    }
}
