//! Statistics view — one bar group per material with data, showing the
//! median RSSI, noise and SNR accumulated over the session.
//!
//! Computed once when the view is entered; sampling is paused while it
//! is on screen, so there is nothing to animate.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use wisense_core::stats::MaterialSummary;

use crate::theme::{self, material_bg, material_color, C_NOISE, C_RSSI, C_SNR};

/// Bars can't render negative dBm directly, so bar heights are offsets
/// from this floor while the printed value stays signed.
const BAR_FLOOR_DB: f64 = -120.0;

const BAR_WIDTH: u16 = 7;
const BAR_GAP: u16 = 1;
const GROUP_GAP: u16 = 3;

pub fn draw(frame: &mut Frame, area: Rect, summaries: &[MaterialSummary]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::style_border())
        .title(Line::from(vec![
            Span::styled(" Material statistics — medians  ", theme::style_default()),
            Span::styled("RSSI ", Style::default().fg(C_RSSI)),
            Span::styled("Noise ", Style::default().fg(C_NOISE)),
            Span::styled("SNR ", Style::default().fg(C_SNR)),
        ]));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if summaries.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::raw(""),
            Line::raw("no data available"),
            Line::raw("start collecting samples and press 's' again"),
        ])
        .alignment(Alignment::Center)
        .style(theme::style_secondary());
        frame.render_widget(placeholder, inner);
        return;
    }

    shade_groups(frame, inner, summaries);

    let mut chart = BarChart::default()
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .group_gap(GROUP_GAP);
    for s in summaries {
        chart = chart.data(group_for(s));
    }
    frame.render_widget(chart, inner);
}

fn group_for(s: &MaterialSummary) -> BarGroup<'_> {
    let bars = [
        bar(s.rssi_median, C_RSSI),
        bar(s.noise_median, C_NOISE),
        bar(s.snr_median, C_SNR),
    ];
    BarGroup::default()
        .label(Line::from(Span::styled(
            s.material.label(),
            Style::default().fg(material_color(s.material)),
        )))
        .bars(&bars)
}

fn bar(value_db: f64, color: ratatui::style::Color) -> Bar<'static> {
    let offset = (value_db - BAR_FLOOR_DB).max(0.0).round() as u64;
    Bar::default()
        .value(offset)
        .text_value(format!("{value_db:.1}"))
        .style(Style::default().fg(color))
        .value_style(Style::default().fg(theme::C_PRIMARY).bg(theme::C_BG))
}

/// Tint the columns behind each group with its material colour, before
/// the bars are drawn over the top.
fn shade_groups(frame: &mut Frame, inner: Rect, summaries: &[MaterialSummary]) {
    let group_width = 3 * BAR_WIDTH + 2 * BAR_GAP;
    let buf = frame.buffer_mut();
    let mut x = inner.x;
    for s in summaries {
        let end = (x + group_width).min(inner.x + inner.width);
        let color = material_bg(s.material);
        for col in x..end {
            for row in inner.y..inner.y + inner.height {
                buf[(col, row)].set_bg(color);
            }
        }
        x = match end.checked_add(GROUP_GAP) {
            Some(next) if next < inner.x + inner.width => next,
            _ => break,
        };
    }
}
