//! Status bar — bottom line with the sampling state, key hints, and the
//! last log/status message.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::ViewMode;
use crate::theme::{C_ERROR, C_LIVE, C_MUTED, C_PAUSED, C_SECONDARY};

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    mode: ViewMode,
    status: Option<&str>,
    status_is_error: bool,
) {
    let (dot_style, mode_label) = match mode {
        ViewMode::Live => (Style::default().fg(C_LIVE), " LIVE "),
        ViewMode::Statistics => (Style::default().fg(C_PAUSED), " STATS "),
    };

    let hints = match mode {
        ViewMode::Live => "1-7 material  b band  s stats  c clear  wheel/arrows zoom+pan  Home follow  q quit",
        ViewMode::Statistics => "c back to live  q quit",
    };

    let mut spans = vec![
        Span::styled("●", dot_style),
        Span::styled(mode_label, dot_style),
        Span::styled("│ ", Style::default().fg(C_MUTED)),
        Span::styled(hints, Style::default().fg(C_SECONDARY)),
    ];
    if let Some(msg) = status {
        spans.push(Span::styled("  │ ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(
            msg.to_string(),
            Style::default().fg(if status_is_error { C_ERROR } else { C_SECONDARY }),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
