//! Color palette and style constants for the wisense TUI.

use ratatui::style::{Color, Style};
use wisense_core::Material;

// ── Chrome ────────────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_ERROR: Color = Color::Rgb(255, 80, 80);
pub const C_LIVE: Color = Color::Rgb(80, 200, 120);
pub const C_PAUSED: Color = Color::Rgb(255, 184, 80);
pub const C_MARKER: Color = Color::Rgb(90, 90, 115);

// ── Series ────────────────────────────────────────────────────────────────────

pub const C_RSSI: Color = Color::Rgb(80, 160, 220);
pub const C_NOISE: Color = Color::Rgb(255, 160, 70);
pub const C_SNR: Color = Color::Rgb(80, 200, 120);

// ── Materials ─────────────────────────────────────────────────────────────────

/// Full-strength material colour, used for bar-group labels and the
/// legend.
pub fn material_color(material: Material) -> Color {
    match material {
        Material::Baseline => Color::Rgb(248, 249, 250),
        Material::Wood => Color::Rgb(244, 228, 188),
        Material::Plastic => Color::Rgb(227, 242, 253),
        Material::Glass => Color::Rgb(241, 248, 233),
        Material::Aluminium => Color::Rgb(236, 239, 241),
        Material::Copper => Color::Rgb(255, 243, 224),
        Material::Steel => Color::Rgb(250, 250, 250),
    }
}

/// Dimmed variant used for background shading behind the live chart —
/// the pastel palette divided down so braille points stay readable.
pub fn material_bg(material: Material) -> Color {
    match material {
        Material::Baseline => C_BG,
        Material::Wood => Color::Rgb(58, 48, 28),
        Material::Plastic => Color::Rgb(28, 44, 60),
        Material::Glass => Color::Rgb(34, 52, 30),
        Material::Aluminium => Color::Rgb(40, 46, 50),
        Material::Copper => Color::Rgb(62, 44, 24),
        Material::Steel => Color::Rgb(44, 44, 48),
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
