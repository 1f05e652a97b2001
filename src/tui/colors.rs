//! Shared styles for the TUI

use ratatui::prelude::*;

/// Accent used for the status bar and table header
pub const ACCENT: Color = Color::Rgb(0, 95, 135);

/// Alternating row background
pub const ROW_ALT_BG: Color = Color::Rgb(25, 25, 35);

/// Background of the grid cursor row
pub const ROW_SELECTED_BG: Color = Color::Rgb(60, 60, 80);

/// Color-code a vote average: green is well liked, red is not
pub fn rating_color(vote_average: f64) -> Color {
    if vote_average >= 7.0 {
        Color::Green
    } else if vote_average >= 5.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Uppercase language tag for display
pub fn language_label(code: Option<&str>) -> String {
    code.map(|c| c.to_uppercase())
        .unwrap_or_else(|| "?".to_string())
}
