use crate::model::DisplayColor;
use ratatui::style::Color;

pub const BG_MAIN: Color = Color::Rgb(0, 0, 0); // Feed backdrop
pub const BG_STATUS: Color = Color::Rgb(20, 20, 20);
pub const BG_OVERLAY: Color = Color::Rgb(30, 30, 30);
pub const FG_PRIMARY: Color = Color::Rgb(240, 240, 240);
pub const FG_SECONDARY: Color = Color::Rgb(100, 100, 100); // Dimmed text
pub const ACCENT_ORANGE: Color = Color::Rgb(255, 158, 100); // Spinner
pub const ACCENT_BLUE: Color = Color::Rgb(122, 162, 247); // Mode indicator

/// Face of a card that carries a playable video.
pub const VIDEO_FACE: DisplayColor = DisplayColor::rgb(24, 24, 28);

pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A caption band over `base`, half as bright.
pub fn band_over(base: DisplayColor) -> Color {
    Color::Rgb(base.r / 2, base.g / 2, base.b / 2)
}
