pub mod card;
pub mod loading;
pub mod status;
pub mod theme;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Stylize,
    widgets::Block,
    Frame,
};
use theme::BG_MAIN;

pub const STATUS_HEIGHT: u16 = 1;

/// Rows left for the feed once the status bar is drawn.
pub fn feed_height(terminal_height: u16) -> u16 {
    terminal_height.saturating_sub(STATUS_HEIGHT)
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // 1. Backdrop
    f.render_widget(Block::default().bg(BG_MAIN), area);

    // 2. Vertical Layout: [ Feed (Flex), Status (1) ]
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(STATUS_HEIGHT)])
        .split(area);

    let feed_area = vertical[0];
    let status_area = vertical[1];

    // 3. Current card(s)
    card::draw(f, app, feed_area);

    // 4. Status bar
    status::draw(f, app, status_area);

    // 5. Overlays
    loading::draw(f, app, feed_area);
}
