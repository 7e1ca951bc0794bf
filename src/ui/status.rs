use super::theme::*;
use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn position_label(current: usize, total: usize) -> String {
    if total == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", current.min(total - 1) + 1, total)
    }
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let spinner = if app.feed.busy().any() {
        SPINNER[app.spinner_frame % SPINNER.len()]
    } else {
        " "
    };

    let left_text = vec![
        Span::styled(
            format!(" reelfeed v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(FG_SECONDARY).bg(BG_STATUS),
        ),
        Span::styled(
            format!(
                " {} ",
                position_label(app.scroll.current_index(), app.feed.len())
            ),
            Style::default().fg(FG_PRIMARY),
        ),
        Span::styled(
            format!(" {} ", app.config.generator.label()),
            Style::default()
                .fg(BG_MAIN)
                .bg(ACCENT_BLUE)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    let right_text = vec![
        Span::styled(format!(" {} ", spinner), Style::default().fg(ACCENT_ORANGE)),
        Span::styled(" j/k: scroll ", Style::default().fg(FG_SECONDARY)),
        Span::styled(" r: reload ", Style::default().fg(FG_SECONDARY)),
        Span::styled(" q: quit ", Style::default().fg(FG_SECONDARY)),
    ];

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Min(0)])
        .split(area);

    f.render_widget(
        Paragraph::new(Line::from(left_text)).alignment(Alignment::Left),
        layout[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(right_text)).alignment(Alignment::Right),
        layout[1],
    );
}
