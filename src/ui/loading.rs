use super::theme::*;
use crate::app::App;
use crate::feed::BusyFlags;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn label(busy: BusyFlags) -> Option<&'static str> {
    if busy.generating {
        Some("Loading video...")
    } else if busy.loading_list {
        Some("Loading more content...")
    } else {
        None
    }
}

/// Fixed spot at the bottom center of `area`, clamped to fit.
fn overlay_rect(text_width: u16, area: Rect) -> Rect {
    let width = (text_width + 6).min(area.width);
    let height = 3.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: (area.y + area.height).saturating_sub(height + 1).max(area.y),
        width,
        height,
    }
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(text) = label(app.feed.busy()) else {
        return;
    };

    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
    let content = Line::from(vec![
        Span::styled(spinner, Style::default().fg(ACCENT_ORANGE)),
        Span::raw(" "),
        Span::styled(text, Style::default().fg(FG_PRIMARY)),
    ]);

    let rect = overlay_rect(content.width() as u16, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(FG_SECONDARY))
        .bg(BG_OVERLAY);

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(content).alignment(Alignment::Center).block(block),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_generation_text() {
        let idle = BusyFlags::default();
        assert_eq!(label(idle), None);

        let listing = BusyFlags {
            loading_list: true,
            generating: false,
        };
        assert_eq!(label(listing), Some("Loading more content..."));

        let both = BusyFlags {
            loading_list: true,
            generating: true,
        };
        assert_eq!(label(both), Some("Loading video..."));
    }

    #[test]
    fn overlay_sits_inside_the_area() {
        let area = Rect::new(0, 0, 80, 23);
        let rect = overlay_rect(25, area);
        assert_eq!(rect, Rect::new(24, 19, 31, 3));

        let tiny = Rect::new(0, 0, 10, 2);
        let rect = overlay_rect(25, tiny);
        assert_eq!(rect.width, 10);
        assert!(rect.bottom() <= tiny.bottom());
    }
}
