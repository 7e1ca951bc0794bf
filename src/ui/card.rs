use super::theme::*;
use crate::app::App;
use crate::model::{DisplayColor, FeedItem};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use textwrap::core::display_width;

/// What the card face shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardVisual {
    Video { bytes: usize, uri: String },
    Solid(DisplayColor),
}

impl CardVisual {
    /// A payload that fails validation renders the same as no payload.
    pub fn for_item(item: &FeedItem) -> Self {
        match &item.card.video {
            Some(video) => match video.decoded_len() {
                Some(bytes) => CardVisual::Video {
                    bytes,
                    uri: video.data_uri_preview(12),
                },
                None => CardVisual::Solid(item.card.color),
            },
            None => CardVisual::Solid(item.card.color),
        }
    }

    fn face(&self) -> DisplayColor {
        match self {
            CardVisual::Video { .. } => VIDEO_FACE,
            CardVisual::Solid(color) => *color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CardFrame {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

/// Centered card, roughly square on a terminal with 2:1 cells.
fn card_frame(width: u16, height: u16) -> CardFrame {
    let (width, height) = (width as usize, height as usize);
    let card_h = (height * 6 / 10).max(7).min(height);
    let card_w = (card_h * 2).min(width.saturating_sub(4)).max(1).min(width);
    CardFrame {
        left: (width - card_w) / 2,
        top: (height - card_h) / 2,
        width: card_w,
        height: card_h,
    }
}

fn human_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// `text` centered in `width` columns, cut if it does not fit.
fn centered(text: &str, width: usize) -> String {
    let mut fitted = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = display_width(ch.encode_utf8(&mut [0; 4]));
        if used + w > width {
            break;
        }
        fitted.push(ch);
        used += w;
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), fitted, " ".repeat(right))
}

/// Caption rows for a card: (row inside card, text, is_band).
fn caption_rows(item: &FeedItem, visual: &CardVisual, frame: CardFrame) -> Vec<(usize, String, bool)> {
    let inner = frame.width.saturating_sub(4).max(1);
    let wrap = |text: &str, max_lines: usize| -> Vec<String> {
        textwrap::wrap(text, inner)
            .into_iter()
            .take(max_lines)
            .map(|l| l.into_owned())
            .collect()
    };

    let mut rows = Vec::new();
    let h = frame.height;

    for (i, line) in wrap(&item.card.top_text, 2).into_iter().enumerate() {
        rows.push((1 + i, line, true));
    }

    let mid = h / 2;
    match visual {
        CardVisual::Video { bytes, uri } => {
            rows.push((
                mid.saturating_sub(1),
                format!("▶ {} · loop · muted", human_bytes(*bytes)),
                false,
            ));
            rows.push((mid, uri.clone(), false));
        }
        CardVisual::Solid(color) => rows.push((mid, color.to_string(), false)),
    }

    let bottom = wrap(&item.card.bottom_text, 2);
    let bottom_start = h.saturating_sub(2 + bottom.len());
    for (i, line) in bottom.into_iter().enumerate() {
        rows.push((bottom_start + i, line, true));
    }
    if let Some(line) = wrap(&item.card.description, 1).into_iter().next() {
        rows.push((h.saturating_sub(1), line, true));
    }

    // Small cards cannot show every band; later rows win.
    rows.sort_by_key(|(row, _, _)| *row);
    rows.dedup_by(|later, earlier| {
        if later.0 == earlier.0 {
            std::mem::swap(later, earlier);
            true
        } else {
            false
        }
    });
    rows
}

/// Renders one item as exactly `height` full-width lines.
pub fn card_lines(item: &FeedItem, width: u16, height: u16) -> Vec<Line<'static>> {
    let frame = card_frame(width, height);
    let visual = CardVisual::for_item(item);
    let face = visual.face();
    let captions = caption_rows(item, &visual, frame);

    let backdrop = Style::default().bg(BG_MAIN);
    let face_style = Style::default().bg(face.into()).fg(FG_PRIMARY);
    let band_style = Style::default()
        .bg(band_over(face))
        .fg(FG_PRIMARY)
        .add_modifier(Modifier::BOLD);
    let right = (width as usize).saturating_sub(frame.left + frame.width);

    (0..height as usize)
        .map(|row| {
            if row < frame.top || row >= frame.top + frame.height {
                return Line::from(Span::styled(" ".repeat(width as usize), backdrop));
            }
            let card_row = row - frame.top;
            let mut spans = vec![Span::styled(" ".repeat(frame.left), backdrop)];

            match captions.iter().find(|(r, _, _)| *r == card_row) {
                Some((_, text, true)) if frame.width > 2 => {
                    spans.push(Span::styled(" ", face_style));
                    spans.push(Span::styled(centered(text, frame.width - 2), band_style));
                    spans.push(Span::styled(" ", face_style));
                }
                Some((_, text, _)) => {
                    spans.push(Span::styled(
                        centered(text, frame.width),
                        face_style.fg(FG_SECONDARY),
                    ));
                }
                None => spans.push(Span::styled(" ".repeat(frame.width), face_style)),
            }

            spans.push(Span::styled(" ".repeat(right), backdrop));
            Line::from(spans)
        })
        .collect()
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    if app.feed.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Nothing here yet",
            Style::default().fg(FG_SECONDARY),
        )))
        .alignment(Alignment::Center)
        .style(Style::default().bg(BG_MAIN));
        let row = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        f.render_widget(hint, row);
        return;
    }

    let viewport = area.height as u32;
    let top = app.scroll.scroll_top();
    let first = (top / viewport) as usize;
    let skip = (top % viewport) as u16;

    // At most two items overlap the viewport mid-scroll.
    let lines: Vec<Line> = app
        .feed
        .items()
        .iter()
        .skip(first)
        .take(2)
        .flat_map(|item| card_lines(item, area.width, area.height))
        .collect();

    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(BG_MAIN))
            .scroll((skip, 0)),
        area,
    );
}
