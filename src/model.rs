use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static BASE64_ALPHABET: LazyLock<Regex> = LazyLock::new(base64_alphabet);

fn base64_alphabet() -> Regex {
    Regex::new(r"^[A-Za-z0-9+/=]+$").unwrap_or_else(|err| panic!("base64 alphabet regex: {err}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DisplayColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<DisplayColor> for ratatui::style::Color {
    fn from(c: DisplayColor) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// Base64 video text as received, checked once when it enters the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPayload {
    encoded: String,
    decoded_len: Option<usize>,
}

impl VideoPayload {
    pub const MIME: &'static str = "video/mp4";

    pub fn new(encoded: String) -> Self {
        let decoded_len = Self::inspect(&encoded);
        if decoded_len.is_none() {
            tracing::warn!(
                len = encoded.len(),
                "video payload is not valid base64, rendering placeholder"
            );
        }
        Self {
            encoded,
            decoded_len,
        }
    }

    /// Alphabet check first, then a full decode. A payload that only passes
    /// the alphabet check is still unplayable.
    fn inspect(encoded: &str) -> Option<usize> {
        let trimmed = encoded.trim();
        if !BASE64_ALPHABET.is_match(trimmed) {
            return None;
        }
        STANDARD.decode(trimmed).ok().map(|bytes| bytes.len())
    }

    pub fn decoded_len(&self) -> Option<usize> {
        self.decoded_len
    }

    /// `data:video/mp4;base64,` URI cut to at most `max` chars of payload.
    pub fn data_uri_preview(&self, max: usize) -> String {
        let body = self.encoded.trim();
        let cut: String = body.chars().take(max).collect();
        let ellipsis = if body.len() > cut.len() { "…" } else { "" };
        format!("data:{};base64,{}{}", Self::MIME, cut, ellipsis)
    }
}

/// Content of a feed entry before the feed assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoCard {
    pub color: DisplayColor,
    pub top_text: String,
    pub bottom_text: String,
    pub description: String,
    pub video: Option<VideoPayload>,
}

impl VideoCard {
    /// The three fields duplicate suppression compares.
    pub fn same_content(&self, other: &VideoCard) -> bool {
        self.description == other.description
            && self.top_text == other.top_text
            && self.bottom_text == other.bottom_text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub id: ItemId,
    pub card: VideoCard,
}

impl FeedItem {
    pub fn new(id: ItemId, card: VideoCard) -> Self {
        Self { id, card }
    }
}
