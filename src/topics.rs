use crate::model::{DisplayColor, VideoCard};
use rand::Rng;

pub const TOPICS: [&str; 10] = [
    "cat fails",
    "cooking disaster",
    "dance challenge",
    "gaming rage",
    "parkour fail",
    "cute puppy",
    "skateboard trick",
    "magic trick fail",
    "unexpected ending",
    "talent show moment",
];

pub const PALETTE: [DisplayColor; 7] = [
    DisplayColor::rgb(0xFF, 0x6B, 0x6B),
    DisplayColor::rgb(0x4E, 0xCD, 0xC4),
    DisplayColor::rgb(0x45, 0xB7, 0xD1),
    DisplayColor::rgb(0x96, 0xCE, 0xB4),
    DisplayColor::rgb(0xFF, 0xEE, 0xAD),
    DisplayColor::rgb(0xD4, 0xA5, 0xA5),
    DisplayColor::rgb(0x9B, 0x59, 0xB6),
];

pub const FALLBACK_BOTTOM_TEXT: &str = "You won't believe what happens next!";

pub fn random_topic<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TOPICS[rng.random_range(0..TOPICS.len())]
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> DisplayColor {
    PALETTE[rng.random_range(0..PALETTE.len())]
}

pub fn fallback_description(topic: &str) -> String {
    format!("A funny video about {}", topic)
}

pub fn fallback_top_text(topic: &str) -> String {
    format!("Watch this {}", topic)
}

/// The card shown when generation for `topic` fails.
pub fn fallback_card(topic: &str, color: DisplayColor) -> VideoCard {
    VideoCard {
        color,
        top_text: fallback_top_text(topic),
        bottom_text: FALLBACK_BOTTOM_TEXT.to_string(),
        description: fallback_description(topic),
        video: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn picks_come_from_the_tables() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(TOPICS.contains(&random_topic(&mut rng)));
            assert!(PALETTE.contains(&random_color(&mut rng)));
        }
    }

    #[test]
    fn every_topic_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1_000 {
            seen.insert(random_topic(&mut rng));
        }
        assert_eq!(seen.len(), TOPICS.len());
    }

    #[test]
    fn fallback_card_uses_topic() {
        let card = fallback_card("cute puppy", PALETTE[0]);
        assert_eq!(card.description, "A funny video about cute puppy");
        assert_eq!(card.top_text, "Watch this cute puppy");
        assert_eq!(card.bottom_text, "You won't believe what happens next!");
        assert!(card.video.is_none());
    }
}
