//! Feed state: the ordered item list, the pagination offset and the two busy
//! flags, plus the async load routines that produce outcomes for it.
//!
//! Loads are split in three steps so the UI loop never awaits the network:
//! `begin_*` hands out a [`LoadTicket`] (or `None` while busy), a spawned task
//! runs [`load_initial`] / [`load_more`] against a [`ContentSource`], and the
//! resulting [`LoadOutcome`] is merged back with [`Feed::apply`]. Every ticket
//! carries a sequence number; only the most recently issued one is applied.

use crate::fetcher::ContentSource;
use crate::model::{FeedItem, ItemId, VideoCard};
use crate::topics;
use futures_util::future::join_all;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    pub loading_list: bool,
    pub generating: bool,
}

impl BusyFlags {
    pub fn any(&self) -> bool {
        self.loading_list || self.generating
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub kind: LoadKind,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    /// Cards the list fetch returned.
    pub fetched: Vec<VideoCard>,
    /// Cards synthesized because the list fetch came up short.
    pub generated: Vec<VideoCard>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub appended: usize,
    pub duplicates: usize,
    pub stale: bool,
}

#[derive(Debug)]
pub struct Feed {
    items: Vec<FeedItem>,
    offset: usize,
    page_size: usize,
    busy: BusyFlags,
    next_id: u64,
    latest_seq: u64,
}

impl Feed {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            page_size: page_size.max(1),
            busy: BusyFlags::default(),
            next_id: 0,
            latest_seq: 0,
        }
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    fn issue(&mut self, kind: LoadKind, limit: usize) -> Option<LoadTicket> {
        if self.busy.any() {
            return None;
        }
        self.busy.loading_list = true;
        self.latest_seq += 1;
        Some(LoadTicket {
            seq: self.latest_seq,
            kind,
            offset: self.offset,
            limit,
        })
    }

    /// Starts the initial load of `count` items.
    pub fn begin_initial(&mut self, count: usize) -> Option<LoadTicket> {
        self.issue(LoadKind::Initial, count.max(1))
    }

    /// Starts loading the next page. `None` while a load is in flight.
    pub fn begin_more(&mut self) -> Option<LoadTicket> {
        self.issue(LoadKind::More, self.page_size)
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }

    /// The list fetch for `seq` came up short and synthesis has started.
    pub fn mark_generating(&mut self, seq: u64) {
        if self.is_current(seq) {
            self.busy.generating = true;
        }
    }

    /// Drops every item and invalidates in-flight loads.
    pub fn reset(&mut self) {
        self.items.clear();
        self.offset = 0;
        self.busy = BusyFlags::default();
        self.latest_seq += 1;
    }

    fn holds(&self, card: &VideoCard) -> bool {
        self.items.iter().any(|item| item.card.same_content(card))
    }

    fn push(&mut self, card: VideoCard) {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(FeedItem::new(id, card));
    }

    /// Merges a finished load. Outcomes from superseded tickets are ignored.
    pub fn apply(&mut self, outcome: LoadOutcome) -> ApplyReport {
        let LoadOutcome {
            ticket,
            fetched,
            generated,
        } = outcome;

        if !self.is_current(ticket.seq) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "dropping stale load outcome"
            );
            return ApplyReport {
                stale: true,
                ..ApplyReport::default()
            };
        }

        let mut report = ApplyReport::default();
        let list_succeeded = !fetched.is_empty();
        // The initial batch is taken as fetched so it stays `limit` long.
        let suppress = ticket.kind == LoadKind::More;

        for card in fetched {
            if suppress && self.holds(&card) {
                report.duplicates += 1;
                continue;
            }
            self.push(card);
            report.appended += 1;
        }
        for card in generated {
            self.push(card);
            report.appended += 1;
        }

        if list_succeeded {
            self.offset = ticket.offset + ticket.limit;
        }
        self.busy = BusyFlags::default();

        tracing::info!(
            kind = ?ticket.kind,
            appended = report.appended,
            duplicates = report.duplicates,
            offset = self.offset,
            total = self.items.len(),
            "feed updated"
        );
        report
    }
}

fn pick_topics(count: usize) -> Vec<&'static str> {
    let mut rng = rand::rng();
    (0..count).map(|_| topics::random_topic(&mut rng)).collect()
}

/// Fetches `ticket.limit` existing items and synthesizes the shortfall
/// concurrently. `on_generate` fires before synthesis starts.
pub async fn load_initial<F>(
    source: &dyn ContentSource,
    ticket: LoadTicket,
    on_generate: F,
) -> LoadOutcome
where
    F: FnOnce() + Send,
{
    let fetched = source.fetch_page(ticket.limit, ticket.offset).await;
    let missing = ticket.limit.saturating_sub(fetched.len());

    let mut generated = Vec::new();
    if missing > 0 {
        on_generate();
        let topics = pick_topics(missing);
        generated = join_all(topics.iter().map(|topic| source.generate_item(topic))).await;
    }

    LoadOutcome {
        ticket,
        fetched,
        generated,
    }
}

/// Fetches the next page; an empty page yields exactly one synthesized item.
pub async fn load_more<F>(source: &dyn ContentSource, ticket: LoadTicket, on_generate: F) -> LoadOutcome
where
    F: FnOnce() + Send,
{
    let fetched = source.fetch_page(ticket.limit, ticket.offset).await;

    let mut generated = Vec::new();
    if fetched.is_empty() {
        on_generate();
        let topic = pick_topics(1).pop().unwrap_or(topics::TOPICS[0]);
        generated.push(source.generate_item(topic).await);
    }

    LoadOutcome {
        ticket,
        fetched,
        generated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DisplayColor;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn card(n: usize) -> VideoCard {
        VideoCard {
            color: DisplayColor::rgb(0x45, 0xB7, 0xD1),
            top_text: format!("prompt {n}"),
            bottom_text: format!("description {n}"),
            description: format!("description {n}"),
            video: None,
        }
    }

    /// Serves queued pages (empty once exhausted) and counts generations.
    #[derive(Default)]
    struct FakeSource {
        pages: Mutex<Vec<Vec<VideoCard>>>,
        requests: Mutex<Vec<(usize, usize)>>,
        generated: AtomicUsize,
    }

    impl FakeSource {
        fn with_pages(pages: Vec<Vec<VideoCard>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                ..Self::default()
            }
        }

        fn requests(&self) -> Vec<(usize, usize)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch_page(&self, limit: usize, offset: usize) -> Vec<VideoCard> {
            self.requests.lock().unwrap().push((limit, offset));
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Vec::new()
            } else {
                pages.remove(0)
            }
        }

        async fn generate_item(&self, topic: &str) -> VideoCard {
            self.generated.fetch_add(1, Ordering::SeqCst);
            topics::fallback_card(topic, DisplayColor::rgb(0, 0, 0))
        }
    }

    async fn run_initial(feed: &mut Feed, source: &FakeSource, count: usize) -> ApplyReport {
        let ticket = feed.begin_initial(count).unwrap();
        let outcome = load_initial(source, ticket, || {}).await;
        feed.apply(outcome)
    }

    async fn run_more(feed: &mut Feed, source: &FakeSource) -> ApplyReport {
        let ticket = feed.begin_more().unwrap();
        let outcome = load_more(source, ticket, || {}).await;
        feed.apply(outcome)
    }

    #[tokio::test]
    async fn short_initial_page_is_topped_up_with_generated_items() {
        let source = FakeSource::with_pages(vec![(0..3).map(card).collect()]);
        let mut feed = Feed::new(5);

        let report = run_initial(&mut feed, &source, 5).await;

        assert_eq!(report.appended, 5);
        assert_eq!(feed.len(), 5);
        assert_eq!(source.generated.load(Ordering::SeqCst), 2);
        assert_eq!(feed.items()[0].card.top_text, "prompt 0");
        assert!(feed.items()[3].card.description.starts_with("A funny video about"));
        assert_eq!(feed.offset(), 5);
        assert!(!feed.busy().any());
    }

    #[tokio::test]
    async fn failed_initial_fetch_still_fills_the_feed() {
        let source = FakeSource::default();
        let mut feed = Feed::new(5);

        run_initial(&mut feed, &source, 5).await;

        assert_eq!(feed.len(), 5);
        assert_eq!(source.generated.load(Ordering::SeqCst), 5);
        assert_eq!(feed.offset(), 0);
    }

    #[tokio::test]
    async fn load_more_advances_offset_only_after_a_non_empty_page() {
        let source = FakeSource::with_pages(vec![
            (0..5).map(card).collect(),
            (5..10).map(card).collect(),
        ]);
        let mut feed = Feed::new(5);

        run_initial(&mut feed, &source, 5).await;
        assert_eq!(feed.offset(), 5);

        run_more(&mut feed, &source).await;
        assert_eq!(feed.offset(), 10);
        assert_eq!(feed.len(), 10);

        // Store exhausted: one generated item, offset unchanged.
        let report = run_more(&mut feed, &source).await;
        assert_eq!(report.appended, 1);
        assert_eq!(feed.offset(), 10);
        assert_eq!(feed.len(), 11);

        assert_eq!(source.requests(), vec![(5, 0), (5, 5), (5, 10)]);
    }

    #[tokio::test]
    async fn length_tracks_the_sum_of_fetched_items() {
        let source = FakeSource::with_pages(vec![
            (0..5).map(card).collect(),
            (5..7).map(card).collect(),
            (7..12).map(card).collect(),
        ]);
        let mut feed = Feed::new(5);

        run_initial(&mut feed, &source, 5).await;
        let mut previous = feed.len();
        let mut total = previous;
        for _ in 0..2 {
            let report = run_more(&mut feed, &source).await;
            total += report.appended;
            assert!(feed.len() >= previous);
            previous = feed.len();
        }
        assert_eq!(feed.len(), total);
        assert_eq!(feed.len(), 12);
    }

    #[tokio::test]
    async fn duplicate_cards_are_suppressed() {
        let source = FakeSource::with_pages(vec![
            (0..5).map(card).collect(),
            vec![card(1), card(5), card(5)],
        ]);
        let mut feed = Feed::new(5);

        run_initial(&mut feed, &source, 5).await;
        let report = run_more(&mut feed, &source).await;

        assert_eq!(report.appended, 1);
        assert_eq!(report.duplicates, 2);
        assert_eq!(feed.len(), 6);
        // The page was not empty, so the cursor still moves.
        assert_eq!(feed.offset(), 10);
    }

    #[tokio::test]
    async fn initial_batch_keeps_repeated_rows() {
        let source = FakeSource::with_pages(vec![vec![card(7); 5]]);
        let mut feed = Feed::new(5);

        let report = run_initial(&mut feed, &source, 5).await;

        assert_eq!(report.appended, 5);
        assert_eq!(report.duplicates, 0);
        assert_eq!(feed.len(), 5);
        assert_eq!(source.generated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generated_cards_are_never_suppressed() {
        let source = FakeSource::default();
        let mut feed = Feed::new(5);
        run_initial(&mut feed, &source, 5).await;

        let ticket = feed.begin_more().unwrap();
        let repeat = feed.items()[0].card.clone();
        let report = feed.apply(LoadOutcome {
            ticket,
            fetched: Vec::new(),
            generated: vec![repeat],
        });
        assert_eq!(report.appended, 1);
        assert_eq!(feed.len(), 6);
    }

    #[test]
    fn busy_feed_refuses_new_tickets() {
        let mut feed = Feed::new(5);
        let ticket = feed.begin_initial(5).unwrap();
        assert!(feed.busy().loading_list);
        assert_eq!(feed.begin_more(), None);

        feed.mark_generating(ticket.seq);
        assert!(feed.busy().generating);
        assert_eq!(feed.begin_more(), None);

        feed.apply(LoadOutcome {
            ticket,
            fetched: vec![card(0)],
            generated: Vec::new(),
        });
        assert_eq!(feed.busy(), BusyFlags::default());
        assert!(feed.begin_more().is_some());
    }

    #[test]
    fn outcome_from_before_reset_is_dropped() {
        let mut feed = Feed::new(5);
        let old = feed.begin_initial(5).unwrap();
        feed.reset();
        let fresh = feed.begin_initial(5).unwrap();
        assert!(fresh.seq > old.seq);

        feed.mark_generating(old.seq);
        assert!(!feed.busy().generating);

        let report = feed.apply(LoadOutcome {
            ticket: old,
            fetched: vec![card(0)],
            generated: Vec::new(),
        });
        assert!(report.stale);
        assert!(feed.is_empty());
        assert!(feed.busy().loading_list);

        let report = feed.apply(LoadOutcome {
            ticket: fresh,
            fetched: vec![card(1)],
            generated: Vec::new(),
        });
        assert!(!report.stale);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut feed = Feed::new(5);
        let ticket = feed.begin_initial(3).unwrap();
        feed.apply(LoadOutcome {
            ticket,
            fetched: (0..2).map(card).collect(),
            generated: vec![card(9)],
        });
        let ids: Vec<u64> = feed.items().iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn on_generate_fires_only_when_synthesizing() {
        let source = FakeSource::with_pages(vec![(0..5).map(card).collect()]);
        let mut feed = Feed::new(5);
        let fired = AtomicUsize::new(0);

        let ticket = feed.begin_initial(5).unwrap();
        let outcome = load_initial(&source, ticket, || {
            fired.fetch_add(1, Ordering::SeqCst);
        })
        .await;
        feed.apply(outcome);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        let ticket = feed.begin_more().unwrap();
        load_more(&source, ticket, || {
            fired.fetch_add(1, Ordering::SeqCst);
        })
        .await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
