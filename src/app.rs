use crate::config::Config;
use crate::feed::{self, Feed, LoadKind, LoadOutcome, LoadTicket};
use crate::fetcher::ContentSource;
use crate::scroll::ScrollState;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use std::sync::Arc;
use tokio::sync::mpsc;

// Events passed from background tasks back to the UI
#[derive(Debug)]
pub enum AppEvent {
    Tick,                     // Animation / spinner frame
    Generating(u64),          // Load `seq` is synthesizing items
    FeedLoaded(LoadOutcome),  // Load finished
}

pub struct App {
    pub config: Config,
    pub feed: Feed,
    pub scroll: ScrollState,
    pub spinner_frame: usize,
    pub should_quit: bool,
    source: Arc<dyn ContentSource>,
    event_tx: mpsc::Sender<AppEvent>, // Channel to send events to self
}

impl App {
    pub fn new(
        config: Config,
        source: Arc<dyn ContentSource>,
        event_tx: mpsc::Sender<AppEvent>,
        viewport_height: u16,
    ) -> Self {
        Self {
            feed: Feed::new(config.page_size),
            scroll: ScrollState::new(viewport_height as u32),
            spinner_frame: 0,
            should_quit: false,
            config,
            source,
            event_tx,
        }
    }

    /// Kicks off the initial load.
    pub fn start(&mut self) {
        if let Some(ticket) = self.feed.begin_initial(self.config.initial_count) {
            self.spawn_load(ticket);
        }
    }

    /// Throws the feed away and loads it again from offset 0.
    pub fn reload(&mut self) {
        tracing::info!("reloading feed");
        self.feed.reset();
        self.scroll = ScrollState::new(self.scroll.viewport_height());
        self.start();
    }

    pub fn resize(&mut self, viewport_height: u16) {
        self.scroll.resize(viewport_height as u32);
    }

    fn spawn_load(&self, ticket: LoadTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let notify = tx.clone();
            let on_generate = move || {
                if let Err(e) = notify.try_send(AppEvent::Generating(ticket.seq)) {
                    tracing::debug!(seq = ticket.seq, error = %e, "generation notice dropped");
                }
            };

            let outcome = match ticket.kind {
                LoadKind::Initial => feed::load_initial(source.as_ref(), ticket, on_generate).await,
                LoadKind::More => feed::load_more(source.as_ref(), ticket, on_generate).await,
            };

            if tx.send(AppEvent::FeedLoaded(outcome)).await.is_err() {
                tracing::debug!(seq = ticket.seq, "ui gone before load finished");
            }
        });
    }

    /// Loads the next page once the viewport is close enough to the end.
    fn maybe_load_more(&mut self) {
        if self.feed.busy().any() || !self.scroll.near_bottom(self.config.load_threshold) {
            return;
        }
        if let Some(ticket) = self.feed.begin_more() {
            tracing::debug!(
                offset = self.feed.offset(),
                held = self.feed.len(),
                "near bottom, loading more"
            );
            self.spawn_load(ticket);
        }
    }

    fn wheel(&mut self, delta_y: i32) {
        self.scroll.wheel(delta_y);
        self.maybe_load_more();
    }

    /// Handle keyboard inputs
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown | KeyCode::Char(' ') => {
                self.wheel(1)
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => self.wheel(-1),
            KeyCode::Home | KeyCode::Char('g') => self.scroll.jump_to_index(0),
            KeyCode::End | KeyCode::Char('G') => {
                self.scroll
                    .jump_to_index(self.feed.len().saturating_sub(1));
                self.maybe_load_more();
            }
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    /// Wheel ticks become whole-viewport scrolls.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.wheel(1),
            MouseEventKind::ScrollUp => self.wheel(-1),
            _ => {}
        }
    }

    /// Handle events coming from background tasks
    pub fn handle_internal_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                self.scroll.tick();
                self.maybe_load_more();
            }
            AppEvent::Generating(seq) => self.feed.mark_generating(seq),
            AppEvent::FeedLoaded(outcome) => {
                let report = self.feed.apply(outcome);
                if !report.stale {
                    self.scroll.set_item_count(self.feed.len());
                }
            }
        }
    }
}
