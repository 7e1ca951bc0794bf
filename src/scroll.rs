//! Row-based scroll position for a feed where every item is exactly one
//! viewport tall.
//!
//! Wheel ticks never scroll freely: each one moves the target by a whole
//! viewport, and [`ScrollState::tick`] eases the visible position toward it.

/// Fraction of the remaining distance covered per tick.
const EASE: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Animating { target: u32 },
}

#[derive(Debug, Clone)]
pub struct ScrollState {
    position: f64,
    viewport_height: u32,
    item_count: usize,
    phase: ScrollPhase,
}

impl ScrollState {
    pub fn new(viewport_height: u32) -> Self {
        Self {
            position: 0.0,
            viewport_height: viewport_height.max(1),
            item_count: 0,
            phase: ScrollPhase::Idle,
        }
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Top row of the visible window.
    pub fn scroll_top(&self) -> u32 {
        self.position.round().max(0.0) as u32
    }

    pub fn content_height(&self) -> u32 {
        (self.item_count as u32).saturating_mul(self.viewport_height)
    }

    fn max_scroll(&self) -> u32 {
        self.content_height().saturating_sub(self.viewport_height)
    }

    /// Index of the item filling most of the viewport.
    pub fn current_index(&self) -> usize {
        let rows = self.position + self.viewport_height as f64 / 2.0;
        (rows / self.viewport_height as f64).floor().max(0.0) as usize
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        let max = self.max_scroll();
        if let ScrollPhase::Animating { target } = self.phase {
            if target > max {
                self.phase = ScrollPhase::Animating { target: max };
            }
        }
        if self.position > max as f64 {
            self.position = max as f64;
        }
    }

    /// Where the viewport will rest once any animation finishes.
    fn destination(&self) -> f64 {
        match self.phase {
            ScrollPhase::Animating { target } => target as f64,
            ScrollPhase::Idle => self.position,
        }
    }

    /// `content_height - scroll_top <= viewport_height * threshold`, measured
    /// at the scroll destination so loading starts as the animation begins.
    pub fn near_bottom(&self, threshold: f64) -> bool {
        let remaining = self.content_height() as f64 - self.destination();
        remaining <= self.viewport_height as f64 * threshold
    }

    /// One wheel tick. Positive deltas scroll down, negative up; each tick is
    /// worth exactly one viewport and stacks on any pending target.
    pub fn wheel(&mut self, delta_y: i32) {
        if delta_y == 0 {
            return;
        }
        let from = match self.phase {
            ScrollPhase::Animating { target } => target,
            ScrollPhase::Idle => self.scroll_top(),
        };
        let target = if delta_y > 0 {
            from.saturating_add(self.viewport_height)
        } else {
            from.saturating_sub(self.viewport_height)
        };
        self.animate_to(target);
    }

    pub fn jump_to_index(&mut self, index: usize) {
        let target = (index as u32).saturating_mul(self.viewport_height);
        self.animate_to(target);
    }

    fn animate_to(&mut self, target: u32) {
        let target = target.min(self.max_scroll());
        if (self.position - target as f64).abs() < f64::EPSILON {
            self.phase = ScrollPhase::Idle;
        } else {
            self.phase = ScrollPhase::Animating { target };
        }
    }

    /// Advances the animation one frame. Returns true while moving.
    pub fn tick(&mut self) -> bool {
        let ScrollPhase::Animating { target } = self.phase else {
            return false;
        };
        let target = target as f64;
        let remaining = target - self.position;
        if remaining.abs() <= 0.5 {
            self.position = target;
            self.phase = ScrollPhase::Idle;
            return false;
        }
        self.position += remaining * EASE;
        true
    }

    /// Keeps the current item aligned to the top after a terminal resize.
    pub fn resize(&mut self, viewport_height: u32) {
        let viewport_height = viewport_height.max(1);
        if viewport_height == self.viewport_height {
            return;
        }
        let index = match self.phase {
            ScrollPhase::Animating { target } => (target / self.viewport_height) as usize,
            ScrollPhase::Idle => self.current_index(),
        };
        self.viewport_height = viewport_height;
        self.position = (index as u32).saturating_mul(viewport_height) as f64;
        self.phase = ScrollPhase::Idle;
        self.set_item_count(self.item_count);
    }
}
