//! Recommendation carousel.
//!
//! A single-owner state machine. The host feeds it interactions and the
//! current time; it never sleeps or spawns. Timers are plain deadlines that
//! every state change cancels or re-arms.
//!
//! ```text
//!            select(j), j != i
//!   Idle(i) ──────────────────► Transitioning(i, j, dir)
//!      ▲                               │
//!      └──── transition_complete ◄─────┘  (or watchdog deadline)
//! ```
//!
//! | Timer    | Armed                               | Fires                  |
//! |----------|-------------------------------------|------------------------|
//! | autoplay | entering `Idle` while enabled       | `select(active + 1)`   |
//! | watchdog | entering `Transitioning`            | `transition_complete`  |

use crate::config::CarouselSection;
use crate::content::panels::Recommendation;
use crate::dom::{Action, Element, Key, Node, Trigger};
use crate::log;
use std::time::{Duration, Instant};

/// Slide direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    const fn class(self) -> &'static str {
        match self {
            Self::Left => "slide-left",
            Self::Right => "slide-right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle(usize),
    Transitioning {
        from: usize,
        to: usize,
        direction: Direction,
    },
}

pub struct Carousel {
    items: Vec<Recommendation>,
    state: State,
    autoplay_every: Duration,
    watchdog_after: Duration,
    swipe_threshold: f32,
    /// Cleared by explicit interaction, set again on pointer leave.
    autoplay_enabled: bool,
    autoplay: Option<Instant>,
    watchdog: Option<Instant>,
    heights: Vec<Option<f32>>,
    height: Option<f32>,
    announcement: String,
    touch: Option<(f32, f32)>,
}

impl Carousel {
    pub fn new(items: Vec<Recommendation>, config: &CarouselSection, now: Instant) -> Self {
        let heights = vec![None; items.len()];
        let mut carousel = Self {
            items,
            state: State::Idle(0),
            autoplay_every: config.autoplay(),
            watchdog_after: config.watchdog(),
            swipe_threshold: config.swipe_threshold,
            autoplay_enabled: true,
            autoplay: None,
            watchdog: None,
            heights,
            height: None,
            announcement: String::new(),
            touch: None,
        };
        carousel.arm_autoplay(now);
        carousel
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn state(&self) -> State {
        self.state
    }

    /// Index of the item currently shown as active.
    pub const fn active(&self) -> usize {
        match self.state {
            State::Idle(i) | State::Transitioning { from: i, .. } => i,
        }
    }

    /// Live-region text of the last completed transition.
    pub fn announcement(&self) -> &str {
        &self.announcement
    }

    /// Container height, once the active item has been measured.
    pub const fn height(&self) -> Option<f32> {
        self.height
    }

    /// Earliest pending deadline, for the host to schedule its next tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.autoplay, self.watchdog) {
            (Some(a), Some(w)) => Some(a.min(w)),
            (a, w) => a.or(w),
        }
    }

    pub const fn autoplay_deadline(&self) -> Option<Instant> {
        self.autoplay
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Start a transition to `index`. Ignored while transitioning, for the
    /// active index and for out-of-range indices.
    pub fn select(&mut self, index: usize, now: Instant) -> bool {
        let State::Idle(active) = self.state else {
            return false;
        };
        if index == active || index >= self.len() {
            return false;
        }
        let direction = if index > active {
            Direction::Left
        } else {
            Direction::Right
        };
        self.state = State::Transitioning {
            from: active,
            to: index,
            direction,
        };
        self.autoplay = None;
        self.watchdog = Some(now + self.watchdog_after);
        true
    }

    /// Finish the in-flight transition.
    pub fn transition_complete(&mut self, now: Instant) {
        let State::Transitioning { to, .. } = self.state else {
            return;
        };
        self.state = State::Idle(to);
        self.watchdog = None;
        self.height = self.heights.get(to).copied().flatten();
        self.announcement = format!("Showing recommendation {} of {}", to + 1, self.len());
        self.arm_autoplay(now);
    }

    /// Fire every deadline at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.watchdog.is_some_and(|deadline| deadline <= now) {
            log!("carousel"; "transition watchdog fired");
            self.transition_complete(now);
        }
        if self.autoplay.is_some_and(|deadline| deadline <= now)
            && let State::Idle(active) = self.state
        {
            self.select((active + 1) % self.len(), now);
        }
    }

    fn arm_autoplay(&mut self, now: Instant) {
        self.autoplay = (self.autoplay_enabled
            && self.len() > 1
            && matches!(self.state, State::Idle(_)))
        .then(|| now + self.autoplay_every);
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Explicit user selection: stops autoplay until the pointer leaves.
    pub fn interact(&mut self, index: usize, now: Instant) -> bool {
        self.autoplay_enabled = false;
        self.autoplay = None;
        self.select(index, now)
    }

    /// Previous (`delta < 0`) or next item, wrapping.
    pub fn step(&mut self, delta: i32, now: Instant) -> bool {
        let len = self.len();
        if len == 0 {
            return false;
        }
        let active = self.active();
        let target = if delta < 0 {
            (active + len - 1) % len
        } else {
            (active + 1) % len
        };
        self.interact(target, now)
    }

    pub fn key(&mut self, key: Key, now: Instant) -> bool {
        match key {
            Key::ArrowLeft => self.step(-1, now),
            Key::ArrowRight => self.step(1, now),
            _ => false,
        }
    }

    pub fn pointer_leave(&mut self, now: Instant) {
        self.autoplay_enabled = true;
        self.arm_autoplay(now);
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.touch = Some((x, y));
    }

    /// End a touch sequence. A mostly horizontal drag past the threshold
    /// selects the next (drag left) or previous (drag right) item.
    pub fn touch_end(&mut self, x: f32, y: f32, now: Instant) -> bool {
        let Some((start_x, start_y)) = self.touch.take() else {
            return false;
        };
        let (dx, dy) = (x - start_x, y - start_y);
        if dx.abs() <= self.swipe_threshold || dx.abs() <= dy.abs() {
            return false;
        }
        self.step(if dx < 0.0 { 1 } else { -1 }, now)
    }

    /// Record the rendered height of item `index`.
    pub fn measure(&mut self, index: usize, height: f32) {
        if let Some(slot) = self.heights.get_mut(index) {
            *slot = Some(height);
        }
        if index == self.active() && matches!(self.state, State::Idle(_)) {
            self.height = Some(height);
        }
    }

    /// Apply an action from the rendered tree. Returns whether it was handled.
    pub fn dispatch(&mut self, action: &Action, now: Instant) -> bool {
        match action {
            Action::Select(index) => self.interact(*index, now),
            Action::Step(delta) => self.step(*delta, now),
            Action::ResumeAutoplay => {
                self.pointer_leave(now);
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self) -> Node {
        let active = self.active();
        let entering = match self.state {
            State::Transitioning { to, direction, .. } => Some((to, direction)),
            State::Idle(_) => None,
        };

        let items = self.items.iter().enumerate().map(|(i, rec)| {
            let mut el = recommendation(rec);
            if i == active {
                el = el.class("active");
            }
            if let Some((to, direction)) = entering
                && to == i
            {
                el = el.class(direction.class());
            }
            el
        });

        let dots = (0..self.len()).map(|i| {
            let mut dot = Element::new("span")
                .class("dot")
                .attr("data-index", i.to_string())
                .attr("role", "button")
                .attr("tabindex", "0")
                .attr("aria-label", format!("Show recommendation {}", i + 1))
                .activatable(Action::Select(i));
            if i == active {
                dot = dot.class("active");
            }
            dot
        });

        let mut content = Element::new("div")
            .class("recommendation-content")
            .children(items);
        if let Some(height) = self.height {
            content = content.attr("style", format!("height: {height}px"));
        }

        Element::new("div")
            .class("recommendations-carousel")
            .attr("tabindex", "0")
            .on(Trigger::Key(Key::ArrowLeft), Action::Step(-1))
            .on(Trigger::Key(Key::ArrowRight), Action::Step(1))
            .on(Trigger::PointerLeave, Action::ResumeAutoplay)
            .child(content)
            .child(
                Element::new("div")
                    .attr("id", "recommendation-dots")
                    .children(dots),
            )
            .child(
                Element::new("div")
                    .class("sr-only")
                    .attr("aria-live", "polite")
                    .text(self.announcement.as_str()),
            )
            .into()
    }
}

fn recommendation(rec: &Recommendation) -> Element {
    let mut header = Element::new("div").class("recommendation-header");
    if let Some(avatar) = &rec.avatar {
        header = header.child(
            Element::new("img")
                .attr("src", avatar.as_str())
                .attr("alt", rec.name.as_str())
                .class("recommendation-avatar"),
        );
    }
    header = header.child(
        Element::new("div")
            .class("recommendation-details")
            .child(Element::new("h2").text(rec.name.as_str()))
            .child(Element::new("h3").text(rec.position.as_str()))
            .child(
                Element::new("p")
                    .class("recommendation-date")
                    .text(rec.date.as_str()),
            ),
    );

    Element::new("div")
        .class("recommendation")
        .child(header)
        .child(
            Element::new("p")
                .class("recommendation-quote")
                .text(format!("\"{}\"", rec.quote)),
        )
}
