//! Horizontal swipe gestures for paged reading.
//!
//! A single-finger movement becomes a swipe once it travels further than the
//! start threshold horizontally and further horizontally than vertically.
//! From then on the page follows the finger (the preview offset). On release
//! the gesture either commits, animating a full viewport width before the
//! page turns, or snaps back to zero.

use crate::engine::config::{ReadingDirection, ReadingMode, SwipeConfig};
use crate::engine::timing::{Scheduler, Tick, TimerId, TimingStrategy};
use crate::reading::navigation::PageDirection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Maps a swipe to a page direction. Leftward means "next" when reading
/// left to right and "previous" when reading right to left.
pub fn swipe_direction(is_leftward: bool, reading: ReadingDirection) -> PageDirection {
    match (is_leftward, reading) {
        (true, ReadingDirection::LeftToRight) | (false, ReadingDirection::RightToLeft) => {
            PageDirection::Next
        }
        (false, ReadingDirection::LeftToRight) | (true, ReadingDirection::RightToLeft) => {
            PageDirection::Previous
        }
    }
}

/// The page a swipe in `direction` would reveal, or `None` at the chapter
/// boundary (the preview then shows nothing).
pub fn preview_page_index(
    current: usize,
    direction: PageDirection,
    page_count: usize,
    mode: ReadingMode,
) -> Option<usize> {
    let step = mode.pages_per_view();
    match direction {
        PageDirection::Next => current.checked_add(step).filter(|&index| index < page_count),
        PageDirection::Previous if current == 0 || current >= page_count => None,
        PageDirection::Previous => Some(current.saturating_sub(step)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeOutcome {
    pub direction: PageDirection,
    pub committed: bool,
    pub preview_offset_px: f64,
}

/// Progress of the release animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEvent {
    Settling { offset_px: f64 },
    /// Animation complete and transient state reset. Navigate iff committed.
    Finished {
        direction: PageDirection,
        committed: bool,
    },
}

#[derive(Debug, Clone, Copy)]
struct SwipeSession {
    start: TouchPoint,
    last: TouchPoint,
    max_vertical_drift: f64,
    swiping: bool,
}

#[derive(Debug, Clone, Copy)]
struct Settle {
    from: f64,
    to: f64,
    started_ms: u64,
    direction: PageDirection,
    committed: bool,
}

pub struct SwipeClassifier {
    config: SwipeConfig,
    enabled: bool,
    reading: ReadingDirection,
    session: Option<SwipeSession>,
    settle: Option<Settle>,
    offset_px: f64,
    timer: Option<TimerId>,
}

impl SwipeClassifier {
    pub fn new(config: SwipeConfig, enabled: bool, reading: ReadingDirection) -> Self {
        Self {
            config,
            enabled,
            reading,
            session: None,
            settle: None,
            offset_px: 0.0,
            timer: None,
        }
    }

    pub fn reconfigure(&mut self, config: SwipeConfig, enabled: bool, reading: ReadingDirection) {
        self.config = config;
        self.enabled = enabled;
        self.reading = reading;
    }

    /// Current horizontal offset of the page under the finger.
    pub fn preview_offset(&self) -> f64 {
        self.offset_px
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Begins a new gesture, discarding whatever the previous one left behind.
    pub fn on_touch_start(&mut self, touches: &[TouchPoint], scheduler: &mut Scheduler) {
        self.reset(scheduler);
        if !self.enabled || touches.len() != 1 {
            return;
        }
        self.session = Some(SwipeSession {
            start: touches[0],
            last: touches[0],
            max_vertical_drift: 0.0,
            swiping: false,
        });
    }

    /// Returns a preview once the movement has been classified as a swipe.
    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> Option<SwipeOutcome> {
        if touches.len() != 1 {
            // A second finger turns this into a pinch, not a swipe.
            self.session = None;
            self.offset_px = 0.0;
            return None;
        }
        let session = self.session.as_mut()?;
        let point = touches[0];
        session.last = point;

        let dx = point.x - session.start.x;
        let dy = point.y - session.start.y;
        session.max_vertical_drift = session.max_vertical_drift.max(dy.abs());

        if !session.swiping
            && dx.abs() > self.config.start_threshold_px
            && dx.abs() > dy.abs()
        {
            session.swiping = true;
        }
        if !session.swiping {
            return None;
        }

        self.offset_px = dx;
        Some(SwipeOutcome {
            direction: swipe_direction(dx < 0.0, self.reading),
            committed: false,
            preview_offset_px: dx,
        })
    }

    /// Ends the gesture and starts the settle animation.
    ///
    /// Returns `None` when the movement never became a swipe.
    pub fn on_touch_end(
        &mut self,
        viewport_width: f64,
        scheduler: &mut Scheduler,
        now_ms: u64,
    ) -> Option<SwipeOutcome> {
        let session = self.session.take()?;
        if !session.swiping {
            self.offset_px = 0.0;
            return None;
        }

        let dx = session.last.x - session.start.x;
        let direction = swipe_direction(dx < 0.0, self.reading);
        let committed = dx.abs() >= viewport_width * self.config.commit_ratio
            && session.max_vertical_drift < self.config.max_vertical_drift_px;
        let to = if committed {
            viewport_width.copysign(dx)
        } else {
            0.0
        };

        log::debug!("swipe released: dx {dx:.1}, {direction:?}, committed {committed}");

        self.settle = Some(Settle {
            from: self.offset_px,
            to,
            started_ms: now_ms,
            direction,
            committed,
        });
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
        self.timer = Some(scheduler.schedule(TimingStrategy::PerFrame, now_ms));

        Some(SwipeOutcome {
            direction,
            committed,
            preview_offset_px: self.offset_px,
        })
    }

    pub fn on_tick(&mut self, tick: &Tick, scheduler: &mut Scheduler) -> Option<SwipeEvent> {
        if self.timer != Some(tick.id) {
            return None;
        }
        let settle = self.settle?;

        let duration = self.config.animation_ms.max(1) as f64;
        let progress = (tick.now_ms.saturating_sub(settle.started_ms) as f64 / duration).min(1.0);
        // ease-out quad
        let eased = 1.0 - (1.0 - progress) * (1.0 - progress);
        self.offset_px = settle.from + (settle.to - settle.from) * eased;

        if progress < 1.0 {
            return Some(SwipeEvent::Settling {
                offset_px: self.offset_px,
            });
        }

        self.reset(scheduler);
        Some(SwipeEvent::Finished {
            direction: settle.direction,
            committed: settle.committed,
        })
    }

    /// Drops any gesture or animation in flight.
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
        self.session = None;
        self.settle = None;
        self.offset_px = 0.0;
    }
}
