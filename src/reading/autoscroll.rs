//! Automatic continuous scrolling.
//!
//! States are Idle, Active and Paused. `start` enters Active, `pause` and
//! `resume` toggle between Active and Paused, and `cancel` returns to Idle
//! from anywhere. Exactly one timer is live while Active and none otherwise.

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::config::{AutoScrollConfig, ReadingDirection};
use crate::engine::timing::{Scheduler, Tick, TimerId, TimingStrategy, MAX_INTERVAL_MS};
use crate::geometry::{Axis, GeometryEvent, GeometryObserver, ScrollSurface, Size, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoScrollState {
    Idle,
    Active,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoScrollSession {
    pub started_ms: u64,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoScrollStep {
    Scrolled { dx: f64, dy: f64 },
    /// Callback mode: the callback ran.
    Invoked,
    /// The surface could not move further; the session was cancelled.
    ReachedEnd,
    /// Nothing to do on this tick (foreign timer, or less than a pixel owed).
    Idle,
}

enum Driver {
    Surface { smooth: bool },
    Callback(Box<dyn FnMut()>),
}

pub struct AutoScroller {
    config: AutoScrollConfig,
    percentage: f64,
    axis: Axis,
    reading: ReadingDirection,
    driver: Driver,
    state: AutoScrollState,
    session: Option<AutoScrollSession>,
    timer: Option<TimerId>,
    viewport: Rc<Cell<Size>>,
    /// Sub-pixel distance owed by smooth mode.
    carry: f64,
    resize_subscription: Option<Subscription>,
}

impl AutoScroller {
    /// Scrolls a surface along `axis` by `percentage` of the viewport per step.
    pub fn new(
        config: AutoScrollConfig,
        percentage: f64,
        axis: Axis,
        reading: ReadingDirection,
        viewport: Size,
    ) -> Self {
        let smooth = config.smooth;
        Self::build(config, percentage, axis, reading, viewport, Driver::Surface { smooth })
    }

    /// Invokes `callback` every step instead of scrolling. Always uses the
    /// fixed-interval strategy.
    pub fn with_callback(config: AutoScrollConfig, callback: impl FnMut() + 'static) -> Self {
        Self::build(
            config,
            100.0,
            Axis::Vertical,
            ReadingDirection::LeftToRight,
            Size::default(),
            Driver::Callback(Box::new(callback)),
        )
    }

    fn build(
        config: AutoScrollConfig,
        percentage: f64,
        axis: Axis,
        reading: ReadingDirection,
        viewport: Size,
        driver: Driver,
    ) -> Self {
        Self {
            config,
            percentage,
            axis,
            reading,
            driver,
            state: AutoScrollState::Idle,
            session: None,
            timer: None,
            viewport: Rc::new(Cell::new(viewport)),
            carry: 0.0,
            resize_subscription: None,
        }
    }

    /// Keeps the cached viewport size current without restarting the session.
    pub fn observe_resizes(&mut self, observer: &GeometryObserver) {
        let viewport = Rc::clone(&self.viewport);
        self.resize_subscription = Some(observer.subscribe(move |event| {
            if let GeometryEvent::Resize(size) = event {
                viewport.set(*size);
            }
        }));
    }

    pub fn state(&self) -> AutoScrollState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != AutoScrollState::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.state == AutoScrollState::Paused
    }

    pub fn session(&self) -> Option<AutoScrollSession> {
        self.session
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    /// Milliseconds between fixed-interval steps.
    pub fn scroll_speed_ms(&self) -> f64 {
        1000.0 / self.config.scroll_per_second
    }

    /// Step size in pixels. Never below one pixel, since smaller scroll
    /// requests do not move the surface.
    pub fn px_per_ms(&self) -> f64 {
        let dimension = self.viewport.get().along(self.axis);
        (dimension * (self.percentage / 100.0) / self.scroll_speed_ms()).max(1.0)
    }

    /// Step size with reading direction applied first, then inversion.
    pub fn signed_step(&self) -> f64 {
        let mut step = self.px_per_ms();
        if self.axis == Axis::Horizontal && self.reading.is_rtl() {
            step = -step;
        }
        if self.config.invert {
            step = -step;
        }
        step
    }

    pub fn strategy(&self) -> TimingStrategy {
        match self.driver {
            Driver::Surface { smooth: true } => TimingStrategy::PerFrame,
            Driver::Surface { smooth: false } | Driver::Callback(_) => {
                TimingStrategy::FixedInterval {
                    interval_ms: self
                        .scroll_speed_ms()
                        .round()
                        .clamp(1.0, MAX_INTERVAL_MS as f64) as u64,
                }
            }
        }
    }

    /// Idle -> Active. Restarts the session if one is already running.
    pub fn start(&mut self, scheduler: &mut Scheduler, now_ms: u64) {
        self.stop_timer(scheduler);
        self.state = AutoScrollState::Active;
        self.session = Some(AutoScrollSession { started_ms: now_ms });
        self.carry = 0.0;
        self.timer = Some(scheduler.schedule(self.strategy(), now_ms));
        log::debug!("auto-scroll started ({:?})", self.strategy());
    }

    /// Any state -> Idle.
    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        self.stop_timer(scheduler);
        if self.state != AutoScrollState::Idle {
            log::debug!("auto-scroll cancelled");
        }
        self.state = AutoScrollState::Idle;
        self.session = None;
        self.carry = 0.0;
    }

    pub fn toggle_active(&mut self, scheduler: &mut Scheduler, now_ms: u64) {
        if self.is_active() {
            self.cancel(scheduler);
        } else {
            self.start(scheduler, now_ms);
        }
    }

    /// Active -> Paused; the session survives.
    pub fn pause(&mut self, scheduler: &mut Scheduler) {
        if self.state == AutoScrollState::Active {
            self.stop_timer(scheduler);
            self.state = AutoScrollState::Paused;
            log::debug!("auto-scroll paused");
        }
    }

    /// Paused -> Active.
    pub fn resume(&mut self, scheduler: &mut Scheduler, now_ms: u64) {
        if self.state == AutoScrollState::Paused {
            self.timer = Some(scheduler.schedule(self.strategy(), now_ms));
            self.state = AutoScrollState::Active;
            log::debug!("auto-scroll resumed");
        }
    }

    /// Applies new settings. A running loop is rescheduled so the new rate
    /// takes effect; a paused session stays paused.
    pub fn update_settings(
        &mut self,
        config: AutoScrollConfig,
        percentage: f64,
        axis: Axis,
        reading: ReadingDirection,
        scheduler: &mut Scheduler,
        now_ms: u64,
    ) {
        if let Driver::Surface { smooth } = &mut self.driver {
            *smooth = config.smooth;
        }
        self.config = config;
        self.percentage = percentage;
        self.axis = axis;
        self.reading = reading;
        if self.state == AutoScrollState::Active {
            self.stop_timer(scheduler);
            self.carry = 0.0;
            self.timer = Some(scheduler.schedule(self.strategy(), now_ms));
        }
    }

    pub fn on_tick(
        &mut self,
        tick: &Tick,
        surface: &mut dyn ScrollSurface,
        scheduler: &mut Scheduler,
    ) -> AutoScrollStep {
        if self.timer != Some(tick.id) || self.state != AutoScrollState::Active {
            return AutoScrollStep::Idle;
        }

        let smooth = match &mut self.driver {
            Driver::Callback(callback) => {
                callback();
                return AutoScrollStep::Invoked;
            }
            Driver::Surface { smooth } => *smooth,
        };
        let amount = if smooth {
            self.carry += self.signed_step() * tick.elapsed_ms as f64 / self.scroll_speed_ms();
            let whole = self.carry.trunc();
            self.carry -= whole;
            whole
        } else {
            self.signed_step()
        };
        if amount == 0.0 {
            return AutoScrollStep::Idle;
        }

        let (dx, dy) = match self.axis {
            Axis::Horizontal => (amount, 0.0),
            Axis::Vertical => (0.0, amount),
        };
        let before = surface.geometry().offset;
        surface.scroll_by(dx, dy);
        if surface.geometry().offset == before {
            log::debug!("auto-scroll reached the end of the document");
            self.cancel(scheduler);
            return AutoScrollStep::ReachedEnd;
        }
        AutoScrollStep::Scrolled { dx, dy }
    }

    fn stop_timer(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
    }
}
