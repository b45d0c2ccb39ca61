//! Momentum scrolling after a drag is released.
//!
//! The engine keeps the three most recent pointer samples, derives a release
//! velocity from the oldest and latest of them, and then runs a fixed-period
//! correction loop that moves the scroll surface along a deceleration curve
//! until the curve comes to rest or the surface hits a boundary.

use crate::engine::config::InertiaConfig;
use crate::engine::curve::{CubicEaseOut, DecelerationCurve};
use crate::engine::timing::{Scheduler, Tick, TimerId, TimingStrategy};
use crate::geometry::{ScrollOffset, ScrollSurface, Size};

pub const SAMPLE_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub x: f64,
    pub y: f64,
    pub time_ms: u64,
}

impl DragSample {
    pub fn new(x: f64, y: f64, time_ms: u64) -> Self {
        Self { x, y, time_ms }
    }
}

/// Rolling window of the last three pointer samples, oldest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSamples {
    samples: [DragSample; SAMPLE_WINDOW],
}

impl DragSamples {
    /// A fresh window with every slot holding the pointer-down sample.
    pub fn start(sample: DragSample) -> Self {
        Self {
            samples: [sample; SAMPLE_WINDOW],
        }
    }

    /// Evicts the oldest sample and appends `sample` as the latest.
    pub fn push(&mut self, sample: DragSample) {
        self.samples[0] = self.samples[1];
        self.samples[1] = self.samples[2];
        self.samples[2] = sample;
    }

    pub fn oldest(&self) -> DragSample {
        self.samples[0]
    }

    pub fn latest(&self) -> DragSample {
        self.samples[2]
    }
}

/// Which axes the drag may scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisConfig {
    pub horizontal: bool,
    pub vertical: bool,
}

impl AxisConfig {
    pub const VERTICAL: AxisConfig = AxisConfig {
        horizontal: false,
        vertical: true,
    };
    pub const HORIZONTAL: AxisConfig = AxisConfig {
        horizontal: true,
        vertical: false,
    };
    pub const BOTH: AxisConfig = AxisConfig {
        horizontal: true,
        vertical: true,
    };
}

/// Pointer velocity at release in viewport fractions per second.
///
/// Identical timestamps (a release with no movement history) yield zero
/// rather than NaN or infinity.
pub fn release_velocity(samples: &DragSamples, viewport: Size) -> (f64, f64) {
    let oldest = samples.oldest();
    let latest = samples.latest();
    let dt = latest.time_ms.saturating_sub(oldest.time_ms) as f64;
    if dt <= 0.0 {
        return (0.0, 0.0);
    }

    let per_viewport = |delta: f64, extent: f64| {
        let v = delta / dt * 1000.0 / extent;
        if v.is_finite() {
            v
        } else {
            0.0
        }
    };
    (
        per_viewport(latest.x - oldest.x, viewport.width),
        per_viewport(latest.y - oldest.y, viewport.height),
    )
}

/// Why a flight ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEnd {
    /// The curve came to rest.
    Settled,
    /// Every moving axis is pinned against a scroll boundary.
    Boundary,
    /// Velocity was zero, NaN or infinite.
    Degenerate,
    /// A new gesture preempted the flight.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InertiaStep {
    Moved(ScrollOffset),
    Finished(FlightEnd),
    /// The tick belonged to some other timer.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    started_ms: u64,
    origin: ScrollOffset,
    /// Unit scroll direction, in the surface's own coordinates.
    direction: (f64, f64),
    speed: f64,
    scale: Size,
}

pub struct InertialScroller<C: DecelerationCurve = CubicEaseOut> {
    config: InertiaConfig,
    curve: C,
    flight: Option<Flight>,
    timer: Option<TimerId>,
}

impl InertialScroller<CubicEaseOut> {
    pub fn new(config: InertiaConfig) -> Self {
        Self::with_curve(config, CubicEaseOut::default())
    }
}

impl<C: DecelerationCurve> InertialScroller<C> {
    pub fn with_curve(config: InertiaConfig, curve: C) -> Self {
        Self {
            config,
            curve,
            flight: None,
            timer: None,
        }
    }

    pub fn set_config(&mut self, config: InertiaConfig) {
        self.config = config;
    }

    pub fn is_flying(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Starts a flight from the release samples, replacing any flight in
    /// progress.
    pub fn on_drag_end(
        &mut self,
        samples: &DragSamples,
        surface: &dyn ScrollSurface,
        axes: AxisConfig,
        scheduler: &mut Scheduler,
        now_ms: u64,
    ) {
        self.cancel(scheduler);
        if !self.config.enabled {
            return;
        }

        let geometry = surface.geometry();
        let (mut vx, mut vy) = release_velocity(samples, geometry.client);
        if !axes.horizontal {
            vx = 0.0;
        }
        if !axes.vertical {
            vy = 0.0;
        }

        let speed = match (axes.horizontal, axes.vertical) {
            (true, true) => vx.hypot(vy),
            (true, false) => vx.abs(),
            (false, true) => vy.abs(),
            (false, false) => 0.0,
        };
        // Dragging content moves the scroll offset against the pointer.
        let direction = if speed > 0.0 {
            (-vx / speed, -vy / speed)
        } else {
            (0.0, 0.0)
        };
        let coerced =
            (speed * self.config.damping).clamp(-self.config.max_speed, self.config.max_speed);

        log::debug!(
            "inertia: release velocity ({vx:.3}, {vy:.3}) vp/s, coerced speed {coerced:.3}"
        );

        self.flight = Some(Flight {
            started_ms: now_ms,
            origin: geometry.offset,
            direction,
            speed: if coerced.is_finite() { coerced } else { 0.0 },
            scale: geometry.client,
        });
        self.timer = Some(scheduler.schedule(
            TimingStrategy::FixedInterval {
                interval_ms: self.config.tick_ms,
            },
            now_ms,
        ));
    }

    pub fn on_tick(
        &mut self,
        tick: &Tick,
        surface: &mut dyn ScrollSurface,
        scheduler: &mut Scheduler,
    ) -> InertiaStep {
        if self.timer != Some(tick.id) {
            return InertiaStep::Ignored;
        }
        let Some(flight) = self.flight else {
            return self.finish(FlightEnd::Degenerate, scheduler);
        };

        let t = tick.now_ms.saturating_sub(flight.started_ms) as f64 / 1000.0;
        let sample = self.curve.sample(t, flight.speed);
        if sample.velocity.is_nan() || !sample.displacement.is_finite() {
            return self.finish(FlightEnd::Degenerate, scheduler);
        }
        if sample.velocity <= 0.0 {
            let end = if flight.speed > 0.0 {
                FlightEnd::Settled
            } else {
                FlightEnd::Degenerate
            };
            return self.finish(end, scheduler);
        }

        let target = ScrollOffset::new(
            flight.origin.left + flight.direction.0 * sample.displacement * flight.scale.width,
            flight.origin.top + flight.direction.1 * sample.displacement * flight.scale.height,
        );
        surface.scroll_to(target);
        let actual = surface.geometry().offset;

        let pinned = |wanted: f64, got: f64, moving: f64| {
            moving == 0.0 || (wanted.round() - got).abs() >= 1.0
        };
        if pinned(target.left, actual.left, flight.direction.0)
            && pinned(target.top, actual.top, flight.direction.1)
        {
            return self.finish(FlightEnd::Boundary, scheduler);
        }

        InertiaStep::Moved(actual)
    }

    /// Stops any flight in progress. Safe to call when idle.
    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if self.timer.is_some() {
            self.finish(FlightEnd::Cancelled, scheduler);
        }
    }

    fn finish(&mut self, end: FlightEnd, scheduler: &mut Scheduler) -> InertiaStep {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
        self.flight = None;
        log::debug!("inertia: flight ended ({end:?})");
        InertiaStep::Finished(end)
    }
}
