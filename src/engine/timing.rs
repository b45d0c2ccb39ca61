// Timing engine - cooperative timers and animation frames
//
// Stands in for the UI event loop: components schedule a timer, keep its
// TimerId, and receive Ticks when the host polls. Nothing here blocks.

/// Default animation-frame period, roughly 60 Hz.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Longest fixed interval a loop may ask for (ten minutes).
pub const MAX_INTERVAL_MS: u64 = 600_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// How a scheduled loop is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingStrategy {
    /// Fires every `interval_ms`.
    FixedInterval { interval_ms: u64 },
    /// Fires once per animation frame; receivers scale work by `elapsed_ms`.
    PerFrame,
}

/// One firing of a live timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub id: TimerId,
    /// Milliseconds since this timer last fired (or was scheduled).
    pub elapsed_ms: u64,
    pub now_ms: u64,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    strategy: TimingStrategy,
    last_fired_ms: u64,
}

impl TimerEntry {
    fn period(&self, frame_interval_ms: u64) -> u64 {
        match self.strategy {
            TimingStrategy::FixedInterval { interval_ms } => interval_ms.max(1),
            TimingStrategy::PerFrame => frame_interval_ms.max(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    next_id: u64,
    timers: Vec<TimerEntry>,
    frame_interval_ms: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_frame_interval(FRAME_INTERVAL_MS)
    }

    pub fn with_frame_interval(frame_interval_ms: u64) -> Self {
        Self {
            next_id: 0,
            timers: Vec::new(),
            frame_interval_ms,
        }
    }

    pub fn schedule(&mut self, strategy: TimingStrategy, now_ms: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(TimerEntry {
            id,
            strategy,
            last_fired_ms: now_ms,
        });
        log::trace!("scheduled {:?} as {:?}", strategy, id);
        id
    }

    /// Returns false if the timer was not live.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|entry| entry.id != id);
        let removed = self.timers.len() != before;
        if removed {
            log::trace!("cancelled {:?}", id);
        }
        removed
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.timers.iter().any(|entry| entry.id == id)
    }

    pub fn live_count(&self) -> usize {
        self.timers.len()
    }

    /// Collects every timer whose period has elapsed by `now_ms`.
    ///
    /// Each timer fires at most once per poll; a host that polls late gets a
    /// single tick with a larger `elapsed_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Vec<Tick> {
        let frame_interval_ms = self.frame_interval_ms;
        let mut ticks = Vec::new();
        for entry in self.timers.iter_mut() {
            let elapsed_ms = now_ms.saturating_sub(entry.last_fired_ms);
            if elapsed_ms >= entry.period(frame_interval_ms) {
                entry.last_fired_ms = now_ms;
                ticks.push(Tick {
                    id: entry.id,
                    elapsed_ms,
                    now_ms,
                });
            }
        }
        ticks
    }

    /// Earliest time at which some live timer becomes due.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers
            .iter()
            .map(|entry| {
                entry
                    .last_fired_ms
                    .saturating_add(entry.period(self.frame_interval_ms))
            })
            .min()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
