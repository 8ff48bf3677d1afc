use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// Tick period used when the configured rate cannot be turned into a duration
const FALLBACK_PERIOD: Duration = Duration::from_nanos(16_666_666);

/// Handle to a periodic timer registered with a [`Scheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Periodic timer capability of the host event loop
pub trait Scheduler {
    /// Registers a timer firing every `period`
    fn set_interval(&mut self, period: Duration) -> TimerId;
    /// Cancels a timer; unknown handles are ignored
    fn clear_interval(&mut self, id: TimerId);
    /// Consumes one due firing of `id`, returning whether there was one
    fn take_fire(&mut self, id: TimerId) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Interval<T> {
    id: TimerId,
    period: Duration,
    next_due: T,
}

/// Scheduler driven by the monotonic system clock
#[derive(Debug, Default)]
pub struct WallScheduler {
    intervals: Vec<Interval<Instant>>,
    next_id: u64,
}

impl WallScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest pending deadline across all timers
    pub fn next_deadline(&self) -> Option<Instant> {
        self.intervals.iter().map(|i| i.next_due).min()
    }

    /// Time left until the next deadline, zero if one is already due
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|due| due.saturating_duration_since(now))
    }

    pub fn active_timers(&self) -> usize {
        self.intervals.len()
    }
}

impl Scheduler for WallScheduler {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval {
            id,
            period,
            next_due: Instant::now() + period,
        });
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.intervals.retain(|i| i.id != id);
    }

    fn take_fire(&mut self, id: TimerId) -> bool {
        let now = Instant::now();
        let Some(interval) = self.intervals.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        if now < interval.next_due {
            return false;
        }
        interval.next_due += interval.period;
        // Drop missed periods instead of bursting after a stall
        if interval.next_due < now {
            interval.next_due = now + interval.period;
        }
        true
    }
}

/// Scheduler over virtual time, advanced explicitly
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    intervals: Vec<Interval<Duration>>,
    next_id: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves virtual time forward
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of registered, uncancelled timers
    pub fn active_timers(&self) -> usize {
        self.intervals.len()
    }
}

impl Scheduler for ManualScheduler {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval {
            id,
            period,
            next_due: self.now + period,
        });
        id
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.intervals.retain(|i| i.id != id);
    }

    fn take_fire(&mut self, id: TimerId) -> bool {
        let now = self.now;
        match self.intervals.iter_mut().find(|i| i.id == id) {
            Some(interval) if interval.next_due <= now => {
                interval.next_due += interval.period;
                true
            }
            _ => false,
        }
    }
}

/// Converts a tick rate into a timer period, truncated to whole nanoseconds
pub fn tick_period(frame_rate_hz: f64) -> Duration {
    let nanos = (1e9 / frame_rate_hz).floor();
    if nanos.is_finite() && nanos >= 1.0 {
        Duration::from_nanos(nanos as u64)
    } else {
        FALLBACK_PERIOD
    }
}

/// Frame counter advanced by a single periodic timer. The scheduler owns
/// every timer; the clock keeps at most one of them alive.
#[derive(Debug)]
pub struct SimulationClock<S: Scheduler> {
    scheduler: S,
    period: Duration,
    timer: Option<TimerId>,
    frame_index: u64,
    frame_wrap: Option<u64>,
}

impl<S: Scheduler> SimulationClock<S> {
    pub fn new(scheduler: S, frame_rate_hz: f64) -> Self {
        SimulationClock {
            scheduler,
            period: tick_period(frame_rate_hz),
            timer: None,
            frame_index: 0,
            frame_wrap: None,
        }
    }

    /// Wraps the frame counter back to 0 once it exceeds `limit`
    pub fn with_frame_wrap(mut self, limit: Option<u64>) -> Self {
        self.frame_wrap = limit;
        self
    }

    /// Changes the tick rate; takes effect on the next `start`
    pub fn set_frame_rate(&mut self, frame_rate_hz: f64) {
        self.period = tick_period(frame_rate_hz);
    }

    /// Begins ticking from the current frame index. No-op when running.
    pub fn start(&mut self) {
        if self.timer.is_none() {
            self.timer = Some(self.scheduler.set_interval(self.period));
        }
    }

    /// Cancels the timer, keeping the frame index
    pub fn stop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.clear_interval(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn reset_frame_index(&mut self) {
        self.frame_index = 0;
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Delivers every due tick to `on_tick`. A `Break` from the callback
    /// stops the clock before any further tick is delivered.
    pub fn dispatch_due<F>(&mut self, mut on_tick: F) -> ControlFlow<()>
    where
        F: FnMut(u64) -> ControlFlow<()>,
    {
        while let Some(id) = self.timer {
            if !self.scheduler.take_fire(id) {
                break;
            }
            self.frame_index += 1;
            if self.frame_wrap.is_some_and(|limit| self.frame_index > limit) {
                self.frame_index = 0;
            }
            if on_tick(self.frame_index).is_break() {
                self.stop();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
