use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// How long the runner waits for input when no second is scheduled
pub const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Event source that never produces input; used when running without a terminal
#[derive(Debug, Default)]
pub struct IdleEventSource;

impl EventSource for IdleEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        std::thread::sleep(timeout);
        Err(RecvTimeoutError::Timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// A single periodic schedule.
///
/// `None` disables it. There is at most one pending deadline; changing the
/// period replaces it instead of adding a second one. Deadlines advance from
/// the previous deadline rather than from when `poll` happened to run.
#[derive(Debug, Clone, Default)]
pub struct Interval {
    period: Option<Duration>,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Option<Duration>, now: Instant) -> Self {
        let mut interval = Self::default();
        interval.set_period(period, now);
        interval
    }

    pub fn is_enabled(&self) -> bool {
        self.next_due.is_some()
    }

    /// Change the period. Same value keeps the pending deadline untouched.
    pub fn set_period(&mut self, period: Option<Duration>, now: Instant) {
        if period == self.period {
            return;
        }
        self.period = period.filter(|p| !p.is_zero());
        self.next_due = self.period.and_then(|p| now.checked_add(p));
    }

    /// True when a deadline has passed; fires at most once per call.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(period), Some(due)) = (self.period, self.next_due) else {
            return false;
        };
        if now < due {
            return false;
        }
        self.next_due = match due.checked_add(period) {
            Some(next) if next > now => Some(next),
            // fell behind by more than a period: skip ahead to the next
            // deadline on the original grid instead of bursting
            _ => {
                let into_period = now.duration_since(due).as_nanos() % period.as_nanos();
                let into_period = u64::try_from(into_period)
                    .map(Duration::from_nanos)
                    .unwrap_or(Duration::ZERO);
                now.checked_add(period - into_period)
            }
        };
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    interval: Interval,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            interval: Interval::default(),
        }
    }

    /// Turn the one-second schedule on or off. Toggling to the current state is a no-op.
    pub fn set_ticking(&mut self, enabled: bool) {
        let period = enabled.then(|| self.ticker.interval());
        self.interval.set_period(period, Instant::now());
    }

    pub fn is_ticking(&self) -> bool {
        self.interval.is_enabled()
    }

    /// Blocks until the next event or due tick. Returns None if neither arrived.
    pub fn step(&mut self) -> Option<AppEvent> {
        let now = Instant::now();
        if self.interval.poll(now) {
            return Some(AppEvent::Tick);
        }
        let timeout = self.interval.time_until_due(now).unwrap_or(IDLE_WAIT);
        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => self.poll_tick(),
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(timeout);
                self.poll_tick()
            }
        }
    }

    fn poll_tick(&mut self) -> Option<AppEvent> {
        self.interval
            .poll(Instant::now())
            .then_some(AppEvent::Tick)
    }
}
