//! The session controller: owner of every piece of mutable timer state.
//!
//! Presentation code reads [`Snapshot`]s and calls the command methods; it
//! never touches the fields directly. Each command that changes observable
//! state publishes the new snapshot to every live subscriber.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::alert::Alert;
use crate::durations::Durations;
use crate::session::{next_session, next_tick, Session};

/// Coarse controller state derived from the running flag and session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Status {
    Idle,
    Running,
    Paused,
}

/// Read-only copy of the controller state handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: Status,
    pub is_running: bool,
    pub session: Option<Session>,
    pub focus_duration: u32,
    pub break_duration: u32,
    pub elapsed: u32,
    pub progress: f64,
}

pub struct Controller {
    is_running: bool,
    session: Option<Session>,
    durations: Durations,
    elapsed: u32,
    progress: f64,
    alert: Box<dyn Alert>,
    subscribers: Vec<Sender<Snapshot>>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("is_running", &self.is_running)
            .field("session", &self.session)
            .field("durations", &self.durations)
            .field("elapsed", &self.elapsed)
            .field("progress", &self.progress)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Controller {
    pub fn new(durations: Durations, alert: Box<dyn Alert>) -> Self {
        Self {
            is_running: false,
            session: None,
            durations,
            elapsed: 0,
            progress: 0.0,
            alert,
            subscribers: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn session(&self) -> Option<Session> {
        self.session
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn status(&self) -> Status {
        match (self.is_running, self.session.is_some()) {
            (true, _) => Status::Running,
            (false, true) => Status::Paused,
            (false, false) => Status::Idle,
        }
    }

    /// Duration controls are only live while the timer is not running
    pub fn can_adjust_durations(&self) -> bool {
        !self.is_running
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status(),
            is_running: self.is_running,
            session: self.session,
            focus_duration: self.durations.focus(),
            break_duration: self.durations.break_(),
            elapsed: self.elapsed,
            progress: self.progress,
        }
    }

    /// Receive a snapshot after every state change. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<Snapshot> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn adjust_focus_duration(&mut self, delta: i32) {
        if self.is_running {
            debug!(delta, "focus adjustment ignored while running");
            return;
        }
        self.with_notify(|c| {
            if !c.durations.adjust_focus(delta) {
                return;
            }
            debug!(focus_minutes = c.durations.focus(), "focus duration changed");
            if let Some(session) = c.session.as_mut() {
                session.time_remaining = c.durations.focus() * 60;
            }
            c.refresh_progress();
        });
    }

    pub fn adjust_break_duration(&mut self, delta: i32) {
        if self.is_running {
            debug!(delta, "break adjustment ignored while running");
            return;
        }
        self.with_notify(|c| {
            if !c.durations.adjust_break(delta) {
                return;
            }
            debug!(break_minutes = c.durations.break_(), "break duration changed");
            c.refresh_progress();
        });
    }

    pub fn toggle_play_pause(&mut self) {
        self.with_notify(|c| {
            c.is_running = !c.is_running;
            if !c.is_running {
                info!("timer paused");
                return;
            }
            match c.session {
                Some(session) => info!(label = %session.label, "timer resumed"),
                None => {
                    let session = Session::focusing(c.durations.focus());
                    info!(time_remaining = session.time_remaining, "focus session started");
                    c.session = Some(session);
                    c.progress = 0.0;
                }
            }
        });
    }

    pub fn stop(&mut self) {
        self.with_notify(|c| {
            if c.session.is_some() {
                info!(elapsed = c.elapsed, "timer stopped");
            }
            c.session = None;
            c.is_running = false;
            c.elapsed = 0;
            c.progress = 0.0;
        });
    }

    /// Advance the current session by one second
    pub fn tick(&mut self) {
        self.with_notify(Self::advance);
    }

    /// The single per-second event: accumulate active time, then tick.
    ///
    /// Both effects read the same pre-tick session so they cannot disagree
    /// about whether the second counted.
    pub fn on_second(&mut self) {
        if !self.is_running {
            trace!("second ignored while not running");
            return;
        }
        self.with_notify(|c| {
            if c.session.is_some_and(|s| !s.is_finished()) {
                c.elapsed += 1;
            }
            c.advance();
        });
    }

    fn advance(&mut self) {
        if !self.is_running {
            return;
        }
        let Some(mut session) = self.session else {
            return;
        };

        if session.is_finished() {
            if let Err(err) = self.alert.fire() {
                warn!(error = %err, "completion alert failed");
            }
            session = next_session(session, self.durations.focus(), self.durations.break_());
            info!(
                label = %session.label,
                time_remaining = session.time_remaining,
                "session complete, switching"
            );
        }

        // progress is measured before this second is taken off, so a fresh
        // segment always starts at zero
        self.progress = progress_of(&session, &self.durations);
        self.session = Some(next_tick(session));
    }

    fn refresh_progress(&mut self) {
        if let Some(session) = self.session {
            self.progress = progress_of(&session, &self.durations);
        }
    }

    fn with_notify<F: FnOnce(&mut Self)>(&mut self, f: F) {
        let before = self.snapshot();
        f(self);
        let after = self.snapshot();
        if after != before {
            self.publish(after);
        }
    }

    fn publish(&mut self, snapshot: Snapshot) {
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

/// Percent of the session's configured length already consumed, in [0, 100]
pub fn progress_of(session: &Session, durations: &Durations) -> f64 {
    let total = durations.seconds_for(session.label);
    if total == 0 {
        return 0.0;
    }
    let consumed = total.saturating_sub(session.time_remaining);
    100.0 * f64::from(consumed) / f64::from(total)
}
