use crate::error::{PomodoroError, Result};
use crate::session::SessionLabel;

pub const FOCUS_MIN: u32 = 5;
pub const FOCUS_MAX: u32 = 60;
pub const FOCUS_STEP: u32 = 5;
pub const BREAK_MIN: u32 = 1;
pub const BREAK_MAX: u32 = 15;
pub const BREAK_STEP: u32 = 1;

pub const DEFAULT_FOCUS: u32 = 25;
pub const DEFAULT_BREAK: u32 = 5;

/// Configured focus and break lengths, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    focus: u32,
    break_: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus: DEFAULT_FOCUS,
            break_: DEFAULT_BREAK,
        }
    }
}

impl Durations {
    pub fn new(focus: u32, break_: u32) -> Result<Self> {
        validate_focus(focus)?;
        validate_break(break_)?;
        Ok(Self { focus, break_ })
    }

    pub fn focus(&self) -> u32 {
        self.focus
    }

    pub fn break_(&self) -> u32 {
        self.break_
    }

    /// Apply `delta` to the focus minutes. Returns false and leaves the value
    /// alone when the result would leave the allowed range or the step grid.
    pub fn adjust_focus(&mut self, delta: i32) -> bool {
        match shifted(self.focus, delta, FOCUS_STEP, FOCUS_MIN, FOCUS_MAX) {
            Some(value) => {
                self.focus = value;
                true
            }
            None => false,
        }
    }

    pub fn adjust_break(&mut self, delta: i32) -> bool {
        match shifted(self.break_, delta, BREAK_STEP, BREAK_MIN, BREAK_MAX) {
            Some(value) => {
                self.break_ = value;
                true
            }
            None => false,
        }
    }

    pub fn minutes_for(&self, label: SessionLabel) -> u32 {
        match label {
            SessionLabel::Focusing => self.focus,
            SessionLabel::OnBreak => self.break_,
        }
    }

    pub fn seconds_for(&self, label: SessionLabel) -> u32 {
        self.minutes_for(label) * 60
    }
}

fn shifted(current: u32, delta: i32, step: u32, min: u32, max: u32) -> Option<u32> {
    if delta == 0 || delta.unsigned_abs() % step != 0 {
        return None;
    }
    let next = i64::from(current) + i64::from(delta);
    if next < i64::from(min) || next > i64::from(max) {
        return None;
    }
    u32::try_from(next).ok()
}

pub fn validate_focus(value: u32) -> Result<u32> {
    if (FOCUS_MIN..=FOCUS_MAX).contains(&value) && value % FOCUS_STEP == 0 {
        Ok(value)
    } else {
        Err(PomodoroError::InvalidFocusDuration {
            value,
            min: FOCUS_MIN,
            max: FOCUS_MAX,
            step: FOCUS_STEP,
        })
    }
}

pub fn validate_break(value: u32) -> Result<u32> {
    if (BREAK_MIN..=BREAK_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(PomodoroError::InvalidBreakDuration {
            value,
            min: BREAK_MIN,
            max: BREAK_MAX,
        })
    }
}
