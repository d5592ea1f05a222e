use serde::{Deserialize, Serialize};

/// Which kind of interval is currently counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum SessionLabel {
    Focusing,
    #[serde(rename = "On Break")]
    #[strum(serialize = "On Break")]
    OnBreak,
}

/// One active focus or break interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub label: SessionLabel,
    pub time_remaining: u32,
}

impl Session {
    pub fn focusing(focus_minutes: u32) -> Self {
        Self {
            label: SessionLabel::Focusing,
            time_remaining: focus_minutes * 60,
        }
    }

    pub fn on_break(break_minutes: u32) -> Self {
        Self {
            label: SessionLabel::OnBreak,
            time_remaining: break_minutes * 60,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.time_remaining == 0
    }
}

// The transition functions below only see what they are handed, never the
// controller, so they can be exercised in isolation.

/// Count one second off the session, never going below zero
pub fn next_tick(session: Session) -> Session {
    Session {
        time_remaining: session.time_remaining.saturating_sub(1),
        ..session
    }
}

/// Roll a finished session over to the other kind, using the configured minutes
pub fn next_session(session: Session, focus_minutes: u32, break_minutes: u32) -> Session {
    match session.label {
        SessionLabel::Focusing => Session::on_break(break_minutes),
        SessionLabel::OnBreak => Session::focusing(focus_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_tick_decrements_by_one() {
        let s = Session::focusing(25);
        let next = next_tick(s);
        assert_eq!(next.time_remaining, 25 * 60 - 1);
        assert_eq!(next.label, SessionLabel::Focusing);
    }

    #[test]
    fn next_tick_floors_at_zero() {
        let s = Session {
            label: SessionLabel::OnBreak,
            time_remaining: 0,
        };
        assert_eq!(next_tick(s).time_remaining, 0);
    }

    #[test]
    fn next_session_alternates_labels() {
        let focus = Session::focusing(25);
        let brk = next_session(focus, 25, 5);
        assert_eq!(brk, Session::on_break(5));

        let back = next_session(brk, 30, 5);
        assert_eq!(back, Session::focusing(30));
    }

    #[test]
    fn next_session_ignores_remaining_time() {
        let s = Session {
            label: SessionLabel::Focusing,
            time_remaining: 42,
        };
        assert_eq!(next_session(s, 25, 7).time_remaining, 7 * 60);
    }

    #[test]
    fn label_display() {
        assert_eq!(SessionLabel::Focusing.to_string(), "Focusing");
        assert_eq!(SessionLabel::OnBreak.to_string(), "On Break");
    }

    #[test]
    fn label_serializes_with_display_name() {
        let json = serde_json::to_string(&Session::on_break(1)).unwrap();
        assert_eq!(json, r#"{"label":"On Break","time_remaining":60}"#);
    }

    #[test]
    fn finished_only_at_zero() {
        assert!(!Session::focusing(5).is_finished());
        assert!(Session {
            label: SessionLabel::Focusing,
            time_remaining: 0
        }
        .is_finished());
    }
}
