use pomodoro::{
    controller::Status,
    session::{Session, SessionLabel},
    util::{minutes_to_duration, seconds_to_duration},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.controller.snapshot();

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let disabled_key_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // padding
                Constraint::Length(1), // durations
                Constraint::Length(1), // controls
                Constraint::Length(1), // padding
                Constraint::Min(6),    // session
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "pomodoro",
            bold_style.fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        // duration controls are disabled while the timer runs
        let adjust_style = if self.controller.can_adjust_durations() {
            key_style
        } else {
            disabled_key_style
        };

        let duration_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "Focus Duration: {}",
                    minutes_to_duration(snapshot.focus_duration)
                ),
                bold_style,
            ),
            Span::raw("  "),
            Span::styled("[↓/↑]", adjust_style),
        ]))
        .render(duration_cols[0], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "Break Duration: {}",
                    minutes_to_duration(snapshot.break_duration)
                ),
                bold_style,
            ),
            Span::raw("  "),
            Span::styled("[←/→]", adjust_style),
        ]))
        .alignment(Alignment::Right)
        .render(duration_cols[1], buf);

        let play_label = if snapshot.is_running {
            " pause  "
        } else {
            " play  "
        };
        let stop_style = if snapshot.status == Status::Idle {
            disabled_key_style
        } else {
            key_style
        };
        Paragraph::new(Line::from(vec![
            Span::styled("[space]", key_style),
            Span::raw(play_label),
            Span::styled("[s]", stop_style),
            Span::raw(" stop"),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        match snapshot.session {
            Some(session) => render_session(
                session,
                snapshot.status,
                self.controller.durations().minutes_for(session.label),
                snapshot.progress,
                snapshot.elapsed,
                chunks[5],
                buf,
            ),
            None => {
                Paragraph::new(Span::styled(
                    "press space to start focusing",
                    dim_style.add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .render(chunks[5], buf);
            }
        }

        Paragraph::new(Span::styled("(q)uit", dim_style.patch(bold_style)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}

fn render_session(
    session: Session,
    status: Status,
    session_minutes: u32,
    progress: f64,
    elapsed: u32,
    area: Rect,
    buf: &mut Buffer,
) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let accent = match session.label {
        SessionLabel::Focusing => Color::Red,
        SessionLabel::OnBreak => Color::Green,
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // heading
            Constraint::Length(1), // remaining
            Constraint::Length(1), // paused marker
            Constraint::Length(3), // gauge
            Constraint::Length(1), // active time
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!(
            "{} for {} minutes",
            session.label,
            minutes_to_duration(session_minutes)
        ),
        bold_style.fg(accent),
    ))
    .alignment(Alignment::Center)
    .render(rows[0], buf);

    Paragraph::new(format!(
        "{} remaining",
        seconds_to_duration(session.time_remaining)
    ))
    .alignment(Alignment::Center)
    .render(rows[1], buf);

    if status == Status::Paused {
        Paragraph::new(Span::styled(
            "PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(rows[2], buf);
    }

    let ratio = (progress / 100.0).clamp(0.0, 1.0);
    Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(accent))
        .ratio(ratio)
        .label(format!("{:.0}%", progress))
        .render(rows[3], buf);

    Paragraph::new(Span::styled(
        format!("active time {}", seconds_to_duration(elapsed)),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(rows[4], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ui, App};
    use pomodoro::config::Settings;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &mut App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn silent_app() -> App {
        App::new(Settings {
            alert: pomodoro::alert::AlertKind::None,
            ..Settings::default()
        })
    }

    #[test]
    fn idle_screen_shows_durations_and_hint() {
        let mut app = silent_app();
        let content = rendered(&mut app);
        assert!(content.contains("Focus Duration: 25:00"));
        assert!(content.contains("Break Duration: 05:00"));
        assert!(content.contains("press space to start focusing"));
        assert!(!content.contains("remaining"));
    }

    #[test]
    fn running_screen_shows_session() {
        let mut app = silent_app();
        app.controller.toggle_play_pause();
        app.controller.on_second();
        let content = rendered(&mut app);
        assert!(content.contains("Focusing for 25:00 minutes"));
        assert!(content.contains("24:59 remaining"));
        assert!(content.contains("active time 00:01"));
        assert!(!content.contains("PAUSED"));
    }

    #[test]
    fn paused_screen_shows_marker() {
        let mut app = silent_app();
        app.controller.toggle_play_pause();
        app.controller.toggle_play_pause();
        let content = rendered(&mut app);
        assert!(content.contains("PAUSED"));
        assert!(content.contains("25:00 remaining"));
    }

    #[test]
    fn break_heading_uses_break_minutes() {
        let mut app = silent_app();
        app.controller.adjust_focus_duration(-5);
        app.controller.adjust_focus_duration(-5);
        app.controller.adjust_focus_duration(-5);
        app.controller.adjust_focus_duration(-5);
        app.controller.toggle_play_pause();
        for _ in 0..301 {
            app.controller.on_second();
        }
        let content = rendered(&mut app);
        assert!(content.contains("On Break for 05:00 minutes"));
        assert!(content.contains("04:59 remaining"));
    }

    #[test]
    fn renders_in_tiny_terminal_without_panicking() {
        let mut app = silent_app();
        app.controller.toggle_play_pause();
        let backend = TestBackend::new(20, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&mut app, f)).unwrap();
    }
}
