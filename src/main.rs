mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pomodoro::{
    alert::AlertKind,
    app_dirs::AppDirs,
    config::{Settings, DEFAULT_TICK_MS},
    controller::{Controller, Snapshot},
    durations::{
        validate_break, validate_focus, Durations, BREAK_STEP, DEFAULT_BREAK, DEFAULT_FOCUS,
        FOCUS_STEP,
    },
    error::PomodoroError,
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, IdleEventSource, Runner},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    sync::mpsc::Receiver,
    time::Duration,
};
use tracing::info;

/// focus and break timer built around the pomodoro technique
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal pomodoro timer: alternate focus and break sessions with adjustable lengths, pause and resume, and a progress gauge."
)]
pub struct Cli {
    /// focus session length in minutes (5-60, in steps of 5)
    #[clap(short = 'f', long = "focus", default_value_t = DEFAULT_FOCUS, value_parser = parse_focus)]
    focus_minutes: u32,

    /// break session length in minutes (1-15)
    #[clap(short = 'b', long = "break", default_value_t = DEFAULT_BREAK, value_parser = parse_break)]
    break_minutes: u32,

    /// how to announce the end of a session
    #[clap(short = 'a', long, value_enum, default_value_t = AlertKind::Bell)]
    alert: AlertKind,

    /// length of one timer second in milliseconds
    #[clap(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// run without the terminal ui and print a json snapshot on every change
    #[clap(long)]
    headless: bool,

    /// stop after this many timer seconds (headless only)
    #[clap(long, requires = "headless")]
    ticks: Option<u64>,

    /// log file location (defaults to the platform state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_focus(s: &str) -> Result<u32, String> {
    let value: u32 = s.parse().map_err(|e| format!("{e}"))?;
    validate_focus(value).map_err(|e| e.to_string())
}

fn parse_break(s: &str) -> Result<u32, String> {
    let value: u32 = s.parse().map_err(|e| format!("{e}"))?;
    validate_break(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Convert CLI arguments to runtime settings
    fn to_settings(&self) -> Result<Settings, PomodoroError> {
        Ok(Settings {
            durations: Durations::new(self.focus_minutes, self.break_minutes)?,
            alert: self.alert,
            tick_interval: Duration::from_millis(self.tick_ms),
            headless: self.headless,
            max_ticks: self.ticks,
            log_file: self.log_file.clone().unwrap_or_else(AppDirs::log_path),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub settings: Settings,
    pub controller: Controller,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            controller: Controller::new(settings.durations, settings.alert.build()),
            settings,
        }
    }

    /// Map a key press onto a controller command
    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }
        // ctrl+c to quit
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        let can_adjust = self.controller.can_adjust_durations();
        let step_focus = FOCUS_STEP as i32;
        let step_break = BREAK_STEP as i32;

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char(' ') | KeyCode::Char('p') => self.controller.toggle_play_pause(),
            KeyCode::Char('s') => self.controller.stop(),
            // duration keys are inert while running, matching the dimmed hints
            KeyCode::Up | KeyCode::Char('+') if can_adjust => {
                self.controller.adjust_focus_duration(step_focus)
            }
            KeyCode::Down | KeyCode::Char('-') if can_adjust => {
                self.controller.adjust_focus_duration(-step_focus)
            }
            KeyCode::Right if can_adjust => self.controller.adjust_break_duration(step_break),
            KeyCode::Left if can_adjust => self.controller.adjust_break_duration(-step_break),
            _ => {}
        }
        KeyOutcome::Continue
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let settings = cli.to_settings()?;

    if settings.headless {
        logging::init_stderr_logging()?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        return run_headless(&settings, &mut out);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty (or pass --headless)")
            .exit();
    }

    let _log_guard = logging::init_file_logging(&settings.log_file)?;
    info!(
        focus_minutes = settings.durations.focus(),
        break_minutes = settings.durations.break_(),
        alert = %settings.alert,
        "starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let updates = app.controller.subscribe();
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(app.settings.tick_interval),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        // seconds are only scheduled while running, so pause and stop take
        // effect before the next wait
        runner.set_ticking(app.controller.is_running());

        let Some(event) = runner.step() else {
            continue;
        };

        match event {
            AppEvent::Tick => app.controller.on_second(),
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if app.on_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
        }

        if drain_updates(&updates) {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    info!("quit");
    Ok(())
}

/// True if any snapshot arrived since the last call
fn drain_updates(updates: &Receiver<Snapshot>) -> bool {
    updates.try_iter().count() > 0
}

/// Run the timer without a terminal, writing one json snapshot per line
fn run_headless<W: Write>(settings: &Settings, out: &mut W) -> Result<(), Box<dyn Error>> {
    let mut controller = Controller::new(settings.durations, settings.alert.build());
    let updates = controller.subscribe();
    let mut runner = Runner::new(IdleEventSource, FixedTicker::new(settings.tick_interval));

    controller.toggle_play_pause();
    emit_snapshots(&updates, out)?;

    let mut ticks = 0u64;
    while settings.max_ticks.map_or(true, |max| ticks < max) {
        runner.set_ticking(controller.is_running());
        if let Some(AppEvent::Tick) = runner.step() {
            controller.on_second();
            ticks += 1;
            emit_snapshots(&updates, out)?;
        }
    }

    info!(ticks, "headless run finished");
    Ok(())
}

fn emit_snapshots<W: Write>(updates: &Receiver<Snapshot>, out: &mut W) -> Result<(), PomodoroError> {
    for snapshot in updates.try_iter() {
        serde_json::to_writer(&mut *out, &snapshot)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pomodoro::{controller::Status, session::SessionLabel};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn silent_settings() -> Settings {
        Settings {
            alert: AlertKind::None,
            ..Settings::default()
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["pomodoro"]);

        assert_eq!(cli.focus_minutes, 25);
        assert_eq!(cli.break_minutes, 5);
        assert_eq!(cli.alert, AlertKind::Bell);
        assert_eq!(cli.tick_ms, 1000);
        assert!(!cli.headless);
        assert_eq!(cli.ticks, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_durations() {
        let cli = Cli::parse_from(["pomodoro", "-f", "50", "-b", "10"]);
        assert_eq!(cli.focus_minutes, 50);
        assert_eq!(cli.break_minutes, 10);

        let cli = Cli::parse_from(["pomodoro", "--focus", "5", "--break", "1"]);
        assert_eq!(cli.focus_minutes, 5);
        assert_eq!(cli.break_minutes, 1);
    }

    #[test]
    fn test_cli_rejects_out_of_range_durations() {
        for args in [
            vec!["pomodoro", "--focus", "7"],
            vec!["pomodoro", "--focus", "65"],
            vec!["pomodoro", "--focus", "0"],
            vec!["pomodoro", "--break", "0"],
            vec!["pomodoro", "--break", "16"],
            vec!["pomodoro", "--break", "abc"],
        ] {
            let err = Cli::try_parse_from(args.iter().copied()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{args:?}");
        }
    }

    #[test]
    fn test_cli_alert_kind() {
        let cli = Cli::parse_from(["pomodoro", "--alert", "none"]);
        assert_eq!(cli.alert, AlertKind::None);
        let cli = Cli::parse_from(["pomodoro", "-a", "sound"]);
        assert_eq!(cli.alert, AlertKind::Sound);
    }

    #[test]
    fn test_cli_ticks_requires_headless() {
        assert!(Cli::try_parse_from(["pomodoro", "--ticks", "3"]).is_err());
        let cli = Cli::parse_from(["pomodoro", "--headless", "--ticks", "3"]);
        assert_eq!(cli.ticks, Some(3));
    }

    #[test]
    fn test_cli_rejects_zero_tick_ms() {
        assert!(Cli::try_parse_from(["pomodoro", "--tick-ms", "0"]).is_err());
    }

    #[test]
    fn test_cli_to_settings() {
        let cli = Cli::parse_from([
            "pomodoro",
            "-f",
            "30",
            "-b",
            "7",
            "--tick-ms",
            "10",
            "--log-file",
            "/tmp/pomodoro-test.log",
        ]);
        let settings = cli.to_settings().unwrap();
        assert_eq!(settings.durations, Durations::new(30, 7).unwrap());
        assert_eq!(settings.tick_interval, Duration::from_millis(10));
        assert_eq!(settings.log_file, PathBuf::from("/tmp/pomodoro-test.log"));
    }

    #[test]
    fn test_space_toggles_and_s_stops() {
        let mut app = App::new(silent_settings());

        assert_eq!(app.on_key(key(KeyCode::Char(' '))), KeyOutcome::Continue);
        assert_eq!(app.controller.status(), Status::Running);

        app.on_key(key(KeyCode::Char('p')));
        assert_eq!(app.controller.status(), Status::Paused);

        app.on_key(key(KeyCode::Char('s')));
        assert_eq!(app.controller.status(), Status::Idle);
    }

    #[test]
    fn test_arrow_keys_adjust_durations_when_stopped() {
        let mut app = App::new(silent_settings());
        app.on_key(key(KeyCode::Up));
        app.on_key(key(KeyCode::Right));
        assert_eq!(app.controller.durations().focus(), 30);
        assert_eq!(app.controller.durations().break_(), 6);

        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.controller.durations().focus(), 20);
        assert_eq!(app.controller.durations().break_(), 5);
    }

    #[test]
    fn test_duration_keys_inert_while_running() {
        let mut app = App::new(silent_settings());
        app.on_key(key(KeyCode::Char(' ')));
        app.on_key(key(KeyCode::Up));
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.controller.durations(), Durations::default());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(silent_settings());
        assert_eq!(app.on_key(key(KeyCode::Char('q'))), KeyOutcome::Quit);
        assert_eq!(app.on_key(key(KeyCode::Esc)), KeyOutcome::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyOutcome::Quit
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = App::new(silent_settings());
        let mut release = key(KeyCode::Char(' '));
        release.kind = KeyEventKind::Release;
        app.on_key(release);
        assert_eq!(app.controller.status(), Status::Idle);
    }

    #[test]
    fn test_drain_updates() {
        let mut app = App::new(silent_settings());
        let updates = app.controller.subscribe();
        assert!(!drain_updates(&updates));
        app.controller.toggle_play_pause();
        app.controller.on_second();
        assert!(drain_updates(&updates));
        assert!(!drain_updates(&updates));
    }

    #[test]
    fn test_run_headless_emits_json_lines() {
        let settings = Settings {
            tick_interval: Duration::from_millis(1),
            max_ticks: Some(3),
            headless: true,
            ..silent_settings()
        };
        let mut out = Vec::new();
        run_headless(&settings, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Snapshot> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].status, Status::Running);
        assert_matches!(lines[0].session, Some(s) if s.time_remaining == 1500);
        let last = lines[3].session.unwrap();
        assert_eq!(last.label, SessionLabel::Focusing);
        assert_eq!(last.time_remaining, 1497);
        assert_eq!(lines[3].elapsed, 3);
    }
}
