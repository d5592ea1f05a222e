use std::io::Write;
use std::process::{Command, Stdio};

use clap::ValueEnum;
use tracing::debug;

use crate::error::AlertError;

/// Something that can announce the end of a session.
///
/// Firing must not block the caller; the controller discards any error.
pub trait Alert: Send {
    fn fire(&self) -> Result<(), AlertError>;
}

/// Which alert the binary wires into the controller
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    Bell,
    Sound,
    None,
}

impl AlertKind {
    pub fn build(self) -> Box<dyn Alert> {
        match self {
            AlertKind::Bell => Box::new(TerminalBell),
            AlertKind::Sound => Box::new(SoundCommand::system()),
            AlertKind::None => Box::new(Silent),
        }
    }
}

/// Rings the terminal bell on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Alert for TerminalBell {
    fn fire(&self) -> Result<(), AlertError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07").map_err(AlertError::Bell)?;
        err.flush().map_err(AlertError::Bell)
    }
}

/// Does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Alert for Silent {
    fn fire(&self) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Plays a sound through the first player that can be spawned
#[derive(Debug, Clone)]
pub struct SoundCommand {
    candidates: Vec<(String, Vec<String>)>,
}

impl SoundCommand {
    pub fn new(candidates: Vec<(String, Vec<String>)>) -> Self {
        Self { candidates }
    }

    /// Players and stock sounds found on common desktops
    pub fn system() -> Self {
        let pairs: &[(&str, &str)] = if cfg!(target_os = "macos") {
            &[
                ("afplay", "/System/Library/Sounds/Glass.aiff"),
                ("afplay", "/System/Library/Sounds/Ping.aiff"),
            ]
        } else {
            &[
                ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
                ("paplay", "/usr/share/sounds/sound-icons/bell.wav"),
                ("aplay", "/usr/share/sounds/alsa/Front_Left.wav"),
            ]
        };
        Self::new(
            pairs
                .iter()
                .map(|(program, sound)| (program.to_string(), vec![sound.to_string()]))
                .collect(),
        )
    }
}

impl Alert for SoundCommand {
    fn fire(&self) -> Result<(), AlertError> {
        let mut last_err = None;
        for (program, args) in &self.candidates {
            match Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(mut child) => {
                    debug!(%program, "alert sound started");
                    // reap the player off the event loop
                    std::thread::spawn(move || {
                        let _ = child.wait();
                    });
                    return Ok(());
                }
                Err(source) => {
                    last_err = Some(AlertError::Spawn {
                        program: program.clone(),
                        source,
                    })
                }
            }
        }
        Err(last_err.unwrap_or(AlertError::NoPlayer))
    }
}
