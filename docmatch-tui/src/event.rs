//! Input event plumbing for the TUI.

use std::{path::PathBuf, time::Duration, time::Instant};

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// Source of key/input events so tests can drive the TUI without a real tty.
pub trait EventSource {
    fn next(&mut self, timeout: Duration) -> Result<Option<Event>>;
    fn is_scripted(&self) -> bool {
        false
    }
}

pub struct CrosstermEventSource;

impl EventSource for CrosstermEventSource {
    fn next(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Scripted event source driven by a simple line-oriented DSL:
///   down|up|enter|esc|tab|backspace|q|<single char>|type:<text>
/// Lines beginning with # are ignored. Blank lines are skipped.
/// When events are exhausted, we fail fast to avoid hangs.
pub struct ScriptEventSource {
    events: Vec<Event>,
    cursor: usize,
    exhausted_at: Option<Instant>,
}

impl ScriptEventSource {
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .context("read scripted TUI input")?;
        Self::from_script(&contents)
    }

    pub fn from_script(contents: &str) -> Result<Self> {
        let mut events = Vec::new();
        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut push_key = |code: KeyCode| {
                events.push(Event::Key(KeyEvent {
                    code,
                    modifiers: KeyModifiers::NONE,
                    kind: event::KeyEventKind::Press,
                    state: event::KeyEventState::NONE,
                }));
            };

            match line {
                "down" | "j" => push_key(KeyCode::Down),
                "up" | "k" => push_key(KeyCode::Up),
                "enter" => push_key(KeyCode::Enter),
                "esc" => push_key(KeyCode::Esc),
                "tab" => push_key(KeyCode::Tab),
                "backspace" => push_key(KeyCode::Backspace),
                other => {
                    if let Some(text) = other.strip_prefix("type:") {
                        for ch in text.chars() {
                            push_key(KeyCode::Char(ch));
                        }
                    } else if other.chars().count() == 1 {
                        let ch = other.chars().next().unwrap_or_default();
                        push_key(KeyCode::Char(ch));
                    } else {
                        return Err(anyhow!(
                            "unrecognized scripted input on line {}: {other}",
                            idx + 1
                        ));
                    }
                }
            }
        }

        Ok(Self {
            events,
            cursor: 0,
            exhausted_at: None,
        })
    }
}

impl EventSource for ScriptEventSource {
    fn next(&mut self, _timeout: Duration) -> Result<Option<Event>> {
        if self.cursor < self.events.len() {
            let event = self.events[self.cursor].clone();
            self.cursor += 1;
            return Ok(Some(event));
        }
        // Allow a short grace period for in-flight responses to settle.
        let first_exhaustion = *self.exhausted_at.get_or_insert_with(Instant::now);
        if first_exhaustion.elapsed() > Duration::from_secs(5) {
            return Err(anyhow!("scripted input exhausted without quitting"));
        }
        Ok(None)
    }

    fn is_scripted(&self) -> bool {
        true
    }
}

/// Pick the event source: scripted when `DOCMATCH_TUI_SCRIPT` names a file,
/// real terminal input otherwise.
pub fn event_source_from_env() -> Result<Box<dyn EventSource>> {
    if let Ok(path) = std::env::var("DOCMATCH_TUI_SCRIPT") {
        Ok(Box::new(ScriptEventSource::from_path(PathBuf::from(path))?))
    } else {
        Ok(Box::new(CrosstermEventSource))
    }
}
