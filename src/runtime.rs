use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};

/// How often the countdown is re-evaluated.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One typed action after keymap translation. The app loop only ever
/// sees these; raw key events stay on the reader thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable character for the input field (space included; the
    /// app treats it as the word delimiter).
    Char(char),
    Backspace,
    ToggleHelp,
    Restart,
    Quit,
}

/// Unified event type consumed by the app loop. Input, ticks, and
/// resizes are funneled through one channel so session mutations are
/// serialized on a single thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Input(InputEvent),
    Resize,
    Tick,
}

/// Maps a raw terminal key onto the fixed keymap. Keys with no binding
/// (function keys, unhandled chords) translate to nothing.
pub fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(InputEvent::Quit),
            KeyCode::Char('h') => Some(InputEvent::ToggleHelp),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Left => Some(InputEvent::Restart),
        KeyCode::Char(c) => Some(InputEvent::Char(c)),
        _ => None,
    }
}

/// Source of already-translated app events.
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source: a worker thread reads crossterm events and
/// pushes them through [`translate_key`] before they leave the thread.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let translated = match event::read() {
                Ok(CtEvent::Key(key)) => translate_key(key).map(AppEvent::Input),
                Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };
            if let Some(ev) = translated {
                if tx.send(ev).is_err() {
                    break;
                }
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

/// Channel-backed event source for headless tests.
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

/// Advances the application one event at a time, synthesizing a tick
/// whenever the source stays quiet for a full interval.
///
/// Ticks keep flowing after the session ends: they double as the
/// redraw heartbeat for the results screen, and an ended session
/// ignores them (`tick` is idempotent once `Ended`).
pub struct Runner<E: EventSource> {
    source: E,
    tick_every: Duration,
}

impl<E: EventSource> Runner<E> {
    /// Production runner at the spec cadence of one tick per second.
    pub fn new(source: E) -> Self {
        Self::with_tick_every(source, TICK_INTERVAL)
    }

    pub fn with_tick_every(source: E, tick_every: Duration) -> Self {
        Self { source, tick_every }
    }

    /// Blocks up to the tick interval and returns the next event, or
    /// Tick on timeout.
    pub fn step(&self) -> AppEvent {
        match self.source.recv_timeout(self.tick_every) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}
