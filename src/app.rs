use std::time::Instant;

use crate::error::SessionError;
use crate::generator::{Difficulty, WordSource};
use crate::runtime::InputEvent;
use crate::session::TypingSession;

/// Which screen the terminal is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
    Help,
}

/// Per-run settings, merged from the config file and CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub secs: u64,
    pub difficulty: Difficulty,
}

/// Top-level application state: one session plus the input field and
/// the active screen. All mutation happens on the event loop thread.
pub struct App {
    pub settings: Settings,
    pub session: TypingSession,
    pub input: String,
    pub state: AppState,
    /// Screen to return to when the help overlay closes.
    return_state: AppState,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, SessionError> {
        Ok(Self {
            session: Self::build_session(settings)?,
            settings,
            input: String::new(),
            state: AppState::Typing,
            return_state: AppState::Typing,
        })
    }

    fn build_session(settings: Settings) -> Result<TypingSession, SessionError> {
        TypingSession::new(
            settings.secs,
            Box::new(WordSource::new(settings.difficulty)),
        )
    }

    /// Drops the current session and mounts a fresh one. The old
    /// session is gone before the next tick can reach it.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.session = Self::build_session(self.settings)?;
        self.input.clear();
        self.state = AppState::Typing;
        self.return_state = AppState::Typing;
        Ok(())
    }

    /// Routes one translated input event to the active screen. Quit is
    /// the caller's to handle; while the help overlay is up, any
    /// non-quit key closes it and does nothing else.
    pub fn on_input(&mut self, input: InputEvent, now: Instant) -> Result<(), SessionError> {
        match input {
            InputEvent::ToggleHelp => self.toggle_help(),
            _ if self.state == AppState::Help => self.dismiss_help(),
            InputEvent::Restart => self.reset()?,
            InputEvent::Backspace => self.backspace(),
            InputEvent::Char(c) => match self.state {
                AppState::Typing => self.on_char(c, now),
                AppState::Results => {
                    if c == 'r' {
                        self.reset()?;
                    }
                }
                AppState::Help => {}
            },
            InputEvent::Quit => {}
        }
        Ok(())
    }

    /// Routes one printable character: space submits the input field,
    /// anything else is appended to it.
    pub fn on_char(&mut self, c: char, now: Instant) {
        if self.state != AppState::Typing {
            return;
        }
        if c == ' ' {
            self.submit(now);
        } else {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.state == AppState::Typing {
            self.input.pop();
        }
    }

    /// Submits the input field as one word. Rejections after the
    /// deadline are dropped; the terminating tick owns that transition.
    pub fn submit(&mut self, now: Instant) {
        let raw = std::mem::take(&mut self.input);
        if let Err(err) = self.session.submit_word(&raw, now) {
            tracing::debug!(%err, "submission ignored");
        }
    }

    /// Advances the countdown and flips to the results screen when the
    /// session ends.
    pub fn on_tick(&mut self, now: Instant) {
        self.session.tick(now);
        if self.session.has_ended() && self.state == AppState::Typing {
            self.state = AppState::Results;
        }
    }

    pub fn toggle_help(&mut self) {
        if self.state == AppState::Help {
            self.state = self.return_state;
        } else {
            self.return_state = self.state;
            self.state = AppState::Help;
        }
    }

    pub fn dismiss_help(&mut self) {
        if self.state == AppState::Help {
            self.state = self.return_state;
        }
    }
}
