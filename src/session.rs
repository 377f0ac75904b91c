use std::time::Instant;

use crate::clock::SessionClock;
use crate::error::SessionError;
use crate::generator::TextGenerator;
use crate::score;

/// Minimum number of unjudged words kept ahead of the cursor. The
/// stream is extended from the generator whenever the lookahead would
/// drop below this, so a current word always exists.
const LOOKAHEAD: usize = 10;

/// Judged state of a single expected word. Once a slot is judged
/// Correct or Incorrect it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordState {
    Pending,
    Current,
    Correct,
    Incorrect,
}

/// One expected word in the stream plus its judged state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSlot {
    pub text: String,
    pub state: WordState,
}

/// Outcome of a single word submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judged {
    pub correct: bool,
    /// Cursor position after advancing past the judged word.
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Ended,
}

/// Read model for the presentation layer: the word stream partitioned
/// around the cursor. Borrowed straight out of the session, so
/// rendering never mutates anything.
#[derive(Debug, Clone)]
pub struct RenderModel<'a> {
    pub prior: &'a [WordSlot],
    pub current: Option<&'a WordSlot>,
    pub upcoming: &'a [WordSlot],
}

/// Final summary of an ended session, produced exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub wpm: u64,
    pub accuracy: f64,
    pub correct_words: usize,
    pub incorrect_words: usize,
    pub total_keystrokes: usize,
    pub percentile: f64,
    pub graph: String,
}

/// The typing test state machine.
///
/// Mutated only by `submit_word` and `tick`; both event sources must be
/// serialized on one thread. The session owns no timer: the caller
/// supplies `now` on every operation that touches time.
pub struct TypingSession {
    stream: Vec<WordSlot>,
    cursor: usize,
    clock: SessionClock,
    phase: Phase,
    words_typed: usize,
    correct_words: usize,
    incorrect_words: usize,
    total_keystrokes: usize,
    result: Option<SessionResult>,
    generator: Box<dyn TextGenerator>,
}

impl std::fmt::Debug for TypingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingSession")
            .field("stream", &self.stream)
            .field("cursor", &self.cursor)
            .field("clock", &self.clock)
            .field("phase", &self.phase)
            .field("words_typed", &self.words_typed)
            .field("correct_words", &self.correct_words)
            .field("incorrect_words", &self.incorrect_words)
            .field("total_keystrokes", &self.total_keystrokes)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl TypingSession {
    pub fn new(
        duration_secs: u64,
        mut generator: Box<dyn TextGenerator>,
    ) -> Result<Self, SessionError> {
        if duration_secs == 0 {
            return Err(SessionError::InvalidDuration);
        }

        let mut stream = Vec::new();
        while stream.len() < LOOKAHEAD {
            let batch = generator.next_batch();
            if batch.is_empty() {
                return Err(SessionError::EmptyGenerator);
            }
            stream.extend(batch.into_iter().map(|text| WordSlot {
                text,
                state: WordState::Pending,
            }));
        }
        stream[0].state = WordState::Current;

        Ok(Self {
            stream,
            cursor: 0,
            clock: SessionClock::new(duration_secs),
            phase: Phase::NotStarted,
            words_typed: 0,
            correct_words: 0,
            incorrect_words: 0,
            total_keystrokes: 0,
            result: None,
            generator,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.clock.is_started()
    }

    pub fn has_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn words_typed(&self) -> usize {
        self.words_typed
    }

    pub fn correct_words(&self) -> usize {
        self.correct_words
    }

    pub fn incorrect_words(&self) -> usize {
        self.incorrect_words
    }

    pub fn total_keystrokes(&self) -> usize {
        self.total_keystrokes
    }

    pub fn stream_len(&self) -> usize {
        self.stream.len()
    }

    pub fn duration_secs(&self) -> u64 {
        self.clock.duration_secs()
    }

    /// Seconds left on the countdown; the full duration until the
    /// session starts.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        if self.clock.is_started() {
            self.clock.remaining_secs(now)
        } else {
            self.clock.duration_secs()
        }
    }

    /// The one-time result of an ended session, if any.
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Starts the countdown without a word submission, for a visible
    /// timer before the first keystroke.
    pub fn begin(&mut self, now: Instant) -> Result<(), SessionError> {
        if self.phase == Phase::Ended {
            return Err(SessionError::SessionEnded);
        }
        self.clock.start(now)?;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Judges `raw` against the current word and advances the cursor.
    ///
    /// The input is trimmed and compared case-sensitively; an empty or
    /// malformed submission is simply scored as an incorrect word. The
    /// first submission starts the clock. Keystroke accounting charges
    /// the raw length plus one for the delimiting space.
    pub fn submit_word(&mut self, raw: &str, now: Instant) -> Result<Judged, SessionError> {
        if self.phase == Phase::Ended {
            return Err(SessionError::SessionEnded);
        }
        if !self.clock.is_started() {
            self.clock.start(now)?;
            self.phase = Phase::Running;
        }

        debug_assert!(self.cursor < self.stream.len(), "lookahead invariant broken");

        let typed = raw.trim();
        let correct = typed == self.stream[self.cursor].text;

        self.stream[self.cursor].state = if correct {
            WordState::Correct
        } else {
            WordState::Incorrect
        };
        self.words_typed += 1;
        self.total_keystrokes += raw.chars().count() + 1;
        if correct {
            self.correct_words += 1;
        } else {
            self.incorrect_words += 1;
        }
        self.cursor += 1;

        self.refill()?;
        self.stream[self.cursor].state = WordState::Current;

        tracing::debug!(
            expected = %self.stream[self.cursor - 1].text,
            typed,
            correct,
            cursor = self.cursor,
            "word judged"
        );

        Ok(Judged {
            correct,
            cursor: self.cursor,
        })
    }

    /// Recomputes the countdown and performs the terminal transition
    /// when it reaches zero. Idempotent once the session has ended; the
    /// result is computed exactly once.
    pub fn tick(&mut self, now: Instant) {
        if self.phase != Phase::Running {
            return;
        }

        let remaining = self.clock.remaining_secs(now);
        tracing::debug!(remaining, "tick");

        if remaining == 0 {
            self.phase = Phase::Ended;
            self.result = Some(self.finalize(now));
        }
    }

    /// Current words-per-minute: zero before the clock starts or within
    /// the first second, `floor(words / minutes)` afterwards.
    pub fn wpm(&self, now: Instant) -> u64 {
        if !self.clock.is_started() {
            return 0;
        }
        let secs = self.clock.elapsed_secs(now);
        if secs == 0 {
            return 0;
        }
        self.words_typed as u64 * 60 / secs
    }

    /// Live accuracy over the words judged so far.
    pub fn accuracy(&self) -> f64 {
        score::accuracy_percent(self.correct_words, self.words_typed)
    }

    /// Partitions the stream around the cursor for rendering.
    pub fn snapshot(&self) -> RenderModel<'_> {
        RenderModel {
            prior: &self.stream[..self.cursor],
            current: self.stream.get(self.cursor),
            upcoming: &self.stream[(self.cursor + 1).min(self.stream.len())..],
        }
    }

    /// Discards this session and builds a fresh one with the same
    /// duration and generator. Nothing carries over.
    pub fn reset(self) -> Result<Self, SessionError> {
        Self::new(self.clock.duration_secs(), self.generator)
    }

    fn refill(&mut self) -> Result<(), SessionError> {
        while self.stream.len() - self.cursor < LOOKAHEAD {
            let batch = self.generator.next_batch();
            if batch.is_empty() {
                return Err(SessionError::EmptyGenerator);
            }
            self.stream.extend(batch.into_iter().map(|text| WordSlot {
                text,
                state: WordState::Pending,
            }));
        }
        Ok(())
    }

    fn finalize(&self, now: Instant) -> SessionResult {
        // A late tick must not deflate the result; elapsed time is
        // capped at the configured duration.
        let secs = self.clock.elapsed_secs(now).min(self.clock.duration_secs());
        let wpm = if secs == 0 {
            0
        } else {
            self.words_typed as u64 * 60 / secs
        };

        SessionResult {
            wpm,
            accuracy: score::accuracy_percent(self.correct_words, self.words_typed),
            correct_words: self.correct_words,
            incorrect_words: self.incorrect_words,
            total_keystrokes: self.total_keystrokes,
            percentile: score::percentile(wpm),
            graph: score::performance_graph(wpm),
        }
    }
}
