use thiserror::Error;

/// Failure modes of the typing session state machine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The session clock was started a second time. Unreachable through
    /// the public state machine; surfaced as a hard error instead of a
    /// silent restart of the countdown.
    #[error("session clock already started")]
    AlreadyStarted,

    /// A mutation was attempted after the countdown reached zero.
    /// Recoverable; callers typically drop the input and re-render.
    #[error("session has already ended")]
    SessionEnded,

    /// A text generator produced an empty batch, so the word stream
    /// cannot be extended. The built-in word sources never do this.
    #[error("text generator returned an empty batch")]
    EmptyGenerator,

    /// A session was constructed with a zero-length countdown.
    #[error("session duration must be at least one second")]
    InvalidDuration,
}
