use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use term_type::error::SessionError;
use term_type::generator::{Difficulty, TextGenerator, WordSource};
use term_type::session::{Phase, TypingSession, WordState};

/// Deterministic generator repeating a fixed word list per batch.
struct ScriptedWords(Vec<&'static str>);

impl TextGenerator for ScriptedWords {
    fn next_batch(&mut self) -> Vec<String> {
        self.0.iter().map(|w| w.to_string()).collect()
    }
}

#[test]
fn scripted_session_judges_and_extends_the_stream() {
    let generator = ScriptedWords(vec!["the", "quick", "brown"]);
    let mut session = TypingSession::new(60, Box::new(generator)).unwrap();

    assert!(session.submit_word("the", Instant::now()).unwrap().correct);
    assert!(session.submit_word("quick", Instant::now()).unwrap().correct);
    assert!(!session.submit_word("wrong", Instant::now()).unwrap().correct);

    assert_eq!(session.correct_words(), 2);
    assert_eq!(session.incorrect_words(), 1);
    assert_eq!(session.words_typed(), 3);
    assert_eq!(session.cursor(), 3);
    assert!(session.stream_len() > 3, "stream should auto-extend");

    let view = session.snapshot();
    assert_eq!(view.prior[0].state, WordState::Correct);
    assert_eq!(view.prior[1].state, WordState::Correct);
    assert_eq!(view.prior[2].state, WordState::Incorrect);
    assert_eq!(view.current.unwrap().text, "the");
}

#[test]
fn one_second_session_terminates_exactly_once() {
    let generator = ScriptedWords(vec!["word"]);
    let mut session = TypingSession::new(1, Box::new(generator)).unwrap();

    let start = Instant::now();
    session.begin(start).unwrap();
    session.tick(start + Duration::from_secs(1));

    assert_eq!(session.phase(), Phase::Ended);
    let result = session.result().cloned().expect("result after deadline");

    session.tick(start + Duration::from_secs(2));
    assert_eq!(session.result(), Some(&result));

    assert_matches!(
        session.submit_word("word", start + Duration::from_secs(2)),
        Err(SessionError::SessionEnded)
    );
}

#[test]
fn invariants_hold_across_a_long_mixed_session() {
    let generator = ScriptedWords(vec!["alpha", "beta", "gamma"]);
    let mut session = TypingSession::new(600, Box::new(generator)).unwrap();
    let now = Instant::now();

    for i in 0..200 {
        let expected = session.snapshot().current.unwrap().text.clone();
        let raw = if i % 4 == 0 { "typo".to_string() } else { expected };
        session.submit_word(&raw, now).unwrap();

        assert_eq!(
            session.correct_words() + session.incorrect_words(),
            session.words_typed()
        );
        assert_eq!(session.cursor(), session.words_typed());
        assert!(session.stream_len() - session.cursor() >= 1);
    }

    assert_eq!(session.words_typed(), 200);
    assert_eq!(session.incorrect_words(), 50);
}

#[test]
fn seeded_builtin_source_supports_a_perfect_run() {
    let generator = WordSource::seeded(Difficulty::Normal, 1234);
    let mut session = TypingSession::new(120, Box::new(generator)).unwrap();

    let start = Instant::now();
    session.begin(start).unwrap();
    for _ in 0..40 {
        let expected = session.snapshot().current.unwrap().text.clone();
        let judged = session.submit_word(&expected, start).unwrap();
        assert!(judged.correct, "expected word should always judge correct");
    }

    assert_eq!(session.accuracy(), 100.0);
    session.tick(start + Duration::from_secs(120));

    let result = session.result().unwrap();
    assert_eq!(result.correct_words, 40);
    assert_eq!(result.wpm, 20);
    assert_eq!(result.accuracy, 100.0);
}

#[test]
fn easy_mode_stream_construction_works_end_to_end() {
    let generator = WordSource::seeded(Difficulty::Easy, 7);
    let mut session = TypingSession::new(30, Box::new(generator)).unwrap();

    // Easy batches are 50 words, so the stream starts a full batch deep.
    assert!(session.stream_len() >= 50);
    session.submit_word("anything", Instant::now()).unwrap();
    assert_eq!(session.words_typed(), 1);
}

#[test]
fn reset_produces_an_independent_session() {
    let generator = ScriptedWords(vec!["one", "two"]);
    let mut session = TypingSession::new(60, Box::new(generator)).unwrap();

    let start = Instant::now();
    session.submit_word("one", start).unwrap();
    session.tick(start + Duration::from_secs(60));
    assert_eq!(session.phase(), Phase::Ended);

    let fresh = session.reset().unwrap();
    assert_eq!(fresh.phase(), Phase::NotStarted);
    assert_eq!(fresh.words_typed(), 0);
    assert!(fresh.result().is_none());
    assert_eq!(fresh.snapshot().current.unwrap().text, "one");
}
