use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::normalize::normalize_char;

/// How long an incorrect letter keeps shaking after the mistake
pub const SHAKE_DURATION: Duration = Duration::from_millis(300);

/// Per-letter classification shown to the typist
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LetterState {
    #[default]
    Unmarked,
    Correct,
    Incorrect,
}

/// Ordered, read-only list of characters the typist is expected to enter.
///
/// Words are separated by exactly one explicit space position; there is no
/// trailing space after the last word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedSequence {
    chars: Vec<char>,
}

impl ExpectedSequence {
    /// Splits `text` on runs of whitespace and joins the words with single spaces.
    pub fn from_text(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        for (idx, word) in text.split_whitespace().enumerate() {
            if idx > 0 {
                chars.push(' ');
            }
            chars.extend(word.chars());
        }
        Self { chars }
    }

    pub fn get(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

/// Surface the match engine draws on: expected characters plus a visual
/// state per position. The engine never touches rendering directly.
pub trait LetterBoard {
    fn expected_char(&self, idx: usize) -> Option<char>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn letter_state(&self, idx: usize) -> LetterState;

    /// Setting `Unmarked` also stops any running shake.
    fn set_letter_state(&mut self, idx: usize, state: LetterState);

    /// Starts the transient shake effect on a letter. Purely cosmetic.
    fn shake(&mut self, _idx: usize) {}
}

#[derive(Clone, Copy, Debug, Default)]
struct Letter {
    state: LetterState,
    shaking_since: Option<Instant>,
}

/// In-memory letter board backing the terminal renderer
#[derive(Clone, Debug)]
pub struct TextBoard {
    sequence: ExpectedSequence,
    letters: Vec<Letter>,
}

impl TextBoard {
    pub fn new(sequence: ExpectedSequence) -> Self {
        let letters = vec![Letter::default(); sequence.len()];
        Self { sequence, letters }
    }

    /// Builds a board from a paragraph. Fails when the paragraph has no words,
    /// since a session cannot run over nothing.
    pub fn from_text(text: &str) -> Result<Self> {
        let sequence = ExpectedSequence::from_text(text);
        if sequence.is_empty() {
            return Err(Error::EmptyText);
        }
        Ok(Self::new(sequence))
    }

    pub fn sequence(&self) -> &ExpectedSequence {
        &self.sequence
    }

    pub fn is_shaking(&self, idx: usize, now: Instant) -> bool {
        self.letters
            .get(idx)
            .and_then(|l| l.shaking_since)
            .is_some_and(|since| now.saturating_duration_since(since) < SHAKE_DURATION)
    }

    /// Number of positions currently marked `Incorrect`
    pub fn incorrect_marks(&self) -> usize {
        self.letters
            .iter()
            .filter(|l| l.state == LetterState::Incorrect)
            .count()
    }
}

impl LetterBoard for TextBoard {
    fn expected_char(&self, idx: usize) -> Option<char> {
        self.sequence.get(idx).map(normalize_char)
    }

    fn len(&self) -> usize {
        self.sequence.len()
    }

    fn letter_state(&self, idx: usize) -> LetterState {
        self.letters.get(idx).map(|l| l.state).unwrap_or_default()
    }

    fn set_letter_state(&mut self, idx: usize, state: LetterState) {
        if let Some(letter) = self.letters.get_mut(idx) {
            letter.state = state;
            if state == LetterState::Unmarked {
                letter.shaking_since = None;
            }
        }
    }

    fn shake(&mut self, idx: usize) {
        if let Some(letter) = self.letters.get_mut(idx) {
            letter.shaking_since = Some(Instant::now());
        }
    }
}
