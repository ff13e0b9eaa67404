use tracing::debug;

use crate::board::{LetterBoard, LetterState};
use crate::feedback::ErrorFeedback;
use crate::normalize::{normalize, normalize_char};

/// Result of comparing one keystroke against the expected character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Matched,
    Mismatched,
    /// The cursor already sits at the end of the board; nothing was compared
    OutOfRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keystroke {
    pub verdict: Verdict,
    /// Position the keystroke was compared at
    pub position: usize,
    /// Normalized typed character, `None` when the input held nothing
    pub typed: Option<char>,
}

impl Keystroke {
    pub fn matched(&self) -> bool {
        self.verdict == Verdict::Matched
    }
}

/// What a backspace did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retreat {
    /// The current letter was marked incorrect; only the mark was removed
    ClearedMark,
    /// The cursor moved back one letter
    MovedBack,
    /// Nothing to undo at the start of the board
    AtStart,
}

/// Cursor over a [`LetterBoard`].
///
/// Advances by one on a correct keystroke, stays put on an incorrect one and
/// retreats by at most one per backspace. `0 <= cursor <= board.len()` always
/// holds; `cursor == board.len()` means the text is complete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchEngine {
    cursor: usize,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete<B: LetterBoard + ?Sized>(&self, board: &B) -> bool {
        self.cursor >= board.len()
    }

    pub fn keystroke<B, F>(&mut self, board: &mut B, input: &str, feedback: &mut F) -> Keystroke
    where
        B: LetterBoard + ?Sized,
        F: ErrorFeedback + ?Sized,
    {
        let position = self.cursor;
        let typed = normalize(input);

        let Some(expected) = board.expected_char(position) else {
            debug!(position, "keystroke past end of text ignored");
            return Keystroke {
                verdict: Verdict::OutOfRange,
                position,
                typed,
            };
        };

        board.set_letter_state(position, LetterState::Unmarked);

        let verdict = if typed.is_some() && typed == Some(normalize_char(expected)) {
            board.set_letter_state(position, LetterState::Correct);
            self.cursor += 1;
            Verdict::Matched
        } else {
            board.set_letter_state(position, LetterState::Incorrect);
            board.shake(position);
            feedback.mistake();
            Verdict::Mismatched
        };

        Keystroke {
            verdict,
            position,
            typed,
        }
    }

    pub fn backspace<B: LetterBoard + ?Sized>(&mut self, board: &mut B) -> Retreat {
        if board.letter_state(self.cursor) == LetterState::Incorrect {
            board.set_letter_state(self.cursor, LetterState::Unmarked);
            return Retreat::ClearedMark;
        }
        if self.cursor == 0 {
            return Retreat::AtStart;
        }
        self.cursor -= 1;
        board.set_letter_state(self.cursor, LetterState::Unmarked);
        Retreat::MovedBack
    }
}
