use crate::engine::{Keystroke, Verdict};

/// Running counters for one session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub typing_time_secs: u32,
}

/// Accumulates correct and incorrect keystrokes into [`SessionStats`].
///
/// A wrong character repeated without an intervening correct match is only
/// counted once; a different wrong character counts again. Counters never
/// decrease.
#[derive(Clone, Debug, Default)]
pub struct ScoreKeeper {
    // Outer `None`: nothing memoized. `Some(None)`: the last miss was an empty input.
    last_incorrect: Option<Option<char>>,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stats: &mut SessionStats, keystroke: &Keystroke) {
        match keystroke.verdict {
            Verdict::Matched => {
                stats.correct_count += 1;
                self.last_incorrect = None;
            }
            Verdict::Mismatched => {
                if self.last_incorrect != Some(keystroke.typed) {
                    stats.incorrect_count += 1;
                    self.last_incorrect = Some(keystroke.typed);
                }
            }
            Verdict::OutOfRange => {}
        }
    }

    pub fn last_incorrect(&self) -> Option<Option<char>> {
        self.last_incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ks(verdict: Verdict, position: usize, typed: char) -> Keystroke {
        Keystroke {
            verdict,
            position,
            typed: Some(typed),
        }
    }

    #[test]
    fn test_correct_keystrokes_count() {
        let mut sk = ScoreKeeper::new();
        let mut stats = SessionStats::default();
        sk.record(&mut stats, &ks(Verdict::Matched, 0, 'a'));
        sk.record(&mut stats, &ks(Verdict::Matched, 1, 'b'));
        assert_eq!(stats.correct_count, 2);
        assert_eq!(stats.incorrect_count, 0);
    }

    #[test]
    fn test_repeated_wrong_character_counts_once() {
        let mut sk = ScoreKeeper::new();
        let mut stats = SessionStats::default();
        for _ in 0..5 {
            sk.record(&mut stats, &ks(Verdict::Mismatched, 3, 'x'));
        }
        assert_eq!(stats.incorrect_count, 1);
        assert_eq!(sk.last_incorrect(), Some(Some('x')));
    }

    #[test]
    fn test_different_wrong_character_counts_again() {
        let mut sk = ScoreKeeper::new();
        let mut stats = SessionStats::default();
        sk.record(&mut stats, &ks(Verdict::Mismatched, 0, 'x'));
        sk.record(&mut stats, &ks(Verdict::Mismatched, 0, 'y'));
        sk.record(&mut stats, &ks(Verdict::Mismatched, 0, 'x'));
        assert_eq!(stats.incorrect_count, 3);
    }

    #[test]
    fn test_correct_match_clears_memo() {
        let mut sk = ScoreKeeper::new();
        let mut stats = SessionStats::default();
        sk.record(&mut stats, &ks(Verdict::Mismatched, 0, 'x'));
        sk.record(&mut stats, &ks(Verdict::Matched, 0, 'a'));
        assert_eq!(sk.last_incorrect(), None);
        sk.record(&mut stats, &ks(Verdict::Mismatched, 1, 'x'));
        assert_eq!(stats.incorrect_count, 2);
    }

    #[test]
    fn test_out_of_range_is_not_scored() {
        let mut sk = ScoreKeeper::new();
        let mut stats = SessionStats::default();
        sk.record(&mut stats, &ks(Verdict::OutOfRange, 9, 'z'));
        assert_eq!(stats, SessionStats::default());
    }

    #[test]
    fn test_typing_time_is_left_alone() {
        let mut sk = ScoreKeeper::new();
        let mut stats = SessionStats {
            typing_time_secs: 12,
            ..SessionStats::default()
        };
        sk.record(&mut stats, &ks(Verdict::Matched, 0, 'a'));
        assert_eq!(stats.typing_time_secs, 12);
    }
}
