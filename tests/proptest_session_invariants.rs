//! Property-based invariant tests for the typing session.
//!
//! 1. The cursor never leaves `0..=len`
//! 2. Correct and incorrect counts never decrease
//! 3. A session reports at most once, however many ticks and keys follow
//! 4. Elapsed typing time never exceeds the selected duration
//! 5. Only the letter under the cursor can be marked incorrect

use proptest::prelude::*;
use typedash::board::{LetterBoard, LetterState};
use typedash::controller::{KeyOutcome, SessionController, TickOutcome};
use typedash::feedback::Silent;
use typedash::report::MemorySink;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Key(char),
    Backspace,
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => prop::sample::select(vec!['a', 'b', 'c', ' ', '\u{00A0}']).prop_map(Op::Key),
        2 => Just(Op::Backspace),
        1 => Just(Op::Tick),
    ]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[abc]{1,4}", 1..6).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn session_invariants_hold(
        text in text_strategy(),
        duration in 1u32..20,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut c = SessionController::new(Silent, MemorySink::default());
        c.select_duration(duration);
        c.text_ready(&text).unwrap();
        let len = c.session().unwrap().board().sequence().len();

        let mut last = c.session().unwrap().stats();
        let mut reports = 0;

        for op in ops {
            match op {
                Op::Key(ch) => {
                    if let KeyOutcome::Completed(_) = c.keystroke(&ch.to_string()) {
                        reports += 1;
                    }
                }
                Op::Backspace => {
                    c.backspace();
                }
                Op::Tick => {
                    if let TickOutcome::Expired(_) = c.tick() {
                        reports += 1;
                    }
                }
            }

            let session = c.session().unwrap();
            let stats = session.stats();
            prop_assert!(session.cursor() <= len);
            let marks = session.board().incorrect_marks();
            prop_assert!(marks <= 1);
            if marks == 1 {
                prop_assert_eq!(
                    session.board().letter_state(session.cursor()),
                    LetterState::Incorrect
                );
            }
            prop_assert!(stats.correct_count >= last.correct_count);
            prop_assert!(stats.incorrect_count >= last.incorrect_count);
            prop_assert!(stats.typing_time_secs <= duration);
            last = stats;
        }

        prop_assert!(reports <= 1);
        prop_assert_eq!(c.sink().reports.len(), reports);
    }

    #[test]
    fn typing_the_text_exactly_completes_it(text in text_strategy()) {
        let mut c = SessionController::new(Silent, MemorySink::default());
        c.select_duration(60);
        c.text_ready(&text).unwrap();

        let mut completed = None;
        for ch in text.chars() {
            if let KeyOutcome::Completed(report) = c.keystroke(&ch.to_string()) {
                completed = Some(report);
            }
        }

        let report = completed.expect("exact text must complete the session");
        prop_assert_eq!(report.correct_chars as usize, text.chars().count());
        prop_assert_eq!(report.incorrect_chars, 0);
        prop_assert_eq!(report.accuracy, 100);
    }
}
