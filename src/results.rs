use serde::{Deserialize, Serialize};

/// Characters per word in the WPM convention
pub const CHARS_PER_WORD: f64 = 5.0;

/// Final accuracy and speed of a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsRecord {
    /// Percentage of typed characters that were correct, 0 to 100
    pub accuracy: u32,
    pub wpm: u32,
}

impl ResultsRecord {
    /// Speed weighted by accuracy, the figure leaderboards rank on
    pub fn score(&self) -> f64 {
        self.wpm as f64 * (self.accuracy as f64 / 100.0)
    }
}

/// Derives accuracy and words per minute from the raw counters.
///
/// No keystrokes at all gives zeros. A session with keystrokes but no whole
/// second of typing time yet reports `wpm == 0` while still computing accuracy.
pub fn calculate(correct_count: u32, incorrect_count: u32, elapsed_secs: u32) -> ResultsRecord {
    if correct_count == 0 && incorrect_count == 0 {
        return ResultsRecord::default();
    }

    let correct = correct_count as f64;
    let total = correct + incorrect_count as f64;
    let accuracy = (correct * 100.0 / total).round() as u32;

    let wpm = if elapsed_secs == 0 {
        0
    } else {
        ((correct / CHARS_PER_WORD) / elapsed_secs as f64 * 60.0).round() as u32
    };

    ResultsRecord { accuracy, wpm }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_figures() {
        let r = calculate(100, 20, 30);
        assert_eq!(r.accuracy, 83);
        assert_eq!(r.wpm, 40);
    }

    #[test]
    fn test_no_keystrokes_is_all_zero() {
        assert_eq!(calculate(0, 0, 0), ResultsRecord::default());
        assert_eq!(calculate(0, 0, 60), ResultsRecord { accuracy: 0, wpm: 0 });
    }

    #[test]
    fn test_zero_elapsed_time_gives_zero_wpm() {
        let r = calculate(10, 0, 0);
        assert_eq!(r.accuracy, 100);
        assert_eq!(r.wpm, 0);
    }

    #[test]
    fn test_only_mistakes() {
        let r = calculate(0, 7, 15);
        assert_eq!(r.accuracy, 0);
        assert_eq!(r.wpm, 0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 1 of 8 wrong: 87.5% rounds to 88
        assert_eq!(calculate(7, 1, 60).accuracy, 88);
        // 25 correct chars in 60s: 5 wpm exactly
        assert_eq!(calculate(25, 0, 60).wpm, 5);
        // 13 correct chars in 60s: 2.6 wpm rounds to 3
        assert_eq!(calculate(13, 0, 60).wpm, 3);
    }

    #[test]
    fn test_record_json_shape() {
        let r = calculate(100, 20, 30);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"accuracy":83,"wpm":40}"#);
        assert_eq!(serde_json::from_str::<ResultsRecord>(&json).unwrap(), r);
    }

    #[test]
    fn test_score_weights_speed_by_accuracy() {
        let r = ResultsRecord {
            accuracy: 90,
            wpm: 50,
        };
        assert!((r.score() - 45.0).abs() < 1e-9);
    }
}
