use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::results::ResultsRecord;
use crate::scoring::SessionStats;

/// Path of the results page the report is addressed to
pub const RESULTS_PATH: &str = "/results";

/// Everything handed to the results collaborator when a session ends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    pub accuracy: u32,
    pub wpm: u32,
    #[serde(rename = "time")]
    pub elapsed_secs: u32,
    pub correct_chars: u32,
    pub incorrect_chars: u32,
}

impl ResultsReport {
    pub fn new(record: ResultsRecord, stats: SessionStats) -> Self {
        Self {
            accuracy: record.accuracy,
            wpm: record.wpm,
            elapsed_secs: stats.typing_time_secs,
            correct_chars: stats.correct_count,
            incorrect_chars: stats.incorrect_count,
        }
    }

    pub fn record(&self) -> ResultsRecord {
        ResultsRecord {
            accuracy: self.accuracy,
            wpm: self.wpm,
        }
    }

    /// Query parameters in the order the results page documents them
    pub fn params(&self) -> [(&'static str, u32); 5] {
        [
            ("wpm", self.wpm),
            ("accuracy", self.accuracy),
            ("time", self.elapsed_secs),
            ("correctChars", self.correct_chars),
            ("incorrectChars", self.incorrect_chars),
        ]
    }

    /// Relative navigation target, e.g. `/results?wpm=55&accuracy=90&...`
    pub fn query(&self) -> String {
        let params = self
            .params()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join("&");
        format!("{RESULTS_PATH}?{params}")
    }

    /// Absolute URL below `base`
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.query())
    }
}

/// Receives the final report of a session
pub trait ReportSink {
    fn deliver(&mut self, report: &ResultsReport) -> Result<()>;
}

/// Keeps every delivered report in memory
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<ResultsReport>,
}

impl MemorySink {
    pub fn last(&self) -> Option<&ResultsReport> {
        self.reports.last()
    }
}

impl ReportSink for MemorySink {
    fn deliver(&mut self, report: &ResultsReport) -> Result<()> {
        self.reports.push(*report);
        Ok(())
    }
}

/// Opens the results page in the user's browser
#[derive(Clone, Debug)]
pub struct BrowserSink {
    base_url: String,
}

impl BrowserSink {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn target(&self, report: &ResultsReport) -> String {
        report.url(&self.base_url)
    }
}

impl ReportSink for BrowserSink {
    fn deliver(&mut self, report: &ResultsReport) -> Result<()> {
        let url = self.target(report);
        info!(%url, "opening results page");
        webbrowser::open(&url)?;
        Ok(())
    }
}

/// Delivers to the first sink, then the second if there is one
impl<A: ReportSink, B: ReportSink> ReportSink for (A, Option<B>) {
    fn deliver(&mut self, report: &ResultsReport) -> Result<()> {
        self.0.deliver(report)?;
        if let Some(second) = self.1.as_mut() {
            second.deliver(report)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultsReport {
        ResultsReport {
            accuracy: 90,
            wpm: 55,
            elapsed_secs: 29,
            correct_chars: 10,
            incorrect_chars: 2,
        }
    }

    #[test]
    fn test_json_uses_query_parameter_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        let mut expected: Vec<&str> = sample().params().iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(json["time"], 29);
        assert_eq!(json["correctChars"], 10);

        let back: ResultsReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_query_carries_all_parameters() {
        let q = sample().query();

        assert!(q.starts_with("/results?"));
        assert!(q.contains("wpm=55"));
        assert!(q.contains("accuracy=90"));
        assert!(q.contains("time=29"));
        assert!(q.contains("correctChars=10"));
        assert!(q.contains("incorrectChars=2"));
    }

    #[test]
    fn test_query_exact_form() {
        assert_eq!(
            sample().query(),
            "/results?wpm=55&accuracy=90&time=29&correctChars=10&incorrectChars=2"
        );
    }

    #[test]
    fn test_url_joins_base_without_double_slash() {
        let r = sample();
        assert!(r
            .url("http://localhost:5001/")
            .starts_with("http://localhost:5001/results?"));
        assert!(r
            .url("http://localhost:5001")
            .starts_with("http://localhost:5001/results?"));
    }

    #[test]
    fn test_report_from_record_and_stats() {
        let stats = SessionStats {
            correct_count: 100,
            incorrect_count: 20,
            typing_time_secs: 30,
        };
        let record = ResultsRecord {
            accuracy: 83,
            wpm: 40,
        };
        let r = ResultsReport::new(record, stats);

        assert_eq!(r.elapsed_secs, 30);
        assert_eq!(r.correct_chars, 100);
        assert_eq!(r.incorrect_chars, 20);
        assert_eq!(r.record(), record);
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::default();
        sink.deliver(&sample()).unwrap();
        assert_eq!(sink.reports.len(), 1);
        assert_eq!(sink.last(), Some(&sample()));
    }

    #[test]
    fn test_browser_sink_target() {
        let sink = BrowserSink::new("https://typing.example");
        assert_eq!(
            sink.target(&sample()),
            "https://typing.example/results?wpm=55&accuracy=90&time=29&correctChars=10&incorrectChars=2"
        );
    }

    #[test]
    fn test_paired_sink_without_second() {
        let mut sinks: (MemorySink, Option<MemorySink>) = (MemorySink::default(), None);
        sinks.deliver(&sample()).unwrap();
        assert_eq!(sinks.0.reports.len(), 1);
    }
}
