//! Session orchestration.
//!
//! [`SessionController`] owns at most one active [`SessionState`]. Choosing a
//! duration throws away any previous session and waits for text; keystrokes
//! that arrive before the text is ready are dropped, not queued. Once text
//! arrives, keystrokes run through the match engine and the score keeper, the
//! first keystroke starts the countdown, and the session ends either when the
//! cursor reaches the end of the text or when the countdown expires. The
//! report is computed and handed to the [`ReportSink`] exactly once.

use tracing::{debug, info, warn};

use crate::board::{LetterBoard, TextBoard};
use crate::engine::{Keystroke, MatchEngine, Retreat, Verdict};
use crate::error::{Error, Result};
use crate::feedback::ErrorFeedback;
use crate::report::{ReportSink, ResultsReport};
use crate::results::calculate;
use crate::scoring::{ScoreKeeper, SessionStats};
use crate::timer::{Countdown, Tick, TimerState};

/// All mutable state of one typing session
#[derive(Clone, Debug)]
pub struct SessionState {
    board: TextBoard,
    engine: MatchEngine,
    scores: ScoreKeeper,
    stats: SessionStats,
    countdown: Countdown,
    report: Option<ResultsReport>,
}

impl SessionState {
    pub fn new(board: TextBoard, duration_secs: u32) -> Result<Self> {
        if board.is_empty() {
            return Err(Error::EmptyText);
        }
        Ok(Self {
            board,
            engine: MatchEngine::new(),
            scores: ScoreKeeper::new(),
            stats: SessionStats::default(),
            countdown: Countdown::new(duration_secs),
            report: None,
        })
    }

    pub fn board(&self) -> &TextBoard {
        &self.board
    }

    pub fn cursor(&self) -> usize {
        self.engine.cursor()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn report(&self) -> Option<&ResultsReport> {
        self.report.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    pub fn has_started(&self) -> bool {
        self.countdown.state() != TimerState::Idle
    }

    fn finish(&mut self) -> ResultsReport {
        self.countdown.cancel();
        let record = calculate(
            self.stats.correct_count,
            self.stats.incorrect_count,
            self.stats.typing_time_secs,
        );
        let report = ResultsReport::new(record, self.stats);
        self.report = Some(report);
        report
    }
}

/// Where the controller is in the session lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No duration chosen
    Idle,
    /// Duration chosen, text not loaded yet
    AwaitingText,
    Typing,
    Finished,
}

/// Result of feeding a keystroke to the controller
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyOutcome {
    /// No session is accepting input
    Dropped,
    Scored(Keystroke),
    /// This keystroke completed the text
    Completed(ResultsReport),
}

/// Result of feeding a countdown tick to the controller
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    Inactive,
    Running { remaining_secs: u32 },
    Expired(ResultsReport),
}

pub struct SessionController<F, R> {
    feedback: F,
    sink: R,
    duration_secs: Option<u32>,
    session: Option<SessionState>,
}

impl<F: ErrorFeedback, R: ReportSink> SessionController<F, R> {
    pub fn new(feedback: F, sink: R) -> Self {
        Self {
            feedback,
            sink,
            duration_secs: None,
            session: None,
        }
    }

    /// Selects a countdown length and discards any current session.
    pub fn select_duration(&mut self, duration_secs: u32) {
        if self.session.take().is_some() {
            debug!("discarding previous session");
        }
        self.duration_secs = Some(duration_secs);
    }

    /// Starts a fresh session over `text` with the selected duration.
    pub fn text_ready(&mut self, text: &str) -> Result<()> {
        let Some(duration_secs) = self.duration_secs else {
            debug!("text arrived without a selected duration; ignoring");
            return Ok(());
        };
        let board = TextBoard::from_text(text)?;
        info!(letters = board.len(), duration_secs, "session ready");
        self.session = Some(SessionState::new(board, duration_secs)?);
        Ok(())
    }

    /// The text source failed. The session does not start.
    pub fn text_failed(&mut self, err: &Error) {
        warn!(%err, "could not load text; session not started");
        self.duration_secs = None;
        self.session = None;
    }

    /// Forgets the session and the duration selection
    pub fn reset(&mut self) {
        self.duration_secs = None;
        self.session = None;
    }

    pub fn keystroke(&mut self, input: &str) -> KeyOutcome {
        let Some(session) = self.session.as_mut().filter(|s| !s.is_finished()) else {
            debug!("keystroke dropped: no session accepting input");
            return KeyOutcome::Dropped;
        };
        if input.is_empty() {
            return KeyOutcome::Dropped;
        }

        if session.countdown.start() {
            info!(
                duration_secs = session.countdown.duration_secs(),
                "countdown started"
            );
        }

        let keystroke = session
            .engine
            .keystroke(&mut session.board, input, &mut self.feedback);
        session.scores.record(&mut session.stats, &keystroke);

        if keystroke.verdict == Verdict::Matched && session.engine.is_complete(&session.board) {
            let report = session.finish();
            info!(?report, "text completed before the countdown");
            self.deliver(report);
            return KeyOutcome::Completed(report);
        }

        KeyOutcome::Scored(keystroke)
    }

    pub fn backspace(&mut self) -> Option<Retreat> {
        let session = self.session.as_mut().filter(|s| !s.is_finished())?;
        Some(session.engine.backspace(&mut session.board))
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Inactive;
        };
        match session.countdown.tick(&mut session.stats) {
            Tick::Inactive => TickOutcome::Inactive,
            Tick::Running { remaining_secs } => TickOutcome::Running { remaining_secs },
            Tick::Expired => {
                let report = session.finish();
                info!(?report, "countdown expired");
                self.deliver(report);
                TickOutcome::Expired(report)
            }
        }
    }

    fn deliver(&mut self, report: ResultsReport) {
        if let Err(err) = self.sink.deliver(&report) {
            warn!(%err, "results delivery failed");
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.session, self.duration_secs) {
            (Some(s), _) if s.is_finished() => Phase::Finished,
            (Some(_), _) => Phase::Typing,
            (None, Some(_)) => Phase::AwaitingText,
            (None, None) => Phase::Idle,
        }
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn duration_secs(&self) -> Option<u32> {
        self.duration_secs
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }
}
