use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

use rodio::source::SineWave;
use rodio::Source;
use tracing::{debug, info};

/// Calls closer together than this collapse into one
pub const THROTTLE_WINDOW: Duration = Duration::from_millis(50);

pub const BEEP_FREQUENCY_HZ: f32 = 220.0;
pub const BEEP_DURATION: Duration = Duration::from_millis(250);
const BEEP_VOLUME: f32 = 0.2;

/// Fire-and-forget notification raised on every incorrect keystroke.
///
/// Implementations must never block the typing flow or surface errors.
pub trait ErrorFeedback {
    fn mistake(&mut self);
}

/// Feedback that does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl ErrorFeedback for Silent {
    fn mistake(&mut self) {}
}

/// Short sine tone played through the default output device.
///
/// The output stream lives on its own thread; `mistake` only queues a beep.
pub struct Beep {
    tx: Sender<()>,
}

impl Beep {
    /// Opens the default output device. Returns `None` when there is none,
    /// callers fall back to [`Silent`].
    pub fn try_new() -> Option<Self> {
        let (tx, rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<bool>(1);

        thread::spawn(move || {
            let Ok((_stream, handle)) = rodio::OutputStream::try_default() else {
                let _ = ready_tx.send(false);
                return;
            };
            let _ = ready_tx.send(true);
            while rx.recv().is_ok() {
                if let Ok(sink) = rodio::Sink::try_new(&handle) {
                    sink.append(beep_source());
                    sink.detach();
                }
            }
        });

        match ready_rx.recv() {
            Ok(true) => {
                info!("audio feedback enabled");
                Some(Self::with_sender(tx))
            }
            _ => {
                debug!("no audio output device, mistakes stay silent");
                None
            }
        }
    }

    fn with_sender(tx: Sender<()>) -> Self {
        Self { tx }
    }
}

impl ErrorFeedback for Beep {
    fn mistake(&mut self) {
        // playback thread gone means no device; nothing to report
        let _ = self.tx.send(());
    }
}

fn beep_source() -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(BEEP_FREQUENCY_HZ)
        .take_duration(BEEP_DURATION)
        .amplify(BEEP_VOLUME)
}

/// Counts notifications, handy for asserting on feedback in tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counter {
    pub fired: usize,
}

impl ErrorFeedback for Counter {
    fn mistake(&mut self) {
        self.fired += 1;
    }
}

/// Wraps a feedback sink and drops calls that follow the last fired one
/// within [`THROTTLE_WINDOW`].
#[derive(Clone, Debug)]
pub struct Throttled<F> {
    inner: F,
    window: Duration,
    last_fired: Option<Instant>,
}

impl<F: ErrorFeedback> Throttled<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            window: THROTTLE_WINDOW,
            last_fired: None,
        }
    }

    /// Fires at an explicit instant. Returns whether the inner sink was called.
    pub fn mistake_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_fired {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_fired = Some(now);
        self.inner.mistake();
        true
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: ErrorFeedback> ErrorFeedback for Throttled<F> {
    fn mistake(&mut self) {
        self.mistake_at(Instant::now());
    }
}

impl<F: ErrorFeedback + ?Sized> ErrorFeedback for Box<F> {
    fn mistake(&mut self) {
        (**self).mistake()
    }
}
