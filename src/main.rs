mod ui;

use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::{mpsc::Sender, Arc, Mutex},
    thread,
    time::{Duration, Instant},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use tracing::{info, warn};
use typedash::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, DurationOption, FileConfigStore},
    controller::{KeyOutcome, SessionController, TickOutcome},
    feedback::{Beep, ErrorFeedback, Silent, Throttled},
    logging,
    report::{BrowserSink, MemorySink, ReportSink},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    text_source::{EmbeddedParagraphs, FixedText, ParagraphFile, TextSource},
    timer::Metronome,
};
use webbrowser::Browser;

const TICK_RATE_MS: u64 = 100;

/// timed typing test for the terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A timed typing test: pick a duration, type the paragraph, and get accuracy and words-per-minute when the countdown ends or the text is done."
)]
pub struct Cli {
    /// start right away with this test length (a menu label such as 15, 30, 60 or 3)
    #[clap(short = 'd', long)]
    duration: Option<String>,

    /// custom text to type instead of a random paragraph
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// JSON file of the form {"paragraphs": [...]} to draw texts from
    #[clap(long)]
    paragraphs: Option<PathBuf>,

    /// do not beep on mistakes
    #[clap(long)]
    mute: bool,

    /// open <URL>/results?... in the browser when a test ends
    #[clap(long)]
    report_url: Option<String>,

    /// read settings from this file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// append logs to this file instead of the default location
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command line flags win over the config file
    fn apply(&self, mut config: Config) -> Config {
        if self.duration.is_some() {
            config.default_duration = self.duration.clone();
        }
        if self.mute {
            config.sound = false;
        }
        if self.report_url.is_some() {
            config.report_base_url = self.report_url.clone();
        }
        if self.paragraphs.is_some() {
            config.paragraphs_path = self.paragraphs.clone();
        }
        config
    }

    fn text_source(&self, config: &Config) -> typedash::Result<Box<dyn TextSource>> {
        if let Some(prompt) = &self.prompt {
            return Ok(Box::new(FixedText(prompt.clone())));
        }
        if let Some(path) = &config.paragraphs_path {
            return Ok(Box::new(ParagraphFile::new(path)));
        }
        Ok(Box::new(EmbeddedParagraphs::new()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Menu,
    Loading,
    Typing,
    Results,
}

/// What the event loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    None,
    LoadText,
    Quit,
}

type Sink = (MemorySink, Option<BrowserSink>);

fn fetch_paragraph(source: &Mutex<Box<dyn TextSource>>) -> typedash::Result<String> {
    match source.lock() {
        Ok(mut source) => source.paragraph(),
        Err(_) => Err(typedash::Error::NoParagraphs {
            source_name: "poisoned text source".to_string(),
        }),
    }
}

pub struct App {
    pub config: Config,
    pub state: AppState,
    pub menu_index: usize,
    pub selected: Option<DurationOption>,
    pub notice: Option<String>,
    pub controller: SessionController<Box<dyn ErrorFeedback>, Sink>,
    metronome: Metronome,
    text_source: Arc<Mutex<Box<dyn TextSource>>>,
    load_request: u64,
}

impl App {
    pub fn new(config: Config, text_source: Box<dyn TextSource>) -> Self {
        let beep = if config.sound { Beep::try_new() } else { None };
        let feedback: Box<dyn ErrorFeedback> = match beep {
            Some(beep) => Box::new(Throttled::new(beep)),
            None => Box::new(Silent),
        };
        let browser = config.report_base_url.clone().map(BrowserSink::new);

        Self {
            config,
            state: AppState::Menu,
            menu_index: 0,
            selected: None,
            notice: None,
            controller: SessionController::new(feedback, (MemorySink::default(), browser)),
            metronome: Metronome::per_second(),
            text_source: Arc::new(Mutex::new(text_source)),
            load_request: 0,
        }
    }

    /// Picks the duration at `idx` in the menu and waits for text
    pub fn choose_duration(&mut self, idx: usize) -> bool {
        let Some(option) = self.config.durations.get(idx).cloned() else {
            return false;
        };
        info!(label = %option.label, seconds = option.seconds, "duration selected");
        self.menu_index = idx;
        self.controller.select_duration(option.seconds);
        self.selected = Some(option);
        self.notice = None;
        self.metronome.stop();
        self.load_request += 1;
        self.state = AppState::Loading;
        true
    }

    pub fn choose_duration_label(&mut self, label: &str) -> typedash::Result<()> {
        self.config.duration(label)?;
        let idx = self
            .config
            .durations
            .iter()
            .position(|d| d.label == label)
            .unwrap_or_default();
        self.choose_duration(idx);
        Ok(())
    }

    /// Fetches a paragraph on a background thread. The answer comes back as
    /// an [`AppEvent::TextLoaded`] tagged with the current request.
    fn spawn_text_load(&self, tx: Sender<AppEvent>) {
        let source = Arc::clone(&self.text_source);
        let request = self.load_request;
        thread::spawn(move || {
            let text = fetch_paragraph(&source);
            let _ = tx.send(AppEvent::TextLoaded { request, text });
        });
    }

    /// Loads text on the calling thread
    pub fn load_text_now(&mut self) {
        let text = fetch_paragraph(&self.text_source);
        self.on_text_loaded(self.load_request, text);
    }

    pub fn on_text_loaded(&mut self, request: u64, text: typedash::Result<String>) {
        if request != self.load_request || self.state != AppState::Loading {
            info!(request, "discarding stale text");
            return;
        }
        let started = text.and_then(|t| self.controller.text_ready(&t));
        match started {
            Ok(()) => self.state = AppState::Typing,
            Err(err) => {
                self.controller.text_failed(&err);
                self.notice = Some(format!("could not load text: {err}"));
                self.state = AppState::Menu;
            }
        }
    }

    pub fn on_char(&mut self, c: char, now: Instant) {
        if self.state != AppState::Typing {
            return;
        }
        let outcome = self.controller.keystroke(c.encode_utf8(&mut [0; 4]));
        if self
            .controller
            .session()
            .is_some_and(|s| s.has_started())
        {
            self.metronome.start(now);
        }
        if let KeyOutcome::Completed(_) = outcome {
            self.finish();
        }
    }

    pub fn on_backspace(&mut self) {
        if self.state == AppState::Typing {
            self.controller.backspace();
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.state != AppState::Typing {
            return;
        }
        for _ in 0..self.metronome.due(now) {
            if let TickOutcome::Expired(_) = self.controller.tick() {
                self.finish();
                break;
            }
        }
    }

    fn finish(&mut self) {
        self.metronome.stop();
        self.state = AppState::Results;
    }

    pub fn restart(&mut self) -> bool {
        self.choose_duration(self.menu_index)
    }

    pub fn to_menu(&mut self) {
        self.controller.reset();
        self.metronome.stop();
        self.selected = None;
        self.state = AppState::Menu;
    }

    fn open_results_page(&mut self) {
        let Some(base) = self.config.report_base_url.clone() else {
            return;
        };
        let Some(report) = self.controller.session().and_then(|s| s.report()).copied() else {
            return;
        };
        if Browser::is_available() {
            if let Err(err) = BrowserSink::new(base).deliver(&report) {
                warn!(%err, "could not open results page");
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::None;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return KeyAction::Quit;
        }

        match self.state {
            AppState::Menu => match key.code {
                KeyCode::Up | KeyCode::Left => {
                    self.menu_index = self.menu_index.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Right => {
                    if self.menu_index + 1 < self.config.durations.len() {
                        self.menu_index += 1;
                    }
                }
                KeyCode::Enter => {
                    if self.choose_duration(self.menu_index) {
                        return KeyAction::LoadText;
                    }
                }
                KeyCode::Char(c) => {
                    let picked = c
                        .to_digit(10)
                        .and_then(|d| (d as usize).checked_sub(1))
                        .is_some_and(|idx| self.choose_duration(idx));
                    if picked {
                        return KeyAction::LoadText;
                    }
                }
                _ => {}
            },
            // Typing before the text is there is dropped on purpose
            AppState::Loading => {}
            AppState::Typing => match key.code {
                KeyCode::Backspace => self.on_backspace(),
                KeyCode::Char(c) => self.on_char(c, now),
                _ => {}
            },
            AppState::Results => match key.code {
                KeyCode::Char('r') => {
                    if self.restart() {
                        return KeyAction::LoadText;
                    }
                }
                KeyCode::Char('m') => self.to_menu(),
                KeyCode::Char('o') => self.open_results_page(),
                _ => {}
            },
        }
        KeyAction::None
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        // Running without logs beats not running at all
        let _ = logging::init_file_logging(&log_path);
    }

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let stored = store.load();
    if !store.exists() {
        if let Err(err) = store.save(&stored) {
            warn!(%err, path = %store.path().display(), "could not write default config");
        }
    }
    let config = cli.apply(stored);

    let text_source = match cli.text_source(&config) {
        Ok(source) => source,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };

    let mut app = App::new(config, text_source);
    if let Some(label) = app.config.default_duration.clone() {
        if let Err(err) = app.choose_duration_label(&label) {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
        app.load_text_now();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let source = CrosstermEventSource::new();
    let tx = source.sender();
    let mut runner = Runner::new(source, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => {}
            AppEvent::TextLoaded { request, text } => app.on_text_loaded(request, text),
            AppEvent::Key(key) => match app.handle_key(key, Instant::now()) {
                KeyAction::None => {}
                KeyAction::LoadText => app.spawn_text_load(tx.clone()),
                KeyAction::Quit => break,
            },
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    ui::screen::current_screen(&app.state).render(app, f);
}
