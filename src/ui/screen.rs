use std::time::Instant;

use ratatui::Frame;

use crate::{
    ui::{render_loading, render_menu, render_results, render_typing},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Duration picker
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_menu(app, area, f.buffer_mut());
    }
}

/// Shown while the text source is fetching a paragraph
pub struct LoadingScreen;

impl Screen for LoadingScreen {
    fn render(&self, _app: &App, f: &mut Frame) {
        let area = f.area();
        render_loading(area, f.buffer_mut());
    }
}

/// Typing screen - letters coloured by their state, countdown on top
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_typing(app, area, f.buffer_mut(), Instant::now());
    }
}

/// Results screen - final figures of the finished session
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_results(app, area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Menu => Box::new(MenuScreen),
        AppState::Loading => Box::new(LoadingScreen),
        AppState::Typing => Box::new(TypingScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
