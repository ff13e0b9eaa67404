pub mod screen;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use typedash::board::{LetterBoard, LetterState};
use typedash::controller::SessionState;
use typedash::report::ResultsReport;
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
/// Menu entries past this one have no digit key
const MAX_DIGIT_OPTIONS: usize = 9;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

/// Vertically centres `rows` lines of content inside `area`
fn centered_rows(area: Rect, rows: &[u16]) -> Vec<Rect> {
    let content: u16 = rows.iter().sum();
    let pad = area.height.saturating_sub(content) / 2;

    let mut constraints = vec![Constraint::Length(pad)];
    constraints.extend(rows.iter().map(|r| Constraint::Length(*r)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(constraints)
        .split(area);
    chunks[1..=rows.len()].to_vec()
}

fn menu_legend(options: usize) -> String {
    match options.min(MAX_DIGIT_OPTIONS) {
        0 => "(esc)ape".to_string(),
        1 => "(1) or (enter) choose a test / (esc)ape".to_string(),
        n => format!("(1-{n}) or (↑/↓ enter) choose a test / (esc)ape"),
    }
}

pub fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let options = &app.config.durations;
    let chunks = centered_rows(area, &[1, 1, options.len() as u16, 1, 1, 1]);

    Paragraph::new(Span::styled("typedash", bold().fg(Color::Magenta)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let text = format!("[{}] {} {}", idx + 1, option.label, option.caption);
            if idx == app.menu_index {
                Line::from(Span::styled(
                    format!("> {text} <"),
                    bold().fg(Color::Yellow),
                ))
            } else {
                Line::from(Span::styled(text, dim_bold()))
            }
        })
        .collect();
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(notice.as_str(), bold().fg(Color::Red)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);
    }

    legend(&menu_legend(options.len())).render(chunks[5], buf);
}

pub fn render_loading(area: Rect, buf: &mut Buffer) {
    let chunks = centered_rows(area, &[1]);
    Paragraph::new(Span::styled("loading text…", dim_bold()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);
}

fn letter_span(
    session: &SessionState,
    idx: usize,
    expected: char,
    now: Instant,
) -> Span<'static> {
    let board = session.board();
    let cursor = session.cursor();

    match board.letter_state(idx) {
        LetterState::Correct => Span::styled(expected.to_string(), bold().fg(Color::Green)),
        LetterState::Incorrect => {
            let shown = if expected == ' ' {
                "·".to_string()
            } else {
                expected.to_string()
            };
            let mut style = bold().fg(Color::Red);
            if board.is_shaking(idx, now) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(shown, style)
        }
        LetterState::Unmarked if idx == cursor => Span::styled(
            expected.to_string(),
            dim_bold().add_modifier(Modifier::UNDERLINED),
        ),
        LetterState::Unmarked => Span::styled(expected.to_string(), dim_bold()),
    }
}

pub fn render_typing(app: &App, area: Rect, buf: &mut Buffer, now: Instant) {
    let Some(session) = app.controller.session() else {
        render_loading(area, buf);
        return;
    };

    let text: String = session.board().sequence().chars().iter().collect();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let fits_one_line = text.width() <= max_chars_per_line as usize;
    let prompt_lines = if fits_one_line {
        1
    } else {
        (text.width() as f64 / max_chars_per_line as f64).ceil() as u16 + 1
    };

    let chunks = centered_rows(area, &[1, 1, prompt_lines, 1, 1]);

    let countdown = session.countdown();
    let header = if session.has_started() {
        format!("{}", countdown.remaining_secs())
    } else {
        match &app.selected {
            Some(option) => format!("{} {} · start typing", option.label, option.caption),
            None => "start typing".to_string(),
        }
    };
    Paragraph::new(Span::styled(header, dim_bold()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let spans: Vec<Span> = session
        .board()
        .sequence()
        .chars()
        .iter()
        .enumerate()
        .map(|(idx, c)| letter_span(session, idx, *c, now))
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(if fits_one_line {
            // a short prompt looks calmer centred
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false })
        .render(chunks[2], buf);

    legend("(backspace) undo / (esc)ape").render(chunks[4], buf);
}

fn results_lines(report: &ResultsReport) -> Vec<Line<'static>> {
    let record = report.record();
    vec![
        Line::from(vec![
            Span::styled(format!("{} wpm", report.wpm), bold().fg(Color::Magenta)),
            Span::raw("   "),
            Span::styled(format!("{}% acc", report.accuracy), bold()),
            Span::raw("   "),
            Span::styled(format!("{}s", report.elapsed_secs), bold()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{} correct", report.correct_chars),
                bold().fg(Color::Green),
            ),
            Span::raw(" / "),
            Span::styled(
                format!("{} incorrect", report.incorrect_chars),
                bold().fg(Color::Red),
            ),
        ]),
        Line::from(Span::styled(
            format!("score {:.1}", record.score()),
            dim_bold(),
        )),
    ]
}

pub fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(report) = app.controller.session().and_then(|s| s.report()) else {
        render_loading(area, buf);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(results_lines(report))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let keys = if app.config.report_base_url.is_some() {
        "(r)estart / (m)enu / (o)pen results page / (esc)ape"
    } else {
        "(r)estart / (m)enu / (esc)ape"
    };
    legend(keys).render(chunks[3], buf);
}
