use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use typeflow::{
    evaluator::Cell,
    session::{SessionMode, SessionResult},
    theme::Palette,
};
use unicode_width::UnicodeWidthChar;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
/// Lines of target text shown while typing
const VISIBLE_LINES: usize = 3;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.theme.palette();
        Block::default()
            .style(Style::default().bg(palette.background))
            .render(area, buf);

        match self.state {
            AppState::Typing => render_typing(self, &palette, area, buf),
            AppState::Results => render_results(self, &palette, area, buf),
        }
    }
}

fn render_typing(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let accent_style = bold_style.fg(palette.accent);
    let dim_style = Style::default().fg(palette.pending);

    let text_height = VISIBLE_LINES as u16;
    let padding = area.height.saturating_sub(text_height + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(1), // header
            Constraint::Length(1), // live indicator
            Constraint::Length(text_height),
            Constraint::Min(0),
            Constraint::Length(1), // help
        ])
        .split(area);

    Paragraph::new(Span::styled(header(app), dim_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(live_indicator(app), accent_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let evaluator = app.session.evaluator();
    let chars = evaluator.target().chars();
    let width = chunks[3].width.max(1) as usize;
    let lines = line_ranges(chars, width);

    // keep the cursor on the first visible line once past the opening one
    let cursor = evaluator.cursor();
    let cursor_line = lines
        .iter()
        .position(|r| r.contains(&cursor))
        .unwrap_or(lines.len().saturating_sub(1));
    let first = cursor_line.saturating_sub(1);

    let text: Vec<Line> = lines
        .iter()
        .skip(first)
        .take(VISIBLE_LINES)
        .map(|range| {
            Line::from(
                range
                    .clone()
                    .map(|idx| cell_span(chars[idx], evaluator.cell(idx), palette))
                    .collect::<Vec<Span>>(),
            )
        })
        .collect();

    Paragraph::new(text).render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "esc quit · ctrl+r restart · tab mode · ctrl+d difficulty · ctrl+t theme",
        dim_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

fn render_results(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let accent_style = bold_style.fg(palette.accent);
    let dim_style = Style::default().fg(palette.pending);

    let Some(result) = app.session.result() else {
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} wpm", result.wpm), accent_style),
            Span::raw("   "),
            Span::styled(format!("{}% acc", result.accuracy), accent_style),
        ]),
        Line::default(),
        Line::from(Span::styled(summary(result), bold_style.fg(palette.current))),
    ];

    if let (Some(lesson), Some(passed)) = (app.lesson, app.lesson_passed) {
        let (message, color) = if passed {
            (format!("lesson {lesson} passed"), palette.correct)
        } else {
            (
                format!("lesson {lesson} needs 90% accuracy, try again"),
                palette.incorrect,
            )
        };
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(message, bold_style.fg(color))));
    }

    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled("(r)etry / (t)heme / (q)uit", dim_style))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}

fn header(app: &App) -> String {
    let config = app.session.config();
    let difficulty = config.difficulty;
    if let Some(lesson) = app.lesson {
        return format!("lesson {lesson} · {difficulty}");
    }
    match config.mode {
        SessionMode::Time { secs } => format!("time {secs}s · {difficulty}"),
        SessionMode::Words { count } => format!("words {count} · {difficulty}"),
        SessionMode::Practice => format!("practice · {difficulty}"),
    }
}

fn live_indicator(app: &App) -> String {
    let session = &app.session;
    match session.config().mode {
        SessionMode::Time { .. } => format!("{}s", session.time_left().unwrap_or(0)),
        SessionMode::Words { .. } => format!("{}%", session.progress_percent()),
        SessionMode::Practice => format!("{}% acc", session.live_accuracy()),
    }
}

fn summary(result: &SessionResult) -> String {
    format!(
        "{}/{} words · {} errors · {:.1}s",
        result.correct_words, result.total_words, result.errors, result.elapsed_secs
    )
}

fn cell_span(c: char, cell: Cell, palette: &Palette) -> Span<'static> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    match cell {
        Cell::Correct => Span::styled(c.to_string(), bold_style.fg(palette.correct)),
        Cell::Incorrect => Span::styled(
            match c {
                ' ' => "·".to_owned(),
                c => c.to_string(),
            },
            bold_style.fg(palette.incorrect),
        ),
        Cell::Current => Span::styled(
            c.to_string(),
            bold_style
                .fg(palette.current)
                .add_modifier(Modifier::UNDERLINED),
        ),
        Cell::Unseen => Span::styled(c.to_string(), Style::default().fg(palette.pending)),
    }
}

/// Greedy word wrap of `text` into lines at most `width` columns wide.
///
/// Trailing spaces stay on the line they end. A single word wider than
/// `width` gets a line of its own.
fn line_ranges(text: &[char], width: usize) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut line_width = 0;
    let mut idx = 0;

    while idx < text.len() {
        let end = text[idx..]
            .iter()
            .position(|c| *c == ' ')
            .map_or(text.len(), |p| idx + p + 1);
        let word_width: usize = text[idx..end].iter().map(|c| c.width().unwrap_or(0)).sum();
        // the trailing space may hang past the edge
        let visible = word_width - usize::from(text[end - 1] == ' ');

        if line_width > 0 && line_width + visible > width {
            lines.push(start..idx);
            start = idx;
            line_width = 0;
        }
        line_width += word_width;
        idx = end;
    }
    if start < text.len() {
        lines.push(start..text.len());
    }
    lines
}
