pub mod results;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, DURATIONS},
    highlight::{classify, CharClass},
    session::{Mode, Status},
    snippets::Language,
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const RESULTS_HEIGHT: u16 = 6;
const WAITING_MESSAGE: &str = "Start typing to begin";
const NEWLINE_SYMBOL: &str = "↵";

pub fn style_for(class: CharClass) -> Style {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    match class {
        CharClass::Untouched => Style::default().add_modifier(Modifier::DIM),
        CharClass::Correct => bold_style.fg(Color::Green),
        CharClass::Incorrect => bold_style.fg(Color::Red).bg(Color::Rgb(60, 20, 20)),
        CharClass::Cursor => bold_style
            .fg(Color::Yellow)
            .add_modifier(Modifier::UNDERLINED),
    }
}

/// Turn a classified snippet into lines. Newlines render as a visible marker
/// followed by the actual break.
pub fn snippet_lines(snippet: &str, classes: &[CharClass]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans = Vec::new();

    for (c, class) in snippet.chars().zip(classes.iter().copied()) {
        let style = style_for(class);
        match c {
            '\n' => {
                spans.push(Span::styled(NEWLINE_SYMBOL, style));
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            ' ' if class == CharClass::Incorrect => spans.push(Span::styled("·", style)),
            c => spans.push(Span::styled(c.to_string(), style)),
        }
    }
    lines.push(Line::from(spans));

    lines
}

/// Row the cursor lands on when the snippet is laid out `width` columns wide.
/// Long lines are counted as wrapping at the column limit.
fn cursor_row(snippet: &str, typed_len: usize, width: u16) -> usize {
    let width = usize::from(width.max(1));
    let before: String = snippet.chars().take(typed_len).collect();
    let mut lines = before.split('\n');
    let current = lines.next_back().unwrap_or_default();

    // each finished line also carries the newline marker
    let above: usize = lines.map(|line| (line.width() + 1).div_ceil(width)).sum();
    above + current.width() / width
}

/// Lines to scroll so that `row` is the last visible one once it would fall
/// below a panel `height` rows tall
fn scroll_offset(row: usize, height: u16) -> u16 {
    let height = usize::from(height.max(1));
    u16::try_from((row + 1).saturating_sub(height)).unwrap_or(u16::MAX)
}

fn choice(label: String, active: bool) -> Span<'static> {
    if active {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
    } else {
        Span::styled(label, Style::default().add_modifier(Modifier::DIM))
    }
}

fn choices<T, I, F>(items: I, current: T, label: F) -> Vec<Span<'static>>
where
    T: PartialEq,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> String,
{
    items
        .into_iter()
        .flat_map(|item| {
            let active = item == current;
            [choice(format!(" {} ", label(&item)), active), Span::raw(" ")]
        })
        .collect()
}

fn controls_line(app: &App) -> Line<'static> {
    let settings = app.settings();
    let key_style = Style::default().fg(Color::Magenta);

    let mut spans = vec![Span::styled("^T ", key_style)];
    spans.extend(choices([Mode::Time, Mode::Full], settings.mode, |m| {
        m.to_string()
    }));

    spans.push(Span::styled("  ^L ", key_style));
    spans.extend(choices(Language::ALL, settings.language, |l| l.to_string()));

    if settings.mode == Mode::Time {
        spans.push(Span::styled("  ^D ", key_style));
        spans.extend(choices(DURATIONS, settings.duration_secs, |d| {
            format!("{d}s")
        }));
    }

    Line::from(spans)
}

fn footer_line(app: &App) -> Line<'static> {
    let session = app.session();
    let timer = if session.status() == Status::Running && session.mode() == Mode::Time {
        format!("{:>4}", app.countdown().remaining_secs())
    } else {
        "    ".to_string()
    };

    Line::from(vec![
        Span::styled(
            timer,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" → next test   "),
        Span::styled("^R", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" reset   "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ])
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session();
        let finished = session.is_finished();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(if finished { RESULTS_HEIGHT } else { 0 }),
            ])
            .split(area);

        Paragraph::new(vec![
            Line::from(Span::styled(
                "CodeType",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "How fast can you code?",
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        Paragraph::new(controls_line(self))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let classes = classify(session.snippet(), session.typed(), session.status());
        let snippet_area = chunks[2];
        let snippet_block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", session.language()));
        let inner = snippet_block.inner(snippet_area);
        let row = cursor_row(session.snippet(), session.typed_len(), inner.width);
        Paragraph::new(snippet_lines(session.snippet(), &classes))
            .block(snippet_block)
            .wrap(Wrap { trim: false })
            .scroll((scroll_offset(row, inner.height), 0))
            .render(snippet_area, buf);

        if session.status() == Status::Waiting {
            let overlay = centered(snippet_area, WAITING_MESSAGE.width() as u16 + 4, 3);
            Clear.render(overlay, buf);
            Paragraph::new(Span::styled(
                WAITING_MESSAGE,
                Style::default().add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            ))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .render(overlay, buf);
        }

        Paragraph::new(footer_line(self)).render(chunks[3], buf);

        if let Some(results) = session.results() {
            results::render_results(&results, chunks[4], buf);
        }
    }
}
