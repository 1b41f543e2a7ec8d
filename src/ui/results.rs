use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::scoring::Results;

fn stat(label: &str, value: String, value_style: Style) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            label.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(value, value_style.add_modifier(Modifier::BOLD))),
    ])
    .alignment(Alignment::Center)
}

/// Results panel shown once a session has finished
pub fn render_results(results: &Results, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Results ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[0]);

    stat("WPM", results.wpm.to_string(), Style::default().fg(Color::Magenta)).render(columns[0], buf);
    stat("Accuracy", format!("{}%", results.accuracy), Style::default()).render(columns[1], buf);
    stat("Errors", results.errors.to_string(), Style::default().fg(Color::Red)).render(columns[2], buf);

    Paragraph::new(Span::styled(
        "(tab) try again / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(rows[2], buf);
}
