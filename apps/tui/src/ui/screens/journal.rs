use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::ui::widgets::tables::scroll_offset;

pub fn render_journal(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Entry table
            Constraint::Length(8), // Selected entry detail
            Constraint::Length(1), // Hints
        ])
        .split(f.area().inner(Margin::new(2, 1)))
        .to_vec();

    render_entry_table(app, f, chunks[0]);
    render_entry_detail(app, f, chunks[1]);

    let hint = "↑/↓ select   n new entry   Home/End jump   Esc/q back";
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn render_entry_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Moon Journal ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.journal.is_empty() {
        let inner = area.inner(Margin::new(1, 1));
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new("No entries yet. Press n to write one.")
                .style(Style::default().fg(Color::Gray)),
            inner,
        );
        return;
    }

    let visible = usize::from(area.height).saturating_sub(3).max(1);
    let offset = scroll_offset(app.journal.len(), visible, app.selected_entry_index);

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Phase"),
        Cell::from("Mood"),
        Cell::from("Activities"),
    ])
    .style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::UNDERLINED),
    );

    let rows = app
        .journal
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, entry)| {
            let style = if index == app.selected_entry_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(entry.entry_date.clone()),
                Cell::from(entry.phase.clone()),
                Cell::from(entry.mood.clone()),
                Cell::from(entry.activities.clone()),
            ])
            .style(style)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

fn render_entry_detail(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Entry ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = area.inner(Margin::new(1, 1));
    f.render_widget(block, area);

    let Some(entry) = app.journal.get(app.selected_entry_index) else {
        return;
    };

    let detail_line = |label: &str, value: &str| {
        TextLine::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ])
    };

    let lines = vec![
        detail_line("Reflections", &entry.reflections),
        detail_line("Goals", &entry.goals),
    ];

    f.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        inner,
    );
}
