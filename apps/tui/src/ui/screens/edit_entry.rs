use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::state::{EditEntryState, EntryField};
use crate::app::App;
use crate::ui::widgets::popup::ClearWidget;

pub fn render_edit_entry(app: &App, f: &mut Frame<'_>) {
    let Some(form) = app.edit_entry.as_ref() else {
        return;
    };

    let area = form_rect(f.area());
    f.render_widget(ClearWidget, area);

    let block = Block::default()
        .title(" New Journal Entry ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = area.inner(Margin::new(2, 1));
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Date
            Constraint::Length(1), // Phase
            Constraint::Length(1),
            Constraint::Length(1), // Mood
            Constraint::Length(1), // Activities
            Constraint::Length(1), // Reflections
            Constraint::Length(1), // Goals
            Constraint::Length(1),
            Constraint::Length(1), // Save
            Constraint::Min(1),    // Help line
        ])
        .split(inner)
        .to_vec();

    f.render_widget(readonly_row("Date", &form.entry_date), rows[0]);
    f.render_widget(readonly_row("Phase", &form.phase), rows[1]);

    f.render_widget(field_row(form, EntryField::Mood, "Mood", &form.mood), rows[3]);
    f.render_widget(
        field_row(form, EntryField::Activities, "Activities", &form.activities),
        rows[4],
    );
    f.render_widget(
        field_row(form, EntryField::Reflections, "Reflections", &form.reflections),
        rows[5],
    );
    f.render_widget(field_row(form, EntryField::Goals, "Goals", &form.goals), rows[6]);

    let save_style = if form.field == EntryField::Save {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    f.render_widget(
        Paragraph::new(Span::styled(" [ Save ] ", save_style)).alignment(Alignment::Center),
        rows[8],
    );

    let help = if form.editing {
        "Type to edit, Enter to finish the field, Esc to cancel"
    } else {
        "Tab/↓ next field, Enter to edit or save, Esc to cancel"
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[9],
    );
}

fn readonly_row<'a>(label: &str, value: &'a str) -> Paragraph<'a> {
    Paragraph::new(TextLine::from(vec![
        Span::styled(
            format!("{label:<12}"),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(value, Style::default().fg(Color::DarkGray)),
    ]))
}

fn field_row<'a>(
    form: &EditEntryState,
    field: EntryField,
    label: &str,
    value: &'a str,
) -> Paragraph<'a> {
    let active = form.field == field;
    let label_style = if active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value_style = if active && form.editing {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else if active {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let marker = if active { "> " } else { "  " };
    let shown = if active && form.editing {
        format!("{value}█")
    } else {
        value.to_string()
    };

    Paragraph::new(TextLine::from(vec![
        Span::styled(format!("{marker}{label:<10}"), label_style),
        Span::styled(shown, value_style),
    ]))
}

fn form_rect(viewport: Rect) -> Rect {
    let width = viewport.width.min(64);
    let height = viewport.height.min(14);
    Rect {
        x: viewport.x + (viewport.width.saturating_sub(width)) / 2,
        y: viewport.y + (viewport.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
