use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::state::RenderState;
use crate::app::App;
use crate::domain::{format_event_time, format_illumination, format_position};
use crate::ui::widgets::moon;
use crate::ui::widgets::popup::{centered_rect, tooltip_placement, ClearWidget};
use crate::ui::widgets::tables::scroll_offset;

pub fn render_dashboard(app: &mut App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title area
            Constraint::Min(8),    // Panels
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)))
        .to_vec();

    render_title_section(app, f, chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_current_moon(app, f, panels[0]);
    let focused_row = render_gates(app, f, panels[1]);

    render_status_section(app, f, chunks[2]);
    render_shortcuts(f, chunks[3]);

    render_tooltip_overlay(app, f, focused_row);

    if app.show_help {
        render_help_popup(f);
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title("== Moon & Gates ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(title_block, area);

    let title_inner = area.inner(Margin::new(1, 1));
    let title_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(title_inner);

    let title_paragraph = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Moon ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "& Gates Dashboard",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(title_paragraph, title_chunks[0]);

    moon::render_badge(app, f, title_chunks[1]);
}

fn info_line(label: &str, value: &str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            value.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_current_moon(app: &mut App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Current Moon ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = area.inner(Margin::new(1, 1));
    f.render_widget(block, area);

    match app.render_state.clone() {
        RenderState::Loading => {
            render_spinner(app, f, inner, "Fetching moon data...");
        }
        RenderState::Error(msg) => {
            let lines = vec![
                TextLine::from(Span::styled(
                    "⚠ Error",
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )),
                TextLine::from(""),
                TextLine::from(Span::raw(msg)),
                TextLine::from(""),
                TextLine::from(Span::styled(
                    "Press r to retry.",
                    Style::default().fg(Color::Gray),
                )),
            ];
            f.render_widget(
                Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
                inner,
            );
        }
        RenderState::Loaded { moon, position } => {
            let moon_name = if moon.moon_names.is_empty() {
                "—".to_string()
            } else {
                moon.moon_names.join(", ")
            };

            let lines = vec![
                info_line("Moon Name", &moon_name),
                info_line("Phase", &moon.phase_name),
                info_line("Illumination", &format_illumination(moon.illumination)),
                info_line(
                    "Position",
                    &format_position(&position.gate, &position.zodiac_sign, position.degree),
                ),
                TextLine::from(""),
                TextLine::from(Span::styled(
                    format!("assets/images/{}", moon.image_asset()),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            f.render_widget(
                Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
                inner,
            );
        }
    }
}

fn render_spinner(app: &mut App, f: &mut Frame<'_>, area: Rect, label: &str) {
    let spinner_area = Rect {
        height: area.height.min(1),
        ..area
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .label(label.to_string())
        .style(Style::default().fg(Color::Cyan));
    f.render_stateful_widget(throbber, spinner_area, &mut app.throbber);
}

/// Paints the gates panel and reports the on-screen rect of the
/// focused gate row so the tooltip overlay can anchor to it.
fn render_gates(app: &mut App, f: &mut Frame<'_>, area: Rect) -> Option<Rect> {
    let block = Block::default()
        .title(" Gate Changes ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = area.inner(Margin::new(1, 1));
    f.render_widget(block, area);

    let state = app.render_state.clone();
    match state {
        RenderState::Loading => {
            render_spinner(app, f, inner, "Updating gates...");
            None
        }
        RenderState::Error(_) => {
            f.render_widget(
                Paragraph::new("—").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            None
        }
        RenderState::Loaded { position, .. } => {
            if position.upcoming.is_empty() {
                f.render_widget(
                    Paragraph::new("No upcoming gates available")
                        .style(Style::default().fg(Color::Gray))
                        .alignment(Alignment::Center),
                    inner,
                );
                return None;
            }

            let mut lines: Vec<TextLine<'_>> = Vec::new();
            let mut focused_rect = None;

            let mut push_gate_row = |lines: &mut Vec<TextLine<'_>>,
                                     index: usize,
                                     is_next: bool|
             -> Option<Rect> {
                let event = position.upcoming.get(index)?;
                let focused = app.focused_gate == Some(index);

                let marker = if focused { "▶ " } else { "  " };
                let name_style = if is_next {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else if focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let row_y = inner.y + u16::try_from(lines.len()).ok()?;
                lines.push(TextLine::from(vec![
                    Span::styled(marker.to_string(), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("Gate {}", event.gate), name_style),
                    Span::styled(
                        format!("  {}", format_event_time(&event.at)),
                        Style::default().fg(Color::Gray),
                    ),
                ]));

                focused.then_some(Rect {
                    x: inner.x,
                    y: row_y,
                    width: inner.width,
                    height: 1,
                })
            };

            lines.push(TextLine::from(Span::styled(
                "Next Gate",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::UNDERLINED),
            )));
            if let Some(rect) = push_gate_row(&mut lines, 0, true) {
                focused_rect = Some(rect);
            }

            let later_count = position.upcoming.len().saturating_sub(1);
            if later_count > 0 {
                lines.push(TextLine::from(""));
                lines.push(TextLine::from(Span::styled(
                    "Upcoming Gate Changes",
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::UNDERLINED),
                )));

                let visible = usize::from(inner.height).saturating_sub(lines.len());
                let focused_later = app
                    .focused_gate
                    .and_then(|index| index.checked_sub(1))
                    .unwrap_or(0);
                let offset = scroll_offset(later_count, visible.max(1), focused_later);

                for index in (1 + offset)..position.upcoming.len() {
                    if lines.len() >= usize::from(inner.height) {
                        break;
                    }
                    if let Some(rect) = push_gate_row(&mut lines, index, false) {
                        focused_rect = Some(rect);
                    }
                }
            }

            f.render_widget(Paragraph::new(Text::from(lines)), inner);
            focused_rect
        }
    }
}

fn render_tooltip_overlay(app: &App, f: &mut Frame<'_>, focused_row: Option<Rect>) {
    let Some(target) = app.tooltip.visible_target() else {
        return;
    };
    if app.focused_gate != Some(target) {
        return;
    }
    let (Some(trigger), Some(text)) = (focused_row, app.gate_tooltip(target)) else {
        return;
    };
    let Some(gate_name) = app.gate_name_at(target) else {
        return;
    };

    let viewport = f.area();
    let width = u16::try_from(text.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .clamp(16, 44);
    let text_rows = u16::try_from(text.chars().count())
        .unwrap_or(u16::MAX)
        .div_ceil(width.saturating_sub(2).max(1));
    let height = text_rows.saturating_add(2).clamp(3, 9);

    let placement = tooltip_placement(trigger, width, height, viewport);

    f.render_widget(ClearWidget, placement.rect);
    let block = Block::default()
        .title(format!(" Gate {gate_name} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(
        Paragraph::new(text.to_string())
            .block(block)
            .wrap(Wrap { trim: true }),
        placement.rect,
    );

    // Pointer marker aimed at the trigger's center, drawn over the
    // border row facing the trigger
    let (glyph, marker_y) = if placement.above {
        ("▼", placement.rect.y + placement.rect.height - 1)
    } else {
        ("▲", placement.rect.y)
    };
    let marker_rect = Rect {
        x: placement.rect.x + placement.pointer_col,
        y: marker_y,
        width: 1,
        height: 1,
    };
    f.render_widget(
        Paragraph::new(glyph).style(Style::default().fg(Color::Yellow)),
        marker_rect,
    );
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = area.inner(Margin::new(1, 1));
    f.render_widget(block, area);

    let updated = app.last_updated.map_or_else(
        || "never".to_string(),
        |at| at.format("%I:%M:%S %p").to_string(),
    );

    let mut spans = vec![
        Span::styled("Last updated: ", Style::default().fg(Color::Gray)),
        Span::styled(updated, Style::default().fg(Color::White)),
        Span::styled(
            format!("   Gates requested: {}", app.gate_count),
            Style::default().fg(Color::Gray),
        ),
    ];

    if !app.status_message.is_empty() {
        spans.push(Span::styled(
            format!("   {}", app.status_message),
            Style::default().fg(Color::Cyan),
        ));
    }

    f.render_widget(Paragraph::new(TextLine::from(spans)), inner);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let hint = "r refresh   +/- gate count   ↑/↓ focus gate   j journal   n new entry   F1 help   q quit";
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_help_popup(f: &mut Frame<'_>) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(ClearWidget, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = vec![
        TextLine::from("r       refresh now"),
        TextLine::from("+ / -   change the desired gate count (1-128)"),
        TextLine::from("↑ / ↓   focus a gate; its tooltip opens shortly"),
        TextLine::from("PgUp/Dn scroll the gate list"),
        TextLine::from("Esc     drop focus / close this help"),
        TextLine::from("j       open the moon journal"),
        TextLine::from("n       write a journal entry"),
        TextLine::from("q       quit"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Data refreshes automatically every 10 minutes.",
            Style::default().fg(Color::Gray),
        )),
    ];

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
