use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};
use std::time::Instant;

use crate::app::state::{App, AppScreen, EditEntryState, EntryField};

pub async fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Journal => handle_journal_input(app, key),
        AppScreen::EditEntry => handle_edit_entry_input(app, key).await,
        AppScreen::Dashboard => handle_dashboard_input(app, key).await,
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

async fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    let now = Instant::now();

    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Char('r') => {
            app.wants_refresh = true;
            app.status_message = "Refreshing...".to_string();
        }
        KeyCode::Char('+' | '=') => {
            adjust_gate_count(app, 1).await;
        }
        KeyCode::Char('-') => {
            adjust_gate_count(app, -1).await;
        }
        KeyCode::Up => {
            app.move_gate_focus(-1, now);
        }
        KeyCode::Down => {
            app.move_gate_focus(1, now);
        }
        // Paging scrolls the gate list: a global dismissal event
        KeyCode::PageUp => {
            app.tooltip.dismiss();
            app.move_gate_focus(-5, now);
        }
        KeyCode::PageDown => {
            app.tooltip.dismiss();
            app.move_gate_focus(5, now);
        }
        KeyCode::Esc => {
            app.clear_gate_focus(now);
        }
        KeyCode::Char('j') => {
            open_journal(app).await;
        }
        KeyCode::Char('n') => {
            open_entry_form(app);
        }
        // Anything else counts as an outside interaction
        _ => {
            app.tooltip.dismiss();
        }
    }
}

async fn adjust_gate_count(app: &mut App, delta: i64) {
    let requested = i64::from(app.gate_count) + delta;

    // Persist first, then refetch with the stored value
    match app.actions.set_gate_count(requested).await {
        Ok(stored) => {
            app.gate_count = stored;
            app.wants_refresh = true;
            app.status_message = format!("Gate count set to {stored}");
        }
        Err(e) => {
            eprintln!("Failed to persist gate count: {e}");
            app.status_message = "Could not save gate count".to_string();
        }
    }
}

async fn open_journal(app: &mut App) {
    app.tooltip.dismiss();
    match app.actions.journal_entries().await {
        Ok(entries) => {
            app.journal = entries;
            app.selected_entry_index = 0;
            app.screen = AppScreen::Journal;
        }
        Err(e) => {
            eprintln!("Failed to load journal: {e}");
            app.status_message = "Journal unavailable".to_string();
        }
    }
}

fn open_entry_form(app: &mut App) {
    app.tooltip.dismiss();
    let phase = app.current_phase_name().to_string();
    app.edit_entry = Some(EditEntryState::for_today(&phase));
    app.screen = AppScreen::EditEntry;
}

fn handle_journal_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.screen = AppScreen::Dashboard;
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Up => {
            if app.selected_entry_index > 0 {
                app.selected_entry_index -= 1;
            }
        }
        KeyCode::Down => {
            if !app.journal.is_empty() && app.selected_entry_index < app.journal.len() - 1 {
                app.selected_entry_index += 1;
            }
        }
        KeyCode::Home => {
            app.selected_entry_index = 0;
        }
        KeyCode::End => {
            if !app.journal.is_empty() {
                app.selected_entry_index = app.journal.len() - 1;
            }
        }
        KeyCode::Char('n') => {
            open_entry_form(app);
        }
        _ => {}
    }
}

async fn handle_edit_entry_input(app: &mut App, key: KeyCode) {
    let Some(mut form) = app.edit_entry.take() else {
        app.screen = AppScreen::Dashboard;
        return;
    };

    match key {
        KeyCode::Esc => {
            if form.editing {
                form.editing = false;
                app.edit_entry = Some(form);
            } else {
                // Discard the draft
                app.screen = AppScreen::Journal;
            }
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            if !form.editing {
                form.field = form.field.next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if !form.editing {
                form.field = form.field.prev();
            }
        }
        KeyCode::Enter => {
            if form.field == EntryField::Save {
                save_entry(app, &form).await;
                return;
            }
            form.editing = !form.editing;
        }
        KeyCode::Char(c) => {
            if form.editing {
                if let Some(value) = form.field_value_mut() {
                    value.push(c);
                }
            }
        }
        KeyCode::Backspace => {
            if form.editing {
                if let Some(value) = form.field_value_mut() {
                    value.pop();
                }
            }
        }
        _ => {}
    }

    app.edit_entry = Some(form);
}

async fn save_entry(app: &mut App, form: &EditEntryState) {
    match app.actions.insert_journal_entry(&form.to_params()).await {
        Ok(()) => {
            app.status_message = "Journal entry saved".to_string();
            if let Ok(entries) = app.actions.journal_entries().await {
                app.journal = entries;
            }
            app.selected_entry_index = 0;
            app.screen = AppScreen::Journal;
        }
        Err(e) => {
            eprintln!("Failed to save journal entry: {e}");
            app.status_message = "Could not save journal entry".to_string();
            app.edit_entry = Some(form.clone());
        }
    }
}

/// Mouse handling on the dashboard: wheel scrolling moves the gate
/// focus and, like any scroll, dismisses an open tooltip first; any
/// press elsewhere is an outside tap.
pub fn handle_mouse(app: &mut App, event: &MouseEvent) {
    if app.screen != AppScreen::Dashboard {
        return;
    }

    let now = Instant::now();
    match event.kind {
        MouseEventKind::ScrollUp => {
            app.tooltip.dismiss();
            app.move_gate_focus(-1, now);
        }
        MouseEventKind::ScrollDown => {
            app.tooltip.dismiss();
            app.move_gate_focus(1, now);
        }
        MouseEventKind::Down(_) => {
            app.tooltip.dismiss();
        }
        _ => {}
    }
}
