pub mod screens;
pub mod widgets;

use ratatui::Frame;

use crate::app::{App, AppScreen};

/// Paints the screen the app is currently on. The journal entry form
/// is drawn as an overlay on top of the journal list.
pub fn ui(app: &mut App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Dashboard => screens::dashboard::render_dashboard(app, f),
        AppScreen::Journal => screens::journal::render_journal(app, f),
        AppScreen::EditEntry => {
            screens::journal::render_journal(app, f);
            screens::edit_entry::render_edit_entry(app, f);
        }
    }
}
