use chrono::{DateTime, Local};
use color_eyre::Result;
use std::time::Instant;

use crate::api::client::FetchError;
use crate::app::actions::AppActions;
use crate::app::refresh::RefreshOrchestrator;
use crate::app::tooltip::{TooltipMachine, TooltipState};
use crate::db::models::{JournalEntry, JournalEntryParams};
use crate::db::queries::DEFAULT_GATE_COUNT;
use crate::domain::{MoonReading, PositionReading};

/// What the dashboard panels currently show. Replaced wholesale on
/// every transition; there are no partial updates.
#[derive(Debug, Clone)]
pub enum RenderState {
    Loading,
    Loaded {
        moon: MoonReading,
        position: PositionReading,
    },
    Error(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppScreen {
    Dashboard,
    Journal,
    EditEntry,
}

/// Which field of the journal form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Mood,
    Activities,
    Reflections,
    Goals,
    Save,
}

impl EntryField {
    const ORDER: [Self; 5] = [
        Self::Mood,
        Self::Activities,
        Self::Reflections,
        Self::Goals,
        Self::Save,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Holds the temporary state of a journal entry being written.
#[derive(Debug, Clone)]
pub struct EditEntryState {
    pub field: EntryField,
    pub entry_date: String,
    pub phase: String,
    pub mood: String,
    pub activities: String,
    pub reflections: String,
    pub goals: String,
    pub editing: bool, // Whether we're actively typing into the current field
}

impl EditEntryState {
    /// New form pre-filled with today's date and the rendered phase.
    pub fn for_today(phase: &str) -> Self {
        Self {
            field: EntryField::Mood,
            entry_date: Local::now().format("%Y-%m-%d").to_string(),
            phase: phase.to_string(),
            mood: String::new(),
            activities: String::new(),
            reflections: String::new(),
            goals: String::new(),
            editing: false,
        }
    }

    pub fn field_value_mut(&mut self) -> Option<&mut String> {
        match self.field {
            EntryField::Mood => Some(&mut self.mood),
            EntryField::Activities => Some(&mut self.activities),
            EntryField::Reflections => Some(&mut self.reflections),
            EntryField::Goals => Some(&mut self.goals),
            EntryField::Save => None,
        }
    }

    pub fn to_params(&self) -> JournalEntryParams {
        JournalEntryParams {
            entry_date: self.entry_date.clone(),
            phase: self.phase.clone(),
            mood: self.mood.clone(),
            activities: self.activities.clone(),
            reflections: self.reflections.clone(),
            goals: self.goals.clone(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub render_state: RenderState,
    pub gate_count: u32,
    pub focused_gate: Option<usize>,
    pub tooltip: TooltipMachine,
    pub refresh: RefreshOrchestrator,
    pub wants_refresh: bool,
    pub status_message: String,
    pub last_updated: Option<DateTime<Local>>,
    pub journal: Vec<JournalEntry>,
    pub selected_entry_index: usize,
    pub edit_entry: Option<EditEntryState>,
    pub actions: AppActions,
    pub throbber: throbber_widgets_tui::ThrobberState,
    pub animation_counter: f64,
    pub last_frame: Instant,
}

impl App {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            running: true,
            screen: AppScreen::Dashboard,
            show_help: false,
            render_state: RenderState::Loading,
            gate_count: DEFAULT_GATE_COUNT,
            focused_gate: None,
            tooltip: TooltipMachine::new(),
            refresh: RefreshOrchestrator::new(now),
            wants_refresh: true, // initial load
            status_message: String::new(),
            last_updated: None,
            journal: Vec::new(),
            selected_entry_index: 0,
            edit_entry: None,
            actions: AppActions::new(),
            throbber: throbber_widgets_tui::ThrobberState::default(),
            animation_counter: 0.0,
            last_frame: now,
        }
    }

    pub async fn initialize(&mut self) -> Result<()> {
        self.actions.initialize().await?;
        self.gate_count = self.actions.gate_count().await?;
        self.journal = self.actions.journal_entries().await?;

        Ok(())
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Update animation counter (cycles between 0 and 2*PI)
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if matches!(self.render_state, RenderState::Loading) {
            self.throbber.calc_next();
        }
    }

    /// Number of gate rows the gates panel currently offers as tooltip
    /// triggers.
    pub fn gate_row_count(&self) -> usize {
        match &self.render_state {
            RenderState::Loaded { position, .. } => position.upcoming.len(),
            _ => 0,
        }
    }

    pub fn gate_name_at(&self, index: usize) -> Option<&str> {
        match &self.render_state {
            RenderState::Loaded { position, .. } => position
                .upcoming
                .get(index)
                .map(|event| event.gate.as_str()),
            _ => None,
        }
    }

    /// Tooltip text for a gate row, if the index has resolved and
    /// knows the gate.
    pub fn gate_tooltip(&self, index: usize) -> Option<&str> {
        let name = self.gate_name_at(index)?;
        self.actions.tooltips.lookup(name)
    }

    /// Drives the tooltip debounce timers from the event loop.
    pub fn tooltip_tick(&mut self, now: Instant) {
        let pending_has_content = match self.tooltip.state() {
            TooltipState::Pending { target, .. } => self.gate_tooltip(target).is_some(),
            _ => false,
        };
        self.tooltip.tick(now, |_| pending_has_content);
    }

    /// Applies a finished fetch cycle that won the supersession check,
    /// then re-wires the tooltip machine onto the fresh gate rows.
    pub fn apply_cycle(&mut self, outcome: Result<(MoonReading, PositionReading), FetchError>) {
        match outcome {
            Ok((moon, position)) => {
                self.render_state = RenderState::Loaded { moon, position };
                self.last_updated = Some(Local::now());
                self.status_message.clear();
            }
            Err(e) => {
                eprintln!("Fetch cycle failed: {e}");
                self.render_state = RenderState::Error(e.user_message());
            }
        }

        let rows = self.gate_row_count();
        if let Some(focused) = self.focused_gate {
            if focused >= rows {
                self.focused_gate = if rows == 0 { None } else { Some(rows - 1) };
            }
        }
        self.tooltip.rewire(rows);
    }

    /// Moves gate focus by `delta`, updating the tooltip triggers.
    pub fn move_gate_focus(&mut self, delta: i64, now: Instant) {
        let rows = self.gate_row_count();
        if rows == 0 {
            self.clear_gate_focus(now);
            return;
        }

        #[allow(clippy::cast_possible_wrap)]
        let next = self.focused_gate.map_or(0, |current| {
            (current as i64 + delta).clamp(0, rows as i64 - 1)
        });
        #[allow(clippy::cast_sign_loss)]
        let next = next.max(0) as usize;

        self.focused_gate = Some(next);
        self.tooltip.focus(next, now);
    }

    pub fn clear_gate_focus(&mut self, now: Instant) {
        self.focused_gate = None;
        self.tooltip.blur(now);
    }

    pub fn current_phase_name(&self) -> &str {
        match &self.render_state {
            RenderState::Loaded { moon, .. } => &moon.phase_name,
            _ => "",
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GateEvent;

    fn loaded_app(gates: &[&str]) -> App {
        let mut app = App::new();
        app.render_state = RenderState::Loaded {
            moon: MoonReading {
                phase_name: "Full Moon".to_string(),
                illumination: 0.98,
                moon_names: vec!["Full Flower Moon".to_string()],
            },
            position: PositionReading {
                gate: "17".to_string(),
                zodiac_sign: "Scorpio".to_string(),
                degree: 12.5,
                upcoming: gates
                    .iter()
                    .map(|gate| GateEvent {
                        at: "2024-06-01T10:00:00Z".to_string(),
                        gate: (*gate).to_string(),
                    })
                    .collect(),
            },
        };
        app
    }

    #[test]
    fn gate_focus_clamps_to_list_bounds() {
        let now = Instant::now();
        let mut app = loaded_app(&["18", "19", "20"]);

        app.move_gate_focus(1, now);
        assert_eq!(app.focused_gate, Some(0));
        app.move_gate_focus(10, now);
        assert_eq!(app.focused_gate, Some(2));
        app.move_gate_focus(-10, now);
        assert_eq!(app.focused_gate, Some(0));
    }

    #[test]
    fn applying_a_shorter_list_pulls_focus_back() {
        let now = Instant::now();
        let mut app = loaded_app(&["18", "19", "20"]);
        app.move_gate_focus(10, now);
        assert_eq!(app.focused_gate, Some(2));

        app.apply_cycle(Ok((
            MoonReading {
                phase_name: "Full Moon".to_string(),
                illumination: 0.98,
                moon_names: vec![],
            },
            PositionReading {
                gate: "17".to_string(),
                zodiac_sign: "Scorpio".to_string(),
                degree: 12.5,
                upcoming: vec![GateEvent {
                    at: "2024-06-05T00:00:00Z".to_string(),
                    gate: "21".to_string(),
                }],
            },
        )));

        assert_eq!(app.focused_gate, Some(0));
        assert_eq!(app.gate_name_at(0), Some("21"));
    }

    #[test]
    fn failed_cycle_renders_its_user_message() {
        let mut app = loaded_app(&["18"]);
        app.apply_cycle(Err(FetchError::Upstream("ephemeris offline".to_string())));

        match &app.render_state {
            RenderState::Error(msg) => assert_eq!(msg, "ephemeris offline"),
            other => panic!("expected error state, got {other:?}"),
        }
        assert_eq!(app.gate_row_count(), 0);
    }

    #[test]
    fn entry_fields_cycle_in_order() {
        assert_eq!(EntryField::Mood.next(), EntryField::Activities);
        assert_eq!(EntryField::Save.next(), EntryField::Mood);
        assert_eq!(EntryField::Mood.prev(), EntryField::Save);
    }
}
