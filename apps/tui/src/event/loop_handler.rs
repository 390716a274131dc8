use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::api::client::FetchError;
use crate::app::refresh::CycleId;
use crate::app::state::RenderState;
use crate::app::{handle_input, handle_mouse, App};
use crate::db::queries::clamp_count;
use crate::domain::{self, MoonReading, PositionReading};
use crate::ui;

// Event poll timeout (ms); also the tooltip timer resolution
const EVENT_POLL_TIMEOUT: u64 = 50;

/// Messages delivered from background tasks to the event loop.
enum AppMessage {
    CycleDone(CycleId, Result<(MoonReading, PositionReading), FetchError>),
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();

    // Warm the tooltip index in the background. Lookups before it
    // resolves just come back empty; nothing waits on it.
    spawn_tooltip_load(app);

    loop {
        app.update();
        let now = Instant::now();

        // Refresh triggers: manual request, preference change (both
        // set wants_refresh) and the periodic timer. They may race an
        // in-flight cycle; the supersession check below sorts it out.
        if app.wants_refresh || app.refresh.take_due(now) {
            app.wants_refresh = false;
            start_cycle(app, &tx);
        }

        app.tooltip_tick(now);

        terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| eyre!("Terminal draw error: {e}"))?;

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if key.kind == KeyEventKind::Press {
                        handle_input(app, key.code).await;
                    }
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Mouse(mouse)) => {
                    handle_mouse(app, &mouse);
                }
                Ok(Event::Resize(_, _) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Redraw happens on the next iteration anyway
                }
            }
        }

        // Apply finished cycles. A cycle that lost the supersession
        // check is discarded: a late result from an earlier cycle must
        // never overwrite a newer render.
        while let Ok(AppMessage::CycleDone(id, outcome)) = rx.try_recv() {
            if app.refresh.accept(id) {
                app.apply_cycle(outcome);
            }
        }
    }

    Ok(())
}

/// Begins one fetch cycle: flips the panels to Loading and spawns the
/// dual fetch. The result comes back over the channel tagged with its
/// cycle id.
fn start_cycle(app: &mut App, tx: &mpsc::UnboundedSender<AppMessage>) {
    let client = match app.actions.client() {
        Ok(client) => client,
        Err(e) => {
            app.render_state = RenderState::Error(format!("Backend unavailable: {e}"));
            return;
        }
    };

    let id = app.refresh.begin();
    app.render_state = RenderState::Loading;
    app.tooltip.dismiss();

    let count = app.gate_count;
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.fetch_cycle(count).await;
        // The loop may have shut down; a closed channel is fine
        let _ = tx.send(AppMessage::CycleDone(id, outcome));
    });
}

fn spawn_tooltip_load(app: &App) {
    if let Ok(client) = app.actions.client() {
        let tooltips = Arc::clone(&app.actions.tooltips);
        tokio::spawn(async move {
            let _ = tooltips.ensure_loaded(&client).await;
        });
    }
}

/// Run the application in headless mode (no UI): one fetch cycle,
/// printed as plain text or JSON.
pub async fn run_headless(app: &mut App, json: bool, count_override: Option<i64>) -> Result<()> {
    app.initialize().await?;

    if let Some(count) = count_override {
        app.gate_count = clamp_count(count);
    }

    let summary = build_headless_summary(app).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_headless_text(&summary);
    }

    Ok(())
}

async fn build_headless_summary(app: &App) -> Result<HeadlessSummary> {
    let client = app.actions.client()?;
    let (moon, position) = client
        .fetch_cycle(app.gate_count)
        .await
        .map_err(|e| eyre!(e.user_message()))?;

    let journal_entries = app.actions.count_journal_entries().await.unwrap_or(0);

    let next_gate = position.next_gate().map(|gate| HeadlessGate {
        gate: gate.gate.clone(),
        at: gate.at.clone(),
    });
    let upcoming = position
        .later_gates()
        .iter()
        .map(|gate| HeadlessGate {
            gate: gate.gate.clone(),
            at: gate.at.clone(),
        })
        .collect();

    Ok(HeadlessSummary {
        phase: moon.phase_name.clone(),
        illumination: domain::format_illumination(moon.illumination),
        moon_names: moon.moon_names.clone(),
        image_asset: moon.image_asset().to_string(),
        position: domain::format_position(&position.gate, &position.zodiac_sign, position.degree),
        gate_count: app.gate_count,
        next_gate,
        upcoming,
        journal_entries,
    })
}

fn render_headless_text(summary: &HeadlessSummary) {
    println!("\nMoon & Gates");
    println!("============");
    println!("Phase: {}", summary.phase);
    println!("Illumination: {}", summary.illumination);

    if !summary.moon_names.is_empty() {
        println!("Moon name: {}", summary.moon_names.join(", "));
    }

    println!("Position: {}", summary.position);

    match &summary.next_gate {
        Some(next) => println!("\nNext gate: {} at {}", next.gate, next.at),
        None => println!("\nNo upcoming gates available"),
    }

    if !summary.upcoming.is_empty() {
        println!("\nUpcoming gate changes:");
        for gate in &summary.upcoming {
            println!("- {} | {}", gate.gate, gate.at);
        }
    }

    println!("\nJournal entries: {}", summary.journal_entries);
}

#[derive(serde::Serialize)]
struct HeadlessSummary {
    phase: String,
    illumination: String,
    moon_names: Vec<String>,
    image_asset: String,
    position: String,
    gate_count: u32,
    next_gate: Option<HeadlessGate>,
    upcoming: Vec<HeadlessGate>,
    journal_entries: i64,
}

#[derive(serde::Serialize)]
struct HeadlessGate {
    gate: String,
    at: String,
}
