mod api;
mod app;
mod cli;
mod config;
mod db;
mod domain;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = cli::CliArgs::parse();
    args.apply_env_overrides();

    // Initialize application state
    let mut app = App::new();

    // Headless mode: fetch once, print, and exit
    if args.headless || !is_terminal() {
        return event::run_headless(&mut app, args.json, args.count).await;
    }

    // Connect to the API and database
    if let Err(e) = app.initialize().await {
        eprintln!("Error during initialization: {e}");
        eprintln!("Will continue with limited functionality");
    }

    if let Some(count) = args.count {
        let clamped = db::queries::clamp_count(count);
        if let Err(e) = app.actions.set_gate_count(i64::from(clamped)).await {
            eprintln!("Error storing gate count: {e}");
        }
        app.gate_count = clamped;
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::cleanup(true, true);

    // Return the result
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
