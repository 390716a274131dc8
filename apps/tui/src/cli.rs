use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "moongate-tui", version, about = "Moon phase and gate dashboard TUI")]
pub struct CliArgs {
    /// Print the current moon and gate data and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the moon API base URL
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,

    /// Override database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// How many upcoming gates to request (1-128)
    #[arg(long, value_name = "N")]
    pub count: Option<i64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(api) = &self.api {
            std::env::set_var("MOON_API_URL", api);
        }
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
