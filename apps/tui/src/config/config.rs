use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Initializes the application configuration.
/// Returns a tuple containing the database URL and the API base URL.
pub fn init_app_config() -> color_eyre::eyre::Result<(String, String)> {
    // Load environment variables from .env file
    dotenv().ok();

    // Get current directory
    let base_dir: PathBuf = env::current_dir()?;

    // Get database configuration from environment variables
    let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "moongate.db".to_string());

    // Create the database path relative to the current directory
    let database_path = base_dir.join(&db_name);

    // Create parent directory if it doesn't exist
    if let Some(parent) = database_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // We don't use canonicalize() because the file might not exist yet
    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?
        .to_string();

    // SQLx wants sqlite:///abs/path (3 slashes) for absolute paths and
    // sqlite://rel/path (2 slashes) for relative ones.
    let clean_path = path_str.trim_start_matches('/');

    let database_url = if database_path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    };

    Ok((database_url, api_base_url()))
}

/// Base URL of the moon backend. Trailing slashes are stripped so the
/// endpoint paths can be appended directly.
pub fn api_base_url() -> String {
    env::var("MOON_API_URL").map_or_else(
        |_| "http://127.0.0.1:5000".to_string(),
        |url| url.trim_end_matches('/').to_string(),
    )
}
