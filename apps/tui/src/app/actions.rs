use color_eyre::eyre::eyre;
use color_eyre::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::api::client::ApiClient;
use crate::api::tooltips::TooltipIndex;
use crate::config::init_app_config;
use crate::db::models::{JournalEntry, JournalEntryParams};
use crate::db::{create_database_pool, queries};

/// Side-effect facade: owns the database pool, the HTTP client and the
/// shared tooltip index.
#[derive(Debug)]
pub struct AppActions {
    pub db_pool: Option<SqlitePool>,
    pub api: Option<ApiClient>,
    pub tooltips: Arc<TooltipIndex>,
}

impl AppActions {
    pub fn new() -> Self {
        Self {
            db_pool: None,
            api: None,
            tooltips: Arc::new(TooltipIndex::new()),
        }
    }

    pub async fn initialize(&mut self) -> Result<()> {
        let (_, api_base_url) = init_app_config()?;
        self.api = Some(ApiClient::new(api_base_url)?);
        self.db_pool = Some(create_database_pool().await?);

        Ok(())
    }

    /// Cheap clone for background fetch tasks.
    pub fn client(&self) -> Result<ApiClient> {
        self.api
            .clone()
            .ok_or_else(|| eyre!("API client not initialized"))
    }

    pub async fn gate_count(&self) -> Result<u32> {
        queries::get_gate_count(self.pool()?).await.map_err(Into::into)
    }

    /// Persists the preference and returns the clamped stored value.
    pub async fn set_gate_count(&self, count: i64) -> Result<u32> {
        queries::set_gate_count(self.pool()?, count)
            .await
            .map_err(Into::into)
    }

    pub async fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        queries::get_journal_entries(self.pool()?)
            .await
            .map_err(Into::into)
    }

    pub async fn insert_journal_entry(&self, params: &JournalEntryParams) -> Result<()> {
        queries::insert_journal_entry(self.pool()?, params)
            .await
            .map_err(Into::into)
    }

    pub async fn count_journal_entries(&self) -> Result<i64> {
        queries::count_journal_entries(self.pool()?)
            .await
            .map_err(Into::into)
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| eyre!("Database not initialized"))
    }
}

impl Default for AppActions {
    fn default() -> Self {
        Self::new()
    }
}
