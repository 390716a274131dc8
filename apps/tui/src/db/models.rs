use sqlx::FromRow;

/// A saved moon journal entry.
#[derive(Debug, FromRow, Clone)]
pub struct JournalEntry {
    pub id: i64,
    pub entry_date: String,
    pub phase: String,
    pub mood: String,
    pub activities: String,
    pub reflections: String,
    pub goals: String,
}

/// Parameters for creating a new journal entry. All fields are
/// free-text; the date and phase are pre-filled from the dashboard.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryParams {
    pub entry_date: String,
    pub phase: String,
    pub mood: String,
    pub activities: String,
    pub reflections: String,
    pub goals: String,
}
