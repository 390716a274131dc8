use sqlx::{query, query_as, query_scalar, SqlitePool};

use crate::db::models::{JournalEntry, JournalEntryParams};

pub const GATE_COUNT_KEY: &str = "gateCount";
pub const DEFAULT_GATE_COUNT: u32 = 32;
pub const MIN_GATE_COUNT: u32 = 1;
pub const MAX_GATE_COUNT: u32 = 128;

/// Clamps a requested gate count into the supported range.
pub const fn clamp_count(value: i64) -> u32 {
    if value < MIN_GATE_COUNT as i64 {
        MIN_GATE_COUNT
    } else if value > MAX_GATE_COUNT as i64 {
        MAX_GATE_COUNT
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            value as u32
        }
    }
}

/// Interprets a raw stored preference value. Missing or non-numeric
/// input falls back to the default.
pub fn parse_gate_count(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map_or(DEFAULT_GATE_COUNT, clamp_count)
}

/// Reads the persisted desired gate count, already clamped.
pub async fn get_gate_count(pool: &SqlitePool) -> Result<u32, sqlx::Error> {
    let raw: Option<String> = query_scalar("SELECT value FROM preference WHERE key = ?")
        .bind(GATE_COUNT_KEY)
        .fetch_optional(pool)
        .await?;

    Ok(parse_gate_count(raw.as_deref()))
}

/// Persists the desired gate count and returns the clamped value that
/// was actually stored.
pub async fn set_gate_count(pool: &SqlitePool, count: i64) -> Result<u32, sqlx::Error> {
    let clamped = clamp_count(count);

    query(
        "INSERT INTO preference (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(GATE_COUNT_KEY)
    .bind(clamped.to_string())
    .execute(pool)
    .await?;

    Ok(clamped)
}

pub async fn insert_journal_entry(
    pool: &SqlitePool,
    params: &JournalEntryParams,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO journal (entry_date, phase, mood, activities, reflections, goals)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&params.entry_date)
    .bind(&params.phase)
    .bind(&params.mood)
    .bind(&params.activities)
    .bind(&params.reflections)
    .bind(&params.goals)
    .execute(pool)
    .await?;

    Ok(())
}

/// Retrieves all journal entries, newest first
pub async fn get_journal_entries(pool: &SqlitePool) -> Result<Vec<JournalEntry>, sqlx::Error> {
    let entries = query_as::<_, JournalEntry>(
        "SELECT id, entry_date, phase, mood, activities, reflections, goals
         FROM journal ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn count_journal_entries(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM journal")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_supported_range() {
        assert_eq!(clamp_count(0), 1);
        assert_eq!(clamp_count(-5), 1);
        assert_eq!(clamp_count(1), 1);
        assert_eq!(clamp_count(32), 32);
        assert_eq!(clamp_count(128), 128);
        assert_eq!(clamp_count(129), 128);
        assert_eq!(clamp_count(i64::MAX), 128);
    }

    #[test]
    fn parse_falls_back_to_default_on_bad_input() {
        assert_eq!(parse_gate_count(None), 32);
        assert_eq!(parse_gate_count(Some("")), 32);
        assert_eq!(parse_gate_count(Some("ten")), 32);
        assert_eq!(parse_gate_count(Some("12.5")), 32);
    }

    #[test]
    fn parse_clamps_numeric_input() {
        assert_eq!(parse_gate_count(Some("64")), 64);
        assert_eq!(parse_gate_count(Some(" 64 ")), 64);
        assert_eq!(parse_gate_count(Some("0")), 1);
        assert_eq!(parse_gate_count(Some("500")), 128);
    }

    #[tokio::test]
    async fn gate_count_round_trips_through_store() -> Result<(), sqlx::Error> {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await?;
        crate::db::migrations::setup_database(&pool).await?;

        assert_eq!(get_gate_count(&pool).await?, DEFAULT_GATE_COUNT);

        assert_eq!(set_gate_count(&pool, 10).await?, 10);
        assert_eq!(get_gate_count(&pool).await?, 10);

        // Out-of-range writes store the clamped value
        assert_eq!(set_gate_count(&pool, 999).await?, 128);
        assert_eq!(get_gate_count(&pool).await?, 128);

        Ok(())
    }

    #[tokio::test]
    async fn journal_entries_come_back_newest_first() -> Result<(), sqlx::Error> {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await?;
        crate::db::migrations::setup_database(&pool).await?;

        for (date, mood) in [("2024-06-01", "calm"), ("2024-06-02", "restless")] {
            let params = JournalEntryParams {
                entry_date: date.to_string(),
                phase: "Full Moon".to_string(),
                mood: mood.to_string(),
                ..JournalEntryParams::default()
            };
            insert_journal_entry(&pool, &params).await?;
        }

        let entries = get_journal_entries(&pool).await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_date, "2024-06-02");
        assert_eq!(entries[1].mood, "calm");
        assert_eq!(count_journal_entries(&pool).await?, 2);

        Ok(())
    }
}
