use crate::{DbError, DbPool};
use chrono::{DateTime, Utc};

const POLL_COLUMNS: &str = "id, title, description, category, status, end_date, anonymous, \
     requires_verification, district, municipality, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PollRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub end_date: Option<DateTime<Utc>>,
    pub anonymous: bool,
    pub requires_verification: bool,
    pub district: Option<String>,
    pub municipality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PollOptionRow {
    pub id: i64,
    pub poll_id: i64,
    pub label: String,
    pub vote_count: i64,
    pub politician_id: Option<i64>,
}

/// Fields for a new poll row. Option labels are supplied separately so they
/// can be inserted in order within the same transaction.
#[derive(Debug, Clone, Default)]
pub struct NewPoll {
    pub title: String,
    pub description: String,
    pub category: String,
    pub end_date: Option<DateTime<Utc>>,
    pub anonymous: bool,
    pub requires_verification: bool,
    pub district: Option<String>,
    pub municipality: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOption {
    pub label: String,
    pub politician_id: Option<i64>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PollPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub district: Option<String>,
    pub municipality: Option<String>,
}

/// Free-text and attribute filters for listing; all optional.
#[derive(Debug, Clone, Default)]
pub struct PollFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub district: Option<String>,
}

pub async fn create_poll(
    pool: &DbPool,
    new: &NewPoll,
    options: &[NewOption],
) -> Result<(PollRow, Vec<PollOptionRow>), DbError> {
    let mut tx = pool.begin().await?;

    let poll = sqlx::query_as::<_, PollRow>(&format!(
        "INSERT INTO polls (title, description, category, end_date, anonymous, \
         requires_verification, district, municipality)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         RETURNING {POLL_COLUMNS}"
    ))
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.category)
    .bind(new.end_date)
    .bind(new.anonymous)
    .bind(new.requires_verification)
    .bind(&new.district)
    .bind(&new.municipality)
    .fetch_one(&mut *tx)
    .await?;

    let mut rows = Vec::with_capacity(options.len());
    for option in options {
        let row = sqlx::query_as::<_, PollOptionRow>(
            "INSERT INTO poll_options (poll_id, label, politician_id)
             VALUES (?1, ?2, ?3)
             RETURNING id, poll_id, label, vote_count, politician_id",
        )
        .bind(poll.id)
        .bind(&option.label)
        .bind(option.politician_id)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok((poll, rows))
}

pub async fn get_poll(pool: &DbPool, id: i64) -> Result<Option<PollRow>, DbError> {
    let row = sqlx::query_as::<_, PollRow>(&format!(
        "SELECT {POLL_COLUMNS} FROM polls WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_options(pool: &DbPool, poll_id: i64) -> Result<Vec<PollOptionRow>, DbError> {
    let rows = sqlx::query_as::<_, PollOptionRow>(
        "SELECT id, poll_id, label, vote_count, politician_id
         FROM poll_options WHERE poll_id = ?1 ORDER BY id",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_option(pool: &DbPool, option_id: i64) -> Result<Option<PollOptionRow>, DbError> {
    let row = sqlx::query_as::<_, PollOptionRow>(
        "SELECT id, poll_id, label, vote_count, politician_id
         FROM poll_options WHERE id = ?1",
    )
    .bind(option_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn update_poll(
    pool: &DbPool,
    id: i64,
    patch: &PollPatch,
) -> Result<Option<PollRow>, DbError> {
    let row = sqlx::query_as::<_, PollRow>(&format!(
        "UPDATE polls SET
             title = COALESCE(?2, title),
             description = COALESCE(?3, description),
             category = COALESCE(?4, category),
             status = COALESCE(?5, status),
             end_date = COALESCE(?6, end_date),
             district = COALESCE(?7, district),
             municipality = COALESCE(?8, municipality),
             updated_at = datetime('now')
         WHERE id = ?1
         RETURNING {POLL_COLUMNS}"
    ))
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(&patch.category)
    .bind(&patch.status)
    .bind(patch.end_date)
    .bind(&patch.district)
    .bind(&patch.municipality)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Delete a poll together with its options and votes in one transaction,
/// so a concurrent cast cannot leave an orphaned vote row behind.
pub async fn delete_poll(pool: &DbPool, id: i64) -> Result<bool, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM votes WHERE poll_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM poll_options WHERE poll_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM polls WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Append an option to an existing poll. Returns `None` when the poll is
/// absent (checked inside the insert, not with a separate read).
pub async fn add_option(
    pool: &DbPool,
    poll_id: i64,
    label: &str,
    politician_id: Option<i64>,
) -> Result<Option<PollOptionRow>, DbError> {
    let row = sqlx::query_as::<_, PollOptionRow>(
        "INSERT INTO poll_options (poll_id, label, politician_id)
         SELECT ?1, ?2, ?3
         WHERE EXISTS (SELECT 1 FROM polls WHERE id = ?1)
         RETURNING id, poll_id, label, vote_count, politician_id",
    )
    .bind(poll_id)
    .bind(label)
    .bind(politician_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

const LIST_FILTER: &str = "(?1 IS NULL OR title LIKE '%' || ?1 || '%')
           AND (?2 IS NULL OR category = ?2)
           AND (?3 IS NULL OR status = ?3)
           AND (?4 IS NULL OR district = ?4)";

pub async fn list_polls(
    pool: &DbPool,
    filter: &PollFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<PollRow>, DbError> {
    let rows = sqlx::query_as::<_, PollRow>(&format!(
        "SELECT {POLL_COLUMNS} FROM polls
         WHERE {LIST_FILTER}
         ORDER BY created_at DESC, id DESC
         LIMIT ?5 OFFSET ?6"
    ))
    .bind(&filter.search)
    .bind(&filter.category)
    .bind(&filter.status)
    .bind(&filter.district)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Total matching the same filter, independent of the page slice.
pub async fn count_polls(pool: &DbPool, filter: &PollFilter) -> Result<i64, DbError> {
    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM polls WHERE {LIST_FILTER}"
    ))
    .bind(&filter.search)
    .bind(&filter.category)
    .bind(&filter.status)
    .bind(&filter.district)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
