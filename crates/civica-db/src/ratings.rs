use crate::{DbError, DbPool};

/// Upsert a user's rating for a politician; a repeat rating overwrites the
/// score, mirroring the one-vote-per-pair rule on the vote ledger.
pub async fn upsert_rating(
    pool: &DbPool,
    politician_id: i64,
    user_id: i64,
    score: i64,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO ratings (politician_id, user_id, score)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (politician_id, user_id)
         DO UPDATE SET score = excluded.score, updated_at = datetime('now')",
    )
    .bind(politician_id)
    .bind(user_id)
    .bind(score)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn average_rating(pool: &DbPool, politician_id: i64) -> Result<Option<f64>, DbError> {
    let avg: Option<f64> =
        sqlx::query_scalar("SELECT AVG(score) FROM ratings WHERE politician_id = ?1")
            .bind(politician_id)
            .fetch_one(pool)
            .await?;
    Ok(avg)
}
