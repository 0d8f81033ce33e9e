use crate::{DbError, DbPool};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VoteRow {
    pub poll_id: i64,
    pub option_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert the user's vote and recompute every option counter for the poll
/// from the ledger, all in one transaction. A crash between the two steps
/// rolls both back, so counters can never go stale relative to the ledger.
///
/// The upsert keys on the (poll_id, user_id) primary key: a repeat vote by
/// the same user overwrites the option reference in place instead of
/// inserting a second row.
pub async fn cast_vote(
    pool: &DbPool,
    poll_id: i64,
    option_id: i64,
    user_id: i64,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO votes (poll_id, option_id, user_id)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (poll_id, user_id)
         DO UPDATE SET option_id = excluded.option_id, updated_at = datetime('now')",
    )
    .bind(poll_id)
    .bind(option_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    // Full rescan rather than increment/decrement: options that lost their
    // votes to a re-vote are reset to the true (possibly zero) count.
    sqlx::query(
        "UPDATE poll_options
         SET vote_count = (
             SELECT COUNT(*) FROM votes v
             WHERE v.option_id = poll_options.id AND v.poll_id = ?1
         )
         WHERE poll_id = ?1",
    )
    .bind(poll_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn get_vote(
    pool: &DbPool,
    poll_id: i64,
    user_id: i64,
) -> Result<Option<VoteRow>, DbError> {
    let row = sqlx::query_as::<_, VoteRow>(
        "SELECT poll_id, option_id, user_id, created_at, updated_at
         FROM votes WHERE poll_id = ?1 AND user_id = ?2",
    )
    .bind(poll_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count_votes(pool: &DbPool, poll_id: i64) -> Result<i64, DbError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE poll_id = ?1")
        .bind(poll_id)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polls::{self, NewOption, NewPoll};

    async fn test_pool() -> DbPool {
        let pool = crate::create_pool("sqlite::memory:", 1).await.unwrap();
        crate::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn budget_poll(pool: &DbPool) -> (i64, i64, i64) {
        let new = NewPoll {
            title: "Budget Priority".into(),
            description: "Where should next year's budget go?".into(),
            category: "budget".into(),
            ..Default::default()
        };
        let options = vec![
            NewOption {
                label: "Health".into(),
                politician_id: None,
            },
            NewOption {
                label: "Education".into(),
                politician_id: None,
            },
        ];
        let (poll, opts) = polls::create_poll(pool, &new, &options).await.unwrap();
        (poll.id, opts[0].id, opts[1].id)
    }

    async fn counter(pool: &DbPool, option_id: i64) -> i64 {
        sqlx::query_scalar("SELECT vote_count FROM poll_options WHERE id = ?1")
            .bind(option_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_vote_sets_counter() {
        let pool = test_pool().await;
        let (poll_id, health, education) = budget_poll(&pool).await;

        cast_vote(&pool, poll_id, health, 1).await.unwrap();

        assert_eq!(counter(&pool, health).await, 1);
        assert_eq!(counter(&pool, education).await, 0);
        assert_eq!(count_votes(&pool, poll_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_revote_overwrites_instead_of_adding() {
        let pool = test_pool().await;
        let (poll_id, health, education) = budget_poll(&pool).await;

        cast_vote(&pool, poll_id, health, 1).await.unwrap();
        cast_vote(&pool, poll_id, education, 1).await.unwrap();

        // The prior nonzero counter must not survive the recompute.
        assert_eq!(counter(&pool, health).await, 0);
        assert_eq!(counter(&pool, education).await, 1);
        assert_eq!(count_votes(&pool, poll_id).await.unwrap(), 1);

        let vote = get_vote(&pool, poll_id, 1).await.unwrap().unwrap();
        assert_eq!(vote.option_id, education);
    }

    #[tokio::test]
    async fn test_two_users_split_the_tally() {
        let pool = test_pool().await;
        let (poll_id, health, education) = budget_poll(&pool).await;

        cast_vote(&pool, poll_id, health, 1).await.unwrap();
        cast_vote(&pool, poll_id, education, 1).await.unwrap();
        cast_vote(&pool, poll_id, health, 2).await.unwrap();

        assert_eq!(counter(&pool, health).await, 1);
        assert_eq!(counter(&pool, education).await, 1);
        assert_eq!(count_votes(&pool, poll_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ledger_holds_one_row_per_poll_user_pair() {
        let pool = test_pool().await;
        let (poll_id, health, education) = budget_poll(&pool).await;

        for option in [health, education, health, health, education] {
            cast_vote(&pool, poll_id, option, 3).await.unwrap();
        }

        let rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE poll_id = ?1 AND user_id = 3")
                .bind(poll_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(rows, 1);
        let vote = get_vote(&pool, poll_id, 3).await.unwrap().unwrap();
        assert_eq!(vote.option_id, education);
    }

    #[tokio::test]
    async fn test_tally_matches_ledger_after_many_casts() {
        let pool = test_pool().await;
        let (poll_id, health, education) = budget_poll(&pool).await;

        for user in 0..10_i64 {
            let option = if user % 3 == 0 { health } else { education };
            cast_vote(&pool, poll_id, option, user).await.unwrap();
        }
        // A few re-votes.
        cast_vote(&pool, poll_id, education, 0).await.unwrap();
        cast_vote(&pool, poll_id, health, 1).await.unwrap();

        for option_id in [health, education] {
            let ledger: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE option_id = ?1")
                    .bind(option_id)
                    .fetch_one(&pool)
                    .await
                    .unwrap();
            assert_eq!(counter(&pool, option_id).await, ledger);
        }
        assert_eq!(count_votes(&pool, poll_id).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_vote_for_missing_option_violates_foreign_key() {
        let pool = test_pool().await;
        let (poll_id, _, _) = budget_poll(&pool).await;
        let err = cast_vote(&pool, poll_id, 9999, 1).await;
        assert!(err.is_err());
    }
}
