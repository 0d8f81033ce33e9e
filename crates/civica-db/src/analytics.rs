use crate::{DbError, DbPool};

/// Poll totals for the overview endpoint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PollCounts {
    pub total: i64,
    pub active: i64,
}

/// Raw vote totals for one politician across the polls they contest.
#[derive(Debug, Clone)]
pub struct PoliticianVoteSummary {
    /// Polls containing at least one option linked to the politician.
    pub polls_contested: i64,
    /// Votes for options linked to the politician.
    pub votes: i64,
    /// All votes cast in the contested polls, regardless of option.
    pub contested_poll_votes: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RivalRow {
    pub politician_id: i64,
    pub name: String,
    pub party: String,
    pub votes: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PartyRow {
    pub party: String,
    pub politicians: i64,
    pub votes: i64,
    pub avg_rating: Option<f64>,
}

pub async fn poll_counts(pool: &DbPool) -> Result<PollCounts, DbError> {
    let row = sqlx::query_as::<_, PollCounts>(
        "SELECT COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active
         FROM polls",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn total_votes(pool: &DbPool) -> Result<i64, DbError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn category_breakdown(pool: &DbPool) -> Result<Vec<(String, i64)>, DbError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT category, COUNT(*) FROM polls GROUP BY category ORDER BY COUNT(*) DESC, category",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn district_breakdown(pool: &DbPool) -> Result<Vec<(String, i64)>, DbError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT COALESCE(district, 'unspecified'), COUNT(*)
         FROM polls
         GROUP BY COALESCE(district, 'unspecified')
         ORDER BY COUNT(*) DESC, COALESCE(district, 'unspecified')",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn politician_vote_summary(
    pool: &DbPool,
    politician_id: i64,
) -> Result<PoliticianVoteSummary, DbError> {
    let polls_contested: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT poll_id) FROM poll_options WHERE politician_id = ?1",
    )
    .bind(politician_id)
    .fetch_one(pool)
    .await?;

    let votes: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM votes v
         JOIN poll_options o ON o.id = v.option_id
         WHERE o.politician_id = ?1",
    )
    .bind(politician_id)
    .fetch_one(pool)
    .await?;

    let contested_poll_votes: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM votes
         WHERE poll_id IN (SELECT DISTINCT poll_id FROM poll_options WHERE politician_id = ?1)",
    )
    .bind(politician_id)
    .fetch_one(pool)
    .await?;

    Ok(PoliticianVoteSummary {
        polls_contested,
        votes,
        contested_poll_votes,
    })
}

/// Other politicians holding options in the same polls, with their real
/// vote counts from the ledger.
pub async fn rivals(pool: &DbPool, politician_id: i64) -> Result<Vec<RivalRow>, DbError> {
    let rows = sqlx::query_as::<_, RivalRow>(
        "SELECT o.politician_id AS politician_id, p.name AS name, p.party AS party,
                COUNT(v.user_id) AS votes
         FROM poll_options o
         JOIN politicians p ON p.id = o.politician_id
         LEFT JOIN votes v ON v.option_id = o.id
         WHERE o.politician_id IS NOT NULL
           AND o.politician_id <> ?1
           AND o.poll_id IN (SELECT DISTINCT poll_id FROM poll_options WHERE politician_id = ?1)
         GROUP BY o.politician_id, p.name, p.party
         ORDER BY votes DESC, p.name",
    )
    .bind(politician_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn party_standings(pool: &DbPool) -> Result<Vec<PartyRow>, DbError> {
    let rows = sqlx::query_as::<_, PartyRow>(
        "SELECT p.party AS party,
                COUNT(DISTINCT p.id) AS politicians,
                (SELECT COUNT(*)
                 FROM votes v
                 JOIN poll_options o ON o.id = v.option_id
                 JOIN politicians p2 ON p2.id = o.politician_id
                 WHERE p2.party = p.party) AS votes,
                (SELECT AVG(r.score)
                 FROM ratings r
                 JOIN politicians p3 ON p3.id = r.politician_id
                 WHERE p3.party = p.party) AS avg_rating
         FROM politicians p
         GROUP BY p.party
         ORDER BY votes DESC, p.party",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
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

    async fn seed_poll(
        pool: &DbPool,
        title: &str,
        category: &str,
        district: Option<&str>,
        options: &[NewOption],
    ) -> (i64, Vec<i64>) {
        let new = NewPoll {
            title: title.into(),
            description: "d".into(),
            category: category.into(),
            district: district.map(Into::into),
            ..Default::default()
        };
        let (poll, opts) = polls::create_poll(pool, &new, options).await.unwrap();
        (poll.id, opts.iter().map(|o| o.id).collect())
    }

    fn plain(labels: &[&str]) -> Vec<NewOption> {
        labels
            .iter()
            .map(|l| NewOption {
                label: (*l).into(),
                politician_id: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_poll_counts_and_total_votes() {
        let pool = test_pool().await;
        let (a, opts_a) = seed_poll(&pool, "A", "budget", None, &plain(&["x", "y"])).await;
        let (b, _) = seed_poll(&pool, "B", "budget", None, &plain(&["x", "y"])).await;
        let patch = polls::PollPatch {
            status: Some("ended".into()),
            ..Default::default()
        };
        polls::update_poll(&pool, b, &patch).await.unwrap();

        crate::votes::cast_vote(&pool, a, opts_a[0], 1).await.unwrap();
        crate::votes::cast_vote(&pool, a, opts_a[1], 2).await.unwrap();

        let counts = poll_counts(&pool).await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.active, 1);
        assert_eq!(total_votes(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_poll_counts_on_empty_store() {
        let pool = test_pool().await;
        let counts = poll_counts(&pool).await.unwrap();
        assert_eq!(counts.total, 0);
        assert_eq!(counts.active, 0);
        assert_eq!(total_votes(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_category_and_district_breakdowns() {
        let pool = test_pool().await;
        seed_poll(&pool, "A", "budget", Some("North"), &plain(&["x", "y"])).await;
        seed_poll(&pool, "B", "budget", None, &plain(&["x", "y"])).await;
        seed_poll(&pool, "C", "transport", Some("North"), &plain(&["x", "y"])).await;

        let categories = category_breakdown(&pool).await.unwrap();
        assert_eq!(categories[0], ("budget".to_string(), 2));
        assert_eq!(categories[1], ("transport".to_string(), 1));

        let districts = district_breakdown(&pool).await.unwrap();
        assert_eq!(districts[0], ("North".to_string(), 2));
        assert_eq!(districts[1], ("unspecified".to_string(), 1));
    }

    #[tokio::test]
    async fn test_politician_summary_and_rivals_use_ledger_counts() {
        let pool = test_pool().await;
        let ana = crate::politicians::create_politician(&pool, "Ana", "Green", None)
            .await
            .unwrap();
        let bo = crate::politicians::create_politician(&pool, "Bo", "Blue", None)
            .await
            .unwrap();

        let options = vec![
            NewOption {
                label: "Ana".into(),
                politician_id: Some(ana.id),
            },
            NewOption {
                label: "Bo".into(),
                politician_id: Some(bo.id),
            },
        ];
        let (poll_id, opt_ids) = seed_poll(&pool, "Mayor", "election", None, &options).await;

        crate::votes::cast_vote(&pool, poll_id, opt_ids[0], 1).await.unwrap();
        crate::votes::cast_vote(&pool, poll_id, opt_ids[0], 2).await.unwrap();
        crate::votes::cast_vote(&pool, poll_id, opt_ids[1], 3).await.unwrap();

        let summary = politician_vote_summary(&pool, ana.id).await.unwrap();
        assert_eq!(summary.polls_contested, 1);
        assert_eq!(summary.votes, 2);
        assert_eq!(summary.contested_poll_votes, 3);

        let rivals = rivals(&pool, ana.id).await.unwrap();
        assert_eq!(rivals.len(), 1);
        assert_eq!(rivals[0].name, "Bo");
        assert_eq!(rivals[0].votes, 1);
    }

    #[tokio::test]
    async fn test_party_standings_joins_votes_and_ratings() {
        let pool = test_pool().await;
        let ana = crate::politicians::create_politician(&pool, "Ana", "Green", None)
            .await
            .unwrap();
        let bo = crate::politicians::create_politician(&pool, "Bo", "Blue", None)
            .await
            .unwrap();
        crate::politicians::create_politician(&pool, "Cy", "Green", None)
            .await
            .unwrap();

        let options = vec![
            NewOption {
                label: "Ana".into(),
                politician_id: Some(ana.id),
            },
            NewOption {
                label: "Bo".into(),
                politician_id: Some(bo.id),
            },
        ];
        let (poll_id, opt_ids) = seed_poll(&pool, "Mayor", "election", None, &options).await;
        crate::votes::cast_vote(&pool, poll_id, opt_ids[0], 1).await.unwrap();
        crate::votes::cast_vote(&pool, poll_id, opt_ids[0], 2).await.unwrap();
        crate::votes::cast_vote(&pool, poll_id, opt_ids[1], 3).await.unwrap();

        crate::ratings::upsert_rating(&pool, ana.id, 1, 4).await.unwrap();
        crate::ratings::upsert_rating(&pool, bo.id, 1, 2).await.unwrap();

        let standings = party_standings(&pool).await.unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].party, "Green");
        assert_eq!(standings[0].politicians, 2);
        assert_eq!(standings[0].votes, 2);
        assert_eq!(standings[0].avg_rating, Some(4.0));
        assert_eq!(standings[1].party, "Blue");
        assert_eq!(standings[1].votes, 1);
    }
}
