use civica_db::politicians::PoliticianRow;
use civica_db::DbPool;
use civica_models::Politician;
use serde::Deserialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePolitician {
    pub name: String,
    pub party: String,
    pub district: Option<String>,
}

async fn to_model(pool: &DbPool, row: PoliticianRow) -> Result<Politician, CoreError> {
    let average_rating = civica_db::ratings::average_rating(pool, row.id).await?;
    Ok(Politician {
        id: row.id,
        name: row.name,
        party: row.party,
        district: row.district,
        average_rating,
        created_at: row.created_at,
    })
}

pub async fn create_politician(
    pool: &DbPool,
    input: CreatePolitician,
) -> Result<Politician, CoreError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    let party = input.party.trim();
    if party.is_empty() {
        return Err(CoreError::Validation("party must not be empty".into()));
    }

    let row =
        civica_db::politicians::create_politician(pool, name, party, input.district.as_deref())
            .await?;
    to_model(pool, row).await
}

pub async fn get_politician(pool: &DbPool, id: i64) -> Result<Politician, CoreError> {
    let row = civica_db::politicians::get_politician(pool, id)
        .await?
        .ok_or(CoreError::NotFound)?;
    to_model(pool, row).await
}

pub async fn list_politicians(pool: &DbPool) -> Result<Vec<Politician>, CoreError> {
    let rows = civica_db::politicians::list_politicians(pool).await?;
    let mut politicians = Vec::with_capacity(rows.len());
    for row in rows {
        politicians.push(to_model(pool, row).await?);
    }
    Ok(politicians)
}

/// Record (or change) a citizen's 1-5 rating of a politician. Like votes,
/// a repeat rating by the same user overwrites the previous one.
pub async fn rate_politician(
    pool: &DbPool,
    politician_id: i64,
    user_id: i64,
    score: i64,
) -> Result<Politician, CoreError> {
    if !(1..=5).contains(&score) {
        return Err(CoreError::Validation("score must be between 1 and 5".into()));
    }
    let row = civica_db::politicians::get_politician(pool, politician_id)
        .await?
        .ok_or(CoreError::NotFound)?;

    civica_db::ratings::upsert_rating(pool, politician_id, user_id, score).await?;
    to_model(pool, row).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DbPool {
        let pool = civica_db::create_pool("sqlite::memory:", 1).await.unwrap();
        civica_db::run_migrations(&pool).await.unwrap();
        pool
    }

    fn ana() -> CreatePolitician {
        CreatePolitician {
            name: "Ana Silva".into(),
            party: "Green".into(),
            district: Some("North".into()),
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_name_or_party() {
        let pool = test_pool().await;
        let mut input = ana();
        input.name = " ".into();
        assert!(matches!(
            create_politician(&pool, input).await,
            Err(CoreError::Validation(_))
        ));

        let mut input = ana();
        input.party = String::new();
        assert!(matches!(
            create_politician(&pool, input).await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn rating_updates_the_average() {
        let pool = test_pool().await;
        let politician = create_politician(&pool, ana()).await.unwrap();
        assert_eq!(politician.average_rating, None);

        rate_politician(&pool, politician.id, 1, 5).await.unwrap();
        let rated = rate_politician(&pool, politician.id, 2, 3).await.unwrap();
        assert_eq!(rated.average_rating, Some(4.0));

        // Re-rating overwrites, not appends.
        let rerated = rate_politician(&pool, politician.id, 1, 3).await.unwrap();
        assert_eq!(rerated.average_rating, Some(3.0));
    }

    #[tokio::test]
    async fn rating_validates_score_and_target() {
        let pool = test_pool().await;
        let politician = create_politician(&pool, ana()).await.unwrap();

        assert!(matches!(
            rate_politician(&pool, politician.id, 1, 0).await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            rate_politician(&pool, politician.id, 1, 6).await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            rate_politician(&pool, 99, 1, 3).await,
            Err(CoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_includes_average_ratings() {
        let pool = test_pool().await;
        let politician = create_politician(&pool, ana()).await.unwrap();
        rate_politician(&pool, politician.id, 1, 2).await.unwrap();

        let all = list_politicians(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].average_rating, Some(2.0));
    }
}
