use crate::{DbError, DbPool};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PoliticianRow {
    pub id: i64,
    pub name: String,
    pub party: String,
    pub district: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn create_politician(
    pool: &DbPool,
    name: &str,
    party: &str,
    district: Option<&str>,
) -> Result<PoliticianRow, DbError> {
    let row = sqlx::query_as::<_, PoliticianRow>(
        "INSERT INTO politicians (name, party, district)
         VALUES (?1, ?2, ?3)
         RETURNING id, name, party, district, created_at",
    )
    .bind(name)
    .bind(party)
    .bind(district)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn get_politician(pool: &DbPool, id: i64) -> Result<Option<PoliticianRow>, DbError> {
    let row = sqlx::query_as::<_, PoliticianRow>(
        "SELECT id, name, party, district, created_at FROM politicians WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_politicians(pool: &DbPool) -> Result<Vec<PoliticianRow>, DbError> {
    let rows = sqlx::query_as::<_, PoliticianRow>(
        "SELECT id, name, party, district, created_at FROM politicians ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
