use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Politician {
    pub id: i64,
    pub name: String,
    pub party: String,
    pub district: Option<String>,
    /// Mean citizen rating (1-5 scale), absent until someone has rated.
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}
