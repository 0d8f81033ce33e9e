use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a poll. The only transitions surfaced by the API are
/// `Active -> Inactive` and `Active -> Ended`; there is no way back out of
/// `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Active,
    Inactive,
    Ended,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollStatus::Active => "active",
            PollStatus::Inactive => "inactive",
            PollStatus::Ended => "ended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(PollStatus::Active),
            "inactive" => Some(PollStatus::Inactive),
            "ended" => Some(PollStatus::Ended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: PollStatus,
    pub end_date: Option<DateTime<Utc>>,
    pub anonymous: bool,
    pub requires_verification: bool,
    pub district: Option<String>,
    pub municipality: Option<String>,
    pub options: Vec<PollOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub id: i64,
    pub poll_id: i64,
    pub label: String,
    /// Denormalized counter, re-derived from the vote ledger on every cast.
    pub vote_count: i64,
    pub politician_id: Option<i64>,
}

/// Per-poll vote statistics derived from the ledger-backed counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollStats {
    pub total_votes: i64,
    pub options: Vec<OptionStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionStat {
    pub option_id: i64,
    pub label: String,
    pub votes: i64,
    /// Share of the poll's total votes, 0.0 when no votes were cast.
    pub percent: f64,
}
