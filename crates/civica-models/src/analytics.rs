use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub total_polls: i64,
    pub active_polls: i64,
    pub total_votes: i64,
    /// Votes cast relative to an assumed per-poll voter capacity. This is an
    /// estimate, not a true turnout figure; the denominator is a fixed
    /// constant, not a registry of eligible voters.
    pub participation_rate: f64,
}

/// One group in a category or district breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownBucket {
    pub key: String,
    pub polls: i64,
    /// Share of all polls (not of all votes) in this bucket.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliticianComparison {
    pub politician_id: i64,
    pub name: String,
    pub party: String,
    /// Polls that contain at least one option linked to this politician.
    pub polls_contested: i64,
    pub votes: i64,
    /// This politician's votes over all votes in the contested polls.
    pub vote_share: f64,
    pub average_rating: Option<f64>,
    pub rivals: Vec<RivalStanding>,
}

/// A competing politician appearing in the same polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RivalStanding {
    pub politician_id: i64,
    pub name: String,
    pub party: String,
    pub votes: i64,
    pub vote_share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyComparison {
    pub parties: Vec<PartyStanding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyStanding {
    pub party: String,
    pub politicians: i64,
    pub votes: i64,
    /// Share of all politician-linked votes across every party.
    pub vote_share: f64,
    pub average_rating: Option<f64>,
}
