use civica_db::DbPool;
use civica_models::{
    AnalyticsOverview, BreakdownBucket, PartyComparison, PartyStanding, PoliticianComparison,
    RivalStanding,
};

use crate::error::CoreError;

/// Assumed number of eligible voters per poll, used as the denominator of
/// the participation rate. There is no registry of eligible voters in
/// scope, so this metric is an estimate and is documented as such in the
/// API, not a true turnout figure.
pub const ASSUMED_POLL_CAPACITY: i64 = 1000;

fn share(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 * 100.0 / whole as f64
    } else {
        0.0
    }
}

pub async fn overview(pool: &DbPool) -> Result<AnalyticsOverview, CoreError> {
    let counts = civica_db::analytics::poll_counts(pool).await?;
    let total_votes = civica_db::analytics::total_votes(pool).await?;

    let capacity = counts.total * ASSUMED_POLL_CAPACITY;
    let participation_rate = if capacity > 0 {
        total_votes as f64 / capacity as f64
    } else {
        0.0
    };

    Ok(AnalyticsOverview {
        total_polls: counts.total,
        active_polls: counts.active,
        total_votes,
        participation_rate,
    })
}

fn buckets(rows: Vec<(String, i64)>) -> Vec<BreakdownBucket> {
    let total: i64 = rows.iter().map(|(_, n)| n).sum();
    rows.into_iter()
        .map(|(key, polls)| BreakdownBucket {
            key,
            polls,
            percent: share(polls, total),
        })
        .collect()
}

pub async fn category_breakdown(pool: &DbPool) -> Result<Vec<BreakdownBucket>, CoreError> {
    Ok(buckets(civica_db::analytics::category_breakdown(pool).await?))
}

pub async fn district_breakdown(pool: &DbPool) -> Result<Vec<BreakdownBucket>, CoreError> {
    Ok(buckets(civica_db::analytics::district_breakdown(pool).await?))
}

/// Compare a politician's ledger-derived vote share and citizen rating
/// against the rivals appearing in the same polls.
pub async fn politician_comparison(
    pool: &DbPool,
    politician_id: i64,
) -> Result<PoliticianComparison, CoreError> {
    let politician = civica_db::politicians::get_politician(pool, politician_id)
        .await?
        .ok_or(CoreError::NotFound)?;

    let summary = civica_db::analytics::politician_vote_summary(pool, politician_id).await?;
    let average_rating = civica_db::ratings::average_rating(pool, politician_id).await?;

    let rivals = civica_db::analytics::rivals(pool, politician_id)
        .await?
        .into_iter()
        .map(|r| RivalStanding {
            politician_id: r.politician_id,
            name: r.name,
            party: r.party,
            votes: r.votes,
            vote_share: share(r.votes, summary.contested_poll_votes),
        })
        .collect();

    Ok(PoliticianComparison {
        politician_id: politician.id,
        name: politician.name,
        party: politician.party,
        polls_contested: summary.polls_contested,
        votes: summary.votes,
        vote_share: share(summary.votes, summary.contested_poll_votes),
        average_rating,
        rivals,
    })
}

pub async fn party_comparison(pool: &DbPool) -> Result<PartyComparison, CoreError> {
    let rows = civica_db::analytics::party_standings(pool).await?;
    let all_votes: i64 = rows.iter().map(|r| r.votes).sum();

    let parties = rows
        .into_iter()
        .map(|r| PartyStanding {
            party: r.party,
            politicians: r.politicians,
            votes: r.votes,
            vote_share: share(r.votes, all_votes),
            average_rating: r.avg_rating,
        })
        .collect();

    Ok(PartyComparison { parties })
}
