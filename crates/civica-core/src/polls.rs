use chrono::{DateTime, Utc};
use civica_db::polls::{NewOption, NewPoll, PollFilter, PollOptionRow, PollPatch, PollRow};
use civica_db::DbPool;
use civica_models::{OptionStat, Poll, PollOption, PollStats, PollStatus};
use serde::Deserialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePoll {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub options: Vec<OptionInput>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub requires_verification: bool,
    pub district: Option<String>,
    pub municipality: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionInput {
    pub label: String,
    pub politician_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePoll {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<PollStatus>,
    pub end_date: Option<DateTime<Utc>>,
    pub district: Option<String>,
    pub municipality: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PollPage {
    pub polls: Vec<Poll>,
    /// Total matching rows, independent of the requested page slice.
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub poll: Poll,
    pub stats: PollStats,
}

fn to_model(row: PollRow, options: Vec<PollOptionRow>) -> Poll {
    Poll {
        id: row.id,
        title: row.title,
        description: row.description,
        category: row.category,
        // Status strings are only ever written from PollStatus::as_str.
        status: PollStatus::parse(&row.status).unwrap_or(PollStatus::Inactive),
        end_date: row.end_date,
        anonymous: row.anonymous,
        requires_verification: row.requires_verification,
        district: row.district,
        municipality: row.municipality,
        options: options
            .into_iter()
            .map(|o| PollOption {
                id: o.id,
                poll_id: o.poll_id,
                label: o.label,
                vote_count: o.vote_count,
                politician_id: o.politician_id,
            })
            .collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Derive per-option statistics from the denormalized counters. A poll with
/// zero votes reports 0% everywhere rather than dividing by zero.
pub fn poll_stats(options: &[PollOption]) -> PollStats {
    let total_votes: i64 = options.iter().map(|o| o.vote_count).sum();
    let stats = options
        .iter()
        .map(|o| OptionStat {
            option_id: o.id,
            label: o.label.clone(),
            votes: o.vote_count,
            percent: if total_votes > 0 {
                o.vote_count as f64 * 100.0 / total_votes as f64
            } else {
                0.0
            },
        })
        .collect();
    PollStats {
        total_votes,
        options: stats,
    }
}

pub async fn create_poll(pool: &DbPool, input: CreatePoll) -> Result<Poll, CoreError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    let description = input.description.trim();
    if description.is_empty() {
        return Err(CoreError::Validation(
            "description must not be empty".into(),
        ));
    }

    let options: Vec<NewOption> = input
        .options
        .iter()
        .filter(|o| !o.label.trim().is_empty())
        .map(|o| NewOption {
            label: o.label.trim().to_string(),
            politician_id: o.politician_id,
        })
        .collect();
    if options.len() < 2 {
        return Err(CoreError::Validation(
            "a poll needs at least 2 non-blank options".into(),
        ));
    }

    let new = NewPoll {
        title: title.to_string(),
        description: description.to_string(),
        category: input
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("general")
            .to_string(),
        end_date: input.end_date,
        anonymous: input.anonymous,
        requires_verification: input.requires_verification,
        district: input.district,
        municipality: input.municipality,
    };

    let (row, option_rows) = civica_db::polls::create_poll(pool, &new, &options).await?;
    tracing::info!(poll_id = row.id, "poll created");
    Ok(to_model(row, option_rows))
}

fn transition_allowed(current: PollStatus, next: PollStatus) -> bool {
    current == next
        || matches!(
            (current, next),
            (PollStatus::Active, PollStatus::Inactive) | (PollStatus::Active, PollStatus::Ended)
        )
}

pub async fn update_poll(pool: &DbPool, id: i64, input: UpdatePoll) -> Result<Poll, CoreError> {
    let existing = civica_db::polls::get_poll(pool, id)
        .await?
        .ok_or(CoreError::NotFound)?;

    if let Some(next) = input.status {
        let current = PollStatus::parse(&existing.status).unwrap_or(PollStatus::Inactive);
        if !transition_allowed(current, next) {
            return Err(CoreError::Validation(format!(
                "cannot transition poll from {} to {}",
                current.as_str(),
                next.as_str()
            )));
        }
    }
    if let Some(title) = input.title.as_deref() {
        if title.trim().is_empty() {
            return Err(CoreError::Validation("title must not be empty".into()));
        }
    }
    if let Some(description) = input.description.as_deref() {
        if description.trim().is_empty() {
            return Err(CoreError::Validation(
                "description must not be empty".into(),
            ));
        }
    }

    let patch = PollPatch {
        title: input.title,
        description: input.description,
        category: input.category,
        status: input.status.map(|s| s.as_str().to_string()),
        end_date: input.end_date,
        district: input.district,
        municipality: input.municipality,
    };
    let row = civica_db::polls::update_poll(pool, id, &patch)
        .await?
        .ok_or(CoreError::NotFound)?;
    let options = civica_db::polls::get_options(pool, id).await?;
    Ok(to_model(row, options))
}

pub async fn delete_poll(pool: &DbPool, id: i64) -> Result<(), CoreError> {
    if !civica_db::polls::delete_poll(pool, id).await? {
        return Err(CoreError::NotFound);
    }
    tracing::info!(poll_id = id, "poll deleted");
    Ok(())
}

pub async fn add_option(
    pool: &DbPool,
    poll_id: i64,
    input: OptionInput,
) -> Result<PollOption, CoreError> {
    let label = input.label.trim();
    if label.is_empty() {
        return Err(CoreError::Validation(
            "option label must not be empty".into(),
        ));
    }
    let row = civica_db::polls::add_option(pool, poll_id, label, input.politician_id)
        .await?
        .ok_or(CoreError::NotFound)?;
    Ok(PollOption {
        id: row.id,
        poll_id: row.poll_id,
        label: row.label,
        vote_count: row.vote_count,
        politician_id: row.politician_id,
    })
}

pub async fn get_poll(pool: &DbPool, id: i64) -> Result<(Poll, PollStats), CoreError> {
    let row = civica_db::polls::get_poll(pool, id)
        .await?
        .ok_or(CoreError::NotFound)?;
    let options = civica_db::polls::get_options(pool, id).await?;
    let poll = to_model(row, options);
    let stats = poll_stats(&poll.options);
    Ok((poll, stats))
}

pub async fn list_polls(
    pool: &DbPool,
    filter: &PollFilter,
    limit: i64,
    offset: i64,
) -> Result<PollPage, CoreError> {
    let rows = civica_db::polls::list_polls(pool, filter, limit, offset).await?;
    let total = civica_db::polls::count_polls(pool, filter).await?;

    let mut polls = Vec::with_capacity(rows.len());
    for row in rows {
        let options = civica_db::polls::get_options(pool, row.id).await?;
        polls.push(to_model(row, options));
    }
    Ok(PollPage { polls, total })
}

/// Record (or change) a user's vote and return the refreshed poll with
/// ledger-derived statistics.
///
/// Poll-not-found and option-not-under-poll are distinct failures so the
/// caller can surface the right message: the former is a 404, the latter a
/// validation rejection.
pub async fn cast_vote(
    pool: &DbPool,
    poll_id: i64,
    option_id: i64,
    user_id: i64,
) -> Result<VoteOutcome, CoreError> {
    let poll_row = civica_db::polls::get_poll(pool, poll_id)
        .await?
        .ok_or(CoreError::NotFound)?;

    let status = PollStatus::parse(&poll_row.status).unwrap_or(PollStatus::Inactive);
    if status != PollStatus::Active {
        return Err(CoreError::Validation(format!(
            "poll is {}, votes are no longer accepted",
            status.as_str()
        )));
    }

    let option = civica_db::polls::get_option(pool, option_id).await?;
    match option {
        Some(ref o) if o.poll_id == poll_id => {}
        _ => {
            return Err(CoreError::Validation(
                "option does not belong to this poll".into(),
            ))
        }
    }

    civica_db::votes::cast_vote(pool, poll_id, option_id, user_id).await?;
    tracing::debug!(poll_id, option_id, user_id, "vote recorded");

    let (poll, stats) = get_poll(pool, poll_id).await?;
    Ok(VoteOutcome { poll, stats })
}
