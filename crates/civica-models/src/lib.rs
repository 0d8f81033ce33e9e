pub mod analytics;
pub mod politician;
pub mod poll;

pub use analytics::{
    AnalyticsOverview, BreakdownBucket, PartyComparison, PartyStanding, PoliticianComparison,
    RivalStanding,
};
pub use politician::Politician;
pub use poll::{OptionStat, Poll, PollOption, PollStats, PollStatus};
