//! Request budget for paging through issue listings.
//!
//! Every page of `GET /repos/{owner}/{repo}/issues` spends one request of the
//! core budget. Before asking for a page the source reads the budget and,
//! when fewer than [`PAGE_RESERVE`] requests are left, sleeps until GitHub
//! refills it.

use crate::source::SourceError;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Requests kept in hand before the source pauses paging.
pub const PAGE_RESERVE: usize = 5;

/// Longest pause the source accepts for a budget refill.
pub const LONGEST_PAUSE: Duration = Duration::from_secs(60 * 60);

/// Snapshot of the core request budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBudget {
    pub remaining: usize,
    pub limit: usize,
    /// When GitHub refills the budget.
    pub refills_at: DateTime<Utc>,
}

impl RequestBudget {
    /// Builds a budget from the counters GitHub reports.
    ///
    /// `reset` is a Unix timestamp; one that cannot be represented is treated
    /// as already passed.
    #[must_use]
    pub fn new(remaining: usize, limit: usize, reset: u64) -> Self {
        let refills_at = i64::try_from(reset)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or(DateTime::UNIX_EPOCH);

        Self {
            remaining,
            limit,
            refills_at,
        }
    }

    /// Whether another page can be requested without pausing.
    #[must_use]
    pub fn covers_next_page(&self) -> bool {
        self.remaining >= PAGE_RESERVE
    }

    /// How long to pause before the next page at `now`.
    ///
    /// `None` when the budget suffices or the refill time has already passed.
    /// Pauses are capped at [`LONGEST_PAUSE`].
    #[must_use]
    pub fn pause_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.covers_next_page() {
            return None;
        }

        let pause = (self.refills_at - now)
            .to_std()
            .ok()
            .filter(|pause| !pause.is_zero())?;

        if pause > LONGEST_PAUSE {
            warn!(
                pause_secs = pause.as_secs(),
                "Budget refill is more than an hour away, pausing for an hour"
            );
        }
        Some(pause.min(LONGEST_PAUSE))
    }
}

/// Reads the core request budget.
///
/// # Errors
///
/// Returns [`SourceError::GitHubError`] if the rate limit endpoint fails.
pub async fn fetch_budget(octocrab: &Octocrab) -> Result<RequestBudget, SourceError> {
    let limits = octocrab.ratelimit().get().await?;
    let core = &limits.resources.core;

    let budget = RequestBudget::new(core.remaining, core.limit, core.reset);
    debug!(
        remaining = budget.remaining,
        limit = budget.limit,
        "Read request budget"
    );
    Ok(budget)
}

/// Sleeps until the budget refills if it is too low for another page.
///
/// Returns the pause taken, if any.
pub async fn pause_for_budget(budget: &RequestBudget) -> Option<Duration> {
    let pause = budget.pause_at(Utc::now())?;

    info!(
        remaining = budget.remaining,
        pause_secs = pause.as_secs(),
        "Request budget low, pausing before next page"
    );
    tokio::time::sleep(pause).await;
    Some(pause)
}

/// Makes sure one more page can be requested, pausing when needed.
///
/// # Errors
///
/// Returns [`SourceError::GitHubError`] if the budget cannot be read.
pub async fn reserve_page(octocrab: &Octocrab) -> Result<(), SourceError> {
    let budget = fetch_budget(octocrab).await?;
    pause_for_budget(&budget).await;
    Ok(())
}
