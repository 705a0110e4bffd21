//! # Storage Traits
//!
//! Read-only interfaces to the portal's data tables. The domain services only
//! see these traits, so the CSV tables used here can be swapped for the
//! hosted database without touching the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use shared::{RankingPage, RankingView};

use crate::domain::models::payment::PaymentRecord;
use crate::domain::models::peer::PeerRecord;
use crate::domain::models::summary::CommissionSummary;

/// The peer table carrying manager/superintendent/director fields
#[async_trait]
pub trait PeerStorage: Send + Sync {
    /// Every row of the peer table
    async fn list_peers(&self) -> Result<Vec<PeerRecord>>;

    /// Nicknames of the superintendents whose `diretor` field is `director`
    async fn list_superintendents_for_director(&self, director: &str) -> Result<Vec<String>>;
}

/// Weekly commission summaries
#[async_trait]
pub trait SummaryStorage: Send + Sync {
    /// Most recently created summary for a user, if any
    async fn latest_summary_for_user(&self, user_id: &str) -> Result<Option<CommissionSummary>>;

    /// Every summary of a user, oldest first
    async fn list_summaries_for_user(&self, user_id: &str) -> Result<Vec<CommissionSummary>>;
}

/// Payments made to users
#[async_trait]
pub trait PaymentStorage: Send + Sync {
    /// Payments of a user with `from <= paid_at < to`, oldest first
    async fn list_payments(
        &self,
        user_id: &str,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> Result<Vec<PaymentRecord>>;
}

/// The paginated ranking computation
#[async_trait]
pub trait RankingSource: Send + Sync {
    /// One page (1-based) of the ranking for `view`, filtered by `search`
    async fn fetch_ranking(
        &self,
        view: RankingView,
        search: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RankingPage>;
}
