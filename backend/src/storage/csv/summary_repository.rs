//! # CSV Summary Repository
//!
//! Weekly commission summaries (`summaries.csv`). The most recent summary of
//! a user anchors that user's current pay period.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tracing::warn;

use super::connection::{CsvConnection, Table};
use crate::domain::models::summary::CommissionSummary;
use crate::domain::pay_period::PayPeriodCalculator;
use crate::storage::SummaryStorage;

#[derive(Clone)]
pub struct SummaryRepository {
    connection: CsvConnection,
    calculator: PayPeriodCalculator,
}

impl SummaryRepository {
    /// `calculator` interprets stored timestamps that carry no offset
    pub fn new(connection: CsvConnection, calculator: PayPeriodCalculator) -> Self {
        Self {
            connection,
            calculator,
        }
    }

    /// Replace the summary table
    pub fn store_summaries(&self, summaries: &[CommissionSummary]) -> Result<()> {
        self.connection.write_rows(Table::Summaries, summaries)
    }

    /// Summaries of one user paired with their parsed creation time.
    /// Rows whose timestamp can't be read are left out.
    fn read_user_summaries(&self, user_id: &str) -> Result<Vec<(DateTime<FixedOffset>, CommissionSummary)>> {
        let rows: Vec<CommissionSummary> = self.connection.read_rows(Table::Summaries)?;

        let mut summaries = Vec::new();
        for summary in rows.into_iter().filter(|s| s.user_id == user_id) {
            match self.calculator.parse_anchor(&summary.created_at) {
                Ok(created_at) => summaries.push((created_at, summary)),
                Err(e) => warn!("Skipping summary '{}': {}", summary.id, e),
            }
        }

        summaries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(summaries)
    }
}

#[async_trait]
impl SummaryStorage for SummaryRepository {
    async fn latest_summary_for_user(&self, user_id: &str) -> Result<Option<CommissionSummary>> {
        Ok(self
            .read_user_summaries(user_id)?
            .pop()
            .map(|(_, summary)| summary))
    }

    async fn list_summaries_for_user(&self, user_id: &str) -> Result<Vec<CommissionSummary>> {
        Ok(self
            .read_user_summaries(user_id)?
            .into_iter()
            .map(|(_, summary)| summary)
            .collect())
    }
}
