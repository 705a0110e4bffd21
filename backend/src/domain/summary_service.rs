//! # Summary Service
//!
//! Answers "which pay period am I in" for a user and reconciles the
//! payments made inside a period against the commission due.
//!
//! The period of a user is anchored on their most recent commission summary.
//! A user without any summary gets a zeroed summary and the period enclosing
//! the current time, so a brand new agent still sees a sensible window.

use std::sync::Arc;
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::models::payment::PaymentRecord;
use crate::domain::models::summary::CommissionSummary;
use crate::domain::pay_period::{PayPeriod, PayPeriodCalculator};
use crate::error::PortalResult;
use crate::storage::{PaymentStorage, SummaryStorage};

#[derive(Debug, Clone, PartialEq)]
pub struct UserPeriod {
    pub period: PayPeriod,
    pub summary: CommissionSummary,
    pub has_summary: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReconciliation {
    pub period: PayPeriod,
    pub commission_due: f64,
    pub total_paid: f64,
    /// Negative when the user was overpaid
    pub outstanding: f64,
    pub payments: Vec<PaymentRecord>,
}

#[derive(Clone)]
pub struct SummaryService {
    summaries: Arc<dyn SummaryStorage>,
    payments: Arc<dyn PaymentStorage>,
    calculator: PayPeriodCalculator,
    clock: Arc<dyn Clock>,
}

impl SummaryService {
    pub fn new(
        summaries: Arc<dyn SummaryStorage>,
        payments: Arc<dyn PaymentStorage>,
        calculator: PayPeriodCalculator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            summaries,
            payments,
            calculator,
            clock,
        }
    }

    pub async fn current_period(&self, user_id: &str) -> PortalResult<UserPeriod> {
        match self.summaries.latest_summary_for_user(user_id).await? {
            Some(summary) => {
                let period = self.calculator.compute_from_str(&summary.created_at)?;
                info!("Period for '{}' anchored on summary '{}': {}", user_id, summary.id, period);
                Ok(UserPeriod {
                    period,
                    summary,
                    has_summary: true,
                })
            }
            None => {
                let period = self.calculator.current_period(self.clock.now())?;
                info!("No summary for '{}', using current period {}", user_id, period);
                Ok(UserPeriod {
                    period,
                    summary: CommissionSummary::zeroed(user_id),
                    has_summary: false,
                })
            }
        }
    }

    /// Payments inside the period of `anchor` (or the user's current period)
    /// against the commission of the latest summary in that same period.
    pub async fn reconcile_payments(
        &self,
        user_id: &str,
        anchor: Option<&str>,
    ) -> PortalResult<PaymentReconciliation> {
        let period = match anchor.map(str::trim).filter(|a| !a.is_empty()) {
            Some(anchor) => self.calculator.compute_from_str(anchor)?,
            None => self.current_period(user_id).await?.period,
        };

        let commission_due = self
            .summaries
            .list_summaries_for_user(user_id)
            .await?
            .into_iter()
            .filter(|summary| {
                self.calculator
                    .parse_anchor(&summary.created_at)
                    .map(|created_at| self.calculator.contains(&period, created_at))
                    .unwrap_or(false)
            })
            .last()
            .map(|summary| summary.commission_due)
            .unwrap_or(0.0);

        let (from, to) = self.calculator.bounds(&period)?;
        let payments = self.payments.list_payments(user_id, from, to).await?;
        let total_paid = round_cents(payments.iter().map(|p| p.amount).sum());
        let outstanding = round_cents(commission_due - total_paid);

        info!(
            "Reconciled '{}' for {}: due {:.2}, paid {:.2} in {} payments",
            user_id,
            period,
            commission_due,
            total_paid,
            payments.len()
        );

        Ok(PaymentReconciliation {
            period,
            commission_due,
            total_paid,
            outstanding,
            payments,
        })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
