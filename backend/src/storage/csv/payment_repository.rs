//! # CSV Payment Repository
//!
//! Payments made to users (`payments.csv`), queried by time range for
//! reconciliation against a pay period.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tracing::warn;

use super::connection::{CsvConnection, Table};
use crate::domain::models::payment::PaymentRecord;
use crate::domain::pay_period::PayPeriodCalculator;
use crate::storage::PaymentStorage;

#[derive(Clone)]
pub struct PaymentRepository {
    connection: CsvConnection,
    calculator: PayPeriodCalculator,
}

impl PaymentRepository {
    pub fn new(connection: CsvConnection, calculator: PayPeriodCalculator) -> Self {
        Self {
            connection,
            calculator,
        }
    }

    /// Replace the payment table
    pub fn store_payments(&self, payments: &[PaymentRecord]) -> Result<()> {
        self.connection.write_rows(Table::Payments, payments)
    }
}

#[async_trait]
impl PaymentStorage for PaymentRepository {
    async fn list_payments(
        &self,
        user_id: &str,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> Result<Vec<PaymentRecord>> {
        let rows: Vec<PaymentRecord> = self.connection.read_rows(Table::Payments)?;

        let mut payments = Vec::new();
        for payment in rows.into_iter().filter(|p| p.user_id == user_id) {
            let paid_at = match self.calculator.parse_anchor(&payment.paid_at) {
                Ok(paid_at) => paid_at,
                Err(e) => {
                    warn!("Skipping payment '{}': {}", payment.id, e);
                    continue;
                }
            };
            if from <= paid_at && paid_at < to {
                payments.push((paid_at, payment));
            }
        }

        payments.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(payments.into_iter().map(|(_, payment)| payment).collect())
    }
}
