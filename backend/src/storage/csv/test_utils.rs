/// Test utilities for the CSV repositories
///
/// `TestEnvironment` owns a temporary data directory that is removed when the
/// environment is dropped, even if the test panics.
use anyhow::Result;
use chrono::FixedOffset;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::payment_repository::PaymentRepository;
use super::peer_repository::PeerRepository;
use super::ranking_repository::RankingRepository;
use super::summary_repository::SummaryRepository;
use crate::domain::hierarchy::Role;
use crate::domain::models::payment::PaymentRecord;
use crate::domain::models::peer::PeerRecord;
use crate::domain::models::summary::CommissionSummary;
use crate::domain::pay_period::PayPeriodCalculator;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
    /// Brasilia offset, as in the default config
    pub calculator: PayPeriodCalculator,
}

impl TestEnvironment {
    /// Empty data directory
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;
        let offset = FixedOffset::west_opt(3 * 3600)
            .ok_or_else(|| anyhow::anyhow!("invalid offset"))?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
            calculator: PayPeriodCalculator::new(offset),
        })
    }

    /// Data directory seeded with [`sample_peers`], [`sample_summaries`] and
    /// [`sample_payments`]
    pub async fn with_sample_data() -> Result<Self> {
        let env = Self::new().await?;
        env.peer_repository().store_peers(&sample_peers())?;
        env.summary_repository().store_summaries(&sample_summaries())?;
        env.payment_repository().store_payments(&sample_payments())?;
        Ok(env)
    }

    pub fn peer_repository(&self) -> PeerRepository {
        PeerRepository::new(self.connection.clone())
    }

    pub fn summary_repository(&self) -> SummaryRepository {
        SummaryRepository::new(self.connection.clone(), self.calculator)
    }

    pub fn payment_repository(&self) -> PaymentRepository {
        PaymentRepository::new(self.connection.clone(), self.calculator)
    }

    pub fn ranking_repository(&self) -> RankingRepository {
        RankingRepository::new(self.connection.clone())
    }
}

pub fn peer(id: &str, nickname: &str, role: Role, gerente: &str, superintendente: &str, diretor: &str) -> PeerRecord {
    let opt = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
    PeerRecord {
        id: id.to_string(),
        nickname: nickname.to_string(),
        role,
        gerente: opt(gerente),
        superintendente: opt(superintendente),
        diretor: opt(diretor),
    }
}

pub fn summary(
    id: &str,
    user_id: &str,
    created_at: &str,
    sales_count: u32,
    sales_volume: f64,
    commission_due: f64,
) -> CommissionSummary {
    CommissionSummary {
        id: id.to_string(),
        user_id: user_id.to_string(),
        created_at: created_at.to_string(),
        sales_count,
        sales_volume,
        commission_due,
    }
}

pub fn payment(id: &str, user_id: &str, paid_at: &str, amount: f64) -> PaymentRecord {
    PaymentRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        paid_at: paid_at.to_string(),
        amount,
        description: format!("Pagamento {}", id),
    }
}

/// Two directors, three superintendents, two managers, four agents.
/// duda reports straight to a superintendent.
pub fn sample_peers() -> Vec<PeerRecord> {
    vec![
        peer("u-010", "sofia", Role::Superintendente, "", "", "dora"),
        peer("u-011", "saulo", Role::Superintendente, "", "", "dora"),
        peer("u-012", "sergio", Role::Superintendente, "", "", "davi"),
        peer("u-020", "gabi", Role::Gerente, "", "sofia", "dora"),
        peer("u-021", "gil", Role::Gerente, "", "sergio", "davi"),
        peer("u-001", "ana", Role::Corretor, "gabi", "sofia", "dora"),
        peer("u-002", "bruno", Role::Corretor, "gabi", "sofia", "dora"),
        peer("u-003", "caio", Role::Corretor, "gil", "sergio", "davi"),
        peer("u-004", "duda", Role::Corretor, "", "saulo", "dora"),
    ]
}

/// ana's latest summary falls in the 14/03/2024 - 20/03/2024 period
pub fn sample_summaries() -> Vec<CommissionSummary> {
    vec![
        summary("s-a1", "u-001", "2024-03-07T09:00:00-03:00", 1, 400_000.0, 12_000.0),
        summary("s-a2", "u-001", "2024-03-18T09:00:00-03:00", 1, 700_000.0, 21_000.0),
        summary("s-b1", "u-002", "2024-03-15T09:00:00-03:00", 3, 1_500_000.0, 45_000.0),
        summary("s-c1", "u-003", "2024-03-16 11:30:00", 2, 900_000.0, 27_000.0),
        summary("s-d1", "u-004", "2024-03-12T09:00:00-03:00", 1, 200_000.0, 6_000.0),
    ]
}

pub fn sample_payments() -> Vec<PaymentRecord> {
    vec![
        payment("p-0", "u-001", "2024-03-12T10:00:00-03:00", 12_000.0),
        payment("p-1", "u-001", "2024-03-15T10:00:00-03:00", 10_000.0),
        payment("p-2", "u-001", "2024-03-19T16:30:00-03:00", 5_000.0),
        payment("p-3", "u-002", "2024-03-19T16:30:00-03:00", 45_000.0),
    ]
}
