//! # CSV Storage Module
//!
//! File-based implementation of the storage traits. Each table lives in its
//! own CSV file under the data directory and is rewritten atomically through
//! a temp file.
//!
//! ```csv
//! id,user_id,created_at,sales_count,sales_volume,commission_due
//! s-a2,u-001,2024-03-18T09:00:00-03:00,1,700000,21000
//! ```

pub mod connection;
pub mod payment_repository;
pub mod peer_repository;
pub mod ranking_repository;
pub mod summary_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::{CsvConnection, Table};
pub use payment_repository::PaymentRepository;
pub use peer_repository::PeerRepository;
pub use ranking_repository::RankingRepository;
pub use summary_repository::SummaryRepository;
