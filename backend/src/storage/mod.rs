//! # Storage Module
//!
//! Data access for the sales portal. The domain layer depends on the traits
//! in [`traits`]; [`csv`] implements them over CSV tables in a data
//! directory:
//!
//! ```text
//! data/
//! ├── peers.csv
//! ├── summaries.csv
//! └── payments.csv
//! ```
//!
//! Every table is created with its header on first use, and the ranking is
//! computed from `peers.csv` and `summaries.csv`.

pub mod csv;
pub mod traits;

pub use self::csv::{CsvConnection, PaymentRepository, PeerRepository, RankingRepository, SummaryRepository};
pub use traits::{PaymentStorage, PeerStorage, RankingSource, SummaryStorage};
