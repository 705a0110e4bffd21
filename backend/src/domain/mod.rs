//! # Domain Module
//!
//! Business logic of the sales portal, independent of HTTP and of the
//! storage format.
//!
//! ## Module Organization
//!
//! - **pay_period**: Thursday-to-Wednesday pay period calculation
//! - **hierarchy**: role-based visibility over the peer table
//! - **ranking_cache**: bounded TTL cache for leaderboard pages
//! - **ranking_service**: cached, paginated leaderboard and refresh
//! - **search**: generation-stamped debounced search
//! - **summary_service**: current period per user and payment reconciliation
//! - **validation**: registration form checks (CPF, corporate e-mail)
//! - **clock**: injectable source of the current time
//!
//! ## Business Rules
//!
//! - A pay period always starts on a Thursday and lasts seven days
//! - Anchor timestamps are read in the organization's fixed timezone
//! - An unknown role sees no records at all
//! - A search result is only delivered if no newer search replaced it
//! - A user without a summary gets zeros, never an error

pub mod clock;
pub mod hierarchy;
pub mod models;
pub mod pay_period;
pub mod ranking_cache;
pub mod ranking_service;
pub mod search;
pub mod summary_service;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use hierarchy::{RoleHierarchyService, Viewer, VisibilityScope};
pub use pay_period::{PayPeriod, PayPeriodCalculator};
pub use ranking_cache::{RankingCache, RankingCacheKey};
pub use ranking_service::{RankingService, RankingSnapshot};
pub use search::{SearchDebouncer, SearchOutcome, SearchSessions};
pub use summary_service::{PaymentReconciliation, SummaryService, UserPeriod};
pub use validation::{RegistrationForm, RegistrationValidator};
