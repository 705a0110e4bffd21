//! # REST API Interface Layer
//!
//! HTTP endpoints of the sales portal, all mounted under `/api`.
//!
//! - `GET  /pay-period?anchor=` compute a pay period
//! - `GET  /users/:user_id/pay-period` current period and latest summary
//! - `GET  /users/:user_id/payments?anchor=` payment reconciliation
//! - `GET  /peers?role=&identifier=&view_as_admin=` visible peer records
//! - `GET  /ranking?view=&search=&page=` leaderboard page
//! - `GET  /ranking/search?view=&term=&client=` debounced search, 204 when superseded
//! - `POST /ranking/refresh` drop the cached entry and reload
//! - `POST /registrations/validate` registration form checks
//!
//! Failures are answered through `PortalError`, so every error body has the
//! same `{ "error": ... }` shape. Handlers extract through the wrappers in
//! [`extract`], so malformed query strings and bodies get that shape too.

pub mod extract;
pub mod mappers;
pub mod pay_period_apis;
pub mod peer_apis;
pub mod ranking_apis;
pub mod registration_apis;
pub mod summary_apis;
