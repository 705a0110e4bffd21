//! Domain models for rows read from the portal's data tables.

pub mod payment;
pub mod peer;
pub mod summary;
