//! Mappers between domain models and the shared DTOs.

pub mod pay_period_mapper;
pub mod payment_mapper;
pub mod peer_mapper;
pub mod registration_mapper;
pub mod summary_mapper;
