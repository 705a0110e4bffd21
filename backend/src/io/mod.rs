//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Requests are
//! deserialized into the shared DTOs, mapped into domain types, handed to a
//! service, and the result is mapped back.

pub mod rest;
