//! Domain model for a weekly commission summary.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub id: String,
    pub user_id: String,
    pub created_at: String, // timestamp as stored; the pay period anchor
    pub sales_count: u32,
    pub sales_volume: f64,
    pub commission_due: f64,
}

impl CommissionSummary {
    /// Empty summary shown before the first one exists for a user
    pub fn zeroed(user_id: &str) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.to_string(),
            created_at: String::new(),
            sales_count: 0,
            sales_volume: 0.0,
            commission_due: 0.0,
        }
    }
}
