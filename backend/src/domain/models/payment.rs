//! Domain model for a payment made to a user.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub user_id: String,
    pub paid_at: String, // timestamp as stored
    pub amount: f64,
    pub description: String,
}
