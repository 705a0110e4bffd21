use serde::{Deserialize, Serialize};
use std::fmt;

/// A Thursday-to-Wednesday settlement window as sent over the wire.
///
/// The display and ISO strings are produced from the same calendar date on
/// the backend, so the two representations of a boundary always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Timestamp the period was derived from (RFC 3339, organization offset)
    pub anchor: String,
    /// First day of the period, always a Thursday (YYYY-MM-DD)
    pub start_date: String,
    /// Last day of the period, always a Wednesday (YYYY-MM-DD)
    pub end_date: String,
    /// First day formatted for display (DD/MM/YYYY)
    pub start_display: String,
    /// Last day formatted for display (DD/MM/YYYY)
    pub end_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPeriodRequest {
    /// Anchor timestamp; the server clock is used when absent
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPeriodResponse {
    pub period: PayPeriod,
}

/// Roles of the sales hierarchy, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Corretor,
    Gerente,
    Superintendente,
    Diretor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Corretor => "corretor",
            Role::Gerente => "gerente",
            Role::Superintendente => "superintendente",
            Role::Diretor => "diretor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the peer table, as returned to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerRecord {
    pub id: String,
    /// Nickname identifying the person this row describes
    pub nickname: String,
    pub role: Role,
    pub gerente: Option<String>,
    pub superintendente: Option<String>,
    pub diretor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisiblePeersRequest {
    /// Raw role string of the caller; unknown roles see nothing
    pub role: String,
    /// Nickname of the caller
    pub identifier: String,
    /// Admin override, bypasses the hierarchy
    #[serde(default)]
    pub view_as_admin: bool,
}

/// Describes what the caller is allowed to see
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibilityScope {
    Everything,
    Matching {
        /// Name of the peer field the identifiers are matched against
        field: String,
        identifiers: Vec<String>,
    },
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisiblePeersResponse {
    pub scope: VisibilityScope,
    pub records: Vec<PeerRecord>,
}

/// Weekly commission summary for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub id: String,
    pub user_id: String,
    /// Creation timestamp (RFC 3339); empty for a zeroed summary
    pub created_at: String,
    pub sales_count: u32,
    pub sales_volume: f64,
    pub commission_due: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPeriodResponse {
    pub period: PayPeriod,
    pub summary: CommissionSummary,
    /// False when no summary exists yet and a zeroed one was substituted
    pub has_summary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub user_id: String,
    /// Payment timestamp (RFC 3339)
    pub paid_at: String,
    pub amount: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReconciliationRequest {
    /// Any timestamp inside the period to reconcile; current period when absent
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReconciliationResponse {
    pub period: PayPeriod,
    pub commission_due: f64,
    pub total_paid: f64,
    /// commission_due - total_paid; negative when overpaid
    pub outstanding: f64,
    pub payments: Vec<PaymentRecord>,
}

/// Which level of the hierarchy the leaderboard aggregates by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingView {
    Corretores,
    Gerentes,
    Superintendentes,
}

impl Default for RankingView {
    fn default() -> Self {
        RankingView::Corretores
    }
}

impl fmt::Display for RankingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankingView::Corretores => "corretores",
            RankingView::Gerentes => "gerentes",
            RankingView::Superintendentes => "superintendentes",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position in the full ranking, not in the page
    pub position: u32,
    pub nickname: String,
    pub sales_count: u32,
    pub sales_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPage {
    pub view: RankingView,
    pub search: String,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub total_count: u32,
    pub entries: Vec<RankingEntry>,
}

impl RankingPage {
    pub fn has_more(&self) -> bool {
        (self.page as u64) * (self.page_size as u64) < self.total_count as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRequest {
    #[serde(default)]
    pub view: RankingView,
    #[serde(default)]
    pub search: String,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSearchRequest {
    #[serde(default)]
    pub view: RankingView,
    pub term: String,
    /// Debounce session; searches from the same client supersede each other
    #[serde(default)]
    pub client: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshRankingRequest {
    #[serde(default)]
    pub view: RankingView,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    /// Brazilian national ID, with or without punctuation
    pub cpf: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationValidationResponse {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}
