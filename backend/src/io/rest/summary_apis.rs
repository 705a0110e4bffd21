//! # REST API for User Summaries
//!
//! A user's current pay period with their latest commission summary, and
//! the reconciliation of payments made inside a period.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::PaymentReconciliationRequest;
use tracing::{error, info};

use crate::io::rest::mappers::payment_mapper::PaymentMapper;
use crate::io::rest::mappers::summary_mapper::SummaryMapper;
use crate::io::rest::extract::{PortalPath, PortalQuery};
use crate::AppState;

/// Create a router for user summary APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/pay-period", get(get_current_period))
        .route("/users/:user_id/payments", get(get_payment_reconciliation))
}

pub async fn get_current_period(
    State(state): State<AppState>,
    PortalPath(user_id): PortalPath<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/pay-period", user_id);

    match state.summary_service.current_period(&user_id).await {
        Ok(result) => {
            let response = SummaryMapper::to_current_period_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to get current period for '{}': {}", user_id, e);
            e.into_response()
        }
    }
}

pub async fn get_payment_reconciliation(
    State(state): State<AppState>,
    PortalPath(user_id): PortalPath<String>,
    PortalQuery(request): PortalQuery<PaymentReconciliationRequest>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/payments - anchor: {:?}", user_id, request.anchor);

    match state
        .summary_service
        .reconcile_payments(&user_id, request.anchor.as_deref())
        .await
    {
        Ok(result) => {
            let response = PaymentMapper::to_reconciliation_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to reconcile payments for '{}': {}", user_id, e);
            e.into_response()
        }
    }
}
