//! # REST API for Pay Periods
//!
//! Computes the Thursday-to-Wednesday window enclosing a timestamp.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{PayPeriodRequest, PayPeriodResponse};
use tracing::{info, warn};

use crate::io::rest::mappers::pay_period_mapper::PayPeriodMapper;
use crate::io::rest::extract::PortalQuery;
use crate::AppState;

/// Create a router for pay period APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/pay-period", get(get_pay_period))
}

/// Period enclosing `anchor`, or the current period when no anchor is given
pub async fn get_pay_period(
    State(state): State<AppState>,
    PortalQuery(request): PortalQuery<PayPeriodRequest>,
) -> impl IntoResponse {
    info!("GET /api/pay-period - anchor: {:?}", request.anchor);

    let result = match request.anchor.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        Some(anchor) => state.calculator.compute_from_str(anchor),
        None => state.calculator.current_period(state.clock.now()),
    };

    match result {
        Ok(period) => {
            let response = PayPeriodResponse {
                period: PayPeriodMapper::to_dto(&period),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!("Failed to compute pay period: {}", e);
            e.into_response()
        }
    }
}
