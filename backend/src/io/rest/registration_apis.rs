//! # REST API for Registration Validation
//!
//! Checks a registration form before anything is stored. An invalid form is
//! answered with 400 and one entry per failing field.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use shared::{RegistrationRequest, RegistrationValidationResponse};
use tracing::{info, warn};

use crate::io::rest::mappers::registration_mapper::RegistrationMapper;
use crate::io::rest::extract::PortalJson;
use crate::AppState;

/// Create a router for registration APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/registrations/validate", post(validate_registration))
}

pub async fn validate_registration(
    State(state): State<AppState>,
    PortalJson(request): PortalJson<RegistrationRequest>,
) -> impl IntoResponse {
    // CPF and e-mail stay out of the log
    info!("POST /api/registrations/validate");

    let form = RegistrationMapper::to_domain(request);
    match state.registration_validator.validate(&form) {
        Ok(()) => {
            let response = RegistrationValidationResponse {
                valid: true,
                errors: Vec::new(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!("Registration rejected, failing fields: {}", e.failing_fields().join(", "));
            e.into_response()
        }
    }
}
