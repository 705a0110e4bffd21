//! Error type shared by the domain services and the REST layer.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::validation::ValidationError;
use crate::io::rest::mappers::registration_mapper::RegistrationMapper;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Input that cannot be interpreted at all (bad timestamp, page 0, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Form input that was understood but rejected by a business rule
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// Failure reported by the storage collaborator
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type PortalResult<T> = Result<T, PortalError>;

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl PortalError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PortalError::InvalidInput(message.into())
    }

    /// Names of the rejected form fields, without the submitted values
    pub fn failing_fields(&self) -> Vec<String> {
        match self {
            PortalError::Validation(errors) => errors.iter().map(|e| e.field.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::InvalidInput(_) | PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for PortalError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Rejected query string: {}", rejection.body_text());
        PortalError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for PortalError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Rejected path: {}", rejection.body_text());
        PortalError::InvalidInput(rejection.body_text())
    }
}

impl From<JsonRejection> for PortalError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected JSON body: {}", rejection.body_text());
        PortalError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {:#}", self);
        }

        let fields = match &self {
            PortalError::Validation(errors) => errors
                .iter()
                .map(RegistrationMapper::field_error_to_dto)
                .collect(),
            _ => Vec::new(),
        };
        let body = ErrorResponse {
            // Storage details stay in the log
            error: match &self {
                PortalError::Storage(_) => "Erro ao acessar os dados. Tente novamente.".to_string(),
                other => other.to_string(),
            },
            fields,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::Field;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PortalError::invalid_input("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PortalError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PortalError::from(anyhow::anyhow!("disk on fire")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = PortalError::Validation(vec![
            ValidationError::new(Field::Email, "domain not allowed"),
            ValidationError::new(Field::Cpf, "check digits do not match"),
        ]);
        let message = err.to_string();
        assert!(message.contains("email: domain not allowed"));
        assert!(message.contains("cpf: check digits do not match"));
    }

    #[test]
    fn test_failing_fields_leave_out_submitted_values() {
        let err = PortalError::Validation(vec![
            ValidationError::new(Field::Email, "domain 'gmail.com' is not a corporate domain"),
            ValidationError::new(Field::Cpf, "check digits do not match"),
        ]);
        let fields = err.failing_fields();
        assert_eq!(fields, vec!["email".to_string(), "cpf".to_string()]);
        assert!(!format!("{:?}", fields).contains("gmail"));
        assert!(PortalError::invalid_input("bad").failing_fields().is_empty());
    }
}
