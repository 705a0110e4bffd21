//! Mappers for the registration form and its validation result.

use crate::domain::validation::{RegistrationForm, ValidationError};
use shared::{FieldError, RegistrationRequest};

pub struct RegistrationMapper;

impl RegistrationMapper {
    pub fn to_domain(dto: RegistrationRequest) -> RegistrationForm {
        RegistrationForm {
            name: dto.name,
            email: dto.email,
            cpf: dto.cpf,
        }
    }

    pub fn field_error_to_dto(error: &ValidationError) -> FieldError {
        FieldError {
            field: error.field.to_string(),
            message: error.message.clone(),
        }
    }
}
