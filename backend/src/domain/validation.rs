//! Registration form validation.
//!
//! Runs before anything touches storage. Every failing field is reported,
//! not just the first one.

use std::fmt;
use thiserror::Error;

use crate::error::{PortalError, PortalResult};

const MAX_NAME_LENGTH: usize = 120;
const CPF_LENGTH: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Cpf,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Cpf => "cpf",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub cpf: String,
}

/// Check a CPF (Brazilian national ID): eleven digits, punctuation allowed,
/// not a single repeated digit, and both check digits correct.
pub fn validate_cpf(raw: &str) -> Result<(), String> {
    let mut digits = Vec::with_capacity(CPF_LENGTH);
    for c in raw.trim().chars() {
        match c {
            '0'..='9' => digits.push(c as u32 - '0' as u32),
            '.' | '-' | ' ' => {}
            _ => return Err(format!("unexpected character '{}'", c)),
        }
    }

    if digits.len() != CPF_LENGTH {
        return Err(format!("must have {} digits", CPF_LENGTH));
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return Err("repeated digits are not a valid CPF".to_string());
    }

    let first = cpf_check_digit(&digits[..9]);
    let second = cpf_check_digit(&digits[..10]);
    if digits[9] != first || digits[10] != second {
        return Err("check digits do not match".to_string());
    }

    Ok(())
}

/// Weighted mod-11 check digit over `digits`, weights counting down to 2
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let remainder = (sum * 10) % 11;
    if remainder == 10 {
        0
    } else {
        remainder
    }
}

/// Check an e-mail address against the corporate domains. An empty
/// allow-list accepts any domain.
pub fn validate_corporate_email(raw: &str, allowed_domains: &[String]) -> Result<(), String> {
    let email = raw.trim();
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("must contain exactly one '@'".to_string()),
    };

    if local.is_empty() {
        return Err("missing the part before '@'".to_string());
    }
    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(format!("'{}' is not a valid domain", domain));
    }
    if email.chars().any(char::is_whitespace) {
        return Err("must not contain spaces".to_string());
    }

    if !allowed_domains.is_empty()
        && !allowed_domains
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(domain))
    {
        return Err(format!("domain '{}' is not a corporate domain", domain));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct RegistrationValidator {
    allowed_domains: Vec<String>,
}

impl RegistrationValidator {
    pub fn new(allowed_domains: Vec<String>) -> Self {
        Self { allowed_domains }
    }

    /// Every problem with the form; empty when it is valid
    pub fn errors(&self, form: &RegistrationForm) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let name = form.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::new(Field::Name, "is required"));
        } else if name.chars().count() > MAX_NAME_LENGTH {
            errors.push(ValidationError::new(
                Field::Name,
                format!("must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }

        if form.email.trim().is_empty() {
            errors.push(ValidationError::new(Field::Email, "is required"));
        } else if let Err(message) = validate_corporate_email(&form.email, &self.allowed_domains) {
            errors.push(ValidationError::new(Field::Email, message));
        }

        if form.cpf.trim().is_empty() {
            errors.push(ValidationError::new(Field::Cpf, "is required"));
        } else if let Err(message) = validate_cpf(&form.cpf) {
            errors.push(ValidationError::new(Field::Cpf, message));
        }

        errors
    }

    pub fn validate(&self, form: &RegistrationForm) -> PortalResult<()> {
        let errors = self.errors(form);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PortalError::Validation(errors))
        }
    }
}
