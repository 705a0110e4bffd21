//! Request extractors whose rejections answer with the portal's JSON error
//! body instead of axum's plain-text one.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::PortalError;

/// `Query<T>` with rejections mapped to `PortalError::InvalidInput`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(PortalError))]
pub struct PortalQuery<T>(pub T);

/// `Path<T>` with rejections mapped to `PortalError::InvalidInput`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PortalError))]
pub struct PortalPath<T>(pub T);

/// `Json<T>` with rejections mapped to `PortalError::InvalidInput`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(PortalError))]
pub struct PortalJson<T>(pub T);
