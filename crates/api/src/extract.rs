//! Request extractors with JSON error responses.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] whose rejection is an [`AppError`].
///
/// A missing or malformed body becomes a `400 BAD_REQUEST` in the standard
/// `{ "error", "code" }` shape instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// [`axum::extract::Path`] with an [`AppError`] rejection, so a malformed path
/// segment (e.g. a non-numeric message id) is reported as JSON.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);
