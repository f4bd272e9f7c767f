use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::models::ApiResult;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const MISSING_FIELDS: &str = "Faltan campos obligatorios";
pub const MISSING_API_KEY: &str = "Falta RESEND_API_KEY en Vercel";
pub const SEND_FAILED: &str = "Error enviando correo";

/// Logs the full error and answers with the generic delivery failure.
pub fn send_failed(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    error!("Failed to send contact message: {err:?}");
    failure(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED)
}

pub fn failure(code: StatusCode, message: &'static str) -> Response {
    (code, Json(ApiResult::<()>::Err(message))).into_response()
}
