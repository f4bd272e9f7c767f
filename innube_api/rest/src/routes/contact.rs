use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{self, MethodRouter},
    Json, Router,
};
use innube_core_contact_contracts::{ContactSendMessageError, ContactService};
use innube_models::contact::{ContactSubmission, ContactSubmissionError};

use crate::{
    errors::{failure, send_failed, METHOD_NOT_ALLOWED, MISSING_API_KEY, MISSING_FIELDS},
    models::{contact::ApiContactSubmission, ApiResult},
};

pub fn router<S: ContactService>(service: Arc<S>) -> Router<()> {
    Router::new()
        .route("/contact", contact_route::<S>())
        .route("/api/contact", contact_route::<S>())
        .with_state(service)
}

fn contact_route<S: ContactService>() -> MethodRouter<Arc<S>> {
    routing::post(send_message::<S>)
        .options(preflight)
        .fallback(method_not_allowed)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    failure(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}

async fn send_message<S: ContactService>(
    service: State<Arc<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|x| x.to_str().ok());

    let submission = match ApiContactSubmission::parse(content_type, &body) {
        Ok(submission) => submission,
        Err(err) => return send_failed(err),
    };

    let submission = match ContactSubmission::try_from(submission) {
        Ok(submission) => submission,
        Err(ContactSubmissionError::MissingFields) => {
            return failure(StatusCode::BAD_REQUEST, MISSING_FIELDS)
        }
    };

    match service.send_message(submission).await {
        Ok(result) => Json(ApiResult::Ok(result)).into_response(),
        Err(ContactSendMessageError::NotConfigured) => {
            failure(StatusCode::INTERNAL_SERVER_ERROR, MISSING_API_KEY)
        }
        Err(ContactSendMessageError::Other(err)) => send_failed(err),
    }
}
