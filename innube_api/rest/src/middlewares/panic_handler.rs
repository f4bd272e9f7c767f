use std::{any::Any, panic::AssertUnwindSafe};

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use futures::FutureExt;
use tracing::error;

use crate::errors::{failure, SEND_FAILED};

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(from_fn(middleware))
}

async fn middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            error!(
                %method,
                %uri,
                "contact route handler panicked: {}",
                panic_message(&*payload)
            );
            failure(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}
