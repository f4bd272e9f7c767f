//! In-memory stand-in for the Resend email api.
//!
//! Accepts `POST /emails` with a bearer api key, records every accepted email
//! and answers with a random id. Emails addressed to [`FAILING_RECIPIENT`] are
//! rejected with a server error.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;
use uuid::Uuid;

pub const EMAILS_ROUTE: &str = "/emails";

/// Recipient that always makes the fake api fail with `500 Internal Server Error`.
pub const FAILING_RECIPIENT: &str = "fail@example.com";

#[derive(Debug, Clone, Default)]
pub struct Mailbox(Arc<Mutex<Vec<Value>>>);

impl Mailbox {
    /// All emails accepted so far, as the raw json request bodies.
    pub async fn emails(&self) -> Vec<Value> {
        self.0.lock().await.clone()
    }
}

#[derive(Debug, Clone)]
struct ServerState {
    api_key: Arc<str>,
    mailbox: Mailbox,
}

pub fn router(api_key: &str, mailbox: Mailbox) -> Router<()> {
    Router::new()
        .route(EMAILS_ROUTE, routing::post(send_email))
        .with_state(ServerState {
            api_key: api_key.into(),
            mailbox,
        })
}

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting resend testing server on {host}:{port}");
    info!("Resend endpoint: http://{host}:{port}");
    info!("Api key: {api_key:?}");
    info!("Emails sent to {FAILING_RECIPIENT:?} are rejected with a server error");

    let router = router(&api_key, Mailbox::default());

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

/// Serves the fake api on an ephemeral localhost port in the background.
///
/// Returns the address to connect to and the mailbox collecting the accepted
/// emails.
pub async fn spawn(api_key: &str) -> anyhow::Result<(SocketAddr, Mailbox)> {
    let mailbox = Mailbox::default();
    let router = router(api_key, mailbox.clone());

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .context("Failed to bind to an ephemeral port")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move { axum::serve(listener, router).await });

    Ok((addr, mailbox))
}

#[derive(Deserialize)]
struct SendEmailRequest {
    from: Option<String>,
    to: Option<Vec<String>>,
    subject: Option<String>,
    html: Option<String>,
    text: Option<String>,
}

async fn send_email(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|x| x.to_str().ok());
    match authorization.and_then(|x| x.strip_prefix("Bearer ")) {
        None => {
            return error(
                StatusCode::UNAUTHORIZED,
                "missing_api_key",
                "Missing API key in the authorization header.",
            )
        }
        Some(key) if key != &*state.api_key => {
            return error(StatusCode::FORBIDDEN, "invalid_api_key", "API key is invalid.")
        }
        Some(_) => {}
    }

    let Ok(request) = serde_json::from_value::<SendEmailRequest>(body.clone()) else {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "Invalid request body.",
        );
    };

    let missing = if request.from.is_none() {
        Some("from")
    } else if request.to.as_ref().is_none_or(Vec::is_empty) {
        Some("to")
    } else if request.subject.is_none() {
        Some("subject")
    } else if request.html.is_none() && request.text.is_none() {
        Some("html")
    } else {
        None
    };
    if let Some(field) = missing {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            &format!("Missing `{field}` field."),
        );
    }

    if request
        .to
        .iter()
        .flatten()
        .any(|to| to == FAILING_RECIPIENT)
    {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "application_error",
            "Something went wrong.",
        );
    }

    state.mailbox.0.lock().await.push(body);

    Json(json!({ "id": Uuid::new_v4() })).into_response()
}

fn error(status: StatusCode, name: &str, message: &str) -> Response {
    let body = json!({
        "statusCode": status.as_u16(),
        "name": name,
        "message": message,
    });
    (status, Json(body)).into_response()
}
