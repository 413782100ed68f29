//! Webhook HTTP endpoint.
//!
//! Accepts GitHub webhook deliveries on `POST /webhooks`, verifies and
//! resolves them through a [`WebhookReceiver`], and hands every accepted
//! delivery to a channel for the caller to consume.
//!
//! # Response
//!
//! - 200 OK: delivery accepted
//! - 400 Bad Request: not a POST, not `application/json`, missing event
//!   header, bad signature or a body that is not a JSON object
//! - 404 Not Found: any other path
//! - 500 Internal Server Error: the body does not fit its payload shape, or
//!   the delivery channel is closed
//! - 501 Not Implemented: an event with no registered payload shape, unless
//!   unknown events are accepted

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{IngressError, Result};
use crate::webhook::{WebhookDelivery, WebhookReceiver, EVENT_HEADER, SIGNATURE_HEADER};

pub const WEBHOOK_PATH: &str = "/webhooks";

/// Reasons a delivery is turned away.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("only POST is accepted")]
    MethodNotAllowed,

    #[error("only application/json is accepted")]
    UnsupportedMediaType,

    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("unsupported event: {0}")]
    UnsupportedEvent(String),

    #[error("delivery channel is closed")]
    Closed,

    #[error(transparent)]
    Rejected(#[from] IngressError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::MethodNotAllowed
            | ServerError::UnsupportedMediaType
            | ServerError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            ServerError::UnsupportedEvent(_) => StatusCode::NOT_IMPLEMENTED,
            ServerError::Closed => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Rejected(err) => match err {
                IngressError::MissingSignature
                | IngressError::SignatureMismatch
                | IngressError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        (status, self.to_string()).into_response()
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    receiver: WebhookReceiver<'static>,
    deliveries: mpsc::Sender<WebhookDelivery>,
    accept_unknown: bool,
}

impl ServerState {
    /// # Arguments
    ///
    /// * `receiver` - signature policy and registry for incoming deliveries
    /// * `deliveries` - where accepted deliveries are sent
    /// * `accept_unknown` - accept events with no registered shape instead
    ///   of answering 501
    pub fn new(
        receiver: WebhookReceiver<'static>,
        deliveries: mpsc::Sender<WebhookDelivery>,
        accept_unknown: bool,
    ) -> Self {
        ServerState {
            inner: Arc::new(ServerStateInner {
                receiver,
                deliveries,
                accept_unknown,
            }),
        }
    }
}

/// Builds the router: `POST /webhooks`, 400 for other methods on that path
/// and 404 everywhere else.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route(
            WEBHOOK_PATH,
            post(webhook_handler).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
}

/// Serves `build_router(state)` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: ServerState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(
        "Listening for webhook deliveries on {}{}",
        listener.local_addr()?,
        WEBHOOK_PATH
    );
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn webhook_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<StatusCode, ServerError> {
    if !is_json(&headers) {
        return Err(ServerError::UnsupportedMediaType);
    }
    let event = get_header(&headers, EVENT_HEADER)?;
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    debug!(event = %event, bytes = body.len(), "received webhook");

    let delivery = state
        .inner
        .receiver
        .receive(event, signature, &body)
        .inspect_err(|e| warn!(event = %event, error = %e, "rejected webhook delivery"))?;

    if delivery.payload.is_unknown() && !state.inner.accept_unknown {
        return Err(ServerError::UnsupportedEvent(event.to_string()));
    }

    state
        .inner
        .deliveries
        .send(delivery)
        .await
        .map_err(|_| ServerError::Closed)?;
    Ok(StatusCode::OK)
}

async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// `application/json`, optionally with parameters such as `charset`.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

fn get_header<'h>(
    headers: &'h HeaderMap,
    name: &'static str,
) -> std::result::Result<&'h str, ServerError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(ServerError::MissingHeader(name))
}
