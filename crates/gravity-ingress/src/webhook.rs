//! GitHub webhook deliveries.
//!
//! A delivery names its event in the `X-GitHub-Event` header (`issue_comment`,
//! `watch`, ...) instead of a `type` field. Known header names are mapped to
//! the feed discriminator and the body resolved through the same registry as
//! the activity feed, so both paths yield identical shapes. Any other name is
//! kept verbatim as an `UnknownEvent` without consulting the registry.
//!
//! When a secret is configured the `X-Hub-Signature-256: sha256=<hex>` header
//! must carry the HMAC-SHA256 of the raw body. Verification happens before
//! the body is parsed.

use gravity_core::Registry;
use gravity_model::{Event, EventKind, Repository, UnknownEvent, User};
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::error::{IngressError, Result};

pub const EVENT_HEADER: &str = "x-github-event";
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

type HmacSha256 = Hmac<Sha256>;

/// Parses a signature header (`sha256=<hex>`) into raw bytes.
///
/// Returns `None` for a missing prefix, another algorithm or invalid hex.
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.trim().strip_prefix("sha256=")?;
    hex::decode(hex_sig).ok()
}

/// HMAC-SHA256 of `payload` under `secret`.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| IngressError::Config(format!("unusable webhook secret: {e}")))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Formats a signature as a header value, `sha256=<hex>`.
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}

/// Checks `signature_header` against `payload` in constant time.
///
/// Malformed headers verify as `false`.
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some(expected) = parse_signature_header(signature_header) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Signature policy for incoming deliveries.
#[derive(Clone, Default)]
pub struct WebhookVerifier {
    secret: Option<Vec<u8>>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl WebhookVerifier {
    /// `None` or an empty secret disables verification.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret
                .filter(|s| !s.is_empty())
                .map(|s| s.as_bytes().to_vec()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// # Errors
    ///
    /// `MissingSignature` when a secret is set and no header was supplied,
    /// `SignatureMismatch` when the header does not match the body.
    pub fn verify(&self, body: &[u8], signature_header: Option<&str>) -> Result<()> {
        let Some(secret) = &self.secret else {
            debug!("no webhook secret configured, skipping signature check");
            return Ok(());
        };
        let header = signature_header.ok_or(IngressError::MissingSignature)?;
        if verify_signature(body, header, secret) {
            Ok(())
        } else {
            warn!("webhook signature mismatch");
            Err(IngressError::SignatureMismatch)
        }
    }
}

/// A resolved webhook delivery.
///
/// `sender` and `repository` accompany every delivery but are not part of the
/// feed payload shapes, so they are lifted out of the body before resolving.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookDelivery {
    /// Raw `X-GitHub-Event` header value
    pub event: String,
    /// Feed discriminator the payload was resolved under, `None` for event
    /// names with no feed counterpart
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    pub payload: Event,
}

/// Feed discriminator for an `X-GitHub-Event` name.
///
/// Only GitHub's snake_case event names map; feed discriminators such as
/// `ForkEvent` are not webhook names and yield `None`.
pub fn discriminator_for(event_name: &str) -> Option<&'static str> {
    EventKind::from_webhook_name(event_name).and_then(|kind| kind.discriminator())
}

/// Best-effort read of a top-level record; a misshapen value reads as absent.
fn lift<T: DeserializeOwned>(fields: &Map<String, Value>, name: &str) -> Option<T> {
    let value = fields.get(name)?;
    match T::deserialize(value) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(field = name, error = %e, "ignoring misshapen delivery field");
            None
        }
    }
}

/// Resolve a delivery body through `registry`.
pub fn decode_delivery(
    registry: &Registry,
    event_name: &str,
    body: &[u8],
) -> Result<WebhookDelivery> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| IngressError::InvalidPayload(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(IngressError::InvalidPayload(
            "body is not a JSON object".to_string(),
        ));
    };

    let discriminator = discriminator_for(event_name);
    let sender = lift::<User>(&fields, "sender");
    let repository = lift::<Repository>(&fields, "repository");
    let payload = match discriminator {
        Some(discriminator) => registry.resolve(discriminator, fields)?,
        None => Event::Unknown(UnknownEvent::new(fields)),
    };
    Ok(WebhookDelivery {
        event: event_name.to_string(),
        discriminator,
        sender,
        repository,
        payload,
    })
}

/// Verifies and resolves webhook deliveries.
#[derive(Debug, Clone)]
pub struct WebhookReceiver<'r> {
    verifier: WebhookVerifier,
    registry: &'r Registry,
}

impl<'r> WebhookReceiver<'r> {
    pub fn new(verifier: WebhookVerifier, registry: &'r Registry) -> Self {
        Self { verifier, registry }
    }

    pub fn receive(
        &self,
        event_name: &str,
        signature_header: Option<&str>,
        body: &[u8],
    ) -> Result<WebhookDelivery> {
        self.verifier.verify(body, signature_header)?;
        let delivery = decode_delivery(self.registry, event_name, body)?;
        info!(
            event = "webhook.received",
            name = %delivery.event,
            discriminator = delivery.discriminator.unwrap_or("-"),
            kind = %delivery.payload.kind(),
        );
        Ok(delivery)
    }
}
