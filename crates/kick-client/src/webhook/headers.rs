//! Extraction of webhook metadata from delivery headers.

use reqwest::header::HeaderMap;

use crate::{KickError, SubscriptionName};

pub const MESSAGE_ID_HEADER: &str = "Kick-Event-Message-Id";
pub const SUBSCRIPTION_ID_HEADER: &str = "Kick-Event-Subscription-Id";
pub const SIGNATURE_HEADER: &str = "Kick-Event-Signature";
pub const TIMESTAMP_HEADER: &str = "Kick-Event-Message-Timestamp";
pub const EVENT_TYPE_HEADER: &str = "Kick-Event-Type";
pub const EVENT_VERSION_HEADER: &str = "Kick-Event-Version";

/// Metadata the platform sends alongside every webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub message_id: String,
    pub subscription_id: String,
    pub signature: String,
    pub timestamp: String,
    pub event_type: SubscriptionName,
    /// Parsed as an integer, so `"01"` and `"1"` select the same payload type.
    /// A non-numeric value fails with [`KickError::UnknownEnumValue`].
    pub event_version: u32,
}

impl WebhookHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, KickError> {
        let version = required(headers, EVENT_VERSION_HEADER)?;
        let event_version = version.parse().map_err(|_| KickError::UnknownEnumValue {
            kind: "event version",
            value: version.clone(),
        })?;

        Ok(Self {
            message_id: required(headers, MESSAGE_ID_HEADER)?,
            subscription_id: required(headers, SUBSCRIPTION_ID_HEADER)?,
            signature: required(headers, SIGNATURE_HEADER)?,
            timestamp: required(headers, TIMESTAMP_HEADER)?,
            event_type: required(headers, EVENT_TYPE_HEADER)?.parse()?,
            event_version,
        })
    }
}

fn required(headers: &HeaderMap, name: &'static str) -> Result<String, KickError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| KickError::RequestConstruction(format!("missing or invalid header {name}")))
}
