//! Webhook event authentication and decoding.
//!
//! Every delivery is signed with RSA PKCS#1 v1.5 over SHA-256 of
//! `"{message_id}.{timestamp}.{body}"`. After verification the body is
//! decoded into the payload type registered for its (event type, version).

mod events;
mod headers;
mod signature;
#[cfg(test)]
mod tests;

pub use events::{
    ChannelFollowEvent, ChannelSubscriptionCreatedEvent, ChannelSubscriptionGiftsEvent,
    ChannelSubscriptionRenewalEvent, ChatMessageEmote, ChatMessageEvent, EmotePosition, EventUser,
};
pub use headers::{
    EVENT_TYPE_HEADER, EVENT_VERSION_HEADER, MESSAGE_ID_HEADER, SIGNATURE_HEADER,
    SUBSCRIPTION_ID_HEADER, TIMESTAMP_HEADER, WebhookHeaders,
};

use serde::de::DeserializeOwned;

use crate::{KickError, SubscriptionName};
use signature::WebhookPublicKey;

/// Key the platform signs webhook deliveries with.
pub const KICK_WEBHOOK_PUBLIC_KEY: &str = "-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAq/+l1WnlRrGSolDMA+A8
6rAhMbQGmQ2SapVcGM3zq8ANXjnhDWocMqfWcTd95btDydITa10kDvHzw9WQOqp2
MZI7ZyrfzJuz5nhTPCiJwTwnEtWft7nV14BYRDHvlfqPUaZ+1KR4OCaO/wWIk/rQ
L/TjY0M70gse8rlBkbo2a8rKhu69RQTRsoaf4DVhDPEeSeI5jVrRDGAMGL3cGuyY
6CLKGdjVEM78g3JfYOvDU/RvfqD7L89TZ3iN94jrmWdGz34JNlEI5hqK8dd7C5EF
BEbZ5jgB8s8ReQV8H+MkuffjdAj3ajDDX3DOJMIut1lBrUVD1AaSrGCKHooWoL2e
twIDAQAB
-----END PUBLIC KEY-----
";

/// A decoded webhook payload.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    ChatMessage(ChatMessageEvent),
    ChannelFollow(ChannelFollowEvent),
    SubscriptionRenewal(ChannelSubscriptionRenewalEvent),
    SubscriptionGifts(ChannelSubscriptionGiftsEvent),
    SubscriptionCreated(ChannelSubscriptionCreatedEvent),
    /// Event type or version without a registered payload type.
    Unknown(serde_json::Value),
}

type Decoder = fn(&str) -> Result<WebhookEvent, serde_json::Error>;

/// Payload type registered for an (event type, version) pair.
fn decoder_for(name: SubscriptionName, version: u32) -> Option<Decoder> {
    let decoder: Decoder = match (name, version) {
        (SubscriptionName::ChatMessage, 1) => |body: &str| decode(body, WebhookEvent::ChatMessage),
        (SubscriptionName::ChannelFollow, 1) => {
            |body: &str| decode(body, WebhookEvent::ChannelFollow)
        }
        (SubscriptionName::ChannelSubscriptionRenewal, 1) => {
            |body: &str| decode(body, WebhookEvent::SubscriptionRenewal)
        }
        (SubscriptionName::ChannelSubscriptionGifts, 1) => {
            |body: &str| decode(body, WebhookEvent::SubscriptionGifts)
        }
        (SubscriptionName::ChannelSubscriptionCreated, 1) => {
            |body: &str| decode(body, WebhookEvent::SubscriptionCreated)
        }
        _ => return None,
    };
    Some(decoder)
}

fn decode<T, F>(body: &str, wrap: F) -> Result<WebhookEvent, serde_json::Error>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> WebhookEvent,
{
    serde_json::from_str(body).map(wrap)
}

/// Verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookVerifierOptions {
    /// PEM encoded RSA public key (`PUBLIC KEY` or `RSA PUBLIC KEY`).
    pub public_key_pem: String,
    /// Only disable in tests. Unsigned events are accepted when `false`.
    pub verify_signatures: bool,
}

impl Default for WebhookVerifierOptions {
    fn default() -> Self {
        Self {
            public_key_pem: KICK_WEBHOOK_PUBLIC_KEY.to_string(),
            verify_signatures: true,
        }
    }
}

impl WebhookVerifierOptions {
    /// Use a different key, for example one fetched with
    /// [`KickClient::get_public_key`](crate::KickClient::get_public_key).
    pub fn with_public_key(mut self, pem: impl Into<String>) -> Self {
        self.public_key_pem = pem.into();
        self
    }

    pub fn with_verify_signatures(mut self, verify: bool) -> Self {
        self.verify_signatures = verify;
        self
    }
}

/// Authenticates and decodes inbound webhook deliveries.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    key: WebhookPublicKey,
    verify_signatures: bool,
}

impl WebhookVerifier {
    /// Parse the configured key. Malformed key material fails with
    /// [`KickError::SignatureInvalid`].
    pub fn new(options: WebhookVerifierOptions) -> Result<Self, KickError> {
        if !options.verify_signatures {
            tracing::warn!("Webhook signature verification is disabled");
        }
        Ok(Self {
            key: WebhookPublicKey::from_pem(&options.public_key_pem)?,
            verify_signatures: options.verify_signatures,
        })
    }

    /// Verifier for the platform's published key.
    pub fn kick() -> Result<Self, KickError> {
        Self::new(WebhookVerifierOptions::default())
    }

    /// Check the signature of one delivery. Always verifies, regardless of
    /// `verify_signatures`.
    pub fn verify(
        &self,
        message_id: &str,
        timestamp: &str,
        body: &str,
        signature: &str,
    ) -> Result<(), KickError> {
        let message = format!("{message_id}.{timestamp}.{body}");
        self.key.verify(message.as_bytes(), signature)
    }

    /// Verify a delivery (unless verification is disabled) and decode its body.
    ///
    /// Versions are compared numerically. A version without a registered
    /// payload type decodes to [`WebhookEvent::Unknown`].
    pub fn verify_and_parse(
        &self,
        subscription_name: SubscriptionName,
        version: u32,
        signature: &str,
        message_id: &str,
        timestamp: &str,
        body: &str,
    ) -> Result<WebhookEvent, KickError> {
        if self.verify_signatures {
            if let Err(e) = self.verify(message_id, timestamp, body, signature) {
                tracing::warn!(
                    message_id,
                    event_type = %subscription_name,
                    error = %e,
                    "Rejected webhook delivery"
                );
                return Err(e);
            }
        }

        let event = match decoder_for(subscription_name, version) {
            Some(decode) => decode(body),
            None => {
                tracing::debug!(event_type = %subscription_name, version, "No payload type registered, decoding untyped");
                serde_json::from_str(body).map(WebhookEvent::Unknown)
            }
        };
        event.map_err(|e| {
            tracing::warn!(message_id, event_type = %subscription_name, error = %e, "Webhook body did not decode");
            KickError::EventUndecodable(e)
        })
    }

    /// [`WebhookVerifier::verify_and_parse`] with metadata taken from the
    /// delivery's HTTP headers.
    pub fn verify_and_parse_headers(
        &self,
        headers: &reqwest::header::HeaderMap,
        body: &str,
    ) -> Result<WebhookEvent, KickError> {
        let headers = WebhookHeaders::from_header_map(headers)?;
        self.verify_and_parse(
            headers.event_type,
            headers.event_version,
            &headers.signature,
            &headers.message_id,
            &headers.timestamp,
            body,
        )
    }
}
