//! Payload types for the public REST endpoints.
//!
//! Every struct decodes leniently: missing fields fall back to their default
//! value, matching how the platform omits empty fields.

use serde::{Deserialize, Serialize};

use crate::enums::SubscriptionName;

/// Category from `/public/v1/categories`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub thumbnail: String,
}

/// Category as embedded in livestream listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivestreamCategory {
    pub id: u64,
    pub name: String,
    pub image_url: String,
}

/// Stream state embedded in a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelStream {
    pub custom_tags: Vec<String>,
    pub key: String,
    pub url: String,
    pub is_live: bool,
    pub is_mature: bool,
    pub language: String,
    pub start_time: String,
    pub thumbnail: String,
    pub viewer_count: u64,
}

/// Channel from GET `/public/v1/channels`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub banner_picture: String,
    pub broadcaster_user_id: u64,
    pub category: Category,
    pub channel_description: String,
    pub slug: String,
    pub stream: ChannelStream,
    pub stream_title: String,
}

/// Channel points reward from GET `/public/v1/channels/rewards`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelReward {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub cost: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_user_input_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_redemptions_skip_request_queue: Option<bool>,
    pub title: String,
}

/// Result of POST `/public/v1/chat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessageSent {
    pub is_sent: bool,
    pub message_id: String,
}

/// Existing event subscription from GET `/public/v1/events/subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSubscription {
    pub app_id: String,
    pub broadcaster_user_id: u64,
    pub created_at: String,
    pub event: String,
    pub id: String,
    pub method: String,
    pub updated_at: String,
    pub version: u32,
}

/// Event type and version to subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriptionRequest {
    pub name: SubscriptionName,
    pub version: u32,
}

impl SubscriptionRequest {
    pub fn new(name: SubscriptionName, version: u32) -> Self {
        Self { name, version }
    }
}

/// Per-event outcome of POST `/public/v1/events/subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedSubscription {
    pub error: String,
    pub name: String,
    pub subscription_id: String,
    pub version: u32,
}

/// Live stream from GET `/public/v1/livestreams`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Livestream {
    pub broadcaster_user_id: u64,
    pub category: LivestreamCategory,
    pub channel_id: u64,
    pub has_mature_content: bool,
    pub language: String,
    pub slug: String,
    pub started_at: String,
    pub stream_title: String,
    pub thumbnail_url: String,
    pub viewer_count: u64,
}

/// Webhook signing key from GET `/public/v1/public-key`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicKey {
    pub public_key: String,
}

/// User from GET `/public/v1/users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub email: String,
    pub name: String,
    pub profile_picture: String,
    pub user_id: u64,
}

/// Result of POST `/public/v1/token/introspect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenIntrospection {
    pub active: bool,
    pub client_id: String,
    pub exp: i64,
    pub scope: String,
    pub token_type: String,
}
