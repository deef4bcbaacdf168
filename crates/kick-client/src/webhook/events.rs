//! Typed webhook payloads.

use serde::{Deserialize, Deserializer, Serialize};

/// A user as it appears in event payloads (broadcaster, sender, follower...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUser {
    pub is_anonymous: bool,
    /// `None` for anonymous users.
    pub user_id: Option<u64>,
    pub username: String,
    pub is_verified: bool,
    pub profile_picture: String,
    pub channel_slug: String,
}

/// Character range of an emote inside a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotePosition {
    #[serde(rename = "s")]
    pub start: u32,
    #[serde(rename = "e")]
    pub end: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessageEmote {
    #[serde(deserialize_with = "string_or_number")]
    pub emote_id: String,
    pub positions: Vec<EmotePosition>,
}

/// `chat.message.sent`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessageEvent {
    pub message_id: String,
    pub broadcaster: EventUser,
    pub sender: EventUser,
    pub content: String,
    pub emotes: Vec<ChatMessageEmote>,
}

/// `channel.followed`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelFollowEvent {
    pub broadcaster: EventUser,
    pub follower: EventUser,
}

/// `channel.subscription.renewal`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSubscriptionRenewalEvent {
    pub broadcaster: EventUser,
    pub subscriber: EventUser,
    pub duration: u32,
    pub created_at: String,
}

/// `channel.subscription.gifts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSubscriptionGiftsEvent {
    pub broadcaster: EventUser,
    pub gifter: EventUser,
    pub giftees: Vec<EventUser>,
    pub created_at: String,
}

/// `channel.subscription.new`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSubscriptionCreatedEvent {
    pub broadcaster: EventUser,
    pub subscriber: EventUser,
    pub duration: u32,
    pub created_at: String,
}

/// Emote ids arrive as either JSON strings or numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
