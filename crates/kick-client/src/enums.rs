//! Closed string enumerations used on the wire.
//!
//! Every enum maps through a single table in both directions. Parsing an
//! unrecognized string fails with [`KickError::UnknownEnumValue`] rather
//! than falling back to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::KickError;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// All defined members, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = KickError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(KickError::UnknownEnumValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// OAuth scope requested during authorization.
    Scope, "scope" {
        UserRead => "user:read",
        ChannelRead => "channel:read",
        ChannelWrite => "channel:write",
        ChannelRewardsRead => "channel:rewards:read",
        ChannelRewardsWrite => "channel:rewards:write",
        ChatWrite => "chat:write",
        StreamkeyRead => "streamkey:read",
        EventSubscribe => "events:subscribe",
        ModerationBan => "moderation:ban",
        ModerationChatMessageManage => "moderation:chat_message:manage",
        KicksRead => "kicks:read",
    }
}

string_enum! {
    /// Webhook event type.
    SubscriptionName, "subscription name" {
        ChatMessage => "chat.message.sent",
        ChannelFollow => "channel.followed",
        ChannelSubscriptionRenewal => "channel.subscription.renewal",
        ChannelSubscriptionGifts => "channel.subscription.gifts",
        ChannelSubscriptionCreated => "channel.subscription.new",
        LivestreamStatusUpdated => "livestream.status.updated",
    }
}

string_enum! {
    /// Delivery method for event subscriptions.
    SubscriptionMethod, "subscription method" {
        Webhook => "webhook",
    }
}

string_enum! {
    /// Token kind hint sent when revoking a token.
    TokenType, "token type" {
        Access => "access_token",
        Refresh => "refresh_token",
    }
}

string_enum! {
    /// Sort order for the livestream listing.
    LivestreamSort, "livestream sort" {
        ViewerCount => "viewer_count",
        StartedAt => "started_at",
    }
}

string_enum! {
    /// Sender kind for outgoing chat messages.
    MessageType, "message type" {
        User => "user",
        Bot => "bot",
    }
}

/// Join scopes into the space separated form used by the token endpoint.
pub fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(|scope| scope.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a space separated scope list. Any unknown scope fails the whole parse.
pub fn parse_scopes(raw: &str) -> Result<Vec<Scope>, KickError> {
    raw.split_whitespace().map(str::parse).collect()
}
