//! Typed views over chat platform objects.
//!
//! These are the read-only shapes the row serializer accepts. They
//! deserialize straight from platform API payloads: absent and `null`
//! string fields become empty strings, and permission bitmasks accept
//! either JSON numbers or decimal strings.
//!
//! Three shapes are wrappers the caller builds before logging, because the
//! platform sub-objects do not carry their parent identifiers:
//!
//! - [`Attachment`] pairs a [`MessageAttachment`] with its message ID
//! - [`Reaction`] pairs a [`MessageReaction`] with a pre-aggregated count
//! - [`Embed`] pairs a [`MessageEmbed`] with its message ID
//!
//! # Example
//!
//! ```
//! use chatvault::model::Message;
//!
//! let json = r#"{
//!     "id": "100",
//!     "author": {"id": "7", "username": "alice", "discriminator": "0001"},
//!     "content": "hi",
//!     "attachments": [{"id": "55", "url": "https://cdn.example/attachments/1/55/a.png"}]
//! }"#;
//!
//! let msg: Message = serde_json::from_str(json)?;
//! let records = msg.attachment_records();
//! assert_eq!(records[0].message_id, "100");
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};

/// A platform user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    /// Avatar hash; empty when the user has the default avatar.
    #[serde(default, deserialize_with = "de::nullable")]
    pub avatar: String,
    #[serde(default)]
    pub bot: bool,
}

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub channel_id: String,
    pub author: User,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    /// Raw edit timestamp as sent by the platform.
    #[serde(default)]
    pub edited_timestamp: Option<String>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub attachments: Vec<MessageAttachment>,
    #[serde(default)]
    pub embeds: Vec<MessageEmbed>,
    #[serde(default)]
    pub reactions: Vec<MessageReactions>,
}

impl Message {
    /// Pairs every attachment with this message's ID.
    pub fn attachment_records(&self) -> Vec<Attachment> {
        self.attachments
            .iter()
            .map(|attachment| Attachment {
                attachment: attachment.clone(),
                message_id: self.id.clone(),
            })
            .collect()
    }

    /// Pairs every embed with this message's ID.
    pub fn embed_records(&self) -> Vec<Embed> {
        self.embeds
            .iter()
            .map(|embed| Embed {
                embed: embed.clone(),
                message_id: self.id.clone(),
            })
            .collect()
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttachment {
    pub id: String,
    /// Absolute CDN locator, ready to fetch.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub proxy_url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub size: u64,
}

/// Aggregated reaction summary as embedded in a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReactions {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub me: bool,
    pub emoji: Emoji,
}

/// A single user's reaction to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReaction {
    pub user_id: String,
    pub message_id: String,
    pub emoji: Emoji,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub guild_id: String,
}

/// A custom or unicode emoji.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// Empty for unicode emoji.
    #[serde(default, deserialize_with = "de::nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub require_colons: bool,
    #[serde(default)]
    pub animated: bool,
}

impl Emoji {
    /// The form the platform API expects in reaction endpoints:
    /// `name:id` for custom emoji, the bare name for unicode emoji.
    ///
    /// ```
    /// use chatvault::model::Emoji;
    ///
    /// let custom = Emoji { id: "42".into(), name: "blob".into(), ..Emoji::default() };
    /// assert_eq!(custom.api_name(), "blob:42");
    ///
    /// let unicode = Emoji { name: "👍".into(), ..Emoji::default() };
    /// assert_eq!(unicode.api_name(), "👍");
    /// ```
    pub fn api_name(&self) -> String {
        match (self.id.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{}:{}", self.name, self.id),
            (_, false) => self.name.clone(),
            _ => self.id.clone(),
        }
    }
}

/// Rich embed content attached to a message.
///
/// Unset fields are skipped when serialized, so the JSON form is compact
/// and stable for a given value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEmbed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<EmbedVideo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<EmbedProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedThumbnail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedVideo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// A guild (server).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub icon: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub splash: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub afk_channel_id: String,
    /// AFK timeout in seconds.
    #[serde(default)]
    pub afk_timeout: i64,
    #[serde(default, alias = "widget_enabled")]
    pub embed_enabled: bool,
    #[serde(default, alias = "widget_channel_id", deserialize_with = "de::nullable")]
    pub embed_channel_id: String,
}

/// A user's membership in a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default, deserialize_with = "de::nullable")]
    pub nick: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A guild role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: i64,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default, deserialize_with = "de::bitmask")]
    pub permissions: u64,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

/// A guild channel.
///
/// `kind` is kept raw; only [`ChannelKind`] values can be logged. It is
/// required when decoding, so a payload without `type` never passes as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub guild_id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub parent_id: String,
    #[serde(default)]
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

/// The channel kinds the log schema knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
}

impl ChannelKind {
    /// Maps a raw platform channel type.
    ///
    /// Anything other than text (0), voice (2) or category (4) is an
    /// [`UnrecognizedChannelKind`](ArchiveError::UnrecognizedChannelKind).
    pub fn from_raw(kind: u8) -> Result<Self> {
        match kind {
            0 => Ok(ChannelKind::Text),
            2 => Ok(ChannelKind::Voice),
            4 => Ok(ChannelKind::Category),
            other => Err(ArchiveError::UnrecognizedChannelKind { kind: other }),
        }
    }

    /// Text used in log rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Text => "text",
            ChannelKind::Voice => "voice",
            ChannelKind::Category => "category",
        }
    }
}

/// A per-role or per-member permission override on a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub id: String,
    /// `role` or `member`.
    #[serde(rename = "type", default, deserialize_with = "de::overwrite_type")]
    pub kind: String,
    #[serde(default, deserialize_with = "de::bitmask")]
    pub allow: u64,
    #[serde(default, deserialize_with = "de::bitmask")]
    pub deny: u64,
}

/// An attachment paired with the message that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(flatten)]
    pub attachment: MessageAttachment,
    pub message_id: String,
}

/// A reaction paired with the number of users who reacted with that emoji.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(flatten)]
    pub reaction: MessageReaction,
    pub count: u32,
}

impl Reaction {
    /// Pairs `reaction` with the number of users behind it.
    pub fn new(reaction: MessageReaction, count: u32) -> Self {
        Self { reaction, count }
    }
}

/// An embed paired with the message that owns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(flatten)]
    pub embed: MessageEmbed,
    pub message_id: String,
}

/// Lenient field decoders for platform payloads.
mod de {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    /// `null` becomes an empty string.
    pub fn nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Bitmasks arrive as numbers in older payloads and decimal strings in newer ones.
    pub fn bitmask<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.parse().map_err(D::Error::custom),
        }
    }

    /// Overwrite type as text; the numeric form is 0 for roles and 1 for members.
    pub fn overwrite_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(0) => "role".to_string(),
            NumberOrString::Number(1) => "member".to_string(),
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::String(s) => s,
        })
    }
}
