//! The closed set of loggable shapes and their column layouts.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{ArchiveError, Result};
use crate::model::{
    Attachment, Channel, ChannelKind, Embed, Emoji, Guild, Member, Message, PermissionOverwrite,
    Reaction, Role,
};

/// Shape tags, as written in the fourth column of every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Message,
    Attachment,
    Reaction,
    Embed,
    Guild,
    Member,
    Role,
    Channel,
    PermissionOverwrite,
    Emoji,
}

impl Shape {
    /// Every shape, in table order.
    pub const ALL: [Shape; 10] = [
        Shape::Message,
        Shape::Attachment,
        Shape::Reaction,
        Shape::Embed,
        Shape::Guild,
        Shape::Member,
        Shape::Role,
        Shape::Channel,
        Shape::PermissionOverwrite,
        Shape::Emoji,
    ];

    /// The fixed tag string for this shape.
    pub fn tag(&self) -> &'static str {
        match self {
            Shape::Message => "message",
            Shape::Attachment => "attachment",
            Shape::Reaction => "reaction",
            Shape::Embed => "embed",
            Shape::Guild => "guild",
            Shape::Member => "member",
            Shape::Role => "role",
            Shape::Channel => "channel",
            Shape::PermissionOverwrite => "permoverwrite",
            Shape::Emoji => "emoji",
        }
    }

    /// Number of shape-specific fields this shape contributes to a row.
    pub fn width(&self) -> usize {
        match self {
            Shape::Message => 5,
            Shape::Attachment => 2,
            Shape::Reaction => 4,
            Shape::Embed => 2,
            Shape::Guild => 9,
            Shape::Member => 6,
            Shape::Role => 6,
            Shape::Channel => 7,
            Shape::PermissionOverwrite => 4,
            Shape::Emoji => 3,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Shape {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        Shape::ALL
            .iter()
            .copied()
            .find(|shape| shape.tag() == s)
            .ok_or_else(|| ArchiveError::unsupported_shape(s))
    }
}

/// A value the serializer can turn into a row.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    Message(Message),
    Attachment(Attachment),
    Reaction(Reaction),
    Embed(Embed),
    Guild(Guild),
    Member(Member),
    Role(Role),
    Channel(Channel),
    PermissionOverwrite(PermissionOverwrite),
    Emoji(Emoji),
}

impl DomainValue {
    /// Builds a value from a shape tag and a JSON payload.
    ///
    /// An unknown tag is [`UnsupportedShape`](ArchiveError::UnsupportedShape);
    /// a payload that does not fit the shape is a JSON error.
    ///
    /// ```
    /// use chatvault::row::DomainValue;
    /// use serde_json::json;
    ///
    /// let value = DomainValue::from_json("role", json!({"id": "9", "name": "mods"}))?;
    /// assert_eq!(value.shape().tag(), "role");
    ///
    /// let err = DomainValue::from_json("webhook", json!({})).unwrap_err();
    /// assert!(err.is_fatal());
    /// # Ok::<(), chatvault::ArchiveError>(())
    /// ```
    pub fn from_json(tag: &str, payload: Value) -> Result<Self> {
        let value = match tag.parse::<Shape>()? {
            Shape::Message => DomainValue::Message(serde_json::from_value(payload)?),
            Shape::Attachment => DomainValue::Attachment(serde_json::from_value(payload)?),
            Shape::Reaction => DomainValue::Reaction(serde_json::from_value(payload)?),
            Shape::Embed => DomainValue::Embed(serde_json::from_value(payload)?),
            Shape::Guild => DomainValue::Guild(serde_json::from_value(payload)?),
            Shape::Member => DomainValue::Member(serde_json::from_value(payload)?),
            Shape::Role => DomainValue::Role(serde_json::from_value(payload)?),
            Shape::Channel => DomainValue::Channel(serde_json::from_value(payload)?),
            Shape::PermissionOverwrite => {
                DomainValue::PermissionOverwrite(serde_json::from_value(payload)?)
            }
            Shape::Emoji => DomainValue::Emoji(serde_json::from_value(payload)?),
        };
        Ok(value)
    }

    /// The shape of this value.
    pub fn shape(&self) -> Shape {
        match self {
            DomainValue::Message(_) => Shape::Message,
            DomainValue::Attachment(_) => Shape::Attachment,
            DomainValue::Reaction(_) => Shape::Reaction,
            DomainValue::Embed(_) => Shape::Embed,
            DomainValue::Guild(_) => Shape::Guild,
            DomainValue::Member(_) => Shape::Member,
            DomainValue::Role(_) => Shape::Role,
            DomainValue::Channel(_) => Shape::Channel,
            DomainValue::PermissionOverwrite(_) => Shape::PermissionOverwrite,
            DomainValue::Emoji(_) => Shape::Emoji,
        }
    }

    /// Shape-specific fields, in wire order.
    ///
    /// Column order is part of the log format. Append new columns at the
    /// end of a shape, never in the middle.
    pub fn fields(&self) -> Result<Vec<String>> {
        let fields = match self {
            DomainValue::Message(v) => vec![
                v.id.clone(),
                v.author.id.clone(),
                v.edited_timestamp.clone().unwrap_or_default(),
                flag("tts", v.tts),
                v.content.clone(),
            ],
            DomainValue::Attachment(v) => vec![v.attachment.id.clone(), v.message_id.clone()],
            DomainValue::Reaction(v) => vec![
                v.reaction.user_id.clone(),
                v.reaction.message_id.clone(),
                v.reaction.emoji.api_name(),
                v.count.to_string(),
            ],
            DomainValue::Embed(v) => vec![v.message_id.clone(), serde_json::to_string(&v.embed)?],
            DomainValue::Guild(v) => vec![
                v.id.clone(),
                v.name.clone(),
                v.icon.clone(),
                v.splash.clone(),
                v.owner_id.clone(),
                v.afk_channel_id.clone(),
                v.afk_timeout.to_string(),
                flag("embeddable", v.embed_enabled),
                v.embed_channel_id.clone(),
            ],
            DomainValue::Member(v) => vec![
                v.user.id.clone(),
                v.user.username.clone(),
                v.user.discriminator.clone(),
                v.user.avatar.clone(),
                v.nick.clone(),
                v.roles.join(","),
            ],
            DomainValue::Role(v) => vec![
                v.id.clone(),
                v.name.clone(),
                v.color.to_string(),
                v.position.to_string(),
                v.permissions.to_string(),
                flag("hoist", v.hoist),
            ],
            DomainValue::Channel(v) => vec![
                v.id.clone(),
                ChannelKind::from_raw(v.kind)?.as_str().to_string(),
                v.position.to_string(),
                v.name.clone(),
                v.topic.clone(),
                flag("nsfw", v.nsfw),
                v.parent_id.clone(),
            ],
            DomainValue::PermissionOverwrite(v) => vec![
                v.id.clone(),
                v.kind.clone(),
                v.allow.to_string(),
                v.deny.to_string(),
            ],
            DomainValue::Emoji(v) => vec![
                v.id.clone(),
                v.name.clone(),
                flag("nocolons", !v.require_colons),
            ],
        };
        Ok(fields)
    }
}

/// A set flag is written as its name, an unset one as an empty field.
pub fn flag(name: &str, set: bool) -> String {
    if set { name.to_string() } else { String::new() }
}

macro_rules! impl_from_shape {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for DomainValue {
                fn from(value: $variant) -> Self {
                    DomainValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_shape!(
    Message,
    Attachment,
    Reaction,
    Embed,
    Guild,
    Member,
    Role,
    Channel,
    PermissionOverwrite,
    Emoji,
);
