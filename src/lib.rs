//! # Chatvault
//!
//! Building blocks for archiving a chat platform's content.
//!
//! ## Overview
//!
//! Two independent components, no shared state:
//!
//! - **Content fetcher** ([`fetch`]) - makes sure the local file for an asset
//!   locator (avatar, emoji, guild icon/splash, attachment) exists exactly
//!   once. Downloads only when the file is absent and writes through a
//!   temporary sibling plus rename, so a crash never leaves a partial file
//!   at the final path.
//! - **Row serializer** ([`row`]) - turns messages, attachments, reactions,
//!   embeds, guilds, members, roles, channels, permission overwrites and
//!   emoji into uniform rows of string fields for an append-only log.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatvault::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Mirror an attachment under ./attachments/...
//!     let fetcher = ContentFetcher::new()?;
//!     fetcher.attachment("https://cdn.discordapp.com/attachments/1/2/cat.png")?;
//!
//!     // Log a role update as one tab-separated line
//!     let role = Role { id: "9".into(), name: "mods".into(), ..Role::default() };
//!     let row = RowSerializer::new().serialize("gateway", "update", &role.into())?;
//!     let mut writer = RowWriter::append_to_path("events.tsv", &RowWriterConfig::new())?;
//!     writer.write_row(&row)?;
//!     writer.flush()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`fetch`] - [`ContentFetcher`](fetch::ContentFetcher), [`local_path`](fetch::local_path),
//!   locator builders in [`fetch::endpoints`], write-then-rename in [`fetch::storage`]
//! - [`row`] - [`RowSerializer`](row::RowSerializer), [`DomainValue`](row::DomainValue),
//!   [`Shape`](row::Shape), [`LogRow`](row::LogRow)
//! - [`model`] - typed platform objects and the attachment/reaction/embed wrappers
//! - [`output`] - [`RowWriter`](output::RowWriter) delimited sink
//! - [`config`] - [`FetchConfig`](config::FetchConfig), [`RowWriterConfig`](config::RowWriterConfig)
//! - [`error`] - [`ArchiveError`], [`Result`]
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod model;
#[cfg(feature = "csv-output")]
pub mod output;
pub mod row;

// Re-export the main types at the crate root for convenience
pub use error::{ArchiveError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatvault::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ArchiveError, Result};

    pub use crate::config::{FetchConfig, RowWriterConfig};

    #[cfg(feature = "fetch")]
    pub use crate::fetch::{ContentFetcher, DownloadOutcome, local_path};

    pub use crate::row::{Clock, DomainValue, FixedClock, LogRow, RowSerializer, Shape, SystemClock};

    pub use crate::model::{
        Attachment, Channel, ChannelKind, Embed, Emoji, Guild, Member, Message, MessageAttachment,
        MessageEmbed, MessageReaction, PermissionOverwrite, Reaction, Role, User,
    };

    #[cfg(feature = "csv-output")]
    pub use crate::output::{RowWriter, to_delimited};
}
