//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] / [`Command`] - CLI argument structure
//! - [`Delimiter`] - field separator choices for the `row` command

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Archive chat platform assets and log rows.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatvault")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatvault fetch https://cdn.discordapp.com/attachments/1/2/cat.png
    chatvault fetch --root archive https://cdn.discordapp.com/emojis/42.png?size=2048
    chatvault row role role.json
    chatvault row --fetch-type gateway --op update -o events.tsv channel channel.json
    cat message.json | chatvault row message")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download assets that are not already on disk
    Fetch {
        /// Directory local paths are resolved against
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Absolute locators to fetch
        #[arg(required = true)]
        locators: Vec<String>,
    },

    /// Serialize a JSON object as one log row
    Row {
        /// Event source tag (e.g. rest, gateway)
        #[arg(long, default_value = "rest")]
        fetch_type: String,

        /// Operation tag (e.g. create, update, delete)
        #[arg(long, default_value = "create")]
        op: String,

        /// Append to this file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field separator
        #[arg(short, long, value_enum, default_value = "tab")]
        delimiter: Delimiter,

        /// Shape tag (message, attachment, reaction, embed, guild, member,
        /// role, channel, permoverwrite, emoji)
        shape: String,

        /// JSON payload file; reads stdin when omitted
        input: Option<PathBuf>,
    },
}

/// Field separators for delimited rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
    Semicolon,
}

impl Delimiter {
    /// The separator byte passed to the row writer.
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}
