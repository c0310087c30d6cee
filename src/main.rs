//! # chatvault CLI
//!
//! Command-line interface for the chatvault library.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatvault::cli::{Args, Command, Delimiter};
use chatvault::config::{FetchConfig, RowWriterConfig};
use chatvault::fetch::{ContentFetcher, DownloadOutcome};
use chatvault::output::RowWriter;
use chatvault::row::{DomainValue, RowSerializer};
use chatvault::ArchiveError;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = <Args as ClapParser>::parse();

    let result = match args.command {
        Command::Fetch { root, locators } => fetch(root, &locators),
        Command::Row {
            fetch_type,
            op,
            output,
            delimiter,
            shape,
            input,
        } => row(&fetch_type, &op, output.as_deref(), delimiter, &shape, input.as_deref()),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Fetches every locator; keeps going past failures and reports them.
fn fetch(root: PathBuf, locators: &[String]) -> Result<bool, ArchiveError> {
    let fetcher = ContentFetcher::with_config(FetchConfig::new().with_root(root))?;

    let mut failed = 0usize;
    for locator in locators {
        match fetcher.fetch(locator) {
            Ok(DownloadOutcome::AlreadyPresent(path)) => {
                println!("present\t{}", path.display());
            }
            Ok(DownloadOutcome::Fetched { path, bytes }) => {
                println!("fetched\t{}\t{}", path.display(), bytes);
            }
            Err(e) => {
                failed += 1;
                eprintln!("failed\t{}\t{}", locator, e);
            }
        }
    }

    Ok(failed == 0)
}

/// Serializes one JSON payload and writes it as a delimited line.
fn row(
    fetch_type: &str,
    op: &str,
    output: Option<&Path>,
    delimiter: Delimiter,
    shape: &str,
    input: Option<&Path>,
) -> Result<bool, ArchiveError> {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let value = DomainValue::from_json(shape, serde_json::from_str(&text)?)?;
    let row = RowSerializer::new().serialize(fetch_type, op, &value)?;

    let config = RowWriterConfig::new().with_delimiter(delimiter.byte());
    match output {
        Some(path) => {
            let mut writer = RowWriter::append_to_path(path, &config)?;
            writer.write_row(&row)?;
            writer.flush()?;
        }
        None => {
            let mut writer = RowWriter::new(io::stdout().lock(), &config);
            writer.write_row(&row)?;
            writer.flush()?;
        }
    }

    Ok(true)
}
