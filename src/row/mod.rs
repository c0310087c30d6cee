//! Uniform log rows for platform objects.
//!
//! Every row starts with four fixed columns, followed by the shape-specific
//! fields listed on [`DomainValue::fields`]:
//!
//! | Column | Content |
//! |--------|---------|
//! | [`column::TIME`] | Row timestamp, microseconds, explicit offset |
//! | [`column::FETCH_TYPE`] | Caller tag, e.g. `rest` or `gateway` |
//! | [`column::OPERATION`] | Caller tag, e.g. `create`, `update`, `delete` |
//! | [`column::SHAPE`] | [`Shape::tag`] |
//!
//! Flags are written as their name when set and as an empty field when
//! unset; numbers are base-10 text.
//!
//! # Example
//!
//! ```
//! use chatvault::model::Role;
//! use chatvault::row::{FixedClock, RowSerializer, column};
//! use chrono::{TimeZone, Utc};
//!
//! let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
//! let serializer = RowSerializer::with_clock(clock);
//!
//! let role = Role { id: "9".into(), name: "mods".into(), hoist: true, ..Role::default() };
//! let row = serializer.serialize("rest", "create", &role.into())?;
//!
//! assert_eq!(row[column::TIME], "2024-01-15T10:30:00.000000+00:00");
//! assert_eq!(row[column::SHAPE], "role");
//! assert_eq!(row.fields().last().map(String::as_str), Some("hoist"));
//! # Ok::<(), chatvault::ArchiveError>(())
//! ```

mod shape;

use std::ops::Index;

use chrono::{DateTime, Utc};

use crate::error::Result;

pub use shape::{DomainValue, Shape, flag};

/// Layout of row timestamps. Fixed width, so rows sort lexicographically.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// Indices of the fixed leading columns.
pub mod column {
    pub const TIME: usize = 0;
    pub const FETCH_TYPE: usize = 1;
    pub const OPERATION: usize = 2;
    pub const SHAPE: usize = 3;
    /// First shape-specific field; the object's own ID for most shapes.
    pub const ID: usize = 4;
}

/// Number of fixed leading columns.
pub const HEADER_WIDTH: usize = 4;

/// One serialized event: an ordered sequence of string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow(Vec<String>);

impl LogRow {
    /// All fields, leading columns included.
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// The shape-specific fields only.
    pub fn body(&self) -> &[String] {
        &self.0[HEADER_WIDTH.min(self.0.len())..]
    }

    /// Consumes the row, returning its fields.
    pub fn into_fields(self) -> Vec<String> {
        self.0
    }

    /// Number of fields, leading columns included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl Index<usize> for LogRow {
    type Output = String;

    fn index(&self, index: usize) -> &String {
        &self.0[index]
    }
}

impl IntoIterator for LogRow {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LogRow {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<LogRow> for Vec<String> {
    fn from(row: LogRow) -> Self {
        row.0
    }
}

/// Source of row timestamps.
pub trait Clock: Send + Sync {
    /// The instant to stamp the next row with.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Renders an instant in the row timestamp layout.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(TIME_FORMAT).to_string()
}

/// The current instant in the row timestamp layout.
pub fn timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Turns domain values into [`LogRow`]s.
///
/// Holds no state besides its clock and may be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct RowSerializer<C = SystemClock> {
    clock: C,
}

impl RowSerializer<SystemClock> {
    /// Creates a serializer stamping rows with the system clock.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> RowSerializer<C> {
    /// Uses `clock` for the timestamp column.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// The timestamp the next row would carry.
    pub fn timestamp(&self) -> String {
        format_timestamp(&self.clock.now())
    }

    /// Serializes `value` as one row.
    ///
    /// `fetch_type` and `operation` are written as given. Fails only for a
    /// channel whose kind is not text, voice or category, or an embed that
    /// cannot be encoded as JSON.
    pub fn serialize(&self, fetch_type: &str, operation: &str, value: &DomainValue) -> Result<LogRow> {
        let shape = value.shape();
        let body = value.fields()?;

        let mut fields = Vec::with_capacity(HEADER_WIDTH + body.len());
        fields.push(self.timestamp());
        fields.push(fetch_type.to_string());
        fields.push(operation.to_string());
        fields.push(shape.tag().to_string());
        fields.extend(body);

        Ok(LogRow(fields))
    }
}
