//! Column layout of the player roster and the rules for reading it.
//!
//! Every field of a [`Player`](crate::player::Player) is bound to a fixed
//! column position through [`PLAYER_COLUMNS`]. The table is the only place
//! that knows those positions: the row mapper reads through it, and the
//! optional header check compares it with the header row of the file.

use std::num::ParseIntError;

use csv::StringRecord;

use crate::error::BatchError;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

/// A named field bound to a column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name as shown in diagnostics
    pub name: &'static str,
    pub kind: ColumnType,
    /// Zero-based position in a row
    pub index: usize,
    /// Other header spellings accepted for this column, already normalized
    pub aliases: &'static [&'static str],
}

impl Column {
    /// Whether a header cell names this column.
    ///
    /// Comparison ignores case, spaces, `_` and `-`, so `Parent Name`,
    /// `parent_name` and `ParentName` all match.
    pub fn matches(&self, header: &str) -> bool {
        let header = normalize(header);
        header == normalize(self.name) || self.aliases.iter().any(|alias| header == *alias)
    }
}

pub const ID: Column = Column {
    name: "ID",
    kind: ColumnType::Integer,
    index: 0,
    aliases: &["studentid", "playerid"],
};

pub const NAME: Column = Column {
    name: "Name",
    kind: ColumnType::Text,
    index: 1,
    aliases: &["studentname", "playername"],
};

pub const AGE: Column = Column {
    name: "Age",
    kind: ColumnType::Integer,
    index: 2,
    aliases: &[],
};

pub const GRADE: Column = Column {
    name: "Grade",
    kind: ColumnType::Text,
    index: 3,
    aliases: &[],
};

pub const ADDRESS: Column = Column {
    name: "Address",
    kind: ColumnType::Text,
    index: 4,
    aliases: &[],
};

pub const PHONE: Column = Column {
    name: "Phone",
    kind: ColumnType::Text,
    index: 5,
    aliases: &["phonenumber"],
};

pub const EMAIL: Column = Column {
    name: "Email",
    kind: ColumnType::Text,
    index: 6,
    aliases: &["emailaddress"],
};

pub const PARENT_NAME: Column = Column {
    name: "ParentName",
    kind: ColumnType::Text,
    index: 7,
    aliases: &["parent", "guardianname"],
};

/// The roster layout, in column order.
pub const PLAYER_COLUMNS: [Column; 8] = [ID, NAME, AGE, GRADE, ADDRESS, PHONE, EMAIL, PARENT_NAME];

/// What to do when an integer column holds something that is not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Use `0` for the field and keep going.
    #[default]
    ZeroOnError,
    /// Fail the load with [`BatchError::Coercion`].
    Reject,
}

/// Parses the text of an integer column.
///
/// The text is taken as is: surrounding whitespace makes the parse fail.
pub fn coerce_integer(raw: &str) -> Result<i64, ParseIntError> {
    raw.parse::<i64>()
}

/// Checks a header row against [`PLAYER_COLUMNS`].
///
/// The width is checked first, then every cell against the column at the
/// same position.
pub fn check_header(headers: &StringRecord) -> Result<(), BatchError> {
    if headers.len() != PLAYER_COLUMNS.len() {
        return Err(BatchError::Header(format!(
            "expected {} columns, found {}",
            PLAYER_COLUMNS.len(),
            headers.len()
        )));
    }

    for column in PLAYER_COLUMNS.iter() {
        let cell = headers.get(column.index).unwrap_or_default();
        if !column.matches(cell) {
            return Err(BatchError::Header(format!(
                "column {} should be {}, found {:?}",
                column.index, column.name, cell
            )));
        }
    }

    Ok(())
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
