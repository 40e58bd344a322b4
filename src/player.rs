use std::fmt;

use csv::StringRecord;
use log::warn;

use crate::{
    core::item::{ItemProcessor, ItemProcessorResult},
    error::BatchError,
    schema::{
        ADDRESS, AGE, Column, CoercionPolicy, EMAIL, GRADE, ID, NAME, PARENT_NAME, PHONE,
        PLAYER_COLUMNS, coerce_integer,
    },
};

/// One roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub grade: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub parent_name: String,
}

/// Prints the eight labeled lines of the console report, without a trailing
/// newline.
impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Student ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Age: {}", self.age)?;
        writeln!(f, "Grade: {}", self.grade)?;
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "Phone: {}", self.phone)?;
        writeln!(f, "Email: {}", self.email)?;
        write!(f, "Parent Name: {}", self.parent_name)
    }
}

/// Maps a raw CSV row onto a [`Player`] through the column schema.
///
/// Rows narrower than the schema are refused with [`BatchError::ShortRow`].
/// Integer columns are parsed with [`coerce_integer`] and failures are
/// handled according to the configured [`CoercionPolicy`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerRowMapper {
    policy: CoercionPolicy,
}

impl PlayerRowMapper {
    pub fn new(policy: CoercionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CoercionPolicy {
        self.policy
    }

    fn text(row: &StringRecord, column: Column) -> String {
        row.get(column.index).unwrap_or_default().to_string()
    }

    fn integer(&self, row: &StringRecord, column: Column, line: u64) -> Result<i64, BatchError> {
        let raw = row.get(column.index).unwrap_or_default();

        match coerce_integer(raw) {
            Ok(value) => Ok(value),
            Err(error) => match self.policy {
                CoercionPolicy::ZeroOnError => {
                    warn!(
                        "Invalid {} value {:?} on line {}: {}, using 0",
                        column.name, raw, line, error
                    );
                    Ok(0)
                }
                CoercionPolicy::Reject => Err(BatchError::Coercion {
                    column: column.name,
                    value: raw.to_string(),
                    line,
                    reason: error.to_string(),
                }),
            },
        }
    }
}

impl ItemProcessor<StringRecord, Player> for PlayerRowMapper {
    fn process(&self, row: &StringRecord) -> ItemProcessorResult<Player> {
        let line = row.position().map_or(0, |position| position.line());

        if row.len() < PLAYER_COLUMNS.len() {
            return Err(BatchError::ShortRow {
                line,
                expected: PLAYER_COLUMNS.len(),
                found: row.len(),
            });
        }

        Ok(Player {
            id: self.integer(row, ID, line)?,
            name: Self::text(row, NAME),
            age: self.integer(row, AGE, line)?,
            grade: Self::text(row, GRADE),
            address: Self::text(row, ADDRESS),
            phone: Self::text(row, PHONE),
            email: Self::text(row, EMAIL),
            parent_name: Self::text(row, PARENT_NAME),
        })
    }
}
