#![allow(dead_code)]

mod mocks;

pub use mocks::MockFile;

use std::io::Write;

use tempfile::NamedTempFile;

pub const HEADER: &str = "ID,Name,Age,Grade,Address,Phone,Email,ParentName";

pub const ALICE: &str = "1,Alice,10,5th,123 Oak St,555-1234,alice@x.com,Bob";

pub const CARL: &str = "2,Carl,11,6th,456 Elm St,555-5678,carl@x.com,Dana";

/// Writes `lines` to a temporary CSV file, one per line.
pub fn roster_file(lines: &[&str]) -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    file.flush()?;
    Ok(file)
}
