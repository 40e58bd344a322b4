use std::{
    cell::RefCell,
    fmt::Display,
    io::{self, Stdout, Write},
};

use csv::StringRecord;
use log::debug;

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    error::BatchError,
};

/// Writes the plain-text roster report.
///
/// The report opens with the header line written by
/// [`write_headers`](ConsoleItemWriter::write_headers). A call to
/// [`write`](ItemWriter::write) then prints the record count followed by one
/// block per item, each block preceded by a blank line.
///
/// # Examples
///
/// ```
/// use roster_batch::item::console::ConsoleItemWriter;
/// use roster_batch::core::item::ItemWriter;
///
/// let writer = ConsoleItemWriter::new(Vec::new());
/// ItemWriter::<&str>::write(&writer, &["first", "second"]).unwrap();
///
/// let output = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(output, "Processed 2 player records:\n\nfirst\n\nsecond\n");
/// ```
pub struct ConsoleItemWriter<T: Write> {
    out: RefCell<T>,
}

impl ConsoleItemWriter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<T: Write> ConsoleItemWriter<T> {
    pub fn new(out: T) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    /// Prints `CSV Headers: [<fields separated by a space>]`.
    pub fn write_headers(&self, headers: &StringRecord) -> ItemWriterResult {
        let fields: Vec<&str> = headers.iter().collect();
        writeln!(self.out.borrow_mut(), "CSV Headers: [{}]", fields.join(" "))
            .map_err(to_batch_error)
    }

    pub fn into_inner(self) -> T {
        self.out.into_inner()
    }
}

impl<T: Write, W: Display> ItemWriter<W> for ConsoleItemWriter<T> {
    fn write(&self, items: &[W]) -> ItemWriterResult {
        let mut out = self.out.borrow_mut();

        writeln!(out, "Processed {} player records:", items.len()).map_err(to_batch_error)?;
        for item in items {
            write!(out, "\n{}\n", item).map_err(to_batch_error)?;
        }

        debug!("Printed {} records", items.len());
        Ok(())
    }

    fn flush(&self) -> ItemWriterResult {
        self.out.borrow_mut().flush().map_err(to_batch_error)
    }
}

fn to_batch_error(error: io::Error) -> BatchError {
    BatchError::ItemWriter(error.to_string())
}
