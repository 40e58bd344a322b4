use csv::{Reader, ReaderBuilder, StringRecord, Terminator, Trim};
use log::debug;
use std::{cell::RefCell, fs::File, io::Read, path::Path};

use super::quoting::StrictQuoting;
use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// A CSV item reader that hands out raw rows as [`StringRecord`]s.
///
/// Fields are kept exactly as they appear in the source, typing them is the
/// job of a processor. Quoting is checked strictly: a stray quote fails the
/// read with `BatchError::Parse` instead of leaking into a field. The header row, when enabled, is consumed on the first
/// call to [`headers`](CsvItemReader::headers) or [`read`](ItemReader::read)
/// and never returned as an item.
///
/// # Examples
///
/// ```
/// use roster_batch::item::csv::csv_reader::CsvItemReaderBuilder;
/// use roster_batch::core::item::ItemReader;
///
/// let data = "\
/// id,name
/// 1,Alice
/// 2,Carl
/// ";
///
/// let reader = CsvItemReaderBuilder::new()
///     .has_headers(true)
///     .from_reader(data.as_bytes());
///
/// assert_eq!(reader.headers().unwrap(), vec!["id", "name"]);
///
/// let first = reader.read().unwrap().unwrap();
/// assert_eq!(first, vec!["1", "Alice"]);
///
/// let second = reader.read().unwrap().unwrap();
/// assert_eq!(second, vec!["2", "Carl"]);
///
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvItemReader<R> {
    /// Uses `RefCell` so rows can be pulled through the `&self` signature of
    /// `ItemReader::read`.
    reader: RefCell<Reader<StrictQuoting<R>>>,
}

impl<R: Read> CsvItemReader<R> {
    /// Returns the header row, reading it first if needed.
    ///
    /// # Errors
    ///
    /// `BatchError::Parse` when the source is empty or the first row cannot
    /// be parsed.
    pub fn headers(&self) -> Result<StringRecord, BatchError> {
        let mut reader = self.reader.borrow_mut();
        let headers = reader
            .headers()
            .map_err(|error| BatchError::parse("header", error))?
            .clone();

        if headers.is_empty() {
            return Err(BatchError::Parse {
                stage: "header",
                message: "input is empty".to_string(),
            });
        }

        Ok(headers)
    }
}

impl<R: Read> ItemReader<StringRecord> for CsvItemReader<R> {
    /// Reads the next row.
    ///
    /// # Returns
    /// - `Ok(Some(row))` if a row is read
    /// - `Ok(None)` once the input is exhausted
    /// - `Err(BatchError::Parse)` if the row is malformed
    fn read(&self) -> ItemReaderResult<StringRecord> {
        let mut record = StringRecord::new();

        match self.reader.borrow_mut().read_record(&mut record) {
            Ok(true) => Ok(Some(record)),
            Ok(false) => {
                debug!("End of CSV input");
                Ok(None)
            }
            Err(error) => Err(BatchError::parse("rows", error)),
        }
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Terminator: CRLF, which accepts `\r\n`, `\n` and `\r`
/// - Headers: enabled
/// - Trimming: none, fields are read verbatim
/// - Field count: every row must be as wide as the first one
/// - Quoting: strict, see [`CsvItemReader`]
///
/// # Examples
///
/// ```
/// use roster_batch::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let reader = CsvItemReaderBuilder::new()
///     .has_headers(true)
///     .from_reader("id,name\n1,Alice".as_bytes());
/// ```
pub struct CsvItemReaderBuilder {
    delimiter: u8,
    terminator: Terminator,
    has_headers: bool,
}

impl Default for CsvItemReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            terminator: Terminator::CRLF,
            has_headers: true,
        }
    }

    /// Sets whether the first row holds column names.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .trim(Trim::None)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(self.has_headers)
            .flexible(false); // Use strict parsing to catch formatting errors
        builder
    }

    /// Creates a `CsvItemReader` from any source implementing `Read`.
    pub fn from_reader<R: Read>(self, rdr: R) -> CsvItemReader<R> {
        let reader = self
            .reader_builder()
            .from_reader(StrictQuoting::new(rdr, self.delimiter));

        CsvItemReader {
            reader: RefCell::new(reader),
        }
    }

    /// Creates a `CsvItemReader` over the file at `path`.
    ///
    /// The file stays open as long as the reader lives and is closed when it
    /// is dropped.
    ///
    /// # Errors
    ///
    /// `BatchError::Io` if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<File>, BatchError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Opened CSV file {}", path.display());

        Ok(self.from_reader(file))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use csv::StringRecord;

    use crate::{
        core::item::ItemReader, error::BatchError, item::csv::csv_reader::CsvItemReaderBuilder,
    };

    fn read_all<R: std::io::Read>(
        reader: &super::CsvItemReader<R>,
    ) -> Result<Vec<StringRecord>, BatchError> {
        let mut rows = Vec::new();
        while let Some(row) = reader.read()? {
            rows.push(row);
        }
        Ok(rows)
    }

    #[test]
    fn reads_rows_after_the_header() -> Result<(), Box<dyn Error>> {
        let data = "city,country,pop
Boston,United States,4628910
Concord,United States,42695";

        let reader = CsvItemReaderBuilder::new()
            .has_headers(true)
            .from_reader(data.as_bytes());

        let records = read_all(&reader)?;

        assert_eq!(
            records,
            vec![
                vec!["Boston", "United States", "4628910"],
                vec!["Concord", "United States", "42695"],
            ]
        );

        Ok(())
    }

    #[test]
    fn fields_are_not_trimmed() -> Result<(), Box<dyn Error>> {
        let reader = CsvItemReaderBuilder::new().from_reader("a,b\n 1 ,x \n".as_bytes());

        assert_eq!(read_all(&reader)?, vec![vec![" 1 ", "x "]]);

        Ok(())
    }

    #[test]
    fn crlf_line_endings_are_accepted() -> Result<(), Box<dyn Error>> {
        let reader = CsvItemReaderBuilder::new().from_reader("a,b\r\n1,2\r\n3,4\r\n".as_bytes());

        assert_eq!(reader.headers()?, vec!["a", "b"]);
        assert_eq!(read_all(&reader)?, vec![vec!["1", "2"], vec!["3", "4"]]);

        Ok(())
    }

    #[test]
    fn empty_input_has_no_header() {
        let reader = CsvItemReaderBuilder::new().from_reader("".as_bytes());

        let error = reader.headers().unwrap_err();

        assert!(matches!(error, BatchError::Parse { stage: "header", .. }));
    }

    #[test]
    fn row_wider_than_header_is_a_parse_error() {
        let reader = CsvItemReaderBuilder::new().from_reader("a,b\n1,2\n3,4,5\n".as_bytes());

        assert!(reader.read().unwrap().is_some());
        let error = reader.read().unwrap_err();

        assert!(matches!(error, BatchError::Parse { stage: "rows", .. }));
    }

    #[test]
    fn stray_quotes_are_parse_errors() {
        let inputs = [
            "a,b\n1,\"x",
            "a,b\n1,Al\"ice\n",
            "a,b\n1,\"Alice\"x\n",
        ];

        for data in inputs {
            let reader = CsvItemReaderBuilder::new().from_reader(data.as_bytes());
            assert_eq!(reader.headers().unwrap(), vec!["a", "b"]);

            let error = reader.read().unwrap_err();

            assert!(
                matches!(error, BatchError::Parse { stage: "rows", .. }),
                "{data:?} gave {error}"
            );
        }
    }

    #[test]
    fn escaped_quotes_are_kept() -> Result<(), Box<dyn Error>> {
        let reader =
            CsvItemReaderBuilder::new().from_reader("a,b\n\"say \"\"hi\"\"\",2\n".as_bytes());

        assert_eq!(read_all(&reader)?, vec![vec!["say \"hi\"", "2"]]);

        Ok(())
    }

    #[test]
    fn headers_can_be_disabled() -> Result<(), Box<dyn Error>> {
        let reader = CsvItemReaderBuilder::new()
            .has_headers(false)
            .from_reader("1,2\n3,4\n".as_bytes());

        assert_eq!(read_all(&reader)?.len(), 2);

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = CsvItemReaderBuilder::new().from_path("does/not/exist/players.csv");

        assert!(matches!(result, Err(BatchError::Io { .. })));
    }
}
