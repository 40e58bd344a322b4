use std::{
    cell::Cell,
    fs::File,
    io::{Read, Write},
    path::Path,
    time::Instant,
};

use csv::StringRecord;
use log::{debug, info};

use crate::{
    core::item::{ItemProcessor, ItemReader, ItemWriter},
    error::BatchError,
    item::{
        console::ConsoleItemWriter,
        csv::csv_reader::{CsvItemReader, CsvItemReaderBuilder},
    },
    player::{Player, PlayerRowMapper},
    schema::{CoercionPolicy, check_header},
};

/// Roster file read by the binary, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "players.csv";

/// Progress of a [`Loader`] through its pipeline.
///
/// States only move forward. `Printed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    FileOpened,
    HeaderRead,
    RowsRead,
    RecordsMapped,
    Printed,
    Failed,
}

impl LoaderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoaderState::Printed | LoaderState::Failed)
    }
}

/// Outcome of a successful [`Loader::run`].
#[derive(Debug)]
pub struct LoadExecution {
    pub state: LoaderState,
    pub headers: StringRecord,
    pub read_count: usize,
    pub mapped_count: usize,
    pub write_count: usize,
    /// Parsed records, in file order
    pub players: Vec<Player>,
}

/// Loads the player roster from CSV and prints it.
///
/// The pipeline is strictly sequential:
///
/// 1. [`read_header`](Loader::read_header)
/// 2. [`read_all_rows`](Loader::read_all_rows)
/// 3. [`map_rows`](Loader::map_rows), one [`map_row`](Loader::map_row) per row
/// 4. [`print_all`](Loader::print_all)
///
/// The first error stops the pipeline and leaves the loader in
/// [`LoaderState::Failed`]. Rows already read are dropped with it.
///
/// # Examples
///
/// ```
/// use roster_batch::item::console::ConsoleItemWriter;
/// use roster_batch::loader::{LoaderBuilder, LoaderState};
///
/// let csv = "\
/// ID,Name,Age,Grade,Address,Phone,Email,ParentName
/// 1,Alice,10,5th,123 Oak St,555-1234,alice@x.com,Bob
/// ";
///
/// let loader = LoaderBuilder::new().from_reader(csv.as_bytes());
/// let writer = ConsoleItemWriter::new(Vec::new());
///
/// let execution = loader.run(&writer).unwrap();
///
/// assert_eq!(execution.players.len(), 1);
/// assert_eq!(execution.players[0].name, "Alice");
/// assert_eq!(loader.state(), LoaderState::Printed);
/// ```
pub struct Loader<R> {
    reader: CsvItemReader<R>,
    mapper: PlayerRowMapper,
    validate_header: bool,
    state: Cell<LoaderState>,
    read_count: Cell<usize>,
    mapped_count: Cell<usize>,
    write_count: Cell<usize>,
}

impl<R: Read> Loader<R> {
    pub fn state(&self) -> LoaderState {
        self.state.get()
    }

    pub fn get_read_count(&self) -> usize {
        self.read_count.get()
    }

    pub fn get_mapped_count(&self) -> usize {
        self.mapped_count.get()
    }

    pub fn get_write_count(&self) -> usize {
        self.write_count.get()
    }

    /// Runs the whole pipeline, printing the report to `writer`.
    ///
    /// The header line is printed as soon as the header is read, so it is
    /// already out when a later stage fails.
    pub fn run<W: Write>(
        &self,
        writer: &ConsoleItemWriter<W>,
    ) -> Result<LoadExecution, BatchError> {
        let start = Instant::now();

        debug!("Start of load");

        let headers = self.read_header()?;
        self.track(writer.write_headers(&headers))?;

        let rows = self.read_all_rows()?;
        let players = self.map_rows(&rows)?;
        self.print_all(&players, writer)?;

        info!(
            "Loaded {} player records in {:?}",
            players.len(),
            start.elapsed()
        );

        Ok(LoadExecution {
            state: self.state(),
            headers,
            read_count: self.get_read_count(),
            mapped_count: self.get_mapped_count(),
            write_count: self.get_write_count(),
            players,
        })
    }

    /// Reads the header row, checking it against the schema when header
    /// validation is enabled.
    pub fn read_header(&self) -> Result<StringRecord, BatchError> {
        let headers = self.track(self.reader.headers())?;
        debug!("CSV headers: {:?}", headers);

        if self.validate_header {
            self.track(check_header(&headers))?;
        }

        self.transition(LoaderState::HeaderRead);
        Ok(headers)
    }

    /// Reads every remaining row. Nothing is returned unless the whole input
    /// parses.
    pub fn read_all_rows(&self) -> Result<Vec<StringRecord>, BatchError> {
        let mut rows = Vec::new();

        while let Some(row) = self.track(self.reader.read())? {
            rows.push(row);
            self.read_count.set(self.read_count.get() + 1);
        }

        debug!("Read {} rows", rows.len());
        self.transition(LoaderState::RowsRead);
        Ok(rows)
    }

    pub fn map_row(&self, row: &StringRecord) -> Result<Player, BatchError> {
        let player = self.track(self.mapper.process(row))?;
        self.mapped_count.set(self.mapped_count.get() + 1);
        Ok(player)
    }

    pub fn map_rows(&self, rows: &[StringRecord]) -> Result<Vec<Player>, BatchError> {
        let players = rows
            .iter()
            .map(|row| self.map_row(row))
            .collect::<Result<Vec<Player>, BatchError>>()?;

        self.transition(LoaderState::RecordsMapped);
        Ok(players)
    }

    /// Hands all players to `writer` in a single `write` call.
    pub fn print_all(
        &self,
        players: &[Player],
        writer: &dyn ItemWriter<Player>,
    ) -> Result<(), BatchError> {
        self.track(writer.write(players))?;
        self.track(writer.flush())?;

        self.write_count.set(self.write_count.get() + players.len());
        self.transition(LoaderState::Printed);
        Ok(())
    }

    fn transition(&self, next: LoaderState) {
        debug!("Loader state: {:?} -> {:?}", self.state.get(), next);
        self.state.set(next);
    }

    /// Moves to `Failed` on error. Reporting the error is left to the caller.
    fn track<T>(&self, result: Result<T, BatchError>) -> Result<T, BatchError> {
        if let Err(err) = &result {
            debug!("Load failed in state {:?}: {}", self.state.get(), err);
            self.transition(LoaderState::Failed);
        }
        result
    }
}

/// A builder for configuring a [`Loader`].
///
/// # Default Configuration
///
/// - Coercion policy: [`CoercionPolicy::ZeroOnError`]
/// - Header validation: disabled, the header is printed but not checked
#[derive(Default)]
pub struct LoaderBuilder {
    coercion_policy: CoercionPolicy,
    validate_header: bool,
}

impl LoaderBuilder {
    pub fn new() -> Self {
        Self {
            coercion_policy: CoercionPolicy::ZeroOnError,
            validate_header: false,
        }
    }

    /// Sets how non-numeric ID and Age values are handled.
    pub fn coercion_policy(mut self, policy: CoercionPolicy) -> Self {
        self.coercion_policy = policy;
        self
    }

    /// Enables checking the header row against the roster schema.
    pub fn validate_header(mut self, yes: bool) -> Self {
        self.validate_header = yes;
        self
    }

    /// Opens the roster file at `path`.
    ///
    /// # Errors
    ///
    /// `BatchError::Io` if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<Loader<File>, BatchError> {
        let reader = CsvItemReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        Ok(self.build(reader))
    }

    pub fn from_reader<R: Read>(self, rdr: R) -> Loader<R> {
        let reader = CsvItemReaderBuilder::new().has_headers(true).from_reader(rdr);

        self.build(reader)
    }

    fn build<R>(self, reader: CsvItemReader<R>) -> Loader<R> {
        debug!("Loader state: {:?}", LoaderState::FileOpened);

        Loader {
            reader,
            mapper: PlayerRowMapper::new(self.coercion_policy),
            validate_header: self.validate_header,
            state: Cell::new(LoaderState::FileOpened),
            read_count: Cell::new(0),
            mapped_count: Cell::new(0),
            write_count: Cell::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::BatchError, item::console::ConsoleItemWriter, schema::CoercionPolicy};

    use super::{LoaderBuilder, LoaderState};

    const HEADER: &str = "ID,Name,Age,Grade,Address,Phone,Email,ParentName\n";

    #[test]
    fn stages_advance_the_state() {
        let csv = format!("{HEADER}1,Alice,10,5th,123 Oak St,555-1234,alice@x.com,Bob\n");
        let loader = LoaderBuilder::new().from_reader(csv.as_bytes());
        assert_eq!(loader.state(), LoaderState::FileOpened);

        loader.read_header().unwrap();
        assert_eq!(loader.state(), LoaderState::HeaderRead);

        let rows = loader.read_all_rows().unwrap();
        assert_eq!(loader.state(), LoaderState::RowsRead);
        assert_eq!(loader.get_read_count(), 1);

        let players = loader.map_rows(&rows).unwrap();
        assert_eq!(loader.state(), LoaderState::RecordsMapped);
        assert_eq!(loader.get_mapped_count(), 1);

        let writer = ConsoleItemWriter::new(Vec::new());
        loader.print_all(&players, &writer).unwrap();
        assert_eq!(loader.state(), LoaderState::Printed);
        assert!(loader.state().is_terminal());
        assert_eq!(loader.get_write_count(), 1);
    }

    #[test]
    fn stray_quote_discards_everything_read() {
        let csv = format!(
            "{HEADER}1,Alice,10,5th,123 Oak St,555-1234,alice@x.com,Bob\n\
             2,Ca\"rl,11,6th,456 Elm St,555-5678,carl@x.com,Dana\n"
        );
        let loader = LoaderBuilder::new().from_reader(csv.as_bytes());
        loader.read_header().unwrap();

        let error = loader.read_all_rows().unwrap_err();

        assert!(matches!(error, BatchError::Parse { stage: "rows", .. }));
        assert_eq!(loader.state(), LoaderState::Failed);
        assert_eq!(loader.get_read_count(), 1);
    }

    #[test]
    fn header_validation_is_opt_in() {
        let csv = "Name,ID,Age,Grade,Address,Phone,Email,ParentName\n";

        let lenient = LoaderBuilder::new().from_reader(csv.as_bytes());
        assert!(lenient.read_header().is_ok());

        let strict = LoaderBuilder::new()
            .validate_header(true)
            .from_reader(csv.as_bytes());
        assert!(matches!(strict.read_header(), Err(BatchError::Header(_))));
        assert_eq!(strict.state(), LoaderState::Failed);
    }

    #[test]
    fn rejecting_policy_stops_the_mapping() {
        let csv = format!(
            "{HEADER}1,Alice,10,5th,123 Oak St,555-1234,alice@x.com,Bob\n\
             x,Carl,11,6th,456 Elm St,555-5678,carl@x.com,Dana\n"
        );
        let loader = LoaderBuilder::new()
            .coercion_policy(CoercionPolicy::Reject)
            .from_reader(csv.as_bytes());
        let writer = ConsoleItemWriter::new(Vec::new());

        let error = loader.run(&writer).unwrap_err();

        assert!(matches!(error, BatchError::Coercion { column: "ID", line: 3, .. }));
        assert_eq!(loader.get_mapped_count(), 1);
        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output, format!("CSV Headers: [{}]\n", HEADER.trim_end().replace(',', " ")));
    }
}
