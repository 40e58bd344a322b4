//! CSV support for reading tabular data.
//!
//! The [`csv_reader::CsvItemReader`] hands out each row as a raw
//! `StringRecord`, leaving the typing of fields to an `ItemProcessor`. It
//! reads from files or from any source implementing `Read`, and is configured
//! through [`csv_reader::CsvItemReaderBuilder`].
//!
//! # Examples
//!
//! ```
//! use roster_batch::item::csv::csv_reader::CsvItemReaderBuilder;
//! use roster_batch::core::item::ItemReader;
//!
//! let csv_data = "\
//! city,country,pop
//! Boston,United States,4628910
//! Concord,United States,42695
//! ";
//!
//! let reader = CsvItemReaderBuilder::new()
//!     .has_headers(true)
//!     .from_reader(csv_data.as_bytes());
//!
//! let mut cities = Vec::new();
//! while let Some(city) = reader.read().unwrap() {
//!     cities.push(city);
//! }
//!
//! assert_eq!(cities.len(), 2);
//! assert_eq!(&cities[0][0], "Boston");
//! assert_eq!(&cities[1][2], "42695");
//! ```

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

mod quoting;
