/*!
 # roster-batch

 Loads a player roster from a CSV file and prints every player as a labeled
 block of text.

 ## Core Concepts

- **ItemReader:** retrieves input one item at a time. The CSV reader hands out
  raw rows.
- **ItemProcessor:** turns a read item into an output item. The
  `PlayerRowMapper` binds row positions to `Player` fields.
- **ItemWriter:** receives the processed items. The console writer prints the
  report.
- **Loader:** runs the pipeline `read header → read all rows → map rows →
  print` and stops at the first error.

 ## Input

The roster is a comma-separated file with a header row followed by eight
columns per row:

| Index | Field      | Type    |
|-------|------------|---------|
| 0     | ID         | integer |
| 1     | Name       | text    |
| 2     | Age        | integer |
| 3     | Grade      | text    |
| 4     | Address    | text    |
| 5     | Phone      | text    |
| 6     | Email      | text    |
| 7     | ParentName | text    |

 ## Getting Started

```rust
# use roster_batch::{
#     error::BatchError,
#     item::console::ConsoleItemWriter,
#     loader::LoaderBuilder,
#     schema::CoercionPolicy,
# };
fn main() -> Result<(), BatchError> {
    let csv = "\
ID,Name,Age,Grade,Address,Phone,Email,ParentName
1,Alice,10,5th,123 Oak St,555-1234,alice@x.com,Bob
2,Carl,11,6th,456 Elm St,555-5678,carl@x.com,Dana
";

    let loader = LoaderBuilder::new()
        .coercion_policy(CoercionPolicy::Reject)
        .validate_header(true)
        .from_reader(csv.as_bytes());

    let writer = ConsoleItemWriter::new(Vec::new());
    let execution = loader.run(&writer)?;

    assert_eq!(execution.players.len(), 2);
    assert_eq!(execution.players[1].parent_name, "Dana");

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core traits for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of item readers / writers (csv reader, console writer)
pub mod item;

/// The roster loading pipeline
pub mod loader;

/// The player record and its row mapper
pub mod player;

/// Column layout of the roster
pub mod schema;
