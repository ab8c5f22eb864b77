//! Search-Result JSON to CSV Flattening
//!
//! Converts search-engine result documents (`hits.hits[]._source`) into
//! comma-delimited tables: a header row of sorted field names, then one row
//! per result with values in header order. Entirely unrelated to the crank
//! feature pipeline; shares no code or data with it.

mod error;
mod flatten;

pub use error::FlattenError;
pub use flatten::{flatten_file, flatten_results, write_csv, ResultTable};
