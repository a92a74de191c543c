//! # parquet2json
//!
//! Convert Apache Parquet files into JSON arrays of row objects, one file at a
//! time or in batch.
//!
//! Each row becomes one JSON object whose keys follow the Parquet schema's
//! column order. The objects are written as a single JSON array with one
//! record per line:
//!
//! ```text
//! [
//! {"id":1,"name":"x"},
//! {"id":2,"name":"y"}
//! ]
//! ```
//!
//! A file with no rows produces `[\n\n]`.
//!
//! ## Quick Start
//!
//! ```no_run
//! // One file
//! parquet2json::convert("a.parquet", "out/a.json")?;
//!
//! // Many files into one directory (created if missing)
//! let report = parquet2json::convert_all(["a.parquet", "b.parquet"], "out")?;
//! println!("{}", report.summary());
//! # Ok::<(), parquet2json::Error>(())
//! ```
//!
//! ## Value Mapping
//!
//! - Integers are written exactly, including 64-bit values outside the `f64`
//!   safe range. Decimals become strings so no precision is lost.
//! - NaN and infinities become `null` unless [`NonFinitePolicy::Error`] is
//!   selected.
//! - Binary values are base64 by default ([`BinaryEncoding`]).
//! - Dates and timestamps are epoch milliseconds by default, or ISO-8601 with
//!   [`TemporalFormat::Iso8601`].
//! - Half and single precision floats are written in their shortest decimal
//!   form (`0.1`, not `0.100000001490116`).
//! - Lists become arrays, structs become objects and dictionaries are
//!   decoded. Maps become objects when their keys are strings and distinct
//!   within the entry; otherwise they become `[{"key":..,"value":..}]` lists,
//!   so repeated keys are never dropped.
//! - A second-resolution timestamp too large to express in milliseconds is
//!   an encoding error.
//!
//! ## Error Handling
//!
//! ```no_run
//! use parquet2json::{convert, Error};
//!
//! match convert("a.parquet", "a.json") {
//!     Ok(stats) => println!("{}", stats.summary()),
//!     Err(Error::Read { path, source }) => eprintln!("bad input {}: {}", path.display(), source),
//!     Err(err) => eprintln!("{}", err),
//! }
//! ```

pub mod batch;
pub mod converter;
pub mod error;
pub mod reader;
pub mod writer;

pub use batch::{convert_all, output_path_for, BatchConfig, BatchReport, ConvertedFile, FailedFile};
pub use converter::{convert, ConvertStats, Converter};
pub use error::{EncodeError, Error, Result};
pub use reader::ParquetReader;
pub use writer::JsonWriter;

pub use models::{
    BinaryEncoding, ConvertOptions, FailurePolicy, NonFinitePolicy, Table, TemporalFormat,
};

// Building blocks, public for callers that need finer control
pub mod formats;
pub mod formatter;
pub mod models;
