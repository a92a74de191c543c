//! Single-file Parquet to JSON conversion.

use crate::error::{Error, Result};
use crate::formats::json::RowEncoder;
use crate::models::ConvertOptions;
use crate::reader::ParquetReader;
use crate::writer::JsonWriter;
use log::{debug, log_enabled, Level};
use serde::Serialize;
use std::path::Path;

const PREVIEW_ROWS: usize = 5;

/// Converts one Parquet file into a JSON array of row objects.
///
/// # Examples
///
/// ```no_run
/// use parquet2json::{Converter, ConvertOptions, NonFinitePolicy};
///
/// let options = ConvertOptions::new().non_finite(NonFinitePolicy::Error);
/// let stats = Converter::new(options).convert("a.parquet", "a.json")?;
/// println!("{}", stats.summary());
/// # Ok::<(), parquet2json::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    reader: ParquetReader,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            reader: ParquetReader::new(),
            options,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Read `input`, encode every row and write the array to `output`,
    /// replacing any existing file.
    pub fn convert<P, Q>(&self, input: P, output: Q) -> Result<ConvertStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input = input.as_ref();
        let output = output.as_ref();

        let table = self.reader.read(input)?;
        debug!(
            "{}: {} rows, columns {:?}",
            input.display(),
            table.num_rows(),
            table.column_names()
        );
        if log_enabled!(Level::Debug) {
            if let Ok(preview) = table.preview(PREVIEW_ROWS) {
                debug!("first rows of {}:\n{}", input.display(), preview);
            }
        }

        let rows = RowEncoder::new(self.options)
            .encode_table(&table)
            .map_err(|source| Error::Encoding {
                path: input.to_path_buf(),
                source,
            })?;

        let bytes_written = JsonWriter::new(output).write(&rows)?;

        Ok(ConvertStats {
            rows: rows.len(),
            columns: table.num_columns(),
            bytes_written,
        })
    }
}

/// Convert `input` to `output` with default options.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertStats> {
    Converter::default().convert(input, output)
}

/// Statistics about a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    /// Rows read, equal to the number of objects written
    pub rows: usize,
    pub columns: usize,
    pub bytes_written: u64,
}

impl ConvertStats {
    pub fn summary(&self) -> String {
        format!(
            "{} rows x {} columns, {} bytes",
            self.rows, self.columns, self.bytes_written
        )
    }
}
