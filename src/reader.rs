//! Loading Parquet files into memory.

use crate::error::{Error, Result};
use crate::models::Table;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;

const DEFAULT_BATCH_SIZE: usize = 8192;

/// Reads a whole Parquet file into a [`Table`].
///
/// # Examples
///
/// ```no_run
/// use parquet2json::ParquetReader;
///
/// let table = ParquetReader::new().read("data.parquet")?;
/// println!("{} rows, {} columns", table.num_rows(), table.num_columns());
/// # Ok::<(), parquet2json::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParquetReader {
    batch_size: usize,
}

impl ParquetReader {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Maximum rows per decoded record batch. Does not change the output,
    /// only how the rows are chunked in memory.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Read every row group of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file cannot be opened, is not a Parquet
    /// file, or contains pages that cannot be decoded into Arrow arrays.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::read(path, e))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::read(path, e))?
            .with_batch_size(self.batch_size);

        let schema = builder.schema().clone();
        debug!(
            "{}: {} row group(s), schema {:?}",
            path.display(),
            builder.metadata().num_row_groups(),
            schema
        );

        let reader = builder.build().map_err(|e| Error::read(path, e))?;

        let mut batches = Vec::new();
        for batch in reader {
            batches.push(batch.map_err(|e| Error::read(path, e))?);
        }

        Ok(Table::new(schema, batches))
    }
}

impl Default for ParquetReader {
    fn default() -> Self {
        Self::new()
    }
}
