//! Test utilities for building Parquet files
#![allow(dead_code)]

use arrow::array::{ArrayRef, RecordBatch};
use arrow::datatypes::{Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Builder for creating Parquet test files column by column
pub struct ParquetBuilder {
    fields: Vec<Field>,
    columns: Vec<ArrayRef>,
    max_row_group_size: Option<usize>,
}

impl ParquetBuilder {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            columns: Vec::new(),
            max_row_group_size: None,
        }
    }

    /// Add a nullable column
    pub fn column(mut self, name: &str, array: ArrayRef) -> Self {
        self.fields
            .push(Field::new(name, array.data_type().clone(), true));
        self.columns.push(array);
        self
    }

    /// Split the file into row groups of at most `rows` rows
    pub fn row_group_size(mut self, rows: usize) -> Self {
        self.max_row_group_size = Some(rows);
        self
    }

    pub fn batch(&self) -> RecordBatch {
        let schema = Arc::new(Schema::new(self.fields.clone()));
        RecordBatch::try_new(schema, self.columns.clone()).unwrap()
    }

    /// Write the file to `path`
    pub fn write(self, path: &Path) {
        let batch = self.batch();
        let mut props = WriterProperties::builder();
        if let Some(rows) = self.max_row_group_size {
            props = props.set_max_row_group_size(rows);
        }

        let file = File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props.build())).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }
}

/// The two-row `{"id", "name"}` table used by most tests
pub fn write_id_name(path: &Path) {
    use arrow::array::{Int64Array, StringArray};

    ParquetBuilder::new()
        .column("id", Arc::new(Int64Array::from(vec![1, 2])))
        .column("name", Arc::new(StringArray::from(vec!["x", "y"])))
        .write(path);
}

/// Read an output file and parse it as a JSON array of objects
pub fn read_json_rows(path: &Path) -> Vec<serde_json::Map<String, Value>> {
    let text = std::fs::read_to_string(path).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    value
        .as_array()
        .expect("top-level value should be an array")
        .iter()
        .map(|row| row.as_object().expect("every element should be an object").clone())
        .collect()
}
