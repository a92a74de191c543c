use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An entire columnar file held in memory.
///
/// Batches are kept in file order, so iterating them row by row yields the
/// rows in the order they were stored.
#[derive(Debug, Clone)]
pub struct Table {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl Table {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Render the first `limit` rows as an ASCII table.
    pub fn preview(&self, limit: usize) -> Result<String, ArrowError> {
        let mut remaining = limit;
        let mut head = Vec::new();
        for batch in &self.batches {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(batch.num_rows());
            head.push(batch.slice(0, take));
            remaining -= take;
        }
        Ok(pretty_format_batches(&head)?.to_string())
    }
}

/// What to do with NaN and infinite floating point values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonFinitePolicy {
    /// Emit `null`.
    #[default]
    Null,
    /// Fail the conversion with an encoding error.
    Error,
}

/// How binary columns are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryEncoding {
    /// Standard base64 with padding.
    #[default]
    Base64,
    /// Lowercase hexadecimal.
    Hex,
    /// Fail the conversion with an encoding error.
    Reject,
}

/// How dates and timestamps are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemporalFormat {
    /// Integer milliseconds since the Unix epoch.
    #[default]
    EpochMillis,
    /// ISO-8601 strings.
    Iso8601,
}

/// Behaviour of a batch run when one input fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure and return it.
    #[default]
    Abort,
    /// Convert every input and collect failures in the report.
    Continue,
}

/// Options controlling how values are mapped to JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertOptions {
    pub non_finite: NonFinitePolicy,
    pub binary: BinaryEncoding,
    pub temporal: TemporalFormat,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    pub fn binary(mut self, encoding: BinaryEncoding) -> Self {
        self.binary = encoding;
        self
    }

    pub fn temporal(mut self, format: TemporalFormat) -> Self {
        self.temporal = format;
        self
    }
}

macro_rules! keyword_enum {
    ($ty:ty { $($name:literal => $variant:path),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!(
                        "unknown value '{}', expected one of: {}",
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($variant => f.write_str($name),)+
                }
            }
        }
    };
}

keyword_enum!(NonFinitePolicy {
    "null" => NonFinitePolicy::Null,
    "error" => NonFinitePolicy::Error,
});

keyword_enum!(BinaryEncoding {
    "base64" => BinaryEncoding::Base64,
    "hex" => BinaryEncoding::Hex,
    "reject" => BinaryEncoding::Reject,
});

keyword_enum!(TemporalFormat {
    "epoch-millis" => TemporalFormat::EpochMillis,
    "iso8601" => TemporalFormat::Iso8601,
});

keyword_enum!(FailurePolicy {
    "abort" => FailurePolicy::Abort,
    "continue" => FailurePolicy::Continue,
});
