use arrow::array::{Array, AsArray, RecordBatch, StructArray};
use arrow::compute::cast;
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Date32Type, Date64Type, Float16Type, Float32Type, Float64Type,
    Int16Type, Int32Type, Int64Type, Int8Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use base64::Engine;
use serde_json::{Map, Number, Value};
use std::collections::HashSet;

use crate::error::EncodeError;
use crate::models::{BinaryEncoding, ConvertOptions, NonFinitePolicy, Table, TemporalFormat};

const MILLIS_PER_DAY: i64 = 86_400_000;

type F16 = <Float16Type as ArrowPrimitiveType>::Native;

/// One JSON object per input row, keys in schema order.
pub type JsonRow = Map<String, Value>;

/// Failure at a row index of the array being encoded.
#[derive(Debug)]
struct ValueError {
    row: usize,
    reason: String,
}

type Encoded = Result<Vec<Value>, ValueError>;

/// Converts Arrow columns into JSON values.
///
/// Encoding is column-at-a-time: every column of a batch is turned into a
/// `Vec<Value>` and the vectors are then zipped into row objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowEncoder {
    options: ConvertOptions,
}

impl RowEncoder {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn encode_table(&self, table: &Table) -> Result<Vec<JsonRow>, EncodeError> {
        let mut rows = Vec::with_capacity(table.num_rows());
        let mut first_row = 0;
        for batch in &table.batches {
            rows.extend(self.encode_batch(batch, first_row)?);
            first_row += batch.num_rows();
        }
        Ok(rows)
    }

    /// Encode one batch. `first_row` is the table-wide index of the batch's
    /// first row and is only used for error reporting.
    pub fn encode_batch(
        &self,
        batch: &RecordBatch,
        first_row: usize,
    ) -> Result<Vec<JsonRow>, EncodeError> {
        let schema = batch.schema();
        let mut columns = Vec::with_capacity(batch.num_columns());
        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            let values = self.encode_array(array.as_ref()).map_err(|e| EncodeError {
                column: field.name().clone(),
                row: first_row + e.row,
                reason: e.reason,
            })?;
            columns.push(values);
        }

        let mut rows = Vec::with_capacity(batch.num_rows());
        for i in 0..batch.num_rows() {
            let mut row = Map::with_capacity(columns.len());
            for (field, values) in schema.fields().iter().zip(columns.iter_mut()) {
                row.insert(field.name().clone(), std::mem::take(&mut values[i]));
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn encode_array(&self, array: &dyn Array) -> Encoded {
        match array.data_type() {
            DataType::Null => Ok(vec![Value::Null; array.len()]),
            DataType::Boolean => {
                let a = array.as_boolean();
                each(array, |i| Ok(Value::Bool(a.value(i))))
            }
            DataType::Int8 => {
                let a = array.as_primitive::<Int8Type>();
                ints(array, |i| a.value(i) as i64)
            }
            DataType::Int16 => {
                let a = array.as_primitive::<Int16Type>();
                ints(array, |i| a.value(i) as i64)
            }
            DataType::Int32 => {
                let a = array.as_primitive::<Int32Type>();
                ints(array, |i| a.value(i) as i64)
            }
            DataType::Int64 => {
                let a = array.as_primitive::<Int64Type>();
                ints(array, |i| a.value(i))
            }
            DataType::UInt8 => {
                let a = array.as_primitive::<UInt8Type>();
                uints(array, |i| a.value(i) as u64)
            }
            DataType::UInt16 => {
                let a = array.as_primitive::<UInt16Type>();
                uints(array, |i| a.value(i) as u64)
            }
            DataType::UInt32 => {
                let a = array.as_primitive::<UInt32Type>();
                uints(array, |i| a.value(i) as u64)
            }
            DataType::UInt64 => {
                let a = array.as_primitive::<UInt64Type>();
                uints(array, |i| a.value(i))
            }
            DataType::Float16 => {
                let a = array.as_primitive::<Float16Type>();
                each(array, |i| self.float(shortest_f16(a.value(i))))
            }
            DataType::Float32 => {
                let a = array.as_primitive::<Float32Type>();
                each(array, |i| self.float(shortest(a.value(i))))
            }
            DataType::Float64 => {
                let a = array.as_primitive::<Float64Type>();
                each(array, |i| self.float(a.value(i)))
            }
            DataType::Utf8 => {
                let a = array.as_string::<i32>();
                each(array, |i| Ok(Value::String(a.value(i).to_string())))
            }
            DataType::LargeUtf8 => {
                let a = array.as_string::<i64>();
                each(array, |i| Ok(Value::String(a.value(i).to_string())))
            }
            DataType::Utf8View => {
                let a = array.as_string_view();
                each(array, |i| Ok(Value::String(a.value(i).to_string())))
            }
            DataType::Binary => {
                let a = array.as_binary::<i32>();
                each(array, |i| self.binary(a.value(i)))
            }
            DataType::LargeBinary => {
                let a = array.as_binary::<i64>();
                each(array, |i| self.binary(a.value(i)))
            }
            DataType::BinaryView => {
                let a = array.as_binary_view();
                each(array, |i| self.binary(a.value(i)))
            }
            DataType::FixedSizeBinary(_) => {
                let a = array.as_fixed_size_binary();
                each(array, |i| self.binary(a.value(i)))
            }
            DataType::Date32 if self.options.temporal == TemporalFormat::EpochMillis => {
                let a = array.as_primitive::<Date32Type>();
                ints(array, |i| a.value(i) as i64 * MILLIS_PER_DAY)
            }
            DataType::Date64 if self.options.temporal == TemporalFormat::EpochMillis => {
                let a = array.as_primitive::<Date64Type>();
                ints(array, |i| a.value(i))
            }
            DataType::Timestamp(unit, _)
                if self.options.temporal == TemporalFormat::EpochMillis =>
            {
                timestamp_millis(array, unit)
            }
            DataType::Date32
            | DataType::Date64
            | DataType::Timestamp(_, _)
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Duration(_)
            | DataType::Interval(_)
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => display_strings(array),
            DataType::List(_) => {
                let a = array.as_list::<i32>();
                each(array, |i| self.nested(&a.value(i)))
            }
            DataType::LargeList(_) => {
                let a = array.as_list::<i64>();
                each(array, |i| self.nested(&a.value(i)))
            }
            DataType::FixedSizeList(_, _) => {
                let a = array.as_fixed_size_list();
                each(array, |i| self.nested(&a.value(i)))
            }
            DataType::Struct(_) => self.encode_struct(array.as_struct()),
            DataType::Map(_, _) => {
                let a = array.as_map();
                each(array, |i| self.map_entries(&a.value(i)))
            }
            DataType::Dictionary(_, value_type) => {
                let decoded = cast(array, value_type).map_err(|e| ValueError {
                    row: 0,
                    reason: format!("cannot decode dictionary: {e}"),
                })?;
                self.encode_array(decoded.as_ref())
            }
            other => Err(ValueError {
                row: 0,
                reason: format!("unsupported type {other}"),
            }),
        }
    }

    fn float(&self, v: f64) -> Result<Value, String> {
        match Number::from_f64(v) {
            Some(n) => Ok(Value::Number(n)),
            None => match self.options.non_finite {
                NonFinitePolicy::Null => Ok(Value::Null),
                NonFinitePolicy::Error => Err(format!("non-finite float {v}")),
            },
        }
    }

    fn binary(&self, bytes: &[u8]) -> Result<Value, String> {
        match self.options.binary {
            BinaryEncoding::Base64 => Ok(Value::String(
                base64::engine::general_purpose::STANDARD.encode(bytes),
            )),
            BinaryEncoding::Hex => Ok(Value::String(hex::encode(bytes))),
            BinaryEncoding::Reject => Err(format!("binary value of {} bytes", bytes.len())),
        }
    }

    /// Encode the child slice belonging to one list element.
    fn nested(&self, child: &dyn Array) -> Result<Value, String> {
        self.encode_array(child)
            .map(Value::Array)
            .map_err(|e| e.reason)
    }

    fn map_entries(&self, entries: &StructArray) -> Result<Value, String> {
        let keys = self.encode_array(entries.column(0).as_ref()).map_err(|e| e.reason)?;
        let values = self.encode_array(entries.column(1).as_ref()).map_err(|e| e.reason)?;

        let string_keys = matches!(
            entries.column(0).data_type(),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
        );
        // Repeated keys fall back to the entry list instead of collapsing
        let distinct = || {
            let seen: HashSet<&str> = keys.iter().filter_map(Value::as_str).collect();
            seen.len() == keys.len()
        };
        if string_keys && distinct() {
            let mut object = Map::with_capacity(keys.len());
            for (key, value) in keys.into_iter().zip(values) {
                if let Value::String(key) = key {
                    object.insert(key, value);
                }
            }
            Ok(Value::Object(object))
        } else {
            Ok(Value::Array(
                keys.into_iter()
                    .zip(values)
                    .map(|(key, value)| {
                        let mut entry = Map::with_capacity(2);
                        entry.insert("key".to_string(), key);
                        entry.insert("value".to_string(), value);
                        Value::Object(entry)
                    })
                    .collect(),
            ))
        }
    }

    fn encode_struct(&self, array: &StructArray) -> Encoded {
        let mut children = Vec::with_capacity(array.num_columns());
        for child in array.columns() {
            children.push(self.encode_array(child.as_ref())?);
        }

        let mut out = Vec::with_capacity(array.len());
        for i in 0..array.len() {
            if array.is_null(i) {
                out.push(Value::Null);
                continue;
            }
            let mut object = Map::with_capacity(children.len());
            for (field, values) in array.fields().iter().zip(children.iter_mut()) {
                object.insert(field.name().clone(), std::mem::take(&mut values[i]));
            }
            out.push(Value::Object(object));
        }
        Ok(out)
    }
}

/// Apply `f` to every non-null slot; null slots become `null`.
fn each<F>(array: &dyn Array, mut f: F) -> Encoded
where
    F: FnMut(usize) -> Result<Value, String>,
{
    (0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Ok(Value::Null)
            } else {
                f(i).map_err(|reason| ValueError { row: i, reason })
            }
        })
        .collect()
}

fn ints(array: &dyn Array, f: impl Fn(usize) -> i64) -> Encoded {
    each(array, |i| Ok(Value::from(f(i))))
}

fn uints(array: &dyn Array, f: impl Fn(usize) -> u64) -> Encoded {
    each(array, |i| Ok(Value::from(f(i))))
}

/// Widen an `f16` through the shortest decimal that maps back to the same
/// half-precision value, so `0.1` stays `0.1`.
fn shortest_f16(v: F16) -> f64 {
    if !v.is_finite() {
        return v.to_f64();
    }
    for precision in 0..5 {
        let text = format!("{:.*e}", precision, v.to_f32());
        if let Ok(wide) = text.parse::<f64>() {
            if F16::from_f64(wide) == v {
                return wide;
            }
        }
    }
    v.to_f64()
}

/// Widen an `f32` through its shortest decimal form so `0.1f32` stays `0.1`.
fn shortest(v: f32) -> f64 {
    if v.is_finite() {
        v.to_string().parse().unwrap_or(v as f64)
    } else {
        v as f64
    }
}

fn timestamp_millis(array: &dyn Array, unit: &TimeUnit) -> Encoded {
    match unit {
        TimeUnit::Second => {
            let a = array.as_primitive::<TimestampSecondType>();
            each(array, |i| {
                let secs = a.value(i);
                secs.checked_mul(1_000)
                    .map(Value::from)
                    .ok_or_else(|| format!("timestamp {secs}s overflows epoch milliseconds"))
            })
        }
        TimeUnit::Millisecond => {
            let a = array.as_primitive::<TimestampMillisecondType>();
            ints(array, |i| a.value(i))
        }
        TimeUnit::Microsecond => {
            let a = array.as_primitive::<TimestampMicrosecondType>();
            ints(array, |i| a.value(i).div_euclid(1_000))
        }
        TimeUnit::Nanosecond => {
            let a = array.as_primitive::<TimestampNanosecondType>();
            ints(array, |i| a.value(i).div_euclid(1_000_000))
        }
    }
}

/// Render through Arrow's display formatter (ISO-8601 for temporal types,
/// canonical text for decimals).
fn display_strings(array: &dyn Array) -> Encoded {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array, &options).map_err(|e| ValueError {
        row: 0,
        reason: e.to_string(),
    })?;
    each(array, |i| Ok(Value::String(formatter.value(i).to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortest_keeps_short_f32_text() {
        assert_eq!(shortest(0.1f32), 0.1f64);
        assert_eq!(shortest(1.5f32), 1.5f64);
        assert!(shortest(f32::NAN).is_nan());
    }

    #[test]
    fn test_shortest_f16_round_trips_half_precision() {
        assert_eq!(shortest_f16(F16::from_f32(0.1)), 0.1);
        assert_eq!(shortest_f16(F16::from_f32(1.5)), 1.5);
        assert_eq!(shortest_f16(F16::from_f32(65504.0)), 65500.0);
        assert_eq!(shortest_f16(F16::from_f32(-0.333)), -0.333);
        assert!(shortest_f16(F16::NAN).is_nan());
    }
}
