//! A `serde_json` formatter for record-per-line arrays.
//!
//! The outermost array is opened with `[\n`, its elements are separated by
//! `,\n` and it is closed with `\n]`. Everything nested inside an element is
//! written compactly, so each record occupies exactly one line:
//!
//! ```text
//! [
//! {"id":1,"name":"x"},
//! {"id":2,"name":"y"}
//! ]
//! ```
//!
//! An empty array renders as `[\n\n]`.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

#[derive(Debug, Default, Clone)]
pub struct RecordArrayFormatter {
    depth: usize,
}

impl RecordArrayFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn at_top(&self) -> bool {
        self.depth == 1
    }
}

impl Formatter for RecordArrayFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth += 1;
        if self.at_top() {
            writer.write_all(b"[\n")
        } else {
            writer.write_all(b"[")
        }
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let top = self.at_top();
        self.depth -= 1;
        if top {
            writer.write_all(b"\n]")
        } else {
            writer.write_all(b"]")
        }
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match (first, self.at_top()) {
            (true, _) => Ok(()),
            (false, true) => writer.write_all(b",\n"),
            (false, false) => writer.write_all(b","),
        }
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth += 1;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth -= 1;
        writer.write_all(b"}")
    }
}

/// Serialize `records` as a record-per-line JSON array into `writer`.
pub fn write_records<W, T>(writer: W, records: &[T]) -> serde_json::Result<()>
where
    W: io::Write,
    T: Serialize,
{
    let mut ser = serde_json::Serializer::with_formatter(writer, RecordArrayFormatter::new());
    records.serialize(&mut ser)
}
