//! Writing Output Documents to disk.

use crate::error::{Error, Result};
use crate::formatter::write_records;
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Writes a record-per-line JSON array to a single file.
///
/// The document is first written to a temporary file next to the target and
/// then renamed over it, so a failed write never leaves a truncated file at
/// the destination and an existing file is only replaced once the new one is
/// complete. New files get the usual umask-derived mode; replaced files keep
/// the mode they had.
///
/// # Examples
///
/// ```no_run
/// use parquet2json::JsonWriter;
/// use serde_json::json;
///
/// let rows = vec![json!({"id": 1}), json!({"id": 2})];
/// let bytes = JsonWriter::new("out/a.json").write(&rows)?;
/// println!("wrote {bytes} bytes");
/// # Ok::<(), parquet2json::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `records` and replace the target file. Returns the number of
    /// bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the parent directory does not exist or is
    /// not writable, or if writing or renaming fails.
    pub fn write<T: Serialize>(&self, records: &[T]) -> Result<u64> {
        self.write_atomic(records)
            .map_err(|e| Error::write(&self.path, e))
    }

    fn write_atomic<T: Serialize>(&self, records: &[T]) -> io::Result<u64> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = temp_file_in(dir)?;
        {
            let mut out = BufWriter::new(&mut tmp);
            write_records(&mut out, records)?;
            out.flush()?;
        }
        tmp.as_file().sync_all()?;
        let bytes = tmp.as_file().metadata()?.len();

        // An overwritten output keeps its mode
        if let Ok(existing) = fs::metadata(&self.path) {
            if existing.is_file() {
                tmp.as_file().set_permissions(existing.permissions())?;
            }
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(bytes)
    }
}

/// Create the staging file. On Unix it is opened with mode `0666` so the
/// process umask decides the final mode, as for a plainly created file.
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".parquet2json-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
