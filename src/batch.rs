//! Converting many files into one output directory.

use crate::converter::{ConvertStats, Converter};
use crate::error::{Error, Result};
use crate::models::{ConvertOptions, FailurePolicy};
use log::{info, warn};
use serde::{Serialize, Serializer};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions replaced by `.json` when deriving output names.
pub const PARQUET_EXTENSIONS: [&str; 3] = ["parquet", "parq", "pq"];

const JSON_EXTENSION: &str = "json";

/// Explicit parameters of a batch run.
///
/// # Examples
///
/// ```no_run
/// use parquet2json::{BatchConfig, FailurePolicy};
///
/// let report = BatchConfig::new(vec!["a.parquet".into(), "b.parquet".into()], "out")
///     .failure_policy(FailurePolicy::Continue)
///     .run()?;
/// println!("{}", report.summary());
/// # Ok::<(), parquet2json::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_paths: Vec<PathBuf>,
    pub output_directory: PathBuf,
    pub failure_policy: FailurePolicy,
    pub options: ConvertOptions,
}

impl BatchConfig {
    pub fn new<P: AsRef<Path>>(input_paths: Vec<PathBuf>, output_directory: P) -> Self {
        Self {
            input_paths,
            output_directory: output_directory.as_ref().to_path_buf(),
            failure_policy: FailurePolicy::default(),
            options: ConvertOptions::default(),
        }
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self) -> Result<BatchReport> {
        run_batch(self)
    }
}

/// Convert every input into `output_directory` with default options,
/// stopping at the first failure.
pub fn convert_all<I, P, Q>(input_paths: I, output_directory: Q) -> Result<BatchReport>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let inputs = input_paths
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect();
    BatchConfig::new(inputs, output_directory).run()
}

/// Derive the output path for `input` inside `output_directory`.
///
/// The input's directory is discarded. A recognized Parquet extension is
/// replaced by `.json`; any other file name gets `.json` appended. Returns
/// `None` when `input` has no file name component.
pub fn output_path_for(input: &Path, output_directory: &Path) -> Option<PathBuf> {
    let file_name = Path::new(input.file_name()?);

    let recognized = file_name
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            PARQUET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);

    let json_name = if recognized {
        file_name.with_extension(JSON_EXTENSION)
    } else {
        let mut name = OsString::from(file_name.as_os_str());
        name.push(".");
        name.push(JSON_EXTENSION);
        PathBuf::from(name)
    };

    Some(output_directory.join(json_name))
}

fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let out_dir = &config.output_directory;
    fs::create_dir_all(out_dir).map_err(|e| Error::write(out_dir, e))?;

    let converter = Converter::new(config.options);
    let mut report = BatchReport::default();

    for input in &config.input_paths {
        let result = match output_path_for(input, out_dir) {
            Some(output) => converter
                .convert(input, &output)
                .map(|stats| (output, stats)),
            None => Err(Error::read(
                input,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            )),
        };

        match result {
            Ok((output, stats)) => {
                info!("Converted {} to {}", input.display(), output.display());
                report.converted.push(ConvertedFile {
                    input: input.clone(),
                    output,
                    stats,
                });
            }
            Err(error) => match config.failure_policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::Continue => {
                    warn!("Skipping {}: {}", input.display(), error);
                    report.failures.push(FailedFile {
                        input: input.clone(),
                        error,
                    });
                }
            },
        }
    }

    Ok(report)
}

/// Outcome of a batch run, both lists in input order.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    pub failures: Vec<FailedFile>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.converted.iter().map(|f| f.stats.rows).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Converted {} file(s) ({} rows), {} failed",
            self.converted.len(),
            self.total_rows(),
            self.failures.len()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: ConvertStats,
}

#[derive(Debug, Serialize)]
pub struct FailedFile {
    pub input: PathBuf,
    #[serde(serialize_with = "error_message")]
    pub error: Error,
}

fn error_message<S>(error: &Error, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived(input: &str) -> PathBuf {
        output_path_for(Path::new(input), Path::new("out")).unwrap()
    }

    #[test]
    fn test_parquet_extension_replaced() {
        assert_eq!(derived("a.parquet"), PathBuf::from("out/a.json"));
        assert_eq!(derived("data/b.PARQUET"), PathBuf::from("out/b.json"));
        assert_eq!(derived("c.pq"), PathBuf::from("out/c.json"));
        assert_eq!(derived("d.parq"), PathBuf::from("out/d.json"));
    }

    #[test]
    fn test_input_directory_discarded() {
        assert_eq!(
            derived("/some/deep/dir/data1(Eng).parquet"),
            PathBuf::from("out/data1(Eng).json")
        );
    }

    #[test]
    fn test_only_final_extension_replaced() {
        assert_eq!(derived("x.parquet.parquet"), PathBuf::from("out/x.parquet.json"));
        assert_eq!(derived("my.parquet.backup"), PathBuf::from("out/my.parquet.backup.json"));
    }

    #[test]
    fn test_unrecognized_extension_appended() {
        assert_eq!(derived("data.csv"), PathBuf::from("out/data.csv.json"));
        assert_eq!(derived("data"), PathBuf::from("out/data.json"));
    }

    #[test]
    fn test_no_file_name() {
        assert!(output_path_for(Path::new("/"), Path::new("out")).is_none());
        assert!(output_path_for(Path::new(".."), Path::new("out")).is_none());
    }
}
