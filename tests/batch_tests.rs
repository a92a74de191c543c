mod common;

use arrow::array::Int64Array;
use common::{read_json_rows, write_id_name, ParquetBuilder};
use parquet2json::{convert_all, BatchConfig, Error, FailurePolicy};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_batch_converts_every_input() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.parquet");
    let b = dir.path().join("b.parquet");
    write_id_name(&a);
    ParquetBuilder::new()
        .column("n", Arc::new(Int64Array::from(vec![10, 20, 30])))
        .write(&b);
    let out = dir.path().join("out");

    let report = convert_all([&a, &b], &out).unwrap();

    assert!(report.is_success());
    assert_eq!(report.converted.len(), 2);
    assert_eq!(report.total_rows(), 5);
    assert_eq!(report.converted[0].output, out.join("a.json"));
    assert_eq!(report.converted[1].output, out.join("b.json"));

    assert_eq!(
        fs::read_to_string(out.join("a.json")).unwrap(),
        "[\n{\"id\":1,\"name\":\"x\"},\n{\"id\":2,\"name\":\"y\"}\n]"
    );
    assert_eq!(read_json_rows(&out.join("b.json")).len(), 3);
}

#[test]
fn test_batch_creates_nested_output_directory() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.parquet");
    write_id_name(&a);
    let out = dir.path().join("deep").join("er").join("out");

    convert_all([&a], &out).unwrap();

    assert!(out.join("a.json").exists());
}

#[test]
fn test_batch_accepts_existing_output_directory() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.parquet");
    write_id_name(&a);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let report = convert_all([&a], &out).unwrap();

    assert_eq!(report.converted.len(), 1);
}

#[test]
fn test_batch_with_no_inputs_only_prepares_directory() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");

    let report = convert_all(Vec::<PathBuf>::new(), &out).unwrap();

    assert!(out.is_dir());
    assert!(report.converted.is_empty());
    assert!(report.failures.is_empty());
}

#[test]
fn test_inputs_from_different_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("one")).unwrap();
    fs::create_dir(dir.path().join("two")).unwrap();
    let a = dir.path().join("one").join("data1(Eng).parquet");
    let b = dir.path().join("two").join("data2(Eng).parquet");
    write_id_name(&a);
    write_id_name(&b);
    let out = dir.path().join("json_output");

    convert_all([&a, &b], &out).unwrap();

    assert!(out.join("data1(Eng).json").exists());
    assert!(out.join("data2(Eng).json").exists());
}

fn malformed_batch() -> (tempfile::TempDir, Vec<PathBuf>, PathBuf) {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.parquet");
    let b = dir.path().join("b.parquet");
    let c = dir.path().join("c.parquet");
    write_id_name(&a);
    fs::write(&b, b"definitely not parquet").unwrap();
    write_id_name(&c);
    let out = dir.path().join("out");
    (dir, vec![a, b, c], out)
}

#[test]
fn test_abort_policy_stops_at_first_failure() {
    let (_dir, inputs, out) = malformed_batch();

    let err = BatchConfig::new(inputs.clone(), &out).run().unwrap_err();

    assert!(matches!(err, Error::Read { .. }));
    assert_eq!(err.path(), inputs[1].as_path());
    assert!(out.join("a.json").exists());
    assert!(!out.join("b.json").exists());
    assert!(!out.join("c.json").exists());
}

#[test]
fn test_continue_policy_collects_failures() {
    let (_dir, inputs, out) = malformed_batch();

    let report = BatchConfig::new(inputs.clone(), &out)
        .failure_policy(FailurePolicy::Continue)
        .run()
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.converted.len(), 2);
    assert_eq!(report.converted[0].input, inputs[0]);
    assert_eq!(report.converted[1].input, inputs[2]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].input, inputs[1]);
    assert!(matches!(report.failures[0].error, Error::Read { .. }));
    assert_eq!(report.summary(), "Converted 2 file(s) (4 rows), 1 failed");

    assert!(out.join("a.json").exists());
    assert!(!out.join("b.json").exists());
    assert!(out.join("c.json").exists());
}

#[test]
fn test_report_serializes_errors_as_messages() {
    let (_dir, inputs, out) = malformed_batch();

    let report = BatchConfig::new(inputs, &out)
        .failure_policy(FailurePolicy::Continue)
        .run()
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["converted"].as_array().unwrap().len(), 2);
    assert_eq!(value["converted"][0]["stats"]["rows"], 2);
    let message = value["failures"][0]["error"].as_str().unwrap();
    assert!(message.contains("b.parquet"));
}

#[test]
fn test_output_directory_that_is_a_file() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.parquet");
    write_id_name(&a);
    let out = dir.path().join("out");
    fs::write(&out, "not a directory").unwrap();

    let err = convert_all([&a], &out).unwrap_err();

    assert!(matches!(err, Error::Write { .. }));
    assert_eq!(err.path(), out.as_path());
}
