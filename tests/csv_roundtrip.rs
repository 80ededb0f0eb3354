//! Persisting a real run: samples CSV round-trip plus environment record.

use std::time::Duration;

use tachymeter::data::{
    read_samples_csv, write_environment_csv, write_samples_csv, CsvOptions,
    ENVIRONMENT_CSV_HEADER,
};
use tachymeter::{routine, Environment, Executor};

#[test]
fn run_samples_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.csv");

    let mut r = routine(|| std::hint::black_box(2u64).pow(10));
    let results = Executor::new()
        .samples(30)
        .budget(Duration::from_millis(500))
        .run(&mut r)
        .unwrap();

    write_samples_csv(&path, &results.samples, CsvOptions::default()).unwrap();
    let loaded = read_samples_csv(&path).unwrap();

    assert_eq!(loaded.len(), results.samples.len());
    assert_eq!(loaded.evaluations(), results.samples.evaluations());
    assert_eq!(loaded.bytes_allocated(), results.samples.bytes_allocated());
}

#[test]
fn environment_record_is_one_header_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("env.csv");

    let env = Environment::capture().package_sha1("0123456789abcdef");
    write_environment_csv(&path, &env, CsvOptions::default()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], ENVIRONMENT_CSV_HEADER);
    assert!(lines[1].contains("0123456789abcdef"));
    assert!(lines[1].contains("NULL")); // runtime revision left unset
}

#[test]
fn append_mode_accumulates_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.csv");

    let mut r = routine(|| std::hint::black_box(1u32) + 1);
    let first = Executor::new()
        .samples(5)
        .budget(Duration::from_millis(200))
        .run(&mut r)
        .unwrap();
    let second = Executor::new()
        .samples(5)
        .budget(Duration::from_millis(200))
        .run(&mut r)
        .unwrap();

    write_samples_csv(&path, &first.samples, CsvOptions::default()).unwrap();
    write_samples_csv(&path, &second.samples, CsvOptions::append_headerless()).unwrap();

    let loaded = read_samples_csv(&path).unwrap();
    assert_eq!(loaded.len(), first.samples.len() + second.samples.len());
}
