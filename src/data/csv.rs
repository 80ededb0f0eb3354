//! CSV emission and parsing for sample stores and environment records.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::{CsvOptions, DataError};
use crate::environment::Environment;
use crate::samples::{SampleRow, SampleStore};

/// Header row of a samples CSV. Time columns are nanoseconds.
pub const SAMPLES_CSV_HEADER: &str = "evaluations,elapsed_time,gc_time,bytes_allocated,allocations";

/// Header row of an environment CSV.
pub const ENVIRONMENT_CSV_HEADER: &str =
    "uuid,timestamp,runtime_sha1,package_sha1,os,cpu_cores,arch,machine,word_size";

fn open(path: &Path, options: CsvOptions) -> Result<File, DataError> {
    let file = if options.append {
        OpenOptions::new().append(true).create(true).open(path)?
    } else {
        File::create(path)?
    };
    Ok(file)
}

fn wants_header(options: CsvOptions) -> bool {
    !options.append || options.header_on_append
}

/// Write a sample store, one row per sample in insertion order.
pub fn write_samples_csv(
    path: &Path,
    store: &SampleStore,
    options: CsvOptions,
) -> Result<(), DataError> {
    let mut w = BufWriter::new(open(path, options)?);
    if wants_header(options) {
        writeln!(w, "{}", SAMPLES_CSV_HEADER)?;
    }
    for row in store.rows() {
        writeln!(
            w,
            "{},{},{},{},{}",
            row.evaluations, row.elapsed_ns, row.gc_ns, row.bytes_allocated, row.allocations
        )?;
    }
    w.flush()?;
    Ok(())
}

/// Write an environment record: one header row, one data row.
///
/// Absent optional fields are written as the literal `NULL`.
pub fn write_environment_csv(
    path: &Path,
    env: &Environment,
    options: CsvOptions,
) -> Result<(), DataError> {
    let mut w = BufWriter::new(open(path, options)?);
    if wants_header(options) {
        writeln!(w, "{}", ENVIRONMENT_CSV_HEADER)?;
    }
    writeln!(
        w,
        "{},{},{},{},{},{},{},{},{}",
        env.uuid,
        env.timestamp,
        null_or(&env.runtime_sha1),
        null_or(&env.package_sha1),
        env.os,
        env.cpu_cores,
        env.arch,
        null_or(&env.machine),
        env.word_size
    )?;
    w.flush()?;
    Ok(())
}

fn null_or(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("NULL")
}

/// Parse a samples CSV back into a store.
///
/// Header rows are recognized by their first field and skipped wherever
/// they appear, so files written in append mode with repeated headers load
/// cleanly.
pub fn read_samples_csv(path: &Path) -> Result<SampleStore, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let mut store = SampleStore::new();

    for (line_idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() || line.starts_with("evaluations") {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            return Err(DataError::Parse {
                line: line_idx + 1,
                message: format!("expected 5 columns, got {}", fields.len()),
            });
        }

        store.push(SampleRow {
            evaluations: parse_field(fields[0], line_idx)?,
            elapsed_ns: parse_field(fields[1], line_idx)?,
            gc_ns: parse_field(fields[2], line_idx)?,
            bytes_allocated: parse_field(fields[3], line_idx)?,
            allocations: parse_field(fields[4], line_idx)?,
        });
    }

    Ok(store)
}

fn parse_field<T: std::str::FromStr>(field: &str, line_idx: usize) -> Result<T, DataError> {
    field.trim().parse().map_err(|_| DataError::InvalidValue {
        line: line_idx + 1,
        value: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn one_row_store() -> SampleStore {
        let mut store = SampleStore::new();
        store.push(SampleRow {
            evaluations: 2.0,
            elapsed_ns: 100.0,
            gc_ns: 5.0,
            bytes_allocated: 16,
            allocations: 1,
        });
        store
    }

    #[test]
    fn test_empty_store_writes_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        write_samples_csv(&path, &SampleStore::new(), CsvOptions::truncate()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec![SAMPLES_CSV_HEADER]);
    }

    #[test]
    fn test_one_row_store_writes_two_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        write_samples_csv(&path, &one_row_store(), CsvOptions::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], SAMPLES_CSV_HEADER);
        assert_eq!(lines[1], "2,100,5,16,1");
        assert!(!lines.iter().any(|l| l.ends_with(' ') || l.ends_with('\t')));
    }

    #[test]
    fn test_append_repeats_header_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        write_samples_csv(&path, &one_row_store(), CsvOptions::default()).unwrap();
        write_samples_csv(&path, &one_row_store(), CsvOptions::append()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let headers = content
            .lines()
            .filter(|l| *l == SAMPLES_CSV_HEADER)
            .count();
        assert_eq!(headers, 2);
    }

    #[test]
    fn test_headerless_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        write_samples_csv(&path, &one_row_store(), CsvOptions::default()).unwrap();
        write_samples_csv(&path, &one_row_store(), CsvOptions::append_headerless()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        let headers = content
            .lines()
            .filter(|l| *l == SAMPLES_CSV_HEADER)
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn test_samples_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let mut store = one_row_store();
        store.push(SampleRow {
            evaluations: 8.0,
            elapsed_ns: 355.5,
            gc_ns: 0.0,
            bytes_allocated: 0,
            allocations: 0,
        });
        write_samples_csv(&path, &store, CsvOptions::default()).unwrap();

        let loaded = read_samples_csv(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_read_skips_repeated_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        write_samples_csv(&path, &one_row_store(), CsvOptions::default()).unwrap();
        write_samples_csv(&path, &one_row_store(), CsvOptions::append()).unwrap();

        let loaded = read_samples_csv(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_read_rejects_bad_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        fs::write(&path, "evaluations,elapsed_time,gc_time,bytes_allocated,allocations\n1,abc,0,0,0\n").unwrap();

        match read_samples_csv(&path) {
            Err(DataError::InvalidValue { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidValue, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_read_rejects_wrong_arity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        fs::write(&path, "1,2,3\n").unwrap();

        assert!(matches!(
            read_samples_csv(&path),
            Err(DataError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_environment_csv_shape_and_nulls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("env.csv");

        let env = Environment::capture();
        write_environment_csv(&path, &env, CsvOptions::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], ENVIRONMENT_CSV_HEADER);

        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields.len(), 9);
        // Revisions were never set, so both persist as NULL.
        assert_eq!(fields[2], "NULL");
        assert_eq!(fields[3], "NULL");
    }
}
