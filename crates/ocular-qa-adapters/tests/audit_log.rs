//! Integration tests for the CSV audit log.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::thread;

use ocular_qa_adapters::CsvAuditLog;
use ocular_qa_core::domain::{AuditRecord, OverallQuality};
use ocular_qa_core::ports::AuditLog;
use ocular_qa_core::StorageError;
use time::macros::datetime;

fn record(overall: OverallQuality, results: &[(&str, &str)]) -> AuditRecord {
    AuditRecord::new(
        datetime!(2024-03-05 14:07:09 UTC),
        overall,
        results
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    )
}

fn lines(log: &CsvAuditLog) -> Vec<String> {
    std::fs::read_to_string(log.path())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn test_header_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let log = CsvAuditLog::new(dir.path().join("saved_results/results_log.csv"));
    let r = record(
        OverallQuality::Good,
        &[("Eye Presence", "Yes"), ("Reflection", "Good")],
    );

    log.append(&r).unwrap();
    log.append(&r).unwrap();

    assert_eq!(
        lines(&log),
        vec![
            "timestamp,overall,Eye Presence,Reflection",
            "2024-03-05 14:07:09,Good Quality,Yes,Good",
            "2024-03-05 14:07:09,Good Quality,Yes,Good",
        ]
    );
}

#[test]
fn test_rows_follow_existing_header_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results_log.csv");
    std::fs::write(&path, "timestamp,overall,Reflection,Eye Presence\n").unwrap();
    let log = CsvAuditLog::new(&path);

    log.append(&record(
        OverallQuality::Bad,
        &[("Eye Presence", "No"), ("Reflection", "Good")],
    ))
    .unwrap();

    assert_eq!(lines(&log)[1], "2024-03-05 14:07:09,Bad Quality,Good,No");
}

#[test]
fn test_missing_columns_left_empty() {
    let dir = tempfile::tempdir().unwrap();
    let log = CsvAuditLog::new(dir.path().join("results_log.csv"));
    log.append(&record(
        OverallQuality::Good,
        &[("Eye Presence", "Yes"), ("Reflection", "Good")],
    ))
    .unwrap();

    log.append(&record(OverallQuality::Usable, &[("Reflection", "Partial")]))
        .unwrap();

    assert_eq!(lines(&log)[2], "2024-03-05 14:07:09,Usable Quality,,Partial");
}

#[test]
fn test_new_column_extends_header_and_pads_rows() {
    let dir = tempfile::tempdir().unwrap();
    let log = CsvAuditLog::new(dir.path().join("results_log.csv"));
    log.append(&record(OverallQuality::Good, &[("Reflection", "Good")]))
        .unwrap();

    log.append(&record(
        OverallQuality::Bad,
        &[("Reflection", "Good"), ("Resolution", "Bad")],
    ))
    .unwrap();

    assert_eq!(
        lines(&log),
        vec![
            "timestamp,overall,Reflection,Resolution",
            "2024-03-05 14:07:09,Good Quality,Good,",
            "2024-03-05 14:07:09,Bad Quality,Good,Bad",
        ]
    );
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(CsvAuditLog::new(dir.path().join("results_log.csv")));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for _ in 0..10 {
                    log.append(&record(
                        OverallQuality::Usable,
                        &[("Eye Presence", "Yes"), ("Reflection", "Partial")],
                    ))
                    .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = lines(&log);
    assert_eq!(lines.len(), 81);
    assert_eq!(lines[0], "timestamp,overall,Eye Presence,Reflection");
    assert!(lines[1..]
        .iter()
        .all(|l| l == "2024-03-05 14:07:09,Usable Quality,Yes,Partial"));
}

#[cfg(unix)]
#[test]
fn test_unwritable_location_is_audit_log_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"").unwrap();
    let log = CsvAuditLog::new(blocker.join("results_log.csv"));

    let err = log
        .append(&record(OverallQuality::Good, &[]))
        .unwrap_err();

    assert!(matches!(err, StorageError::AuditLog { .. }));
}

#[cfg(unix)]
#[test]
fn test_header_extension_keeps_log_permissions() {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let log = CsvAuditLog::new(dir.path().join("results_log.csv"));
    log.append(&record(OverallQuality::Good, &[("Reflection", "Good")]))
        .unwrap();
    std::fs::set_permissions(log.path(), Permissions::from_mode(0o664)).unwrap();

    log.append(&record(
        OverallQuality::Bad,
        &[("Reflection", "Good"), ("Resolution", "Bad")],
    ))
    .unwrap();

    assert_eq!(lines(&log)[0], "timestamp,overall,Reflection,Resolution");
    let mode = std::fs::metadata(log.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o664);
}
