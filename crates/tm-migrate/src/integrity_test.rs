use super::*;
use std::path::Path;

fn files(names: &[&str]) -> Vec<MigrationFile> {
    names
        .iter()
        .map(|name| MigrationFile::new(Path::new("migrations"), *name))
        .collect()
}

fn recorded(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_consistent_state_passes() {
    check_integrity(&recorded(&["a.sql"]), &files(&["a.sql", "b.sql"])).unwrap();
    check_integrity(&recorded(&[]), &files(&[])).unwrap();
}

#[test]
fn test_non_sql_file_is_rejected() {
    let err = check_integrity(&recorded(&[]), &files(&["a.sql", "notes.txt"])).unwrap_err();
    match err {
        MigrationError::InvalidExtension { filename } => assert_eq!(filename, "notes.txt"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extension_is_case_sensitive() {
    let err = check_integrity(&recorded(&[]), &files(&["A.SQL"])).unwrap_err();
    assert!(matches!(err, MigrationError::InvalidExtension { .. }));
}

#[test]
fn test_entry_without_extension_is_rejected() {
    let err = check_integrity(&recorded(&[]), &files(&["archive"])).unwrap_err();
    assert!(err.to_string().contains("archive"));
}

#[test]
fn test_missing_recorded_file_reports_smallest() {
    let err = check_integrity(
        &recorded(&["a.sql", "c.sql", "b.sql"]),
        &files(&["a.sql"]),
    )
    .unwrap_err();
    match err {
        MigrationError::MissingRecordedFile { filename } => assert_eq!(filename, "b.sql"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extension_error_wins_over_missing_file() {
    let err = check_integrity(&recorded(&["gone.sql"]), &files(&["x.txt"])).unwrap_err();
    assert!(matches!(err, MigrationError::InvalidExtension { .. }));
}

#[test]
fn test_bare_sql_filename_is_accepted() {
    check_integrity(&recorded(&[".sql"]), &files(&[".sql", "a.sql"])).unwrap();
}
