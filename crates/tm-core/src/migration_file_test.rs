use super::*;

#[test]
fn test_split_statements_trims_and_drops_empty() {
    let sql = "CREATE TABLE a (id INT);\n\n  INSERT INTO a VALUES (1) ;\n;  ;\n";
    assert_eq!(
        split_statements(sql),
        vec!["CREATE TABLE a (id INT)", "INSERT INTO a VALUES (1)"]
    );
}

#[test]
fn test_split_statements_without_trailing_semicolon() {
    assert_eq!(split_statements("SELECT 1"), vec!["SELECT 1"]);
    assert!(split_statements("  \n\t ").is_empty());
    assert!(split_statements("").is_empty());
}

#[test]
fn test_has_sql_extension() {
    let dir = Path::new("/tmp");
    assert!(MigrationFile::new(dir, "v1_init.sql").has_sql_extension());
    assert!(!MigrationFile::new(dir, "v1_init.SQL").has_sql_extension());
    assert!(!MigrationFile::new(dir, "README.md").has_sql_extension());
    assert!(!MigrationFile::new(dir, "notes").has_sql_extension());
    assert!(!MigrationFile::new(dir, "archive.sql.bak").has_sql_extension());
    assert!(!MigrationFile::new(dir, "mysql").has_sql_extension());
}

#[test]
fn test_bare_sql_name_has_sql_extension() {
    let dir = Path::new("migrations");
    assert!(MigrationFile::new(dir, ".sql").has_sql_extension());
    assert!(MigrationFile::new(dir, "a..sql").has_sql_extension());
}

#[test]
fn test_list_files_sorted_lexicographically() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["v10_c.sql", "v2_b.sql", "v1_a.sql", "README.md"] {
        std::fs::write(dir.path().join(name), "SELECT 1;").unwrap();
    }

    let files = list_files(dir.path()).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    // Byte order, not numeric order
    assert_eq!(names, vec!["README.md", "v10_c.sql", "v1_a.sql", "v2_b.sql"]);
    assert_eq!(files[1].path, dir.path().join("v10_c.sql"));
}

#[test]
fn test_list_files_includes_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("archive")).unwrap();
    std::fs::write(dir.path().join("a.sql"), "").unwrap();

    let files = list_files(dir.path()).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.sql", "archive"]);
}

#[test]
fn test_list_files_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = list_files(&missing).unwrap_err();
    assert!(matches!(err, CoreError::MigrationsDirUnreadable { .. }));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn test_read_statements() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("a.sql"),
        "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\n",
    )
    .unwrap();

    let file = MigrationFile::new(dir.path(), "a.sql");
    assert_eq!(
        file.read_statements().unwrap(),
        vec!["CREATE TABLE t (id INT)", "INSERT INTO t VALUES (1)"]
    );

    let gone = MigrationFile::new(dir.path(), "gone.sql");
    assert!(matches!(
        gone.read_statements().unwrap_err(),
        CoreError::IoWithPath { .. }
    ));
}
