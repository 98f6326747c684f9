use super::*;

#[test]
fn test_column_widths() {
    let rows = vec![vec!["1".to_string(), "v20240101_users.sql".to_string()]];
    assert_eq!(calculate_column_widths(&["Rank", "Filename"], &rows), vec![4, 19]);
}

#[test]
fn test_format_table() {
    let rows = vec![
        vec!["1".to_string(), "a.sql".to_string(), "Yes".to_string()],
        vec!["2".to_string(), "long_name.sql".to_string(), "No".to_string()],
    ];
    let table = format_table(&["Rank", "Filename", "Success"], &rows);
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines[0], "Rank | Filename      | Success");
    assert_eq!(lines[1], "-----+---------------+--------");
    assert_eq!(lines[2], "1    | a.sql         | Yes");
    assert_eq!(lines[3], "2    | long_name.sql | No");
}

#[test]
fn test_format_table_without_rows() {
    let table = format_table(&["Rank", "Filename"], &[]);
    assert_eq!(table.lines().count(), 2);
}
