use super::*;
use chrono::NaiveDate;

fn sample_ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_micro_opt(3, 4, 5, 678_901)
        .unwrap()
}

#[test]
fn test_lenient_bool() {
    assert_eq!(SqlValue::Boolean(true).as_bool(), Some(true));
    assert_eq!(SqlValue::Integer(0).as_bool(), Some(false));
    assert_eq!(SqlValue::Integer(1).as_bool(), Some(true));
    assert_eq!(SqlValue::Text("true".into()).as_bool(), None);
}

#[test]
fn test_datetime_from_text() {
    let ts = sample_ts();
    let text = SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string());
    assert_eq!(text.as_datetime(), Some(ts));

    let whole_seconds = SqlValue::Text("2024-01-02 03:04:05".into());
    assert_eq!(
        whole_seconds.as_datetime(),
        Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap())
    );

    let iso = SqlValue::Text("2024-01-02T03:04:05.678901".into());
    assert_eq!(iso.as_datetime(), Some(ts));

    assert_eq!(SqlValue::Text("yesterday".into()).as_datetime(), None);
}

#[test]
fn test_row_accessors() {
    let row = Row::new(vec![
        SqlValue::Integer(7),
        SqlValue::Text("a.sql".into()),
        SqlValue::Timestamp(sample_ts()),
        SqlValue::Integer(12),
        SqlValue::Boolean(false),
    ]);
    assert_eq!(row.len(), 5);
    assert_eq!(row.get_i64(0).unwrap(), 7);
    assert_eq!(row.get_string(1).unwrap(), "a.sql");
    assert_eq!(row.get_datetime(2).unwrap(), sample_ts());
    assert!(!row.get_bool(4).unwrap());
    assert!(row.get(9).is_null());
}

#[test]
fn test_row_decode_error() {
    let row = Row::new(vec![SqlValue::Text("abc".into())]);
    let err = row.get_i64(0).unwrap_err();
    assert!(matches!(err, DbError::Decode { column: 0, expected: "INTEGER", .. }));
    assert!(err.to_string().contains("TEXT 'abc'"));

    let err = row.get_string(3).unwrap_err();
    assert!(err.to_string().contains("found NULL"));
}
