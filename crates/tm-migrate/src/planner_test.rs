use super::*;
use std::path::Path;

fn files(names: &[&str]) -> Vec<MigrationFile> {
    names
        .iter()
        .map(|name| MigrationFile::new(Path::new("m"), *name))
        .collect()
}

fn recorded(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn states(plan: &MigrationPlan) -> Vec<(&str, FileState)> {
    plan.files
        .iter()
        .map(|p| (p.file.filename.as_str(), p.state))
        .collect()
}

#[test]
fn test_fresh_history_runs_everything() {
    let plan = build_plan(
        files(&["a.sql", "b.sql"]),
        &recorded(&[]),
        &ResumePoint::default(),
    );
    assert_eq!(plan.start_rank, 0);
    assert_eq!(plan.pending_count(), 2);
    assert!(!plan.is_up_to_date());
}

#[test]
fn test_recorded_files_are_skipped() {
    let resume = ResumePoint {
        start_rank: 2,
        last_successful: Some("b.sql".into()),
        blocked: false,
    };
    let plan = build_plan(
        files(&["a.sql", "b.sql", "c.sql"]),
        &recorded(&["a.sql", "b.sql"]),
        &resume,
    );
    assert_eq!(
        states(&plan),
        vec![
            ("a.sql", FileState::AlreadyRecorded),
            ("b.sql", FileState::AlreadyRecorded),
            ("c.sql", FileState::Pending),
        ]
    );
    assert_eq!(plan.start_rank, 2);
}

#[test]
fn test_unrecorded_file_before_resume_point_is_not_run() {
    let resume = ResumePoint {
        start_rank: 2,
        last_successful: Some("c.sql".into()),
        blocked: false,
    };
    let plan = build_plan(
        files(&["a.sql", "b.sql", "c.sql", "d.sql"]),
        &recorded(&["a.sql", "c.sql"]),
        &resume,
    );
    assert_eq!(
        states(&plan),
        vec![
            ("a.sql", FileState::AlreadyRecorded),
            ("b.sql", FileState::BeforeResumePoint),
            ("c.sql", FileState::AlreadyRecorded),
            ("d.sql", FileState::Pending),
        ]
    );
    let pending: Vec<_> = plan.pending().map(|f| f.filename.as_str()).collect();
    assert_eq!(pending, vec!["d.sql"]);
}

#[test]
fn test_up_to_date() {
    let resume = ResumePoint {
        start_rank: 1,
        last_successful: Some("a.sql".into()),
        blocked: false,
    };
    let plan = build_plan(files(&["a.sql"]), &recorded(&["a.sql"]), &resume);
    assert!(plan.is_up_to_date());
}

#[test]
fn test_is_past_is_strict() {
    let resume = ResumePoint {
        start_rank: 1,
        last_successful: Some("v2.sql".into()),
        blocked: false,
    };
    assert!(!resume.is_past("v1.sql"));
    assert!(!resume.is_past("v2.sql"));
    assert!(resume.is_past("v3.sql"));
    assert!(ResumePoint::default().is_past(""));
}
