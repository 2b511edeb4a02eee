use super::{std_fs, FixedClock, MemoryLog};
use crate::domain::{date, MinuteStamp};
use crate::usecase::ProjectUseCase;
use common::adapter::NoopLog;
use common::domain::ProjectDir;
use common::error::Error;
use serde_json::json;
use std::sync::Arc;

// 2024-01-15T10:30:45Z
const NOW_MS: u64 = 1_705_314_645_000;

fn use_case() -> ProjectUseCase {
    ProjectUseCase::new(std_fs(), Arc::new(NoopLog), Arc::new(FixedClock(NOW_MS)))
}

fn now_text() -> String {
    date::format(&MinuteStamp::from_unix_ms_local(NOW_MS).unwrap())
}

fn project(uc: &ProjectUseCase) -> (tempfile::TempDir, ProjectDir) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ProjectDir::new(tmp.path().join("proj"));
    uc.create(&dir, "proj").unwrap();
    (tmp, dir)
}

fn write_model_file(tmp: &tempfile::TempDir, file: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = tmp.path().join(file);
    std::fs::write(&path, value.to_string()).unwrap();
    path
}

#[test]
fn test_create_and_summary() {
    let uc = use_case();
    let (_tmp, dir) = project(&uc);
    let summary = uc.summary(&dir).unwrap();
    assert_eq!(summary.name, "proj");
    assert_eq!(summary.model_count, 0);
    assert_eq!(summary.latest_trained_at, None);
}

#[test]
fn test_add_model_from_file() {
    let uc = use_case();
    let (tmp, dir) = project(&uc);
    let file = write_model_file(
        &tmp,
        "m.json",
        json!({
            "Name": "svm",
            "Time": "14-01-2024 16:00",
            "Comments": "rbf kernel",
            "TrainedOn": ["set-a"],
            "XVars": ["x1", "x2"],
            "YVars": ["y"],
            "Transforms": ["pca"],
            "Pickled": {"joblib": "base64..."}
        }),
    );
    assert_eq!(uc.add_model(&dir, &file).unwrap(), "svm");

    let models = uc.models(&dir).unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].transforms(), &["pca".to_string()]);
    assert_eq!(uc.model(&dir, "svm").unwrap().comments(), "rbf kernel");
}

#[test]
fn test_add_model_fills_missing_time_with_now() {
    let uc = use_case();
    let (tmp, dir) = project(&uc);
    let file = write_model_file(
        &tmp,
        "m.json",
        json!({
            "Name": "knn",
            "Comments": "",
            "TrainedOn": [],
            "XVars": [],
            "YVars": [],
            "Transforms": [],
            "Pickled": {}
        }),
    );
    uc.add_model(&dir, &file).unwrap();
    let m = uc.model(&dir, "knn").unwrap();
    assert_eq!(date::format(&m.trained_at()), now_text());
}

#[test]
fn test_add_model_invalid_entry_leaves_project_unchanged() {
    let uc = use_case();
    let (tmp, dir) = project(&uc);
    let file = write_model_file(&tmp, "bad.json", json!({"Name": "x", "Time": "01-01-2024 00:00"}));
    let err = uc.add_model(&dir, &file).unwrap_err();
    assert_eq!(err.field_path(), Some("Comments"));
    assert!(uc.models(&dir).unwrap().is_empty());
}

#[test]
fn test_add_model_malformed_file_is_format_error() {
    let uc = use_case();
    let (tmp, dir) = project(&uc);
    let path = tmp.path().join("broken.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(uc.add_model(&dir, &path), Err(Error::Format(_))));
}

#[test]
fn test_add_model_non_utf8_file_is_format_error() {
    let uc = use_case();
    let (tmp, dir) = project(&uc);
    let path = tmp.path().join("latin1.json");
    std::fs::write(&path, b"{\"Name\": \"caf\xe9\"}").unwrap();
    assert!(matches!(uc.add_model(&dir, &path), Err(Error::Format(_))));
    assert_eq!(uc.models(&dir).unwrap().len(), 0);
}

#[test]
fn test_add_model_duplicate_name_is_rejected() {
    let uc = use_case();
    let (tmp, dir) = project(&uc);
    let entry = json!({
        "Name": "same",
        "Comments": "",
        "TrainedOn": [],
        "XVars": [],
        "YVars": [],
        "Transforms": [],
        "Pickled": {}
    });
    let file = write_model_file(&tmp, "m.json", entry);
    uc.add_model(&dir, &file).unwrap();
    assert!(matches!(uc.add_model(&dir, &file), Err(Error::AlreadyExists(_))));
    assert_eq!(uc.models(&dir).unwrap().len(), 1);
}

#[test]
fn test_flag_and_unflag() {
    let uc = use_case();
    let (tmp, dir) = project(&uc);
    let file = write_model_file(
        &tmp,
        "m.json",
        json!({
            "Name": "gbm",
            "Time": "01-01-2024 00:00",
            "Comments": "",
            "TrainedOn": [],
            "XVars": [],
            "YVars": [],
            "Transforms": [],
            "Pickled": {}
        }),
    );
    uc.add_model(&dir, &file).unwrap();

    uc.set_flag(&dir, "gbm", true).unwrap();
    assert!(uc.model(&dir, "gbm").unwrap().flagged());
    uc.set_flag(&dir, "gbm", false).unwrap();
    assert!(!uc.model(&dir, "gbm").unwrap().flagged());

    assert!(matches!(uc.set_flag(&dir, "Model-X", true), Err(Error::NotFound(_))));
    assert!(matches!(uc.model(&dir, "Model-X"), Err(Error::NotFound(_))));
}

#[test]
fn test_comments_with_explicit_and_default_time() {
    let uc = use_case();
    let (_tmp, dir) = project(&uc);
    let key = uc.add_comment(&dir, Some("02-01-2024 09:30"), "new features").unwrap();
    assert_eq!(key, "02-01-2024 09:30");
    let key = uc.add_comment(&dir, None, "retrained").unwrap();
    assert_eq!(key, now_text());

    let comments = uc.comments(&dir).unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments.contains(&("02-01-2024 09:30".to_string(), "new features".to_string())));
    assert!(comments.contains(&(now_text(), "retrained".to_string())));
}

#[test]
fn test_comment_rejects_bad_time_and_empty_text() {
    let uc = use_case();
    let (_tmp, dir) = project(&uc);
    assert!(matches!(
        uc.add_comment(&dir, Some("31-02-2024 10:00"), "x"),
        Err(Error::Format(_))
    ));
    assert!(matches!(uc.add_comment(&dir, None, "  "), Err(Error::InvalidArgument(_))));
    assert!(uc.comments(&dir).unwrap().is_empty());
}

#[test]
fn test_create_twice_is_already_exists() {
    let uc = use_case();
    let (_tmp, dir) = project(&uc);
    assert!(matches!(uc.create(&dir, "again"), Err(Error::AlreadyExists(_))));
}

#[test]
fn test_store_events_are_logged() {
    let log = Arc::new(MemoryLog::default());
    let uc = ProjectUseCase::new(std_fs(), log.clone(), Arc::new(FixedClock(NOW_MS)));
    let tmp = tempfile::tempdir().unwrap();
    let dir = ProjectDir::new(tmp.path());
    uc.create(&dir, "p").unwrap();
    uc.add_comment(&dir, None, "hello").unwrap();
    assert_eq!(
        log.messages(),
        vec!["project created", "project opened", "project saved"]
    );
}
