//! Model Loading Tests
//!
//! Loads the boosted tree fixture from disk and runs requests through the
//! full engine, plus the unavailable and malformed-file paths.

use fever_triage::report::{self, ServiceStatus};
use fever_triage::{DiagnosisLabel, ModelError, ModelHandle, SeverityTier, TriageEngine, TriageResponse};

use serde_json::json;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn engine() -> TriageEngine {
    let model = ModelHandle::load(&fixture("stump_model.json")).expect("fixture model should load");
    assert!(model.is_loaded());
    TriageEngine::new(model)
}

#[test]
fn fixture_model_classifies_all_three_labels() {
    let engine = engine();

    let normal = engine.triage(&json!({})).unwrap();
    assert_eq!(normal.prediction, DiagnosisLabel::Normal);
    assert_eq!(normal.severity_level, SeverityTier::Low);

    let dengue = engine.triage(&json!({ "fever": 1, "eye_pain": 1 })).unwrap();
    assert_eq!(dengue.prediction, DiagnosisLabel::Dengue);
    assert_eq!(dengue.severity_level, SeverityTier::Medium);

    let malaria = engine.triage(&json!({ "fever": 1 })).unwrap();
    assert_eq!(malaria.prediction, DiagnosisLabel::Malaria);
    assert_eq!(malaria.severity_level, SeverityTier::Medium);
}

#[test]
fn fixture_breakdown_sums_to_one_hundred() {
    let result = engine().triage(&json!({ "fever": 1, "eye_pain": 1 })).unwrap();
    let b = result.disease_breakdown;
    assert!((b.dengue + b.malaria + b.normal - 100.0).abs() < 0.05, "{b:?}");
    assert_eq!(result.probability, b.dengue);
}

#[test]
fn status_reports_loaded_model() {
    let status = ServiceStatus::of(engine().model());
    assert_eq!(
        serde_json::to_value(&status).unwrap(),
        json!({ "status": "online", "model_loaded": true, "model": "boosted-trees" })
    );
}

#[test]
fn missing_model_file_is_unavailable_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelHandle::load(&dir.path().join("absent.json")).unwrap();
    assert!(!model.is_loaded());

    let resp = report::handle_raw(&TriageEngine::new(model), "{}");
    assert_eq!(resp.status(), 503);
}

#[test]
fn malformed_model_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"num_class\": 3, ").unwrap();
    let err = ModelHandle::load(&path).unwrap_err();
    assert!(matches!(err, ModelError::Parse { .. }), "{err}");
}

#[test]
fn structurally_invalid_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.json");
    std::fs::write(
        &path,
        r#"{ "num_class": 4, "num_features": 9, "trees": [] }"#,
    )
    .unwrap();
    let err = ModelHandle::load(&path).unwrap_err();
    assert!(matches!(err, ModelError::Invalid(_)), "{err}");
    assert!(err.to_string().contains("num_class"), "{err}");
}

#[test]
fn batch_over_fixture_preserves_order() {
    let engine = engine();
    let bodies: Vec<String> = [json!({}), json!({ "fever": 1 }), json!({ "fever": 1, "eye_pain": 1 })]
        .iter()
        .map(ToString::to_string)
        .collect();
    let labels: Vec<u8> = report::handle_batch(&engine, &bodies)
        .into_iter()
        .map(|r| match r {
            TriageResponse::Success(t) => t.prediction.class_index(),
            TriageResponse::Failure(f) => panic!("unexpected failure {:?}", f.error),
        })
        .collect();
    assert_eq!(labels, vec![0, 2, 1]);
}
