use super::*;

// =============================================================
// ArtifactSummary
// =============================================================

#[test]
fn summary_reads_store_field_names() {
    let json = serde_json::json!({
        "json": "12.json",
        "module": 25,
        "width": 250,
        "height": 250,
        "original_exists": true,
        "original_name": "12.png",
        "stem": "12",
    });
    let summary: ArtifactSummary = serde_json::from_value(json).unwrap();
    assert_eq!(summary.id, "12.json");
    assert_eq!(summary.module, Some(25));
    assert_eq!(summary.original_name.as_deref(), Some("12.png"));
    assert_eq!(summary.artifact_ref(), ArtifactRef { id: "12.json".to_owned(), original_exists: true });
}

#[test]
fn summary_accepts_unreadable_entry() {
    let json = serde_json::json!({
        "json": "broken.json",
        "module": null,
        "width": null,
        "height": null,
        "original_exists": false,
        "original_name": null,
        "stem": "broken",
    });
    let summary: ArtifactSummary = serde_json::from_value(json).unwrap();
    assert_eq!(summary.module, None);
    assert!(!summary.original_exists);
}

#[test]
fn summary_defaults_missing_optional_fields() {
    let summary: ArtifactSummary = serde_json::from_str(r#"{"json":"a.json"}"#).unwrap();
    assert!(!summary.original_exists);
    assert_eq!(summary.stem, None);
}

// =============================================================
// LoadResponse
// =============================================================

#[test]
fn load_response_parses_artifact() {
    let body = r#"{"file":"3.png","module":2,"width":20,"height":20,"vector":[[0,1],[1,0]]}"#;
    let parsed: LoadResponse = serde_json::from_str(body).unwrap();
    let LoadResponse::Artifact(data) = parsed else {
        panic!("expected artifact");
    };
    assert_eq!(data.vector, vec![vec![0, 1], vec![1, 0]]);
    assert_eq!(data.file.as_deref(), Some("3.png"));
    let grid = data.to_grid().unwrap();
    assert_eq!(grid.get(1, 0).unwrap(), 1);
}

#[test]
fn load_response_parses_error_payload() {
    let parsed: LoadResponse = serde_json::from_str(r#"{"error":"not found"}"#).unwrap();
    assert_eq!(parsed, LoadResponse::Error { error: "not found".to_owned() });
}

#[test]
fn cells_accept_bools_and_integral_floats() {
    let body = r#"{"module":2,"width":2,"height":2,"vector":[[true,false],[1.0,0]]}"#;
    let data: ArtifactData = serde_json::from_str(body).unwrap();
    assert_eq!(data.vector, vec![vec![1, 0], vec![1, 0]]);
}

#[test]
fn cells_reject_fractional_and_negative_values() {
    for bad in ["0.5", "-1", "\"1\"", "300"] {
        let body = format!(r#"{{"module":1,"width":1,"height":1,"vector":[[{bad}]]}}"#);
        assert!(serde_json::from_str::<ArtifactData>(&body).is_err(), "accepted {bad}");
    }
}

#[test]
fn out_of_range_binary_value_fails_grid_validation() {
    let body = r#"{"module":1,"width":1,"height":1,"vector":[[2]]}"#;
    let data: ArtifactData = serde_json::from_str(body).unwrap();
    assert!(matches!(data.to_grid(), Err(GridError::InvalidValue { value: 2, .. })));
}

#[test]
fn non_square_matrix_fails_grid_validation() {
    let body = r#"{"module":3,"width":1,"height":1,"vector":[[0,0,0],[0,0,0]]}"#;
    let data: ArtifactData = serde_json::from_str(body).unwrap();
    assert!(matches!(data.to_grid(), Err(GridError::Shape { module: 3, .. })));
}

// =============================================================
// Requests / responses
// =============================================================

#[test]
fn toggle_request_uses_gx_gy() {
    let body = serde_json::to_value(ToggleRequest { file: "a.json", gx: 4, gy: 9 }).unwrap();
    assert_eq!(body, serde_json::json!({"file": "a.json", "gx": 4, "gy": 9}));
}

#[test]
fn toggle_response_without_ok_is_failure() {
    let parsed: ToggleResponse = serde_json::from_str(r#"{"error":"index out of range"}"#).unwrap();
    assert!(!parsed.ok);
    assert_eq!(parsed.value, None);
    assert_eq!(parsed.error.as_deref(), Some("index out of range"));
}

#[test]
fn save_request_mirrors_grid() {
    let grid = GridModel::from_rows(&[vec![1, 0], vec![0, 0]], 2, 40, 30).unwrap();
    let body = serde_json::to_value(SaveRequest::from_grid("a.json", &grid)).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"file":"a.json","vector":[[1,0],[0,0]],"module":2,"width":40,"height":30})
    );
}

#[test]
fn export_request_omits_missing_out_name() {
    let body = serde_json::to_value(ExportRequest { file: "a.json", out_name: None }).unwrap();
    assert_eq!(body, serde_json::json!({"file": "a.json"}));
}
