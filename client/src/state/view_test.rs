use super::*;

#[test]
fn defaults() {
    let view = ViewState::new();
    assert_eq!(view.zoom(), ZOOM_DEFAULT);
    assert!((view.device_pixel_ratio() - 1.0).abs() < f64::EPSILON);
    assert!(view.selected().is_none());
}

#[test]
fn zoom_is_clamped() {
    let mut view = ViewState::new();
    assert_eq!(view.set_zoom(0), ZOOM_MIN);
    assert_eq!(view.set_zoom(500), ZOOM_MAX);
    assert_eq!(view.set_zoom(20), 20);
}

#[test]
fn bad_dpr_becomes_one() {
    let mut view = ViewState::new();
    assert!((view.set_device_pixel_ratio(2.0) - 2.0).abs() < f64::EPSILON);
    assert!((view.set_device_pixel_ratio(f64::NAN) - 1.0).abs() < f64::EPSILON);
    assert!((view.set_device_pixel_ratio(-3.0) - 1.0).abs() < f64::EPSILON);
}

#[test]
fn reference_size_follows_panel_width() {
    let mut view = ViewState::new();
    assert_eq!(view.reference_size(), 256);
    view.set_panel_width(424.7);
    assert_eq!(view.reference_size(), 400);
    view.set_panel_width(f64::INFINITY);
    assert_eq!(view.reference_size(), 256);
}

#[test]
fn refresh_original_exists_only_touches_selected() {
    let mut view = ViewState::new();
    assert!(!view.refresh_original_exists("a.json", true));

    view.select(ArtifactRef { id: "a.json".to_owned(), original_exists: false });
    assert!(!view.refresh_original_exists("b.json", true));
    assert!(!view.refresh_original_exists("a.json", false));
    assert!(view.refresh_original_exists("a.json", true));
    assert!(view.selected().is_some_and(|s| s.original_exists));
}
