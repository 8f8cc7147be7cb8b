use super::*;

use std::collections::BTreeSet;

use canvas::grid::GridModel;
use canvas::render::paint;

fn frame() -> Frame {
    let grid = GridModel::from_rows(&[vec![1, 0], vec![0, 1]], 2, 20, 20).unwrap();
    paint(&grid, 10, 1.0, &BTreeSet::new())
}

fn summary(module: Option<usize>, original_exists: bool) -> ArtifactSummary {
    ArtifactSummary {
        id: "a.json".to_owned(),
        module,
        width: module.map(|_| 40),
        height: module.map(|_| 40),
        original_exists,
        original_name: None,
        stem: None,
    }
}

fn thumb() -> CatalogThumbs {
    CatalogThumbs {
        id: "a.json".to_owned(),
        original: "http://store/api/original?file=a.json&size=96".to_owned(),
        rendered: "http://store/api/render?file=a.json&size=96".to_owned(),
    }
}

#[test]
fn render_writes_svg_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canvas.svg");
    let mut host = SvgFileHost::new(Some(path.clone()));

    host.render(&frame());

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, host.document());
    assert!(written.contains("width=\"20\""));
    assert_eq!(host.renders(), 1);
    assert!(host.take_write_error().is_none());
}

#[test]
fn write_failure_is_kept_for_the_caller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("canvas.svg");
    let mut host = SvgFileHost::new(Some(path));

    host.render(&frame());
    assert!(host.take_write_error().is_some());
    assert!(host.take_write_error().is_none());
}

#[test]
fn reference_keeps_latest_url() {
    let mut host = SvgFileHost::new(None);
    assert_eq!(host.reference(), None);
    host.show_reference("memory://original/a.json?size=256");
    host.show_reference("memory://original/b.json?size=256");
    assert_eq!(host.reference(), Some("memory://original/b.json?size=256"));
}

#[test]
fn status_clear_keeps_last_message() {
    let mut host = SvgFileHost::new(None);
    let message = StatusMessage { seq: 1, text: "saved: (0, 0) → 1".to_owned(), tone: StatusTone::Success };
    host.show_status(Some(&message));
    host.show_status(None);
    assert_eq!(host.last_status(), Some(&message));
}

#[test]
fn catalog_ignores_loading_snapshots() {
    let mut host = SvgFileHost::new(None);
    let mut catalog = CatalogState { items: vec![summary(Some(21), true)], loading: true, error: None };
    host.show_catalog(&catalog, &[thumb()]);
    assert!(host.catalog().is_empty());

    catalog.loading = false;
    host.show_catalog(&catalog, &[thumb()]);
    assert_eq!(host.catalog().len(), 1);
}

#[test]
fn summary_line_formats_entries() {
    assert_eq!(
        summary_line(&summary(Some(21), true), &thumb()),
        "a.json\tmodule=21, 40x40\thttp://store/api/original?file=a.json&size=96\thttp://store/api/render?file=a.json&size=96"
    );
    assert_eq!(
        summary_line(&summary(None, false), &thumb()),
        "a.json\tunreadable\tno orig\thttp://store/api/render?file=a.json&size=96"
    );
}
