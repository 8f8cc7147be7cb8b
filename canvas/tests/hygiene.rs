//! Hygiene: scans the canvas crate's production sources for antipatterns.
//!
//! Painter, mapper and grid code must never crash the host page or print to
//! stdout, so each pattern below has a budget of zero. Test files
//! (`*_test.rs`) are exempt.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Assert that `pattern` appears on at most `max` lines across the sources.
fn assert_budget(pattern: &str, max: usize) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");

    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let count: usize = hits.iter().map(|(_, n)| n).sum();
    let listing = hits
        .iter()
        .map(|(path, n)| format!("  {path}: {n}"))
        .collect::<Vec<_>>()
        .join("\n");

    assert!(count <= max, "`{pattern}` budget exceeded: found {count}, max {max}.\n{listing}");
}

macro_rules! budget {
    ($name:ident, $pattern:expr, $max:expr) => {
        #[test]
        fn $name() {
            assert_budget($pattern, $max);
        }
    };
}

// Panics.
budget!(unwrap_budget, ".unwrap()", 0);
budget!(expect_budget, ".expect(", 0);
budget!(panic_budget, "panic!(", 0);
budget!(unreachable_budget, "unreachable!(", 0);
budget!(todo_budget, "todo!(", 0);
budget!(unimplemented_budget, "unimplemented!(", 0);

// Silent loss.
budget!(silent_discard_budget, "let _ =", 0);
budget!(dot_ok_budget, ".ok()", 0);

// Output belongs to the host, not the painter.
budget!(println_budget, "println!(", 0);
budget!(eprintln_budget, "eprintln!(", 0);

// Structure.
budget!(allow_dead_code_budget, "#[allow(dead_code)]", 0);
