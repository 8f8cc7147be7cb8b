//! Built-in artifacts for `--demo`, so the editor can run without a store.

#[cfg(test)]
#[path = "demo_test.rs"]
mod demo_test;

use canvas::grid::{GridError, GridModel};
use client::net::memory::MemoryStore;

const VERSION1_MODULES: usize = 21;
const FINDER_MODULES: usize = 7;
const DEMO_PIXELS_PER_MODULE: u32 = 10;

/// A store holding a blank version-1 symbol (finder patterns and timing
/// lines only), a 3x3 checkerboard and one unreadable entry.
#[must_use]
pub fn demo_store() -> MemoryStore {
    let mut store = MemoryStore::new().with_unreadable("corrupt.json");
    if let Ok(grid) = version1_skeleton() {
        store = store.with_artifact("version1.json", grid, false);
    }
    if let Ok(grid) = checkerboard(3) {
        store = store.with_artifact("3.json", grid, true);
    }
    store
}

/// 21x21 matrix with the three finder patterns and both timing patterns.
///
/// # Errors
///
/// Never in practice; the matrix is built with the declared shape.
pub fn version1_skeleton() -> Result<GridModel, GridError> {
    let n = VERSION1_MODULES;
    let mut rows = vec![vec![0_u8; n]; n];

    for (ox, oy) in [(0, 0), (n - FINDER_MODULES, 0), (0, n - FINDER_MODULES)] {
        for dy in 0..FINDER_MODULES {
            for dx in 0..FINDER_MODULES {
                let ring = dx.min(dy).min(FINDER_MODULES - 1 - dx).min(FINDER_MODULES - 1 - dy);
                rows[oy + dy][ox + dx] = u8::from(ring != 1);
            }
        }
    }
    for i in (FINDER_MODULES + 1)..(n - FINDER_MODULES - 1) {
        let dark = u8::from(i % 2 == 0);
        rows[FINDER_MODULES - 1][i] = dark;
        rows[i][FINDER_MODULES - 1] = dark;
    }

    let side = module_px(n);
    GridModel::from_rows(&rows, n, side, side)
}

/// `n`x`n` alternating pattern with a dark top-left cell.
///
/// # Errors
///
/// `Shape` when `n` is zero.
pub fn checkerboard(n: usize) -> Result<GridModel, GridError> {
    let rows: Vec<Vec<u8>> = (0..n).map(|y| (0..n).map(|x| u8::from((x + y) % 2 == 0)).collect()).collect();
    let side = module_px(n);
    GridModel::from_rows(&rows, n, side, side)
}

fn module_px(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX).saturating_mul(DEMO_PIXELS_PER_MODULE)
}
