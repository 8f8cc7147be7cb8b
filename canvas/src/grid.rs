//! Grid model: the square module matrix for the active artifact.
//!
//! `GridModel` stores cells row-major in a flat buffer. Row index is `y`,
//! column index is `x`, both zero-based. Every cell is `0` (light) or `1`
//! (dark); the constructors and [`GridModel::set`] reject anything else, so
//! readers never need to re-validate.
//!
//! The model has no side effects: it never renders or talks to the network.
//! Callers decide when a mutation is authoritative.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

/// Zero-based cell coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Contract violations reported by [`GridModel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The supplied matrix is not square with the declared side length.
    #[error("matrix is not {module}x{module}: {detail}")]
    Shape { module: usize, detail: String },
    /// A coordinate fell outside `[0, module)`.
    #[error("cell ({x}, {y}) is outside a {module}x{module} grid")]
    OutOfBounds { x: usize, y: usize, module: usize },
    /// A cell value other than 0 or 1.
    #[error("invalid value {value} at ({x}, {y}); expected 0 or 1")]
    InvalidValue { x: usize, y: usize, value: u8 },
}

/// Authoritative module matrix plus the pixel size of the source bitmap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridModel {
    module: usize,
    width_px: u32,
    height_px: u32,
    cells: Vec<u8>,
}

impl GridModel {
    /// An empty grid (no modules). Use [`GridModel::from_rows`] or
    /// [`GridModel::replace`] to load a matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from rows, validating shape and values.
    ///
    /// # Errors
    ///
    /// `Shape` if `module` is zero or `rows` is not `module` rows of
    /// `module` cells; `InvalidValue` if any cell is not 0 or 1.
    pub fn from_rows(rows: &[Vec<u8>], module: usize, width_px: u32, height_px: u32) -> Result<Self, GridError> {
        if module == 0 {
            return Err(GridError::Shape { module, detail: "module count must be at least 1".to_owned() });
        }
        if rows.len() != module {
            return Err(GridError::Shape { module, detail: format!("found {} rows", rows.len()) });
        }

        let mut cells = Vec::with_capacity(module * module);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != module {
                return Err(GridError::Shape { module, detail: format!("row {y} has {} cells", row.len()) });
            }
            for (x, &value) in row.iter().enumerate() {
                check_value(x, y, value)?;
                cells.push(value);
            }
        }

        Ok(Self { module, width_px, height_px, cells })
    }

    /// Swap in a whole new matrix. On error the current contents are kept.
    ///
    /// # Errors
    ///
    /// Same as [`GridModel::from_rows`].
    pub fn replace(&mut self, rows: &[Vec<u8>], module: usize, width_px: u32, height_px: u32) -> Result<(), GridError> {
        *self = Self::from_rows(rows, module, width_px, height_px)?;
        Ok(())
    }

    /// Read one cell.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `x` or `y` is not in `[0, module)`.
    pub fn get(&self, x: usize, y: usize) -> Result<u8, GridError> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx])
    }

    /// Overwrite one cell.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for a bad coordinate, `InvalidValue` if `value` is not 0 or 1.
    pub fn set(&mut self, x: usize, y: usize, value: u8) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        check_value(x, y, value)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Side length in modules. Zero for an empty grid.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.module
    }

    /// Width of the source bitmap in pixels.
    #[must_use]
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Height of the source bitmap in pixels.
    #[must_use]
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.module == 0
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks(0) is not allowed; an empty grid simply has no rows.
        self.cells.chunks(self.module.max(1))
    }

    /// Owned copy of the rows, in the shape the store expects on the wire.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }

    /// Every cell with its value, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, u8)> + '_ {
        let module = self.module.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (Cell::new(i % module, i / module), v))
    }

    /// Number of dark modules.
    #[must_use]
    pub fn dark_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 1).count()
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.module || y >= self.module {
            return Err(GridError::OutOfBounds { x, y, module: self.module });
        }
        Ok(y * self.module + x)
    }
}

fn check_value(x: usize, y: usize, value: u8) -> Result<(), GridError> {
    if value > 1 {
        return Err(GridError::InvalidValue { x, y, value });
    }
    Ok(())
}
