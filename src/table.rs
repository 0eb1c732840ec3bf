//! Rectangular view over the element arena

use bstr::ByteSlice;

use crate::arena::Arena;
use crate::error::Result;

/// A loaded table: `rows x cols` fixed-width elements in row-major order
#[derive(Debug)]
pub struct Table {
    arena: Arena,
    rows: usize,
    cols: usize,
    overruns: usize,
}

impl Table {
    /// Build a table from elements appended row by row
    ///
    /// `row_lengths[r]` is the number of elements row `r` contributed.
    /// Rows shorter than the widest row are padded with empty elements.
    ///
    /// # Panics
    ///
    /// Panics if `row_lengths` does not sum to `arena.len()`.
    pub fn from_rows(mut arena: Arena, row_lengths: &[usize], overruns: usize) -> Result<Self> {
        let cols = row_lengths.iter().copied().max().unwrap_or(0);
        arena.pad_rows(row_lengths, cols)?;
        Ok(Table {
            arena,
            rows: row_lengths.len(),
            cols,
            overruns,
        })
    }

    /// Get the raw element at (row, col)
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()` or `col >= self.cols()`.
    pub fn get(&self, row: usize, col: usize) -> &[u8] {
        assert!(row < self.rows && col < self.cols, "cell [{row},{col}] outside {}x{}", self.rows, self.cols);
        self.arena.get(row * self.cols + col)
    }

    /// Get the text of the element at (row, col), up to its first NUL
    pub fn text(&self, row: usize, col: usize) -> &[u8] {
        element_text(self.get(row, col))
    }

    /// Get number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get number of columns, the widest row seen
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of fields that were truncated while loading
    pub fn overruns(&self) -> usize {
        self.overruns
    }

    /// Get number of elements stored, padding included
    pub fn element_count(&self) -> usize {
        self.arena.len()
    }

    /// Get number of element slots granted
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Get total bytes requested for the element store
    pub fn bytes_allocated(&self) -> usize {
        self.arena.bytes_allocated()
    }

    /// Check if the table has no cells to write
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// Content of a fixed-width element: everything before the first NUL
pub fn element_text(element: &[u8]) -> &[u8] {
    match element.find_byte(0) {
        Some(end) => &element[..end],
        None => element,
    }
}
