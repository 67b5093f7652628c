use std::fmt;
use std::ops::RangeInclusive;

use crate::layer::{write_grid, BoundingBox, Layer};
use crate::shapes::{EMPTY, SHAPE_COLS, SHAPE_ROWS};

/// Single-grid view of a layer stack: each cell holds the index of the topmost layer with
/// something on it, or [`EMPTY`] for bare ground.
///
/// Derived data: replaying the layers in order through [`FlatMap::fold`] always reproduces it.
/// Its box is the union of every folded layer's box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatMap {
    rows: usize,
    cols: usize,
    levels: Vec<i8>,
    bbox: BoundingBox,
}

impl FlatMap {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            levels: vec![EMPTY; rows * cols],
            bbox: BoundingBox::EMPTY,
        }
    }

    /// Rebuild from scratch by folding `layers` bottom-up; layer `i` is level `i`.
    pub fn from_layers(rows: usize, cols: usize, layers: &[Layer]) -> Self {
        let mut flat = Self::new(rows, cols);
        for (level, layer) in layers.iter().enumerate() {
            flat.fold(layer, level as u8);
        }
        flat
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[i8] {
        &self.levels
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    #[inline]
    pub fn level_at(&self, row: usize, col: usize) -> i8 {
        self.levels[row * self.cols + col]
    }

    #[inline]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.level_at(row, col) != EMPTY
    }

    /// Merge `layer` in as level `level`: every cell the layer covers now reports `level`.
    pub fn fold(&mut self, layer: &Layer, level: u8) {
        debug_assert_eq!(self.levels.len(), layer.cells().len());
        for (slot, &cell) in self.levels.iter_mut().zip(layer.cells()) {
            if cell != EMPTY {
                *slot = level as i8;
            }
        }
        self.bbox.union(&layer.bounding_box());
    }

    /// Top-left corners worth trying: the box grown by one shape extent on every side, clamped to
    /// the grid. Any legal placement has to stack on or touch something, so nothing outside this
    /// window can be legal. `None` when the map is empty.
    pub fn scan_window(&self) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
        if self.bbox.is_empty() || self.rows == 0 || self.cols == 0 {
            return None;
        }
        let start_row = (self.bbox.top - SHAPE_ROWS as i32).max(0) as usize;
        let start_col = (self.bbox.left - SHAPE_COLS as i32).max(0) as usize;
        let end_row = (self.bbox.bottom + SHAPE_ROWS as i32).min(self.rows as i32 - 1) as usize;
        let end_col = (self.bbox.right + SHAPE_COLS as i32).min(self.cols as i32 - 1) as usize;
        Some((start_row..=end_row, start_col..=end_col))
    }

    /// Row-major iterator over [`FlatMap::scan_window`].
    pub fn scan_coordinates(&self) -> impl Iterator<Item = (usize, usize)> {
        let (rows, cols) = self
            .scan_window()
            .unwrap_or((RangeInclusive::new(1, 0), RangeInclusive::new(1, 0)));
        rows.flat_map(move |row| cols.clone().map(move |col| (row, col)))
    }
}

impl fmt::Display for FlatMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, &self.levels, self.cols)
    }
}
