use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shapes::{shape, EMPTY, SHAPE_COLS, SHAPE_ROWS};

/// Tightest rectangle (inclusive corners) around everything written so far.
///
/// A fresh box is "inverted" (`top`/`left` at `i32::MAX`, `bottom`/`right` at `i32::MIN`) so it
/// never contains a real cell and the first `include` collapses it onto the written area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        top: i32::MAX,
        left: i32::MAX,
        bottom: i32::MIN,
        right: i32::MIN,
    };

    pub fn is_empty(&self) -> bool {
        self.top > self.bottom || self.left > self.right
    }

    /// Grow the box to cover the rectangle `(top, left)..=(bottom, right)`.
    pub fn include(&mut self, top: i32, left: i32, bottom: i32, right: i32) {
        self.top = self.top.min(top);
        self.left = self.left.min(left);
        self.bottom = self.bottom.max(bottom);
        self.right = self.right.max(right);
    }

    pub fn union(&mut self, other: &BoundingBox) {
        self.include(other.top, other.left, other.bottom, other.right);
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        let (row, col) = (row as i32, col as i32);
        (self.top..=self.bottom).contains(&row) && (self.left..=self.right).contains(&col)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One stacking level: an R×C buffer of piece ids ([`EMPTY`] where nothing sits on this level).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    rows: usize,
    cols: usize,
    cells: Vec<i8>,
    bbox: BoundingBox,
}

impl Layer {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![EMPTY; rows * cols],
            bbox: BoundingBox::EMPTY,
        }
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.cells[self.idx(row, col)]
    }

    pub fn is_empty(&self) -> bool {
        self.bbox.is_empty()
    }

    /// Stamp the non-empty cells of `piece` with its top-left corner at `(row, col)`.
    ///
    /// Empty mask cells leave whatever is already underneath untouched. The bounding box grows by
    /// the full 4×3 footprint, holes included. The footprint must fit inside the layer.
    pub fn put_shape(&mut self, piece: u8, row: usize, col: usize) {
        debug_assert!(row + SHAPE_ROWS <= self.rows && col + SHAPE_COLS <= self.cols);
        let mask = shape(piece);
        for dr in 0..SHAPE_ROWS {
            for dc in 0..SHAPE_COLS {
                let value = mask[dr * SHAPE_COLS + dc];
                if value != EMPTY {
                    let index = self.idx(row + dr, col + dc);
                    self.cells[index] = value;
                }
            }
        }
        self.bbox.include(
            row as i32,
            col as i32,
            (row + SHAPE_ROWS - 1) as i32,
            (col + SHAPE_COLS - 1) as i32,
        );
    }

    /// Copy every non-empty cell of `upper` on top of `self` and merge the boxes.
    pub fn overlay(&mut self, upper: &Layer) {
        debug_assert_eq!(self.cells.len(), upper.cells.len());
        for (below, &above) in self.cells.iter_mut().zip(upper.cells.iter()) {
            if above != EMPTY {
                *below = above;
            }
        }
        self.bbox.union(&upper.bbox);
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, &self.cells, self.cols)
    }
}

/// Shared text form: one line per row, digits for values and `.` for [`EMPTY`].
pub(crate) fn write_grid(f: &mut fmt::Formatter<'_>, cells: &[i8], cols: usize) -> fmt::Result {
    for row in cells.chunks(cols.max(1)) {
        for &cell in row {
            if cell == EMPTY {
                f.write_str(".")?;
            } else {
                write!(f, "{cell}")?;
            }
        }
        writeln!(f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_layer_is_all_empty() {
        let layer = Layer::new(10, 10);
        assert!(layer.cells().iter().all(|&cell| cell == EMPTY));
        assert!(layer.is_empty());
        assert!(!layer.bounding_box().contains(0, 0));
    }

    #[test]
    fn put_shape_writes_mask() {
        let mut layer = Layer::new(4, 5);
        layer.put_shape(0, 0, 1);
        #[rustfmt::skip]
        let want: Vec<i8> = vec![
            -1, 0, 0, 0, -1,
            -1, 0, -1, 0, -1,
            -1, 0, -1, 0, -1,
            -1, 0, 0, 0, -1,
        ];
        assert_eq!(layer.cells(), want.as_slice(), "got:\n{layer}");
    }

    #[test]
    fn put_shape_skips_empty_mask_cells() {
        let mut layer = Layer::new(4, 5);
        layer.put_shape(2, 0, 0);
        layer.put_shape(4, 0, 2);
        #[rustfmt::skip]
        let want: Vec<i8> = vec![
            -1, 2, 2, 4, 4,
            -1, 2, 2, 4, -1,
            2, 2, 4, 4, 4,
            2, 2, 2, 4, 4,
        ];
        assert_eq!(layer.cells(), want.as_slice(), "got:\n{layer}");
    }

    #[test]
    fn bounding_box_tracks_footprints() {
        let mut layer = Layer::new(12, 10);
        layer.put_shape(2, 2, 2);
        assert_eq!(
            layer.bounding_box(),
            BoundingBox { top: 2, left: 2, bottom: 5, right: 4 }
        );
        layer.put_shape(4, 2, 4);
        assert_eq!(
            layer.bounding_box(),
            BoundingBox { top: 2, left: 2, bottom: 5, right: 6 }
        );
    }

    #[test]
    fn overlay_keeps_lower_cells_under_holes() {
        let mut lower = Layer::new(4, 3);
        lower.put_shape(9, 0, 0);
        let mut upper = Layer::new(4, 3);
        upper.put_shape(0, 0, 0);
        lower.overlay(&upper);
        assert_eq!(lower.get(0, 0), 0);
        assert_eq!(lower.get(1, 1), 9);
        assert_eq!(lower.get(2, 1), 9);
        assert_eq!(lower.get(2, 2), 0);
    }

    #[test]
    fn display_uses_dots_for_empty() {
        let mut layer = Layer::new(4, 4);
        layer.put_shape(1, 0, 1);
        assert_eq!(layer.to_string(), ".11.\n..1.\n..1.\n..1.\n");
    }
}
