//! Legality rules for dropping a shape onto a [`FlatMap`].
//!
//! A placement is legal when the 4×3 footprint fits on the grid, every non-empty cell of the shape
//! rests on the same level (bare ground counts as level −1), and, for ground placements only, at
//! least one non-empty cell sits orthogonally next to something already placed.

use crate::flat::FlatMap;
use crate::shapes::{piece_cells, EMPTY, SHAPE_COLS, SHAPE_ROWS};

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[inline]
pub fn fits_in_bounds(rows: usize, cols: usize, row: usize, col: usize) -> bool {
    row + SHAPE_ROWS <= rows && col + SHAPE_COLS <= cols
}

/// Shared flat-map value under every non-empty cell of `piece` at `(row, col)`, or `None` when the
/// shape would straddle two levels. Assumes the footprint is in bounds.
pub fn underlying_level(flat: &FlatMap, piece: u8, row: usize, col: usize) -> Option<i8> {
    let mut cells = piece_cells(piece).map(|(dr, dc)| flat.level_at(row + dr, col + dc));
    let first = cells.next().unwrap_or(EMPTY);
    cells.all(|level| level == first).then_some(first)
}

/// Whether any non-empty cell of `piece` at `(row, col)` has an occupied up/down/left/right
/// neighbour.
pub fn touches_occupied(flat: &FlatMap, piece: u8, row: usize, col: usize) -> bool {
    let (rows, cols) = (flat.rows() as isize, flat.cols() as isize);
    piece_cells(piece).any(|(dr, dc)| {
        let (r, c) = ((row + dr) as isize, (col + dc) as isize);
        NEIGHBOURS.iter().any(|&(nr, nc)| {
            let (r, c) = (r + nr, c + nc);
            (0..rows).contains(&r) && (0..cols).contains(&c) && flat.is_occupied(r as usize, c as usize)
        })
    })
}

/// Level `piece` would land on at `(row, col)`, or `None` if the placement is illegal.
pub fn placement_level(flat: &FlatMap, piece: u8, row: usize, col: usize) -> Option<u8> {
    if !fits_in_bounds(flat.rows(), flat.cols(), row, col) {
        return None;
    }
    let level = (underlying_level(flat, piece, row, col)? + 1) as u8;
    if level == 0 && !touches_occupied(flat, piece, row, col) {
        return None;
    }
    Some(level)
}
