/// Cell value for "nothing placed here", shared by shapes, layers and the flat map.
pub const EMPTY: i8 = -1;

pub const SHAPE_ROWS: usize = 4;
pub const SHAPE_COLS: usize = 3;
pub const SHAPE_CELLS: usize = SHAPE_ROWS * SHAPE_COLS; // 12 entries, row-major
pub const PIECE_COUNT: usize = 10;

const E: i8 = EMPTY;

/// Rasterised 4×3 masks, one per piece id. Entry `r * SHAPE_COLS + c` is either [`EMPTY`] or the
/// piece's own id, which doubles as its display value and scoring weight.
pub static SHAPES: [[i8; SHAPE_CELLS]; PIECE_COUNT] = [
    [0, 0, 0, 0, E, 0, 0, E, 0, 0, 0, 0],
    [1, 1, E, E, 1, E, E, 1, E, E, 1, E],
    [E, 2, 2, E, 2, 2, 2, 2, E, 2, 2, 2],
    [3, 3, 3, E, E, 3, E, 3, 3, 3, 3, 3],
    [E, 4, 4, E, 4, E, 4, 4, 4, E, 4, 4],
    [5, 5, 5, 5, 5, 5, E, E, 5, 5, 5, 5],
    [6, 6, E, 6, E, E, 6, 6, 6, 6, 6, 6],
    [7, 7, 7, E, 7, E, 7, 7, E, 7, E, E],
    [E, 8, 8, E, 8, 8, 8, 8, E, 8, 8, E],
    [9, 9, 9, 9, 9, 9, 9, 9, E, 9, 9, E],
];

#[inline]
pub const fn is_piece(piece: u8) -> bool {
    (piece as usize) < PIECE_COUNT
}

/// Mask for `piece`. Callers validate the id first; see [`is_piece`].
#[inline]
pub fn shape(piece: u8) -> &'static [i8; SHAPE_CELLS] {
    &SHAPES[piece as usize]
}

/// Offsets `(dr, dc)` of the non-empty cells of `piece`, in row-major order.
pub fn piece_cells(piece: u8) -> impl Iterator<Item = (usize, usize)> {
    shape(piece)
        .iter()
        .enumerate()
        .filter(|(_, &cell)| cell != EMPTY)
        .map(|(i, _)| (i / SHAPE_COLS, i % SHAPE_COLS))
}
