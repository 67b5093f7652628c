#![deny(clippy::unwrap_used)]
//! WebAssembly bindings for an NMBR 9 placement engine: ten digit-shaped pieces stacked on a
//! layered grid, and a bounded lookahead search that picks where each new piece should go.
//!
//! The crate exposes two high-level building blocks:
//!
//! * [`Board`] – the layer stack, its derived [`FlatMap`] (topmost level per cell) and the
//!   per-piece placement counters. [`Board::apply_best_move`] is the only mutation; everything
//!   the search explores happens on scratch copies.
//! * [`NumbersBoard`] – a `wasm-bindgen` wrapper around [`Board`] for a JavaScript front end that
//!   reads piece ids, asks for the best move and renders the layers it gets back.
//!
//! Placement rules live in [`validator`], scoring in [`score`] and the search in [`search`].

mod board;
mod error;
mod flat;
mod layer;
mod logging;
pub mod score;
pub mod search;
mod shapes;
pub mod validator;

pub use board::{
    Board, BoardConfig, LayerSnapshot, NumbersBoard, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SEEN_LIMIT,
};
pub use error::BoardError;
pub use flat::FlatMap;
pub use layer::{BoundingBox, Layer};
pub use logging::init_logging;
pub use search::{find_best_move, Move, SearchStats, Searcher, SeenCounts};
pub use shapes::{is_piece, piece_cells, shape, EMPTY, PIECE_COUNT, SHAPES, SHAPE_COLS, SHAPE_ROWS};

use wasm_bindgen::prelude::*;

/// Install a panic hook sending Rust panics to the browser console. The hook is only compiled in
/// when the `console_error_panic_hook` feature is enabled (default).
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Number of distinct pieces (10).
#[wasm_bindgen(js_name = pieceCount)]
pub fn piece_count() -> usize {
    PIECE_COUNT
}

/// Row-major 4×3 mask of `piece` (-1 for empty cells), or an empty array for an unknown id.
#[wasm_bindgen(js_name = pieceShape)]
pub fn piece_shape(piece: u8) -> Vec<i8> {
    if is_piece(piece) {
        shape(piece).to_vec()
    } else {
        Vec::new()
    }
}
