use log::debug;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::BoardError;
use crate::flat::FlatMap;
use crate::layer::{BoundingBox, Layer};
use crate::search::{Move, SearchStats, Searcher, SeenCounts};
use crate::shapes::{is_piece, SHAPE_COLS, SHAPE_ROWS};

pub const DEFAULT_ROWS: usize = 12;
pub const DEFAULT_COLS: usize = 12;
pub const DEFAULT_SEEN_LIMIT: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    /// Maximum number of placements of any single piece id. Accepts `seenLimit` from JS callers.
    #[serde(default = "default_seen_limit", alias = "seenLimit")]
    pub seen_limit: u8,
    /// Cache repeated sub-searches within one move.
    #[serde(default = "default_memoize")]
    pub memoize: bool,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}
fn default_cols() -> usize {
    DEFAULT_COLS
}
fn default_seen_limit() -> u8 {
    DEFAULT_SEEN_LIMIT
}
fn default_memoize() -> bool {
    true
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            seen_limit: default_seen_limit(),
            memoize: default_memoize(),
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.rows < SHAPE_ROWS || self.cols < SHAPE_COLS {
            return Err(BoardError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.seen_limit == 0 {
            return Err(BoardError::InvalidSeenLimit);
        }
        Ok(())
    }
}

/// Read-only copy of one layer for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSnapshot {
    pub level: u8,
    pub cells: Vec<i8>,
    pub bounding_box: BoundingBox,
}

impl LayerSnapshot {
    fn of(level: usize, layer: &Layer) -> Self {
        Self {
            level: level as u8,
            cells: layer.cells().to_vec(),
            bounding_box: layer.bounding_box(),
        }
    }
}

/// Layer stack plus its flat map and per-piece counters. `apply_best_move` is the only mutation.
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    layers: Vec<Layer>,
    flat: FlatMap,
    seen: SeenCounts,
    last_stats: SearchStats,
}

impl Board {
    /// Empty 12×12 board, each piece allowed twice.
    pub fn new() -> Self {
        Self::from_valid_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    pub fn with_dimensions(rows: usize, cols: usize, seen_limit: u8) -> Result<Self, BoardError> {
        Self::with_config(BoardConfig {
            rows,
            cols,
            seen_limit,
            ..BoardConfig::default()
        })
    }

    fn from_valid_config(config: BoardConfig) -> Self {
        Self {
            layers: Vec::with_capacity(20),
            flat: FlatMap::new(config.rows, config.cols),
            seen: SeenCounts::new(),
            last_stats: SearchStats::default(),
            config,
        }
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    pub fn seen_limit(&self) -> u8 {
        self.config.seen_limit
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn flat_map(&self) -> &FlatMap {
        &self.flat
    }

    /// Times `piece` has been placed so far.
    pub fn placements(&self, piece: u8) -> u8 {
        if is_piece(piece) {
            self.seen.get(piece)
        } else {
            0
        }
    }

    pub fn last_search_stats(&self) -> &SearchStats {
        &self.last_stats
    }

    /// Place `piece` where it scores best looking `depth` placements ahead and return that move.
    ///
    /// The first piece on an empty board goes in the centre on the ground for a score of 0. On
    /// any error the board is left untouched.
    pub fn apply_best_move(&mut self, piece: u8, depth: u32) -> Result<Move, BoardError> {
        if !is_piece(piece) {
            return Err(BoardError::InvalidPiece(piece));
        }
        if depth == 0 {
            return Err(BoardError::InvalidDepth);
        }
        if self.layers.is_empty() {
            return Ok(self.set_base_layer(piece));
        }
        if self.seen.get(piece) >= self.config.seen_limit {
            debug!("rejecting piece {piece}: seen limit {} reached", self.config.seen_limit);
            return Err(BoardError::PieceExhausted {
                piece,
                limit: self.config.seen_limit,
            });
        }

        let mut searcher = Searcher::new(self.config.seen_limit, self.config.memoize);
        let result = searcher.best_move(&self.flat, self.seen, piece, depth);
        self.last_stats = searcher.into_stats();
        let best = match result {
            Ok(best) => best,
            Err(err) => {
                debug!("rejecting piece {piece}: {err}");
                return Err(err);
            }
        };
        self.commit(&best);
        Ok(best)
    }

    fn set_base_layer(&mut self, piece: u8) -> Move {
        let base = Move {
            piece,
            row: (self.config.rows - SHAPE_ROWS) / 2,
            col: (self.config.cols - SHAPE_COLS) / 2,
            level: 0,
            score: 0,
        };
        self.commit(&base);
        base
    }

    fn commit(&mut self, mv: &Move) {
        let level = mv.level as usize;
        if level >= self.layers.len() {
            self.layers.push(Layer::new(self.config.rows, self.config.cols));
        }
        let layer = &mut self.layers[level];
        layer.put_shape(mv.piece, mv.row, mv.col);
        self.flat.fold(layer, mv.level);
        self.seen.record(mv.piece);
        debug!(
            "placed piece {} at ({}, {}) on level {} for {}",
            mv.piece, mv.row, mv.col, mv.level, mv.score
        );
    }

    /// Every layer bottom-up, as stored.
    pub fn renderable_layers(&self) -> Vec<LayerSnapshot> {
        self.layers
            .iter()
            .enumerate()
            .map(|(level, layer)| LayerSnapshot::of(level, layer))
            .collect()
    }

    /// Entry `i` shows layers `0..=i` overlaid top-down, i.e. the board as seen from above once
    /// level `i` was reached.
    pub fn overlays(&self) -> Vec<Layer> {
        let mut view = Layer::new(self.config.rows, self.config.cols);
        self.layers
            .iter()
            .map(|layer| {
                view.overlay(layer);
                view.clone()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A thin wasm-bindgen friendly board wrapper.
#[wasm_bindgen]
pub struct NumbersBoard {
    board: Board,
}

#[wasm_bindgen]
impl NumbersBoard {
    /// Build a board from `{ rows, cols, seenLimit, memoize }` (any field optional) or defaults
    /// when `config` is `undefined`/`null`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<NumbersBoard, JsValue> {
        let cfg: BoardConfig = if config.is_undefined() || config.is_null() {
            BoardConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let board = Board::with_config(cfg).map_err(to_js_error)?;
        Ok(Self { board })
    }

    #[wasm_bindgen(js_name = defaultConfig)]
    pub fn default_config() -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&BoardConfig::default()).map_err(JsValue::from)
    }

    /// Commit the best move for `piece` and return its score. Rejections come back as errors
    /// carrying a readable message and leave the board unchanged.
    #[wasm_bindgen(js_name = applyBestMove)]
    pub fn apply_best_move(&mut self, piece: u8, depth: u32) -> Result<u32, JsValue> {
        self.board
            .apply_best_move(piece, depth)
            .map(|mv| mv.score)
            .map_err(to_js_error)
    }

    /// Array of `{ level, cells, bounding_box }`, bottom layer first.
    #[wasm_bindgen(js_name = renderableLayers)]
    pub fn renderable_layers(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.board.renderable_layers()).map_err(JsValue::from)
    }

    /// Cumulative top-down views, same record shape as `renderableLayers`.
    pub fn overlays(&self) -> Result<JsValue, JsValue> {
        let snapshots: Vec<LayerSnapshot> = self
            .board
            .overlays()
            .iter()
            .enumerate()
            .map(|(level, layer)| LayerSnapshot::of(level, layer))
            .collect();
        serde_wasm_bindgen::to_value(&snapshots).map_err(JsValue::from)
    }

    /// Row-major `Int8Array` of topmost levels (-1 for bare ground).
    #[wasm_bindgen(js_name = flatMap)]
    pub fn flat_map(&self) -> Vec<i8> {
        self.board.flat_map().cells().to_vec()
    }

    #[wasm_bindgen(js_name = lastSearchStats)]
    pub fn last_search_stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.board.last_search_stats()).map_err(JsValue::from)
    }

    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    #[wasm_bindgen(js_name = layerCount)]
    pub fn layer_count(&self) -> usize {
        self.board.layer_count()
    }

    pub fn placements(&self, piece: u8) -> u8 {
        self.board.placements(piece)
    }
}

impl NumbersBoard {
    pub fn inner(&self) -> &Board {
        &self.board
    }
}

fn to_js_error(err: BoardError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_piece_goes_in_the_middle() {
        let mut board = Board::new();
        let mv = board.apply_best_move(7, 3).expect("base placement");
        assert_eq!((mv.row, mv.col, mv.level, mv.score), (4, 4, 0, 0));
        assert_eq!(board.layer_count(), 1);
        assert_eq!(board.placements(7), 1);
        assert_eq!(board.flat_map().level_at(4, 4), 0);
    }

    #[test]
    fn config_validation() {
        assert_eq!(
            Board::with_dimensions(3, 12, 2).err(),
            Some(BoardError::InvalidDimensions { rows: 3, cols: 12 })
        );
        assert_eq!(Board::with_dimensions(4, 3, 0).err(), Some(BoardError::InvalidSeenLimit));
        assert!(Board::with_dimensions(4, 3, 1).is_ok());
    }

    #[test]
    fn bad_requests_do_not_touch_the_board() {
        let mut board = Board::with_dimensions(6, 6, 2).expect("valid config");
        assert_eq!(board.apply_best_move(12, 1), Err(BoardError::InvalidPiece(12)));
        assert_eq!(board.apply_best_move(3, 0), Err(BoardError::InvalidDepth));
        assert_eq!(board.layer_count(), 0);
    }

    #[test]
    fn new_level_appends_a_layer() {
        let mut board = Board::with_dimensions(4, 7, 2).expect("valid config");
        board.apply_best_move(0, 1).expect("base placement");
        let mv = board.apply_best_move(1, 1).expect("stack on zero");
        assert_eq!(mv.level, 1);
        assert_eq!(board.layer_count(), 2);
        assert_eq!(board.renderable_layers()[1].level, 1);
    }

    #[test]
    fn overlays_accumulate_from_the_bottom() {
        let mut board = Board::with_dimensions(4, 7, 2).expect("valid config");
        board.apply_best_move(0, 1).expect("base placement");
        board.apply_best_move(1, 1).expect("stack on zero");
        let overlays = board.overlays();
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0], board.layers()[0]);
        // 1 sits on the zero's right side, the zero's left column still shows through.
        assert_eq!(overlays[1].to_string(), "..011..\n..0.1..\n..0.1..\n..001..\n");
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg = BoardConfig::default();
        assert_eq!((cfg.rows, cfg.cols, cfg.seen_limit, cfg.memoize), (12, 12, 2, true));
    }
}
