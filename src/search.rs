//! Depth-bounded lookahead search for the best placement of one piece.
//!
//! A single maximising agent picks every move: for each legal spot the immediate score is added to
//! the best score any still-available piece can reach on the simulated follow-up board, down to
//! the requested depth. Only the root's own coordinate is kept; deeper coordinates merely feed the
//! score. Ties keep the first spot in row-major scan order.

use hashbrown::HashMap;
use log::trace;
use serde::Serialize;
use smallvec::SmallVec;

use crate::error::BoardError;
use crate::flat::FlatMap;
use crate::layer::Layer;
use crate::score::score;
use crate::shapes::{is_piece, PIECE_COUNT};
use crate::validator::placement_level;

/// A placement candidate and the score it leads to (immediate plus best simulated future).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Move {
    pub piece: u8,
    pub row: usize,
    pub col: usize,
    pub level: u8,
    pub score: u32,
}

/// How many times each piece id has been placed.
///
/// Small enough to copy, so every simulated branch gets its own counts and the caller's never
/// change underneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SeenCounts([u8; PIECE_COUNT]);

impl SeenCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, piece: u8) -> u8 {
        self.0[piece as usize]
    }

    pub fn record(&mut self, piece: u8) {
        self.0[piece as usize] += 1;
    }

    pub fn with_placed(mut self, piece: u8) -> Self {
        self.record(piece);
        self
    }

    /// Piece ids still below `limit`, ascending.
    pub fn eligible(&self, limit: u8) -> SmallVec<[u8; PIECE_COUNT]> {
        (0..PIECE_COUNT as u8).filter(|&piece| self.get(piece) < limit).collect()
    }

    pub fn as_array(&self) -> [u8; PIECE_COUNT] {
        self.0
    }
}

/// Counters gathered during one root search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Sub-searches started at each ply; index 0 is the root call.
    pub calls_per_depth: Vec<u64>,
    /// Legal spots evaluated across all plies.
    pub legal_placements: u64,
    /// Sub-searches answered from the memo table.
    pub cache_hits: u64,
}

#[derive(Hash, PartialEq, Eq)]
struct MemoKey {
    levels: Box<[i8]>,
    seen: SeenCounts,
    piece: u8,
    depth: u32,
}

pub struct Searcher {
    seen_limit: u8,
    memo: Option<HashMap<MemoKey, Option<u32>>>,
    stats: SearchStats,
    root_depth: u32,
}

impl Searcher {
    /// With `memoize`, repeated sub-searches (same flat map, counts, piece and depth) are answered
    /// from a table that lives for one root search. Results and tie-breaks are unaffected.
    pub fn new(seen_limit: u8, memoize: bool) -> Self {
        Self {
            seen_limit,
            memo: memoize.then(HashMap::new),
            stats: SearchStats::default(),
            root_depth: 0,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn into_stats(self) -> SearchStats {
        self.stats
    }

    /// Best move for `piece` on `flat` looking `depth` placements ahead (1 = this move only).
    pub fn best_move(
        &mut self,
        flat: &FlatMap,
        seen: SeenCounts,
        piece: u8,
        depth: u32,
    ) -> Result<Move, BoardError> {
        if !is_piece(piece) {
            return Err(BoardError::InvalidPiece(piece));
        }
        if depth == 0 {
            return Err(BoardError::InvalidDepth);
        }
        self.stats = SearchStats {
            calls_per_depth: vec![0; depth as usize],
            ..SearchStats::default()
        };
        self.root_depth = depth;
        if let Some(memo) = self.memo.as_mut() {
            memo.clear();
        }

        let best = self.search(flat, seen, piece, depth);
        trace!(
            "search piece={piece} depth={depth} calls={:?} legal={} cache_hits={}",
            self.stats.calls_per_depth,
            self.stats.legal_placements,
            self.stats.cache_hits
        );
        best.ok_or(BoardError::NoLegalPlacement { piece })
    }

    fn search(&mut self, flat: &FlatMap, seen: SeenCounts, piece: u8, depth: u32) -> Option<Move> {
        self.stats.calls_per_depth[(self.root_depth - depth) as usize] += 1;

        let mut best: Option<Move> = None;
        for (row, col) in flat.scan_coordinates() {
            let Some(level) = placement_level(flat, piece, row, col) else {
                continue;
            };
            self.stats.legal_placements += 1;

            let immediate = score(piece, level);
            let candidate = Move { piece, row, col, level, score: immediate };
            if best.map_or(true, |b| immediate > b.score) {
                best = Some(candidate);
            }

            if depth > 1 {
                let next = simulate(flat, piece, row, col, level);
                let seen = seen.with_placed(piece);
                for other in seen.eligible(self.seen_limit) {
                    let Some(future) = self.future_score(&next, seen, other, depth - 1) else {
                        continue;
                    };
                    let total = immediate + future;
                    if best.map_or(true, |b| total > b.score) {
                        best = Some(Move { score: total, ..candidate });
                    }
                }
            }
        }
        best
    }

    fn future_score(&mut self, flat: &FlatMap, seen: SeenCounts, piece: u8, depth: u32) -> Option<u32> {
        let key = self.memo.as_ref().map(|_| MemoKey {
            levels: flat.cells().into(),
            seen,
            piece,
            depth,
        });
        if let (Some(memo), Some(key)) = (self.memo.as_ref(), key.as_ref()) {
            if let Some(&hit) = memo.get(key) {
                self.stats.cache_hits += 1;
                return hit;
            }
        }

        let result = self.search(flat, seen, piece, depth).map(|m| m.score);
        if let (Some(memo), Some(key)) = (self.memo.as_mut(), key) {
            memo.insert(key, result);
        }
        result
    }
}

/// Flat map after dropping `piece` at `(row, col)` on `level`, leaving `flat` as it was.
fn simulate(flat: &FlatMap, piece: u8, row: usize, col: usize, level: u8) -> FlatMap {
    let mut scratch = Layer::new(flat.rows(), flat.cols());
    scratch.put_shape(piece, row, col);
    let mut next = flat.clone();
    next.fold(&scratch, level);
    next
}

/// One-shot search without memoisation.
pub fn find_best_move(
    flat: &FlatMap,
    seen: SeenCounts,
    seen_limit: u8,
    piece: u8,
    depth: u32,
) -> Result<Move, BoardError> {
    Searcher::new(seen_limit, false).best_move(flat, seen, piece, depth)
}
