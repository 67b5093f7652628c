use nmbr9_wasm::{Board, BoardError, FlatMap};

fn play(board: &mut Board, pieces: &[u8], depth: u32) -> Vec<u32> {
    pieces
        .iter()
        .map(|&piece| {
            board
                .apply_best_move(piece, depth)
                .unwrap_or_else(|err| panic!("piece {piece}: {err}\n{}", board.flat_map()))
                .score
        })
        .collect()
}

#[test]
fn one_stacks_flush_on_zero() {
    // ..000..   ..011..
    // ..0.0..   ..0.1..
    // ..0.0..   ..0.1..
    // ..000..   ..001..
    let mut board = Board::with_dimensions(4, 7, 2).expect("valid config");
    let base = board.apply_best_move(0, 1).expect("base placement");
    assert_eq!((base.row, base.col), (0, 2));

    let mv = board.apply_best_move(1, 1).expect("legal move");
    assert_eq!((mv.row, mv.col, mv.level, mv.score), (0, 3, 1, 1));
}

#[test]
fn single_step_scores() {
    // setup:    next:     next:
    // ...2244   ...9994   ...9884
    // ...224.   ...999.   ...988.
    // ..22444 > ..29944 > ..28844
    // ..22244   ..29944   ..28844
    let mut board = Board::with_dimensions(4, 7, 1).expect("valid config");
    assert_eq!(play(&mut board, &[2, 4, 9, 8], 1), vec![0, 0, 9, 16]);
}

#[test]
fn two_step_lookahead_scores() {
    // .882244   .882664
    // .88224.   .88264.
    // 8822444 > 8822666
    // 8822244   8822666
    let mut board = Board::with_dimensions(4, 7, 1).expect("valid config");
    assert_eq!(play(&mut board, &[2, 4, 8, 6], 2), vec![0, 9, 9, 15]);
}

#[test]
fn third_copy_of_a_piece_is_rejected() {
    let mut board = Board::new();
    board.apply_best_move(5, 1).expect("base placement");
    board.apply_best_move(5, 1).expect("second copy");
    let layers = board.layers().to_vec();
    let flat = board.flat_map().clone();

    assert_eq!(
        board.apply_best_move(5, 1),
        Err(BoardError::PieceExhausted { piece: 5, limit: 2 })
    );
    assert_eq!(board.layers(), layers.as_slice());
    assert_eq!(board.flat_map(), &flat);
    assert_eq!(board.placements(5), 2);

    // Other pieces are still welcome.
    board.apply_best_move(6, 1).expect("different piece");
}

#[test]
fn saturated_board_reports_no_placement() {
    // A 4×3 board holds exactly one footprint. With a 0 there, a 1 would cover the 0's hole and
    // its rim at once.
    let mut board = Board::with_dimensions(4, 3, 2).expect("valid config");
    board.apply_best_move(0, 1).expect("base placement");
    let flat = board.flat_map().clone();

    assert_eq!(
        board.apply_best_move(1, 2),
        Err(BoardError::NoLegalPlacement { piece: 1 })
    );
    assert_eq!(board.flat_map(), &flat);
    assert_eq!(board.layer_count(), 1);
    assert_eq!(board.placements(1), 0);
}

#[test]
fn whole_set_on_the_default_board() {
    let mut board = Board::new();
    for piece in 0..10 {
        match board.apply_best_move(piece, 2) {
            Ok(_) | Err(BoardError::NoLegalPlacement { .. }) => {}
            Err(err) => panic!("piece {piece}: {err}"),
        }
        assert_eq!(
            &FlatMap::from_layers(board.rows(), board.cols(), board.layers()),
            board.flat_map()
        );
    }
    assert!(board.layer_count() >= 1);
    assert!(board.last_search_stats().calls_per_depth.len() == 2);
}
