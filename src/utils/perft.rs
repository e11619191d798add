use crate::board::Board;
use crate::board::{LegalGen, MoveList};

/// Counts the leaf nodes of the legal move tree to `depth`.
pub fn perft(board: &mut Board, depth: usize) -> usize {
    let mut move_list = MoveList::new();

    board.generate_moves::<LegalGen>(&mut move_list);

    if depth <= 1 {
        return move_list.len();
    }

    let mut nodes = 0;

    for em in move_list.iter() {
        board.make_move(em.mv);
        nodes += perft(board, depth - 1);
        board.undo_move(em.mv);
    }

    nodes
}

/// Prints the per-move node split, the usual debugging view.
pub fn perft_divide(board: &mut Board, depth: usize) -> usize {
    use std::time::Instant;

    let mut move_list = MoveList::new();
    board.generate_moves::<LegalGen>(&mut move_list);

    let mut total_nodes = 0;
    let start = Instant::now();

    for em in move_list.iter() {
        board.make_move(em.mv);
        let nodes = if depth <= 1 {
            1
        } else {
            perft(board, depth - 1)
        };
        board.undo_move(em.mv);
        total_nodes += nodes;

        println!("{}: {}", em.mv, nodes);
    }

    let time = start.elapsed().as_millis().max(1);

    println!("Nodes: {total_nodes}");
    println!(
        "Time: {time}ms ({:0.1} Mnps)",
        total_nodes as f64 / time as f64 / 1000.0
    );

    total_nodes
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
