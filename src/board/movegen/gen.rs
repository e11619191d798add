//! The move generators: one enumerator per piece family composed by
//! `generate_all`, plus the per-mode entry points. Every function appends
//! onto the caller's `MoveList` and leaves the emission order fixed:
//! pawns, knights, bishops, rooks, queens, drops, king, castling.

use super::lookup::*;
use super::move_list::MoveList;
use super::GenType;
use super::GenTypeTrait;
use crate::board::Board;
use crate::core::*;

/******************************************\
|==========================================|
|              Helper Functions            |
|==========================================|
\******************************************/

const PROMOTION_PIECES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

const MINOR_MAJOR: [PieceType; 4] = [
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
];

/// Emits the promotions for a pawn arriving on `to` from direction `dir`.
/// Which pieces appear depends on the mode: queen promotions ride with the
/// captures, underpromotions with the quiets, and only the knight can
/// deliver a quiet check the queen promotion does not already cover.
fn push_promotions(
    board: &Board,
    list: &mut MoveList,
    gen: GenType,
    to: Square,
    dir: Direction,
    their_ksq: Option<Square>,
) {
    let from = unsafe { to.add_unchecked(-dir) };

    if board.is_anti() {
        // Kings are ordinary material, so the king joins the menu
        if matches!(
            gen,
            GenType::Quiets | GenType::Captures | GenType::NonEvasions
        ) {
            for pt in PROMOTION_PIECES {
                list.push(Move::new_promotion(from, to, pt));
            }
            list.push(Move::new_promotion(from, to, PieceType::King));
        }
        return;
    }

    if matches!(
        gen,
        GenType::Captures | GenType::Evasions | GenType::NonEvasions
    ) {
        list.push(Move::new_promotion(from, to, PieceType::Queen));
    }

    if matches!(
        gen,
        GenType::Quiets | GenType::Evasions | GenType::NonEvasions
    ) {
        list.push(Move::new_promotion(from, to, PieceType::Rook));
        list.push(Move::new_promotion(from, to, PieceType::Bishop));
        list.push(Move::new_promotion(from, to, PieceType::Knight));
    }

    if gen == GenType::QuietChecks {
        if let Some(ksq) = their_ksq {
            if knight_attack(to).contains(ksq) {
                list.push(Move::new_promotion(from, to, PieceType::Knight));
            }
        }
    }
}

/// Extra destinations a relay piece standing on `from` borrows from its
/// defenders. The king lends nothing to itself (`is_king`).
fn relay_extensions(
    board: &Board,
    us: Colour,
    from: Square,
    target: Bitboard,
    is_king: bool,
) -> Bitboard {
    let occ = board.all_occupied_bb();
    let defenders = board.attackers_to(from, occ) & board.occupied_bb(us);

    let mut b = Bitboard::EMPTY;
    if (defenders & board.piecetype_bb(PieceType::Knight)).is_occupied() {
        b |= knight_attack(from) & target;
    }
    if (defenders & (board.piecetype_bb(PieceType::Queen) | board.piecetype_bb(PieceType::Bishop)))
        .is_occupied()
    {
        b |= bishop_attacks(from, occ) & target;
    }
    if (defenders & (board.piecetype_bb(PieceType::Queen) | board.piecetype_bb(PieceType::Rook)))
        .is_occupied()
    {
        b |= rook_attacks(from, occ) & target;
    }
    if !is_king && (defenders & board.piecetype_bb(PieceType::King)).is_occupied() {
        b |= king_attack(from) & target;
    }

    b
}

/******************************************\
|==========================================|
|              Pawn Enumerator             |
|==========================================|
\******************************************/

fn generate_pawn_moves(
    board: &Board,
    list: &mut MoveList,
    us: Colour,
    target: Bitboard,
    gen: GenType,
) {
    let them = !us;
    let rank7 = Bitboard::promo_rank(us);
    let rank8 = Bitboard::promo_dest_rank(us);
    let rank3 = Bitboard::ep_rank(us);
    let rank2 = Bitboard::push_rank(us);
    let up = us.forward();
    let up_east = us.forward_east();
    let up_west = us.forward_west();

    let pawns_on_7 = board.piece_bb(us, PieceType::Pawn) & rank7;
    let pawns_not_on_7 = board.piece_bb(us, PieceType::Pawn) & !rank7;

    let enemies = match gen {
        GenType::Evasions => board.occupied_bb(them) & target,
        GenType::Captures => target,
        _ => board.occupied_bb(them),
    };

    // Single and double pushes, no promotions
    if gen != GenType::Captures {
        let mut empty = if matches!(gen, GenType::Quiets | GenType::QuietChecks) {
            target
        } else {
            !board.all_occupied_bb()
        };
        if board.is_anti() {
            empty &= target;
        }

        let mut b1 = pawns_not_on_7.shift(up) & empty;
        let mut b2 = (b1 & rank3).shift(up) & empty;
        if board.is_horde() {
            // Horde pawns double-push from the first two ranks
            b2 = (b1 & (rank2 | rank3)).shift(up) & empty;
        }

        if board.is_losers() {
            b1 &= target;
            b2 &= target;
        }

        if gen == GenType::Evasions {
            // Only blocking squares help
            b1 &= target;
            b2 &= target;
        }

        if gen == GenType::QuietChecks {
            let ksq = board.ksq(them);

            b1 &= pawn_attack(them, ksq);
            b2 &= pawn_attack(them, ksq);

            // Pushes giving discovered check. Possible only off the
            // king's file, since captures are not generated here, and a
            // discovering promotion was emitted with the captures.
            let dc = board.discovered_check_candidates();
            if (pawns_not_on_7 & dc).is_occupied() {
                let dc1 = (pawns_not_on_7 & dc).shift(up) & empty & !ksq.file().bb();
                let dc2 = (dc1 & rank3).shift(up) & empty;

                b1 |= dc1;
                b2 |= dc2;
            }
        }

        b1.for_each(|to| {
            let from = unsafe { to.add_unchecked(-up) };
            list.push(Move::new(from, to));
        });

        b2.for_each(|to| {
            let from = unsafe { to.add_unchecked(-up).add_unchecked(-up) };
            list.push(Move::new(from, to));
        });
    }

    // Promotions and underpromotions
    if pawns_on_7.is_occupied() && (gen != GenType::Evasions || (target & rank8).is_occupied()) {
        let mut empty = match gen {
            GenType::Captures => {
                let mut e = !board.all_occupied_bb();
                // Through the blast prefix a promotion must win on the
                // spot or remove the checker
                if board.is_atomic() && board.in_check() {
                    e &= target;
                }
                e
            }
            GenType::Quiets | GenType::QuietChecks => target,
            _ => !board.all_occupied_bb(),
        };

        if board.is_anti() || board.is_losers() {
            empty &= target;
        }

        if gen == GenType::Evasions {
            empty &= target;
        }

        let b1 = pawns_on_7.shift(up_east) & enemies;
        let b2 = pawns_on_7.shift(up_west) & enemies;
        let b3 = pawns_on_7.shift(up) & empty;

        let their_ksq = board.king_sq(them);

        b1.for_each(|to| push_promotions(board, list, gen, to, up_east, their_ksq));
        b2.for_each(|to| push_promotions(board, list, gen, to, up_west, their_ksq));
        b3.for_each(|to| push_promotions(board, list, gen, to, up, their_ksq));
    }

    // Standard and en-passant captures
    if matches!(
        gen,
        GenType::Captures | GenType::Evasions | GenType::NonEvasions
    ) {
        let b1 = pawns_not_on_7.shift(up_east) & enemies;
        let b2 = pawns_not_on_7.shift(up_west) & enemies;

        b1.for_each(|to| {
            let from = unsafe { to.add_unchecked(-up_east) };
            list.push(Move::new(from, to));
        });

        b2.for_each(|to| {
            let from = unsafe { to.add_unchecked(-up_west) };
            list.push(Move::new(from, to));
        });

        if let Some(ep_sq) = board.ep() {
            debug_assert!(ep_sq.relative(us).rank() == Rank::Rank6);

            // An en-passant capture evades only when the double-pushed
            // pawn itself is the checker; anything else is a discovered
            // check that en passant cannot address
            if gen == GenType::Evasions && !target.contains(unsafe { ep_sq.add_unchecked(-up) }) {
                return;
            }

            let b = pawns_not_on_7 & pawn_attack(them, ep_sq);

            b.for_each(|from| list.push(Move::new_en_passant(from, ep_sq)));
        }
    }
}

/******************************************\
|==========================================|
|             Piece Enumerator             |
|==========================================|
\******************************************/

fn generate_piece_moves(
    board: &Board,
    list: &mut MoveList,
    us: Colour,
    pt: PieceType,
    target: Bitboard,
    checks: bool,
) {
    debug_assert!(pt != PieceType::Pawn && pt != PieceType::King);

    let occ = board.all_occupied_bb();

    board.piece_bb(us, pt).for_each(|from| {
        if checks {
            // A slider whose rays miss every checking square cannot give
            // a direct check from here
            if matches!(pt, PieceType::Bishop | PieceType::Rook | PieceType::Queen)
                && (pseudo_attack(pt, from) & target & board.check_squares(pt)).is_empty()
            {
                return;
            }

            // Discovered checks are generated in their own pass
            if board.discovered_check_candidates().contains(from) {
                return;
            }
        }

        let mut b = attacks(us, pt, from, occ) & target;

        if board.is_relay() {
            b |= relay_extensions(board, us, from, target, false);
        }

        if checks {
            b &= board.check_squares(pt);
        }

        b.for_each(|to| list.push(Move::new(from, to)));
    });
}

/******************************************\
|==========================================|
|              Drop Enumerator             |
|==========================================|
\******************************************/

fn generate_drops(
    board: &Board,
    list: &mut MoveList,
    us: Colour,
    pt: PieceType,
    b: Bitboard,
    checks: bool,
) {
    if board.count_in_hand(us, pt) == 0 {
        return;
    }

    let mut b = b;
    if checks {
        b &= board.check_squares(pt);
    }

    b.for_each(|to| list.push(Move::new_drop(pt, to)));
}

/******************************************\
|==========================================|
|            Castling Enumerator           |
|==========================================|
\******************************************/

fn generate_castling(
    board: &Board,
    list: &mut MoveList,
    us: Colour,
    right: Castling,
    checks: bool,
) {
    if board.castling_impeded(right) || !board.can_castle(right) {
        return;
    }

    debug_assert!(!board.in_check());

    let anti = board.is_anti();
    let chess960 = board.is_chess960();

    let kfrom = if anti {
        board.castling_king_square(right)
    } else {
        board.ksq(us)
    };
    let rfrom = board.castling_rook_square(right);
    let kto = if right.is_king_side() {
        Square::G1
    } else {
        Square::C1
    }
    .relative(us);
    let enemies = board.occupied_bb(!us);

    // Kings are not royal in antichess, so the path tests do not apply
    if !anti {
        let step = if chess960 {
            if kto > kfrom {
                Direction::W
            } else {
                Direction::E
            }
        } else if right.is_king_side() {
            Direction::W
        } else {
            Direction::E
        };

        let their_king_ring = if board.is_atomic() {
            board
                .king_sq(!us)
                .map(king_attack)
                .unwrap_or(Bitboard::EMPTY)
        } else {
            Bitboard::EMPTY
        };

        // Walk the king track from its destination back to (excluding)
        // its start; no square on it may be attacked
        let mut s = kto;
        while s != kfrom {
            if board.is_atomic() {
                // Attacks from beside the opposing king are empty threats
                if !their_king_ring.contains(s)
                    && (board.attackers_to(s, board.all_occupied_bb() ^ kfrom.bb()) & enemies)
                        .is_occupied()
                {
                    return;
                }
            } else if (board.attackers_to(s, board.all_occupied_bb()) & enemies).is_occupied() {
                return;
            }

            s = unsafe { s.add_unchecked(step) };
        }

        // Chess960: moving the rook may clear the line of a hidden
        // checker, e.g. an enemy queen on a1 behind a castling rook on b1
        if chess960
            && (rook_attacks(kto, board.all_occupied_bb() ^ rfrom.bb())
                & board.rook_queen_bb(!us))
            .is_occupied()
            && !(board.is_atomic() && their_king_ring_contains(board, us, kto))
        {
            return;
        }
    }

    let mv = Move::new_castling(kfrom, rfrom);

    if checks && !board.gives_check(mv) {
        return;
    }

    list.push(mv);
}

fn their_king_ring_contains(board: &Board, us: Colour, sq: Square) -> bool {
    board
        .king_sq(!us)
        .is_some_and(|k| king_attack(k).contains(sq))
}

/******************************************\
|==========================================|
|               Generate All               |
|==========================================|
\******************************************/

/// Runs every enumerator against `target` in the canonical order for one
/// (side, mode) pair.
fn generate_all(board: &Board, list: &mut MoveList, us: Colour, target: Bitboard, gen: GenType) {
    let checks = gen == GenType::QuietChecks;

    generate_pawn_moves(board, list, us, target, gen);

    for pt in MINOR_MAJOR {
        generate_piece_moves(board, list, us, pt, target, checks);
    }

    if board.is_house() && gen != GenType::Captures && board.has_hand(us) {
        let b = match gen {
            // The checker square is occupied; a drop can only block
            GenType::Evasions => target ^ board.checkers(),
            GenType::NonEvasions => target ^ board.occupied_bb(!us),
            _ => target,
        };

        generate_drops(board, list, us, PieceType::Pawn, b & !Bitboard::BACK_RANKS, checks);
        for pt in MINOR_MAJOR {
            generate_drops(board, list, us, pt, b, checks);
        }
    }

    if board.is_anti() {
        // Every king moves; none of them is royal
        board.piece_bb(us, PieceType::King).for_each(|ksq| {
            let b = king_attack(ksq) & target;
            b.for_each(|to| list.push(Move::new(ksq, to)));
        });

        if board.can_capture() {
            return;
        }
    } else if gen != GenType::QuietChecks && gen != GenType::Evasions {
        if let Some(ksq) = board.king_sq(us) {
            let mut b = king_attack(ksq) & target;

            if board.is_race() {
                // Crossing the board is the goal: forward steps count as
                // captures, and only those
                let cone = Bitboard::passed_span(Colour::White, ksq);
                if gen == GenType::Captures {
                    b |= king_attack(ksq) & cone & !board.all_occupied_bb();
                }
                if gen == GenType::Quiets {
                    b &= !cone;
                }
            }

            if board.is_relay() {
                b |= relay_extensions(board, us, ksq, target, true);
            }

            b.for_each(|to| list.push(Move::new(ksq, to)));
        }
    }

    if board.is_losers() && board.can_capture_losers() {
        return;
    }

    if gen != GenType::Captures
        && gen != GenType::Evasions
        && board.castling_side(us) != Castling::NONE
    {
        generate_castling(board, list, us, Castling::king_side(us), checks);
        generate_castling(board, list, us, Castling::queen_side(us), checks);
    }
}

/******************************************\
|==========================================|
|             Mode Entry Points            |
|==========================================|
\******************************************/

/// Captures, Quiets and NonEvasions share one entry: compute the target,
/// apply the variant overlays, dispatch.
fn generate_pseudo(board: &Board, list: &mut MoveList, gen: GenType) {
    debug_assert!(!board.in_check());

    let us = board.stm();
    let mut target = match gen {
        GenType::Captures => board.occupied_bb(!us),
        GenType::Quiets => !board.all_occupied_bb(),
        _ => !board.occupied_bb(us),
    };

    // Capture obligations narrow the target up front
    if (board.is_anti() && board.can_capture())
        || (board.is_losers() && board.can_capture_losers())
    {
        target &= board.occupied_bb(!us);
    }

    // A capture beside the own king blasts it: illegal before it is born
    if board.is_atomic() && gen == GenType::Captures {
        if let Some(ksq) = board.king_sq(us) {
            target &= !king_attack(ksq);
        }
    }

    generate_all(board, list, us, target, gen);
}

/// # Captures
///
/// All pseudo-legal captures and queen promotions. Must not be called in
/// check.
pub fn generate_captures(board: &Board, list: &mut MoveList) {
    generate_pseudo(board, list, GenType::Captures);
}

/// # Quiets
///
/// All pseudo-legal non-captures and underpromotions. Must not be called
/// in check.
pub fn generate_quiets(board: &Board, list: &mut MoveList) {
    generate_pseudo(board, list, GenType::Quiets);
}

/// # NonEvasions
///
/// All pseudo-legal moves. Must not be called in check.
pub fn generate_non_evasions(board: &Board, list: &mut MoveList) {
    generate_pseudo(board, list, GenType::NonEvasions);
}

/// # QuietChecks
///
/// All pseudo-legal non-captures that give check, knight underpromotions
/// included. Discovered checks come first, direct checks after.
pub fn generate_quiet_checks(board: &Board, list: &mut MoveList) {
    // No check concept, nothing to generate
    if board.is_anti() || board.is_race() {
        return;
    }

    debug_assert!(!board.in_check());

    let us = board.stm();
    let Some(their_ksq) = board.king_sq(!us) else {
        return;
    };

    let mut dc = board.discovered_check_candidates();
    while let Some(from) = dc.pop_lsb() {
        debug_assert!(board.on(from).is_some());
        let pt = unsafe { board.on(from).unwrap_unchecked() }.pt();

        // Pawn discoveries ride with the pushes
        if pt == PieceType::Pawn {
            continue;
        }

        let mut b = attacks(us, pt, from, board.all_occupied_bb()) & !board.all_occupied_bb();

        // A discovering king must leave the opposing king's queen rays
        if pt == PieceType::King {
            b &= !pseudo_attack(PieceType::Queen, their_ksq);
        }

        b.for_each(|to| list.push(Move::new(from, to)));
    }

    generate_all(
        board,
        list,
        us,
        !board.all_occupied_bb(),
        GenType::QuietChecks,
    );
}

/// # Evasions
///
/// King steps out of the checking rays, plus blocks and checker captures
/// when the check is single. Must be called in check.
pub fn generate_evasions(board: &Board, list: &mut MoveList) {
    // No check concept, nothing to evade
    if board.is_anti() || board.is_race() {
        return;
    }

    debug_assert!(board.in_check());

    let us = board.stm();
    let them = !us;
    let ksq = board.ksq(us);

    let king_ring = if board.is_atomic() {
        board
            .king_sq(them)
            .map(king_attack)
            .unwrap_or(Bitboard::EMPTY)
    } else {
        Bitboard::EMPTY
    };

    // Blasts that explode the opposing king, or every checker at once,
    // evade too; collect them first as a capture pass
    if board.is_atomic() {
        let mut target = board.occupied_bb(them);
        board.checkers().for_each(|s| {
            target &= king_attack(s) | s.bb();
        });
        target |= king_ring;
        target &= board.occupied_bb(them) & !king_attack(ksq);

        generate_all(board, list, us, target, GenType::Captures);
    }

    // Squares covered by slider checkers right through the king: stepping
    // onto them is known illegal, so skip the later legality test
    let mut slider_attacks = Bitboard::EMPTY;
    let sliders =
        board.checkers() & !board.piecetype_bb(PieceType::Knight) & !board.piecetype_bb(PieceType::Pawn);
    sliders.for_each(|checksq| slider_attacks |= line_bb(checksq, ksq) ^ checksq.bb());

    let mut b = if board.is_atomic() {
        // The king cannot capture (self-blast), and beside the opposing
        // king the slider rays lose their sting
        king_attack(ksq) & !board.all_occupied_bb() & !(slider_attacks & !king_ring)
    } else {
        king_attack(ksq) & !board.occupied_bb(us) & !slider_attacks
    };

    if board.is_losers() && board.can_capture_losers() {
        b &= board.occupied_bb(them);
    }

    b.for_each(|to| list.push(Move::new(ksq, to)));

    if board.checkers().more_than_one() {
        return; // Double check: only a king move can help
    }

    // Block the ray or capture the checker (in atomic the checker square
    // itself is out: capturing beside the own king is a self-blast)
    let checksq = board.checkers().lsb_unchecked();
    let mut target = if board.is_atomic() {
        between_bb(checksq, ksq)
    } else {
        between_bb(checksq, ksq) | checksq.bb()
    };

    if board.is_losers() && board.can_capture_losers() {
        target &= board.occupied_bb(them);
    }

    generate_all(board, list, us, target, GenType::Evasions);
}

/// # Legal
///
/// Evasions or non-evasions, filtered down to strict legality. Rejected
/// entries are overwritten by the last element, so order is not
/// preserved across removals.
pub fn generate_legal(board: &Board, list: &mut MoveList) {
    if board.is_variant_end() {
        return;
    }

    let us = board.stm();
    let pinned = board.pinned(us);
    let validate = pinned.is_occupied() || board.is_race();
    let ksq = board.king_sq(us);

    let start = list.len();
    if board.in_check() {
        generate_evasions(board, list);
    } else {
        generate_non_evasions(board, list);
    }

    let mut cur = start;
    while cur != list.len() {
        let mv = list[cur].mv;

        // Drops never expose the king: nothing leaves the board
        if board.is_house() && mv.is_drop() {
            cur += 1;
            continue;
        }

        let suspect = validate || Some(mv.from()) == ksq || mv.is_en_passant();
        let atomic_capture = board.is_atomic() && board.capture(mv);

        if (suspect || atomic_capture) && !board.legal(mv) {
            list.swap_remove(cur);
        } else {
            cur += 1;
        }
    }
}

/// Appends the moves of mode `G` onto `list`
pub fn generate<G: GenTypeTrait>(board: &Board, list: &mut MoveList) {
    match G::gen_type() {
        GenType::Captures => generate_captures(board, list),
        GenType::Quiets => generate_quiets(board, list),
        GenType::NonEvasions => generate_non_evasions(board, list),
        GenType::QuietChecks => generate_quiet_checks(board, list),
        GenType::Evasions => generate_evasions(board, list),
        GenType::Legal => generate_legal(board, list),
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::{KIWIPETE_FEN, START_FEN};
    use crate::core::Square::*;
    use std::collections::HashSet;

    fn captures(board: &Board) -> MoveList {
        let mut list = MoveList::new();
        generate_captures(board, &mut list);
        list
    }

    fn quiets(board: &Board) -> MoveList {
        let mut list = MoveList::new();
        generate_quiets(board, &mut list);
        list
    }

    fn non_evasions(board: &Board) -> MoveList {
        let mut list = MoveList::new();
        generate_non_evasions(board, &mut list);
        list
    }

    fn quiet_checks(board: &Board) -> MoveList {
        let mut list = MoveList::new();
        generate_quiet_checks(board, &mut list);
        list
    }

    fn legal(board: &Board) -> MoveList {
        let mut list = MoveList::new();
        generate_legal(board, &mut list);
        list
    }

    fn move_set(list: &MoveList) -> HashSet<Move> {
        let set: HashSet<Move> = list.moves().collect();
        assert_eq!(set.len(), list.len(), "duplicate moves emitted");
        set
    }

    /// Captures and quiets must partition the non-evasions
    fn assert_partition(fen: &str) {
        let board = Board::from_fen(fen).unwrap();
        assert!(!board.in_check(), "partition only holds out of check");

        let caps = move_set(&captures(&board));
        let quiet = move_set(&quiets(&board));
        let all = move_set(&non_evasions(&board));

        assert!(caps.is_disjoint(&quiet), "modes overlap for {fen}");
        let union: HashSet<Move> = caps.union(&quiet).copied().collect();
        assert_eq!(union, all, "modes do not partition for {fen}");
    }

    /// The own king must be safe after every legal move
    fn assert_all_resolve(fen: &str) {
        let mut board = Board::from_fen(fen).unwrap();
        for mv in legal(&board).moves().collect::<Vec<_>>() {
            board.make_move(mv);
            let mover = !board.stm();
            if let Some(k) = board.king_sq(mover) {
                let attackers =
                    board.attackers_to(k, board.all_occupied_bb()) & board.occupied_bb(board.stm());
                assert!(
                    attackers.is_empty(),
                    "{mv} leaves the king attacked in {fen}"
                );
            }
            board.undo_move(mv);
        }
    }

    #[test]
    fn test_startpos_counts() {
        let board = Board::default();
        assert_eq!(legal(&board).len(), 20);
        assert_eq!(captures(&board).len(), 0);
        assert_eq!(quiets(&board).len(), 20);
        assert_eq!(non_evasions(&board).len(), 20);
        assert_eq!(quiet_checks(&board).len(), 0);
    }

    #[test]
    fn test_emission_order() {
        // Pawns first, then knights; the order is part of the contract
        let board = Board::default();
        let list = non_evasions(&board);
        for em in list.iter().take(16) {
            assert_eq!(
                board.on(em.mv.from()).map(|p| p.pt()),
                Some(PieceType::Pawn)
            );
        }
        for em in list.iter().skip(16) {
            assert_eq!(
                board.on(em.mv.from()).map(|p| p.pt()),
                Some(PieceType::Knight)
            );
        }
    }

    #[test]
    fn test_partition_property() {
        for fen in [
            START_FEN,
            KIWIPETE_FEN,
            "4k3/8/8/8/8/8/8/4K2R w K - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        ] {
            assert_partition(fen);
        }
    }

    #[test]
    fn test_mode_discipline() {
        let board = Board::from_fen(KIWIPETE_FEN).unwrap();

        for em in captures(&board).iter() {
            assert!(
                board.capture(em.mv)
                    || (em.mv.is_promotion() && em.mv.promotion_pt() == PieceType::Queen),
                "{} is not a capture-mode move",
                em.mv
            );
        }

        for em in quiets(&board).iter() {
            assert!(!board.capture(em.mv), "{} captures in quiets", em.mv);
        }
    }

    #[test]
    fn test_kiwipete_legal() {
        let board = Board::from_fen(KIWIPETE_FEN).unwrap();
        let list = legal(&board);
        assert_eq!(list.len(), 48);

        let caps = list.moves().filter(|m| board.capture(*m)).count();
        assert_eq!(caps, 8);

        let castles = list.moves().filter(|m| m.is_castling()).count();
        assert_eq!(castles, 2);
        assert!(list.contains(Move::new_castling(E1, H1)));
        assert!(list.contains(Move::new_castling(E1, A1)));
    }

    #[test]
    fn test_castling_in_corner_endgame() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let list = legal(&board);
        assert_eq!(list.len(), 15);
        assert!(list.contains(Move::new_castling(E1, H1)));
    }

    #[test]
    fn test_castling_blocked_by_attack() {
        // Rf2 covers f1, so the path test fails
        let board = Board::from_fen("4k3/8/8/8/8/8/5r2/4K2R w K - 0 1").unwrap();
        assert!(!board.in_check());
        assert!(quiets(&board).moves().all(|m| !m.is_castling()));
    }

    #[test]
    fn test_perft_suite_position_three() {
        let board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        let list = legal(&board);
        assert_eq!(list.len(), 14);
        assert!(list.moves().all(|m| !m.is_en_passant()));
    }

    #[test]
    fn test_captures_include_en_passant() {
        let board =
            Board::from_fen("rnbqkbnr/pp1ppppp/8/2pP4/8/8/PPP1PPPP/RNBQKBNR w KQkq c6 0 3")
                .unwrap();
        let list = captures(&board);
        assert!(list.contains(Move::new_en_passant(D5, C6)));
    }

    #[test]
    fn test_no_moves_when_mated_or_stalemated() {
        // Fool's mate
        let board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(board.in_check());
        assert_eq!(legal(&board).len(), 0);

        // Stalemate
        let board = Board::from_fen("k7/8/KQ6/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!board.in_check());
        assert_eq!(legal(&board).len(), 0);
    }

    #[test]
    fn test_evasions_block_and_step() {
        let board = Board::from_fen("4r2k/8/8/8/8/8/7R/4K3 w - - 0 1").unwrap();
        let list = legal(&board);
        let expected: HashSet<Move> = [
            Move::new(E1, D1),
            Move::new(E1, D2),
            Move::new(E1, F1),
            Move::new(E1, F2),
            Move::new(H2, E2),
        ]
        .into_iter()
        .collect();
        assert_eq!(move_set(&list), expected);
    }

    #[test]
    fn test_evasions_double_check_only_king_moves() {
        let board = Board::from_fen("4rk2/8/8/8/8/6b1/8/4K3 w - - 0 1").unwrap();
        assert!(board.checkers().more_than_one());
        let list = legal(&board);
        assert!(list.len() > 0);
        assert!(list.moves().all(|m| m.from() == E1));
    }

    #[test]
    fn test_en_passant_evasion() {
        // The double-pushed d-pawn checks the king; cxd3 removes it
        let board = Board::from_fen("8/8/8/2k5/2pP4/8/8/4K3 b - d3 0 1").unwrap();
        assert!(board.in_check());
        let list = legal(&board);
        assert!(list.contains(Move::new_en_passant(C4, D3)));
    }

    #[test]
    fn test_evasion_correctness_probe() {
        for fen in [
            "4r2k/8/8/8/8/8/7R/4K3 w - - 0 1",
            "4rk2/8/8/8/8/6b1/8/4K3 w - - 0 1",
            "8/8/8/2k5/2pP4/8/8/4K3 b - d3 0 1",
            "rnb1kbnr/pppp1ppp/8/8/5q2/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1",
        ] {
            assert_all_resolve(fen);
        }
    }

    #[test]
    fn test_quiet_checks_discovered_knight() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4N3/4RK2 w - - 0 1").unwrap();
        let list = quiet_checks(&board);
        let expected: HashSet<Move> = [
            Move::new(E2, C1),
            Move::new(E2, C3),
            Move::new(E2, D4),
            Move::new(E2, F4),
            Move::new(E2, G1),
            Move::new(E2, G3),
        ]
        .into_iter()
        .collect();
        assert_eq!(move_set(&list), expected);
    }

    #[test]
    fn test_quiet_checks_direct_rook() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K3 w - - 0 1").unwrap();
        let list = quiet_checks(&board);
        assert_eq!(move_set(&list), HashSet::from([Move::new(A1, A8)]));
    }

    #[test]
    fn test_quiet_checks_knight_promotion() {
        let board = Board::from_fen("8/3P4/4k3/8/8/8/8/4K3 w - - 0 1").unwrap();
        let list = quiet_checks(&board);
        assert_eq!(
            move_set(&list),
            HashSet::from([Move::new_promotion(D7, D8, PieceType::Knight)])
        );
    }

    #[test]
    fn test_quiet_checks_castling() {
        let board = Board::from_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let list = quiet_checks(&board);
        // The rook checks from f1 or h8 on its own, and castling drops it
        // on f1 too
        let expected: HashSet<Move> = [
            Move::new(H1, F1),
            Move::new(H1, H8),
            Move::new_castling(E1, H1),
        ]
        .into_iter()
        .collect();
        assert_eq!(move_set(&list), expected);
    }

    #[test]
    fn test_quiet_checks_soundness_probe() {
        for fen in [
            KIWIPETE_FEN,
            "4k3/8/8/8/8/8/4N3/4RK2 w - - 0 1",
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        ] {
            let mut board = Board::from_fen(fen).unwrap();
            for mv in quiet_checks(&board).moves().collect::<Vec<_>>() {
                assert!(!board.capture(mv), "{mv} captures in quiet checks");
                assert!(board.gives_check(mv), "{mv} does not give check");
                if board.legal(mv) {
                    board.make_move(mv);
                    assert!(board.in_check(), "{mv} made but no check on the board");
                    board.undo_move(mv);
                }
            }
        }
    }

    #[test]
    fn test_chess960_hidden_checker() {
        // The queen on a1 stands behind the castling rook: castling would
        // leave the king in check once the rook clears b1
        let board = Board::from_fen("4k3/8/8/8/8/8/8/qRK5 w B - 0 1").unwrap();
        assert!(board.is_chess960());
        assert!(!board.in_check());
        assert!(quiets(&board).moves().all(|m| !m.is_castling()));

        // Without the lurker the same castle is fine
        let board = Board::from_fen("4k3/8/8/8/8/8/8/1RK5 w B - 0 1").unwrap();
        assert!(quiets(&board).moves().any(|m| m.is_castling()));
    }

    /******************************************\
    |               Variant tests              |
    \******************************************/

    #[test]
    fn test_anti_capture_obligation() {
        let board =
            Board::from_variant_fen(Variant::Anti, "8/8/8/3p4/4P3/8/8/8 w - - 0 1").unwrap();
        let list = legal(&board);
        assert_eq!(move_set(&list), HashSet::from([Move::new(E4, D5)]));
    }

    #[test]
    fn test_anti_promotions_include_king() {
        let board =
            Board::from_variant_fen(Variant::Anti, "7n/3P4/8/8/8/8/8/8 w - - 0 1").unwrap();
        let list = legal(&board);
        assert_eq!(list.len(), 5);
        assert!(list.contains(Move::new_promotion(D7, D8, PieceType::King)));
        assert!(list.contains(Move::new_promotion(D7, D8, PieceType::Queen)));
    }

    #[test]
    fn test_anti_all_kings_move() {
        let board =
            Board::from_variant_fen(Variant::Anti, "k7/8/8/8/8/8/8/K2K4 w - - 0 1").unwrap();
        let list = legal(&board);
        // Both "kings" are plain pieces with king movement
        assert_eq!(list.len(), 8);
        assert!(list.contains(Move::new(A1, B2)));
        assert!(list.contains(Move::new(D1, E2)));
    }

    #[test]
    fn test_atomic_captures_spare_own_king() {
        // Rxe2 would blast the own king, so Captures offers nothing
        let board =
            Board::from_variant_fen(Variant::Atomic, "4k3/8/8/8/8/8/1R2b3/4K3 w - - 0 1").unwrap();
        assert_eq!(captures(&board).len(), 0);
    }

    #[test]
    fn test_atomic_winning_blast_counts_as_evasion() {
        // White is in check, but Nxf7 explodes the black king and wins
        let board = Board::from_variant_fen(
            Variant::Atomic,
            "4k3/5p2/8/6N1/8/8/4r3/4K3 w - - 0 1",
        )
        .unwrap();
        assert!(board.in_check());
        let list = legal(&board);
        let expected: HashSet<Move> = [
            Move::new(G5, F7),
            Move::new(E1, D1),
            Move::new(E1, F1),
        ]
        .into_iter()
        .collect();
        assert_eq!(move_set(&list), expected);
    }

    #[test]
    fn test_house_drops_block_checks() {
        let board = Board::from_variant_fen(
            Variant::Crazyhouse,
            "4r2k/8/8/8/8/8/8/4K3[N] w - - 0 1",
        )
        .unwrap();
        assert!(board.in_check());
        let list = legal(&board);
        assert_eq!(list.len(), 10);
        assert_eq!(list.moves().filter(|m| m.is_drop()).count(), 6);
        assert!(list.contains(Move::new_drop(PieceType::Knight, E4)));
        assert!(!list.contains(Move::new_drop(PieceType::Knight, E8)));
    }

    #[test]
    fn test_house_pawn_drops_avoid_back_ranks() {
        let board = Board::from_variant_fen(
            Variant::Crazyhouse,
            "k7/8/8/8/8/8/8/K7[P] w - - 0 1",
        )
        .unwrap();
        let list = legal(&board);
        assert_eq!(list.len(), 51);
        for mv in list.moves().filter(Move::is_drop) {
            let rank = mv.to().rank();
            assert!(rank != Rank::Rank1 && rank != Rank::Rank8);
        }
    }

    #[test]
    fn test_house_quiet_check_drops() {
        let board = Board::from_variant_fen(
            Variant::Crazyhouse,
            "4k3/8/8/8/8/8/8/4K3[N] w - - 0 1",
        )
        .unwrap();
        let list = quiet_checks(&board);
        let expected: HashSet<Move> = [C7, D6, F6, G7]
            .into_iter()
            .map(|sq| Move::new_drop(PieceType::Knight, sq))
            .collect();
        assert_eq!(move_set(&list), expected);
    }

    #[test]
    fn test_horde_first_rank_double_push() {
        let board =
            Board::from_variant_fen(Variant::Horde, "k7/8/8/8/8/8/8/4P3 w - - 0 1").unwrap();
        let list = legal(&board);
        let expected: HashSet<Move> =
            [Move::new(E1, E2), Move::new(E1, E3)].into_iter().collect();
        assert_eq!(move_set(&list), expected);
    }

    #[test]
    fn test_losers_obligation_filters_target() {
        let board = Board::from_variant_fen(
            Variant::Losers,
            "8/8/8/8/4p3/2p5/4N3/4K3 w - - 0 1",
        )
        .unwrap();
        let list = legal(&board);
        assert_eq!(move_set(&list), HashSet::from([Move::new(E2, C3)]));
    }

    #[test]
    fn test_race_forward_cone_split() {
        let board =
            Board::from_variant_fen(Variant::Race, "8/8/8/k7/8/8/6R1/7K w - - 0 1").unwrap();

        // Forward king steps are "captures": they approach the goal
        let caps = captures(&board);
        assert_eq!(move_set(&caps), HashSet::from([Move::new(H1, H2)]));

        let quiet = quiets(&board);
        assert!(quiet.contains(Move::new(H1, G1)));
        assert!(!quiet.contains(Move::new(H1, H2)));
    }

    #[test]
    fn test_race_has_no_evasions_or_checks() {
        let board = Board::start_position(Variant::Race);
        let mut list = MoveList::new();
        generate_evasions(&board, &mut list);
        assert!(list.is_empty());
        generate_quiet_checks(&board, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_race_startpos_legal_count() {
        let board = Board::start_position(Variant::Race);
        assert_eq!(legal(&board).len(), 21);
    }

    #[test]
    fn test_relay_borrows_defender_moves() {
        // Nc3 defends Be2, which therefore also jumps like a knight
        let board = Board::from_variant_fen(
            Variant::Relay,
            "k7/8/8/8/8/2N5/4B3/K7 w - - 0 1",
        )
        .unwrap();
        let list = non_evasions(&board);
        assert!(list.contains(Move::new(E2, D4)), "knight-jump missing");
        assert!(list.contains(Move::new(E2, G1)), "knight-jump missing");
        assert!(!list.contains(Move::new(E2, E5)), "rook relay from nowhere");
        // The usual bishop fare is still there
        assert!(list.contains(Move::new(E2, H5)));
    }
}
