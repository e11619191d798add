use super::init::*;
use crate::core::{Bitboard, Colour, Direction, PieceType, Square};

/******************************************\
|==========================================|
|              Type Definitions            |
|==========================================|
\******************************************/

pub(super) type AttackTable = [Bitboard; Square::NUM];

type PawnAttackTable = [[Bitboard; Square::NUM]; Colour::NUM];

pub(super) type SquarePairTable = [[Bitboard; Square::NUM]; Square::NUM];

pub(super) type DistanceTable = [[u8; Square::NUM]; Square::NUM];

/******************************************\
|==========================================|
|              Attack Tables               |
|==========================================|
\******************************************/

use Direction::*;

use super::magic::{BISHOP_MAGICS, BISHOP_TABLE, ROOK_MAGICS, ROOK_TABLE};

const PAWN_ATTACKS: PawnAttackTable = [
    init_pseudo_attacks(&[NE, NW]),
    init_pseudo_attacks(&[SE, SW]),
];

const KNIGHT_ATTACKS: AttackTable = init_pseudo_attacks(&[NNE, NNW, NEE, NWW, SEE, SWW, SSE, SSW]);

const KING_ATTACKS: AttackTable = init_pseudo_attacks(&[N, NE, NW, E, W, SE, SW, S]);

/******************************************\
|==========================================|
|              Lookup Tables               |
|==========================================|
\******************************************/

const LINE_BB: SquarePairTable = init_line_bb_table();

const BETWEEN_BB: SquarePairTable = init_between_bb_table();

const PIN_BB: SquarePairTable = init_pin_bb_table();

const DIST: DistanceTable = init_dist_table();

/******************************************\
|==========================================|
|               Get Attacks                |
|==========================================|
\******************************************/

#[inline]
pub fn pawn_attack(col: Colour, sq: Square) -> Bitboard {
    unsafe {
        *PAWN_ATTACKS
            .get_unchecked(col.index())
            .get_unchecked(sq.index())
    }
}

#[inline]
pub fn knight_attack(sq: Square) -> Bitboard {
    unsafe { *KNIGHT_ATTACKS.get_unchecked(sq.index()) }
}

#[inline]
pub fn king_attack(sq: Square) -> Bitboard {
    unsafe { *KING_ATTACKS.get_unchecked(sq.index()) }
}

#[inline]
pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    unsafe { *BISHOP_TABLE.get_unchecked(BISHOP_MAGICS[sq.index()].index(occ)) }
}

#[inline]
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    unsafe { *ROOK_TABLE.get_unchecked(ROOK_MAGICS[sq.index()].index(occ)) }
}

#[inline]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    bishop_attacks(sq, occ) | rook_attacks(sq, occ)
}

/// Attacks of `pt` from `sq` on an occupied board; `col` matters for pawns
/// only.
#[inline]
pub fn attacks(col: Colour, pt: PieceType, sq: Square, occ: Bitboard) -> Bitboard {
    match pt {
        PieceType::Pawn => pawn_attack(col, sq),
        PieceType::Knight => knight_attack(sq),
        PieceType::King => king_attack(sq),
        PieceType::Bishop => bishop_attacks(sq, occ),
        PieceType::Rook => rook_attacks(sq, occ),
        PieceType::Queen => queen_attacks(sq, occ),
    }
}

/// Attacks of a non-pawn `pt` on an empty board
#[inline]
pub fn pseudo_attack(pt: PieceType, sq: Square) -> Bitboard {
    attacks(Colour::White, pt, sq, Bitboard::EMPTY)
}

/******************************************\
|==========================================|
|           Get Bitboard Lookups           |
|==========================================|
\******************************************/

/// The full line through two aligned squares, endpoints included
#[inline]
pub fn line_bb(from: Square, to: Square) -> Bitboard {
    LINE_BB[from.index()][to.index()]
}

/// The squares strictly between two aligned squares
#[inline]
pub fn between_bb(from: Square, to: Square) -> Bitboard {
    BETWEEN_BB[from.index()][to.index()]
}

/// `between_bb(king, pinner)` plus the pinner square itself
#[inline]
pub fn pin_bb(king: Square, pinner: Square) -> Bitboard {
    PIN_BB[king.index()][pinner.index()]
}

/// Chebyshev distance between two squares
#[inline]
pub fn sq_dist(sq1: Square, sq2: Square) -> u8 {
    DIST[sq1.index()][sq2.index()]
}

/// Whether three squares lie on one rank, file or diagonal
#[inline]
pub fn aligned(sq1: Square, sq2: Square, sq3: Square) -> bool {
    line_bb(sq1, sq2).contains(sq3)
}
