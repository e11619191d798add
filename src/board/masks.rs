use super::Board;
use super::movegen::*;
use crate::core::*;

/******************************************\
|==========================================|
|              Castling Mask               |
|==========================================|
\******************************************/

/// Per-square castling bookkeeping, filled in while parsing the FEN
/// castling field. `castling[sq]` holds the rights that survive a move
/// touching `sq`; the slot arrays are indexed WK, WQ, BK, BQ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastlingMask {
    pub castling: [Castling; Square::NUM],

    pub rook_sq: [Option<Square>; 4],

    pub king_sq: [Option<Square>; 4],

    /// Squares that must be empty for the castle: the king and rook
    /// tracks to their destinations, the pieces themselves excluded
    pub path: [Bitboard; 4],
}

impl Default for CastlingMask {
    fn default() -> Self {
        Self {
            castling: [Castling::ALL; Square::NUM],
            rook_sq: [None; 4],
            king_sq: [None; 4],
            path: [Bitboard::EMPTY; 4],
        }
    }
}

/******************************************\
|==========================================|
|             Attack Queries               |
|==========================================|
\******************************************/

impl Board {
    /// All pieces of either colour attacking `to` under the given
    /// occupancy
    pub fn attackers_to(&self, to: Square, occ: Bitboard) -> Bitboard {
        use crate::core::{Colour::*, PieceType::*};
        pawn_attack(White, to) & self.piece_bb(Black, Pawn)
            | pawn_attack(Black, to) & self.piece_bb(White, Pawn)
            | knight_attack(to) & self.piecetype_bb(Knight)
            | bishop_attacks(to, occ) & self.piecetype_bb(Bishop)
            | rook_attacks(to, occ) & self.piecetype_bb(Rook)
            | queen_attacks(to, occ) & self.piecetype_bb(Queen)
            | king_attack(to) & self.piecetype_bb(King)
    }

    /// Attacks of the piece standing on `from`
    #[inline]
    pub fn attacks_from(&self, pt: PieceType, col: Colour, from: Square) -> Bitboard {
        attacks(col, pt, from, self.all_occupied_bb())
    }
}

/******************************************\
|==========================================|
|              Check Info                  |
|==========================================|
\******************************************/

impl Board {
    /// Sliders of `sliders` that would attack `s` were the single piece
    /// between them removed. Returns (blockers, pinners).
    pub(crate) fn slider_blockers(&self, sliders: Bitboard, s: Square) -> (Bitboard, Bitboard) {
        let mut blockers = Bitboard::EMPTY;
        let mut pinners = Bitboard::EMPTY;

        let snipers = ((pseudo_attack(PieceType::Rook, s)
            & (self.piecetype_bb(PieceType::Rook) | self.piecetype_bb(PieceType::Queen)))
            | (pseudo_attack(PieceType::Bishop, s)
                & (self.piecetype_bb(PieceType::Bishop) | self.piecetype_bb(PieceType::Queen))))
            & sliders;

        let occupancy = self.all_occupied_bb() ^ snipers;

        snipers.for_each(|sniper| {
            let b = between_bb(s, sniper) & occupancy;

            if b.is_singleton() {
                blockers |= b;
                pinners.set(sniper);
            }
        });

        (blockers, pinners)
    }

    /// Opposing pieces checking `col`'s king. Kingless sides are never in
    /// check, and in atomic chess adjacent kings neutralise every check.
    fn calc_checkers(&self, col: Colour) -> Bitboard {
        let Some(ksq) = self.king_sq(col) else {
            return Bitboard::EMPTY;
        };

        if self.is_anti() {
            return Bitboard::EMPTY;
        }

        if self.is_atomic() {
            if let Some(their_ksq) = self.king_sq(!col) {
                if king_attack(ksq).contains(their_ksq) {
                    return Bitboard::EMPTY;
                }
            }
        }

        self.attackers_to(ksq, self.all_occupied_bb()) & self.occupied_bb(!col)
    }

    /// Recomputes checkers, blockers/pinners and check squares. Called
    /// after every make/unmake and FEN load.
    pub(crate) fn update_masks(&mut self) {
        let us = self.stm;
        let them = !us;

        self.state.checkers = self.calc_checkers(us);

        for col in Colour::iter() {
            (
                self.state.blockers[col.index()],
                self.state.pinners[col.index()],
            ) = match self.king_sq(col) {
                Some(ksq) if !self.is_anti() => {
                    self.slider_blockers(self.occupied_bb(!col), ksq)
                }
                _ => (Bitboard::EMPTY, Bitboard::EMPTY),
            };
        }

        self.state.check_squares = match self.king_sq(them) {
            Some(ksq) if !self.is_anti() => {
                let occ = self.all_occupied_bb();
                let bishop = bishop_attacks(ksq, occ);
                let rook = rook_attacks(ksq, occ);
                [
                    pawn_attack(them, ksq),
                    knight_attack(ksq),
                    bishop,
                    rook,
                    bishop | rook,
                    Bitboard::EMPTY,
                ]
            }
            _ => [Bitboard::EMPTY; PieceType::NUM],
        };
    }
}
