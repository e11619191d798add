//! Per-variant move legality, check detection for prospective moves, and
//! the capture-obligation and terminal-state predicates the generators
//! consult.

use super::Board;
use super::movegen::*;
use crate::core::*;

impl Board {
    /// # Legality of a generated pseudo-legal move
    ///
    /// `mv` must come from this position's pseudo-legal generation; the
    /// test settles only what pseudo-legality leaves open (pins, king
    /// safety, blasts, the racing-kings check ban).
    pub fn legal(&self, mv: Move) -> bool {
        match self.variant() {
            // No royalty, no legality constraints beyond movement
            Variant::Anti => true,
            Variant::Atomic => self.atomic_legal(mv),
            // Giving check is banned outright in racing kings
            Variant::Race => self.standard_legal(mv) && !self.gives_check(mv),
            _ => self.standard_legal(mv),
        }
    }

    /// Orthodox legality: en-passant discovery, king destination safety,
    /// pin alignment. Castling was fully vetted during generation and
    /// drops cannot expose anything, so both pass through.
    fn standard_legal(&self, mv: Move) -> bool {
        let us = self.stm();
        let them = !us;

        let Some(ksq) = self.king_sq(us) else {
            // A kingless side (the horde) has nothing to expose
            return true;
        };

        match mv.kind() {
            MoveKind::Drop | MoveKind::Castling => true,

            MoveKind::EnPassant => {
                let from = mv.from();
                let to = mv.to();
                let capsq = unsafe { to.add_unchecked(-us.forward()) };
                let occ = (self.all_occupied_bb() ^ from.bb() ^ capsq.bb()) | to.bb();

                (rook_attacks(ksq, occ) & self.rook_queen_bb(them)).is_empty()
                    && (bishop_attacks(ksq, occ) & self.bishop_queen_bb(them)).is_empty()
            }

            _ => {
                let from = mv.from();
                let to = mv.to();

                if from == ksq {
                    // Probe with the king lifted so sliders see through it
                    let occ = self.all_occupied_bb() ^ from.bb();
                    return (self.attackers_to(to, occ) & self.occupied_bb(them)).is_empty();
                }

                !self.pinned(us).contains(from) || aligned(from, to, ksq)
            }
        }
    }

    /// Atomic legality. A capture is illegal if the blast reaches the own
    /// king and unconditionally winning if it reaches the opposing one;
    /// otherwise the position after the blast must leave the own king
    /// unattacked. Adjacent kings suspend every check.
    fn atomic_legal(&self, mv: Move) -> bool {
        let us = self.stm();
        let them = !us;

        let (Some(our_ksq), Some(their_ksq)) = (self.king_sq(us), self.king_sq(them)) else {
            return true;
        };

        if mv.is_castling() {
            return true;
        }

        let from = mv.from();
        let to = mv.to();
        let is_capture = mv.is_en_passant() || self.on(to).is_some();

        if is_capture {
            if sq_dist(our_ksq, to) <= 1 {
                return false;
            }
            if sq_dist(their_ksq, to) <= 1 {
                return true;
            }

            let capsq = if mv.is_en_passant() {
                unsafe { to.add_unchecked(-us.forward()) }
            } else {
                to
            };

            // Occupancy after the blast: capturer, victim and all
            // adjacent non-pawns are gone
            let mut occ = self.all_occupied_bb();
            occ.clear(from);
            occ.clear(capsq);
            occ &= !(king_attack(to) & !self.piecetype_bb(PieceType::Pawn));

            if sq_dist(our_ksq, their_ksq) <= 1 {
                return true;
            }

            (self.attackers_to(our_ksq, occ) & self.occupied_bb(them) & occ).is_empty()
        } else {
            if from == our_ksq {
                // Moving beside the opposing king is always safe
                if sq_dist(to, their_ksq) <= 1 {
                    return true;
                }
                let occ = self.all_occupied_bb() ^ from.bb();
                return (self.attackers_to(to, occ) & self.occupied_bb(them)).is_empty();
            }

            if sq_dist(our_ksq, their_ksq) <= 1 {
                return true;
            }

            !self.pinned(us).contains(from) || aligned(from, to, our_ksq)
        }
    }

    /// # Whether `mv` gives check to the opposing king
    pub fn gives_check(&self, mv: Move) -> bool {
        let us = self.stm();
        let them = !us;

        let Some(their_ksq) = self.king_sq(them) else {
            return false;
        };

        if mv.is_drop() {
            return self.check_squares(mv.dropped_pt()).contains(mv.to());
        }

        let from = mv.from();
        let to = mv.to();

        debug_assert!(self.on(from).is_some());
        let pt = unsafe { self.on(from).unwrap_unchecked() }.pt();

        // Direct check
        if self.check_squares(pt).contains(to) {
            return true;
        }

        // Discovered check
        if self.discovered_check_candidates().contains(from) && !aligned(from, to, their_ksq) {
            return true;
        }

        match mv.kind() {
            MoveKind::Normal => false,

            MoveKind::Promotion => {
                let occ = self.all_occupied_bb() ^ from.bb();
                (attacks(us, mv.promotion_pt(), to, occ) & their_ksq.bb()).is_occupied()
            }

            // The vacated pair of squares may open a line onto the king
            MoveKind::EnPassant => {
                let capsq = unsafe { to.add_unchecked(-us.forward()) };
                let occ = (self.all_occupied_bb() ^ from.bb() ^ capsq.bb()) | to.bb();

                (rook_attacks(their_ksq, occ) & self.rook_queen_bb(us)).is_occupied()
                    || (bishop_attacks(their_ksq, occ) & self.bishop_queen_bb(us)).is_occupied()
            }

            MoveKind::Castling => {
                let kingside = to > from;
                let kto = if kingside { Square::G1 } else { Square::C1 }.relative(us);
                let rto = if kingside { Square::F1 } else { Square::D1 }.relative(us);

                pseudo_attack(PieceType::Rook, rto).contains(their_ksq)
                    && (rook_attacks(
                        rto,
                        (self.all_occupied_bb() ^ from.bb() ^ to.bb()) | rto.bb() | kto.bb(),
                    ) & their_ksq.bb())
                    .is_occupied()
            }

            MoveKind::Drop => unreachable!(),
        }
    }

    /// Whether `mv` takes a piece off the board
    #[inline]
    pub fn capture(&self, mv: Move) -> bool {
        mv.is_en_passant()
            || (!mv.is_castling() && !mv.is_drop() && self.on(mv.to()).is_some())
    }

    /// # Antichess capture obligation
    ///
    /// Whether the side to move has any capture at all. In antichess
    /// every capture is playable, so attack contact is enough.
    pub fn can_capture(&self) -> bool {
        let us = self.stm();
        let them = !us;
        let occ = self.all_occupied_bb();
        let enemies = self.occupied_bb(them);

        if let Some(ep_sq) = self.ep() {
            if (self.piece_bb(us, PieceType::Pawn) & pawn_attack(them, ep_sq)).is_occupied() {
                return true;
            }
        }

        for pt in PieceType::iter() {
            let mut pieces = self.piece_bb(us, pt);
            while let Some(from) = pieces.pop_lsb() {
                if (attacks(us, pt, from, occ) & enemies).is_occupied() {
                    return true;
                }
            }
        }

        false
    }

    /// # Losers capture obligation
    ///
    /// Whether the side to move has a capture that is also fully legal
    /// (the king is royal in losers, so pins and checks still bind).
    pub fn can_capture_losers(&self) -> bool {
        let us = self.stm();
        let them = !us;
        let occ = self.all_occupied_bb();
        let enemies = self.occupied_bb(them);

        if let Some(ep_sq) = self.ep() {
            let mut pawns = self.piece_bb(us, PieceType::Pawn) & pawn_attack(them, ep_sq);
            while let Some(from) = pawns.pop_lsb() {
                if self.capture_resolves(Move::new_en_passant(from, ep_sq)) {
                    return true;
                }
            }
        }

        for pt in PieceType::iter() {
            let mut pieces = self.piece_bb(us, pt);
            while let Some(from) = pieces.pop_lsb() {
                let mut targets = attacks(us, pt, from, occ) & enemies;
                while let Some(to) = targets.pop_lsb() {
                    if self.capture_resolves(Move::new(from, to)) {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Whether a candidate capture is legal, including while in check:
    /// it must then either be a safe king move or take the lone checker.
    fn capture_resolves(&self, mv: Move) -> bool {
        if !self.standard_legal(mv) {
            return false;
        }

        let checkers = self.checkers();
        if checkers.is_empty() {
            return true;
        }

        if self.king_sq(self.stm()) == Some(mv.from()) {
            return true;
        }

        if checkers.more_than_one() {
            return false;
        }

        let checksq = checkers.lsb_unchecked();
        if mv.is_en_passant() {
            let capsq = unsafe { mv.to().add_unchecked(-self.stm().forward()) };
            capsq == checksq
        } else {
            mv.to() == checksq
        }
    }

    /// # Terminal variant states
    ///
    /// Whether the game is already decided by a variant rule; checkmate
    /// and stalemate fall out of an empty legal move list instead.
    pub fn is_variant_end(&self) -> bool {
        match self.variant() {
            Variant::Standard | Variant::Crazyhouse | Variant::Relay => false,
            Variant::Anti | Variant::Losers => self.occupied_bb(self.stm()).is_empty(),
            Variant::Atomic => {
                self.king_sq(Colour::White).is_none() || self.king_sq(Colour::Black).is_none()
            }
            Variant::Horde => {
                self.occupied_bb(Colour::White).is_empty()
                    || self.occupied_bb(Colour::Black).is_empty()
            }
            Variant::Race => {
                (self.piecetype_bb(PieceType::King) & Bitboard::RANK_8).is_occupied()
            }
        }
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
