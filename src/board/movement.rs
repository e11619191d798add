use super::Board;
use super::movegen::king_attack;
use crate::core::*;

impl Board {
    #[inline]
    pub(crate) fn add_piece(&mut self, piece: Piece, square: Square) {
        debug_assert!(self.on(square).is_none(), "add_piece: 'square' is occupied");
        self.board[square.index()] = Some(piece);

        self.pieces[piece.pt().index()].set(square);
        self.occupied[piece.colour().index()].set(square);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, square: Square) {
        debug_assert!(self.on(square).is_some(), "remove_piece: 'square' is empty");
        let piece = unsafe { self.on(square).unwrap_unchecked() };

        self.board[square.index()] = None;

        self.pieces[piece.pt().index()].clear(square);
        self.occupied[piece.colour().index()].clear(square);
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        debug_assert!(self.on(from).is_some(), "move_piece: 'from' square is empty");
        let piece = unsafe { self.on(from).unwrap_unchecked() };

        self.board[from.index()] = None;

        self.board[to.index()] = Some(piece);

        self.pieces[piece.pt().index()].clear(from);
        self.pieces[piece.pt().index()].set(to);

        self.occupied[piece.colour().index()].clear(from);
        self.occupied[piece.colour().index()].set(to);
    }

    #[inline]
    fn set_ep(&mut self, from: Square) {
        let us = self.stm();

        let ep_sq = unsafe { from.add_unchecked(us.forward()) };
        self.state.enpassant = Some(ep_sq);
        self.state.keys.toggle_ep(ep_sq.file());
    }

    /// King and rook destinations for castling on `right`
    #[inline]
    fn castle_destinations(&self, us: Colour, right: Castling) -> (Square, Square) {
        if right.is_king_side() {
            (Square::G1.relative(us), Square::F1.relative(us))
        } else {
            (Square::C1.relative(us), Square::D1.relative(us))
        }
    }

    /// Which single right a castling move between these squares exercises.
    /// The king-side rook always starts east of the king, in Chess960 too.
    #[inline]
    fn castle_right_of(&self, us: Colour, kfrom: Square, rfrom: Square) -> Castling {
        if rfrom > kfrom {
            Castling::king_side(us)
        } else {
            Castling::queen_side(us)
        }
    }

    #[inline]
    fn do_castle(&mut self, us: Colour, kfrom: Square, rfrom: Square) {
        let right = self.castle_right_of(us, kfrom, rfrom);
        let (kto, rto) = self.castle_destinations(us, right);

        let king = unsafe { self.on(kfrom).unwrap_unchecked() };
        let rook = unsafe { self.on(rfrom).unwrap_unchecked() };

        // Remove both before re-adding: in Chess960 the destinations may
        // overlap the start squares
        self.remove_piece(kfrom);
        self.remove_piece(rfrom);
        self.add_piece(king, kto);
        self.add_piece(rook, rto);

        self.state.keys.toggle_piece(king, kfrom);
        self.state.keys.toggle_piece(king, kto);
        self.state.keys.toggle_piece(rook, rfrom);
        self.state.keys.toggle_piece(rook, rto);
    }

    #[inline]
    fn undo_castle(&mut self, us: Colour, kfrom: Square, rfrom: Square) {
        let right = self.castle_right_of(us, kfrom, rfrom);
        let (kto, rto) = self.castle_destinations(us, right);

        let king = unsafe { self.on(kto).unwrap_unchecked() };
        let rook = unsafe { self.on(rto).unwrap_unchecked() };

        self.remove_piece(kto);
        self.remove_piece(rto);
        self.add_piece(king, kfrom);
        self.add_piece(rook, rfrom);
    }

    #[inline]
    fn update_castle_rights(&mut self, from: Square, to: Square) {
        self.state.keys.toggle_castle(self.state.castle);

        self.state
            .castle
            .mask(self.castling_rights(from) & self.castling_rights(to));

        self.state.keys.toggle_castle(self.state.castle);
    }

    /// Removes the whole blast around a capture on `to`: the capturer and
    /// every non-pawn piece on an adjacent square. The victims are pushed
    /// onto the state's blast record so `undo_move` can restore them.
    fn explode(&mut self, to: Square) {
        debug_assert!(self.is_atomic(), "Blasts only happen in atomic chess");

        let blast =
            (king_attack(to) & self.all_occupied_bb() & !self.piecetype_bb(PieceType::Pawn))
                | to.bb();

        blast.for_each(|sq| {
            let piece = unsafe { self.on(sq).unwrap_unchecked() };
            self.remove_piece(sq);
            self.state.keys.toggle_piece(piece, sq);
            self.state.promoted.clear(sq);
            self.state.exploded.push((sq, piece));
            self.update_castle_rights(sq, sq);
        });
    }

    #[inline]
    fn update_repetitions(&mut self) {
        self.state.repetitions = 0;

        let roll_back: usize = 1 + self.state.fifty_move as usize;

        let iterator = self
            .history
            .iter()
            .rev()
            .enumerate()
            .take(roll_back)
            .skip(1)
            .step_by(2);

        for (idx, state) in iterator {
            if state.keys.key == self.state.keys.key {
                if state.repetitions == 0 {
                    self.state.repetitions = idx as i8;
                } else {
                    self.state.repetitions = -(idx as i8);
                }
                break;
            }
        }
    }

    fn store_state(&mut self) {
        let state = self.state.snapshot();
        let old = std::mem::replace(&mut self.state, state);
        self.history.push(old);
    }

    /// # Make a move
    ///
    /// Applies a pseudo-legal `mv` for the side to move, pushing the
    /// previous state onto the history stack and refreshing keys and the
    /// generation masks. Legality is the caller's business.
    pub fn make_move(&mut self, mv: Move) {
        self.store_state();

        self.half_moves += 1;
        self.state.fifty_move += 1;

        let us = self.stm;
        let them = !us;

        if let Some(ep_sq) = self.state.enpassant {
            self.state.keys.toggle_ep(ep_sq.file());
            self.state.enpassant = None;
        }

        match mv.kind() {
            MoveKind::Castling => {
                let kfrom = mv.from();
                let rfrom = mv.to();

                self.do_castle(us, kfrom, rfrom);
                self.update_castle_rights(kfrom, rfrom);
            }

            MoveKind::Drop => {
                let pt = mv.dropped_pt();
                let to = mv.to();
                let piece = Piece::from_parts(us, pt);

                let count = self.state.hand[us.index()][pt.index()];
                debug_assert!(count > 0, "make_move: dropping a piece not in hand");

                self.add_piece(piece, to);
                self.state.keys.toggle_piece(piece, to);
                self.state.keys.toggle_hand(piece, count);
                self.state.hand[us.index()][pt.index()] = count - 1;

                if pt == PieceType::Pawn {
                    self.state.fifty_move = 0;
                }
            }

            kind => {
                let from = mv.from();
                let to = mv.to();

                debug_assert!(self.on(from).is_some(), "make_move: 'from' square is empty");
                let piece = unsafe { self.on(from).unwrap_unchecked() };

                let capsq = if kind == MoveKind::EnPassant {
                    unsafe { to.add_unchecked(-us.forward()) }
                } else {
                    to
                };
                let captured = if kind == MoveKind::EnPassant {
                    Some(Piece::from_parts(them, PieceType::Pawn))
                } else {
                    self.on(to)
                };

                if let Some(captured_piece) = captured {
                    self.state.fifty_move = 0;
                    self.state.captured = Some(captured_piece);
                    self.state.captured_promoted = self.state.promoted.contains(capsq);

                    self.remove_piece(capsq);
                    self.state.keys.toggle_piece(captured_piece, capsq);
                    self.state.promoted.clear(capsq);

                    // Captured promoted pieces re-enter the hand as pawns
                    if self.is_house() {
                        let hand_pt = if self.state.captured_promoted {
                            PieceType::Pawn
                        } else {
                            captured_piece.pt()
                        };
                        let hand_piece = Piece::from_parts(us, hand_pt);
                        let count = self.state.hand[us.index()][hand_pt.index()] + 1;
                        self.state.hand[us.index()][hand_pt.index()] = count;
                        self.state.keys.toggle_hand(hand_piece, count);
                    }
                }

                match kind {
                    MoveKind::Promotion => {
                        self.state.fifty_move = 0;

                        let promo_piece = Piece::from_parts(us, mv.promotion_pt());

                        self.remove_piece(from);
                        self.state.keys.toggle_piece(piece, from);

                        self.add_piece(promo_piece, to);
                        self.state.keys.toggle_piece(promo_piece, to);

                        if self.is_house() {
                            self.state.promoted.set(to);
                        }
                    }
                    _ => {
                        self.move_piece(from, to);

                        self.state.keys.toggle_piece(piece, from);
                        self.state.keys.toggle_piece(piece, to);

                        if self.state.promoted.contains(from) {
                            self.state.promoted.clear(from);
                            self.state.promoted.set(to);
                        }

                        if piece.pt() == PieceType::Pawn {
                            self.state.fifty_move = 0;

                            // A double push from the second rank opens an
                            // en-passant window (horde pushes from the
                            // first rank do not)
                            if Square::rank_dist(from, to) == 2
                                && Bitboard::push_rank(us).contains(from)
                            {
                                self.set_ep(from);
                            }
                        }
                    }
                }

                if self.is_atomic() && captured.is_some() {
                    self.explode(to);
                }

                self.update_castle_rights(from, to);
            }
        }

        self.stm = them;

        self.state.keys.toggle_side();

        self.update_masks();

        self.update_repetitions();
    }

    /// # Undo a move
    ///
    /// Restores the position from before `make_move(mv)`.
    pub fn undo_move(&mut self, mv: Move) {
        self.stm = !self.stm;

        self.half_moves -= 1;

        let us = self.stm;

        let captured = self.state.captured;
        let exploded = std::mem::take(&mut self.state.exploded);

        self.state = self.history.pop().unwrap();

        // Put blast victims back first; the capturer reappears on its
        // destination square so the per-kind undo below applies unchanged
        for &(sq, piece) in exploded.iter().rev() {
            self.add_piece(piece, sq);
        }

        match mv.kind() {
            MoveKind::Castling => {
                self.undo_castle(us, mv.from(), mv.to());
            }

            MoveKind::Drop => {
                self.remove_piece(mv.to());
                // The hand count comes back with the popped state
            }

            MoveKind::EnPassant => {
                self.move_piece(mv.to(), mv.from());

                let cap_sq = unsafe { mv.to().add_unchecked(-us.forward()) };
                self.add_piece(Piece::from_parts(!us, PieceType::Pawn), cap_sq);
            }

            MoveKind::Promotion => {
                self.remove_piece(mv.to());
                self.add_piece(Piece::from_parts(us, PieceType::Pawn), mv.from());

                if let Some(captured_piece) = captured {
                    self.add_piece(captured_piece, mv.to());
                }
            }

            MoveKind::Normal => {
                self.move_piece(mv.to(), mv.from());

                if let Some(captured_piece) = captured {
                    self.add_piece(captured_piece, mv.to());
                }
            }
        }
    }

    /// Passes the turn without moving. Used by search heuristics.
    pub fn make_null_move(&mut self) {
        self.store_state();

        if let Some(ep_sq) = self.state.enpassant {
            self.state.keys.toggle_ep(ep_sq.file());
            self.state.enpassant = None;
        }

        self.state.fifty_move = 0;

        self.state.keys.toggle_side();

        self.stm = !self.stm;

        self.update_masks();
    }

    pub fn undo_null_move(&mut self) {
        self.stm = !self.stm;

        self.state = self.history.pop().unwrap();
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
