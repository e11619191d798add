//! FEN parsing and printing for the `Board`, including the X-FEN castling
//! forms used by Chess960, crazyhouse hands in brackets and `~`-marked
//! promoted pieces.

use thiserror::Error;

use super::Board;
use super::movegen::pin_bb;
use crate::core::*;

/******************************************\
|==========================================|
|            Useful fen strings            |
|==========================================|
\******************************************/

/// The standard chess starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
/// The "Kiwipete" test position.
pub const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
/// The horde starting position (white is the pawn horde).
pub const HORDE_FEN: &str =
    "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1";
/// The racing kings starting position.
pub const RACE_FEN: &str = "8/8/8/8/8/8/krbnNBRK/qrbnNBRQ w - - 0 1";

/******************************************\
|==========================================|
|               Parse Fen                  |
|==========================================|
\******************************************/

impl Board {
    pub const FEN_SECTIONS: usize = 6;

    /// # Set board state from a FEN string
    ///
    /// Clears the board and re-applies the position, keeping the variant
    /// tag. The piece placement field may carry a crazyhouse hand in
    /// brackets (`…/RNBQKBNR[QRn]`) and `~` markers after promoted
    /// pieces.
    ///
    /// ## Errors
    /// Returns `FenParseError` if the string does not have 6 fields or
    /// any field is malformed.
    pub fn set(&mut self, fen: &str) -> Result<(), FenParseError> {
        let parts: Vec<&str> = fen.split_whitespace().take(6).collect();

        if parts.len() != Self::FEN_SECTIONS {
            return Err(FenParseError::InvalidNumberOfFields);
        }

        *self = Board::new(self.variant);

        // --- 1. Piece placement, hand and promoted markers ---

        let mut file: u8 = 0;
        let mut rank: u8 = 7;
        let mut last_placed: Option<Square> = None;
        let mut tokens = parts[0].chars();

        while let Some(token) = tokens.next() {
            if file > 8 {
                return Err(FenParseError::InvalidRankFormat(
                    "Too many pieces on a rank or the skip was too big".to_string(),
                ));
            }

            match token {
                '/' => {
                    if file != 8 {
                        return Err(FenParseError::InvalidRankFormat(
                            "Rank ended prematurely before '/'".to_string(),
                        ));
                    }

                    file = 0;

                    if rank == 0 {
                        return Err(FenParseError::InvalidRankFormat(
                            "Too many rank separators ('/')".to_string(),
                        ));
                    }

                    rank -= 1;
                }
                '1'..='8' => {
                    file += token.to_digit(10).unwrap() as u8;
                }
                '~' => match last_placed {
                    Some(sq) => self.state.promoted.set(sq),
                    None => {
                        return Err(FenParseError::InvalidPiecePlacementChar('~'));
                    }
                },
                '[' => {
                    self.parse_hand(&mut tokens)?;
                    break;
                }
                _ => {
                    if token.is_ascii_digit() {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "Invalid skip digit '{}' (must be 1-8)",
                            token,
                        )));
                    }

                    if file >= 8 {
                        return Err(FenParseError::InvalidRankFormat(format!(
                            "Piece placement '{}' attempted beyond file H on rank {:?}",
                            token, rank
                        )));
                    }

                    // rank and file are constrained by the checks above
                    let square = Square::from_unchecked(rank * 8 + file);
                    let piece = token
                        .to_string()
                        .parse::<Piece>()
                        .map_err(|_| FenParseError::InvalidPiecePlacementChar(token))?;
                    self.add_piece(piece, square);
                    last_placed = Some(square);
                    file += 1;
                }
            }
        }

        if file != 8 || rank != 0 {
            return Err(FenParseError::InvalidRankFormat(
                "Fen string does not cover all 64 squares".to_string(),
            ));
        }

        // --- 2. Side to move ---
        match parts[1] {
            "w" => self.stm = Colour::White,
            "b" => self.stm = Colour::Black,
            _ => return Err(FenParseError::InvalidSideToMove(parts[1].to_string())),
        };

        // --- 3. Castling rights ---
        self.parse_castling(parts[2])?;

        // --- 4. En passant square ---
        match parts[3] {
            "-" => self.state.enpassant = None,
            _ => {
                let ep_sq: Square = parts[3]
                    .parse()
                    .map_err(|_| FenParseError::InvalidEnPassantSquare(parts[3].to_string()))?;

                if ep_sq.rank() != Rank::Rank3 && ep_sq.rank() != Rank::Rank6 {
                    return Err(FenParseError::InvalidEnPassantSquare(format!(
                        "{ep_sq} is not a valid en passant square"
                    )));
                }
                self.state.enpassant = Some(ep_sq);
            }
        }

        // --- 5. Halfmove clock ---
        self.state.fifty_move = parts[4]
            .parse()
            .map_err(|_| FenParseError::InvalidHalfmoveClock(parts[4].to_string()))?;

        // --- 6. Fullmove number ---
        let full_move_number: u16 = parts[5]
            .parse()
            .map_err(|_| FenParseError::InvalidFullmoveNumber(parts[5].to_string()))?;

        if full_move_number == 0 {
            return Err(FenParseError::InvalidFullmoveNumber(format!(
                "Fullmove number cannot be 0, found: {}",
                parts[5]
            )));
        }

        // Ply = (full moves - 1) * 2 + (1 if Black to move)
        self.half_moves = (full_move_number - 1) * 2 + (self.stm() as u16);

        // --- 7. Keys and generation masks ---
        self.state.keys.key = self.calc_key();
        self.state.keys.pawn_key = self.calc_pawn_key();
        self.state.keys.non_pawn_key = self.calc_non_pawn_key();

        self.update_masks();

        Ok(())
    }

    /// Board constructor from a standard-chess FEN string
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        Self::from_variant_fen(Variant::Standard, fen)
    }

    /// Board constructor from a FEN string under `variant` rules
    pub fn from_variant_fen(variant: Variant, fen: &str) -> Result<Self, FenParseError> {
        let mut board = Board::new(variant);
        board.set(fen)?;
        Ok(board)
    }

    /// Board for the usual starting position of `variant`
    pub fn start_position(variant: Variant) -> Self {
        let fen = match variant {
            Variant::Horde => HORDE_FEN,
            Variant::Race => RACE_FEN,
            _ => START_FEN,
        };
        // The bundled start strings always parse
        Self::from_variant_fen(variant, fen).unwrap()
    }

    /// Parses the bracketed hand that may follow the piece placement
    fn parse_hand(
        &mut self,
        tokens: &mut std::str::Chars<'_>,
    ) -> Result<(), FenParseError> {
        for token in tokens {
            if token == ']' {
                return Ok(());
            }
            if token == '-' {
                continue;
            }
            let piece = token
                .to_string()
                .parse::<Piece>()
                .map_err(|_| FenParseError::InvalidPiecePlacementChar(token))?;
            self.state.hand[piece.colour().index()][piece.pt().index()] += 1;
        }

        Err(FenParseError::InvalidRankFormat(
            "Unterminated hand bracket".to_string(),
        ))
    }

    /// # Parse the castling rights field
    ///
    /// Accepts `KQkq`, X-FEN file letters (`BGcf`) and `-`. Fills the
    /// per-square rights masks, the rook/king start squares, the castle
    /// path bitboards and the Chess960 detection flag.
    fn parse_castling(&mut self, castling: &str) -> Result<(), FenParseError> {
        self.state.castle = Castling::NONE;

        let king_of = |board: &Board, col: Colour| -> Result<Square, FenParseError> {
            board
                .piece_bb(col, PieceType::King)
                .lsb()
                .ok_or(FenParseError::InvalidPosition(format!(
                    "Castling rights given for {col:?}, but that side has no king"
                )))
        };

        for col in Colour::iter() {
            if let Some(ksq) = self.piece_bb(col, PieceType::King).lsb() {
                self.castling_mask.castling[ksq.index()].remove(Castling::side(col));
            }
        }

        if castling == "-" {
            return Ok(());
        }

        for c in castling.chars() {
            let (col, right, rook_sq) = match c {
                'K' | 'Q' | 'k' | 'q' => {
                    let col = if c.is_uppercase() {
                        Colour::White
                    } else {
                        Colour::Black
                    };
                    let king_side = c.to_ascii_uppercase() == 'K';
                    let right = if king_side {
                        Castling::king_side(col)
                    } else {
                        Castling::queen_side(col)
                    };

                    let ksq = king_of(self, col)?;
                    let corner = if king_side { Square::H1 } else { Square::A1 }.relative(col);
                    let rooks = self.piece_bb(col, PieceType::Rook) & pin_bb(ksq, corner);
                    let rook_sq = rooks.lsb().ok_or(FenParseError::InvalidPosition(format!(
                        "No castling rook found for right '{c}'"
                    )))?;

                    (col, right, rook_sq)
                }
                'A'..='H' | 'a'..='h' => {
                    let col = if c.is_uppercase() {
                        Colour::White
                    } else {
                        Colour::Black
                    };
                    let ksq = king_of(self, col)?;
                    let back_rank = Rank::Rank1.relative(col);
                    let file = File::from_unchecked(c.to_ascii_lowercase() as u8 - b'a');
                    let rook_sq = Square::from_parts(file, back_rank);

                    if self.on(rook_sq).map(|pc| pc.pt()) != Some(PieceType::Rook) {
                        return Err(FenParseError::InvalidPosition(format!(
                            "No rook on {rook_sq} for castling right '{c}'"
                        )));
                    }

                    let right = if file >= ksq.file() {
                        Castling::king_side(col)
                    } else {
                        Castling::queen_side(col)
                    };

                    (col, right, rook_sq)
                }
                _ => return Err(FenParseError::InvalidCastlingChar(c)),
            };

            let ksq = king_of(self, col)?;
            let slot = right.slot();

            self.state.castle.set(right);
            self.castling_mask.rook_sq[slot] = Some(rook_sq);
            self.castling_mask.king_sq[slot] = Some(ksq);
            self.castling_mask.castling[rook_sq.index()].remove(right);

            // Castle path: king and rook tracks to their destinations,
            // the two moving pieces excluded
            let kto = if right.is_king_side() {
                Square::G1
            } else {
                Square::C1
            }
            .relative(col);
            let rto = if right.is_king_side() {
                Square::F1
            } else {
                Square::D1
            }
            .relative(col);
            self.castling_mask.path[slot] =
                (pin_bb(ksq, kto) | pin_bb(rook_sq, rto)) & !(ksq.bb() | rook_sq.bb());

            // Any non-standard king or rook start means Chess960 rules
            if ksq.file() != File::FileE
                || (rook_sq.file() != File::FileA && rook_sq.file() != File::FileH)
            {
                self.chess960 = true;
            }
        }

        Ok(())
    }
}

/******************************************\
|==========================================|
|                 Emit Fen                 |
|==========================================|
\******************************************/

impl Board {
    /// # Get FEN string
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::board::{Board, START_FEN};
    ///
    /// let board = Board::default();
    /// assert_eq!(board.fen(), START_FEN);
    /// ```
    pub fn fen(&self) -> String {
        let mut fen = String::new();

        // --- 1. Piece placement ---
        for rank in Rank::iter().rev() {
            let mut empty_count = 0;
            for file in File::iter() {
                let square = Square::from_parts(file, rank);
                match self.on(square) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push_str(&piece.to_string());
                        if self.state.promoted.contains(square) {
                            fen.push('~');
                        }
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::Rank1 {
                fen.push('/');
            }
        }

        // --- 1b. Crazyhouse hand ---
        if self.is_house() {
            fen.push('[');
            for col in Colour::iter() {
                for pt in PieceType::iter().rev() {
                    let piece = Piece::from_parts(col, pt);
                    for _ in 0..self.count_in_hand(col, pt) {
                        fen.push_str(&piece.to_string());
                    }
                }
            }
            fen.push(']');
        }

        // --- 2. Side to move ---
        fen.push(' ');
        fen.push_str(match self.stm {
            Colour::White => "w",
            Colour::Black => "b",
        });

        // --- 3. Castling rights ---
        fen.push(' ');
        if self.state.castle == Castling::NONE {
            fen.push('-');
        } else {
            for (right, standard, letter) in [
                (Castling::WK, 'K', false),
                (Castling::WQ, 'Q', false),
                (Castling::BK, 'k', true),
                (Castling::BQ, 'q', true),
            ] {
                if !self.state.castle.has(right) {
                    continue;
                }
                if !self.chess960 {
                    fen.push(standard);
                } else {
                    let rook_sq = self.castling_rook_square(right);
                    let c = rook_sq.file().to_string().chars().next().unwrap();
                    fen.push(if letter { c } else { c.to_ascii_uppercase() });
                }
            }
        }

        // --- 4. En passant square ---
        fen.push(' ');
        match self.state.enpassant {
            Some(square) => fen.push_str(&square.to_string()),
            None => fen.push('-'),
        }

        // --- 5 and 6. Clocks ---
        fen.push_str(&format!(" {}", self.state.fifty_move));
        fen.push_str(&format!(" {}", (self.half_moves / 2) + 1));

        fen
    }
}

/******************************************\
|==========================================|
|             Fen Parse Errors             |
|==========================================|
\******************************************/

/// Errors produced while parsing a FEN string.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FenParseError {
    #[error("FEN string must have 6 fields separated by spaces")]
    InvalidNumberOfFields,
    #[error("Invalid character in FEN piece placement: '{0}'")]
    InvalidPiecePlacementChar(char),
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
    #[error("Invalid rank format: {0}")]
    InvalidRankFormat(String),
    #[error("Invalid halfmove clock value: {0}")]
    InvalidHalfmoveClock(String),
    #[error("Invalid fullmove number value: {0}")]
    InvalidFullmoveNumber(String),
    #[error("Invalid en passant target square: {0}")]
    InvalidEnPassantSquare(String),
    #[error("Invalid side to move: {0}")]
    InvalidSideToMove(String),
    #[error("Invalid character in FEN castling availability: {0}")]
    InvalidCastlingChar(char),
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_fen() {
        let board = Board::default();
        assert_eq!(board.on(Square::A1), Some(Piece::WhiteRook));
        assert_eq!(board.on(Square::E1), Some(Piece::WhiteKing));
        assert_eq!(board.on(Square::D8), Some(Piece::BlackQueen));
        assert_eq!(board.on(Square::E4), None);
        assert_eq!(board.stm(), Colour::White);
        assert_eq!(board.castling(), Castling::ALL);
        assert_eq!(board.ep(), None);
        assert_eq!(board.half_moves(), 0);
        assert!(!board.is_chess960());
        assert_eq!(board.fen(), START_FEN);
    }

    #[test]
    fn test_parse_kiwipete() {
        let board = Board::from_fen(KIWIPETE_FEN).unwrap();
        assert_eq!(board.on(Square::F3), Some(Piece::WhiteQueen));
        assert_eq!(board.on(Square::H3), Some(Piece::BlackPawn));
        assert_eq!(board.castling(), Castling::ALL);
        assert_eq!(board.fen(), KIWIPETE_FEN);
    }

    #[test]
    fn test_fen_roundtrip_assorted() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r1bqkbnr/pp1ppppp/2n5/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 1 10",
            "4k3/8/8/8/8/8/8/4K2R w K - 0 1",
        ] {
            assert_eq!(Board::from_fen(fen).unwrap().fen(), fen);
        }
    }

    #[test]
    fn test_invalid_fens() {
        assert!(matches!(
            Board::from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenParseError::InvalidPiecePlacementChar('x'))
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenParseError::InvalidRankFormat(_))
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(FenParseError::InvalidNumberOfFields)
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenParseError::InvalidSideToMove(_))
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQXkq - 0 1"),
            Err(FenParseError::InvalidCastlingChar('X'))
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1"),
            Err(FenParseError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1"),
            Err(FenParseError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0"),
            Err(FenParseError::InvalidFullmoveNumber(_))
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/R3KBN1 w H - 0 1"),
            Err(FenParseError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_ply_calculation() {
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(board.half_moves(), 1);

        let board =
            Board::from_fen("r1bqkbnr/pp1ppppp/2n5/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 1 10")
                .unwrap();
        assert_eq!(board.half_moves(), 18);
    }

    #[test]
    fn test_castling_slots() {
        let board = Board::from_fen(KIWIPETE_FEN).unwrap();
        assert_eq!(board.castling_rook_square(Castling::WK), Square::H1);
        assert_eq!(board.castling_rook_square(Castling::WQ), Square::A1);
        assert_eq!(board.castling_rook_square(Castling::BK), Square::H8);
        assert_eq!(board.castling_rook_square(Castling::BQ), Square::A8);
        assert_eq!(board.castling_king_square(Castling::WK), Square::E1);
        assert_eq!(board.castling_king_square(Castling::BQ), Square::E8);

        // Path excludes king and rook, covers both tracks
        assert_eq!(
            board.castling_mask.path[Castling::WK.slot()],
            Square::F1.bb() | Square::G1.bb()
        );
        assert_eq!(
            board.castling_mask.path[Castling::WQ.slot()],
            Square::B1.bb() | Square::C1.bb() | Square::D1.bb()
        );
        assert!(!board.castling_impeded(Castling::WK));
    }

    #[test]
    fn test_castling_rights_masks() {
        let board = Board::from_fen(KIWIPETE_FEN).unwrap();
        // Moving the king forfeits both rights, a rook its own
        assert_eq!(
            board.castling_rights(Square::E1) & Castling::WHITE_CASTLING,
            Castling::NONE
        );
        assert_eq!(
            board.castling_rights(Square::H1) & Castling::WK,
            Castling::NONE
        );
        assert!(board.castling_rights(Square::H1).has(Castling::WQ));
        assert!(board.castling_rights(Square::E4).has(Castling::ALL));
    }

    #[test]
    fn test_xfen_castling() {
        // King E1, rooks D1 and G1: rights given as file letters
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/3RKNR1 w DG - 0 1").unwrap();
        assert_eq!(board.castling(), Castling::WK | Castling::WQ);
        assert_eq!(board.castling_rook_square(Castling::WK), Square::G1);
        assert_eq!(board.castling_rook_square(Castling::WQ), Square::D1);
        assert!(board.is_chess960());

        // Lowercase letters describe black rights
        let board =
            Board::from_fen("2r1krn1/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b cf - 0 1").unwrap();
        assert_eq!(board.castling(), Castling::BK | Castling::BQ);
        assert_eq!(board.castling_rook_square(Castling::BK), Square::F8);
        assert_eq!(board.castling_rook_square(Castling::BQ), Square::C8);
        assert_eq!(board.castling_king_square(Castling::BK), Square::E8);
    }

    #[test]
    fn test_hand_parse_and_emit() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[QRn] w KQkq - 0 1";
        let board = Board::from_variant_fen(Variant::Crazyhouse, fen).unwrap();
        assert_eq!(board.count_in_hand(Colour::White, PieceType::Queen), 1);
        assert_eq!(board.count_in_hand(Colour::White, PieceType::Rook), 1);
        assert_eq!(board.count_in_hand(Colour::Black, PieceType::Knight), 1);
        assert_eq!(board.count_in_hand(Colour::Black, PieceType::Pawn), 0);
        assert!(board.has_hand(Colour::White));
        assert_eq!(board.fen(), fen);

        // Empty hand still printed for crazyhouse
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w KQkq - 0 1";
        let board = Board::from_variant_fen(Variant::Crazyhouse, fen).unwrap();
        assert!(!board.has_hand(Colour::White));
        assert_eq!(board.fen(), fen);
    }

    #[test]
    fn test_promoted_markers() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQ~KBNR[] w KQkq - 0 1";
        let board = Board::from_variant_fen(Variant::Crazyhouse, fen).unwrap();
        assert!(board.promoted_bb().contains(Square::D1));
        assert_eq!(board.fen(), fen);
    }

    #[test]
    fn test_variant_start_positions() {
        let board = Board::start_position(Variant::Horde);
        assert_eq!(board.king_sq(Colour::White), None);
        assert_eq!(
            board.piece_bb(Colour::White, PieceType::Pawn).count_bits(),
            36
        );
        assert_eq!(board.castling(), Castling::BK | Castling::BQ);

        let board = Board::start_position(Variant::Race);
        assert_eq!(board.king_sq(Colour::White), Some(Square::H2));
        assert_eq!(board.king_sq(Colour::Black), Some(Square::A2));
        assert_eq!(board.castling(), Castling::NONE);
    }
}
