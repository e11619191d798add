use super::Board;
use crate::core::*;
use crate::utils::PRNG;

/******************************************\
|==========================================|
|              Key Definition              |
|==========================================|
\******************************************/

/// A Zobrist key
pub type Key = u64;

/// Upper bound on same-type pieces one side can hold in hand
pub const MAX_IN_HAND: usize = 17;

/******************************************\
|==========================================|
|                Key Bundle                |
|==========================================|
\******************************************/

/// The Zobrist keys of a position: the main key, a pawn-structure key and
/// per-colour non-pawn keys for more granular hash tables.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct KeyBundle {
    /// The main key for the entire position
    pub key: Key,
    /// Key over the pawn structure only
    pub pawn_key: Key,
    /// Keys over the non-pawn material of each colour
    pub non_pawn_key: [Key; Colour::NUM],
}

impl KeyBundle {
    /// Toggles a piece on a square
    #[inline]
    pub fn toggle_piece(&mut self, piece: Piece, sq: Square) {
        if piece.pt() as u8 == PieceType::Pawn as u8 {
            self.pawn_key ^= piece_key(piece, sq);
        } else {
            self.non_pawn_key[piece.colour().index()] ^= piece_key(piece, sq);
        }
        self.key ^= piece_key(piece, sq);
    }

    /// Toggles a castling-rights mask
    #[inline]
    pub fn toggle_castle(&mut self, flag: Castling) {
        self.key ^= castle_key(flag);
    }

    /// Toggles the side to move
    #[inline]
    pub fn toggle_side(&mut self) {
        self.key ^= side_key();
    }

    /// Toggles the en-passant file
    #[inline]
    pub fn toggle_ep(&mut self, file: File) {
        self.key ^= ep_key(file);
    }

    /// Toggles the `count`-th in-hand copy of a piece (crazyhouse)
    #[inline]
    pub fn toggle_hand(&mut self, piece: Piece, count: u8) {
        self.key ^= hand_key(piece, count);
    }
}

/******************************************\
|==========================================|
|              Zobrist Table               |
|==========================================|
\******************************************/

/// The precomputed random keys: one per (piece, square), castling mask,
/// en-passant file, in-hand count and the side to move.
#[derive(Debug)]
pub struct ZobristTable {
    pub pieces: [[Key; Square::NUM]; Piece::NUM],
    pub side_to_move: Key,
    pub castling: [Key; Castling::NUM],
    pub enpassant: [Key; File::NUM],
    pub in_hand: [[Key; MAX_IN_HAND]; Piece::NUM],
}

/// Global table, filled at compile time from a fixed seed
pub const ZOBRIST: ZobristTable = init_zobrist_table();

/******************************************\
|==========================================|
|              Initialisation              |
|==========================================|
\******************************************/

const fn init_zobrist_table() -> ZobristTable {
    let mut rng = PRNG::new(0xD152C9AF44F3B26E);

    let mut pieces = [[0; Square::NUM]; Piece::NUM];
    let mut castling = [0; Castling::NUM];
    let mut enpassant = [0; File::NUM];
    let mut in_hand = [[0; MAX_IN_HAND]; Piece::NUM];

    let mut i = 0;
    while i < Piece::NUM {
        let mut j = 0;
        while j < Square::NUM {
            pieces[i][j] = rng.random_u64();
            j += 1;
        }
        i += 1;
    }

    let side_to_move = rng.random_u64();

    i = 0;
    while i < Castling::NUM {
        castling[i] = rng.random_u64();
        i += 1;
    }

    i = 0;
    while i < File::NUM {
        enpassant[i] = rng.random_u64();
        i += 1;
    }

    i = 0;
    while i < Piece::NUM {
        // Count zero hashes to nothing so an empty hand is key-neutral
        let mut j = 1;
        while j < MAX_IN_HAND {
            in_hand[i][j] = rng.random_u64();
            j += 1;
        }
        i += 1;
    }

    ZobristTable {
        pieces,
        side_to_move,
        castling,
        enpassant,
        in_hand,
    }
}

/******************************************\
|==========================================|
|              Access Functions            |
|==========================================|
\******************************************/

#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> Key {
    unsafe {
        *ZOBRIST
            .pieces
            .get_unchecked(piece.index())
            .get_unchecked(sq.index())
    }
}

#[inline]
pub fn side_key() -> Key {
    ZOBRIST.side_to_move
}

#[inline]
pub fn castle_key(flag: Castling) -> Key {
    ZOBRIST.castling[flag.0 as usize]
}

#[inline]
pub fn ep_key(file: File) -> Key {
    unsafe { *ZOBRIST.enpassant.get_unchecked(file.index()) }
}

#[inline]
pub fn hand_key(piece: Piece, count: u8) -> Key {
    debug_assert!((count as usize) < MAX_IN_HAND);
    unsafe {
        *ZOBRIST
            .in_hand
            .get_unchecked(piece.index())
            .get_unchecked(count as usize)
    }
}

/******************************************\
|==========================================|
|            Board Implementation          |
|==========================================|
\******************************************/

impl Board {
    /// Recomputes the main key from scratch
    pub(crate) fn calc_key(&self) -> Key {
        let mut key = 0;

        for sq in Square::iter() {
            if let Some(piece) = self.on(sq) {
                key ^= piece_key(piece, sq);
            }
        }

        if self.stm() as u8 == Colour::Black as u8 {
            key ^= side_key();
        }

        key ^= castle_key(self.state.castle);

        if let Some(ep_square) = self.state.enpassant {
            key ^= ep_key(ep_square.file());
        }

        for col in Colour::iter() {
            for pt in PieceType::iter() {
                let piece = Piece::from_parts(col, pt);
                let mut n = self.count_in_hand(col, pt);
                while n > 0 {
                    key ^= hand_key(piece, n);
                    n -= 1;
                }
            }
        }

        key
    }

    /// Recomputes the pawn key from scratch
    pub(crate) fn calc_pawn_key(&self) -> Key {
        let mut key = 0;

        for sq in Square::iter() {
            if let Some(piece) = self.on(sq) {
                if piece.pt() as u8 == PieceType::Pawn as u8 {
                    key ^= piece_key(piece, sq);
                }
            }
        }

        key
    }

    /// Recomputes the non-pawn keys from scratch
    pub(crate) fn calc_non_pawn_key(&self) -> [Key; Colour::NUM] {
        let mut keys = [0; Colour::NUM];

        for sq in Square::iter() {
            if let Some(piece) = self.on(sq) {
                if piece.pt() as u8 != PieceType::Pawn as u8 {
                    keys[piece.colour().index()] ^= piece_key(piece, sq);
                }
            }
        }

        keys
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::super::fen::*;
    use super::*;

    #[test]
    fn zobrist_table_init() {
        assert_ne!(piece_key(Piece::WhitePawn, Square::E4), 0);
        assert_ne!(side_key(), 0);
        assert_ne!(castle_key(Castling::WK), 0);
        assert_ne!(ep_key(File::FileD), 0);
        assert_ne!(hand_key(Piece::BlackQueen, 1), 0);
        assert_eq!(hand_key(Piece::BlackQueen, 0), 0);

        assert_ne!(
            piece_key(Piece::WhitePawn, Square::E4),
            piece_key(Piece::WhitePawn, Square::E5)
        );
        assert_ne!(
            piece_key(Piece::WhitePawn, Square::E4),
            piece_key(Piece::BlackPawn, Square::E4)
        );
        assert_ne!(castle_key(Castling::ALL), castle_key(Castling::NONE));
        assert_ne!(ep_key(File::FileA), ep_key(File::FileH));
    }

    fn get_key_from_fen(fen: &str) -> Key {
        let board = Board::from_fen(fen).expect("Test FEN should be valid");
        assert_eq!(
            board.calc_key(),
            board.state.keys.key,
            "Stored key differs from calculated key"
        );
        board.calc_key()
    }

    #[test]
    fn test_startpos_key_consistent() {
        let key_start = get_key_from_fen(START_FEN);
        assert_ne!(key_start, 0);
        assert_eq!(key_start, get_key_from_fen(START_FEN));
        assert_ne!(key_start, get_key_from_fen(KIWIPETE_FEN));
    }

    #[test]
    fn test_piece_difference() {
        let key_start = get_key_from_fen(START_FEN);
        let key_nc3 =
            get_key_from_fen("rnbqkbnr/pppppppp/8/8/8/2N5/PPPPPPPP/R1BQKBNR w KQkq - 0 1");

        let expected_key = key_start
            ^ piece_key(Piece::WhiteKnight, Square::B1)
            ^ piece_key(Piece::WhiteKnight, Square::C3);
        assert_eq!(key_nc3, expected_key);
    }

    #[test]
    fn test_castling_difference() {
        let key_kqkq = get_key_from_fen(START_FEN);
        let key_none = get_key_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1");

        let expected = key_kqkq ^ castle_key(Castling::ALL) ^ castle_key(Castling::NONE);
        assert_eq!(key_none, expected);
    }

    #[test]
    fn test_enpassant_difference() {
        let key_base =
            get_key_from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        let key_ep =
            get_key_from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");

        assert_eq!(key_ep, key_base ^ ep_key(File::FileE));
    }

    #[test]
    fn test_hand_keys() {
        let plain = Board::from_variant_fen(
            Variant::Crazyhouse,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        )
        .unwrap();
        let with_hand = Board::from_variant_fen(
            Variant::Crazyhouse,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[Nn] w KQkq - 0 1",
        )
        .unwrap();

        let expected = plain.key()
            ^ hand_key(Piece::WhiteKnight, 1)
            ^ hand_key(Piece::BlackKnight, 1);
        assert_eq!(with_hand.key(), expected);
    }
}
