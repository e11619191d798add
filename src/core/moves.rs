use crate::core::*;

/******************************************\
|==========================================|
|                Move Kind                 |
|==========================================|
\******************************************/

/// The special-move class of an encoded move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    Promotion,
    EnPassant,
    Castling,
    Drop,
}

/******************************************\
|==========================================|
|                   Move                   |
|==========================================|
\******************************************/

/// # Compact move encoding
///
/// A move packed into 16 bits:
///
/// - bits 0-5: destination square
/// - bits 6-11: origin square
/// - bits 12-13: promotion piece, counted from knight
/// - bits 14-15: kind tag (normal / promotion / special / castling)
///
/// Castling is encoded king-origin to rook-origin, so the same encoding
/// covers standard chess and Chess960. Under the "special" tag the
/// promotion field, always zero for en passant, distinguishes the two
/// variant extensions: crazyhouse drops (the dropped piece type lives in
/// the origin field, which is never a board square for a drop) and the
/// antichess king promotion.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub struct Move {
    data: u16,
}

impl Default for Move {
    fn default() -> Self {
        Self::NONE
    }
}

impl Move {
    const TO_SHIFT: u16 = 0;

    const FROM_SHIFT: u16 = 6;

    const PROMO_SHIFT: u16 = 12;

    const TAG_SHIFT: u16 = 14;

    const SQUARE_MASK: u16 = 0x3F;

    const PROMO_MASK: u16 = 0x3;

    const TAG_NORMAL: u16 = 0;
    const TAG_PROMOTION: u16 = 1;
    const TAG_SPECIAL: u16 = 2;
    const TAG_CASTLING: u16 = 3;

    // Promotion-field discriminants under TAG_SPECIAL
    const SPECIAL_EN_PASSANT: u16 = 0;
    const SPECIAL_DROP: u16 = 1;
    const SPECIAL_KING_PROMO: u16 = 2;

    pub const NONE: Self = Self::new(Square::A1, Square::A1);

    pub const NULL: Self = Self::new(Square::A2, Square::A2);

    const fn encode(from: u16, to: u16, promo: u16, tag: u16) -> Self {
        Self {
            data: (to << Self::TO_SHIFT)
                | (from << Self::FROM_SHIFT)
                | (promo << Self::PROMO_SHIFT)
                | (tag << Self::TAG_SHIFT),
        }
    }

    /// A plain move (quiet, capture or double push alike)
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self::encode(from as u16, to as u16, 0, Self::TAG_NORMAL)
    }

    /// A promotion to `pt`; `PieceType::King` is legal in antichess only
    #[inline(always)]
    pub const fn new_promotion(from: Square, to: Square, pt: PieceType) -> Self {
        match pt {
            PieceType::King => Self::encode(
                from as u16,
                to as u16,
                Self::SPECIAL_KING_PROMO,
                Self::TAG_SPECIAL,
            ),
            _ => {
                debug_assert!(
                    pt as u8 >= PieceType::Knight as u8 && (pt as u8) <= PieceType::Queen as u8,
                    "Invalid promotion piece type"
                );
                Self::encode(
                    from as u16,
                    to as u16,
                    pt as u16 - PieceType::Knight as u16,
                    Self::TAG_PROMOTION,
                )
            }
        }
    }

    /// An en-passant capture onto the en-passant square
    #[inline(always)]
    pub const fn new_en_passant(from: Square, to: Square) -> Self {
        Self::encode(
            from as u16,
            to as u16,
            Self::SPECIAL_EN_PASSANT,
            Self::TAG_SPECIAL,
        )
    }

    /// A castling move, encoded king-origin to rook-origin
    #[inline(always)]
    pub const fn new_castling(king_from: Square, rook_from: Square) -> Self {
        Self::encode(king_from as u16, rook_from as u16, 0, Self::TAG_CASTLING)
    }

    /// A crazyhouse drop of `pt` onto `to`
    #[inline(always)]
    pub const fn new_drop(pt: PieceType, to: Square) -> Self {
        Self::encode(pt as u16, to as u16, Self::SPECIAL_DROP, Self::TAG_SPECIAL)
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        debug_assert!(!self.is_drop(), "Drop moves have no origin square");
        Square::from_unchecked(((self.data >> Self::FROM_SHIFT) & Self::SQUARE_MASK) as u8)
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        Square::from_unchecked(((self.data >> Self::TO_SHIFT) & Self::SQUARE_MASK) as u8)
    }

    #[inline(always)]
    const fn tag(&self) -> u16 {
        self.data >> Self::TAG_SHIFT
    }

    #[inline(always)]
    const fn promo_bits(&self) -> u16 {
        (self.data >> Self::PROMO_SHIFT) & Self::PROMO_MASK
    }

    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        match self.tag() {
            Self::TAG_NORMAL => MoveKind::Normal,
            Self::TAG_PROMOTION => MoveKind::Promotion,
            Self::TAG_CASTLING => MoveKind::Castling,
            _ => match self.promo_bits() {
                Self::SPECIAL_EN_PASSANT => MoveKind::EnPassant,
                Self::SPECIAL_DROP => MoveKind::Drop,
                _ => MoveKind::Promotion,
            },
        }
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        matches!(self.kind(), MoveKind::Promotion)
    }

    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    #[inline(always)]
    pub const fn is_castling(&self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    #[inline(always)]
    pub const fn is_drop(&self) -> bool {
        matches!(self.kind(), MoveKind::Drop)
    }

    /// The piece promoted to; only meaningful for promotion moves
    #[inline(always)]
    pub const fn promotion_pt(&self) -> PieceType {
        debug_assert!(self.is_promotion(), "Not a promotion move");
        if self.tag() == Self::TAG_SPECIAL {
            PieceType::King
        } else {
            PieceType::from_unchecked(self.promo_bits() as u8 + PieceType::Knight as u8)
        }
    }

    /// The piece type dropped; only meaningful for drop moves
    #[inline(always)]
    pub const fn dropped_pt(&self) -> PieceType {
        debug_assert!(self.is_drop(), "Not a drop move");
        PieceType::from_unchecked(((self.data >> Self::FROM_SHIFT) & Self::SQUARE_MASK) as u8)
    }

    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        self.data == Self::NONE.data
    }

    #[inline(always)]
    pub const fn is_null(&self) -> bool {
        self.data == Self::NULL.data
    }

    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        !self.is_none() && !self.is_null()
    }

    #[inline(always)]
    pub const fn raw(&self) -> u16 {
        self.data
    }
}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl std::fmt::Display for Move {
    /// Prints the move in UCI form. Castling is printed king-from to
    /// rook-from (the Chess960 convention); drops as `P@e4`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        match self.kind() {
            MoveKind::Drop => write!(
                f,
                "{}@{}",
                self.dropped_pt().to_string().to_uppercase(),
                self.to()
            ),
            MoveKind::Promotion => {
                write!(f, "{}{}{}", self.from(), self.to(), self.promotion_pt())
            }
            _ => write!(f, "{}{}", self.from(), self.to()),
        }
    }
}

/******************************************\
|==========================================|
|                 Ext Move                 |
|==========================================|
\******************************************/

/// A move plus the score slot used by move ordering downstream. The
/// generators never write the score.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtMove {
    pub mv: Move,
    pub score: i32,
}

impl From<Move> for ExtMove {
    fn from(mv: Move) -> Self {
        ExtMove { mv, score: 0 }
    }
}

impl PartialEq for ExtMove {
    fn eq(&self, other: &Self) -> bool {
        self.mv == other.mv
    }
}

impl Eq for ExtMove {}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Square::*;

    #[test]
    fn test_normal_move_layout() {
        let m = Move::new(E2, E4);
        assert_eq!(m.from(), E2);
        assert_eq!(m.to(), E4);
        assert_eq!(m.kind(), MoveKind::Normal);
        // bits 0-5 to, 6-11 from, upper four bits clear
        assert_eq!(m.raw(), (E4 as u16) | ((E2 as u16) << 6));
    }

    #[test]
    fn test_promotion_encoding() {
        for pt in [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
        ] {
            let m = Move::new_promotion(A7, A8, pt);
            assert_eq!(m.kind(), MoveKind::Promotion);
            assert_eq!(m.promotion_pt(), pt);
            assert_eq!(m.from(), A7);
            assert_eq!(m.to(), A8);
            assert_eq!(
                (m.raw() >> 12) & 0x3,
                pt as u16 - PieceType::Knight as u16,
                "promotion field is relative to knight"
            );
            assert_eq!(m.raw() >> 14, 1);
        }
    }

    #[test]
    fn test_king_promotion_is_distinct() {
        let king = Move::new_promotion(A7, A8, PieceType::King);
        assert_eq!(king.kind(), MoveKind::Promotion);
        assert_eq!(king.promotion_pt(), PieceType::King);
        for pt in [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
        ] {
            assert_ne!(king, Move::new_promotion(A7, A8, pt));
        }
        assert_ne!(king, Move::new_en_passant(A7, A8));
    }

    #[test]
    fn test_en_passant_layout() {
        let m = Move::new_en_passant(E5, D6);
        assert_eq!(m.kind(), MoveKind::EnPassant);
        assert_eq!(m.from(), E5);
        assert_eq!(m.to(), D6);
        // tag 2, promotion field zero
        assert_eq!(m.raw() >> 14, 2);
        assert_eq!((m.raw() >> 12) & 0x3, 0);
    }

    #[test]
    fn test_castling_uses_rook_square() {
        let m = Move::new_castling(E1, H1);
        assert_eq!(m.kind(), MoveKind::Castling);
        assert_eq!(m.from(), E1);
        assert_eq!(m.to(), H1);
        assert_eq!(m.raw() >> 14, 3);
    }

    #[test]
    fn test_drop_encoding() {
        let m = Move::new_drop(PieceType::Knight, F3);
        assert_eq!(m.kind(), MoveKind::Drop);
        assert_eq!(m.to(), F3);
        assert_eq!(m.dropped_pt(), PieceType::Knight);
        assert!(m.is_drop());

        // A drop never collides with an en-passant move on the same square
        assert_ne!(m.raw() & 0x3000, 0);

        for pt in [
            PieceType::Pawn,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
        ] {
            assert_eq!(Move::new_drop(pt, C5).dropped_pt(), pt);
        }
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Move::NONE.raw(), 0);
        assert!(!Move::NONE.is_valid());
        assert!(!Move::NULL.is_valid());
        assert!(Move::new(E2, E4).is_valid());
        assert_eq!(Move::default(), Move::NONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::new(E2, E4).to_string(), "e2e4");
        assert_eq!(
            Move::new_promotion(B7, B8, PieceType::Queen).to_string(),
            "b7b8q"
        );
        assert_eq!(Move::new_drop(PieceType::Rook, D4).to_string(), "R@d4");
        assert_eq!(Move::new_en_passant(E5, D6).to_string(), "e5d6");
    }

    #[test]
    fn test_ext_move_compares_on_move_only() {
        let a = ExtMove {
            mv: Move::new(E2, E4),
            score: 10,
        };
        let b = ExtMove {
            mv: Move::new(E2, E4),
            score: -3,
        };
        assert_eq!(a, b);
    }
}
