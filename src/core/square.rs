use super::types::Colour;
use thiserror::Error;

/******************************************\
|==========================================|
|                 Squares                  |
|==========================================|
\******************************************/

/// # Square representation
///
/// - The 64 squares of the board, A1 = 0 through H8 = 63

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Number of elements in the Square enum
    pub const NUM: usize = 64;
}

crate::impl_from_to_primitive!(Square);
crate::impl_enum_iter!(Square);

/******************************************\
|==========================================|
|                  Ranks                   |
|==========================================|
\******************************************/

/// # Rank representation

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub enum Rank {
    Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8,
}

impl Rank {
    /// Number of elements in the Rank enum
    pub const NUM: usize = 8;
}

crate::impl_from_to_primitive!(Rank);
crate::impl_enum_iter!(Rank);

/******************************************\
|==========================================|
|                  Files                   |
|==========================================|
\******************************************/

/// # File representation

#[rustfmt::skip]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub enum File {
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
}

impl File {
    /// Number of elements in the File enum
    pub const NUM: usize = 8;
}

crate::impl_from_to_primitive!(File);
crate::impl_enum_iter!(File);

/******************************************\
|==========================================|
|              Implementation              |
|==========================================|
\******************************************/

impl Square {
    /// Returns the rank of a square
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::core::{Square, Rank};
    ///
    /// assert_eq!(Square::A1.rank(), Rank::Rank1);
    /// assert_eq!(Square::E4.rank(), Rank::Rank4);
    /// ```
    pub const fn rank(&self) -> Rank {
        Rank::from_unchecked((*self as u8) >> 3)
    }

    /// Returns the file of a square
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::core::{Square, File};
    ///
    /// assert_eq!(Square::A1.file(), File::FileA);
    /// assert_eq!(Square::H8.file(), File::FileH);
    /// ```
    pub const fn file(&self) -> File {
        File::from_unchecked((*self as u8) & 0b111)
    }

    /// Mirrors the square vertically (A1 <-> A8)
    pub const fn flip_rank(&self) -> Self {
        Self::from_unchecked((*self as u8) ^ Square::A8 as u8)
    }

    /// Returns the square from `col`'s point of view.
    ///
    /// For White the square is unchanged, for Black the rank is mirrored.
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::core::{Square, Colour};
    ///
    /// assert_eq!(Square::G1.relative(Colour::White), Square::G1);
    /// assert_eq!(Square::G1.relative(Colour::Black), Square::G8);
    /// ```
    pub const fn relative(&self, col: Colour) -> Self {
        match col {
            Colour::White => *self,
            Colour::Black => self.flip_rank(),
        }
    }

    /// Absolute rank distance between two squares
    pub const fn rank_dist(sq1: Square, sq2: Square) -> u8 {
        (sq1.rank() as u8).abs_diff(sq2.rank() as u8)
    }

    /// Absolute file distance between two squares
    pub const fn file_dist(sq1: Square, sq2: Square) -> u8 {
        (sq1.file() as u8).abs_diff(sq2.file() as u8)
    }

    /// Combines a file and a rank into a square
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::core::{Square, File, Rank};
    ///
    /// assert_eq!(Square::from_parts(File::FileE, Rank::Rank4), Square::E4);
    /// ```
    pub const fn from_parts(file: File, rank: Rank) -> Self {
        Self::from_unchecked(((rank as u8) << 3) + (file as u8))
    }
}

impl Rank {
    /// Mirrors the rank along the middle of the board
    pub const fn flip(&self) -> Self {
        Self::from_unchecked(7 - (*self as u8))
    }

    /// Returns the rank from `col`'s point of view
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::core::{Rank, Colour};
    ///
    /// assert_eq!(Rank::Rank2.relative(Colour::White), Rank::Rank2);
    /// assert_eq!(Rank::Rank2.relative(Colour::Black), Rank::Rank7);
    /// ```
    pub const fn relative(&self, col: Colour) -> Self {
        match col {
            Colour::White => *self,
            Colour::Black => self.flip(),
        }
    }
}

/******************************************\
|==========================================|
|                 Display                  |
|==========================================|
\******************************************/

impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'1' + *self as u8) as char)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/******************************************\
|==========================================|
|                 Parsing                  |
|==========================================|
\******************************************/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFileError {
    #[error("Invalid length for file string: {0}, expected 1")]
    InvalidLength(usize),
    #[error("Invalid character for file: '{0}', expected 'a'-'h'")]
    InvalidChar(char),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRankError {
    #[error("Invalid length for rank string: {0}, expected 1")]
    InvalidLength(usize),
    #[error("Invalid character for rank: '{0}', expected '1'-'8'")]
    InvalidChar(char),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSquareError {
    #[error("Invalid square string length: {0}, expected 2")]
    InvalidLength(usize),
    #[error("Invalid file character: '{0}', expected 'a'-'h'")]
    InvalidFileChar(char),
    #[error("Invalid rank character: '{0}', expected '1'-'8'")]
    InvalidRankChar(char),
}

impl std::str::FromStr for File {
    type Err = ParseFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ParseFileError::InvalidLength(s.len()));
        }
        match s.chars().next().unwrap() {
            c @ 'a'..='h' => Ok(File::from_unchecked(c as u8 - b'a')),
            c => Err(ParseFileError::InvalidChar(c)),
        }
    }
}

impl std::str::FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ParseRankError::InvalidLength(s.len()));
        }
        match s.chars().next().unwrap() {
            c @ '1'..='8' => Ok(Rank::from_unchecked(c as u8 - b'1')),
            c => Err(ParseRankError::InvalidChar(c)),
        }
    }
}

impl std::str::FromStr for Square {
    type Err = ParseSquareError;

    /// Parses algebraic notation like "e4" into a square
    ///
    /// ## Examples
    ///
    /// ```
    /// use varius::core::Square;
    ///
    /// assert_eq!("e4".parse::<Square>().unwrap(), Square::E4);
    /// assert!("e9".parse::<Square>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(ParseSquareError::InvalidLength(s.len()));
        }
        let mut chars = s.chars();
        let file_char = chars.next().unwrap();
        let rank_char = chars.next().unwrap();

        let file: File = file_char
            .to_string()
            .parse()
            .map_err(|_| ParseSquareError::InvalidFileChar(file_char))?;
        let rank: Rank = rank_char
            .to_string()
            .parse()
            .map_err(|_| ParseSquareError::InvalidRankChar(rank_char))?;

        Ok(Square::from_parts(file, rank))
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
