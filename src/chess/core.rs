//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use itertools::Itertools;

use crate::error::{Error, Result};

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use arbiter::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// A square is the coordinate of the board: its row is the [`Rank`] and its
/// column is the [`File`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
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
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        // File and Rank are both within 0..BOARD_WIDTH, so the index is always
        // within 0..BOARD_SIZE.
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Creates a square from zero-based row (rank) and column (file) indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if either index is outside of the board.
    pub fn from_coordinates(row: u8, column: u8) -> Result<Self> {
        match (Rank::try_from(row), File::try_from(column)) {
            (Ok(rank), Ok(file)) => Ok(Self::new(file, rank)),
            _ => Err(Error::OutOfBounds { row, column }),
        }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Light squares are the ones where a bishop never meets a bishop of the
    /// other square color. A1 is dark.
    #[must_use]
    pub const fn is_light(self) -> bool {
        (self.file() as u8 + self.rank() as u8) % 2 == 1
    }

    /// Moves the square by the given number of files and ranks. Returns `None`
    /// when the result falls off the board.
    #[must_use]
    pub fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        let file = u8::try_from(self.file() as i8 + files).ok()?;
        let rank = u8::try_from(self.rank() as i8 + ranks).ok()?;
        Some(Self::new(
            File::try_from(file).ok()?,
            Rank::try_from(rank).ok()?,
        ))
    }

    /// Moves the square one step in the given direction.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (files, ranks) = direction.delta();
        self.offset(files, ranks)
    }
}

impl TryFrom<u8> for Square {
    type Error = Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute(square_index) }),
            _ => Err(Error::OutOfBounds {
                row: square_index / BOARD_WIDTH,
                column: square_index % BOARD_WIDTH,
            }),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = Error;

    fn try_from(square: &str) -> Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            return Err(Error::parse(
                square,
                format!("square should be two-char, got {} chars", square.chars().count()),
            ));
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = Error;

    fn try_from(file: char) -> Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute(file as u8 - b'a') }),
            _ => Err(Error::parse(
                file,
                format!("file should be within 'a'..='h', got '{file}'"),
            )),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = Error;

    fn try_from(column: u8) -> Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute(column) }),
            _ => Err(Error::OutOfBounds { row: 0, column }),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// The rank where the player's king and rooks start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where the player's pawns start and may advance two squares
    /// from.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The farthest rank for the player's pawns.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = Error;

    fn try_from(rank: char) -> Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => Err(Error::parse(
                rank,
                format!("rank should be within '1'..='8', got '{rank}'"),
            )),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = Error;

    fn try_from(row: u8) -> Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute(row) }),
            _ => Err(Error::OutOfBounds { row, column: 0 }),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the player's pawns advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = Error;

    fn try_from(player: &str) -> Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => Err(Error::parse(
                player,
                format!("player should be 'w' or 'b', got '{player}'"),
            )),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// The set is closed: movement rules dispatch over it with an exhaustive
/// `match` in [`crate::chess::movegen`].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = Error;

    /// Parses FEN piece symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => {
                return Err(Error::parse(
                    symbol,
                    format!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
                ))
            },
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            // White player: uppercase symbols.
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            // Black player: lowercase symbols.
            Player::Black => f.write_str(&symbol),
        }
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves or is captured on its original square, player loses ability to
    /// castle its corresponding side.
    ///
    /// The full rules are:
    ///
    /// - The king and the castling rook must not have previously moved.
    /// - The king is not in check.
    /// - No square the king passes through or lands on may be under attack by
    ///   an enemy piece.
    /// - All the squares between the king and the castling rook must be
    ///   vacant.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Rights lost when anything moves from or to the given square.
    #[must_use]
    pub const fn revoked_by(square: Square) -> Self {
        match square {
            Square::E1 => Self::WHITE_BOTH,
            Square::H1 => Self::WHITE_SHORT,
            Square::A1 => Self::WHITE_LONG,
            Square::E8 => Self::BLACK_BOTH,
            Square::H8 => Self::BLACK_SHORT,
            Square::A8 => Self::BLACK_LONG,
            _ => Self::empty(),
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = Error;

    /// Parses [`CastleRights`] for both players from the FEN format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if given pattern does not match
    ///
    /// [`CastleRights`] := '-' | (K)? (Q)? (k)? (q)?
    fn try_from(input: &str) -> Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        let mut result = Self::empty();
        // Each right can be given at most once and only in canonical order.
        let mut order = [
            ('K', Self::WHITE_SHORT),
            ('Q', Self::WHITE_LONG),
            ('k', Self::BLACK_SHORT),
            ('q', Self::BLACK_LONG),
        ]
        .into_iter();
        for symbol in input.chars() {
            match order.find(|(expected, _)| *expected == symbol) {
                Some((_, right)) => result |= right,
                None => return Err(Error::parse(input, "unknown castle rights")),
            }
        }
        if result.is_empty() {
            return Err(Error::parse(input, "unknown castle rights"));
        }
        Ok(result)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// All promotion targets, strongest first.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<PieceKind> for Promotion {
    type Error = Error;

    fn try_from(kind: PieceKind) -> Result<Self> {
        match kind {
            PieceKind::Queen => Ok(Self::Queen),
            PieceKind::Rook => Ok(Self::Rook),
            PieceKind::Bishop => Ok(Self::Bishop),
            PieceKind::Knight => Ok(Self::Knight),
            PieceKind::King | PieceKind::Pawn => Err(Error::InvalidState(format!(
                "pawn can not be promoted to {kind:?}"
            ))),
        }
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    /// Orthogonal directions: the ones rooks slide in.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];
    /// Diagonal directions: the ones bishops slide in.
    pub const DIAGONAL: [Self; 4] = [Self::UpLeft, Self::UpRight, Self::DownLeft, Self::DownRight];

    /// (files, ranks) step of the direction.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn opposite(self) -> Self {
        match self {
            Self::UpLeft => Self::DownRight,
            Self::Up => Self::Down,
            Self::UpRight => Self::DownLeft,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::DownLeft => Self::UpRight,
            Self::Down => Self::Up,
            Self::DownRight => Self::UpLeft,
        }
    }
}

#[cfg(test)]
mod test {
    use std::mem::{size_of, size_of_val};

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn rank() {
        assert_eq!(
            ('1'..='9')
                .filter_map(|ch| Rank::try_from(ch).ok())
                .collect::<Vec<Rank>>(),
            Rank::iter().collect::<Vec<_>>()
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| Rank::try_from(idx).ok())
                .collect::<Vec<Rank>>(),
            Rank::iter().collect::<Vec<_>>()
        );
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '9'")]
    fn rank_from_incorrect_char() {
        let _ = Rank::try_from('9').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '0'")]
    fn rank_from_incorrect_char_zero() {
        let _ = Rank::try_from('0').unwrap();
    }

    #[test]
    fn rank_from_incorrect_index() {
        assert_eq!(
            Rank::try_from(BOARD_WIDTH),
            Err(Error::OutOfBounds { row: 8, column: 0 })
        );
    }

    #[test]
    fn file() {
        assert_eq!(
            ('a'..='i')
                .filter_map(|ch| File::try_from(ch).ok())
                .collect::<Vec<File>>(),
            vec![
                File::A,
                File::B,
                File::C,
                File::D,
                File::E,
                File::F,
                File::G,
                File::H,
            ]
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| File::try_from(idx).ok())
                .collect::<Vec<File>>(),
            File::iter().collect::<Vec<_>>()
        );
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn file_from_incorrect_char() {
        let _ = File::try_from('i').unwrap();
    }

    #[test]
    fn square() {
        let squares: Vec<_> = [
            0u8,
            BOARD_SIZE - 1,
            BOARD_WIDTH - 1,
            BOARD_WIDTH,
            BOARD_WIDTH * 2 + 5,
            BOARD_SIZE,
        ]
        .iter()
        .filter_map(|square| Square::try_from(*square).ok())
        .collect();
        assert_eq!(
            squares,
            vec![Square::A1, Square::H8, Square::H1, Square::A2, Square::F3,]
        );
        let squares: Vec<_> = [
            (File::B, Rank::Three),
            (File::F, Rank::Five),
            (File::H, Rank::Eight),
            (File::E, Rank::Four),
        ]
        .iter()
        .map(|(file, rank)| Square::new(*file, *rank))
        .collect();
        assert_eq!(
            squares,
            vec![Square::B3, Square::F5, Square::H8, Square::E4]
        );
        assert_eq!(Square::try_from("e4"), Ok(Square::E4));
        assert!(Square::try_from("e44").is_err());
        assert!(Square::try_from("z4").is_err());
    }

    #[test]
    fn coordinates() {
        assert_eq!(Square::from_coordinates(0, 0), Ok(Square::A1));
        assert_eq!(Square::from_coordinates(7, 7), Ok(Square::H8));
        assert_eq!(Square::from_coordinates(2, 2), Ok(Square::C3));
        assert_eq!(
            Square::from_coordinates(8, 2),
            Err(Error::OutOfBounds { row: 8, column: 2 })
        );
        assert_eq!(
            Square::from_coordinates(3, 11),
            Err(Error::OutOfBounds { row: 3, column: 11 })
        );
    }

    #[test]
    fn square_colors() {
        assert!(!Square::A1.is_light());
        assert!(Square::B1.is_light());
        assert!(Square::H1.is_light());
        assert!(!Square::H8.is_light());
        assert!(Square::D1.is_light());
        assert!(!Square::E1.is_light());
    }

    #[test]
    fn primitive_size() {
        assert_eq!(size_of::<Square>(), 1);
        // Primitives will have small size thanks to the niche optimizations:
        // https://rust-lang.github.io/unsafe-code-guidelines/layout/enums.html#layout-of-a-data-carrying-enums-without-a-repr-annotation
        assert_eq!(size_of::<PieceKind>(), size_of::<Option<PieceKind>>());
        assert_eq!(size_of::<Piece>(), size_of::<Option<Piece>>());
        let square_to_pieces: [Option<Piece>; BOARD_SIZE as usize] = [None; BOARD_SIZE as usize];
        assert_eq!(size_of_val(&square_to_pieces), 2 * BOARD_SIZE as usize);
    }

    #[test]
    fn within_board_shift() {
        let square = Square::E4;
        assert_eq!(square.shift(Direction::Left), Some(Square::D4));
        assert_eq!(square.shift(Direction::Up), Some(Square::E5));
        assert_eq!(square.shift(Direction::UpRight), Some(Square::F5));
        assert_eq!(square.shift(Direction::UpLeft), Some(Square::D5));
        assert_eq!(square.shift(Direction::Right), Some(Square::F4));
        assert_eq!(square.shift(Direction::Down), Some(Square::E3));
        assert_eq!(square.shift(Direction::DownRight), Some(Square::F3));
        assert_eq!(square.shift(Direction::DownLeft), Some(Square::D3));
        for direction in Direction::iter() {
            assert_eq!(
                square
                    .shift(direction)
                    .and_then(|s| s.shift(direction.opposite())),
                Some(square)
            );
        }
    }

    #[test]
    fn border_squares_shift() {
        let square = Square::D1;
        assert_eq!(square.shift(Direction::Left), Some(Square::C1));
        assert_eq!(square.shift(Direction::Up), Some(Square::D2));
        assert_eq!(square.shift(Direction::Right), Some(Square::E1));
        for direction in [Direction::Down, Direction::DownRight, Direction::DownLeft] {
            assert_eq!(square.shift(direction), None);
        }

        let square = Square::A2;
        assert_eq!(square.shift(Direction::UpRight), Some(Square::B3));
        assert_eq!(square.shift(Direction::DownRight), Some(Square::B1));
        for direction in [Direction::Left, Direction::UpLeft, Direction::DownLeft] {
            assert_eq!(square.shift(direction), None);
        }

        let square = Square::H8;
        for direction in [
            Direction::Up,
            Direction::UpRight,
            Direction::UpLeft,
            Direction::DownRight,
            Direction::Right,
        ] {
            assert_eq!(square.shift(direction), None);
        }
        assert_eq!(square.offset(-1, -2), Some(Square::G6));
        assert_eq!(square.offset(1, -2), None);
    }

    #[test]
    fn pieces() {
        assert_eq!(
            Piece::try_from('N'),
            Ok(Piece::new(Player::White, PieceKind::Knight))
        );
        assert_eq!(
            Piece::try_from('q'),
            Ok(Piece::new(Player::Black, PieceKind::Queen))
        );
        assert!(Piece::try_from('x').is_err());
        assert_eq!(
            "KQRBNPkqrbnp"
                .chars()
                .map(|symbol| Piece::try_from(symbol).unwrap().to_string())
                .collect::<String>(),
            "KQRBNPkqrbnp"
        );
    }

    #[test]
    fn castle_rights() {
        assert_eq!(CastleRights::try_from("-"), Ok(CastleRights::empty()));
        assert_eq!(CastleRights::try_from("KQkq"), Ok(CastleRights::ALL));
        assert_eq!(
            CastleRights::try_from("Kq"),
            Ok(CastleRights::WHITE_SHORT | CastleRights::BLACK_LONG)
        );
        assert!(CastleRights::try_from("qk").is_err());
        assert!(CastleRights::try_from("KK").is_err());
        assert!(CastleRights::try_from("").is_err());
        assert!(CastleRights::try_from("X").is_err());
        for input in ["-", "K", "Qk", "KQkq", "kq", "Kkq"] {
            assert_eq!(CastleRights::try_from(input).unwrap().to_string(), input);
        }
    }
}
