//! Square-centric board representation: an 8×8 grid of occupant slots.
//!
//! The board is pure storage and knows nothing about the rules: castling, en
//! passant and promotion are handled by [`crate::chess::position`] and
//! [`crate::chess::rules`].

use std::fmt::{self, Write};

use strum::IntoEnumIterator;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE};
use crate::error::Result;

/// Occupant of each square, indexed by [`Square`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Standard 32-piece setup.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.put(
                    Square::new(file, Rank::backrank(player)),
                    Some(Piece::new(player, kind)),
                );
                board.put(
                    Square::new(file, Rank::pawns_starting(player)),
                    Some(Piece::new(player, PieceKind::Pawn)),
                );
            }
        }
        board
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Places `occupant` on the square, replacing whatever was there.
    pub fn put(&mut self, square: Square, occupant: Option<Piece>) {
        self.squares[square as usize] = occupant;
    }

    /// Same as [`Board::put`] for raw zero-based coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the coordinates are outside of
    /// the board.
    pub fn put_at(&mut self, row: u8, column: u8, occupant: Option<Piece>) -> Result<()> {
        self.put(Square::from_coordinates(row, column)?, occupant);
        Ok(())
    }

    /// Iterates over occupied squares in [`Square`] order (A1, B1, ..., H8).
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.get(square).map(|piece| (square, piece)))
    }

    /// Iterates over the squares occupied by the player's pieces.
    pub fn player_pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.owner == player)
    }

    /// Location of the player's king, if there is one.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| *piece == Piece::new(player, PieceKind::King))
            .map(|(square, _)| square)
    }

    /// Number of pieces of the given kind owned by the player.
    #[must_use]
    pub fn count(&self, player: Player, kind: PieceKind) -> usize {
        self.player_pieces(player)
            .filter(|(_, piece)| piece.kind == kind)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::iter() {
                let square = Square::new(file, rank);
                if let Some(piece) = self.get(square) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.get(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_str(SQUARE_SEPARATOR)?;
                }
            }
            if rank != Rank::One {
                f.write_str(LINE_SEPARATOR)?;
            }
        }
        Ok(())
    }
}
