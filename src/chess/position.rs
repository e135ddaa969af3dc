//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, no-progress draw, etc.
//!
//! Positions are values: [`Position::apply`] produces a new one and never
//! touches the receiver. The only mutation happens during setup ([`Position::put`],
//! FEN parsing), before a position enters a
//! [`crate::chess::history::History`].
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};

use crate::chess::attacks;
use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, PieceKind, Player, Rank, Square, BOARD_WIDTH};
use crate::chess::history::PositionId;
use crate::chess::movegen::CASTLES;
use crate::chess::moves::Move;
use crate::chess::rules;
use crate::error::Result;

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN) and
/// additionally remembers where it came from: the id of the previous position
/// in the game history and the move that led here.
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a version of [Extended Position
/// Description] (EPD). The EPD support exists for compatibility with
/// databases which provide trimmed FEN lines (all FEN parts except Halfmove
/// Clock and Fullmove Counter).
///
/// Two positions are equal when they have the same board, side to move,
/// castling rights and en passant square: clocks and history links are not
/// compared.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
#[derive(Clone)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce the
    /// no-progress draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    halfmove_clock: u16,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
    previous: Option<PositionId>,
    last_move: Option<Move>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use arbiter::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::ALL,
            ..Self::empty(Player::White)
        }
    }

    /// Creates an empty board to be filled by [`Position::put`] or the FEN
    /// parser.
    #[must_use]
    pub const fn empty(side_to_move: Player) -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
            previous: None,
            last_move: None,
        }
    }

    /// Places a piece (or clears the square) during setup. Castling rights
    /// are re-derived from placement: a side can be castled as long as its
    /// king and rook stand on their original squares.
    pub fn put(&mut self, square: Square, occupant: Option<Piece>) {
        self.board.put(square, occupant);
        self.castling = castling_from_placement(&self.board);
    }

    /// Same as [`Position::put`] for raw zero-based coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the coordinates are outside of
    /// the board.
    pub fn put_at(&mut self, row: u8, column: u8, occupant: Option<Piece>) -> Result<()> {
        self.board.put_at(row, column, occupant)?;
        self.castling = castling_from_placement(&self.board);
        Ok(())
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Square a pawn skipped over with the double push that produced this
    /// position.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }

    /// Id of the position this one was derived from. `None` for the initial
    /// position of a game.
    #[must_use]
    pub const fn previous(&self) -> Option<PositionId> {
        self.previous
    }

    pub(crate) fn set_previous(&mut self, previous: Option<PositionId>) {
        self.previous = previous;
    }

    /// The move that produced this position.
    #[must_use]
    pub const fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// Returns true if the king of the side to move is attacked.
    #[must_use]
    pub fn in_check(&self) -> bool {
        attacks::in_check(&self.board, self.side_to_move)
    }

    /// Calculates the list of legal moves (i.e. the moves that do not leave
    /// our king in check). See [`rules::legal_moves`].
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        rules::legal_moves(self)
    }

    /// Produces the position after the move. The move is expected to come
    /// from [`Position::legal_moves`] of this position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidState`] if the move requires a
    /// promotion and none was chosen or vice versa.
    pub fn apply(&self, next_move: &Move) -> Result<Self> {
        next_move.check_promotion()?;
        Ok(self.transition(next_move))
    }

    /// Applies the move without checking the promotion choice. A pawn without
    /// a chosen promotion stays a pawn on the last rank: this is enough to
    /// tell whether the move leaves the king in check.
    pub(crate) fn transition(&self, next_move: &Move) -> Self {
        let mut board = self.board;
        let mover = next_move.displacement().piece;
        if let Some(captured) = next_move.captured() {
            board.put(captured.square, None);
        }
        board.put(next_move.from(), None);
        let landed = next_move
            .promotion()
            .map_or(mover, |promotion| Piece::new(mover.owner, promotion.into()));
        board.put(next_move.to(), Some(landed));
        for linked in next_move.linked() {
            board.put(linked.from, None);
            board.put(linked.to, Some(linked.piece));
        }

        let castling = self.castling
            - CastleRights::revoked_by(next_move.from())
            - CastleRights::revoked_by(next_move.to());
        let is_double_push = mover.kind == PieceKind::Pawn
            && (next_move.from().rank() as i8 - next_move.to().rank() as i8).abs() == 2;
        let en_passant_square = if is_double_push {
            next_move.from().shift(mover.owner.push_direction())
        } else {
            None
        };
        let halfmove_clock = if next_move.is_irreversible() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        let fullmove_counter = match self.side_to_move {
            Player::White => self.fullmove_counter,
            Player::Black => self.fullmove_counter.saturating_add(1),
        };
        Self {
            board,
            castling,
            side_to_move: self.side_to_move.opponent(),
            halfmove_clock,
            fullmove_counter,
            en_passant_square,
            previous: None,
            last_move: Some(next_move.clone()),
        }
    }

    /// Performs basic sanity checks of a position set up from the outside:
    ///
    /// - Each side has exactly one king.
    /// - There are at most 8 pawns per side and none of them are on the back
    ///   ranks.
    /// - The side that just moved is not in check.
    /// - The en passant square is right behind a pawn that could have just
    ///   been pushed by two squares.
    ///
    /// Positions produced by applying legal moves to a sane position are
    /// always sane.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        for player in [Player::White, Player::Black] {
            if self.board.count(player, PieceKind::King) != 1 {
                return false;
            }
            if self.board.count(player, PieceKind::Pawn) > 8 {
                return false;
            }
        }
        if self.board.pieces().any(|(square, piece)| {
            piece.kind == PieceKind::Pawn && matches!(square.rank(), Rank::One | Rank::Eight)
        }) {
            return false;
        }
        if attacks::in_check(&self.board, self.side_to_move.opponent()) {
            return false;
        }
        if let Some(en_passant_square) = self.en_passant_square {
            let they = self.side_to_move.opponent();
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if en_passant_square.rank() != expected_rank {
                return false;
            }
            let pushed_pawn = en_passant_square.shift(they.push_direction());
            let original_square = en_passant_square.shift(they.push_direction().opposite());
            if pushed_pawn.and_then(|square| self.board.get(square))
                != Some(Piece::new(they, PieceKind::Pawn))
            {
                return false;
            }
            if self.board.get(en_passant_square).is_some()
                || original_square.and_then(|square| self.board.get(square)).is_some()
            {
                return false;
            }
        }
        true
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    ///
    /// Castling rights are only kept for the sides where the king and the rook
    /// are still on their original squares.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty(Player::White);
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let ranks = pieces_placement.split('/');
        let mut rank_id = 8;
        for rank_fen in ranks {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file > BOARD_WIDTH {
                    bail!("file exceeded {BOARD_WIDTH}");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='9' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                let square = Square::new(file.try_into()?, rank);
                result.board.put(square, Some(piece));
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of \
                     length {file}"
                );
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => CastleRights::try_from(value)? & castling_from_placement(&result.board),
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        result.halfmove_clock = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("halfmove clock can not contain anything other than digits");
                }
                value.parse::<u16>().with_context(|| {
                    format!("incorrect FEN: halfmove clock can not be parsed {value}")
                })?
            },
            // This is a correct EPD: exit early.
            None => return Ok(result),
        };
        result.fullmove_counter = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("fullmove counter clock can not contain anything other than digits");
                }
                value.parse::<NonZeroU16>().with_context(|| {
                    format!("incorrect FEN: fullmove counter can not be parsed {value}")
                })?
            },
            None => bail!("incorrect FEN: missing fullmove counter"),
        };
        match parts.next() {
            None => Ok(result),
            Some(_) => bail!("trailing symbols are not allowed in FEN"),
        }
    }
}

/// [Perft] (*per*formance *t*esting) counts the leaves of the legal move tree
/// of the given depth. Each promotion choice is a separate move.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = rules::expand_promotions(position.legal_moves());
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| perft(&position.transition(next_move), depth - 1))
        .sum()
}

/// Rights of every side whose king and rook stand on their original squares.
fn castling_from_placement(board: &Board) -> CastleRights {
    CASTLES
        .iter()
        .filter(|castle| castle.is_in_place(board))
        .fold(CastleRights::empty(), |rights, castle| rights | castle.right)
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant_square == other.en_passant_square
    }
}

impl Eq for Position {}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Cleans up the input (surrounding whitespace, optional `fen ` or `epd `
    /// prefix) and parses it with [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        if let Some(last_move) = &self.last_move {
            writeln!(f, "Last move: {last_move}")?;
        }
        writeln!(f, "FEN: {}", &self.to_string())?;
        Ok(())
    }
}
