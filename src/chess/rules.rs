//! Legal move generation and game outcome adjudication.
//!
//! Legality is established by brute force: every pseudo-legal displacement is
//! turned into a [`Move`], the move is played on a copy of the board and
//! rejected if the mover's king ends up attacked.

use std::fmt;

use crate::chess::attacks;
use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Piece, PieceKind, Player, Promotion, Rank, Square};
use crate::chess::history::{History, PositionId};
use crate::chess::movegen::{self, Castle};
use crate::chess::moves::{Capture, Displacement, Move};
use crate::chess::position::Position;

/// Calculates the list of legal moves (i.e. the moves that do not leave our
/// king in check).
///
/// The moves are ordered by the square of the moving piece ([`Square`]
/// order) and then by the generation order of its displacements. Promotions
/// are listed once per destination with [`Move::is_promotion_required`] set.
#[must_use]
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move();
    let mut moves = Vec::with_capacity(50);
    for (from, _) in position.board().player_pieces(us) {
        for displacement in movegen::pseudo_legal_displacements(position, from) {
            let candidate = materialize(position, displacement);
            if !attacks::in_check(position.transition(&candidate).board(), us) {
                moves.push(candidate);
            }
        }
    }
    moves
}

/// Replaces every move that requires a promotion with the four moves
/// choosing each [`Promotion`].
#[must_use]
pub fn expand_promotions(moves: Vec<Move>) -> Vec<Move> {
    let mut expanded = Vec::with_capacity(moves.len());
    for next_move in moves {
        if next_move.is_promotion_required() {
            expanded.extend(
                Promotion::ALL
                    .iter()
                    .filter_map(|&promotion| next_move.clone().with_promotion(promotion).ok()),
            );
        } else {
            expanded.push(next_move);
        }
    }
    expanded
}

/// Attaches the side effects to a displacement: captured piece, the rook of
/// a castling and the need to promote.
fn materialize(position: &Position, displacement: Displacement) -> Move {
    let board = position.board();
    let Displacement { piece, from, to } = displacement;
    match piece.kind {
        PieceKind::King => {
            // A king never steps two files otherwise.
            match Castle::find(from, to) {
                Some(castle) => Move::with_linked(
                    displacement,
                    Displacement::new(
                        Piece::new(piece.owner, PieceKind::Rook),
                        castle.rook_from,
                        castle.rook_to,
                    ),
                ),
                None => Move::new(displacement, capture_on(board, to)),
            }
        },
        PieceKind::Pawn => {
            let captured = if from.file() != to.file() && board.get(to).is_none() {
                let square = movegen::en_passant_victim(from, to);
                capture_on(board, square)
            } else {
                capture_on(board, to)
            };
            let pawn_move = Move::new(displacement, captured);
            if to.rank() == Rank::promotion(piece.owner) {
                pawn_move.require_promotion()
            } else {
                pawn_move
            }
        },
        _ => Move::new(displacement, capture_on(board, to)),
    }
}

fn capture_on(board: &Board, square: Square) -> Option<Capture> {
    board.get(square).map(|piece| Capture { piece, square })
}

/// Why the game ended in a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// Neither side can possibly deliver a checkmate.
    InsufficientMaterial,
    /// The side to move has no legal moves but is not in check.
    Stalemate,
    /// The same position occurred too many times.
    Repetition,
    /// Too many moves were made without captures or pawn moves.
    NoProgress,
}

/// Outcome of the game as seen from a specific position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Status {
    NotFinished,
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl Status {
    /// Only unfinished games accept moves.
    #[must_use]
    pub const fn is_play_allowed(self) -> bool {
        matches!(self, Self::NotFinished)
    }

    const fn win(player: Player) -> Self {
        match player {
            Player::White => Self::WhiteWins,
            Player::Black => Self::BlackWins,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinished => f.write_str("not finished"),
            Self::WhiteWins => f.write_str("1-0 (white wins)"),
            Self::BlackWins => f.write_str("0-1 (black wins)"),
            Self::Draw(reason) => {
                let reason = match reason {
                    DrawReason::InsufficientMaterial => "insufficient material",
                    DrawReason::Stalemate => "stalemate",
                    DrawReason::Repetition => "repetition",
                    DrawReason::NoProgress => "no progress",
                };
                write!(f, "1/2-1/2 (draw by {reason})")
            },
        }
    }
}

/// Adjudicates games. Holds the thresholds of the draw rules: the defaults
/// are the automatic draws of the FIDE rules (fivefold repetition is
/// replaced by the more common threefold one).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleManager {
    /// Number of occurrences of the same position that ends the game.
    pub repetitions: usize,
    /// Number of half-moves without captures and pawn moves that ends the
    /// game.
    pub no_progress_plies: u16,
}

impl Default for RuleManager {
    fn default() -> Self {
        Self {
            repetitions: 3,
            no_progress_plies: 150,
        }
    }
}

impl RuleManager {
    /// Classifies the position `id` of the game. The first matching rule
    /// wins:
    ///
    /// 1. Checkmate.
    /// 2. Stalemate.
    /// 3. Insufficient material.
    /// 4. Repetition.
    /// 5. No progress.
    #[must_use]
    pub fn endgame_status(&self, history: &History, id: PositionId) -> Status {
        let position = &history[id];
        if legal_moves(position).is_empty() {
            if position.in_check() {
                return Status::win(position.side_to_move().opponent());
            }
            return Status::Draw(DrawReason::Stalemate);
        }
        if has_insufficient_material(position.board()) {
            return Status::Draw(DrawReason::InsufficientMaterial);
        }
        if repetition_count(history, id) >= self.repetitions {
            return Status::Draw(DrawReason::Repetition);
        }
        if no_progress_plies(history, id) >= u32::from(self.no_progress_plies) {
            return Status::Draw(DrawReason::NoProgress);
        }
        Status::NotFinished
    }
}

/// Number of times the position `id` occurred in its game, including itself.
///
/// Captures and pawn moves can not be taken back, so only the positions since
/// the last one of them are compared.
#[must_use]
pub fn repetition_count(history: &History, id: PositionId) -> usize {
    let current = Signature::new(&history[id]);
    let mut count = 0;
    for position in history.ancestors(id) {
        if Signature::new(position) == current {
            count += 1;
        }
        if position.last_move().is_some_and(Move::is_irreversible) {
            break;
        }
    }
    count
}

/// Number of half-moves since the last capture or pawn move along the chain
/// ending at `id`. The clock of the initial position is added if the chain
/// reaches it.
#[must_use]
pub fn no_progress_plies(history: &History, id: PositionId) -> u32 {
    let mut plies = 0;
    for position in history.ancestors(id) {
        // The root may come from another game: its clock covers everything
        // before it, whatever its last move was.
        if position.previous().is_none() {
            plies += u32::from(position.halfmove_clock());
            break;
        }
        if position.last_move().is_some_and(Move::is_irreversible) {
            break;
        }
        plies += 1;
    }
    plies
}

/// Returns true if checkmate is impossible for both sides: kings alone, king
/// and a single minor piece against a king, or king and bishop against king
/// and bishop with both bishops on the same square color.
#[must_use]
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut minors = Vec::with_capacity(2);
    for (square, piece) in board.pieces() {
        match piece.kind {
            PieceKind::King => (),
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Bishop | PieceKind::Knight => minors.push((square, piece)),
        }
    }
    match minors.as_slice() {
        [] | [_] => true,
        [(first_square, first), (second_square, second)] => {
            first.kind == PieceKind::Bishop
                && second.kind == PieceKind::Bishop
                && first.owner != second.owner
                && first_square.is_light() == second_square.is_light()
        },
        _ => false,
    }
}

/// What makes two positions "the same" for repetition purposes. The en passant
/// square only counts if the capture is actually possible.
#[derive(PartialEq, Eq)]
struct Signature {
    board: Board,
    side_to_move: Player,
    castling: CastleRights,
    en_passant: Option<Square>,
}

impl Signature {
    fn new(position: &Position) -> Self {
        let en_passant = position.en_passant_square().filter(|&square| {
            legal_moves(position)
                .iter()
                .any(|m| m.kind() == PieceKind::Pawn && m.to() == square && m.is_capture())
        });
        Self {
            board: *position.board(),
            side_to_move: position.side_to_move(),
            castling: position.castling(),
            en_passant,
        }
    }
}
