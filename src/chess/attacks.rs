//! Square attack detection and the piece geometry shared with the move
//! generator.
//!
//! A square is attacked by a player if any of the player's pieces could
//! capture on it: this is the pseudo-legal reach of the pieces without any
//! check filtering. Castling never attacks anything and pawns attack
//! diagonally regardless of whether the target square is occupied. Keeping
//! this separate from [`crate::chess::rules`] is what makes legality
//! filtering (which needs attack information) non-recursive.

use crate::chess::board::Board;
use crate::chess::core::{Direction, PieceKind, Player, Square};

/// (files, ranks) jumps of a knight.
pub(super) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Directions a queen (and the king, one step at a time) moves in.
pub(super) const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::Up,
    Direction::UpRight,
    Direction::Right,
    Direction::DownRight,
    Direction::Down,
    Direction::DownLeft,
    Direction::Left,
    Direction::UpLeft,
];

/// Checks whether any piece of `attacker` can capture on `target`.
///
/// The search goes backwards from the target: a knight two-one jump away, a
/// king next to it, a pawn diagonally behind it (from the attacker's point of
/// view) or a slider with a clear line towards it.
#[must_use]
pub fn is_attacked(board: &Board, target: Square, attacker: Player) -> bool {
    let holds = |square: Option<Square>, kinds: &[PieceKind]| {
        square
            .and_then(|square| board.get(square))
            .is_some_and(|piece| piece.owner == attacker && kinds.contains(&piece.kind))
    };
    let (_, forward) = attacker.push_direction().delta();
    if [-1, 1]
        .into_iter()
        .any(|files| holds(target.offset(files, -forward), &[PieceKind::Pawn]))
    {
        return true;
    }
    if KNIGHT_OFFSETS
        .iter()
        .any(|&(files, ranks)| holds(target.offset(files, ranks), &[PieceKind::Knight]))
    {
        return true;
    }
    if ALL_DIRECTIONS
        .iter()
        .any(|&direction| holds(target.shift(direction), &[PieceKind::King]))
    {
        return true;
    }
    let first_blocker = |direction: Direction| {
        let mut current = target;
        while let Some(next) = current.shift(direction) {
            if board.get(next).is_some() {
                return Some(next);
            }
            current = next;
        }
        None
    };
    Direction::ORTHOGONAL
        .iter()
        .any(|&direction| holds(first_blocker(direction), &[PieceKind::Rook, PieceKind::Queen]))
        || Direction::DIAGONAL.iter().any(|&direction| {
            holds(first_blocker(direction), &[PieceKind::Bishop, PieceKind::Queen])
        })
}

/// Checks whether the player's king is attacked. A player without a king (only
/// possible in hand-made setups) is never in check.
#[must_use]
pub fn in_check(board: &Board, player: Player) -> bool {
    board
        .king(player)
        .is_some_and(|king| is_attacked(board, king, player.opponent()))
}
