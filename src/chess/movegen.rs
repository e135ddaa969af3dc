//! Pseudo-legal [move generation]: every geometrically reachable square of a
//! piece, ignoring whether the move would leave its own king in check.
//!
//! Piece kinds form a closed set and [`pseudo_legal_displacements`] is the
//! single place dispatching on it.
//!
//! [move generation]: https://www.chessprogramming.org/Move_Generation

use crate::chess::attacks::{self, ALL_DIRECTIONS, KNIGHT_OFFSETS};
use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights,
    Direction,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
};
use crate::chess::moves::Displacement;
use crate::chess::position::Position;

/// Geometry of one of the four castling moves.
#[derive(Debug)]
pub struct Castle {
    /// Right that has to be held for the castling to be possible.
    pub right: CastleRights,
    #[allow(missing_docs)]
    pub king_from: Square,
    #[allow(missing_docs)]
    pub king_to: Square,
    #[allow(missing_docs)]
    pub rook_from: Square,
    #[allow(missing_docs)]
    pub rook_to: Square,
    /// Squares between the king and the rook: all of them have to be empty.
    between: &'static [Square],
    /// Squares the king passes through or lands on: none of them can be
    /// attacked.
    king_walk: &'static [Square],
}

/// Short and long castling of both players.
pub const CASTLES: [Castle; 4] = [
    Castle {
        right: CastleRights::WHITE_SHORT,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        between: &[Square::F1, Square::G1],
        king_walk: &[Square::F1, Square::G1],
    },
    Castle {
        right: CastleRights::WHITE_LONG,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        between: &[Square::D1, Square::C1, Square::B1],
        king_walk: &[Square::D1, Square::C1],
    },
    Castle {
        right: CastleRights::BLACK_SHORT,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        between: &[Square::F8, Square::G8],
        king_walk: &[Square::F8, Square::G8],
    },
    Castle {
        right: CastleRights::BLACK_LONG,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        between: &[Square::D8, Square::C8, Square::B8],
        king_walk: &[Square::D8, Square::C8],
    },
];

impl Castle {
    /// Finds castling by the king displacement it consists of.
    #[must_use]
    pub fn find(king_from: Square, king_to: Square) -> Option<&'static Self> {
        CASTLES
            .iter()
            .find(|castle| castle.king_from == king_from && castle.king_to == king_to)
    }

    const fn owner(&self) -> Player {
        if self.right.intersects(CastleRights::WHITE_BOTH) {
            Player::White
        } else {
            Player::Black
        }
    }

    /// True if the king and the rook stand on their original squares.
    pub(crate) fn is_in_place(&self, board: &Board) -> bool {
        let owner = self.owner();
        board.get(self.king_from) == Some(Piece::new(owner, PieceKind::King))
            && board.get(self.rook_from) == Some(Piece::new(owner, PieceKind::Rook))
    }

    /// True if the king and rook are still in place, the castling right is
    /// held, the path is clear and the king does not start in, pass through or
    /// land on an attacked square.
    fn is_available(&self, position: &Position) -> bool {
        let board = position.board();
        let owner = self.owner();
        position.castling().contains(self.right)
            && self.is_in_place(board)
            && self.between.iter().all(|&square| board.get(square).is_none())
            && !attacks::is_attacked(board, self.king_from, owner.opponent())
            && !self
                .king_walk
                .iter()
                .any(|&square| attacks::is_attacked(board, square, owner.opponent()))
    }
}

/// Generates all squares the piece standing on `from` can reach, ignoring
/// self-check. Returns nothing for an empty square.
///
/// Castling is included for the king: the linked rook displacement is
/// attached when the displacement is materialized as a
/// [`crate::chess::moves::Move`].
#[must_use]
pub fn pseudo_legal_displacements(position: &Position, from: Square) -> Vec<Displacement> {
    let Some(piece) = position.board().get(from) else {
        return vec![];
    };
    let board = position.board();
    let mut result = Vec::with_capacity(16);
    match piece.kind {
        PieceKind::Pawn => pawn(position, piece, from, &mut result),
        PieceKind::Knight => leap(board, piece, from, KNIGHT_OFFSETS.into_iter(), &mut result),
        PieceKind::Bishop => slide(board, piece, from, &Direction::DIAGONAL, &mut result),
        PieceKind::Rook => slide(board, piece, from, &Direction::ORTHOGONAL, &mut result),
        PieceKind::Queen => slide(board, piece, from, &ALL_DIRECTIONS, &mut result),
        PieceKind::King => {
            leap(
                board,
                piece,
                from,
                ALL_DIRECTIONS.iter().map(|direction| direction.delta()),
                &mut result,
            );
            result.extend(
                CASTLES
                    .iter()
                    .filter(|castle| castle.king_from == from && castle.owner() == piece.owner)
                    .filter(|castle| castle.is_available(position))
                    .map(|castle| Displacement::new(piece, from, castle.king_to)),
            );
        },
    }
    result
}

fn can_land(board: &Board, piece: Piece, to: Square) -> bool {
    board
        .get(to)
        .map_or(true, |occupant| occupant.owner != piece.owner)
}

fn leap(
    board: &Board,
    piece: Piece,
    from: Square,
    offsets: impl Iterator<Item = (i8, i8)>,
    result: &mut Vec<Displacement>,
) {
    for (files, ranks) in offsets {
        if let Some(to) = from.offset(files, ranks) {
            if can_land(board, piece, to) {
                result.push(Displacement::new(piece, from, to));
            }
        }
    }
}

fn slide(
    board: &Board,
    piece: Piece,
    from: Square,
    directions: &[Direction],
    result: &mut Vec<Displacement>,
) {
    for &direction in directions {
        let mut current = from;
        while let Some(to) = current.shift(direction) {
            match board.get(to) {
                None => result.push(Displacement::new(piece, from, to)),
                Some(blocker) => {
                    if blocker.owner != piece.owner {
                        result.push(Displacement::new(piece, from, to));
                    }
                    break;
                },
            }
            current = to;
        }
    }
}

fn pawn(position: &Position, piece: Piece, from: Square, result: &mut Vec<Displacement>) {
    let board = position.board();
    let direction = piece.owner.push_direction();
    if let Some(single) = from.shift(direction) {
        if board.get(single).is_none() {
            result.push(Displacement::new(piece, from, single));
            if from.rank() == Rank::pawns_starting(piece.owner) {
                if let Some(double) = single.shift(direction) {
                    if board.get(double).is_none() {
                        result.push(Displacement::new(piece, from, double));
                    }
                }
            }
        }
    }
    let (_, forward) = direction.delta();
    for files in [-1, 1] {
        let Some(to) = from.offset(files, forward) else {
            continue;
        };
        match board.get(to) {
            Some(target) if target.owner != piece.owner => {
                result.push(Displacement::new(piece, from, to));
            },
            None if is_en_passant(position, piece, from, to) => {
                result.push(Displacement::new(piece, from, to));
            },
            _ => (),
        }
    }
}

/// The pawn just pushed by two squares stands next to the capturing pawn and
/// the destination is the square it skipped.
fn is_en_passant(position: &Position, piece: Piece, from: Square, to: Square) -> bool {
    position.en_passant_square() == Some(to)
        && position.board().get(en_passant_victim(from, to))
            == Some(Piece::new(piece.owner.opponent(), PieceKind::Pawn))
}

/// Square of the pawn captured en passant by a pawn moving `from` → `to`.
#[must_use]
pub const fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::new(to.file(), from.rank())
}
