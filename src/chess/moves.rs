//! Move representation: the only way to get a new
//! [`crate::chess::position::Position`] out of an existing one.

use std::fmt;

use arrayvec::ArrayVec;

use crate::chess::core::{Piece, PieceKind, Promotion, Square};
use crate::error::{Error, Result};

/// Standard chess only needs one linked displacement: the rook relocation of
/// a castling move.
pub const MAX_LINKED_DISPLACEMENTS: usize = 1;

/// Atomic relocation of a single piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Displacement {
    #[allow(missing_docs)]
    pub piece: Piece,
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
}

impl Displacement {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(piece: Piece, from: Square, to: Square) -> Self {
        Self { piece, from, to }
    }
}

/// A piece taken off the board by a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capture {
    #[allow(missing_docs)]
    pub piece: Piece,
    /// Where the captured piece stands. For [en passant] captures this is not
    /// the destination of the capturing pawn.
    ///
    /// [en passant]: https://en.wikipedia.org/wiki/En_passant
    pub square: Square,
}

/// One legal transition produced by [`crate::chess::rules::RuleManager`].
///
/// Apart from the "regular" or "quiet" moves (simply moving a piece from one
/// square to the other), there are few important special cases:
///
/// - [En passant] is a capture of opponent's pawn "in passing": the captured
///   pawn is not on the destination square.
/// - The [Castle] move relocates the rook as well. Technically, castling is a
///   king move, so the main displacement corresponds to the king and the rook
///   is moved by a linked displacement.
/// - Pawn reaching the farthest rank has to be promoted: the move is
///   generated without the choice and the caller has to provide it with
///   [`Move::with_promotion`] before the move can be applied.
///
/// [Castle]: https://en.wikipedia.org/wiki/Castling
/// [En passant]: https://en.wikipedia.org/wiki/En_passant
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    displacement: Displacement,
    linked: ArrayVec<Displacement, MAX_LINKED_DISPLACEMENTS>,
    captured: Option<Capture>,
    promotion: Option<Promotion>,
    promotion_required: bool,
}

impl Move {
    /// Creates a simple move, possibly with a capture.
    #[must_use]
    pub fn new(displacement: Displacement, captured: Option<Capture>) -> Self {
        Self {
            displacement,
            linked: ArrayVec::new(),
            captured,
            promotion: None,
            promotion_required: false,
        }
    }

    /// Creates a multi-displacement move (castling).
    #[must_use]
    pub fn with_linked(displacement: Displacement, linked: Displacement) -> Self {
        let mut result = Self::new(displacement, None);
        result.linked.push(linked);
        result
    }

    pub(crate) fn require_promotion(mut self) -> Self {
        self.promotion_required = true;
        self
    }

    /// Sets the piece the pawn is promoted to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the move does not promote.
    pub fn with_promotion(mut self, promotion: Promotion) -> Result<Self> {
        if !self.promotion_required {
            return Err(Error::InvalidState(format!(
                "{self} is not a promotion, can not promote to {promotion:?}"
            )));
        }
        self.promotion = Some(promotion);
        Ok(self)
    }

    /// Returns the main displacement of the move.
    #[must_use]
    pub const fn displacement(&self) -> &Displacement {
        &self.displacement
    }

    /// Returns the linked displacements of the move: only castling has one.
    #[must_use]
    pub fn linked(&self) -> &[Displacement] {
        &self.linked
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn captured(&self) -> Option<&Capture> {
        self.captured.as_ref()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// Returns true if a promotion has to be chosen before applying the move.
    #[must_use]
    pub const fn is_promotion_required(&self) -> bool {
        self.promotion_required
    }

    /// Square the moving piece starts from.
    #[must_use]
    pub const fn from(&self) -> Square {
        self.displacement.from
    }

    /// Square the moving piece lands on.
    #[must_use]
    pub const fn to(&self) -> Square {
        self.displacement.to
    }

    /// Kind of the moving piece (before promotion).
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.displacement.piece.kind
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_castle(&self) -> bool {
        !self.linked.is_empty()
    }

    /// Captures and pawn moves can never be undone: they reset the halfmove
    /// clock and break repetitions.
    #[must_use]
    pub const fn is_irreversible(&self) -> bool {
        self.is_capture() || matches!(self.kind(), PieceKind::Pawn)
    }

    /// Errors out if the promotion choice and the need for it disagree.
    pub(crate) fn check_promotion(&self) -> Result<()> {
        match (self.promotion_required, self.promotion) {
            (true, None) => Err(Error::InvalidState(format!(
                "{self} requires a promotion but none has been set"
            ))),
            (false, Some(promotion)) => Err(Error::InvalidState(format!(
                "{self} is not a promotion but promotion to {promotion:?} has been set"
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}
