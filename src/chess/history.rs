//! Game history: an append-only arena of positions.
//!
//! Each [`Position`] refers to its predecessor by [`PositionId`], so a game
//! is a chain of ids from the current position back to the root. Undoing a
//! move only moves the caller's cursor: entries are never removed, and
//! alternative continuations after an undo simply form new branches.

use std::ops::Index;

use crate::chess::position::Position;

/// Stable handle of a position within a [`History`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionId(usize);

/// Arena owning every position of a game.
#[derive(Clone, Debug)]
pub struct History {
    positions: Vec<Position>,
}

impl History {
    /// Starts a history with the given initial position. Any link to a
    /// previous position the root had is dropped.
    #[must_use]
    pub fn new(mut root: Position) -> Self {
        root.set_previous(None);
        Self {
            positions: vec![root],
        }
    }

    /// Id of the initial position.
    #[must_use]
    pub const fn root(&self) -> PositionId {
        PositionId(0)
    }

    /// Appends a position derived from `parent` and returns its id.
    pub fn push(&mut self, parent: PositionId, mut position: Position) -> PositionId {
        debug_assert!(parent.0 < self.positions.len());
        position.set_previous(Some(parent));
        self.positions.push(position);
        PositionId(self.positions.len() - 1)
    }

    /// Returns the position if the id belongs to this history.
    #[must_use]
    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(id.0)
    }

    /// Number of stored positions, including abandoned branches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// A history always holds at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Walks the chain from `id` (inclusive) back to the root.
    pub fn ancestors(&self, id: PositionId) -> impl Iterator<Item = &Position> + '_ {
        std::iter::successors(self.get(id), |position| {
            position.previous().and_then(|previous| self.get(previous))
        })
    }
}

impl Index<PositionId> for History {
    type Output = Position;

    fn index(&self, id: PositionId) -> &Position {
        &self.positions[id.0]
    }
}
