//! A game in progress: the history of positions, the cursor pointing at the
//! current one and the cached legal moves and status of that position.

use crate::chess::core::{Player, Square};
use crate::chess::history::{History, PositionId};
use crate::chess::moves::Move;
use crate::chess::position::Position;
use crate::chess::rules::{self, RuleManager, Status};
use crate::error::{Error, Result};

/// Single-writer game state. Every operation either succeeds or leaves the
/// game untouched.
#[derive(Clone, Debug)]
pub struct Game {
    history: History,
    current: PositionId,
    rules: RuleManager,
    moves: Vec<Move>,
    status: Status,
}

impl Game {
    /// Starts a game from the given position with the standard rules.
    #[must_use]
    pub fn new(root: Position) -> Self {
        Self::with_rules(root, RuleManager::default())
    }

    /// Starts a game from the given position with custom draw thresholds.
    #[must_use]
    pub fn with_rules(root: Position, rules: RuleManager) -> Self {
        let history = History::new(root);
        let current = history.root();
        let mut game = Self {
            history,
            current,
            rules,
            moves: Vec::new(),
            status: Status::NotFinished,
        };
        game.refresh();
        game
    }

    /// Standard chess game.
    #[must_use]
    pub fn starting() -> Self {
        Self::new(Position::starting())
    }

    fn refresh(&mut self) {
        self.moves = rules::legal_moves(self.position());
        self.status = self.rules.endgame_status(&self.history, self.current);
    }

    /// The current position.
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.history[self.current]
    }

    /// Id of the current position within [`Game::history`].
    #[must_use]
    pub const fn current(&self) -> PositionId {
        self.current
    }

    /// All positions played in this game, including the ones abandoned by
    /// [`Game::undo`].
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn rules(&self) -> &RuleManager {
        &self.rules
    }

    /// Status of the current position.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn color_to_move(&self) -> Player {
        self.position().side_to_move()
    }

    /// Legal moves in the current position. Promotions are listed without
    /// the choice: see [`Move::with_promotion`].
    #[must_use]
    pub fn legal_moves(&self) -> &[Move] {
        &self.moves
    }

    /// Legal moves of the piece standing on `square`.
    pub fn legal_moves_for(&self, square: Square) -> impl Iterator<Item = &Move> + '_ {
        self.moves.iter().filter(move |m| m.from() == square)
    }

    /// Plays the move and returns the new status.
    ///
    /// The move is matched against the legal moves by its main displacement,
    /// so the captures and linked displacements are always the ones this
    /// game generated. The promotion choice is taken from `next_move`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if the game is over or the promotion choice
    ///   does not match the move.
    /// - [`Error::IllegalMove`] if the move is not legal in the current
    ///   position.
    pub fn apply(&mut self, next_move: &Move) -> Result<Status> {
        if !self.status.is_play_allowed() {
            return Err(Error::InvalidState(format!(
                "can not play {next_move}: the game is over ({})",
                self.status
            )));
        }
        let Some(legal) = self
            .moves
            .iter()
            .find(|m| m.displacement() == next_move.displacement())
        else {
            return Err(Error::illegal(
                next_move.to_string(),
                format!("not a legal move in {}", self.position()),
            ));
        };
        let chosen = match next_move.promotion() {
            Some(promotion) => legal.clone().with_promotion(promotion)?,
            None => legal.clone(),
        };
        let next = self.position().apply(&chosen)?;
        self.current = self.history.push(self.current, next);
        self.refresh();
        Ok(self.status)
    }

    /// Steps back to the previous position and returns the position being
    /// left. The history keeps it: repetitions still count if it is reached
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] in the initial position.
    pub fn undo(&mut self) -> Result<&Position> {
        let left = self.current;
        let Some(previous) = self.history[left].previous() else {
            return Err(Error::InvalidState(
                "there are no moves to undo".to_string(),
            ));
        };
        self.current = previous;
        self.refresh();
        Ok(&self.history[left])
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::starting()
    }
}
