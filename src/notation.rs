//! [Standard Algebraic Notation] (SAN) input: turns tokens like `Nf3`, `exd5`,
//! `Rae8`, `a8=Q` or `O-O` into one of the legal moves of a game.
//!
//! Parsing is structural: the token is split into the moving piece kind,
//! optional disambiguation, the capture marker, the destination and the
//! promotion. Resolution then narrows down the legal moves of the current
//! position to the single one the token describes. The notation is only
//! read, never produced.
//!
//! ```
//! use arbiter::chess::game::Game;
//! use arbiter::chess::rules::Status;
//! use arbiter::notation;
//!
//! let mut game = Game::starting();
//! let status = notation::do_moves(&mut game, ["f3", "e5", "g4", "Qh4#"]).unwrap();
//! assert_eq!(status, Status::BlackWins);
//! ```
//!
//! [Standard Algebraic Notation]: https://en.wikipedia.org/wiki/Algebraic_notation_(chess)

use itertools::Itertools;

use crate::chess::core::{File, PieceKind, Promotion, Rank, Square};
use crate::chess::game::Game;
use crate::chess::moves::Move;
use crate::chess::rules::Status;
use crate::error::{Error, Result};

/// Structure of a SAN token, before it is matched against a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SanMove {
    /// `O-O` (short) or `O-O-O` (long).
    Castle {
        #[allow(missing_docs)]
        long: bool,
    },
    /// Any other move.
    Standard {
        /// Kind of the moving piece: no letter means a pawn.
        kind: PieceKind,
        /// File of the origin square, if given.
        file: Option<File>,
        /// Rank of the origin square, if given.
        rank: Option<Rank>,
        /// The token has the `x` marker.
        capture: bool,
        #[allow(missing_docs)]
        to: Square,
        #[allow(missing_docs)]
        promotion: Option<Promotion>,
    },
}

impl TryFrom<&str> for SanMove {
    type Error = Error;

    /// Parses a single SAN token. Check (`+`) and checkmate (`#`) markers are
    /// accepted and ignored.
    ///
    /// SAN ::= Castle | Piece? File? Rank? 'x'? Square ('=' Promotion)?
    fn try_from(token: &str) -> Result<Self> {
        let body = token.trim_end_matches(['+', '#']);
        match body {
            "O-O" => return Ok(Self::Castle { long: false }),
            "O-O-O" => return Ok(Self::Castle { long: true }),
            _ => (),
        }
        let (body, promotion) = match body.split_once('=') {
            Some((body, promotion)) => (body, Some(parse_promotion(token, promotion)?)),
            None => (body, None),
        };
        let mut chars = body.chars().peekable();
        let kind = match chars.peek() {
            Some(symbol) if symbol.is_ascii_uppercase() => {
                let kind = parse_piece(token, *symbol)?;
                let _ = chars.next();
                kind
            },
            _ => PieceKind::Pawn,
        };
        let rest = chars.collect_vec();
        if rest.len() < 2 {
            return Err(Error::parse(token, "destination square is missing"));
        }
        let (prefix, destination) = rest.split_at(rest.len() - 2);
        let parse_file = |symbol: char| File::try_from(symbol).map_err(in_token(token));
        let parse_rank = |symbol: char| Rank::try_from(symbol).map_err(in_token(token));
        let to = Square::new(parse_file(destination[0])?, parse_rank(destination[1])?);
        let (prefix, capture) = match prefix.split_last() {
            Some(('x', prefix)) => (prefix, true),
            _ => (prefix, false),
        };
        let (file, rank) = match *prefix {
            [] => (None, None),
            [file, rank] => (Some(parse_file(file)?), Some(parse_rank(rank)?)),
            [single] if single.is_ascii_digit() => (None, Some(parse_rank(single)?)),
            [single] => (Some(parse_file(single)?), None),
            _ => return Err(Error::parse(token, "unexpected symbols before the destination")),
        };
        Ok(Self::Standard {
            kind,
            file,
            rank,
            capture,
            to,
            promotion,
        })
    }
}

/// Reports the whole token instead of the offending character.
fn in_token(token: &str) -> impl Fn(Error) -> Error + '_ {
    move |error| match error {
        Error::Parse { reason, .. } => Error::parse(token, reason),
        other => other,
    }
}

fn parse_piece(token: &str, symbol: char) -> Result<PieceKind> {
    match symbol {
        'K' => Ok(PieceKind::King),
        'Q' => Ok(PieceKind::Queen),
        'R' => Ok(PieceKind::Rook),
        'B' => Ok(PieceKind::Bishop),
        'N' => Ok(PieceKind::Knight),
        _ => Err(Error::parse(
            token,
            format!("piece letter should be one of \"KQRBN\", got '{symbol}'"),
        )),
    }
}

fn parse_promotion(token: &str, promotion: &str) -> Result<Promotion> {
    let Ok(symbol) = promotion.chars().exactly_one() else {
        return Err(Error::parse(token, "promotion should be a single letter"));
    };
    match parse_piece(token, symbol)? {
        PieceKind::King => Err(Error::parse(token, "pawn can not be promoted to a king")),
        kind => Promotion::try_from(kind),
    }
}

impl SanMove {
    fn matches(&self, candidate: &Move) -> bool {
        match *self {
            Self::Castle { long } => {
                candidate.is_castle() && (candidate.to().file() == File::C) == long
            },
            Self::Standard {
                kind,
                file,
                rank,
                capture,
                to,
                ..
            } => {
                !candidate.is_castle()
                    && candidate.kind() == kind
                    && candidate.to() == to
                    && file.map_or(true, |file| candidate.from().file() == file)
                    && rank.map_or(true, |rank| candidate.from().rank() == rank)
                    && (!capture || candidate.is_capture())
            },
        }
    }

    const fn promotion(&self) -> Option<Promotion> {
        match *self {
            Self::Castle { .. } => None,
            Self::Standard { promotion, .. } => promotion,
        }
    }

    /// Picks the only legal move described by this token.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalMove`] if no move or more than one move matches.
    /// - [`Error::InvalidState`] if the matched move promotes but no
    ///   promotion was given or vice versa.
    pub fn resolve(&self, token: &str, legal_moves: &[Move]) -> Result<Move> {
        let candidates = legal_moves
            .iter()
            .filter(|candidate| self.matches(candidate))
            .collect_vec();
        let resolved = match candidates.as_slice() {
            [single] => (*single).clone(),
            [] => return Err(Error::illegal(token, "no legal move matches")),
            several => {
                return Err(Error::illegal(
                    token,
                    format!("ambiguous, matches {}", several.iter().join(", ")),
                ))
            },
        };
        match (resolved.is_promotion_required(), self.promotion()) {
            (true, Some(promotion)) => resolved.with_promotion(promotion),
            (false, None) => Ok(resolved),
            (true, None) => Err(Error::InvalidState(format!(
                "{token} reaches the last rank and needs a promotion"
            ))),
            (false, Some(promotion)) => Err(Error::InvalidState(format!(
                "{token} can not promote to {promotion:?}"
            ))),
        }
    }
}

/// Finds the legal move described by `token` in the current position of the
/// game.
///
/// # Errors
///
/// Parsing errors of [`SanMove`] and the errors of [`SanMove::resolve`].
pub fn resolve(game: &Game, token: &str) -> Result<Move> {
    SanMove::try_from(token)?.resolve(token, game.legal_moves())
}

/// Plays the move described by `token` and returns the new status.
///
/// # Errors
///
/// [`Error::Parse`] for malformed tokens, [`Error::IllegalMove`] if the token
/// does not identify exactly one legal move and [`Error::InvalidState`] if the
/// game is over or the promotion does not match. The game is unchanged on
/// failure.
pub fn do_move(game: &mut Game, token: &str) -> Result<Status> {
    let san = SanMove::try_from(token)?;
    if !game.status().is_play_allowed() {
        return Err(Error::InvalidState(format!(
            "can not play {token}: the game is over ({})",
            game.status()
        )));
    }
    let resolved = san.resolve(token, game.legal_moves())?;
    game.apply(&resolved)
}

/// Plays the tokens one by one and returns the status after the last one.
/// Stops at the first failure: the moves before it stay played.
///
/// # Errors
///
/// The error of the first token that could not be played.
pub fn do_moves<I>(game: &mut Game, tokens: I) -> Result<Status>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut status = game.status();
    for token in tokens {
        status = do_move(game, token.as_ref())?;
    }
    Ok(status)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::{Piece, Player};
    use crate::chess::position::Position;

    fn place(pieces: &[(u8, u8, Piece)]) -> Game {
        let mut position = Position::empty(Player::White);
        for &(row, column, piece) in pieces {
            position.put_at(row, column, Some(piece)).unwrap();
        }
        Game::new(position)
    }

    const WHITE_KING: Piece = Piece::new(Player::White, PieceKind::King);
    const BLACK_KING: Piece = Piece::new(Player::Black, PieceKind::King);

    #[test]
    fn parse() {
        assert_eq!(
            SanMove::try_from("Nbd7"),
            Ok(SanMove::Standard {
                kind: PieceKind::Knight,
                file: Some(File::B),
                rank: None,
                capture: false,
                to: Square::D7,
                promotion: None,
            })
        );
        assert_eq!(
            SanMove::try_from("exd8=N+"),
            Ok(SanMove::Standard {
                kind: PieceKind::Pawn,
                file: Some(File::E),
                rank: None,
                capture: true,
                to: Square::D8,
                promotion: Some(Promotion::Knight),
            })
        );
        assert_eq!(
            SanMove::try_from("Qh4e1#"),
            Ok(SanMove::Standard {
                kind: PieceKind::Queen,
                file: Some(File::H),
                rank: Some(Rank::Four),
                capture: false,
                to: Square::E1,
                promotion: None,
            })
        );
        assert_eq!(
            SanMove::try_from("R1a3"),
            Ok(SanMove::Standard {
                kind: PieceKind::Rook,
                file: None,
                rank: Some(Rank::One),
                capture: false,
                to: Square::A3,
                promotion: None,
            })
        );
        assert_eq!(SanMove::try_from("O-O+"), Ok(SanMove::Castle { long: false }));
        assert_eq!(SanMove::try_from("O-O-O"), Ok(SanMove::Castle { long: true }));
    }

    #[test]
    fn parse_errors() {
        for token in [
            "z3", "Kz3", "b9", "Kb9", "", "K", "Xe4", "e4=K", "e8=", "e8=QQ", "Nbbd7", "O-O-O-O",
            "Ke",
        ] {
            assert!(
                matches!(SanMove::try_from(token), Err(Error::Parse { .. })),
                "{token}"
            );
        }
    }

    #[test]
    fn simple_game() {
        let mut game = Game::starting();
        assert_eq!(do_move(&mut game, "f3"), Ok(Status::NotFinished));
        assert_eq!(do_move(&mut game, "e5"), Ok(Status::NotFinished));
        assert_eq!(do_move(&mut game, "g4"), Ok(Status::NotFinished));
        assert_eq!(do_move(&mut game, "Qh4"), Ok(Status::BlackWins));
        assert_eq!(game.legal_moves().len(), 0);
        assert!(matches!(
            do_move(&mut game, "a3"),
            Err(Error::InvalidState(_))
        ));
        // Malformed tokens are reported as such even after the game is over.
        assert!(matches!(do_move(&mut game, "z9"), Err(Error::Parse { .. })));
        assert_eq!(game.history().len(), 5);
    }

    #[test]
    fn long_game() {
        let mut game = Game::starting();
        // 1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 (Ruy Lopez) ... 43. Re6
        let status = do_moves(
            &mut game,
            [
                "e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6", "O-O", "Be7", "Re1", "b5",
                "Bb3", "d6", "c3", "O-O", "h3", "Nb8", "d4", "Nbd7", "c4", "c6", "cxb5", "axb5",
                "Nc3", "Bb7", "Bg5", "b4", "Nb1", "h6", "Bh4", "c5", "dxe5", "Nxe4", "Bxe7",
                "Qxe7", "exd6", "Qf6", "Nbd2", "Nxd6", "Nc4", "Nxc4", "Bxc4", "Nb6", "Ne5",
                "Rae8", "Bxf7+", "Rxf7", "Nxf7", "Rxe1+", "Qxe1", "Kxf7", "Qe3", "Qg5", "Qxg5",
                "hxg5", "b3", "Ke6", "a3", "Kd6", "axb4", "cxb4", "Ra5", "Nd5", "f3", "Bc8",
                "Kf2", "Bf5", "Ra7", "g6", "Ra6+", "Kc5", "Ke1", "Nf4", "g3", "Nxh3", "Kd2",
                "Kb5", "Rd6", "Kc5", "Ra6", "Nf2", "g4", "Bd3", "Re6",
            ],
        );
        assert_eq!(status, Ok(Status::NotFinished));
        assert_eq!(game.color_to_move(), Player::Black);
        assert_eq!(game.history().len(), 86);
        assert_eq!(
            game.position().board().get(Square::E6),
            Some(Piece::new(Player::White, PieceKind::Rook))
        );
        assert_eq!(
            game.position().board().get(Square::D3),
            Some(Piece::new(Player::Black, PieceKind::Bishop))
        );
    }

    #[test]
    fn invalid_moves() {
        let mut game = Game::starting();
        for token in ["e5", "exd4", "Nxc3", "O-O", "O-O-O", "Ke2", "Bxc3"] {
            assert!(
                matches!(do_move(&mut game, token), Err(Error::IllegalMove { .. })),
                "{token}"
            );
        }
        assert_eq!(game.position(), &Position::starting());
    }

    #[test]
    fn capture_marker() {
        let mut game = Game::starting();
        assert_eq!(
            do_moves(&mut game, ["e4", "d5"]),
            Ok(Status::NotFinished)
        );
        // The marker is not required for captures.
        assert_eq!(
            resolve(&game, "ed5").map(|m| m.to_string()),
            Ok("e4d5".to_string())
        );
        assert!(resolve(&game, "ed5").unwrap().is_capture());
        // But it requires one.
        assert!(matches!(
            resolve(&game, "Nxf3"),
            Err(Error::IllegalMove { .. })
        ));
    }

    #[test]
    fn ambiguous_move() {
        let white_bishop = Piece::new(Player::White, PieceKind::Bishop);
        let game = place(&[
            (0, 7, WHITE_KING),
            (7, 7, BLACK_KING),
            (0, 0, white_bishop),
            (2, 2, white_bishop),
        ]);
        assert!(matches!(
            resolve(&game, "Bb2"),
            Err(Error::IllegalMove { .. })
        ));
        assert!(matches!(
            resolve(&game, "Bbb2"),
            Err(Error::IllegalMove { .. })
        ));
        let from_a = resolve(&game, "Bab2").unwrap();
        let from_c = resolve(&game, "Bcb2").unwrap();
        assert_eq!(from_a.from(), Square::A1);
        assert_eq!(from_c.from(), Square::C3);
        assert_ne!(from_a, from_c);
        assert_eq!(resolve(&game, "B3b2"), Ok(from_c));

        // Two bishops can still mate: the game goes on.
        let mut game = game;
        assert_eq!(game.status(), Status::NotFinished);
        assert_eq!(do_move(&mut game, "Bab2"), Ok(Status::NotFinished));
        assert_eq!(do_move(&mut game, "Kg8"), Ok(Status::NotFinished));
    }

    #[test]
    fn promotion() {
        let mut game = place(&[
            (0, 7, WHITE_KING),
            (6, 0, Piece::new(Player::White, PieceKind::Pawn)),
            (7, 7, BLACK_KING),
            (6, 6, Piece::new(Player::Black, PieceKind::Pawn)),
            (6, 7, Piece::new(Player::Black, PieceKind::Pawn)),
        ]);
        assert!(matches!(
            do_move(&mut game, "a8"),
            Err(Error::InvalidState(_))
        ));
        assert_eq!(game.history().len(), 1);
        assert_eq!(do_move(&mut game, "a8=Q"), Ok(Status::WhiteWins));
        assert_eq!(
            game.position().board().get(Square::A8),
            Some(Piece::new(Player::White, PieceKind::Queen))
        );
    }

    #[test]
    fn non_promotion_move() {
        let mut game = Game::starting();
        assert!(matches!(
            do_move(&mut game, "e4=Q"),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn parse_error_through_game() {
        let mut game = Game::starting();
        for token in ["z3", "Kz3", "b9", "Kb9"] {
            assert!(
                matches!(do_move(&mut game, token), Err(Error::Parse { .. })),
                "{token}"
            );
        }
    }

    #[test]
    fn castling() {
        let mut game = Game::new(
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap(),
        );
        // The king move to the castling square is only reachable by castling
        // notation.
        assert!(matches!(
            do_move(&mut game, "Kg1"),
            Err(Error::IllegalMove { .. })
        ));
        assert_eq!(do_move(&mut game, "O-O"), Ok(Status::NotFinished));
        assert_eq!(do_move(&mut game, "O-O-O"), Ok(Status::NotFinished));
        assert_eq!(
            game.position().to_string(),
            "2kr3r/pppppppp/8/8/8/8/PPPPPPPP/R4RK1 w - - 2 2"
        );
    }

    #[test]
    fn do_moves_stops_at_first_failure() {
        let mut game = Game::starting();
        let result = do_moves(&mut game, ["e4", "e5", "Ke3", "Nf3"]);
        assert!(matches!(result, Err(Error::IllegalMove { input, .. }) if input == "Ke3"));
        assert_eq!(game.history().len(), 3);
        assert_eq!(game.color_to_move(), Player::White);
        assert_eq!(do_moves(&mut game, Vec::<String>::new()), Ok(Status::NotFinished));
    }
}
