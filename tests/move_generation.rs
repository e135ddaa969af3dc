use std::fs;

use arbiter::chess::game::Game;
use arbiter::chess::position::{perft, Position};
use arbiter::chess::rules;
use arbiter::notation;
use itertools::Itertools;
use pretty_assertions::assert_eq;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Position as _};

fn setup(input: &str) -> Position {
    let position = Position::try_from(input).unwrap();
    assert!(position.is_legal(), "{input}");
    position
}

fn sample_positions() -> Vec<String> {
    fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/positions.fen"
    ))
    .unwrap()
    .lines()
    .map(ToString::to_string)
    .collect()
}

fn reference(input: &str) -> Chess {
    let fen: shakmaty::fen::Fen = input.parse().unwrap();
    fen.into_position(CastlingMode::Standard).unwrap()
}

#[test]
fn perft_starting_position() {
    let position = Position::starting();
    assert_eq!(perft(&position, 0), 1);
    assert_eq!(perft(&position, 1), 20);
    assert_eq!(perft(&position, 2), 400);
    assert_eq!(perft(&position, 3), 8902);
}

// Positions and node counts from https://www.chessprogramming.org/Perft_Results
#[test]
fn chess_programming_wiki_perft_positions() {
    // Position 2, "kiwipete".
    let position =
        setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    assert_eq!(perft(&position, 1), 48);
    assert_eq!(perft(&position, 2), 2039);
    // Position 3.
    let position = setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&position, 1), 14);
    assert_eq!(perft(&position, 2), 191);
    assert_eq!(perft(&position, 3), 2812);
    // Position 4.
    let position = setup("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
    assert_eq!(perft(&position, 1), 6);
    assert_eq!(perft(&position, 2), 264);
    // Mirrored.
    let position = setup("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1");
    assert_eq!(perft(&position, 1), 6);
    assert_eq!(perft(&position, 2), 264);
    // Position 5.
    let position = setup("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    assert_eq!(perft(&position, 1), 44);
    assert_eq!(perft(&position, 2), 1486);
    // Position 6.
    let position =
        setup("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10");
    assert_eq!(perft(&position, 1), 46);
    assert_eq!(perft(&position, 2), 2079);
}

#[test]
fn promotion_perft() {
    let position = setup("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1");
    assert_eq!(perft(&position, 1), 24);
    assert_eq!(perft(&position, 2), 496);
}

#[test]
fn fen_round_trip() {
    for input in sample_positions() {
        assert_eq!(setup(&input).to_string(), input);
    }
}

#[test]
fn same_moves_as_shakmaty() {
    for input in sample_positions() {
        let position = setup(&input);
        assert_eq!(
            rules::expand_promotions(position.legal_moves())
                .iter()
                .map(ToString::to_string)
                .sorted()
                .collect::<Vec<_>>(),
            reference(&input)
                .legal_moves()
                .iter()
                .map(|m| m.to_uci(CastlingMode::Standard).to_string())
                .sorted()
                .collect::<Vec<_>>(),
            "{input}"
        );
    }
}

// Every move written by shakmaty in SAN resolves to the same move here.
#[test]
fn resolves_shakmaty_notation() {
    for input in sample_positions() {
        let game = Game::new(setup(&input));
        let chess = reference(&input);
        for m in &chess.legal_moves() {
            let token = San::from_move(&chess, m).to_string();
            let resolved = notation::resolve(&game, &token)
                .unwrap_or_else(|e| panic!("{token} in {input}: {e}"));
            assert_eq!(
                resolved.to_string(),
                m.to_uci(CastlingMode::Standard).to_string(),
                "{token} in {input}"
            );
        }
    }
}
