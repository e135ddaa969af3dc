//! Implementation of chess game, its rules and specifics.

pub mod attacks;
pub mod board;
pub mod core;
pub mod game;
pub mod history;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod rules;
