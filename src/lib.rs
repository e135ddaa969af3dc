//! Chess rule engine: legal move generation, game outcome adjudication and
//! Standard Algebraic Notation.
//!
//! The engine does not play chess: it is the arbiter of a game played by
//! someone else. A [`chess::game::Game`] keeps the positions played so far,
//! accepts only legal moves and reports when the game is over.
//!
//! ```
//! use arbiter::chess::game::Game;
//! use arbiter::chess::rules::Status;
//!
//! let mut game = Game::starting();
//! assert_eq!(game.legal_moves().len(), 20);
//! let status = arbiter::notation::do_moves(&mut game, ["e4", "e5", "Nf3"]).unwrap();
//! assert_eq!(status, Status::NotFinished);
//! ```

pub mod chess;
pub mod error;
pub mod notation;

pub use error::{Error, Result};
use shadow_rs::shadow;

shadow!(build);

/// Build type and target. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full crate version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version on startup.
pub fn print_engine_info() {
    println!("Arbiter chess rule engine {}", engine_version());
}

/// Prints information the build type, features and whether the build is clean
/// on startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Features: {FEATURES}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
