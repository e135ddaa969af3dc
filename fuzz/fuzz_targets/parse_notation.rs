#![no_main]
use arbiter::chess::game::Game;
use arbiter::notation;
use libfuzzer_sys::fuzz_target;

// Arbitrary token sequences never panic and never corrupt the game.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut game = Game::starting();
    for token in input.split_whitespace() {
        let before = game.history().len();
        match notation::do_move(&mut game, token) {
            Ok(_) => assert_eq!(game.history().len(), before + 1),
            Err(_) => assert_eq!(game.history().len(), before),
        }
    }
});
