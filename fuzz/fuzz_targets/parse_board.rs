#![no_main]
use arbiter::chess::position;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(position) = position::Position::try_from(s) {
            let serialized = position.to_string();
            let parsed = position::Position::from_fen(&serialized)
                .expect("serialized position should be parsed back");
            assert_eq!(parsed.to_string(), serialized);
        }
    }
});
