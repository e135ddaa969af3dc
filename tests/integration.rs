use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "arbiter";

#[test]
fn build_info() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("quit\n")
            .assert()
            .success()
            .stdout(contains("Arbiter chess rule engine").and(contains("Release build"))),
    );
}

#[test]
fn plays_notation() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("e4 e5 Qh5 Nc6 Bc4 Nf6\nQxf7#\nstatus\n")
            .assert()
            .success()
            .stdout(contains("not finished").and(contains("1-0 (white wins)"))),
    );
}

#[test]
fn reports_errors() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("Qh5\nposition startpos\nNf4\ne9\n")
            .assert()
            .success()
            .stdout(
                contains("Error: illegal move 'Qh5'")
                    .and(contains("Error: illegal move 'Nf4'"))
                    .and(contains("Error: can not parse 'e9'")),
            ),
    );
}

#[test]
fn position_setup() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("position fen 7k/P7/8/8/8/8/8/K7 w - - 0 1\nmoves\na8=Q+\nd\n")
            .assert()
            .success()
            .stdout(
                contains("a7a8")
                    .and(contains("a1b2"))
                    .and(contains("FEN: Q6k/8/8/8/8/8/8/K7 b - - 0 1")),
            ),
    );
}
