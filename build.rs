//! Retrieves information about the version of the crate from Git and the build
//! environment. This information is then written to a file in the output
//! directory and printed by the binary on startup.

use std::path::Path;
use std::{env, fs};

fn generate_file(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join(filename);
    fs::write(dest_path, contents).unwrap();
}

/// Cargo profile and the optional debug checks enabled for it.
fn generate_build_info() {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let features = format!(
        "profile={profile} {}debug-assertions",
        if env::var_os("CARGO_CFG_DEBUG_ASSERTIONS").is_some() {
            "+"
        } else {
            "-"
        }
    );
    generate_file("features", &features);
}

fn main() -> shadow_rs::SdResult<()> {
    generate_build_info();
    shadow_rs::new()
}
