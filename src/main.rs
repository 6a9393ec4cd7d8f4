//! pgl CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`, prints errors to
//! stderr, and exits non-zero on failure. All logic lives in the library.

use pgl::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
