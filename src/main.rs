//! criteria CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`; failures are
//! reported on stdout as a JSON error, echoed to stderr, and exit non-zero.

use criteria_engine::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
