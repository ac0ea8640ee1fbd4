//! LR(1) Parser Generator and Driver
//!
//! # Author
//! Juan Manuel Young Hoyos

use std::process;

fn main() {
    env_logger::init();
    if let Err(e) = lr1_parser::cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
