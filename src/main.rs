//! Lazy CSS Binary

use lazycss::{LazyCli, LazyError};
use std::process;

fn main() {
    let mut cli = LazyCli::new();

    match cli.run() {
        Ok(()) => {}
        Err(LazyError::FileNotFound { path }) => {
            eprintln!("File not found: {}", path);
            process::exit(1);
        }
        Err(e) if e.is_initialization_failure() => {
            eprintln!("Initialization failed: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Build failed: {}", e);
            process::exit(1);
        }
    }
}
