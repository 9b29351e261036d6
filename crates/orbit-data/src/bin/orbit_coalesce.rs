//! `orbit-coalesce` — coalesce a list of record operations.
//!
//! Usage:
//!   orbit-coalesce < operations.json
//!
//! Reads a JSON array of record operations from stdin and prints the
//! coalesced array on stdout. Set `RUST_LOG=orbit_data=trace` to see each
//! merge decision.

use std::io::{self, Read, Write};

use orbit_data::cli::{coalesce_json, init_tracing};

fn main() {
    init_tracing();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match coalesce_json(buf.trim()) {
        Ok(result) => {
            let mut stdout = io::stdout();
            if let Err(e) = stdout
                .write_all(result.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
            {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
