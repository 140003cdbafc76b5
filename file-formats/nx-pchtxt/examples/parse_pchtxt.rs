//! Parse a Patch Text file and dump the diagnostic stream to stdout.
//!
//! Usage: `cargo run --example parse_pchtxt -- patches.pchtxt`

use std::env;
use std::fs::File;
use std::io::{self, BufReader};

use nx_pchtxt::{WriteSink, parse_pchtxt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .ok_or("usage: parse_pchtxt <FILE.pchtxt>")?;

    let mut reader = BufReader::new(File::open(&path)?);
    let mut sink = WriteSink::new(io::stdout());
    let output = parse_pchtxt(&mut reader, &mut sink)?;

    println!();
    println!("parsed {} collection(s) from {path}", output.collections.len());
    for collection in &output.collections {
        println!(
            "  {} {}: {} patch(es)",
            collection.target_type,
            collection.build_id,
            collection.patches.len()
        );
    }
    Ok(())
}
