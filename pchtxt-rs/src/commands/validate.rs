//! Validate command implementation

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nx_pchtxt::parse_pchtxt;

pub fn execute(path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut diagnostics: Vec<String> = Vec::new();
    let output = parse_pchtxt(&mut reader, &mut diagnostics)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for line in &diagnostics {
        println!("{line}");
    }

    let errors = diagnostics
        .iter()
        .filter(|line| line.contains("ERROR"))
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|line| line.contains("WARNING"))
        .count();

    println!();
    println!(
        "{} collection(s), {} warning(s), {} error(s)",
        output.collections.len(),
        warnings,
        errors
    );

    if errors > 0 {
        bail!("{} error(s) found in {}", errors, path.display());
    }
    Ok(())
}
