//! Info command implementation

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nx_pchtxt::{LogSink, PatchTextOutput, parse_pchtxt};

pub fn execute(path: &Path, json: bool) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    // parse diagnostics surface through the logger, visible with -v
    let mut sink = LogSink;
    let output = parse_pchtxt(&mut reader, &mut sink)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_summary(&output);
    Ok(())
}

fn print_summary(output: &PatchTextOutput) {
    if !output.meta.title.is_empty() {
        println!("Title:      {}", output.meta.title);
    }
    if !output.meta.program_id.is_empty() {
        println!("Program ID: {}", output.meta.program_id);
    }
    if !output.meta.url.is_empty() {
        println!("URL:        {}", output.meta.url);
    }
    println!("Collections: {}", output.collections.len());

    for collection in &output.collections {
        println!();
        println!(
            "{} {} ({} patch(es))",
            collection.target_type,
            collection.build_id,
            collection.patches.len()
        );
        for patch in &collection.patches {
            let state = if patch.enabled { "enabled" } else { "disabled" };
            let author = if patch.author.is_empty() {
                String::new()
            } else {
                format!(" by {}", patch.author)
            };
            println!(
                "  {} [{}, {}, {} content entr{}]{}",
                patch.name,
                patch.patch_type,
                state,
                patch.contents.len(),
                if patch.contents.len() == 1 { "y" } else { "ies" },
                author
            );
        }
    }
}
