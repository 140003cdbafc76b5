//! Integration tests for the Patch Text parser

use std::io::{Cursor, Read};

use nx_pchtxt::{NullSink, PatchTextOutput, PatchType, TargetType, parse_pchtxt};
use pretty_assertions::assert_eq;

fn parse(text: &str) -> (PatchTextOutput, Vec<String>) {
    let mut sink: Vec<String> = Vec::new();
    let output = parse_pchtxt(&mut Cursor::new(text), &mut sink).unwrap();
    (output, sink)
}

#[test]
fn test_meta_parsed_and_empty_patch_dropped() {
    let text = "@title \"Foo\"\n\
                @program 0100ABCD\n\
                \n\
                @flag nsobid DEADBEEF\n\
                // Alice\n\
                @enabled\n\
                empty\n";
    let (output, _) = parse(text);

    assert_eq!(output.meta.title, "Foo");
    assert_eq!(output.meta.program_id, "0100ABCD");
    // the patch never gained contents, so it is dropped, and with it the
    // now-empty collection
    assert_eq!(output.collections.len(), 0);
}

#[test]
fn test_cheat_script_block() {
    let text = "@flag nsobid DEADBEEF\n\
                [My Cheat]\n\
                04 00 00 00\n\
                \n";
    let (output, _) = parse(text);

    assert_eq!(output.collections.len(), 1);
    let collection = &output.collections[0];
    assert_eq!(collection.build_id, "DEADBEEF");
    assert_eq!(collection.target_type, TargetType::Nso);

    assert_eq!(collection.patches.len(), 1);
    let patch = &collection.patches[0];
    assert_eq!(patch.name, "My Cheat");
    assert_eq!(patch.author, "");
    assert!(patch.enabled);
    assert_eq!(patch.patch_type, PatchType::CheatScript);
    assert_eq!(patch.contents.len(), 1);
    assert_eq!(patch.contents[0].offset, 0);
    assert_eq!(patch.contents[0].value, b"04 00 00 00".to_vec());
}

#[test]
fn test_enabled_before_build_id_halts() {
    let text = "// Some Patch\n\
                @enabled\n\
                @flag nsobid DEADBEEF\n\
                [Never Reached]\n\
                01 02\n\
                \n";
    let (output, sink) = parse(text);

    assert_eq!(output.collections.len(), 0);
    assert!(sink.iter().any(|line| line.contains("ERROR: missing build id")));
    // parsing halted before the later build id line
    assert!(!sink.iter().any(|line| line.contains("Never Reached")));
}

#[test]
fn test_cheat_header_before_build_id_halts() {
    let (output, sink) = parse("[Cheat]\n01 02\n\n");
    assert_eq!(output.collections.len(), 0);
    assert!(sink.iter().any(|line| line.contains("ERROR: missing build id")));
}

#[test]
fn test_legacy_nsobid_without_patches() {
    let (output, sink) = parse("@nsobid ABCDEF01\n");
    // the build id is accepted, but an empty collection is never emitted
    assert_eq!(output.collections.len(), 0);
    assert!(!sink.iter().any(|line| line.contains("ERROR")));
}

#[test]
fn test_legacy_nsobid_scopes_patches() {
    let text = "@nsobid ABCDEF01\n\
                [Cheat]\n\
                AA BB\n\
                \n";
    let (output, _) = parse(text);

    assert_eq!(output.collections.len(), 1);
    assert_eq!(output.collections[0].build_id, "ABCDEF01");
    assert_eq!(output.collections[0].target_type, TargetType::Nso);
    assert_eq!(output.collections[0].patches.len(), 1);
}

#[test]
fn test_legacy_nsobid_without_value_halts() {
    let (output, sink) = parse("@nsobid\n[Cheat]\nAA\n\n");
    assert_eq!(output.collections.len(), 0);
    assert!(sink.iter().any(|line| line.contains("ERROR: missing build id value")));
}

#[test]
fn test_multiple_collections() {
    let text = "@flag nsobid AAAA1111\n\
                [First]\n\
                01\n\
                \n\
                @flag nrobid BBBB2222\n\
                [Second]\n\
                02\n\
                \n";
    let (output, _) = parse(text);

    assert_eq!(output.collections.len(), 2);
    assert_eq!(output.collections[0].build_id, "AAAA1111");
    assert_eq!(output.collections[0].target_type, TargetType::Nso);
    assert_eq!(output.collections[0].patches[0].name, "First");
    assert_eq!(output.collections[1].build_id, "BBBB2222");
    assert_eq!(output.collections[1].target_type, TargetType::Nro);
    assert_eq!(output.collections[1].patches[0].name, "Second");
}

#[test]
fn test_patches_kept_in_close_order() {
    let text = "@flag nsobid AAAA1111\n\
                [One]\n01\n\n\
                [Two]\n02\n\n\
                [Three]\n03\n\n";
    let (output, _) = parse(text);

    let names: Vec<&str> = output.collections[0]
        .patches
        .iter()
        .map(|patch| patch.name.as_str())
        .collect();
    assert_eq!(names, vec!["One", "Two", "Three"]);
}

#[test]
fn test_stop_tag_ends_scan_but_keeps_prior_work() {
    let text = "@flag nsobid AAAA1111\n\
                [Kept]\n\
                01\n\
                \n\
                @stop\n\
                [Ignored]\n\
                02\n\
                \n";
    let (output, sink) = parse(text);

    assert_eq!(output.collections.len(), 1);
    assert_eq!(output.collections[0].patches.len(), 1);
    assert_eq!(output.collections[0].patches[0].name, "Kept");
    assert!(sink.iter().any(|line| line.contains("reached tag @stop")));
}

#[test]
fn test_tag_line_closes_open_cheat_script() {
    let text = "@flag nsobid AAAA1111\n\
                [Open]\n\
                01 02\n\
                @stop\n";
    let (output, sink) = parse(text);

    // the cheat body was still open; the tag closes and keeps it
    assert_eq!(output.collections[0].patches[0].name, "Open");
    assert!(sink.iter().any(|line| line.contains("ended because parsing reached a tag")));
}

#[test]
fn test_unclosed_cheat_script_flushed_at_end_of_stream() {
    // final line lacks a trailing newline
    let text = "@flag nsobid AAAA1111\n[Tail]\nAA BB";
    let (output, _) = parse(text);

    assert_eq!(output.collections.len(), 1);
    assert_eq!(output.collections[0].patches[0].name, "Tail");
    assert_eq!(output.collections[0].patches[0].contents[0].value, b"AA BB".to_vec());
}

#[test]
fn test_empty_cheat_script_dropped() {
    let (output, _) = parse("@flag nsobid AAAA1111\n[Empty]\n\n");
    assert_eq!(output.collections.len(), 0);
}

#[test]
fn test_tags_are_case_insensitive() {
    let (_, sink) = parse("// p\n@ENABLED\n");
    assert!(sink.iter().any(|line| line.contains("ERROR: missing build id")));

    let text = "@FLAG NSOBID AAAA1111\n[C]\n01\n\n";
    let (output, _) = parse(text);
    assert_eq!(output.collections[0].build_id, "AAAA1111");
}

#[test]
fn test_flag_names_are_case_insensitive() {
    let text = "@flag debug_info\n@flag BE\n";
    let (_, sink) = parse(text);
    assert!(sink.iter().any(|line| line.contains("byte order set to big endian")));
}

#[test]
fn test_build_id_case_preserved() {
    let text = "@flag nsobid dEaDbEeF\n[C]\n01\n\n";
    let (output, _) = parse(text);
    assert_eq!(output.collections[0].build_id, "dEaDbEeF");
}

#[test]
fn test_unrecognized_tag_warned_in_main_pass_only() {
    let (_, sink) = parse("@bogus x\n");
    let warnings: Vec<&String> = sink
        .iter()
        .filter(|line| line.contains("unrecognized tag: @bogus"))
        .collect();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_meta_tags_not_warned_in_main_pass() {
    let (_, sink) = parse("@title Foo\n@url https://example.com\n");
    assert!(!sink.iter().any(|line| line.contains("unrecognized tag")));
}

#[test]
fn test_unrecognized_flag_warned() {
    let (_, sink) = parse("@flag wat 123\n");
    assert!(sink.iter().any(|line| line.contains("unrecognized flag type: wat")));
}

#[test]
fn test_invalid_offset_reported_only_when_verbose() {
    let text = "@flag nsobid AAAA1111\n@enabled\nzz 01\n";
    let (_, sink) = parse(text);
    assert!(!sink.iter().any(|line| line.contains("invalid offset")));

    let text = "@flag nsobid AAAA1111\n@flag debug_info\n@enabled\nzz 01\n";
    let (_, sink) = parse(text);
    assert!(sink.iter().any(|line| line.contains("invalid offset")));
}

#[test]
fn test_echo_lines_forwarded() {
    let (_, sink) = parse("# hello\n\n# world\n");
    assert!(sink.iter().any(|line| line == "L1: # hello"));
    assert!(sink.iter().any(|line| line == "L3: # world"));
}

#[test]
fn test_parsing_is_idempotent() {
    let text = "@title \"Foo\"\n\
                \n\
                @flag nsobid AAAA1111\n\
                [C]\n\
                01 02 03\n\
                \n";
    let (first, _) = parse(text);
    let (second, _) = parse(text);
    assert_eq!(first, second);
}

#[test]
fn test_sink_does_not_affect_parsed_structure() {
    let text = "@flag nsobid AAAA1111\n[C]\n01\n\n";
    let (with_vec, _) = parse(text);
    let with_null = parse_pchtxt(&mut Cursor::new(text), &mut NullSink).unwrap();
    assert_eq!(with_vec, with_null);
}

#[test]
fn test_stream_rewound_before_both_passes() {
    let text = "@title Foo\n\n@flag nsobid AAAA1111\n[C]\n01\n\n";
    let mut cursor = Cursor::new(text);

    // leave the cursor mid-stream; the parser must rewind on its own
    let mut skipped = [0u8; 10];
    cursor.read_exact(&mut skipped).unwrap();

    let output = parse_pchtxt(&mut cursor, &mut NullSink).unwrap();
    assert_eq!(output.meta.title, "Foo");
    assert_eq!(output.collections.len(), 1);
}

#[test]
fn test_blank_lines_do_not_end_the_main_scan() {
    let text = "@title Foo\n\
                \n\
                \n\
                @flag nsobid AAAA1111\n\
                [C]\n\
                01\n\
                \n";
    let (output, _) = parse(text);
    assert_eq!(output.collections.len(), 1);
}

#[test]
fn test_diagnostics_carry_line_numbers() {
    let text = "@flag nsobid AAAA1111\n[C]\n01\n\n";
    let (_, sink) = parse(text);
    assert!(sink.iter().any(|line| line == "L4: cheat script read: C"));
}
