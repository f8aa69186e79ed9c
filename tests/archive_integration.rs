//! Integration tests for archive indexing, decoding and script parsing.
//!
//! These tests build synthetic `dungeon.bin` archives with the documented
//! layout and drive the public API end to end without touching disk.

use dungeon_extract::archive::Archive;
use dungeon_extract::decode::{decode_script, XOR_KEY};
use dungeon_extract::error::ExtractError;
use dungeon_extract::format::{index_end, SCRIPT_NAME_SIZE};
use dungeon_extract::pipeline::process_script;
use dungeon_extract::script::{parse_dungeon_script, Block};
use serde_json::Number;

// ============================================================================
// Helpers
// ============================================================================

/// Builds an archive from `(name, plain text)` pairs, obfuscating each body.
fn build_archive(scripts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut data = vec![0xAAu8; 12];
    data.extend_from_slice(&(scripts.len() as u32).to_le_bytes());

    for (name, _) in scripts {
        let mut slot = vec![0u8; SCRIPT_NAME_SIZE];
        slot[..name.len()].copy_from_slice(name.as_bytes());
        data.extend_from_slice(&slot);
    }

    let mut offset = index_end(scripts.len());
    for (_, body) in scripts {
        data.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += body.len();
    }

    for (_, body) in scripts {
        data.extend(body.iter().map(|b| b ^ XOR_KEY));
    }
    data
}

const ROOM01: &str = "Spawns: 2
1\t10
2\t20
Blocks: 1
0\t0\t10\t10
3\t1\t2\t3
1\t5
1\t9
0
2\t4\t5
Hello world
Countdown 30
";

fn room01_block() -> Block {
    Block {
        rect: vec![0, 0, 10, 10],
        enemies: vec![1, 2, 3],
        respawn: vec![5],
        clear: vec![9],
        vip: vec![],
        exceptional: vec![4, 5],
        text: "Hello world".to_string(),
        countdown: Number::from(30u64),
    }
}

// ============================================================================
// Archive Tests
// ============================================================================

#[test]
fn test_archive_round_trip() {
    let bodies: [&[u8]; 4] = [b"first", b"", b"third\x00body", &[0xFF, 0x00, 0x7F]];
    let names = ["ROOM01", "EMPTY", "ROOM03.dun", "BIN"];
    let scripts: Vec<(&str, &[u8])> = names.iter().copied().zip(bodies).collect();

    let data = build_archive(&scripts);
    let archive = Archive::parse(&data).unwrap();

    assert_eq!(archive.len(), 4);
    let recovered: Vec<&str> = archive.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(recovered, names);

    let mut joined = Vec::new();
    for (entry, body) in archive.iter().zip(bodies) {
        let decoded = decode_script(entry.raw_bytes(&data).unwrap());
        assert_eq!(decoded, body, "{} body", entry.name);
        joined.extend_from_slice(entry.raw_bytes(&data).unwrap());
    }
    assert_eq!(joined, &data[index_end(4)..]);
}

#[test]
fn test_archive_last_entry_ends_at_container_length() {
    let data = build_archive(&[("A", b"abc"), ("B", b"de")]);
    let archive = Archive::parse(&data).unwrap();
    assert_eq!(archive.entries().last().unwrap().end, data.len());
}

#[test]
fn test_archive_empty_name_reports_index() {
    let data = build_archive(&[("A", b"1"), ("B", b"2"), ("", b"3")]);
    let err = Archive::parse(&data).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedArchive { index: 2, .. }));
    assert!(err.to_string().contains("script 2"));
}

#[test]
fn test_archive_truncated_name_table() {
    let data = build_archive(&[("A", b"")]);
    let err = Archive::parse(&data[..100]).unwrap_err();
    assert!(matches!(err, ExtractError::UnexpectedEof { .. }));
}

#[test]
fn test_archive_offset_past_end() {
    let mut data = build_archive(&[("A", b"abc")]);
    let table = index_end(1) - 4;
    data[table..table + 4].copy_from_slice(&10_000u32.to_le_bytes());

    let archive = Archive::parse(&data).unwrap();
    let entry = archive.get(0).unwrap();
    assert!(matches!(
        entry.raw_bytes(&data),
        Err(ExtractError::UnexpectedEof { .. })
    ));
}

// ============================================================================
// End-to-end Script Tests
// ============================================================================

#[test]
fn test_room01_end_to_end() {
    let data = build_archive(&[("ROOM01", ROOM01.as_bytes())]);
    let archive = Archive::parse(&data).unwrap();

    assert_eq!(archive.len(), 1);
    let entry = archive.get(0).unwrap();
    assert_eq!(entry.name, "ROOM01");

    let dungeon = process_script(entry, &data).unwrap();
    assert_eq!(dungeon.spawns, vec![10, 20]);
    assert_eq!(dungeon.blocks, vec![room01_block()]);
}

#[test]
fn test_spawn_count_contract() {
    let mut text = String::from("\n\nHeader line\nSpawn count = 5\n");
    for i in 0..5 {
        text.push_str(&format!("{i}\t{}\t{}\n", i * 2, 100 + i));
    }
    text.push_str("Blocks: 0\n");

    let dungeon = parse_dungeon_script(text.as_bytes()).unwrap();
    assert_eq!(dungeon.spawns, vec![100, 101, 102, 103, 104]);
    assert!(dungeon.blocks.is_empty());
}

#[test]
fn test_underfilled_spawns_then_missing_block_count() {
    // The block count search starts after the last line the spawn scan
    // consumed, so a short spawn section followed by EOF reports the
    // missing block count rather than the short section.
    let err = parse_dungeon_script(b"Spawns: 3\n1\t10\n").unwrap_err();
    assert!(matches!(err, ExtractError::MissingBlockCount));
}

#[test]
fn test_malformed_spawn_line_named() {
    let text = "Spawns: 3\n1\t10\n5\n2\t30\nBlocks: 0\n";
    let err = parse_dungeon_script(text.as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "Malformed spawn line 1: '5'");
}

#[test]
fn test_multiple_blocks_with_blank_separators() {
    let text = format!(
        "{}\n\n\n0\t0\t1\t1\n0\n0\n0\n1\t7\n0\n\tGate\t\n\n",
        ROOM01.replace("Blocks: 1", "Blocks: 2")
    );
    let dungeon = parse_dungeon_script(text.as_bytes()).unwrap();

    assert_eq!(dungeon.blocks.len(), 2);
    assert_eq!(dungeon.blocks[0], room01_block());
    let second = &dungeon.blocks[1];
    assert_eq!(second.rect, vec![0, 0, 1, 1]);
    assert!(second.enemies.is_empty());
    assert_eq!(second.vip, vec![7]);
    assert!(second.exceptional.is_empty());
    assert_eq!(second.text, "Gate");
    assert_eq!(second.countdown.as_u64(), Some(0));
}

#[test]
fn test_parse_failure_names_script() {
    let data = build_archive(&[("OK", ROOM01.as_bytes()), ("BROKEN", b"Spawns: 1\n\n")]);
    let archive = Archive::parse(&data).unwrap();

    assert!(process_script(archive.get(0).unwrap(), &data).is_ok());
    let err = process_script(archive.get(1).unwrap(), &data).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse script 'BROKEN.dun'"));
    assert!(err.to_string().contains("Missing block count"));
}
