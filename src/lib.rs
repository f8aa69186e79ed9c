//! # Dungeon Extract
//!
//! Extractor and parser for `dungeon.bin` script archives.
//!
//! The archive bundles several XOR-obfuscated text scripts, each describing
//! one dungeon layout. This library recovers them in three stages:
//! - **Archive index**: script count, fixed-width name table and offset table
//! - **Decoding**: every script byte XORed with `0xFF`
//! - **Script parsing**: a forward-only line scanner recovering the spawn
//!   list and the rectangular blocks
//!
//! ## Quick Start
//!
//! ```no_run
//! use dungeon_extract::archive::Archive;
//! use dungeon_extract::error::Result;
//! use dungeon_extract::pipeline::process_script;
//!
//! fn list_dungeons(data: &[u8]) -> Result<()> {
//!     let archive = Archive::parse(data)?;
//!
//!     for entry in &archive {
//!         let dungeon = process_script(entry, data)?;
//!         println!(
//!             "{}: {} spawns, {} blocks",
//!             entry.name,
//!             dungeon.spawns.len(),
//!             dungeon.blocks.len()
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias
//! - [`binary`] - Bounds-checked little-endian reads
//! - [`format`] - Archive layout constants and output file naming
//! - [`archive`] - Archive index parsing
//! - [`decode`] - XOR de-obfuscation
//! - [`script`] - Dungeon script parsing
//! - [`pipeline`] - Archive to `.dun`/`.json` extraction driver

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod binary;
pub mod decode;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod script;

// Re-export commonly used types at the crate root
pub use archive::{Archive, ScriptEntry};
pub use decode::{decode_script, XOR_KEY};
pub use error::{ExtractError, Result};
pub use pipeline::{extract_archive, process_script, ErrorPolicy, ExtractConfig, ExtractSummary};
pub use script::{parse_dungeon_script, Block, DungeonScanner, ParsedDungeon};
