//! Dungeon script parsing.
//!
//! A decoded script is ASCII text describing a spawn list followed by a
//! sequence of rectangular blocks:
//!
//! ```text
//! Spawns: 2
//! 1	10
//! 2	20
//! Blocks: 1
//! 0	0	10	10      rect
//! 3	1	2	3       enemies (first token is a count)
//! 1	5           respawn
//! 1	9           clear
//! 0               vip
//! 2	4	5         exceptional
//! Hello world     text
//! Countdown 30    countdown
//! ```
//!
//! - [`lines`] - Text decoding, line splitting and token rules
//! - [`parser`] - The forward-only line scanner
//!
//! # Example
//!
//! ```
//! use dungeon_extract::script::parse_dungeon_script;
//!
//! let text = b"Spawns: 1\n1\t10\nBlocks: 0\n";
//! let dungeon = parse_dungeon_script(text)?;
//! assert_eq!(dungeon.spawns, vec![10]);
//! assert!(dungeon.blocks.is_empty());
//! # Ok::<(), dungeon_extract::error::ExtractError>(())
//! ```

pub mod lines;
pub mod parser;

pub use lines::{decode_text, split_lines};
pub use parser::{DungeonScanner, BLOCK_LINE_COUNT};

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::Result;

/// The structured content of one dungeon script.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedDungeon {
    /// Spawn values, one per spawn line.
    pub spawns: Vec<i64>,

    /// Blocks in script order.
    pub blocks: Vec<Block>,
}

impl ParsedDungeon {
    /// Parses a decoded script.
    ///
    /// # Errors
    ///
    /// See [`parse_dungeon_script`].
    pub fn parse(decoded: &[u8]) -> Result<Self> {
        parse_dungeon_script(decoded)
    }
}

/// One rectangular region of a dungeon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Raw rectangle tokens.
    pub rect: Vec<i64>,

    /// Enemy table without its leading count.
    pub enemies: Vec<i64>,

    /// Respawn table without its leading count.
    pub respawn: Vec<i64>,

    /// Clear table without its leading count.
    pub clear: Vec<i64>,

    /// VIP table without its leading count.
    pub vip: Vec<i64>,

    /// Exceptional table without its leading count.
    pub exceptional: Vec<i64>,

    /// Free text with tabs removed.
    pub text: String,

    /// First number on the countdown line, or 0.
    ///
    /// Kept as an exact JSON number so digit runs of any length survive.
    pub countdown: Number,
}

/// Parses decoded script bytes into a [`ParsedDungeon`].
///
/// The bytes are read as ASCII (other bytes become U+FFFD) and split into
/// lines before scanning.
///
/// # Errors
///
/// - `ExtractError::EmptyScript` / `ExtractError::MissingSpawnCount` if the
///   header cannot be found
/// - `ExtractError::MalformedSpawnLine` for a spawn line with fewer than two tokens
/// - `ExtractError::MissingBlockCount` / `ExtractError::MalformedBlockCountLine`
///   if the block count cannot be found
/// - `ExtractError::OutOfRange` if a block runs past the end of the script
/// - `ExtractError::IntegerParseFailure` for any non-integer table token
pub fn parse_dungeon_script(decoded: &[u8]) -> Result<ParsedDungeon> {
    let text = decode_text(decoded);
    DungeonScanner::new(split_lines(&text)).parse()
}
