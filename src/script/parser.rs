//! Line cursor scanner for decoded dungeon scripts.
//!
//! The script grammar has no explicit delimiters beyond tabs, so structure is
//! recovered by scanning forward over the line array with a single cursor:
//!
//! 1. Skip leading blank lines
//! 2. Take the first digit-bearing line as the spawn count header
//! 3. Read spawn lines, skipping blanks, until the count is reached or the
//!    lines run out
//! 4. Skip to the next digit-bearing line and read the block count
//! 5. Read each block: skip blanks, then eight fixed lines
//!
//! Positions already visited are never revisited.

use tracing::{debug, warn};

use serde_json::Number;

use super::lines::{first_number, first_number_literal, has_digit, is_blank, parse_ints, trim};
use super::{Block, ParsedDungeon};
use crate::error::{ExtractError, Result};

/// Number of fixed lines in every block.
pub const BLOCK_LINE_COUNT: usize = 8;

/// Minimum number of integer tokens on a spawn line.
pub const MIN_SPAWN_TOKENS: usize = 2;

/// Forward-only scanner over the lines of one script.
///
/// # Example
///
/// ```
/// use dungeon_extract::script::DungeonScanner;
///
/// let mut scanner = DungeonScanner::new(vec!["", "Spawns: 1", "1\t7", "Blocks: 0"]);
/// assert_eq!(scanner.read_spawn_count()?, 1);
/// assert_eq!(scanner.read_spawns(1)?, vec![7]);
/// assert_eq!(scanner.read_block_count()?, 0);
/// # Ok::<(), dungeon_extract::error::ExtractError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DungeonScanner<'a> {
    /// All lines of the script.
    lines: Vec<&'a str>,

    /// Index of the next unread line.
    cursor: usize,
}

impl<'a> DungeonScanner<'a> {
    /// Creates a scanner positioned at the first line.
    #[must_use]
    pub fn new(lines: Vec<&'a str>) -> Self {
        Self { lines, cursor: 0 }
    }

    /// Returns the index of the next unread line.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of lines not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.cursor)
    }

    /// Returns true once every line has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    /// Runs every stage and returns the parsed script.
    ///
    /// # Errors
    ///
    /// Any of the structural errors described on the individual stages.
    pub fn parse(mut self) -> Result<ParsedDungeon> {
        let spawn_count = self.read_spawn_count()?;
        let spawns = self.read_spawns(spawn_count)?;
        let block_count = self.read_block_count()?;

        let mut blocks = Vec::with_capacity(block_count.min(self.remaining() / BLOCK_LINE_COUNT));
        for index in 0..block_count {
            blocks.push(self.read_block(index)?);
        }

        debug!(
            spawns = spawns.len(),
            blocks = blocks.len(),
            unread_lines = self.remaining(),
            "parsed dungeon script"
        );
        Ok(ParsedDungeon { spawns, blocks })
    }

    /// Skips leading blank lines and consumes the spawn count header.
    ///
    /// The header is the first line containing a digit; its first digit run
    /// is the spawn count.
    ///
    /// # Errors
    ///
    /// - `ExtractError::EmptyScript` if only blank lines remain
    /// - `ExtractError::MissingSpawnCount` if no remaining line has a digit
    /// - `ExtractError::IntegerParseFailure` if the count overflows
    pub fn read_spawn_count(&mut self) -> Result<usize> {
        while self.cursor < self.lines.len() && is_blank(self.lines[self.cursor]) {
            self.cursor += 1;
        }
        if self.is_finished() {
            return Err(ExtractError::EmptyScript);
        }

        while let Some(line) = self.lines.get(self.cursor) {
            self.cursor += 1;
            if let Some(count) = first_number(trim(line))? {
                return to_count(count);
            }
        }
        Err(ExtractError::MissingSpawnCount)
    }

    /// Reads up to `count` spawn values.
    ///
    /// Blank lines are skipped. Each other line must hold at least two
    /// integer tokens; its last token is the spawn value. Running out of
    /// lines early returns the spawns collected so far.
    ///
    /// # Errors
    ///
    /// - `ExtractError::MalformedSpawnLine` for a line with fewer than two tokens
    /// - `ExtractError::IntegerParseFailure` for a non-integer token
    pub fn read_spawns(&mut self, count: usize) -> Result<Vec<i64>> {
        let mut spawns = Vec::new();

        while spawns.len() < count && self.cursor < self.lines.len() {
            let line = trim(self.lines[self.cursor]);
            self.cursor += 1;
            if line.is_empty() {
                continue;
            }

            let tokens = parse_ints(line)?;
            match tokens.last() {
                Some(&last) if tokens.len() >= MIN_SPAWN_TOKENS => spawns.push(last),
                _ => {
                    return Err(ExtractError::MalformedSpawnLine {
                        index: spawns.len(),
                        line: line.to_string(),
                    })
                }
            }
        }

        if spawns.len() < count {
            warn!(
                declared = count,
                found = spawns.len(),
                "script ended before spawn section was complete"
            );
        }
        Ok(spawns)
    }

    /// Skips lines without digits and consumes the block count line.
    ///
    /// # Errors
    ///
    /// - `ExtractError::MissingBlockCount` if the script ends first
    /// - `ExtractError::MalformedBlockCountLine` if the line has no digit run
    /// - `ExtractError::IntegerParseFailure` if the count overflows
    pub fn read_block_count(&mut self) -> Result<usize> {
        while self.cursor < self.lines.len() && !has_digit(self.lines[self.cursor]) {
            self.cursor += 1;
        }

        let line = self
            .lines
            .get(self.cursor)
            .ok_or(ExtractError::MissingBlockCount)?;
        let count = first_number(line)?.ok_or_else(|| ExtractError::MalformedBlockCountLine {
            line: (*line).to_string(),
        })?;
        self.cursor += 1;
        to_count(count)
    }

    /// Reads one block: skips blank lines, then consumes the eight fixed lines.
    ///
    /// # Errors
    ///
    /// - `ExtractError::OutOfRange` if the script ends inside the block
    /// - `ExtractError::IntegerParseFailure` for a non-integer table token
    pub fn read_block(&mut self, index: usize) -> Result<Block> {
        while self.cursor < self.lines.len() && is_blank(self.lines[self.cursor]) {
            self.cursor += 1;
        }

        let rect = parse_ints(trim(self.next_field(index, "rect")?))?;
        let enemies = self.read_table(index, "enemies")?;
        let respawn = self.read_table(index, "respawn")?;
        let clear = self.read_table(index, "clear")?;
        let vip = self.read_table(index, "vip")?;
        let exceptional = self.read_table(index, "exceptional")?;
        let text = trim(&self.next_field(index, "text")?.replace('\t', "")).to_string();
        let countdown = first_number_literal(self.next_field(index, "countdown")?)
            .unwrap_or_else(|| Number::from(0u64));

        Ok(Block {
            rect,
            enemies,
            respawn,
            clear,
            vip,
            exceptional,
            text,
            countdown,
        })
    }

    /// Reads a table line and drops its leading count/tag token.
    fn read_table(&mut self, block: usize, field: &'static str) -> Result<Vec<i64>> {
        let tokens = parse_ints(trim(self.next_field(block, field)?))?;
        Ok(tokens.into_iter().skip(1).collect())
    }

    /// Consumes the next line as one of a block's fixed fields.
    fn next_field(&mut self, block: usize, field: &'static str) -> Result<&'a str> {
        let line = self
            .lines
            .get(self.cursor)
            .copied()
            .ok_or(ExtractError::OutOfRange {
                block,
                field,
                line: self.cursor,
            })?;
        self.cursor += 1;
        Ok(line)
    }
}

/// Converts a parsed count to `usize`.
fn to_count(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| ExtractError::integer_parse(&value.to_string()))
}
