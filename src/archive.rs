//! Archive index parsing for `dungeon.bin`.
//!
//! The archive starts with a fixed header, followed by a name table and an
//! offset table (see [`crate::format`]). Script `i` occupies the bytes
//! between its own offset and the next script's offset; the container length
//! closes the last range.
//!
//! # Example
//!
//! ```no_run
//! use dungeon_extract::archive::Archive;
//!
//! let data = std::fs::read("dungeon.bin").unwrap();
//! let archive = Archive::parse(&data)?;
//!
//! for entry in archive.iter() {
//!     println!("{}: {} bytes", entry.name, entry.len());
//! }
//! # Ok::<(), dungeon_extract::error::ExtractError>(())
//! ```

use tracing::debug;

use crate::binary::{read_ascii_slot, read_u32_le};
use crate::error::{ExtractError, Result};
use crate::format::{
    offset_table_start, NAME_TABLE_OFFSET, OFFSET_ENTRY_SIZE, SCRIPT_COUNT_OFFSET,
    SCRIPT_NAME_SIZE,
};

/// One script descriptor from the archive index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Position of the script in the name table.
    pub index: usize,

    /// Script name as stored in the name table.
    pub name: String,

    /// Start offset of the script (inclusive).
    pub start: usize,

    /// End offset of the script (exclusive).
    pub end: usize,
}

impl ScriptEntry {
    /// Returns the number of bytes in the script, zero for an inverted range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the script holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw (still obfuscated) bytes of this script.
    ///
    /// An inverted range (`start > end`) yields an empty slice.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::UnexpectedEof` if either offset lies beyond
    /// the end of `data`.
    pub fn raw_bytes<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        let furthest = self.start.max(self.end);
        if furthest > data.len() {
            return Err(ExtractError::unexpected_eof(furthest, data.len()));
        }
        if self.start > self.end {
            return Ok(&[]);
        }
        Ok(&data[self.start..self.end])
    }
}

/// The parsed index of a dungeon archive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Archive {
    entries: Vec<ScriptEntry>,
}

impl Archive {
    /// Parses the archive index from the complete container bytes.
    ///
    /// # Errors
    ///
    /// - `ExtractError::UnexpectedEof` if the header, name table or offset
    ///   table runs past the end of `data`
    /// - `ExtractError::MalformedArchive` if a name slot is empty or not ASCII
    pub fn parse(data: &[u8]) -> Result<Self> {
        let count = read_u32_le(data, SCRIPT_COUNT_OFFSET)? as usize;
        debug!(count, size = data.len(), "reading archive index");

        let names = read_names(data, count)?;
        let mut offsets = read_offsets(data, count)?;
        offsets.push(data.len());

        let entries = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| ScriptEntry {
                index,
                name,
                start: offsets[index],
                end: offsets[index + 1],
            })
            .collect();

        Ok(Self { entries })
    }

    /// Returns the number of scripts in the archive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive holds no scripts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all script entries in index order.
    #[must_use]
    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    /// Iterates over script entries in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScriptEntry> {
        self.entries.iter()
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ScriptEntry> {
        self.entries.get(index)
    }

    /// Returns the first entry whose name matches `name`.
    ///
    /// A trailing `.dun` on either side is ignored.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ScriptEntry> {
        let wanted = name.strip_suffix(".dun").unwrap_or(name);
        self.entries
            .iter()
            .find(|e| e.name.strip_suffix(".dun").unwrap_or(&e.name) == wanted)
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = &'a ScriptEntry;
    type IntoIter = std::slice::Iter<'a, ScriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Reads `count` names from the name table.
fn read_names(data: &[u8], count: usize) -> Result<Vec<String>> {
    (0..count)
        .map(|index| {
            let offset = NAME_TABLE_OFFSET + index * SCRIPT_NAME_SIZE;
            match read_ascii_slot(data, offset, SCRIPT_NAME_SIZE)? {
                Some(name) if !name.is_empty() => Ok(name),
                Some(_) => Err(ExtractError::MalformedArchive {
                    index,
                    reason: "empty script name".to_string(),
                }),
                None => Err(ExtractError::MalformedArchive {
                    index,
                    reason: "script name is not ASCII".to_string(),
                }),
            }
        })
        .collect()
}

/// Reads `count` start offsets from the offset table.
fn read_offsets(data: &[u8], count: usize) -> Result<Vec<usize>> {
    let table = offset_table_start(count);
    (0..count)
        .map(|index| read_u32_le(data, table + index * OFFSET_ENTRY_SIZE).map(|o| o as usize))
        .collect()
}
