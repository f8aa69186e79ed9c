//! Layout constants for `dungeon.bin` and output file naming.
//!
//! # Archive Layout
//!
//! All integers are little-endian.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 12 | Reserved header bytes |
//! | 12 | 4 | Script count (u32) |
//! | 16 | count × 260 | Name table, NUL-padded ASCII |
//! | 16 + count × 260 | count × 4 | Offset table (u32 per script) |
//!
//! The container length acts as the end offset of the last script.
//!
//! # Example
//!
//! ```
//! use dungeon_extract::format::{dun_filename, json_filename, offset_table_start};
//!
//! assert_eq!(offset_table_start(2), 16 + 2 * 260);
//! assert_eq!(dun_filename("ROOM01"), "ROOM01.dun");
//! assert_eq!(json_filename("ROOM01.dun"), "ROOM01.json");
//! ```

use std::path::Path;

/// Byte offset of the script count field.
pub const SCRIPT_COUNT_OFFSET: usize = 12;

/// Byte offset where the name table begins.
pub const NAME_TABLE_OFFSET: usize = 16;

/// Size of one name table slot.
pub const SCRIPT_NAME_SIZE: usize = 260;

/// Size of one offset table entry.
pub const OFFSET_ENTRY_SIZE: usize = 4;

/// Extension of decoded script files.
pub const DUN_EXTENSION: &str = ".dun";

/// Extension of parsed script records.
pub const JSON_EXTENSION: &str = ".json";

/// Returns the byte offset where the offset table begins for `count` scripts.
#[must_use]
pub const fn offset_table_start(count: usize) -> usize {
    NAME_TABLE_OFFSET + count * SCRIPT_NAME_SIZE
}

/// Returns the byte offset just past the index for `count` scripts.
#[must_use]
pub const fn index_end(count: usize) -> usize {
    offset_table_start(count) + count * OFFSET_ENTRY_SIZE
}

/// Returns the decoded output filename for a script name.
///
/// The `.dun` extension is appended unless the name already ends with it.
#[must_use]
pub fn dun_filename(name: &str) -> String {
    if name.ends_with(DUN_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{DUN_EXTENSION}")
    }
}

/// Returns the parsed record filename for a decoded output filename.
///
/// The last extension of the final path component is replaced by `.json`.
#[must_use]
pub fn json_filename(dun_filename: &str) -> String {
    let path = Path::new(dun_filename);
    let stem = path.file_stem().unwrap_or(path.as_os_str());
    format!("{}{JSON_EXTENSION}", stem.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_offsets() {
        assert_eq!(offset_table_start(0), 16);
        assert_eq!(offset_table_start(1), 276);
        assert_eq!(index_end(1), 280);
        assert_eq!(index_end(3), 16 + 3 * 264);
    }

    #[test]
    fn test_dun_filename_appends_extension() {
        assert_eq!(dun_filename("ROOM01"), "ROOM01.dun");
        assert_eq!(dun_filename("cave.txt"), "cave.txt.dun");
    }

    #[test]
    fn test_dun_filename_not_duplicated() {
        assert_eq!(dun_filename("ROOM01.dun"), "ROOM01.dun");
    }

    #[test]
    fn test_json_filename_uses_stem() {
        assert_eq!(json_filename("ROOM01.dun"), "ROOM01.json");
        assert_eq!(json_filename("cave.txt.dun"), "cave.txt.json");
        assert_eq!(json_filename("maps/ROOM02.dun"), "ROOM02.json");
    }

    #[test]
    fn test_json_filename_dotfile() {
        assert_eq!(json_filename(".dun"), ".dun.json");
    }
}
