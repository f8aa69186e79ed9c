//! Extraction pipeline: archive → decoded `.dun` files → parsed `.json` records.
//!
//! Each script is processed independently and in index order. The decoded
//! bytes are written before the script is parsed, so a script that fails to
//! parse still leaves its `.dun` file behind.
//!
//! # Example
//!
//! ```no_run
//! use dungeon_extract::pipeline::{extract_archive, ExtractConfig};
//!
//! let summary = extract_archive(&ExtractConfig::default())?;
//! println!("{summary}");
//! # Ok::<(), dungeon_extract::error::ExtractError>(())
//! ```

use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::archive::{Archive, ScriptEntry};
use crate::decode::decode_in_place;
use crate::error::{ExtractError, Result};
use crate::format::{dun_filename, json_filename};
use crate::script::{parse_dungeon_script, ParsedDungeon};

/// Default archive location.
pub const DEFAULT_ARCHIVE_PATH: &str = "dungeon.bin";

/// Default directory for decoded `.dun` files.
pub const DEFAULT_OUTPUT_DIR: &str = "extracted_dungeons";

/// Default directory for parsed `.json` records.
pub const DEFAULT_PARSED_DIR: &str = "parsed_dungeons";

/// What to do when a script fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the run on the first failing script.
    #[default]
    FailFast,

    /// Record the failure and continue with the next script.
    Continue,
}

/// Inputs and outputs of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Path of the archive to read.
    pub archive_path: PathBuf,

    /// Directory receiving decoded `.dun` files.
    pub output_dir: PathBuf,

    /// Directory receiving parsed `.json` records.
    pub parsed_dir: PathBuf,

    /// Failure handling policy.
    pub error_policy: ErrorPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            parsed_dir: PathBuf::from(DEFAULT_PARSED_DIR),
            error_policy: ErrorPolicy::default(),
        }
    }
}

/// One script after XOR decoding, with its output filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedScript {
    /// Decoded output filename (`<name>.dun`).
    pub dun_filename: String,

    /// Parsed record filename (`<stem>.json`).
    pub json_filename: String,

    /// Decoded script bytes.
    pub bytes: Vec<u8>,
}

impl DecodedScript {
    /// Slices and decodes the script described by `entry`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Script` wrapping `ExtractError::UnexpectedEof`
    /// if the entry lies beyond `data`.
    pub fn from_entry(entry: &ScriptEntry, data: &[u8]) -> Result<Self> {
        let dun = dun_filename(&entry.name);
        let mut bytes = match entry.raw_bytes(data) {
            Ok(raw) => raw.to_vec(),
            Err(e) => return Err(e.in_script(&dun)),
        };
        decode_in_place(&mut bytes);

        Ok(Self {
            json_filename: json_filename(&dun),
            dun_filename: dun,
            bytes,
        })
    }

    /// Parses the decoded bytes.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Script` wrapping the parse failure with
    /// [`Self::dun_filename`].
    pub fn parse(&self) -> Result<ParsedDungeon> {
        parse_dungeon_script(&self.bytes).map_err(|e| e.in_script(&self.dun_filename))
    }
}

/// Decodes and parses one script without touching the filesystem.
///
/// # Errors
///
/// Returns `ExtractError::Script` naming the script if its range lies beyond
/// `data` or the decoded script fails to parse.
pub fn process_script(entry: &ScriptEntry, data: &[u8]) -> Result<ParsedDungeon> {
    DecodedScript::from_entry(entry, data)?.parse()
}

/// A script that failed under [`ErrorPolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    /// Decoded output filename of the script.
    pub filename: String,

    /// Rendered error message.
    pub message: String,
}

/// Outcome of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Archive that was read.
    pub archive_path: PathBuf,

    /// Directory that received the `.dun` files.
    pub output_dir: PathBuf,

    /// Number of `.dun` files written.
    pub extracted: usize,

    /// Number of `.json` records written.
    pub parsed: usize,

    /// Scripts skipped under [`ErrorPolicy::Continue`].
    pub failures: Vec<ScriptFailure>,
}

impl ExtractSummary {
    /// Applies `policy` to a failed script: records it under
    /// [`ErrorPolicy::Continue`], hands the error back under
    /// [`ErrorPolicy::FailFast`].
    fn record_failure(
        &mut self,
        policy: ErrorPolicy,
        filename: String,
        error: ExtractError,
    ) -> Result<()> {
        if policy == ErrorPolicy::FailFast {
            return Err(error);
        }
        warn!(script = %filename, error = %error, "skipping script");
        self.failures.push(ScriptFailure {
            filename,
            message: error.to_string(),
        });
        Ok(())
    }
}

impl fmt::Display for ExtractSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} scripts from {} to {}/",
            self.extracted,
            self.archive_path.display(),
            self.output_dir.display()
        )
    }
}

/// Runs the full pipeline described by `config`.
///
/// Reads the archive, creates both output directories if absent, then for
/// every script writes `<name>.dun` and `<stem>.json`.
///
/// # Errors
///
/// - `ExtractError::IoError` if the archive cannot be read or an output
///   cannot be written
/// - Any archive index error from [`Archive::parse`]
/// - `ExtractError::Script` for the first script that cannot be sliced or
///   parsed under [`ErrorPolicy::FailFast`]
pub fn extract_archive(config: &ExtractConfig) -> Result<ExtractSummary> {
    let data = fs::read(&config.archive_path)?;
    let archive = Archive::parse(&data)?;
    debug!(
        path = %config.archive_path.display(),
        scripts = archive.len(),
        "archive index loaded"
    );

    fs::create_dir_all(&config.output_dir)?;
    fs::create_dir_all(&config.parsed_dir)?;

    let mut summary = ExtractSummary {
        archive_path: config.archive_path.clone(),
        output_dir: config.output_dir.clone(),
        extracted: 0,
        parsed: 0,
        failures: Vec::new(),
    };

    for entry in &archive {
        let script = match DecodedScript::from_entry(entry, &data) {
            Ok(script) => script,
            Err(e) => {
                summary.record_failure(config.error_policy, dun_filename(&entry.name), e)?;
                continue;
            }
        };

        let dun_path = config.output_dir.join(&script.dun_filename);
        fs::write(&dun_path, &script.bytes)?;
        summary.extracted += 1;
        info!(path = %dun_path.display(), bytes = script.bytes.len(), "wrote decoded script");

        let parsed = match script.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                summary.record_failure(config.error_policy, script.dun_filename, e)?;
                continue;
            }
        };

        let json_path = config.parsed_dir.join(&script.json_filename);
        fs::write(&json_path, serde_json::to_string_pretty(&parsed)?)?;
        summary.parsed += 1;
        info!(path = %json_path.display(), blocks = parsed.blocks.len(), "wrote parsed script");
    }

    Ok(summary)
}
