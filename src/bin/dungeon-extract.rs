//! Dungeon archive extractor CLI
//!
//! Decodes every script in a `dungeon.bin` archive to a `.dun` file and
//! writes its parsed structure as `.json`.
//!
//! ## Commands
//!
//! - `extract` - Extract and parse every script (the default when no command is given)
//! - `list` - Show the archive index
//! - `show` - Print one parsed script
//! - `validate` - Parse every script without writing (exit codes for scripting)

use clap::{Args, Parser, Subcommand, ValueEnum};
use dungeon_extract::pipeline::{DEFAULT_ARCHIVE_PATH, DEFAULT_OUTPUT_DIR, DEFAULT_PARSED_DIR};
use dungeon_extract::{
    extract_archive, process_script, Archive, ErrorPolicy, ExtractConfig, ParsedDungeon,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Decode dungeon*.bin archives and emit .dun plus structured JSON
#[derive(Parser)]
#[command(name = "dungeon-extract")]
#[command(about = "Decode dungeon*.bin archives and emit .dun plus structured JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the dungeon archive
    #[arg(long = "bin", global = true, default_value = DEFAULT_ARCHIVE_PATH)]
    bin_path: PathBuf,

    #[command(flatten)]
    extract: ExtractArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ExtractArgs {
    /// Directory for decoded .dun files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// Directory for parsed JSON files
    #[arg(long, default_value = DEFAULT_PARSED_DIR)]
    parsed_dir: PathBuf,
    /// Continue with the next script when one fails to parse
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and parse every script (default)
    Extract(ExtractArgs),
    /// List the scripts in the archive
    List,
    /// Parse one script and print it
    Show {
        /// Script name as listed by `list`
        name: String,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Parse every script without writing any files
    Validate {
        /// Print spawn and block counts for every script
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Output format options
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn set_up_tracing() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    set_up_tracing();
    let cli = Cli::parse();

    match cli.command {
        None => cmd_extract(&cli.bin_path, cli.extract),
        Some(Commands::Extract(args)) => cmd_extract(&cli.bin_path, args),
        Some(Commands::List) => cmd_list(&cli.bin_path),
        Some(Commands::Show { name, output }) => cmd_show(&cli.bin_path, &name, &output),
        Some(Commands::Validate { verbose }) => cmd_validate(&cli.bin_path, verbose),
    }
}

/// Reads the archive and parses its index, reporting failures on stderr.
fn load_archive(path: &Path) -> Option<(Vec<u8>, Archive)> {
    let data = match std::fs::read(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            return None;
        }
    };

    match Archive::parse(&data) {
        Ok(archive) => Some((data, archive)),
        Err(e) => {
            eprintln!("Error reading archive index: {}", e);
            None
        }
    }
}

// ============================================================================
// Extract Command Implementation
// ============================================================================

fn cmd_extract(bin_path: &Path, args: ExtractArgs) -> ExitCode {
    let config = ExtractConfig {
        archive_path: bin_path.to_path_buf(),
        output_dir: args.output_dir,
        parsed_dir: args.parsed_dir,
        error_policy: if args.continue_on_error {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::FailFast
        },
    };

    let summary = match extract_archive(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{summary}");

    for failure in &summary.failures {
        eprintln!("ERROR: {}", failure.message);
    }
    if summary.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "\nParsed: {} success, {} errors",
            summary.parsed,
            summary.failures.len()
        );
        ExitCode::FAILURE
    }
}

// ============================================================================
// List Command Implementation
// ============================================================================

fn cmd_list(bin_path: &Path) -> ExitCode {
    let Some((_, archive)) = load_archive(bin_path) else {
        return ExitCode::FAILURE;
    };

    println!(
        "{:>5}  {:<32} {:>10} {:>10} {:>10}",
        "Index", "Name", "Start", "End", "Size"
    );
    for entry in &archive {
        println!(
            "{:>5}  {:<32} {:>10} {:>10} {:>10}",
            entry.index,
            entry.name,
            entry.start,
            entry.end,
            entry.len()
        );
    }
    println!("\n{} scripts", archive.len());

    ExitCode::SUCCESS
}

// ============================================================================
// Show Command Implementation
// ============================================================================

fn cmd_show(bin_path: &Path, name: &str, output: &OutputFormat) -> ExitCode {
    let Some((data, archive)) = load_archive(bin_path) else {
        return ExitCode::FAILURE;
    };

    let Some(entry) = archive.find(name) else {
        eprintln!("No script named '{}' in {}", name, bin_path.display());
        return ExitCode::FAILURE;
    };

    let parsed = match process_script(entry, &data) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&parsed) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing to JSON: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Pretty => print_pretty(&entry.name, &parsed),
    }

    ExitCode::SUCCESS
}

fn print_pretty(name: &str, parsed: &ParsedDungeon) {
    println!("=== {name} ===\n");
    println!("Spawns ({}): {:?}", parsed.spawns.len(), parsed.spawns);

    for (index, block) in parsed.blocks.iter().enumerate() {
        println!("\nBlock {index}:");
        println!("  Rect:        {:?}", block.rect);
        println!("  Enemies:     {:?}", block.enemies);
        println!("  Respawn:     {:?}", block.respawn);
        println!("  Clear:       {:?}", block.clear);
        println!("  VIP:         {:?}", block.vip);
        println!("  Exceptional: {:?}", block.exceptional);
        println!("  Text:        {}", block.text);
        println!("  Countdown:   {}", block.countdown);
    }
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

fn cmd_validate(bin_path: &Path, verbose: bool) -> ExitCode {
    let Some((data, archive)) = load_archive(bin_path) else {
        return ExitCode::FAILURE;
    };

    let mut error_count = 0;
    for entry in &archive {
        match process_script(entry, &data) {
            Ok(parsed) if verbose => println!(
                "{}: OK ({} spawns, {} blocks)",
                entry.name,
                parsed.spawns.len(),
                parsed.blocks.len()
            ),
            Ok(_) => {}
            Err(e) => {
                error_count += 1;
                println!("{}: ERROR: {}", entry.name, e);
            }
        }
    }

    println!(
        "\nValidated: {} success, {} errors",
        archive.len() - error_count,
        error_count
    );

    if error_count == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
