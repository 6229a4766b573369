//! dupsweep - find duplicate and oversized files, remove them safely.
//!
//! Usage:
//!   dupsweep scan [ROOT]           List files under a root
//!   dupsweep duplicates [ROOT]     Find duplicate files
//!   dupsweep large ROOT...         Rank the largest files
//!   dupsweep delete PATH...        Delete files and record them in the audit trail
//!   dupsweep rename PATH... -p P   Rename files to P_<name>
//!   dupsweep --help                Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, Context, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use dupsweep_core::PageInfo;
use dupsweep_engine::{
    BackgroundTask, DeleteMode, DuplicateEntry, DuplicateSession, Engine, ExtensionFilter,
    LargeFileEntry, LargeFileSession, OperationComplete, SortMode, UserSettings,
};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "DUPSWEEP_LOG";

#[derive(Parser)]
#[command(
    name = "dupsweep",
    version,
    about = "Find duplicate and oversized files, remove them safely",
    long_about = "dupsweep finds duplicate files by content and ranks the largest files \
                  under one or more roots.\n\nEvery deletion or rename is recorded in an \
                  audit trail that can be exported with --audit-out."
)]
struct Cli {
    /// Page to show (1-based)
    #[arg(long, global = true, default_value = "1")]
    page: usize,

    /// Rows per page (defaults to the saved setting)
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Maximum depth to descend below each root
    #[arg(long, global = true)]
    max_depth: Option<u32>,

    /// Write the audit trail to this file after a deleting or renaming command
    #[arg(long, global = true)]
    audit_out: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List files under a root
    Scan {
        /// Root to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Extensions to keep, comma separated (e.g. "jpg,png")
        #[arg(short = 'e', long)]
        filter: Option<String>,
    },

    /// Find duplicate files
    Duplicates {
        /// Root to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Extensions to keep, comma separated (e.g. "jpg,png")
        #[arg(short = 'e', long)]
        filter: Option<String>,

        /// Ordering of the duplicate list
        #[arg(short, long)]
        sort: Option<SortArg>,

        /// Ignore files smaller than this (e.g., "1KB", "1MB")
        #[arg(short, long, default_value = "0")]
        min_size: String,

        /// Delete every copy except the first of each group
        #[arg(long)]
        delete_extras: bool,

        /// Move deleted files to the trash
        #[arg(long)]
        trash: bool,
    },

    /// Rank the largest files across one or more roots
    Large {
        /// Roots to scan
        #[arg(default_value = ".")]
        roots: Vec<PathBuf>,

        /// Minimum file size to list (e.g., "1KB", "1MB")
        #[arg(short, long, default_value = "0")]
        min_size: String,

        /// Keep only the N largest files (0 = all)
        #[arg(short = 'n', long, default_value = "0")]
        top: usize,
    },

    /// Delete files, continuing past failures
    Delete {
        /// Files to delete
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Tag recorded in the audit trail
        #[arg(short, long, default_value = "manual")]
        method: String,

        /// Move files to the trash
        #[arg(long)]
        trash: bool,
    },

    /// Rename files in place to <PREFIX>_<name>
    Rename {
        /// Files to rename
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Prefix to prepend
        #[arg(short, long)]
        prefix: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Path,
    Size,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Path => SortMode::Path,
            SortArg::Size => SortMode::Size,
        }
    }
}

/// Page of a result session as emitted in JSON output.
#[derive(Serialize)]
struct PageOutput<'a, T> {
    page: PageInfo,
    rows: &'a [T],
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = UserSettings::load();
    let page_size = cli.page_size.unwrap_or(settings.page_size);
    let page = cli.page.saturating_sub(1);
    let base = EngineOptions {
        page_size,
        max_depth: cli.max_depth,
        ..EngineOptions::default()
    };

    match cli.command {
        Command::Scan { root, filter } => {
            let filter = ExtensionFilter::parse(filter.as_deref().unwrap_or(&settings.filter));
            let engine = Arc::new(make_engine(&settings, &base));
            run_scan(engine, root, filter, cli.format).await?;
        }
        Command::Duplicates {
            root,
            filter,
            sort,
            min_size,
            delete_extras,
            trash,
        } => {
            let filter = ExtensionFilter::parse(filter.as_deref().unwrap_or(&settings.filter));
            let sort = sort.map(SortMode::from).unwrap_or(settings.sort);
            let options = EngineOptions {
                min_size: parse_size(&min_size)?,
                trash,
                ..base
            };
            let engine = Arc::new(make_engine(&settings, &options));

            let task = engine.spawn_duplicate_session(root.clone(), filter, sort);
            let mut session = task
                .join()
                .await?
                .with_context(|| format!("Duplicate search failed for {}", root.display()))?;
            session.rows_mut().set_page(page);

            if delete_extras {
                let extras = extra_copies(&session);
                let outcome = session.delete_selected(&engine, &extras, &CancellationToken::new());
                report_outcome(&outcome, cli.format)?;
                write_audit(&engine, cli.audit_out.as_deref())?;
            }

            print_duplicates(&session, cli.format)?;
        }
        Command::Large {
            roots,
            min_size,
            top,
        } => {
            let options = EngineOptions {
                min_size: parse_size(&min_size)?,
                limit: top,
                ..base
            };
            let engine = Arc::new(make_engine(&settings, &options));

            let task = engine.spawn_large_file_session(roots);
            let mut session = task.join().await?.context("Ranking failed")?;
            session.rows_mut().set_page(page);

            print_large_files(&session, cli.format)?;
        }
        Command::Delete {
            paths,
            method,
            trash,
        } => {
            let engine = make_engine(&settings, &EngineOptions { trash, ..base });
            let outcome = engine.delete(&paths, &method, &CancellationToken::new());
            report_outcome(&outcome, cli.format)?;
            write_audit(&engine, cli.audit_out.as_deref())?;
        }
        Command::Rename { paths, prefix } => {
            let engine = make_engine(&settings, &base);
            let outcome = engine.rename(&paths, &prefix, &CancellationToken::new());
            report_outcome(&outcome, cli.format)?;
            write_audit(&engine, cli.audit_out.as_deref())?;
        }
    }

    Ok(())
}

/// Command line overrides applied on top of the saved settings.
#[derive(Debug, Clone, Copy, Default)]
struct EngineOptions {
    page_size: usize,
    max_depth: Option<u32>,
    min_size: u64,
    limit: usize,
    trash: bool,
}

/// Build an engine from saved settings and command line overrides.
fn make_engine(settings: &UserSettings, options: &EngineOptions) -> Engine {
    let mut config = settings.engine_config();
    config.page_size = options.page_size;
    config.max_depth = options.max_depth;
    config.min_size = options.min_size;
    config.limit = options.limit;
    if options.trash {
        config.delete_mode = DeleteMode::Trash;
    }
    Engine::new(config)
}

/// List files under a root.
async fn run_scan(
    engine: Arc<Engine>,
    root: PathBuf,
    filter: ExtensionFilter,
    format: OutputFormat,
) -> Result<()> {
    eprintln!("Scanning {}...", root.display());

    let mut progress_rx = engine.subscribe_scan_progress();
    let progress_task = tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            debug!(
                files = progress.files_found,
                bytes = progress.bytes_found,
                rate = progress.files_per_second(),
                "scan progress"
            );
        }
    });

    let task = BackgroundTask::spawn({
        let engine = Arc::clone(&engine);
        let root = root.clone();
        move |cancel| engine.scan(&root, &filter, &cancel)
    });
    let result = task.join().await?;
    progress_task.abort();

    let records = result.with_context(|| format!("Scan failed for {}", root.display()))?;

    match format {
        OutputFormat::Text => {
            let total: u64 = records.iter().map(|r| r.size).sum();
            for record in &records {
                println!("{:>10}  {}", format_size(record.size), record.path.display());
            }
            println!();
            println!(" {} files, {}", records.len(), format_size(total));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}

/// Every group member after the first, in group order.
fn extra_copies(session: &DuplicateSession) -> Vec<PathBuf> {
    session
        .report()
        .groups
        .iter()
        .flat_map(|group| group.paths.iter().skip(1).cloned())
        .collect()
}

fn print_duplicates(session: &DuplicateSession, format: OutputFormat) -> Result<()> {
    let report = session.report();
    let info = session.page_info();

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(" Duplicate File Report");
            println!("{}", "─".repeat(70));
            println!();

            if !report.has_duplicates() {
                println!(" No duplicate files found.");
                return Ok(());
            }

            println!(
                " Found {} duplicate groups ({} files)",
                report.group_count, report.files_with_duplicates
            );
            println!(
                " Total wasted space: {}",
                format_size(report.total_wasted_space)
            );
            if report.files_skipped > 0 {
                println!(" {} files skipped (empty or unreadable)", report.files_skipped);
            }
            println!();

            for entry in session.page() {
                print_duplicate_row(entry);
            }

            println!();
            println!(" {}", info.label());
        }
        OutputFormat::Json => {
            let output = PageOutput {
                page: info,
                rows: session.page(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_duplicate_row(entry: &DuplicateEntry) {
    let hash = entry.hash.to_hex();
    println!(
        " #{:<4} {:>10}  {}  {}",
        entry.group + 1,
        format_size(entry.size),
        &hash[..12],
        entry.path.display()
    );
}

fn print_large_files(session: &LargeFileSession, format: OutputFormat) -> Result<()> {
    let info = session.page_info();

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(
                " Largest Files - {} files, {}",
                info.total_items,
                format_size(session.total_size())
            );
            println!("{}", "─".repeat(70));
            println!();

            for (offset, entry) in session.page().iter().enumerate() {
                print_large_row(info.range.start + offset + 1, entry);
            }

            println!();
            println!(" {}", info.label());
        }
        OutputFormat::Json => {
            let output = PageOutput {
                page: info,
                rows: session.page(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_large_row(rank: usize, entry: &LargeFileEntry) {
    println!(
        " {:>5}. {:>10}  {}",
        rank,
        format_size(entry.size),
        entry.path.display()
    );
}

fn report_outcome(outcome: &OperationComplete, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!(" {}", outcome.summary());
            for (from, to) in &outcome.renamed {
                println!("   {} -> {}", from.display(), to.display());
            }
            for error in &outcome.errors {
                println!("   failed: {}", error);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
    }
    Ok(())
}

/// Export the audit trail when the operator asked for it.
fn write_audit(engine: &Engine, out: Option<&Path>) -> Result<()> {
    if let Some(path) = out {
        engine
            .export_audit_log_to(path)
            .with_context(|| format!("Cannot write audit trail to {}", path.display()))?;
        eprintln!("Audit trail written to {}", path.display());
    }
    Ok(())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Parse a size string (e.g., "1KB", "10MB", "1GB").
fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_uppercase();
    let digits = s.trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.');
    let unit = &s[digits.len()..];

    let multiplier: u64 = match unit {
        "" | "B" => 1,
        "K" | "KB" => 1024,
        "M" | "MB" => 1024 * 1024,
        "G" | "GB" => 1024 * 1024 * 1024,
        other => bail!("Unknown size unit: {}", other),
    };

    let num: f64 = digits
        .parse()
        .with_context(|| format!("Invalid size: {}", s))?;
    Ok((num * multiplier as f64) as u64)
}
